//! Configuration management for salesboard
//!
//! This module handles loading, validation, and management of
//! salesboard configuration from YAML files.

pub mod error;

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

pub use error::{ConfigError, ConfigResult};

/// Public dataset the reseed operation pulls from by default
pub const DEFAULT_SOURCE_URL: &str = "https://s3.amazonaws.com/roxiler.com/product_transaction.json";

/// Environment variable overriding `server.port`
pub const ENV_PORT: &str = "PORT";

/// Config file read when `--config` is not given
pub const DEFAULT_CONFIG_PATH: &str = "config.yaml";
/// Environment variable overriding `source.url`
pub const ENV_SOURCE_URL: &str = "SALESBOARD_SOURCE_URL";

const LOG_LEVELS: [&str; 6] = ["off", "error", "warn", "info", "debug", "trace"];

// ==================== Configuration Types ====================

/// Server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Server host address
    #[serde(default = "default_host")]
    pub host: String,
    /// Server port
    #[serde(default = "default_port")]
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    5000
}

/// Where reseed data comes from
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SourceConfig {
    /// Remote JSON array of transaction records
    #[serde(default = "default_source_url")]
    pub url: String,
    /// Local JSON file used instead of `url` when set
    #[serde(default)]
    pub path: Option<PathBuf>,
    /// Per-request timeout for the remote fetch
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
    /// Extra attempts after a failed fetch
    #[serde(default = "default_retries")]
    pub retries: u32,
    /// Base delay between attempts, doubled each retry
    #[serde(default = "default_retry_backoff_ms")]
    pub retry_backoff_ms: u64,
}

impl Default for SourceConfig {
    fn default() -> Self {
        Self {
            url: default_source_url(),
            path: None,
            timeout_secs: default_timeout_secs(),
            retries: default_retries(),
            retry_backoff_ms: default_retry_backoff_ms(),
        }
    }
}

fn default_source_url() -> String {
    DEFAULT_SOURCE_URL.to_string()
}

fn default_timeout_secs() -> u64 {
    30
}

fn default_retries() -> u32 {
    2
}

fn default_retry_backoff_ms() -> u64 {
    500
}

/// Record store settings
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct StoreConfig {
    /// JSON snapshot loaded at startup and rewritten after each reseed
    #[serde(default)]
    pub snapshot_path: Option<PathBuf>,
}

/// Pagination settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PaginationConfig {
    /// Records per page when the request does not say
    #[serde(default = "default_per_page")]
    pub per_page: usize,
    /// Upper bound for a requested page size
    #[serde(default = "default_max_per_page")]
    pub max_per_page: usize,
}

impl Default for PaginationConfig {
    fn default() -> Self {
        Self {
            per_page: default_per_page(),
            max_per_page: default_max_per_page(),
        }
    }
}

fn default_per_page() -> usize {
    10
}

fn default_max_per_page() -> usize {
    100
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level: error, warn, info, debug, trace or off
    #[serde(default = "default_log_level")]
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

/// Main configuration structure
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    /// Server settings
    #[serde(default)]
    pub server: ServerConfig,
    /// Seed source settings
    #[serde(default)]
    pub source: SourceConfig,
    /// Store settings
    #[serde(default)]
    pub store: StoreConfig,
    /// Pagination settings
    #[serde(default)]
    pub pagination: PaginationConfig,
    /// Logging settings
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl Config {
    /// Load configuration from a YAML file
    pub fn load(path: PathBuf) -> ConfigResult<Self> {
        if !path.exists() {
            return Err(ConfigError::FileNotFound {
                path: path.display().to_string(),
            });
        }
        let content = std::fs::read_to_string(&path).map_err(|e| ConfigError::IoError {
            message: e.to_string(),
        })?;
        Self::from_yaml(&content)
    }

    /// Load configuration, falling back to defaults when the file is absent
    ///
    /// Returns the configuration and whether the file was actually read.
    pub async fn load_or_default(path: &Path) -> ConfigResult<(Self, bool)> {
        match tokio::fs::read_to_string(path).await {
            Ok(content) => Ok((Self::from_yaml(&content)?, true)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok((Self::default(), false)),
            Err(e) => Err(ConfigError::IoError {
                message: e.to_string(),
            }),
        }
    }

    /// Resolve the startup configuration
    ///
    /// An explicitly named file must exist. The default path may be absent, in
    /// which case defaults are used. Returns the config, the path consulted and
    /// whether that file was read.
    pub async fn load_for_startup(explicit: Option<&Path>) -> ConfigResult<(Self, PathBuf, bool)> {
        match explicit {
            Some(path) => Ok((Self::load(path.to_path_buf())?, path.to_path_buf(), true)),
            None => {
                let path = PathBuf::from(DEFAULT_CONFIG_PATH);
                let (config, found) = Self::load_or_default(&path).await?;
                Ok((config, path, found))
            }
        }
    }

    /// Parse and validate YAML content
    pub fn from_yaml(content: &str) -> ConfigResult<Self> {
        let config: Config = serde_yaml::from_str(content).map_err(|e| ConfigError::InvalidYaml {
            message: e.to_string(),
        })?;
        config.validate()?;
        Ok(config)
    }

    /// Apply `PORT` and `SALESBOARD_SOURCE_URL` overrides from a variable lookup
    pub fn apply_env_overrides<F>(&mut self, lookup: F) -> ConfigResult<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(port) = lookup(ENV_PORT) {
            self.server.port = port.trim().parse().map_err(|_| ConfigError::InvalidValue {
                field: ENV_PORT.to_string(),
                reason: format!("'{}' is not a valid port", port),
            })?;
        }
        if let Some(url) = lookup(ENV_SOURCE_URL) {
            if !url.trim().is_empty() {
                self.source.url = url.trim().to_string();
            }
        }
        self.validate()
    }

    /// Validate configuration values
    pub fn validate(&self) -> ConfigResult<()> {
        if self.server.port == 0 {
            return Err(ConfigError::InvalidValue {
                field: "server.port".to_string(),
                reason: "Port must be greater than 0".to_string(),
            });
        }

        if self.source.timeout_secs == 0 {
            return Err(ConfigError::InvalidValue {
                field: "source.timeout_secs".to_string(),
                reason: "Timeout must be at least one second".to_string(),
            });
        }

        if self.source.path.is_none() && self.source.url.trim().is_empty() {
            return Err(ConfigError::InvalidValue {
                field: "source.url".to_string(),
                reason: "Either source.url or source.path must be set".to_string(),
            });
        }

        if self.pagination.max_per_page == 0 {
            return Err(ConfigError::InvalidValue {
                field: "pagination.max_per_page".to_string(),
                reason: "Maximum page size must be greater than 0".to_string(),
            });
        }

        if self.pagination.per_page == 0 || self.pagination.per_page > self.pagination.max_per_page {
            return Err(ConfigError::InvalidValue {
                field: "pagination.per_page".to_string(),
                reason: format!(
                    "Page size must be between 1 and {}",
                    self.pagination.max_per_page
                ),
            });
        }

        if !LOG_LEVELS.contains(&self.logging.level.to_lowercase().as_str()) {
            return Err(ConfigError::InvalidValue {
                field: "logging.level".to_string(),
                reason: format!("Log level must be one of: {}", LOG_LEVELS.join(", ")),
            });
        }

        Ok(())
    }

    /// Generate a default configuration file
    pub fn generate_default() -> &'static str {
        include_str!("../templates/default_config.yaml")
    }

    /// Address the HTTP server binds to
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }
}

// ==================== Tests ====================
