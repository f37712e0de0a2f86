//! Error types for salesboard-core
//!
//! This module provides error handling for the query engine, including
//! error codes, detailed messages, and suggestions.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::store::StoreError;

/// Error codes for programmatic error handling
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    /// Month parameter absent
    MissingMonth,
    /// Month parameter not a month
    InvalidMonth,
    /// Seed source could not be fetched
    SourceUnavailable,
    /// Seed payload malformed
    SeedParseError,
    /// Record store failure
    StoreError,
}

impl std::fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ErrorCode::MissingMonth => write!(f, "MISSING_MONTH"),
            ErrorCode::InvalidMonth => write!(f, "INVALID_MONTH"),
            ErrorCode::SourceUnavailable => write!(f, "SOURCE_UNAVAILABLE"),
            ErrorCode::SeedParseError => write!(f, "SEED_PARSE_ERROR"),
            ErrorCode::StoreError => write!(f, "STORE_ERROR"),
        }
    }
}

/// Detailed error information for logs
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorDetails {
    /// Error code
    pub code: ErrorCode,
    /// Human-readable message
    pub message: String,
    /// Additional details
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<serde_json::Value>,
    /// Suggestions for resolution
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub suggestions: Vec<String>,
}

impl ErrorDetails {
    /// Create a new error detail
    pub fn new(code: ErrorCode, message: String) -> Self {
        Self {
            code,
            message,
            details: None,
            suggestions: vec![],
        }
    }

    /// Add detail information
    pub fn with_detail(mut self, detail: serde_json::Value) -> Self {
        self.details = Some(detail);
        self
    }

    /// Add a suggestion
    pub fn with_suggestion(mut self, suggestion: String) -> Self {
        self.suggestions.push(suggestion);
        self
    }
}

impl std::fmt::Display for ErrorDetails {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}] {}", self.code, self.message)?;
        if let Some(ref details) = self.details {
            write!(f, "\nDetails: {}", details)?;
        }
        if !self.suggestions.is_empty() {
            write!(f, "\nSuggestions:")?;
            for suggestion in &self.suggestions {
                write!(f, "\n  - {}", suggestion)?;
            }
        }
        Ok(())
    }
}

/// Error severity levels
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ErrorSeverity {
    /// Informational, caused by the caller
    Info,
    /// Warning - a dependency is down; stored data is untouched
    Warning,
    /// Error - operation failed
    Error,
    /// Critical - application may be unstable
    Critical,
}

impl std::fmt::Display for ErrorSeverity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ErrorSeverity::Info => write!(f, "info"),
            ErrorSeverity::Warning => write!(f, "warning"),
            ErrorSeverity::Error => write!(f, "error"),
            ErrorSeverity::Critical => write!(f, "critical"),
        }
    }
}

/// Main error type for salesboard-core
#[derive(Error, Debug)]
pub enum CoreError {
    #[error("Month parameter is required.")]
    MissingMonth,

    #[error("Invalid month: {value}")]
    InvalidMonth { value: String },

    #[error("Seed source unavailable: {message}")]
    SourceUnavailable { message: String },

    #[error("Seed data could not be parsed: {message}")]
    SeedParseError { message: String },

    #[error("Store error: {source}")]
    StoreError {
        #[from]
        source: StoreError,
    },
}

impl CoreError {
    /// Get the error code
    pub fn code(&self) -> ErrorCode {
        match self {
            CoreError::MissingMonth => ErrorCode::MissingMonth,
            CoreError::InvalidMonth { .. } => ErrorCode::InvalidMonth,
            CoreError::SourceUnavailable { .. } => ErrorCode::SourceUnavailable,
            CoreError::SeedParseError { .. } => ErrorCode::SeedParseError,
            CoreError::StoreError { .. } => ErrorCode::StoreError,
        }
    }

    /// Get the severity level
    pub fn severity(&self) -> ErrorSeverity {
        match self {
            CoreError::MissingMonth => ErrorSeverity::Info,
            CoreError::InvalidMonth { .. } => ErrorSeverity::Info,
            CoreError::SourceUnavailable { .. } => ErrorSeverity::Warning,
            CoreError::SeedParseError { .. } => ErrorSeverity::Error,
            CoreError::StoreError { .. } => ErrorSeverity::Critical,
        }
    }

    /// Whether the caller sent a bad request, as opposed to a downstream failure
    pub fn is_client_error(&self) -> bool {
        matches!(self, CoreError::MissingMonth | CoreError::InvalidMonth { .. })
    }

    /// Convert to detailed error info
    pub fn to_details(&self) -> ErrorDetails {
        let mut details = ErrorDetails::new(self.code(), self.to_string());

        match self {
            CoreError::MissingMonth => {
                details = details.with_suggestion(
                    "Pass ?month= as a number 1-12 or an English month name.".to_string(),
                );
            }
            CoreError::InvalidMonth { value } => {
                details = details.with_detail(serde_json::json!({ "month": value }));
                details = details.with_suggestion(
                    "Use a number between 1 and 12 or a full month name such as 'March'.".to_string(),
                );
            }
            CoreError::SourceUnavailable { .. } => {
                details = details.with_suggestion(
                    "Check source.url (or source.path) in the configuration.".to_string(),
                );
                details = details.with_suggestion(
                    "Increase source.timeout_secs or source.retries for slow networks.".to_string(),
                );
            }
            CoreError::SeedParseError { message } => {
                details = details.with_detail(serde_json::json!({ "parse_message": message }));
                details = details.with_suggestion(
                    "The source must return a JSON array of transaction objects.".to_string(),
                );
            }
            CoreError::StoreError { .. } => {}
        }

        details
    }
}

/// Result type with CoreError
pub type CoreResult<T> = Result<T, CoreError>;

/// Error context for reporting
#[derive(Debug, Clone, Default)]
pub struct ErrorContext {
    /// Operation being performed
    pub operation: String,
    /// Month the request was scoped to, as sent
    pub month: Option<String>,
}

impl ErrorContext {
    /// Create a new error context
    pub fn new(operation: impl Into<String>) -> Self {
        Self {
            operation: operation.into(),
            month: None,
        }
    }

    /// Add the requested month
    pub fn with_month(mut self, month: Option<&str>) -> Self {
        self.month = month.map(str::to_string);
        self
    }
}

/// Error logger trait
pub trait ErrorLogger {
    /// Log an error
    fn log_error(&self, error: &CoreError, context: &ErrorContext);
}

/// Default error logger using log crate
#[derive(Default)]
pub struct DefaultErrorLogger;

impl ErrorLogger for DefaultErrorLogger {
    fn log_error(&self, error: &CoreError, context: &ErrorContext) {
        match error.severity() {
            ErrorSeverity::Info => log::debug!(
                target: "salesboard::error",
                "{} - Operation: {} - Month: {:?}",
                error.to_details(),
                context.operation,
                context.month
            ),
            ErrorSeverity::Warning => log::warn!(
                target: "salesboard::error",
                "{} - Operation: {} - Month: {:?}",
                error.to_details(),
                context.operation,
                context.month
            ),
            ErrorSeverity::Error | ErrorSeverity::Critical => log::error!(
                target: "salesboard::error",
                "{} - Operation: {} - Month: {:?}",
                error.to_details(),
                context.operation,
                context.month
            ),
        }
    }
}

// ==================== Tests ====================
