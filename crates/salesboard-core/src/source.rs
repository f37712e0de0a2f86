//! Seed sources: where the reseed operation gets its raw JSON payload

use async_trait::async_trait;
use salesboard_config::SourceConfig;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use crate::error::{CoreError, CoreResult};

/// Seed source reference type
pub type SourceRef = Arc<dyn SeedSource>;

/// Trait for seed payload providers
#[async_trait]
pub trait SeedSource: Send + Sync {
    /// Fetch the raw payload; failures are `SourceUnavailable`
    async fn fetch(&self) -> CoreResult<Vec<u8>>;

    /// Where the payload comes from, for logs
    fn describe(&self) -> String;
}

/// Build the configured source: a local file when `path` is set, otherwise the URL
pub fn from_config(config: &SourceConfig) -> CoreResult<SourceRef> {
    match &config.path {
        Some(path) => Ok(Arc::new(FileSeedSource::new(path.clone()))),
        None => Ok(Arc::new(HttpSeedSource::new(
            config.url.clone(),
            Duration::from_secs(config.timeout_secs),
            config.retries,
            Duration::from_millis(config.retry_backoff_ms),
        )?)),
    }
}

/// Remote JSON source fetched over HTTP with a timeout and retries
#[derive(Debug, Clone)]
pub struct HttpSeedSource {
    client: reqwest::Client,
    url: String,
    retries: u32,
    backoff: Duration,
}

impl HttpSeedSource {
    pub fn new(url: String, timeout: Duration, retries: u32, backoff: Duration) -> CoreResult<Self> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .redirect(reqwest::redirect::Policy::limited(10))
            .build()
            .map_err(|e| CoreError::SourceUnavailable {
                message: format!("HTTP client could not be built: {}", e),
            })?;
        Ok(Self {
            client,
            url,
            retries,
            backoff,
        })
    }

    async fn fetch_once(&self) -> CoreResult<Vec<u8>> {
        let unavailable = |e: reqwest::Error| CoreError::SourceUnavailable {
            message: if e.is_timeout() {
                format!("request to {} timed out", self.url)
            } else {
                e.to_string()
            },
        };
        let response = self
            .client
            .get(&self.url)
            .send()
            .await
            .map_err(unavailable)?
            .error_for_status()
            .map_err(unavailable)?;
        let body = response.bytes().await.map_err(unavailable)?;
        Ok(body.to_vec())
    }
}

#[async_trait]
impl SeedSource for HttpSeedSource {
    async fn fetch(&self) -> CoreResult<Vec<u8>> {
        let mut attempt = 0;
        loop {
            match self.fetch_once().await {
                Ok(body) => return Ok(body),
                Err(e) if attempt < self.retries => {
                    let wait = self.backoff.saturating_mul(2u32.saturating_pow(attempt));
                    log::warn!(
                        "Fetch of {} failed (attempt {}/{}): {}; retrying in {:?}",
                        self.url,
                        attempt + 1,
                        self.retries + 1,
                        e,
                        wait
                    );
                    tokio::time::sleep(wait).await;
                    attempt += 1;
                }
                Err(e) => return Err(e),
            }
        }
    }

    fn describe(&self) -> String {
        self.url.clone()
    }
}

/// Local JSON file source
#[derive(Debug, Clone)]
pub struct FileSeedSource {
    path: PathBuf,
}

impl FileSeedSource {
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }
}

#[async_trait]
impl SeedSource for FileSeedSource {
    async fn fetch(&self) -> CoreResult<Vec<u8>> {
        tokio::fs::read(&self.path)
            .await
            .map_err(|e| CoreError::SourceUnavailable {
                message: format!("{}: {}", self.path.display(), e),
            })
    }

    fn describe(&self) -> String {
        self.path.display().to_string()
    }
}

/// Fixed in-memory payload
#[derive(Debug, Clone, Default)]
pub struct StaticSeedSource {
    payload: Vec<u8>,
}

impl StaticSeedSource {
    pub fn new(payload: impl Into<Vec<u8>>) -> Self {
        Self {
            payload: payload.into(),
        }
    }

    /// Payload serialized from a JSON value
    pub fn from_json(value: &serde_json::Value) -> Self {
        Self::new(value.to_string())
    }
}

#[async_trait]
impl SeedSource for StaticSeedSource {
    async fn fetch(&self) -> CoreResult<Vec<u8>> {
        Ok(self.payload.clone())
    }

    fn describe(&self) -> String {
        "static payload".to_string()
    }
}

// ==================== Tests ====================

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpListener;

    fn http_response(status: &str, body: &str) -> Option<String> {
        Some(format!(
            "HTTP/1.1 {status}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{body}",
            body.len()
        ))
    }

    /// Answer one connection per entry, in order; `None` accepts and never replies
    async fn spawn_server(responses: Vec<Option<String>>) -> (String, Arc<AtomicUsize>) {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let url = format!("http://{}/seed.json", listener.local_addr().unwrap());
        let hits = Arc::new(AtomicUsize::new(0));
        let counter = hits.clone();

        tokio::spawn(async move {
            let mut silent = Vec::new();
            for response in responses {
                let Ok((mut stream, _)) = listener.accept().await else {
                    return;
                };
                counter.fetch_add(1, Ordering::SeqCst);
                let mut request = [0u8; 4096];
                let _ = stream.read(&mut request).await;
                match response {
                    Some(raw) => {
                        let _ = stream.write_all(raw.as_bytes()).await;
                        let _ = stream.shutdown().await;
                    }
                    None => silent.push(stream),
                }
            }
            std::future::pending::<()>().await;
        });

        (url, hits)
    }

    #[tokio::test]
    async fn test_static_source() {
        let source = StaticSeedSource::from_json(&serde_json::json!([]));
        assert_eq!(source.fetch().await.unwrap(), b"[]");
    }

    #[tokio::test]
    async fn test_file_source_missing_file() {
        let source = FileSeedSource::new(PathBuf::from("/nonexistent/seed.json"));
        let err = source.fetch().await.unwrap_err();
        assert!(matches!(err, CoreError::SourceUnavailable { .. }));
        assert!(source.describe().contains("seed.json"));
    }

    #[tokio::test]
    async fn test_http_source_unreachable() {
        // Nothing listens on port 9 (discard) locally; connection is refused fast.
        let source = HttpSeedSource::new(
            "http://127.0.0.1:9/data.json".to_string(),
            Duration::from_secs(2),
            1,
            Duration::from_millis(1),
        )
        .unwrap();
        let err = source.fetch().await.unwrap_err();
        assert!(matches!(err, CoreError::SourceUnavailable { .. }));
    }

    #[tokio::test]
    async fn test_http_source_times_out() {
        let (url, _) = spawn_server(vec![None]).await;
        let source = HttpSeedSource::new(url, Duration::from_millis(300), 0, Duration::from_millis(1)).unwrap();

        let started = std::time::Instant::now();
        let err = source.fetch().await.unwrap_err();
        assert!(started.elapsed() < Duration::from_secs(5));
        match err {
            CoreError::SourceUnavailable { message } => assert!(message.contains("timed out"), "{message}"),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_http_source_error_status() {
        let failure = http_response("500 Internal Server Error", "{}");
        let (url, hits) = spawn_server(vec![failure.clone(), failure]).await;
        let source = HttpSeedSource::new(url, Duration::from_secs(2), 1, Duration::from_millis(1)).unwrap();

        let err = source.fetch().await.unwrap_err();
        assert!(matches!(err, CoreError::SourceUnavailable { .. }));
        assert!(err.to_string().contains("500"));
        assert_eq!(hits.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_http_source_retries_then_succeeds() {
        let (url, hits) = spawn_server(vec![
            http_response("503 Service Unavailable", ""),
            http_response("200 OK", "[]"),
        ])
        .await;
        let source = HttpSeedSource::new(url, Duration::from_secs(2), 2, Duration::from_millis(1)).unwrap();

        assert_eq!(source.fetch().await.unwrap(), b"[]");
        assert_eq!(hits.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn test_from_config_prefers_path() {
        let config = SourceConfig {
            path: Some(PathBuf::from("./seed.json")),
            ..SourceConfig::default()
        };
        let source = from_config(&config).unwrap();
        assert_eq!(source.describe(), "./seed.json");

        let source = from_config(&SourceConfig::default()).unwrap();
        assert_eq!(source.describe(), salesboard_config::DEFAULT_SOURCE_URL);
    }
}
