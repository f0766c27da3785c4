use std::time::Duration;
use thiserror::Error;

/// Failure of a whole ingestion run. Any variant means the feed is
/// unavailable; there is no partial ingestion.
#[derive(Error, Debug)]
pub enum FeedError {
    #[error("request timed out after {0:?}")]
    Timeout(Duration),
    #[error("request failed: {0}")]
    Transport(#[source] reqwest::Error),
    #[error("HTTP status {0}")]
    Status(reqwest::StatusCode),
    #[error("malformed envelope: {0}")]
    Envelope(String),
    #[error("invalid JSON payload: {0}")]
    Json(#[from] serde_json::Error),
    #[error("sheet reported an error: {0}")]
    Sheet(String),
}

impl FeedError {
    /// Whether another attempt could plausibly succeed.
    pub fn is_transient(&self) -> bool {
        match self {
            FeedError::Timeout(_) | FeedError::Transport(_) => true,
            FeedError::Status(status) => {
                status.as_u16() == 429 || status.is_server_error()
            }
            FeedError::Envelope(_) | FeedError::Json(_) | FeedError::Sheet(_) => false,
        }
    }
}

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("cannot read config {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid config: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("invalid feed URL: {0}")]
    InvalidUrl(String),
    #[error("cannot build HTTP client: {0}")]
    HttpClient(#[from] reqwest::Error),
}
