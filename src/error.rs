// Error types for folio.
// Covers GitHub API transport failures, cache store errors, and configuration problems.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum FolioError {
    #[error("GitHub API error: {0}")]
    Api(#[from] reqwest::Error),

    #[error("HTTP {status} from {url}")]
    Status { status: u16, url: String },

    #[error("Rate limit exceeded for {url}")]
    RateLimited { url: String },

    #[error("Request timed out: {url}")]
    Timeout { url: String },

    #[error("Invalid header value: {0}")]
    InvalidHeader(#[from] reqwest::header::InvalidHeaderValue),

    #[error("Missing {0} environment variable")]
    MissingEnv(&'static str),

    #[error("JSON parsing error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("{0}")]
    Other(String),
}

impl FolioError {
    /// Whether the error is the API's rate-limit signal (HTTP 403).
    pub fn is_rate_limited(&self) -> bool {
        matches!(self, FolioError::RateLimited { .. })
    }
}

pub type Result<T> = std::result::Result<T, FolioError>;
