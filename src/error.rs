//! Error types for site-guard

use thiserror::Error;

/// Result type alias using our Error type
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur outside of an individual extractor
#[derive(Debug, Error)]
pub enum Error {
    /// Invalid URL provided
    #[error("invalid URL: {0}")]
    InvalidUrl(String),

    /// Failed to create HTTP client
    #[error("failed to create HTTP client: {0}")]
    HttpClient(String),

    /// Batch input file could not be read
    #[error("failed to read input file '{path}'")]
    InputFile {
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// Output operation failed
    #[error("output failed: {0}")]
    OutputFailed(#[source] std::io::Error),

    /// JSON serialization failed
    #[error("JSON serialization failed")]
    SerializationFailed(#[from] serde_json::Error),
}

/// Why an extractor could not produce a value
///
/// Stored inside a [`ScanResult`](crate::ScanResult) instead of being
/// propagated, so one failed service never hides the other two.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ExtractError {
    /// No usable API credential configured
    #[error("API credential not configured")]
    MissingCredential,

    /// Request exceeded the client timeout
    #[error("request timed out")]
    Timeout,

    /// Connection, DNS or other transport failure
    #[error("transport error: {0}")]
    Transport(String),

    /// Service answered with a non-success status
    #[error("HTTP error: status {0}")]
    Status(u16),

    /// Response body could not be read or decoded
    #[error("malformed response: {0}")]
    Decode(String),
}

impl ExtractError {
    /// Fixed placeholder shown in summaries and reports
    pub fn sentinel(&self) -> &'static str {
        match self {
            Self::MissingCredential => "Add key",
            _ => "Error",
        }
    }
}

impl From<reqwest::Error> for ExtractError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            Self::Timeout
        } else if err.is_decode() || err.is_body() {
            Self::Decode(err.to_string())
        } else if let Some(status) = err.status() {
            Self::Status(status.as_u16())
        } else {
            Self::Transport(err.to_string())
        }
    }
}
