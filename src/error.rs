use std::path::PathBuf;
use std::time::Duration;
use thiserror::Error;
use tower::BoxError;

// Main Application Error Type

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Encoding Error: {0}")]
    Encoding(#[from] EncodingError),
    #[error("Classification Error: {0}")]
    Classification(#[from] ClassificationError),
    #[error("Configuration Error: {0}")]
    Configuration(#[from] ConfigurationError),
    #[error("Analysis is locked out for another {0:?} after a rate-limit response")]
    LockedOut(Duration),
    #[error("Usage: {0}")]
    Usage(String),
    #[error("Failed to serialize report: {0}")]
    Serialization(#[from] serde_json::Error),
}

// Local image read failures. Never retried by the executor.
#[derive(Error, Debug)]
pub enum EncodingError {
    #[error("Failed to read image at {path}: {source}")]
    Unreadable {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Failed to fetch image from {uri}: {reason}")]
    FetchFailed { uri: String, reason: String },
    #[error("Image payload is empty")]
    EmptyPayload,
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ClassificationError {
    #[error("Vision API is not configured: {0}")]
    Config(String),
    #[error("Invalid image data: encoded length {length} is below the minimum of {minimum}")]
    InvalidImage { length: usize, minimum: usize },
    #[error("Unsupported image format: {0}")]
    UnsupportedFormat(String),
    #[error("Network error: {0}")]
    Network(String),
    #[error("Vision API error: {status}")]
    Remote { status: u16, body: String },
    #[error("Malformed vision response: {0}")]
    MalformedResponse(String),
}

impl ClassificationError {
    pub const RATE_LIMITED: u16 = 429;

    /// Recovers the typed error from a failure that travelled through the tower stack.
    pub fn from_service_error(err: BoxError) -> Self {
        match err.downcast::<ClassificationError>() {
            Ok(err) => *err,
            Err(err) if err.is::<tower::timeout::error::Elapsed>() => {
                ClassificationError::Network("request timed out".to_string())
            }
            Err(err) => ClassificationError::Network(err.to_string()),
        }
    }

    pub fn is_rate_limited(&self) -> bool {
        matches!(
            self,
            ClassificationError::Remote { status, .. } if *status == Self::RATE_LIMITED
        )
    }
}

#[derive(Error, Debug)]
pub enum ConfigurationError {
    #[error("Failed to load configuration: {0}")]
    Load(#[from] config::ConfigError),
    #[error("Invalid configuration: {0}")]
    Invalid(String),
}
