//! Error types for the portfolio core.

use thiserror::Error;

/// Result type alias for portfolio operations
pub type FolioResult<T> = Result<T, FolioError>;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FolioError {
    /// Remote fetch or insert failed (network, HTTP status or decode).
    #[error("data unavailable: {0}")]
    DataUnavailable(String),

    /// Video URL does not match any accepted Vimeo shape.
    #[error("invalid video reference: {0}")]
    InvalidVideoReference(String),

    /// Panorama stylesheet or script failed to load.
    #[error("viewer library failed to load: {0}")]
    ViewerLibraryLoadFailure(String),

    #[error("configuration error: {0}")]
    Config(String),
}

impl From<reqwest::Error> for FolioError {
    fn from(err: reqwest::Error) -> Self {
        FolioError::DataUnavailable(err.to_string())
    }
}

impl From<serde_json::Error> for FolioError {
    fn from(err: serde_json::Error) -> Self {
        FolioError::DataUnavailable(format!("decode: {}", err))
    }
}
