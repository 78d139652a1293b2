//! Voice cloning error types

use thiserror::Error;

/// Voice cloning errors
#[derive(Error, Debug)]
pub enum CloningError {
    /// Model serving endpoint returned a failure
    #[error("Voice model request failed: {0}")]
    RequestFailed(String),

    /// Response body could not be parsed
    #[error("Invalid voice model response: {0}")]
    InvalidResponse(String),

    /// Tensor (de)serialization failed
    #[error("Tensor serialization error: {0}")]
    Serialization(String),

    /// Temp clip cleanup failed
    ///
    /// A clip missing at cleanup time points at an earlier silent failure,
    /// so this is surfaced instead of swallowed.
    #[error("Clip cleanup failed: {0}")]
    CleanupFailed(String),

    /// Clip store directory could not be resolved
    #[error("Failed to access clip directory: {0}")]
    ClipDirectoryError(String),

    /// Connection error
    #[error("Connection error: {0}")]
    ConnectionError(String),

    /// Timeout
    #[error("Voice model request timed out")]
    Timeout,

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<reqwest::Error> for CloningError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            CloningError::Timeout
        } else if err.is_connect() {
            CloningError::ConnectionError(err.to_string())
        } else {
            CloningError::RequestFailed(err.to_string())
        }
    }
}
