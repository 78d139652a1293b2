//! Diarization error types

use thiserror::Error;

/// Diarization-related errors
#[derive(Error, Debug)]
pub enum DiarizationError {
    /// Service returned a non-success status
    #[error("Diarization request failed: {0}")]
    RequestFailed(String),

    /// Response body could not be parsed
    #[error("Invalid diarization response: {0}")]
    InvalidResponse(String),

    /// Connection error
    #[error("Connection error: {0}")]
    ConnectionError(String),

    /// Timeout
    #[error("Diarization request timed out")]
    Timeout,
}

impl From<reqwest::Error> for DiarizationError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            DiarizationError::Timeout
        } else if err.is_connect() {
            DiarizationError::ConnectionError(err.to_string())
        } else {
            DiarizationError::RequestFailed(err.to_string())
        }
    }
}
