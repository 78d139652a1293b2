//! Pipeline error types

use thiserror::Error;

use starvoice_cloning::CloningError;
use starvoice_core::AudioError;
use starvoice_diarization::DiarizationError;

/// Voice pipeline errors
#[derive(Error, Debug)]
pub enum PipelineError {
    /// Selected speaker id absent from the supplied catalogue
    ///
    /// The id space only lines up when both requests derive from the same
    /// diarization run; a stale or mismatched id is a client error.
    #[error("Speaker not found: {0}")]
    SpeakerNotFound(String),

    /// Client-supplied payload could not be decoded
    #[error("Invalid audio payload: {0}")]
    InvalidPayload(String),

    /// Audio processing error
    #[error("Audio processing error: {0}")]
    Audio(#[from] AudioError),

    /// Diarization error
    #[error("Diarization error: {0}")]
    Diarization(#[from] DiarizationError),

    /// Voice cloning error
    #[error("Voice cloning error: {0}")]
    Cloning(#[from] CloningError),
}
