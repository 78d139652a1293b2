//! Speaker diarization for starvoice
//!
//! Sends a recording to an external diarization service, parses the segment
//! response into speech intervals, and aggregates them per speaker.

pub mod aggregate;
pub mod error;
pub mod provider;

pub use aggregate::aggregate;
pub use error::DiarizationError;
pub use provider::{ClovaSpeechProvider, DiarizationProvider};

// Re-export types from starvoice-core
pub use starvoice_core::{SpeakerCatalogue, SpeechInterval};
