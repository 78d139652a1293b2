//! starvoice-core - shared types and audio plumbing for the voice pipeline
//!
//! Provides the speech-interval model, audio decoding/encoding, and
//! interval-addressed segment extraction.

pub mod audio;
pub mod extractor;
pub mod types;

pub use audio::{AudioBuffer, AudioError, AudioProcessor};
pub use extractor::SegmentExtractor;
pub use types::*;
