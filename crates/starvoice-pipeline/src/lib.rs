//! Voice setup orchestration for starvoice
//!
//! Implements the two-phase speaker selection flow: an upload is diarized
//! into a per-speaker preview catalogue, the caller picks a speaker, and the
//! selection is assembled into one clip and turned into a persistent voice
//! embedding. State between the two phases rides through the client.

pub mod assembly;
pub mod error;
pub mod pipeline;
pub mod sample;

pub use assembly::VoiceAssemblyService;
pub use error::PipelineError;
pub use pipeline::VoicePipeline;
pub use sample::{SpeakerPreview, SpeakerSampleService, SpeakerUpload};
