//! Voice cloning for starvoice
//!
//! Talks to a served voice-cloning model to turn an assembled voice clip into
//! a reusable pair of conditioning tensors, and owns the transient per-star
//! clip files consumed by that step.

pub mod clip_store;
pub mod embedding;
pub mod error;
pub mod provider;
pub mod tensor;
pub mod xtts;

pub use clip_store::ClipStore;
pub use embedding::{VoiceEmbeddingService, VoiceVectors};
pub use error::CloningError;
pub use provider::VoiceModelProvider;
pub use tensor::Tensor;
pub use xtts::XttsProvider;
