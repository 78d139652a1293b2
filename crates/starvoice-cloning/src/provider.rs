//! Voice model provider trait

use std::path::Path;

use crate::error::CloningError;
use crate::tensor::Tensor;

/// Voice-cloning model provider trait
#[trait_variant::make(VoiceModelProvider: Send)]
pub trait LocalVoiceModelProvider {
    /// Extract conditioning tensors from a reference clip on disk.
    ///
    /// Returns the conditioning latent and the speaker embedding, in that
    /// order. The clip must be a PCM WAV file.
    async fn extract_conditioning(
        &self,
        clip_path: &Path,
    ) -> Result<(Tensor, Tensor), CloningError>;

    /// Synthesize speech for a text using previously extracted tensors.
    ///
    /// Returns WAV bytes.
    async fn synthesize(
        &self,
        text: &str,
        conditioning_latent: &Tensor,
        speaker_embedding: &Tensor,
    ) -> Result<Vec<u8>, CloningError>;

    /// Check if the model serving endpoint is reachable
    async fn is_available(&self) -> bool;

    /// Get provider name
    fn name(&self) -> &'static str;
}
