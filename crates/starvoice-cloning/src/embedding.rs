//! Voice embedding service
//!
//! Turns an assembled clip into the serialized tensor pair a star entity
//! stores. The temp clip is consumed here: cleanup runs whether the model
//! call succeeded or not, and a clip missing at cleanup time is an error in
//! its own right.

use tracing::{info, warn};

use crate::clip_store::ClipStore;
use crate::error::CloningError;
use crate::provider::VoiceModelProvider;

/// Serialized conditioning tensors, ready for storage on a star entity
#[derive(Debug, Clone, PartialEq)]
pub struct VoiceVectors {
    /// Conditioning latent, MessagePack bytes
    pub conditioning_latent: Vec<u8>,
    /// Speaker embedding, MessagePack bytes
    pub speaker_embedding: Vec<u8>,
}

/// Extracts and serializes voice embeddings from assembled clips
pub struct VoiceEmbeddingService<P: VoiceModelProvider> {
    provider: P,
}

impl<P: VoiceModelProvider> VoiceEmbeddingService<P> {
    /// Create a new service over the given voice model provider
    pub fn new(provider: P) -> Self {
        Self { provider }
    }

    /// Extract the conditioning tensors for a star's assembled clip.
    ///
    /// The clip is removed after the provider call completes, on success and
    /// on failure alike. When both the provider call and the cleanup fail,
    /// the provider error propagates and the cleanup failure is logged.
    pub async fn embed(
        &self,
        store: &ClipStore,
        star_id: &str,
    ) -> Result<VoiceVectors, CloningError> {
        let clip_path = store.clip_path(star_id);

        let extraction = self.provider.extract_conditioning(&clip_path).await;
        let cleanup = store.remove(star_id);

        let (latent, embedding) = match (extraction, cleanup) {
            (Ok(tensors), Ok(())) => tensors,
            (Ok(_), Err(cleanup_err)) => return Err(cleanup_err),
            (Err(extract_err), Ok(())) => return Err(extract_err),
            (Err(extract_err), Err(cleanup_err)) => {
                warn!(star_id = %star_id, error = %cleanup_err, "clip cleanup failed after extraction error");
                return Err(extract_err);
            }
        };

        info!(star_id = %star_id, provider = self.provider.name(), "voice embedding extracted");

        Ok(VoiceVectors {
            conditioning_latent: latent.to_bytes()?,
            speaker_embedding: embedding.to_bytes()?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tensor::Tensor;
    use std::path::Path;

    struct FakeProvider {
        fail: bool,
    }

    impl VoiceModelProvider for FakeProvider {
        async fn extract_conditioning(
            &self,
            _clip_path: &Path,
        ) -> Result<(Tensor, Tensor), CloningError> {
            if self.fail {
                return Err(CloningError::RequestFailed("injected fault".to_string()));
            }
            Ok((
                Tensor {
                    shape: vec![1, 4],
                    data: vec![0.1, 0.2, 0.3, 0.4],
                },
                Tensor {
                    shape: vec![2],
                    data: vec![1.0, -1.0],
                },
            ))
        }

        async fn synthesize(
            &self,
            _text: &str,
            _conditioning_latent: &Tensor,
            _speaker_embedding: &Tensor,
        ) -> Result<Vec<u8>, CloningError> {
            Ok(Vec::new())
        }

        async fn is_available(&self) -> bool {
            true
        }

        fn name(&self) -> &'static str {
            "Fake"
        }
    }

    fn temp_store() -> (tempfile::TempDir, ClipStore) {
        let dir = tempfile::tempdir().unwrap();
        let store = ClipStore::with_root(dir.path().to_path_buf());
        (dir, store)
    }

    #[tokio::test]
    async fn test_embed_returns_serialized_tensors_and_removes_clip() {
        let (_dir, store) = temp_store();
        store.write("9", b"clip bytes").unwrap();

        let service = VoiceEmbeddingService::new(FakeProvider { fail: false });
        let vectors = service.embed(&store, "9").await.unwrap();

        let latent = Tensor::from_bytes(&vectors.conditioning_latent).unwrap();
        assert_eq!(latent.shape, vec![1, 4]);
        assert!(!store.exists("9"));
    }

    #[tokio::test]
    async fn test_cleanup_runs_even_when_extraction_fails() {
        let (_dir, store) = temp_store();
        store.write("9", b"clip bytes").unwrap();

        let service = VoiceEmbeddingService::new(FakeProvider { fail: true });
        let result = service.embed(&store, "9").await;

        // The provider error propagates, and the clip is still gone
        assert!(matches!(result, Err(CloningError::RequestFailed(_))));
        assert!(!store.exists("9"));
    }

    #[tokio::test]
    async fn test_missing_clip_surfaces_cleanup_error() {
        let (_dir, store) = temp_store();

        let service = VoiceEmbeddingService::new(FakeProvider { fail: false });
        let result = service.embed(&store, "9").await;

        // The fake never touches the disk, so extraction succeeds and the
        // missing clip shows up at cleanup time
        assert!(matches!(result, Err(CloningError::CleanupFailed(_))));
    }
}
