//! The outward upload/select surface
//!
//! Ties the sample, assembly, and embedding services together behind the two
//! operations the API layer calls. The flow is stateless between the two
//! calls: the catalogue and the original audio ride through the client.

use tracing::info;

use starvoice_cloning::{ClipStore, VoiceEmbeddingService, VoiceModelProvider, VoiceVectors};
use starvoice_core::{AudioProcessor, SpeakerCatalogue};
use starvoice_diarization::DiarizationProvider;

use crate::assembly::VoiceAssemblyService;
use crate::error::PipelineError;
use crate::sample::{SpeakerSampleService, SpeakerUpload};

/// The voice setup pipeline: upload, preview, select, embed
pub struct VoicePipeline<D: DiarizationProvider, V: VoiceModelProvider> {
    samples: SpeakerSampleService<D>,
    assembly: VoiceAssemblyService,
    embeddings: VoiceEmbeddingService<V>,
    clip_store: ClipStore,
}

impl<D: DiarizationProvider, V: VoiceModelProvider> VoicePipeline<D, V> {
    /// Create a pipeline over the given providers and clip store
    pub fn new(diarization: D, voice_model: V, clip_store: ClipStore) -> Self {
        Self {
            samples: SpeakerSampleService::new(diarization, AudioProcessor::default()),
            assembly: VoiceAssemblyService::new(AudioProcessor::default()),
            embeddings: VoiceEmbeddingService::new(voice_model),
            clip_store,
        }
    }

    /// Phase one: diarize an upload and return the speaker catalogue with
    /// per-speaker previews and the canonical original audio.
    pub async fn upload(&self, original_audio: &[u8]) -> Result<SpeakerUpload, PipelineError> {
        self.samples.build_catalogue(original_audio).await
    }

    /// Phase two: assemble the chosen speaker's full clip and extract the
    /// voice embedding for the star.
    ///
    /// `speakers` and `original_audio_base64` must be the values returned by
    /// [`upload`](Self::upload); the speaker id space is only meaningful
    /// within one diarization run. The assembled clip is consumed by the
    /// embedding step and removed afterwards. Persisting the returned
    /// vectors on the star entity is the caller's responsibility.
    pub async fn select(
        &self,
        star_id: &str,
        selected_speaker_id: &str,
        speakers: &SpeakerCatalogue,
        original_audio_base64: &str,
    ) -> Result<VoiceVectors, PipelineError> {
        self.assembly.assemble(
            selected_speaker_id,
            speakers,
            original_audio_base64,
            star_id,
            &self.clip_store,
        )?;

        let vectors = self.embeddings.embed(&self.clip_store, star_id).await?;

        info!(star_id = %star_id, speaker_id = %selected_speaker_id, "voice selection completed");
        Ok(vectors)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::Path;

    use base64::engine::general_purpose::STANDARD as BASE64;
    use base64::Engine as _;

    use starvoice_cloning::{CloningError, Tensor};
    use starvoice_core::{AudioBuffer, SpeechInterval};
    use starvoice_diarization::DiarizationError;

    struct FakeDiarizer {
        intervals: Vec<SpeechInterval>,
    }

    impl DiarizationProvider for FakeDiarizer {
        async fn diarize(
            &self,
            _audio_wav: &[u8],
        ) -> Result<Vec<SpeechInterval>, DiarizationError> {
            Ok(self.intervals.clone())
        }

        async fn is_available(&self) -> bool {
            true
        }

        fn name(&self) -> &'static str {
            "Fake"
        }
    }

    struct FakeVoiceModel;

    impl VoiceModelProvider for FakeVoiceModel {
        async fn extract_conditioning(
            &self,
            clip_path: &Path,
        ) -> Result<(Tensor, Tensor), CloningError> {
            // Reads the clip like the real provider would
            let bytes = std::fs::read(clip_path)?;
            Ok((
                Tensor {
                    shape: vec![1],
                    data: vec![bytes.len() as f32],
                },
                Tensor {
                    shape: vec![1],
                    data: vec![1.0],
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

    fn interval(speaker_id: &str, start: f64, end: f64) -> SpeechInterval {
        SpeechInterval {
            speaker_id: speaker_id.to_string(),
            start,
            end,
            confidence: 0.9,
        }
    }

    fn source_wav(ms: usize) -> Vec<u8> {
        let processor = AudioProcessor::default();
        let buffer = AudioBuffer {
            samples: (0..ms * 16).map(|i| ((i % 48) as f32 - 24.0) / 48.0).collect(),
            sample_rate: 16000,
        };
        processor.encode_wav(&buffer).unwrap()
    }

    fn pipeline(
        intervals: Vec<SpeechInterval>,
        root: &Path,
    ) -> VoicePipeline<FakeDiarizer, FakeVoiceModel> {
        VoicePipeline::new(
            FakeDiarizer { intervals },
            FakeVoiceModel,
            ClipStore::with_root(root.to_path_buf()),
        )
    }

    #[tokio::test]
    async fn test_upload_then_select_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let pipeline = pipeline(
            vec![
                interval("1", 0.0, 300.0),
                interval("2", 400.0, 600.0),
                interval("1", 700.0, 800.0),
            ],
            dir.path(),
        );

        let upload = pipeline.upload(&source_wav(1000)).await.unwrap();
        assert_eq!(upload.speaker_count, 2);

        let vectors = pipeline
            .select("42", "1", &upload.speakers, &upload.original_audio_base64)
            .await
            .unwrap();

        assert!(Tensor::from_bytes(&vectors.conditioning_latent).is_ok());
        assert!(Tensor::from_bytes(&vectors.speaker_embedding).is_ok());
        // The clip was consumed by the embedding step
        assert!(!dir.path().join("42_combined_voice_file.wav").exists());
    }

    #[tokio::test]
    async fn test_select_with_stale_speaker_id_leaves_no_clip() {
        let dir = tempfile::tempdir().unwrap();
        let pipeline = pipeline(vec![interval("1", 0.0, 300.0)], dir.path());

        let upload = pipeline.upload(&source_wav(500)).await.unwrap();
        let result = pipeline
            .select("42", "99", &upload.speakers, &upload.original_audio_base64)
            .await;

        assert!(matches!(result, Err(PipelineError::SpeakerNotFound(_))));
        assert!(!dir.path().join("42_combined_voice_file.wav").exists());
    }
}
