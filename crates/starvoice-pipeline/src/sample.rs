//! Speaker sample service
//!
//! First half of the two-phase voice setup flow: diarize an uploaded
//! recording and return a per-speaker preview catalogue. Everything the
//! second phase needs (the full interval map and the original audio) rides
//! back to the client in the response; nothing is kept server-side.

use std::collections::BTreeMap;

use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine as _;
use serde::{Deserialize, Serialize};
use tracing::info;

use starvoice_core::{AudioProcessor, SegmentExtractor, SpeakerCatalogue, SpeechInterval};
use starvoice_diarization::{aggregate, DiarizationProvider};

use crate::error::PipelineError;

/// One speaker's preview: the representative interval and its audio
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SpeakerPreview {
    /// The longest interval for this speaker
    pub interval: SpeechInterval,
    /// Extracted preview audio, base64 WAV
    pub audio_base64: String,
}

/// Result of the upload phase
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SpeakerUpload {
    /// Number of distinct speakers detected
    pub speaker_count: usize,
    /// Full interval map, echoed back by the client on selection
    pub speakers: SpeakerCatalogue,
    /// Playable preview per speaker
    pub previews: BTreeMap<String, SpeakerPreview>,
    /// Canonical WAV of the whole upload, base64, echoed back on selection
    pub original_audio_base64: String,
}

/// Builds the per-speaker preview catalogue for an uploaded recording
pub struct SpeakerSampleService<D: DiarizationProvider> {
    provider: D,
    processor: AudioProcessor,
    extractor: SegmentExtractor,
}

impl<D: DiarizationProvider> SpeakerSampleService<D> {
    /// Create a new service over the given diarization provider
    pub fn new(provider: D, processor: AudioProcessor) -> Self {
        Self {
            provider,
            processor,
            extractor: SegmentExtractor::new(),
        }
    }

    /// Diarize an uploaded recording and build the speaker catalogue.
    ///
    /// The upload is decoded once and re-encoded as canonical WAV; that WAV
    /// is what the diarizer sees and what the client carries into the
    /// selection phase. Every returned speaker id has a playable preview
    /// attached. Writes nothing durable.
    pub async fn build_catalogue(
        &self,
        original_audio: &[u8],
    ) -> Result<SpeakerUpload, PipelineError> {
        let decoded = self.processor.decode_bytes(original_audio)?;
        let canonical_wav = self.processor.encode_wav(&decoded)?;

        let intervals = self.provider.diarize(&canonical_wav).await?;
        let (speakers, representatives) = aggregate(intervals);

        let mut previews = BTreeMap::new();
        for (speaker_id, interval) in representatives {
            let clip = self
                .extractor
                .extract(&decoded, std::slice::from_ref(&interval));
            let wav = self.processor.encode_wav(&clip)?;
            previews.insert(
                speaker_id,
                SpeakerPreview {
                    interval,
                    audio_base64: BASE64.encode(&wav),
                },
            );
        }

        info!(
            speakers = speakers.len(),
            duration_ms = decoded.duration_ms(),
            "speaker catalogue built"
        );

        Ok(SpeakerUpload {
            speaker_count: speakers.len(),
            speakers,
            previews,
            original_audio_base64: BASE64.encode(&canonical_wav),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use starvoice_core::AudioBuffer;
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
            samples: (0..ms * 16).map(|i| ((i % 64) as f32 - 32.0) / 64.0).collect(),
            sample_rate: 16000,
        };
        processor.encode_wav(&buffer).unwrap()
    }

    #[tokio::test]
    async fn test_every_speaker_gets_a_playable_preview() {
        let service = SpeakerSampleService::new(
            FakeDiarizer {
                intervals: vec![
                    interval("1", 0.0, 400.0),
                    interval("2", 500.0, 700.0),
                    interval("1", 800.0, 900.0),
                ],
            },
            AudioProcessor::default(),
        );

        let upload = service.build_catalogue(&source_wav(1000)).await.unwrap();

        assert_eq!(upload.speaker_count, 2);
        assert_eq!(upload.speakers["1"].len(), 2);
        for (speaker_id, preview) in &upload.previews {
            let wav = BASE64.decode(&preview.audio_base64).unwrap();
            let decoded = AudioProcessor::default().decode_bytes(&wav).unwrap();
            assert!(!decoded.samples.is_empty(), "speaker {} preview is empty", speaker_id);
        }
        // Speaker 1's preview is its longest interval
        assert_eq!(upload.previews["1"].interval.start, 0.0);
        assert_eq!(upload.previews["1"].interval.end, 400.0);
    }

    #[tokio::test]
    async fn test_original_audio_round_trips_as_canonical_wav() {
        let service = SpeakerSampleService::new(
            FakeDiarizer {
                intervals: vec![interval("1", 0.0, 100.0)],
            },
            AudioProcessor::default(),
        );

        let upload = service.build_catalogue(&source_wav(500)).await.unwrap();

        let original = BASE64.decode(&upload.original_audio_base64).unwrap();
        assert_eq!(&original[..4], b"RIFF");
        let decoded = AudioProcessor::default().decode_bytes(&original).unwrap();
        assert!((decoded.duration_ms() - 500.0).abs() < 1.0);
    }

    #[tokio::test]
    async fn test_empty_diarization_yields_empty_catalogue() {
        let service = SpeakerSampleService::new(
            FakeDiarizer {
                intervals: Vec::new(),
            },
            AudioProcessor::default(),
        );

        let upload = service.build_catalogue(&source_wav(200)).await.unwrap();

        assert_eq!(upload.speaker_count, 0);
        assert!(upload.speakers.is_empty());
        assert!(upload.previews.is_empty());
    }
}
