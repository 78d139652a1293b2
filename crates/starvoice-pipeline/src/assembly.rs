//! Voice assembly service
//!
//! Second half of the voice setup flow: re-assemble every interval of the
//! chosen speaker into one continuous clip for the voice-cloning model.
//! Unlike the preview step, this uses ALL of the speaker's intervals, in
//! catalogue order.

use std::path::PathBuf;

use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine as _;
use tracing::info;

use starvoice_cloning::ClipStore;
use starvoice_core::{AudioProcessor, SegmentExtractor, SpeakerCatalogue};

use crate::error::PipelineError;

/// Assembles a chosen speaker's intervals into a per-star clip
pub struct VoiceAssemblyService {
    processor: AudioProcessor,
    extractor: SegmentExtractor,
}

impl VoiceAssemblyService {
    /// Create a new assembly service
    pub fn new(processor: AudioProcessor) -> Self {
        Self {
            processor,
            extractor: SegmentExtractor::new(),
        }
    }

    /// Assemble the selected speaker's full voice clip and write it through
    /// the clip store, keyed by star id.
    ///
    /// The speaker lookup happens before any decode or write, so an unknown
    /// id fails without leaving a temp file behind. A prior clip for the
    /// same star is overwritten.
    pub fn assemble(
        &self,
        selected_speaker_id: &str,
        catalogue: &SpeakerCatalogue,
        original_audio_base64: &str,
        star_id: &str,
        store: &ClipStore,
    ) -> Result<PathBuf, PipelineError> {
        let intervals = catalogue
            .get(selected_speaker_id)
            .ok_or_else(|| PipelineError::SpeakerNotFound(selected_speaker_id.to_string()))?;

        let audio_bytes = BASE64
            .decode(original_audio_base64)
            .map_err(|e| PipelineError::InvalidPayload(e.to_string()))?;

        let decoded = self.processor.decode_bytes(&audio_bytes)?;
        let combined = self.extractor.extract(&decoded, intervals);
        let wav = self.processor.encode_wav(&combined)?;

        let path = store.write(star_id, &wav)?;

        info!(
            star_id = %star_id,
            speaker_id = %selected_speaker_id,
            segments = intervals.len(),
            duration_ms = combined.duration_ms(),
            "voice clip assembled"
        );

        Ok(path)
    }
}
