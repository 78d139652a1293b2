//! Shared type definitions

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// One labeled speech span inside a source recording.
///
/// Offsets are milliseconds from the start of the recording. Speaker ids are
/// canonically strings; diarization labels that arrive as numbers are
/// normalized at the parse boundary and never escape it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SpeechInterval {
    /// Speaker label, unique within one diarization run
    pub speaker_id: String,
    /// Start offset in milliseconds
    pub start: f64,
    /// End offset in milliseconds
    pub end: f64,
    /// Diarizer confidence score (informational only)
    pub confidence: f64,
}

impl SpeechInterval {
    /// Get the duration of this interval in milliseconds
    pub fn duration(&self) -> f64 {
        self.end - self.start
    }
}

/// All intervals of one diarization run, bucketed per speaker.
///
/// Bucket values keep the diarizer's emission order; buckets are non-empty
/// by construction.
pub type SpeakerCatalogue = BTreeMap<String, Vec<SpeechInterval>>;

/// The longest interval per speaker, used as the preview clip.
pub type RepresentativeMap = BTreeMap<String, SpeechInterval>;
