//! Interval-addressed segment extraction
//!
//! Slices millisecond ranges out of a decoded recording and concatenates
//! them back-to-back, in the order the intervals are given. Non-contiguous
//! intervals are butted together without crossfade or gap insertion.

use tracing::warn;

use crate::audio::AudioBuffer;
use crate::types::SpeechInterval;

/// Extracts and concatenates interval ranges from a source recording
#[derive(Debug, Default)]
pub struct SegmentExtractor;

impl SegmentExtractor {
    pub fn new() -> Self {
        Self
    }

    /// Extract the given intervals from the source, in list order.
    ///
    /// Slices are `[start, end)` in milliseconds. An interval reaching past
    /// the end of the source is clipped to the available audio; an interval
    /// with `start >= end` contributes nothing and is skipped with a warning.
    pub fn extract(&self, source: &AudioBuffer, intervals: &[SpeechInterval]) -> AudioBuffer {
        let mut output = AudioBuffer::empty(source.sample_rate);

        for interval in intervals {
            if interval.start >= interval.end {
                warn!(
                    speaker_id = %interval.speaker_id,
                    start = interval.start,
                    end = interval.end,
                    "skipping degenerate interval"
                );
                continue;
            }

            let start_sample = source.ms_to_sample(interval.start).min(source.samples.len());
            let end_sample = source.ms_to_sample(interval.end).min(source.samples.len());

            output
                .samples
                .extend_from_slice(&source.samples[start_sample..end_sample]);
        }

        output
    }
}
