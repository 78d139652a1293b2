//! Group diarization intervals per speaker and pick representative samples

use starvoice_core::{RepresentativeMap, SpeakerCatalogue, SpeechInterval};

/// Bucket intervals per speaker and select one representative per bucket.
///
/// Buckets preserve the diarizer's emission order. The representative is the
/// interval with the longest duration; the scan replaces its candidate only
/// on a strictly greater duration, so the FIRST maximal interval wins ties.
/// An empty input yields empty maps.
pub fn aggregate(intervals: Vec<SpeechInterval>) -> (SpeakerCatalogue, RepresentativeMap) {
    let mut catalogue = SpeakerCatalogue::new();
    for interval in intervals {
        catalogue
            .entry(interval.speaker_id.clone())
            .or_default()
            .push(interval);
    }

    let mut representatives = RepresentativeMap::new();
    for (speaker_id, bucket) in &catalogue {
        let mut max_duration = 0.0;
        let mut best: Option<&SpeechInterval> = None;

        for interval in bucket {
            if interval.duration() > max_duration {
                max_duration = interval.duration();
                best = Some(interval);
            }
        }

        if let Some(best) = best {
            representatives.insert(speaker_id.clone(), best.clone());
        }
    }

    (catalogue, representatives)
}
