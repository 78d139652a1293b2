//! Diarization provider trait and Clova Speech client

use reqwest::Client;
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Deserializer};
use tracing::{debug, info, warn};

use starvoice_core::SpeechInterval;

use crate::error::DiarizationError;

const API_KEY_HEADER: &str = "X-CLOVASPEECH-API-KEY";

/// Diarization provider trait
#[trait_variant::make(DiarizationProvider: Send)]
pub trait LocalDiarizationProvider {
    /// Diarize a WAV recording into per-speaker intervals
    async fn diarize(&self, audio_wav: &[u8]) -> Result<Vec<SpeechInterval>, DiarizationError>;

    /// Check if the provider is reachable
    async fn is_available(&self) -> bool;

    /// Get provider name
    fn name(&self) -> &'static str;
}

/// Clova Speech-style diarization client
///
/// Submits the recording synchronously and treats any non-success status or
/// unparsable body as fatal for the request. Diarization is idempotent and
/// cheap to re-invoke, so there is no retry here.
pub struct ClovaSpeechProvider {
    client: Client,
    endpoint: String,
    api_key: SecretString,
}

impl ClovaSpeechProvider {
    /// Create a new provider against the given recognizer endpoint
    pub fn new(endpoint: String, api_key: SecretString) -> Self {
        Self {
            client: Client::new(),
            endpoint,
            api_key,
        }
    }
}

impl DiarizationProvider for ClovaSpeechProvider {
    async fn diarize(&self, audio_wav: &[u8]) -> Result<Vec<SpeechInterval>, DiarizationError> {
        debug!(bytes = audio_wav.len(), "submitting recording for diarization");

        let response = self
            .client
            .post(&self.endpoint)
            .header(API_KEY_HEADER, self.api_key.expose_secret())
            .header("content-type", "application/octet-stream")
            .query(&[("completion", "sync")])
            .body(audio_wav.to_vec())
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();
            warn!("diarization service error: {} - {}", status, error_text);
            return Err(DiarizationError::RequestFailed(format!(
                "{}: {}",
                status, error_text
            )));
        }

        let body = response.text().await?;
        let intervals = parse_response(&body)?;

        info!(intervals = intervals.len(), "diarization completed");
        Ok(intervals)
    }

    async fn is_available(&self) -> bool {
        self.client
            .get(&self.endpoint)
            .header(API_KEY_HEADER, self.api_key.expose_secret())
            .send()
            .await
            .is_ok()
    }

    fn name(&self) -> &'static str {
        "ClovaSpeech"
    }
}

/// Parse a diarization response body into a flat, ordered interval list.
///
/// No validation beyond type coercion: a malformed document fails the whole
/// request, since a partial diarization result is unusable.
pub fn parse_response(body: &str) -> Result<Vec<SpeechInterval>, DiarizationError> {
    let response: DiarizationResponse = serde_json::from_str(body)
        .map_err(|e| DiarizationError::InvalidResponse(e.to_string()))?;

    Ok(response
        .segments
        .into_iter()
        .map(|seg| SpeechInterval {
            speaker_id: seg.diarization.label,
            start: seg.start,
            end: seg.end,
            confidence: seg.confidence,
        })
        .collect())
}

#[derive(Deserialize)]
struct DiarizationResponse {
    segments: Vec<SegmentRecord>,
}

#[derive(Deserialize)]
struct SegmentRecord {
    start: f64,
    end: f64,
    confidence: f64,
    diarization: DiarizationField,
}

#[derive(Deserialize)]
struct DiarizationField {
    #[serde(deserialize_with = "label_as_string")]
    label: String,
}

/// Normalize speaker labels to strings at the parse boundary.
///
/// Depending on service version the label arrives as a JSON string or a
/// number; callers only ever see the string form.
fn label_as_string<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Label {
        Text(String),
        Number(i64),
    }

    Ok(match Label::deserialize(deserializer)? {
        Label::Text(s) => s,
        Label::Number(n) => n.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_response() {
        let body = r#"{
            "segments": [
                {"start": 0, "end": 1200, "confidence": 0.93, "diarization": {"label": "1"}},
                {"start": 1500, "end": 2400, "confidence": 0.88, "diarization": {"label": "2"}}
            ]
        }"#;

        let intervals = parse_response(body).unwrap();

        assert_eq!(intervals.len(), 2);
        assert_eq!(intervals[0].speaker_id, "1");
        assert!((intervals[0].start - 0.0).abs() < f64::EPSILON);
        assert!((intervals[0].end - 1200.0).abs() < f64::EPSILON);
        assert_eq!(intervals[1].speaker_id, "2");
    }

    #[test]
    fn test_numeric_labels_normalize_to_strings() {
        let body = r#"{
            "segments": [
                {"start": 0, "end": 500, "confidence": 0.9, "diarization": {"label": 3}}
            ]
        }"#;

        let intervals = parse_response(body).unwrap();

        assert_eq!(intervals[0].speaker_id, "3");
    }

    #[test]
    fn test_malformed_body_is_fatal() {
        assert!(matches!(
            parse_response("not json"),
            Err(DiarizationError::InvalidResponse(_))
        ));
        assert!(matches!(
            parse_response(r#"{"segments": [{"start": 0}]}"#),
            Err(DiarizationError::InvalidResponse(_))
        ));
    }
}
