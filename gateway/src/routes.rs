//! Voice setup endpoint handlers

use std::sync::Arc;

use axum::extract::{Multipart, State};
use axum::http::StatusCode;
use axum::Json;
use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine as _;
use serde::{Deserialize, Serialize};
use tracing::info;

use starvoice_cloning::XttsProvider;
use starvoice_core::SpeakerCatalogue;
use starvoice_diarization::ClovaSpeechProvider;
use starvoice_pipeline::{SpeakerUpload, VoicePipeline};

use crate::error::ApiError;

/// Shared gateway state
pub struct AppState {
    pub pipeline: VoicePipeline<ClovaSpeechProvider, XttsProvider>,
}

/// Body of `POST /stars/voice-select`
#[derive(Debug, Deserialize)]
pub struct VoiceSelectRequest {
    pub star_id: String,
    pub speaker_id: String,
    /// The interval map returned by the upload phase, echoed back verbatim
    pub speakers: SpeakerCatalogue,
    pub original_audio_base64: String,
}

/// Response of `POST /stars/voice-select`: the serialized tensor pair
#[derive(Debug, Serialize)]
pub struct VoiceSelectResponse {
    pub conditioning_latent: String,
    pub speaker_embedding: String,
}

pub async fn health() -> &'static str {
    "OK"
}

/// `POST /stars/voice-upload`: diarize an upload into a speaker catalogue.
///
/// Expects a multipart field named `voice_file` carrying the recording.
pub async fn voice_upload(
    State(state): State<Arc<AppState>>,
    mut multipart: Multipart,
) -> Result<Json<SpeakerUpload>, ApiError> {
    let mut voice_file: Option<Vec<u8>> = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| ApiError::bad_request(format!("malformed multipart body: {}", e)))?
    {
        if field.name() == Some("voice_file") {
            let bytes = field
                .bytes()
                .await
                .map_err(|e| ApiError::bad_request(format!("failed to read voice_file: {}", e)))?;
            voice_file = Some(bytes.to_vec());
        }
    }

    let voice_file =
        voice_file.ok_or_else(|| ApiError::bad_request("missing voice_file field"))?;

    info!(bytes = voice_file.len(), "voice upload received");

    let upload = state.pipeline.upload(&voice_file).await?;
    Ok(Json(upload))
}

/// `POST /stars/voice-select`: assemble the chosen speaker's clip and return
/// the serialized voice embedding for the star.
pub async fn voice_select(
    State(state): State<Arc<AppState>>,
    Json(request): Json<VoiceSelectRequest>,
) -> Result<(StatusCode, Json<VoiceSelectResponse>), ApiError> {
    info!(star_id = %request.star_id, speaker_id = %request.speaker_id, "voice selection received");

    let vectors = state
        .pipeline
        .select(
            &request.star_id,
            &request.speaker_id,
            &request.speakers,
            &request.original_audio_base64,
        )
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(VoiceSelectResponse {
            conditioning_latent: BASE64.encode(&vectors.conditioning_latent),
            speaker_embedding: BASE64.encode(&vectors.speaker_embedding),
        }),
    ))
}
