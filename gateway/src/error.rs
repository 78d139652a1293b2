//! Pipeline-to-HTTP error translation

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;

use starvoice_cloning::CloningError;
use starvoice_pipeline::PipelineError;

/// An error ready to leave as an HTTP response
#[derive(Debug)]
pub struct ApiError {
    status: StatusCode,
    detail: String,
}

impl ApiError {
    pub fn bad_request(detail: impl Into<String>) -> Self {
        Self {
            status: StatusCode::BAD_REQUEST,
            detail: detail.into(),
        }
    }
}

impl From<PipelineError> for ApiError {
    fn from(err: PipelineError) -> Self {
        let status = match &err {
            PipelineError::SpeakerNotFound(_) => StatusCode::NOT_FOUND,
            PipelineError::InvalidPayload(_) | PipelineError::Audio(_) => StatusCode::BAD_REQUEST,
            PipelineError::Diarization(_) => StatusCode::BAD_GATEWAY,
            PipelineError::Cloning(cloning) => match cloning {
                CloningError::RequestFailed(_)
                | CloningError::InvalidResponse(_)
                | CloningError::ConnectionError(_)
                | CloningError::Timeout => StatusCode::BAD_GATEWAY,
                _ => StatusCode::INTERNAL_SERVER_ERROR,
            },
        };

        Self {
            status,
            detail: err.to_string(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        if self.status.is_server_error() {
            tracing::error!(status = %self.status, detail = %self.detail, "request failed");
        } else {
            tracing::warn!(status = %self.status, detail = %self.detail, "request rejected");
        }
        (self.status, Json(json!({ "detail": self.detail }))).into_response()
    }
}
