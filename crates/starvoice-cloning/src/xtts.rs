//! XTTS serving endpoint client

use std::path::Path;

use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::error::CloningError;
use crate::provider::VoiceModelProvider;
use crate::tensor::Tensor;

/// Client for a served XTTS-style voice-cloning model
///
/// The model is externally owned; this client only moves a clip in and the
/// two conditioning tensors out. Calls are synchronous from the pipeline's
/// perspective and never retried.
pub struct XttsProvider {
    client: Client,
    base_url: String,
}

impl XttsProvider {
    /// Create a new provider against the given serving base URL
    pub fn new(base_url: String) -> Self {
        Self {
            client: Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }
}

impl VoiceModelProvider for XttsProvider {
    async fn extract_conditioning(
        &self,
        clip_path: &Path,
    ) -> Result<(Tensor, Tensor), CloningError> {
        let clip = tokio::fs::read(clip_path).await?;
        debug!(
            bytes = clip.len(),
            path = %clip_path.display(),
            "submitting clip for conditioning extraction"
        );

        let response = self
            .client
            .post(format!("{}/conditioning", self.base_url))
            .header("content-type", "application/octet-stream")
            .body(clip)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();
            warn!("voice model error: {} - {}", status, error_text);
            return Err(CloningError::RequestFailed(format!(
                "{}: {}",
                status, error_text
            )));
        }

        let body: ConditioningResponse = response
            .json()
            .await
            .map_err(|e| CloningError::InvalidResponse(e.to_string()))?;

        info!(
            latent_elements = body.gpt_cond_latent.element_count(),
            embedding_elements = body.speaker_embedding.element_count(),
            "conditioning extraction completed"
        );

        Ok((body.gpt_cond_latent, body.speaker_embedding))
    }

    async fn synthesize(
        &self,
        text: &str,
        conditioning_latent: &Tensor,
        speaker_embedding: &Tensor,
    ) -> Result<Vec<u8>, CloningError> {
        let request = SynthesizeRequest {
            text,
            gpt_cond_latent: conditioning_latent,
            speaker_embedding,
        };

        debug!(chars = text.len(), "requesting speech synthesis");

        let response = self
            .client
            .post(format!("{}/synthesize", self.base_url))
            .json(&request)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();
            warn!("voice model error: {} - {}", status, error_text);
            return Err(CloningError::RequestFailed(format!(
                "{}: {}",
                status, error_text
            )));
        }

        Ok(response.bytes().await?.to_vec())
    }

    async fn is_available(&self) -> bool {
        self.client
            .get(format!("{}/health", self.base_url))
            .send()
            .await
            .map(|r| r.status().is_success())
            .unwrap_or(false)
    }

    fn name(&self) -> &'static str {
        "XTTS"
    }
}

#[derive(Serialize)]
struct SynthesizeRequest<'a> {
    text: &'a str,
    gpt_cond_latent: &'a Tensor,
    speaker_embedding: &'a Tensor,
}

#[derive(Deserialize)]
struct ConditioningResponse {
    gpt_cond_latent: Tensor,
    speaker_embedding: Tensor,
}
