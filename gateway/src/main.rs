//! starvoice gateway — HTTP surface for the voice setup pipeline
//!
//! Exposes the two-phase speaker selection flow to the CRUD/API layer:
//! `POST /stars/voice-upload` diarizes a recording into per-speaker
//! previews, `POST /stars/voice-select` turns the chosen speaker into a
//! stored voice embedding.

mod error;
mod routes;

use std::path::PathBuf;
use std::sync::Arc;

use axum::routing::{get, post};
use axum::Router;
use secrecy::SecretString;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use starvoice_cloning::{ClipStore, XttsProvider};
use starvoice_diarization::ClovaSpeechProvider;
use starvoice_pipeline::VoicePipeline;

use routes::AppState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let bind_addr =
        std::env::var("STARVOICE_BIND_ADDR").unwrap_or_else(|_| "127.0.0.1:8000".into());

    let diarization_url = std::env::var("STARVOICE_DIARIZATION_URL")
        .unwrap_or_else(|_| "http://localhost:8010/recognizer/upload".into());
    let diarization_api_key =
        SecretString::new(std::env::var("STARVOICE_DIARIZATION_API_KEY").unwrap_or_default());
    let xtts_url =
        std::env::var("STARVOICE_XTTS_URL").unwrap_or_else(|_| "http://localhost:8020".into());

    let clip_store = match std::env::var("STARVOICE_CLIP_DIR") {
        Ok(dir) => ClipStore::with_root(PathBuf::from(dir)),
        Err(_) => ClipStore::new()?,
    };
    tracing::info!(clip_dir = %clip_store.root().display(), "clip store ready");

    let state = Arc::new(AppState {
        pipeline: VoicePipeline::new(
            ClovaSpeechProvider::new(diarization_url, diarization_api_key),
            XttsProvider::new(xtts_url),
            clip_store,
        ),
    });

    let app = Router::new()
        .route("/health", get(routes::health))
        .route("/stars/voice-upload", post(routes::voice_upload))
        .route("/stars/voice-select", post(routes::voice_select))
        .with_state(state);

    tracing::info!(addr = %bind_addr, "starvoice gateway listening");
    let listener = tokio::net::TcpListener::bind(&bind_addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
