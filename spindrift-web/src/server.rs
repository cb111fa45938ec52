//! HTTP server wiring for Spindrift.
//!
//! Builds the production resolver from configuration and exposes it over
//! a small axum router.

use std::net::SocketAddr;
use std::sync::Arc;

use axum::Router;
use axum::routing::get;
use spindrift_core::SpindriftConfig;
use spindrift_core::resolver::AudioResolver;
use tower_http::cors::CorsLayer;

use crate::handlers::{health, stream_audio, stream_missing_id};

/// Shared application state handed to every handler.
#[derive(Clone)]
pub struct AppState {
    pub resolver: Arc<AudioResolver>,
}

/// Builds the router over an already-constructed state.
///
/// Split from `run_server` so tests can drive the full HTTP surface with
/// fake resolvers and no listener.
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/stream/{video_id}", get(stream_audio))
        // Identifier absent entirely; same fixed 400 as a blank one.
        .route("/stream", get(stream_missing_id))
        .route("/stream/", get(stream_missing_id))
        .route("/health", get(health))
        .layer(CorsLayer::permissive())
        .with_state(state)
}

/// Runs the resolution server until the listener fails.
///
/// # Errors
///
/// - `Box<dyn std::error::Error>` - Invalid provider configuration, bind
///   failure, or serve failure
pub async fn run_server(
    config: SpindriftConfig,
    addr: SocketAddr,
) -> Result<(), Box<dyn std::error::Error>> {
    let resolver = Arc::new(AudioResolver::from_config(&config)?);
    let state = AppState { resolver };

    let app = build_router(state);

    tracing::info!("Spindrift audio server running on http://{addr}");
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;
    Ok(())
}
