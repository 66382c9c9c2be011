//! HTTP liveness endpoints.
//!
//! Spawned as a background task by the gateway.

use axum::{extract::State, response::Json, routing::get, Router};
use linkwatch_core::config::ApiConfig;
use linkwatch_tracker::Registry;
use serde_json::{json, Value};
use std::sync::Arc;
use std::time::Instant;
use tokio::sync::Mutex;
use tracing::{error, info};

/// Shared state for API handlers.
#[derive(Clone)]
pub struct ApiState {
    registry: Arc<Mutex<Registry>>,
    uptime: Instant,
}

/// `GET /`: plain liveness probe.
async fn root() -> Json<Value> {
    Json(json!({ "status": "Bot is running!" }))
}

/// `GET /api/health`: uptime and number of connected chats.
async fn health(State(state): State<ApiState>) -> Json<Value> {
    let tracked_chats = state.registry.lock().await.len();
    Json(json!({
        "status": "ok",
        "uptime_secs": state.uptime.elapsed().as_secs(),
        "tracked_chats": tracked_chats,
    }))
}

fn build_router(state: ApiState) -> Router {
    Router::new()
        .route("/", get(root))
        .route("/api/health", get(health))
        .with_state(state)
}

/// Start the API server. Called from `Gateway::run_until()`.
pub async fn serve(config: ApiConfig, registry: Arc<Mutex<Registry>>, uptime: Instant) {
    let app = build_router(ApiState { registry, uptime });
    let addr = format!("{}:{}", config.host, config.port);

    let listener = match tokio::net::TcpListener::bind(&addr).await {
        Ok(l) => l,
        Err(e) => {
            error!("API server failed to bind to {addr}: {e}");
            return;
        }
    };

    info!("API server listening on {addr}");

    if let Err(e) = axum::serve(listener, app).await {
        error!("API server error: {e}");
    }
}
