use std::sync::Arc;

use axum::{
    body::Bytes,
    extract::{DefaultBodyLimit, Path, State},
    http::Method,
    routing::{delete, get, put},
    Json, Router,
};
use serde::Serialize;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::info;

use crate::config::ServerConfig;
use crate::error::ServerError;
use crate::vault::SafeVault;

#[derive(Clone)]
pub struct AppState {
    pub vault: Arc<SafeVault>,
    pub config: Arc<ServerConfig>,
}

pub fn build_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::PUT, Method::DELETE, Method::OPTIONS])
        .allow_headers(Any);

    let body_limit = state.config.max_blob_size;

    Router::new()
        .route("/health", get(health_check))
        .route("/safes/:identifier", put(safe_upload))
        .route("/safes/:identifier", get(safe_download))
        .route("/safes/:identifier", delete(safe_delete))
        .layer(DefaultBodyLimit::max(body_limit))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

#[derive(Serialize)]
struct HealthResponse {
    status: &'static str,
    version: &'static str,
}

#[derive(Serialize)]
struct UploadResponse {
    stored: bool,
    size_bytes: usize,
}

async fn health_check() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        version: env!("CARGO_PKG_VERSION"),
    })
}

/// Store (or replace) the encrypted image for one safe. The body is the raw
/// ciphertext; the server never inspects it.
async fn safe_upload(
    State(state): State<AppState>,
    Path(identifier): Path<String>,
    body: Bytes,
) -> Result<Json<UploadResponse>, ServerError> {
    state.vault.store(&identifier, &body).await?;

    info!(identifier = %identifier, size = body.len(), "Safe uploaded via API");

    Ok(Json(UploadResponse {
        stored: true,
        size_bytes: body.len(),
    }))
}

async fn safe_download(
    State(state): State<AppState>,
    Path(identifier): Path<String>,
) -> Result<Vec<u8>, ServerError> {
    let data = state.vault.get(&identifier).await?;
    Ok(data)
}

async fn safe_delete(
    State(state): State<AppState>,
    Path(identifier): Path<String>,
) -> Result<Json<serde_json::Value>, ServerError> {
    state.vault.delete(&identifier).await?;
    Ok(Json(serde_json::json!({ "deleted": true })))
}

pub async fn serve(state: AppState, addr: std::net::SocketAddr) -> anyhow::Result<()> {
    let app = build_router(state);

    info!(addr = %addr, "Starting HTTP API server");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
