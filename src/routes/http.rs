// GET handlers: version, identity, latest snapshot

use axum::{extract::State, http::StatusCode, response::IntoResponse};

use super::AppState;
use crate::version::{NAME, VERSION};

/// GET /version — returns service name and version (from Cargo.toml at build time).
pub(super) async fn version_handler() -> impl IntoResponse {
    axum::Json(serde_json::json!({
        "name": NAME,
        "version": VERSION,
    }))
}

/// GET /api/info — returns static system identity (fetch once; never re-queried).
pub(super) async fn api_info_handler(State(state): State<AppState>) -> impl IntoResponse {
    axum::Json(state.identity.as_ref().clone())
}

/// GET /api/stats — one cache read per request. 503 until the first tick
/// publishes; a retryable condition, not a fault.
pub(super) async fn api_stats_handler(State(state): State<AppState>) -> axum::response::Response {
    match state.cache.read() {
        Some(snapshot) => axum::Json(snapshot.as_ref().clone()).into_response(),
        None => (StatusCode::SERVICE_UNAVAILABLE, "stats not yet available").into_response(),
    }
}
