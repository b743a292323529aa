// HTTP + WebSocket routes

mod http;
mod ws;

use axum::{Router, routing::get};
use std::sync::Arc;
use std::sync::atomic::AtomicUsize;
use tower_http::cors::{Any, CorsLayer};

use crate::cache::SnapshotCache;
use crate::config::AppConfig;
use crate::models::SystemIdentity;

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) cache: Arc<SnapshotCache>,
    pub(crate) identity: Arc<SystemIdentity>,
    pub(crate) ws_connections: Arc<AtomicUsize>,
    pub(crate) config: AppConfig,
}

pub fn app(
    cache: Arc<SnapshotCache>,
    identity: Arc<SystemIdentity>,
    ws_connections: Arc<AtomicUsize>,
    config: AppConfig,
) -> Router {
    let state = AppState {
        cache,
        identity,
        ws_connections,
        config,
    };
    Router::new()
        .route("/", get(|| async { "hostmon: live host stats at /api/stats" })) // GET /
        .route("/version", get(http::version_handler)) // GET /version
        .route("/api/info", get(http::api_info_handler)) // GET /api/info
        .route("/api/stats", get(http::api_stats_handler)) // GET /api/stats
        .route("/api/ws", get(ws::ws_stats)) // WS /api/ws
        .layer(CorsLayer::new().allow_origin(Any))
        .with_state(state)
}
