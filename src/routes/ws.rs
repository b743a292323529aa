// WebSocket push: each connection re-reads the latest snapshot on its own
// cadence. Deliberately not a broadcast fan-out: only the newest value is
// ever meaningful, and a slow client only delays itself.

use axum::{
    extract::{
        State,
        ws::{Message, WebSocket, WebSocketUpgrade},
    },
    response::IntoResponse,
};
use std::sync::Arc;
use std::sync::atomic::AtomicUsize;
use tokio::time::{Duration, sleep, timeout};

use super::AppState;
use crate::cache::SnapshotCache;
use crate::collector::effective_interval;

pub(super) const WS_SEND_TIMEOUT: Duration = Duration::from_secs(10);

/// Poll cadence while the cache is still empty after startup. Clients get
/// their first snapshot as soon as the first tick publishes, with no error
/// surfaced for the wait.
pub(super) const EMPTY_CACHE_BACKOFF: Duration = Duration::from_millis(100);

/// Decrements the stream connection count on drop (connect = +1, drop = -1).
struct WsGuard(Arc<AtomicUsize>);

impl Drop for WsGuard {
    fn drop(&mut self) {
        self.0.fetch_sub(1, std::sync::atomic::Ordering::Relaxed);
    }
}

pub(super) async fn ws_stats(
    ws: WebSocketUpgrade,
    State(state): State<AppState>,
) -> impl IntoResponse {
    let cache = state.cache.clone();
    let conn_count = state.ws_connections.clone();
    let interval = effective_interval(state.config.monitoring.sample_interval_ms);
    ws.on_upgrade(move |socket| async move {
        if let Err(e) = stream_stats(socket, cache, interval, conn_count).await {
            tracing::info!("stats stream error: {}", e);
        }
    })
}

/// Read the cache, send, sleep, repeat, for the lifetime of the socket.
/// A send failure terminates this connection's loop only.
async fn stream_stats(
    mut socket: WebSocket,
    cache: Arc<SnapshotCache>,
    interval: Duration,
    conn_count: Arc<AtomicUsize>,
) -> anyhow::Result<()> {
    conn_count.fetch_add(1, std::sync::atomic::Ordering::Relaxed);
    let _guard = WsGuard(conn_count);
    tracing::info!("Client connected to stats stream");

    loop {
        let Some(snapshot) = cache.read() else {
            sleep(EMPTY_CACHE_BACKOFF).await;
            continue;
        };
        let json = serde_json::to_string(snapshot.as_ref())?;
        let r = timeout(WS_SEND_TIMEOUT, socket.send(Message::Text(json.into()))).await;
        if r.is_err() || r.unwrap_or(Ok(())).is_err() {
            break;
        }
        sleep(interval).await;
    }

    tracing::info!("Client disconnected from stats stream");
    Ok(())
}
