// Integration tests: HTTP and WebSocket endpoints over the snapshot cache

mod common;

use axum_test::TestServer;
use common::{minimal_snapshot, test_identity};
use hostmon::cache::SnapshotCache;
use hostmon::config::AppConfig;
use hostmon::models::Snapshot;
use hostmon::routes;
use std::sync::Arc;
use std::sync::atomic::AtomicUsize;

const TEST_CONFIG: &str = r#"
[server]
port = 8081
host = "0.0.0.0"

[monitoring]
sample_interval_ms = 100
disk_path = "/"
stats_log_interval_secs = 60
"#;

fn test_app() -> (axum::Router, Arc<SnapshotCache>) {
    let config = AppConfig::load_from_str(TEST_CONFIG).unwrap();
    let cache = Arc::new(SnapshotCache::new());
    let app = routes::app(
        cache.clone(),
        Arc::new(test_identity()),
        Arc::new(AtomicUsize::new(0)),
        config,
    );
    (app, cache)
}

/// Build TestServer with http_transport (required for WebSocket tests).
fn test_server_with_http() -> (TestServer, Arc<SnapshotCache>) {
    let (app, cache) = test_app();
    let server = TestServer::builder().http_transport().build(app);
    (server, cache)
}

#[tokio::test]
async fn test_root_endpoint() {
    let (app, _) = test_app();
    let server = TestServer::new(app);
    let response = server.get("/").await;
    response.assert_status_ok();
    response.assert_text("hostmon: live host stats at /api/stats");
}

#[tokio::test]
async fn test_version_endpoint() {
    let (app, _) = test_app();
    let server = TestServer::new(app);
    let response = server.get("/version").await;
    response.assert_status_ok();
    let json: serde_json::Value = response.json();
    assert_eq!(json.get("name").and_then(|v| v.as_str()), Some("hostmon"));
    assert!(json.get("version").and_then(|v| v.as_str()).is_some());
}

#[tokio::test]
async fn test_api_info_returns_identity() {
    let (app, _) = test_app();
    let server = TestServer::new(app);
    let response = server.get("/api/info").await;
    response.assert_status_ok();
    let json: serde_json::Value = response.json();
    assert_eq!(
        json.get("hostname").and_then(|v| v.as_str()),
        Some("test-host")
    );
    assert_eq!(
        json.get("cpuModel").and_then(|v| v.as_str()),
        Some("Test CPU")
    );
}

#[tokio::test]
async fn test_api_stats_unavailable_before_first_tick() {
    let (app, _) = test_app();
    let server = TestServer::new(app);
    let response = server.get("/api/stats").await;
    response.assert_status(axum::http::StatusCode::SERVICE_UNAVAILABLE);
}

#[tokio::test]
async fn test_api_stats_returns_latest_snapshot() {
    let (app, cache) = test_app();
    let server = TestServer::new(app);

    cache.publish(minimal_snapshot(42));
    let response = server.get("/api/stats").await;
    response.assert_status_ok();
    let snapshot: Snapshot = response.json();
    assert_eq!(snapshot.uptime, 42);
    assert_eq!(snapshot.hostname, "test-host");

    // The next publish supersedes the previous snapshot for pull clients.
    cache.publish(minimal_snapshot(43));
    let snapshot: Snapshot = server.get("/api/stats").await.json();
    assert_eq!(snapshot.uptime, 43);
}

// --- WebSocket streaming (requires http_transport) ---

async fn receive_snapshot(ws: &mut axum_test::TestWebSocket) -> Snapshot {
    let deadline = tokio::time::Instant::now() + tokio::time::Duration::from_secs(3);
    loop {
        let text = ws.receive_text().await;
        if let Ok(v) = serde_json::from_str::<Snapshot>(&text) {
            return v;
        }
        assert!(
            tokio::time::Instant::now() < deadline,
            "timed out waiting for snapshot JSON"
        );
    }
}

#[tokio::test]
async fn test_ws_streams_cached_snapshot() {
    let (server, cache) = test_server_with_http();
    cache.publish(minimal_snapshot(7));

    let mut ws = server.get_websocket("/api/ws").await.into_websocket().await;
    let snapshot = receive_snapshot(&mut ws).await;
    assert_eq!(snapshot.uptime, 7);
}

#[tokio::test]
async fn test_ws_waits_out_empty_cache_silently() {
    let (server, cache) = test_server_with_http();

    // Publish only after the client connects; the stream loop polls the
    // empty cache at a short backoff and sends nothing until then.
    let cache_clone = cache.clone();
    tokio::spawn(async move {
        tokio::time::sleep(tokio::time::Duration::from_millis(250)).await;
        cache_clone.publish(minimal_snapshot(9));
    });

    let mut ws = server.get_websocket("/api/ws").await.into_websocket().await;
    let snapshot = receive_snapshot(&mut ws).await;
    assert_eq!(snapshot.uptime, 9);
}

#[tokio::test]
async fn test_ws_client_disconnect_leaves_others_running() {
    let (server, cache) = test_server_with_http();
    cache.publish(minimal_snapshot(1));

    let mut ws_a = server.get_websocket("/api/ws").await.into_websocket().await;
    let mut ws_b = server.get_websocket("/api/ws").await.into_websocket().await;
    receive_snapshot(&mut ws_a).await;
    receive_snapshot(&mut ws_b).await;

    drop(ws_a);

    // The surviving connection keeps receiving, and the cache is intact.
    cache.publish(minimal_snapshot(2));
    let deadline = tokio::time::Instant::now() + tokio::time::Duration::from_secs(3);
    loop {
        let snapshot = receive_snapshot(&mut ws_b).await;
        if snapshot.uptime == 2 {
            break;
        }
        assert!(
            tokio::time::Instant::now() < deadline,
            "surviving client never saw the new snapshot"
        );
    }
    assert_eq!(cache.read().unwrap().uptime, 2);
}
