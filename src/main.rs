use anyhow::Result;
use hostmon::*;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, AtomicUsize};
use tracing_subscriber::EnvFilter;
use tracing_subscriber::fmt::time::FormatTime;

struct LocalTimer;

impl FormatTime for LocalTimer {
    fn format_time(&self, w: &mut tracing_subscriber::fmt::format::Writer<'_>) -> std::fmt::Result {
        write!(
            w,
            "{}",
            chrono::Local::now().format("%Y-%m-%dT%H:%M:%S%.3f%:z")
        )
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_timer(LocalTimer)
        .with_env_filter(filter)
        .init();

    let app_config = config::AppConfig::load()?;

    let probes = Arc::new(probes::SystemProbes::new());
    let identity = Arc::new(
        probes
            .identity(app_config.monitoring.hostname.clone())
            .await
            .map_err(|e| anyhow::anyhow!("resolve identity: {}", e))?,
    );
    tracing::info!(
        hostname = %identity.hostname,
        cpu = %identity.cpu_model,
        cores = identity.physical_cores,
        "resolved host identity"
    );

    let cache = Arc::new(cache::SnapshotCache::new());
    let ws_connections = Arc::new(AtomicUsize::new(0));
    let snapshots_published = Arc::new(AtomicU64::new(0));
    let (shutdown_tx, shutdown_rx) = tokio::sync::oneshot::channel();

    let collector_handle = collector::spawn(
        collector::CollectorDeps {
            probes: probes.clone(),
            identity: identity.clone(),
            cache: cache.clone(),
            ws_connections: ws_connections.clone(),
            snapshots_published: snapshots_published.clone(),
            shutdown_rx,
        },
        collector::CollectorConfig {
            sample_interval_ms: app_config.monitoring.sample_interval_ms,
            disk_path: app_config.monitoring.disk_path.clone(),
            stats_log_interval_secs: app_config.monitoring.stats_log_interval_secs,
        },
    );

    let app = routes::app(cache, identity, ws_connections, app_config.clone());
    let addr = format!("{}:{}", app_config.server.host, app_config.server.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!("Listening on http://{}", addr);

    let in_container = std::path::Path::new("/.dockerenv").exists()
        || std::env::var("CONTAINER").as_deref() == Ok("1");

    if in_container {
        // In Docker: run server until error or SIGTERM (no signal handler; avoids immediate exit)
        axum::serve(listener, app).await?;
    } else {
        tokio::select! {
            result = axum::serve(listener, app) => {
                result?;
            }
            _ = async {
                #[cfg(unix)]
                {
                    let mut sigterm = match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
                        Ok(s) => s,
                        Err(_) => {
                            let _ = tokio::signal::ctrl_c().await;
                            return;
                        }
                    };
                    tokio::select! {
                        _ = tokio::signal::ctrl_c() => {}
                        _ = sigterm.recv() => {}
                    }
                }
                #[cfg(not(unix))]
                {
                    tokio::signal::ctrl_c().await
                }
            } => {
                tracing::info!("Received shutdown signal");
                let _ = shutdown_tx.send(());
                let _ = collector_handle.await;
            }
        }
    }

    Ok(())
}
