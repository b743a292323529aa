// Background collector: ticks at the sample interval, fans out probes,
// derives per-core CPU utilization, assembles an immutable snapshot and
// publishes it to the cache.

use crate::cache::SnapshotCache;
use crate::cpu_tracker::CpuTracker;
use crate::models::{CpuStats, Snapshot, SystemIdentity};
use crate::probes::ProbeSource;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};
use tokio::time::{Duration, MissedTickBehavior, error::Elapsed, interval, timeout};
use tracing::Instrument;

/// Floor for the sample interval; a misconfigured zero or tiny interval
/// must not spin the loop.
pub const MIN_SAMPLE_INTERVAL_MS: u64 = 100;

/// Upper bound on each fanned-out probe so one hung external backend
/// cannot stall the whole tick.
pub const PROBE_TIMEOUT: Duration = Duration::from_secs(5);

/// Probes, shared state, and shutdown for the collector.
pub struct CollectorDeps<P: ProbeSource> {
    pub probes: Arc<P>,
    pub identity: Arc<SystemIdentity>,
    pub cache: Arc<SnapshotCache>,
    pub ws_connections: Arc<AtomicUsize>,
    pub snapshots_published: Arc<AtomicU64>,
    pub shutdown_rx: tokio::sync::oneshot::Receiver<()>,
}

/// Collector timing and logging config.
/// Stats logging uses a real-time interval, independent of sample_interval_ms.
pub struct CollectorConfig {
    pub sample_interval_ms: u64,
    pub disk_path: String,
    pub stats_log_interval_secs: u64,
}

/// Tick period with the floor applied.
pub fn effective_interval(sample_interval_ms: u64) -> Duration {
    Duration::from_millis(sample_interval_ms.max(MIN_SAMPLE_INTERVAL_MS))
}

pub fn spawn<P: ProbeSource>(
    deps: CollectorDeps<P>,
    config: CollectorConfig,
) -> tokio::task::JoinHandle<()> {
    let CollectorDeps {
        probes,
        identity,
        cache,
        ws_connections,
        snapshots_published,
        mut shutdown_rx,
    } = deps;
    let CollectorConfig {
        sample_interval_ms,
        disk_path,
        stats_log_interval_secs,
    } = config;

    let period = effective_interval(sample_interval_ms);
    if sample_interval_ms < MIN_SAMPLE_INTERVAL_MS {
        tracing::warn!(
            configured_ms = sample_interval_ms,
            floor_ms = MIN_SAMPLE_INTERVAL_MS,
            "sample interval below floor, clamping"
        );
    }

    let collector_span = tracing::span!(tracing::Level::DEBUG, "collector", sample_interval_ms);
    tokio::spawn(
        async move {
            let mut tick = interval(period);
            tick.set_missed_tick_behavior(MissedTickBehavior::Skip);
            let mut stats_log_tick = interval(Duration::from_secs(stats_log_interval_secs));
            stats_log_tick.set_missed_tick_behavior(MissedTickBehavior::Skip);

            let mut tracker = CpuTracker::new();

            loop {
                tokio::select! {
                    _ = tick.tick() => {
                        run_tick(
                            probes.as_ref(),
                            &identity,
                            &cache,
                            &mut tracker,
                            &disk_path,
                            &snapshots_published,
                        )
                        .await;
                    }
                    _ = &mut shutdown_rx => {
                        tracing::debug!("Collector shutting down");
                        break;
                    }
                    _ = stats_log_tick.tick() => {
                        tracing::info!(
                            ws_clients = ws_connections.load(Ordering::Relaxed),
                            snapshots_published = snapshots_published.load(Ordering::Relaxed),
                            "app stats"
                        );
                    }
                }
            }
        }
        .instrument(collector_span),
    )
}

/// One sampling cycle. CPU times run first to feed the tracker; the
/// remaining probes fan out concurrently. Memory and disk are mandatory:
/// either failing aborts the publish and the cache keeps serving the
/// previous snapshot. Everything else degrades to absent or zero.
async fn run_tick<P: ProbeSource>(
    probes: &P,
    identity: &SystemIdentity,
    cache: &SnapshotCache,
    tracker: &mut CpuTracker,
    disk_path: &str,
    snapshots_published: &AtomicU64,
) {
    match probes.cpu_times().await {
        Ok(sample) => tracker.update(sample),
        Err(e) => {
            // Utilization vector holds its previous values for this tick.
            tracing::warn!(error = %e, operation = "probe_cpu_times", "CPU times probe failed");
        }
    }

    let (memory, disk, network, gpu, uptime) = tokio::join!(
        timeout(PROBE_TIMEOUT, probes.memory()),
        timeout(PROBE_TIMEOUT, probes.disk(disk_path)),
        timeout(PROBE_TIMEOUT, probes.network()),
        timeout(PROBE_TIMEOUT, probes.gpu()),
        timeout(PROBE_TIMEOUT, probes.uptime()),
    );

    let memory = match flatten(memory) {
        Ok(m) => m,
        Err(e) => {
            tracing::warn!(error = %e, operation = "probe_memory", "memory probe failed, skipping tick");
            return;
        }
    };
    let disk = match flatten(disk) {
        Ok(d) => d,
        Err(e) => {
            tracing::warn!(error = %e, operation = "probe_disk", "disk probe failed, skipping tick");
            return;
        }
    };
    let network = match flatten(network) {
        Ok(n) => n,
        Err(e) => {
            tracing::warn!(error = %e, operation = "probe_network", "network probe failed");
            Vec::new()
        }
    };
    let uptime = match flatten(uptime) {
        Ok(u) => u,
        Err(e) => {
            tracing::warn!(error = %e, operation = "probe_uptime", "uptime probe failed");
            0
        }
    };
    let gpu = match gpu {
        Ok(g) => g,
        Err(_) => {
            tracing::debug!(operation = "probe_gpu", "GPU probe timed out");
            None
        }
    };

    let snapshot = Snapshot {
        hostname: identity.hostname.clone(),
        uptime,
        os: std::env::consts::OS.to_string(),
        arch: std::env::consts::ARCH.to_string(),
        cpu: CpuStats {
            model: identity.cpu_model.clone(),
            cores: identity.physical_cores,
            threads: identity.logical_cores,
            percent: tracker.percents().to_vec(),
        },
        memory,
        disk,
        network,
        gpu,
    };

    cache.publish(snapshot);
    snapshots_published.fetch_add(1, Ordering::Relaxed);
}

fn flatten<T>(result: Result<anyhow::Result<T>, Elapsed>) -> anyhow::Result<T> {
    result.map_err(|_| anyhow::anyhow!("probe timed out"))?
}
