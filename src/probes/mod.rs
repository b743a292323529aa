// Subsystem probes via sysinfo and /proc, blocking work behind spawn_blocking

mod linux;

pub use linux::parse_proc_stat;

use crate::gpu::{self, GpuBackend};
use crate::models::{CpuTimes, DiskStats, GpuStats, InterfaceStat, MemoryStats, SystemIdentity};
use async_trait::async_trait;
use std::path::Path;
use std::sync::{Arc, Mutex};
use sysinfo::{Disks, Networks, System};

/// One fallible accessor per resource subsystem, each with an independent
/// failure mode. The collector is generic over this seam so tests can
/// inject scripted probes.
#[async_trait]
pub trait ProbeSource: Send + Sync + 'static {
    /// Raw per-core cumulative time buckets, input to the delta tracker.
    async fn cpu_times(&self) -> anyhow::Result<Vec<CpuTimes>>;
    async fn memory(&self) -> anyhow::Result<MemoryStats>;
    async fn disk(&self, path: &str) -> anyhow::Result<DiskStats>;
    /// Interfaces with nonzero traffic, ordered by name.
    async fn network(&self) -> anyhow::Result<Vec<InterfaceStat>>;
    /// `None` when no supported GPU backend responds; a normal outcome.
    async fn gpu(&self) -> Option<GpuStats>;
    async fn uptime(&self) -> anyhow::Result<u64>;
}

pub struct SystemProbes {
    sys: Arc<Mutex<System>>,
    disks: Arc<Mutex<Disks>>,
    networks: Arc<Mutex<Networks>>,
    gpu_backends: Arc<Vec<Box<dyn GpuBackend>>>,
}

impl Default for SystemProbes {
    fn default() -> Self {
        Self::new()
    }
}

impl SystemProbes {
    pub fn new() -> Self {
        let mut sys = System::new_all();
        sys.refresh_all();
        let disks = Disks::new_with_refreshed_list();
        let networks = Networks::new_with_refreshed_list();
        Self {
            sys: Arc::new(Mutex::new(sys)),
            disks: Arc::new(Mutex::new(disks)),
            networks: Arc::new(Mutex::new(networks)),
            gpu_backends: Arc::new(gpu::default_backends()),
        }
    }

    /// Resolve the static identity. Called once at startup; the result is
    /// injected into every snapshot without re-querying.
    pub async fn identity(&self, hostname_override: Option<String>) -> anyhow::Result<SystemIdentity> {
        let sys = self.sys.clone();
        tokio::task::spawn_blocking(move || {
            let sys = sys
                .lock()
                .map_err(|e| anyhow::anyhow!("sysinfo lock poisoned: {}", e))?;

            let hostname = hostname_override
                .filter(|s| !s.is_empty())
                .or_else(System::host_name)
                .unwrap_or_else(|| "unknown".into());
            let cpu_model = linux::read_cpu_model()
                .or_else(|| {
                    sys.cpus()
                        .first()
                        .map(|c| c.brand().to_string())
                        .filter(|s| !s.is_empty())
                })
                .unwrap_or_else(|| "Unknown".into());
            let physical_cores = System::physical_core_count().unwrap_or(0) as u32;
            let logical_cores = sys.cpus().len() as u32;

            Ok(SystemIdentity {
                hostname,
                cpu_model,
                physical_cores,
                logical_cores,
            })
        })
        .await
        .map_err(|e| anyhow::anyhow!("probe task join: {}", e))?
    }
}

#[async_trait]
impl ProbeSource for SystemProbes {
    async fn cpu_times(&self) -> anyhow::Result<Vec<CpuTimes>> {
        tokio::task::spawn_blocking(|| {
            #[cfg(target_os = "linux")]
            {
                let content = std::fs::read_to_string("/proc/stat")?;
                let cores = parse_proc_stat(&content);
                anyhow::ensure!(!cores.is_empty(), "no per-core entries in /proc/stat");
                Ok(cores)
            }
            #[cfg(not(target_os = "linux"))]
            {
                anyhow::bail!("per-core CPU times are only available on Linux")
            }
        })
        .await
        .map_err(|e| anyhow::anyhow!("probe task join: {}", e))?
    }

    async fn memory(&self) -> anyhow::Result<MemoryStats> {
        let sys = self.sys.clone();
        tokio::task::spawn_blocking(move || {
            let mut sys = sys
                .lock()
                .map_err(|e| anyhow::anyhow!("sysinfo lock poisoned: {}", e))?;
            sys.refresh_memory();

            let total = sys.total_memory();
            let available = sys.available_memory();
            let used = total.saturating_sub(available);
            let used_percent = if total > 0 {
                (used as f64 / total as f64) * 100.0
            } else {
                0.0
            };

            Ok(MemoryStats {
                total,
                used,
                available,
                used_percent,
            })
        })
        .await
        .map_err(|e| anyhow::anyhow!("probe task join: {}", e))?
    }

    async fn disk(&self, path: &str) -> anyhow::Result<DiskStats> {
        let disks = self.disks.clone();
        let path = path.to_string();
        tokio::task::spawn_blocking(move || {
            let mut disks = disks
                .lock()
                .map_err(|e| anyhow::anyhow!("sysinfo disks lock poisoned: {}", e))?;
            disks.refresh(false);

            // Longest mount-point prefix wins: "/" matches everything,
            // "/home" beats it for paths under /home.
            let target = Path::new(&path);
            let disk = disks
                .list()
                .iter()
                .filter(|d| target.starts_with(d.mount_point()))
                .max_by_key(|d| d.mount_point().components().count())
                .ok_or_else(|| anyhow::anyhow!("no filesystem found for path {}", path))?;

            let total = disk.total_space();
            let free = disk.available_space();
            let used = total.saturating_sub(free);
            let used_percent = if total > 0 {
                (used as f64 / total as f64) * 100.0
            } else {
                0.0
            };

            Ok(DiskStats {
                path,
                total,
                used,
                free,
                used_percent,
            })
        })
        .await
        .map_err(|e| anyhow::anyhow!("probe task join: {}", e))?
    }

    async fn network(&self) -> anyhow::Result<Vec<InterfaceStat>> {
        let networks = self.networks.clone();
        tokio::task::spawn_blocking(move || {
            let mut networks = networks
                .lock()
                .map_err(|e| anyhow::anyhow!("sysinfo networks lock poisoned: {}", e))?;
            networks.refresh(true);

            let mut interfaces: Vec<InterfaceStat> = networks
                .list()
                .iter()
                .map(|(name, data)| InterfaceStat {
                    name: name.clone(),
                    bytes_sent: data.total_transmitted(),
                    bytes_recv: data.total_received(),
                })
                .filter(|i| i.bytes_sent > 0 || i.bytes_recv > 0)
                .collect();
            interfaces.sort_by(|a, b| a.name.cmp(&b.name));

            Ok(interfaces)
        })
        .await
        .map_err(|e| anyhow::anyhow!("probe task join: {}", e))?
    }

    async fn gpu(&self) -> Option<GpuStats> {
        let backends = self.gpu_backends.clone();
        tokio::task::spawn_blocking(move || gpu::detect(&backends))
            .await
            .unwrap_or_else(|e| {
                tracing::warn!(error = %e, operation = "probe_gpu", "GPU probe task join failed");
                None
            })
    }

    async fn uptime(&self) -> anyhow::Result<u64> {
        tokio::task::spawn_blocking(System::uptime)
            .await
            .map_err(|e| anyhow::anyhow!("probe task join: {}", e))
    }
}
