// Static identity and the per-tick snapshot aggregate

use serde::{Deserialize, Serialize};

use super::{CpuStats, DiskStats, GpuStats, InterfaceStat, MemoryStats};

/// Static system identity; resolved once at startup and exposed via
/// GET /api/info. Never re-queried per tick.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SystemIdentity {
    pub hostname: String,
    pub cpu_model: String,
    pub physical_cores: u32,
    pub logical_cores: u32,
}

/// One immutable point-in-time reading of every monitored subsystem.
/// Built exactly once per collector tick and published as `Arc<Snapshot>`;
/// readers share it by reference and it is never mutated in place.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Snapshot {
    pub hostname: String,
    pub uptime: u64,
    pub os: String,
    pub arch: String,
    pub cpu: CpuStats,
    pub memory: MemoryStats,
    pub disk: DiskStats,
    pub network: Vec<InterfaceStat>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub gpu: Option<GpuStats>,
}
