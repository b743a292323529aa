// CPU models: raw cumulative time sample and derived stats

use serde::{Deserialize, Serialize};

/// One core's cumulative time buckets, monotonically non-decreasing while
/// the host is up. Transient input to `CpuTracker`; never serialized.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct CpuTimes {
    pub user: f64,
    pub nice: f64,
    pub system: f64,
    pub idle: f64,
    pub iowait: f64,
    pub irq: f64,
    pub softirq: f64,
    pub steal: f64,
}

impl CpuTimes {
    /// Sum of all buckets, the denominator of the utilization delta.
    pub fn total(&self) -> f64 {
        self.user
            + self.nice
            + self.system
            + self.idle
            + self.iowait
            + self.irq
            + self.softirq
            + self.steal
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CpuStats {
    pub model: String,
    pub cores: u32,
    pub threads: u32,
    /// Per-core utilization, index-aligned to core identity across ticks.
    pub percent: Vec<f64>,
}
