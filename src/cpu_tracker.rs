// Per-core CPU utilization from successive cumulative time samples.
// Owned exclusively by the collector task; the previous sample is replaced
// wholesale on every update.

use crate::models::CpuTimes;

#[derive(Debug, Default)]
pub struct CpuTracker {
    prev: Option<Vec<CpuTimes>>,
    percents: Vec<f64>,
}

impl CpuTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Latest per-core utilization in [0, 100]. All zeros until the second
    /// sample arrives (no interval to measure over yet).
    pub fn percents(&self) -> &[f64] {
        &self.percents
    }

    /// Feed the next cumulative sample. For each core:
    /// utilization = 100 * (1 - idle_delta / total_delta).
    /// A zero total delta holds the previous value (degenerate interval,
    /// not an error). Cores missing from a shorter current sample keep
    /// their last known value.
    pub fn update(&mut self, sample: Vec<CpuTimes>) {
        let Some(prev) = &self.prev else {
            self.percents = vec![0.0; sample.len()];
            self.prev = Some(sample);
            return;
        };

        let n = sample.len().min(prev.len()).min(self.percents.len());
        for i in 0..n {
            let total_delta = sample[i].total() - prev[i].total();
            if total_delta > 0.0 {
                let idle_delta = sample[i].idle - prev[i].idle;
                self.percents[i] = (100.0 * (1.0 - idle_delta / total_delta)).clamp(0.0, 100.0);
            }
        }
        self.prev = Some(sample);
    }
}
