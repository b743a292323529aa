// NVIDIA GPU via nvidia-smi CSV output

use super::{GpuBackend, run_tool};
use crate::models::GpuStats;

const MIB: u64 = 1024 * 1024;

pub struct NvidiaSmi;

impl GpuBackend for NvidiaSmi {
    fn name(&self) -> &'static str {
        "nvidia-smi"
    }

    fn probe(&self) -> Option<GpuStats> {
        match run_tool(
            "nvidia-smi",
            &[
                "--query-gpu=name,memory.total,memory.used,utilization.gpu,temperature.gpu",
                "--format=csv,noheader,nounits",
            ],
        ) {
            Ok(output) => parse_nvidia_smi(&output),
            Err(e) => {
                tracing::debug!(error = %e, "nvidia-smi probe failed");
                None
            }
        }
    }
}

/// Parse one CSV line (first GPU): name, memory.total, memory.used,
/// utilization.gpu, temperature.gpu. Memory arrives in MiB with nounits
/// and is converted to bytes.
pub fn parse_nvidia_smi(output: &str) -> Option<GpuStats> {
    let line = output.lines().next()?.trim();
    let parts: Vec<&str> = line.split(", ").collect();
    if parts.len() < 5 || parts[0].is_empty() {
        return None;
    }

    Some(GpuStats {
        name: parts[0].to_string(),
        memory_total: parts[1].trim().parse::<u64>().unwrap_or(0) * MIB,
        memory_used: parts[2].trim().parse::<u64>().unwrap_or(0) * MIB,
        used_percent: parts[3].trim().parse().unwrap_or(0.0),
        temperature: parts[4].trim().parse().unwrap_or(0.0),
    })
}
