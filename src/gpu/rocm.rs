// AMD GPU via rocm-smi key/value text output

use super::{GpuBackend, run_tool};
use crate::models::GpuStats;

pub struct RocmSmi;

impl GpuBackend for RocmSmi {
    fn name(&self) -> &'static str {
        "rocm-smi"
    }

    fn probe(&self) -> Option<GpuStats> {
        match run_tool(
            "rocm-smi",
            &[
                "--showmeminfo",
                "vram",
                "--showtemp",
                "--showuse",
                "--showproductname",
            ],
        ) {
            Ok(output) => parse_rocm_smi(&output),
            Err(e) => {
                tracing::debug!(error = %e, "rocm-smi probe failed");
                None
            }
        }
    }
}

/// Parse rocm-smi's free-form key/value lines. Lines carry one or two
/// colons ("GPU[0] : Card series: Navi 31"); the value is everything after
/// the last one. Returns `None` unless a product name was found.
pub fn parse_rocm_smi(output: &str) -> Option<GpuStats> {
    let mut gpu = GpuStats::default();

    for raw in output.lines() {
        let line = raw.trim();
        let Some((_, value)) = line.rsplit_once(':') else {
            continue;
        };
        let value = value.trim();

        if line.contains("Card series") {
            gpu.name = value.to_string();
        } else if line.contains("GPU use (%)") {
            gpu.used_percent = value.trim_end_matches('%').trim().parse().unwrap_or(0.0);
        } else if line.contains("Temperature") && line.contains("edge") {
            gpu.temperature = value
                .trim_end_matches(['c', 'C'])
                .trim()
                .parse()
                .unwrap_or(0.0);
        } else if line.contains("VRAM Total Used Memory") {
            gpu.memory_used = parse_memory_value(value);
        } else if line.contains("VRAM Total Memory") {
            gpu.memory_total = parse_memory_value(value);
        }
    }

    if gpu.name.is_empty() { None } else { Some(gpu) }
}

/// Normalize a memory value with an optional K/M/G suffix (with or without
/// a trailing B, any case) to bytes. Bare numbers pass through unchanged.
pub fn parse_memory_value(s: &str) -> u64 {
    let s = s.trim().to_ascii_lowercase();

    let (digits, multiplier): (&str, u64) = if let Some(p) = s.strip_suffix("gb") {
        (p, 1 << 30)
    } else if let Some(p) = s.strip_suffix("mb") {
        (p, 1 << 20)
    } else if let Some(p) = s.strip_suffix("kb") {
        (p, 1 << 10)
    } else if let Some(p) = s.strip_suffix('g') {
        (p, 1 << 30)
    } else if let Some(p) = s.strip_suffix('m') {
        (p, 1 << 20)
    } else if let Some(p) = s.strip_suffix('k') {
        (p, 1 << 10)
    } else {
        (s.as_str(), 1)
    };

    let value: f64 = digits.trim().parse().unwrap_or(0.0);
    (value * multiplier as f64) as u64
}
