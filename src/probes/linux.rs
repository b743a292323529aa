// Linux-specific helpers: /proc/stat and /proc/cpuinfo readers.

use crate::models::CpuTimes;

/// Parse per-core lines ("cpu0", "cpu1", ...) from /proc/stat, skipping the
/// aggregate "cpu" line. Values are jiffies; only deltas matter downstream
/// so no clock-tick conversion is applied. Field order in the file:
/// user nice system idle iowait irq softirq steal.
pub fn parse_proc_stat(content: &str) -> Vec<CpuTimes> {
    let mut cores = Vec::new();

    for line in content.lines() {
        let mut fields = line.split_whitespace();
        let Some(label) = fields.next() else {
            continue;
        };
        if !label.starts_with("cpu") || label == "cpu" {
            continue;
        }

        let mut next = || {
            fields
                .next()
                .and_then(|v| v.parse::<f64>().ok())
                .unwrap_or(0.0)
        };
        cores.push(CpuTimes {
            user: next(),
            nice: next(),
            system: next(),
            idle: next(),
            iowait: next(),
            irq: next(),
            softirq: next(),
            steal: next(),
        });
    }

    cores
}

/// Read first "model name" from /proc/cpuinfo (Linux). Preferred over
/// sysinfo when the latter reports placeholder names.
pub(super) fn read_cpu_model() -> Option<String> {
    #[cfg(target_os = "linux")]
    {
        let content = std::fs::read_to_string("/proc/cpuinfo").ok()?;
        for line in content.lines() {
            if line.starts_with("model name") {
                let name = line
                    .find(": ")
                    .map(|i| line[i + 2..].trim())
                    .filter(|s| !s.is_empty())?;
                return Some(name.to_string());
            }
        }
    }
    None
}
