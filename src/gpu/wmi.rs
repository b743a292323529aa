// Windows GPU via WMI (PowerShell Win32_VideoController).
// The management interface exposes name and adapter RAM only; utilization,
// used memory and temperature are reported as zero, never fabricated.

use super::{GpuBackend, run_tool};
use crate::models::GpuStats;

const WMI_QUERY: &str = "Get-CimInstance Win32_VideoController | \
     Sort-Object -Property AdapterRAM -Descending | \
     Select-Object -First 1 -Property Name,AdapterRAM | \
     ForEach-Object { $_.Name + '|' + $_.AdapterRAM }";

pub struct WindowsWmi;

impl GpuBackend for WindowsWmi {
    fn name(&self) -> &'static str {
        "wmi"
    }

    fn probe(&self) -> Option<GpuStats> {
        match run_tool("powershell", &["-Command", WMI_QUERY]) {
            Ok(output) => parse_wmi_line(&output),
            Err(e) => {
                tracing::debug!(error = %e, "WMI probe failed");
                None
            }
        }
    }
}

/// Parse the "Name|AdapterRAM" line. Picks the adapter with the most RAM
/// (the discrete GPU on dual-GPU machines), already sorted by the query.
pub fn parse_wmi_line(output: &str) -> Option<GpuStats> {
    let line = output.trim();
    let (name, ram) = line.split_once('|')?;
    let name = name.trim();
    if name.is_empty() {
        return None;
    }

    Some(GpuStats {
        name: name.to_string(),
        memory_total: ram.trim().parse().unwrap_or(0),
        memory_used: 0,
        used_percent: 0.0,
        temperature: 0.0,
    })
}
