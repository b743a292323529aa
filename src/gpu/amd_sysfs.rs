// AMD GPU via the DRM sysfs tree, for hosts without rocm-smi installed.

use super::GpuBackend;
use crate::models::GpuStats;
use std::fs;
use std::path::{Path, PathBuf};

const AMD_VENDOR_ID: &str = "0x1002";

pub struct AmdSysfs {
    root: PathBuf,
}

impl AmdSysfs {
    pub fn new() -> Self {
        Self::with_root("/sys/class/drm")
    }

    /// Scan root override, used by tests with a synthetic tree.
    pub fn with_root(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }
}

impl Default for AmdSysfs {
    fn default() -> Self {
        Self::new()
    }
}

impl GpuBackend for AmdSysfs {
    fn name(&self) -> &'static str {
        "amd-sysfs"
    }

    fn probe(&self) -> Option<GpuStats> {
        scan(&self.root)
    }
}

/// Walk card directories ("card0", not connector dirs like "card0-DP-1"),
/// keep the first one whose vendor file matches AMD, and read its discrete
/// counter files.
fn scan(root: &Path) -> Option<GpuStats> {
    let entries = fs::read_dir(root).ok()?;

    for entry in entries.flatten() {
        let dir_name = entry.file_name().to_string_lossy().into_owned();
        if !dir_name.starts_with("card") || dir_name.contains('-') {
            continue;
        }

        let device = entry.path().join("device");
        let Ok(vendor) = fs::read_to_string(device.join("vendor")) else {
            continue;
        };
        if !vendor.contains(AMD_VENDOR_ID) {
            continue;
        }

        let name = fs::read_to_string(device.join("product_name"))
            .map(|s| s.trim().to_string())
            .ok()
            .filter(|s| !s.is_empty())
            .unwrap_or_else(|| "AMD GPU".to_string());

        return Some(GpuStats {
            name,
            memory_total: read_u64(&device.join("mem_info_vram_total")),
            memory_used: read_u64(&device.join("mem_info_vram_used")),
            used_percent: read_f64(&device.join("gpu_busy_percent")),
            temperature: read_hwmon_temp(&device.join("hwmon")),
        });
    }

    None
}

fn read_u64(path: &Path) -> u64 {
    fs::read_to_string(path)
        .ok()
        .and_then(|s| s.trim().parse().ok())
        .unwrap_or(0)
}

fn read_f64(path: &Path) -> f64 {
    fs::read_to_string(path)
        .ok()
        .and_then(|s| s.trim().parse().ok())
        .unwrap_or(0.0)
}

/// First hwmon instance's temp1_input, reported in milli-degrees.
fn read_hwmon_temp(hwmon: &Path) -> f64 {
    let Ok(entries) = fs::read_dir(hwmon) else {
        return 0.0;
    };
    for hw in entries.flatten() {
        if let Ok(s) = fs::read_to_string(hw.path().join("temp1_input"))
            && let Ok(milli) = s.trim().parse::<f64>()
        {
            return milli / 1000.0;
        }
    }
    0.0
}
