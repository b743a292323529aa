// GPU discovery: an ordered fallback chain over heterogeneous backends.
// Vendor diagnostic tools come first, platform filesystem and management
// interfaces after; the first backend that names a device wins.

mod amd_sysfs;
mod nvidia;
mod rocm;
mod wmi;

pub use amd_sysfs::AmdSysfs;
pub use nvidia::{NvidiaSmi, parse_nvidia_smi};
pub use rocm::{RocmSmi, parse_memory_value, parse_rocm_smi};
pub use wmi::{WindowsWmi, parse_wmi_line};

use crate::models::GpuStats;
use std::process::Command;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum GpuToolError {
    #[error("{tool} not found")]
    NotFound { tool: &'static str },
    #[error("failed to run {tool}: {source}")]
    Execution {
        tool: &'static str,
        #[source]
        source: std::io::Error,
    },
    #[error("{tool} exited with {status}")]
    Failed {
        tool: &'static str,
        status: std::process::ExitStatus,
    },
}

/// One way of discovering a GPU. Implementations shell out to a vendor
/// diagnostic tool or read platform files; `probe` returns `None` when the
/// backend cannot name a device.
pub trait GpuBackend: Send + Sync {
    fn name(&self) -> &'static str;
    fn probe(&self) -> Option<GpuStats>;
}

/// Walk the chain in order, stopping at the first backend that yields a
/// named device. All backends coming up empty is a normal outcome for a
/// host without a supported GPU, not an error.
pub fn detect(backends: &[Box<dyn GpuBackend>]) -> Option<GpuStats> {
    for backend in backends {
        if let Some(gpu) = backend.probe()
            && !gpu.name.is_empty()
        {
            tracing::debug!(backend = backend.name(), gpu = %gpu.name, "GPU detected");
            return Some(gpu);
        }
    }
    None
}

/// Platform-gated default chain: rocm-smi then AMD sysfs (Linux only),
/// then nvidia-smi everywhere, then WMI (Windows only).
pub fn default_backends() -> Vec<Box<dyn GpuBackend>> {
    let mut backends: Vec<Box<dyn GpuBackend>> = Vec::new();
    if cfg!(target_os = "linux") {
        backends.push(Box::new(RocmSmi));
        backends.push(Box::new(AmdSysfs::new()));
    }
    backends.push(Box::new(NvidiaSmi));
    if cfg!(target_os = "windows") {
        backends.push(Box::new(WindowsWmi));
    }
    backends
}

/// Run a diagnostic tool and capture stdout.
pub(crate) fn run_tool(tool: &'static str, args: &[&str]) -> Result<String, GpuToolError> {
    let output = Command::new(tool).args(args).output().map_err(|e| {
        if e.kind() == std::io::ErrorKind::NotFound {
            GpuToolError::NotFound { tool }
        } else {
            GpuToolError::Execution { tool, source: e }
        }
    })?;
    if !output.status.success() {
        return Err(GpuToolError::Failed {
            tool,
            status: output.status,
        });
    }
    Ok(String::from_utf8_lossy(&output.stdout).into_owned())
}
