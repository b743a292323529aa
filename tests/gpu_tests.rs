// GPU backend parsing and fallback chain tests

use hostmon::gpu::{
    AmdSysfs, GpuBackend, detect, parse_memory_value, parse_nvidia_smi, parse_rocm_smi,
    parse_wmi_line,
};
use hostmon::models::GpuStats;
use std::fs;

// --- memory value normalization ---

#[test]
fn test_memory_value_gigabytes() {
    assert_eq!(parse_memory_value("8GB"), 8 * 1024 * 1024 * 1024);
    assert_eq!(parse_memory_value("8 GB"), 8 * 1024 * 1024 * 1024);
    assert_eq!(parse_memory_value("8G"), 8 * 1024 * 1024 * 1024);
}

#[test]
fn test_memory_value_megabytes_and_kilobytes() {
    assert_eq!(parse_memory_value("512MB"), 512 * 1024 * 1024);
    assert_eq!(parse_memory_value("512m"), 512 * 1024 * 1024);
    assert_eq!(parse_memory_value("256K"), 256 * 1024);
}

#[test]
fn test_memory_value_bare_bytes_and_garbage() {
    assert_eq!(parse_memory_value("17163091968"), 17163091968);
    assert_eq!(parse_memory_value("not a number"), 0);
}

#[test]
fn test_memory_value_fractional() {
    assert_eq!(parse_memory_value("1.5G"), (1.5 * 1024.0 * 1024.0 * 1024.0) as u64);
}

// --- rocm-smi text parsing ---

const ROCM_OUTPUT: &str = "\
============================ ROCm System Management Interface ============================
GPU[0]\t\t: Card series:\t\tRadeon RX 7900 XTX
GPU[0]\t\t: Temperature (Sensor edge) (C): 45.0
GPU[0]\t\t: GPU use (%): 23
GPU[0]\t\t: VRAM Total Memory (B): 25753026560
GPU[0]\t\t: VRAM Total Used Memory (B): 1234567890
==========================================================================================
";

#[test]
fn test_rocm_parse_full_output() {
    let gpu = parse_rocm_smi(ROCM_OUTPUT).expect("named device");
    assert_eq!(gpu.name, "Radeon RX 7900 XTX");
    assert_eq!(gpu.temperature, 45.0);
    assert_eq!(gpu.used_percent, 23.0);
    assert_eq!(gpu.memory_total, 25753026560);
    assert_eq!(gpu.memory_used, 1234567890);
}

#[test]
fn test_rocm_parse_suffixed_memory() {
    let output = "Card series: Radeon VII\nVRAM Total Memory: 16GB\nVRAM Total Used Memory: 512MB\n";
    let gpu = parse_rocm_smi(output).expect("named device");
    assert_eq!(gpu.memory_total, 16 * 1024 * 1024 * 1024);
    assert_eq!(gpu.memory_used, 512 * 1024 * 1024);
}

#[test]
fn test_rocm_parse_without_name_is_absent() {
    let output = "GPU use (%): 50\nVRAM Total Memory (B): 1024\n";
    assert!(parse_rocm_smi(output).is_none());
}

// --- nvidia-smi CSV parsing ---

#[test]
fn test_nvidia_parse_converts_mib_to_bytes() {
    let output = "NVIDIA GeForce RTX 3080, 10240, 3072, 45, 67\n";
    let gpu = parse_nvidia_smi(output).expect("named device");
    assert_eq!(gpu.name, "NVIDIA GeForce RTX 3080");
    assert_eq!(gpu.memory_total, 10240 * 1024 * 1024);
    assert_eq!(gpu.memory_used, 3072 * 1024 * 1024);
    assert_eq!(gpu.used_percent, 45.0);
    assert_eq!(gpu.temperature, 67.0);
}

#[test]
fn test_nvidia_parse_rejects_short_line() {
    assert!(parse_nvidia_smi("NVIDIA GeForce RTX 3080, 10240\n").is_none());
    assert!(parse_nvidia_smi("").is_none());
}

// --- WMI line parsing ---

#[test]
fn test_wmi_parse_reports_name_and_total_only() {
    let gpu = parse_wmi_line("AMD Radeon RX 6800|17163091968\r\n").expect("named device");
    assert_eq!(gpu.name, "AMD Radeon RX 6800");
    assert_eq!(gpu.memory_total, 17163091968);
    assert_eq!(gpu.memory_used, 0);
    assert_eq!(gpu.used_percent, 0.0);
    assert_eq!(gpu.temperature, 0.0);
}

#[test]
fn test_wmi_parse_rejects_empty() {
    assert!(parse_wmi_line("").is_none());
    assert!(parse_wmi_line("|12345").is_none());
}

// --- fallback chain ordering ---

struct Scripted {
    label: &'static str,
    result: Option<GpuStats>,
}

impl GpuBackend for Scripted {
    fn name(&self) -> &'static str {
        self.label
    }

    fn probe(&self) -> Option<GpuStats> {
        self.result.clone()
    }
}

fn named(name: &str) -> GpuStats {
    GpuStats {
        name: name.into(),
        memory_total: 1024,
        memory_used: 512,
        used_percent: 10.0,
        temperature: 40.0,
    }
}

#[test]
fn test_chain_stops_at_first_named_device() {
    let backends: Vec<Box<dyn GpuBackend>> = vec![
        Box::new(Scripted { label: "first", result: Some(named("card-a")) }),
        Box::new(Scripted { label: "second", result: Some(named("card-b")) }),
    ];
    assert_eq!(detect(&backends).unwrap().name, "card-a");
}

#[test]
fn test_chain_falls_through_failures_to_third_stage() {
    let expected = named("card-c");
    let backends: Vec<Box<dyn GpuBackend>> = vec![
        Box::new(Scripted { label: "first", result: None }),
        Box::new(Scripted { label: "second", result: None }),
        Box::new(Scripted { label: "third", result: Some(expected.clone()) }),
    ];
    assert_eq!(detect(&backends), Some(expected));
}

#[test]
fn test_chain_skips_unnamed_devices() {
    let backends: Vec<Box<dyn GpuBackend>> = vec![
        Box::new(Scripted { label: "first", result: Some(GpuStats::default()) }),
        Box::new(Scripted { label: "second", result: Some(named("card-b")) }),
    ];
    assert_eq!(detect(&backends).unwrap().name, "card-b");
}

#[test]
fn test_chain_empty_is_absent_not_error() {
    let backends: Vec<Box<dyn GpuBackend>> = vec![
        Box::new(Scripted { label: "first", result: None }),
        Box::new(Scripted { label: "second", result: None }),
    ];
    assert!(detect(&backends).is_none());
}

// --- AMD sysfs scanning against a synthetic tree ---

#[test]
fn test_sysfs_scan_reads_amd_card() {
    let dir = tempfile::TempDir::new().unwrap();
    let device = dir.path().join("card0/device");
    fs::create_dir_all(device.join("hwmon/hwmon0")).unwrap();
    fs::write(device.join("vendor"), "0x1002\n").unwrap();
    fs::write(device.join("product_name"), "Radeon RX 6700 XT\n").unwrap();
    fs::write(device.join("mem_info_vram_total"), "12884901888\n").unwrap();
    fs::write(device.join("mem_info_vram_used"), "2147483648\n").unwrap();
    fs::write(device.join("gpu_busy_percent"), "42\n").unwrap();
    fs::write(device.join("hwmon/hwmon0/temp1_input"), "45000\n").unwrap();
    // Connector dir must be ignored.
    fs::create_dir_all(dir.path().join("card0-DP-1")).unwrap();

    let gpu = AmdSysfs::with_root(dir.path()).probe().expect("named device");
    assert_eq!(gpu.name, "Radeon RX 6700 XT");
    assert_eq!(gpu.memory_total, 12884901888);
    assert_eq!(gpu.memory_used, 2147483648);
    assert_eq!(gpu.used_percent, 42.0);
    assert_eq!(gpu.temperature, 45.0);
}

#[test]
fn test_sysfs_scan_falls_back_to_generic_name() {
    let dir = tempfile::TempDir::new().unwrap();
    let device = dir.path().join("card1/device");
    fs::create_dir_all(&device).unwrap();
    fs::write(device.join("vendor"), "0x1002\n").unwrap();

    let gpu = AmdSysfs::with_root(dir.path()).probe().expect("named device");
    assert_eq!(gpu.name, "AMD GPU");
    assert_eq!(gpu.memory_total, 0);
    assert_eq!(gpu.temperature, 0.0);
}

#[test]
fn test_sysfs_scan_ignores_other_vendors() {
    let dir = tempfile::TempDir::new().unwrap();
    let device = dir.path().join("card0/device");
    fs::create_dir_all(&device).unwrap();
    fs::write(device.join("vendor"), "0x10de\n").unwrap();

    assert!(AmdSysfs::with_root(dir.path()).probe().is_none());
}

#[test]
fn test_sysfs_scan_empty_tree() {
    let dir = tempfile::TempDir::new().unwrap();
    assert!(AmdSysfs::with_root(dir.path()).probe().is_none());
}
