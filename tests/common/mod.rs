// Shared test helpers

use hostmon::models::*;

pub fn minimal_snapshot(uptime: u64) -> Snapshot {
    Snapshot {
        hostname: "test-host".into(),
        uptime,
        os: "linux".into(),
        arch: "x86_64".into(),
        cpu: CpuStats {
            model: String::new(),
            cores: 0,
            threads: 0,
            percent: vec![],
        },
        memory: MemoryStats {
            total: 0,
            used: 0,
            available: 0,
            used_percent: 0.0,
        },
        disk: DiskStats {
            path: "/".into(),
            total: 0,
            used: 0,
            free: 0,
            used_percent: 0.0,
        },
        network: vec![],
        gpu: None,
    }
}

pub fn test_identity() -> SystemIdentity {
    SystemIdentity {
        hostname: "test-host".into(),
        cpu_model: "Test CPU".into(),
        physical_cores: 4,
        logical_cores: 8,
    }
}
