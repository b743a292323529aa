// Network interface models

use serde::{Deserialize, Serialize};

/// Cumulative traffic counters for one interface. Interfaces with zero
/// traffic in both directions are filtered out by the network probe.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InterfaceStat {
    pub name: String,
    pub bytes_sent: u64,
    pub bytes_recv: u64,
}
