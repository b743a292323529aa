// Disk usage models

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DiskStats {
    pub path: String,
    pub total: u64,
    pub used: u64,
    pub free: u64,
    pub used_percent: f64,
}
