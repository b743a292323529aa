// GPU models

use serde::{Deserialize, Serialize};

/// One detected GPU. Memory values are bytes; backends that report MiB or
/// suffixed values normalize before constructing this.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GpuStats {
    pub name: String,
    pub memory_total: u64,
    pub memory_used: u64,
    pub used_percent: f64,
    pub temperature: f64,
}
