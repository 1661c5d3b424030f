// Host-level usage models and the snapshot root

use serde::{Deserialize, Serialize};

use super::{NetUsage, WgPeer};

/// CPU usage over one sampling window, as percentages of total ticks.
/// The three fields sum to ~100 for any non-degenerate window.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CpuUsage {
    pub user: f64,
    pub system: f64,
    pub idle: f64,
}

/// Point-in-time memory usage as percentages of total RAM. Swap fields are
/// only present when swap reporting is enabled and a swap device exists.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct MemUsage {
    pub used: f64,
    pub cached: f64,
    pub free: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub swap_used: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub swap_free: Option<f64>,
}

/// Seconds since boot, served standalone by GET /uptime.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Uptime {
    pub uptime: u64,
}

/// One full collection cycle. Slots for failed measurements hold their
/// zero/empty defaults; the serving contract is best snapshot now.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct HostSnapshot {
    pub hostname: String,
    pub uptime: u64,
    pub cpu: CpuUsage,
    pub memory: MemUsage,
    pub network: Vec<NetUsage>,
    pub wireguard: Vec<WgPeer>,
}

/// Error shape returned with a non-200 status.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorBody {
    pub error: String,
}
