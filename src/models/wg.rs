// WireGuard peer models

use serde::{Deserialize, Serialize};

/// Data rates of one peer over a sampling window, in kbit/s. Directions are
/// gateway-relative: `rx` is bytes received from the peer, `tx` bytes sent
/// to it.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PeerRate {
    pub rx: f64,
    pub tx: f64,
}

/// One WireGuard peer as reported by the agent. `latest_handshake` is epoch
/// seconds, 0 when the peer has never completed a handshake.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct WgPeer {
    pub internal_ip: String,
    pub external_ip: String,
    pub latest_handshake: i64,
    pub data_rates: PeerRate,
}
