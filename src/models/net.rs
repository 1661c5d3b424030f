// Per-interface traffic model

use serde::{Deserialize, Serialize};

/// Data rates of one network interface over a sampling window, in kbit/s.
/// `rx` is traffic received by the host, `tx` traffic sent.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NetUsage {
    pub device: String,
    pub rx: f64,
    pub tx: f64,
}
