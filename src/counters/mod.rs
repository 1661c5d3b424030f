// Counter sources: /proc readers and the wg dump provider

mod proc;
mod wg;

pub use proc::ProcCounters;
pub use wg::WgDumpSource;

use std::future::Future;
use std::time::Duration;

use crate::error::SampleError;

/// Cumulative CPU ticks folded into the three reported buckets. `total` is
/// always the sum of the other three, so percentages derived from deltas of
/// the same two snapshots sum to 100.
#[derive(Debug, Clone, Copy, Default)]
pub struct CpuTicks {
    pub user: u64,
    pub system: u64,
    pub idle: u64,
    pub total: u64,
}

/// Point-in-time memory figures in KiB. `cached` already folds in buffers
/// and reclaimable slab, so used + cached + free covers all of `total`.
#[derive(Debug, Clone, Copy, Default)]
pub struct MemInfo {
    pub total: u64,
    pub free: u64,
    pub cached: u64,
    pub swap_total: u64,
    pub swap_free: u64,
}

/// Cumulative byte counters of one network interface.
#[derive(Debug, Clone)]
pub struct NetDevCounters {
    pub device: String,
    pub rx_bytes: u64,
    pub tx_bytes: u64,
}

/// One peer row from the link dump: addressing, last handshake and
/// cumulative byte counters.
#[derive(Debug, Clone)]
pub struct PeerCounters {
    pub internal_ip: String,
    pub external_ip: String,
    pub latest_handshake: i64,
    pub rx_bytes: u64,
    pub tx_bytes: u64,
}

/// Point-in-time reader for the host's cumulative OS counters. Each call
/// returns a fresh snapshot; rate samplers call twice per window.
pub trait CounterSource {
    fn cpu(&self) -> Result<CpuTicks, SampleError>;
    fn memory(&self) -> Result<MemInfo, SampleError>;
    fn network(&self) -> Result<Vec<NetDevCounters>, SampleError>;
    fn uptime(&self) -> Result<Duration, SampleError>;
}

/// Reader for the peer-link dump. Taking a snapshot runs an external
/// command, so this one is async.
pub trait PeerSource {
    fn dump(&self) -> impl Future<Output = Result<Vec<PeerCounters>, SampleError>> + Send;
}
