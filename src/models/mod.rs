// Wire models shared by the agent and the check plugin

mod host;
mod net;
mod wg;

pub use host::{CpuUsage, ErrorBody, HostSnapshot, MemUsage, Uptime};
pub use net::NetUsage;
pub use wg::{PeerRate, WgPeer};
