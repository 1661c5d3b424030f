// Check implementations: fetch a metric, evaluate thresholds, format perfdata

use std::time::Duration;

use chrono::Utc;

use crate::client::AgentClient;
use crate::error::CheckError;
use crate::models::{CpuUsage, MemUsage, NetUsage, Uptime, WgPeer};
use crate::peers;
use crate::verdict::{Verdict, evaluate};

/// Traffic direction of a rate check, gateway-relative: upstream is what
/// the gateway transmits, downstream what it receives.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Upstream,
    Downstream,
}

/// Connection settings shared by every check. Validated before any network
/// call; a validation failure becomes UNKNOWN.
#[derive(Debug, Clone)]
pub struct CheckArgs {
    pub hostname: String,
    pub port: u16,
    pub timeout_secs: u64,
    pub warning: Option<f64>,
    pub critical: Option<f64>,
}

impl CheckArgs {
    pub fn validate(&self) -> Result<(), CheckError> {
        if self.hostname.is_empty() {
            return Err(CheckError::InvalidArguments(
                "no hostname or IP address was given".into(),
            ));
        }
        if self.port < 1024 {
            return Err(CheckError::InvalidArguments(format!(
                "port must be between 1024 and 65535, got {}",
                self.port
            )));
        }
        if !(1..=120).contains(&self.timeout_secs) {
            return Err(CheckError::InvalidArguments(format!(
                "timeout must be between 1 and 120 seconds, got {}",
                self.timeout_secs
            )));
        }
        Ok(())
    }

    pub fn client(&self) -> Result<AgentClient, CheckError> {
        AgentClient::new(
            &self.hostname,
            self.port,
            Duration::from_secs(self.timeout_secs),
        )
    }
}

/// Verdict plus the line the plugin prints:
/// `<LABEL> - <perfdata or diagnostic>`.
#[derive(Debug)]
pub struct CheckOutcome {
    pub verdict: Verdict,
    pub message: String,
}

impl CheckOutcome {
    pub fn line(&self) -> String {
        format!("{} - {}", self.verdict, self.message)
    }
}

pub async fn check_uptime(
    client: &AgentClient,
    warning: Option<f64>,
    critical: Option<f64>,
) -> Result<CheckOutcome, CheckError> {
    let uptime: Uptime = client.fetch("/uptime").await?;
    Ok(CheckOutcome {
        verdict: evaluate(uptime.uptime as f64, warning, critical),
        message: format!("'uptime'={}s", uptime.uptime),
    })
}

pub async fn check_cpu(
    client: &AgentClient,
    warning: Option<f64>,
    critical: Option<f64>,
) -> Result<CheckOutcome, CheckError> {
    let cpu: CpuUsage = client.fetch("/cpu").await?;
    // thresholds apply to user plus system
    Ok(CheckOutcome {
        verdict: evaluate(cpu.user + cpu.system, warning, critical),
        message: format!(
            "'user'={:.2}% 'system'={:.2}% 'idle'={:.2}%",
            cpu.user, cpu.system, cpu.idle
        ),
    })
}

pub async fn check_memory(
    client: &AgentClient,
    warning: Option<f64>,
    critical: Option<f64>,
) -> Result<CheckOutcome, CheckError> {
    let mem: MemUsage = client.fetch("/memory").await?;
    let mut message = format!(
        "'used'={:.2}% 'cached'={:.2}% 'free'={:.2}%",
        mem.used, mem.cached, mem.free
    );
    if let (Some(swap_used), Some(swap_free)) = (mem.swap_used, mem.swap_free) {
        message.push_str(&format!(
            " 'swap-used'={swap_used:.2}% 'swap-free'={swap_free:.2}%"
        ));
    }
    // thresholds apply to used plus cached
    Ok(CheckOutcome {
        verdict: evaluate(mem.used + mem.cached, warning, critical),
        message,
    })
}

pub async fn check_network(
    client: &AgentClient,
    device: &str,
    direction: Direction,
    warning: Option<f64>,
    critical: Option<f64>,
) -> Result<CheckOutcome, CheckError> {
    let interfaces: Vec<NetUsage> = client.fetch("/network").await?;
    let nic = interfaces
        .iter()
        .find(|n| n.device == device)
        .ok_or_else(|| CheckError::InterfaceNotFound(device.to_string()))?;

    let (value, message) = match direction {
        Direction::Upstream => (nic.tx, format!("'upstream'={:.2}kbps", nic.tx)),
        Direction::Downstream => (nic.rx, format!("'downstream'={:.2}kbps", nic.rx)),
    };
    Ok(CheckOutcome {
        verdict: evaluate(value, warning, critical),
        message,
    })
}

pub async fn check_peer_handshake(
    client: &AgentClient,
    peer_key: u8,
    warning: Option<f64>,
    critical: Option<f64>,
) -> Result<CheckOutcome, CheckError> {
    let peer_list: Vec<WgPeer> = client.fetch("/wireguard").await?;
    let peer = peers::resolve(&peer_list, peer_key)?;
    let age = handshake_age(peer, Utc::now().timestamp());
    Ok(CheckOutcome {
        verdict: evaluate(age as f64, warning, critical),
        message: format!("'lasths'={age}s"),
    })
}

pub async fn check_peer_stream(
    client: &AgentClient,
    peer_key: u8,
    direction: Direction,
    warning: Option<f64>,
    critical: Option<f64>,
) -> Result<CheckOutcome, CheckError> {
    let peer_list: Vec<WgPeer> = client.fetch("/wireguard").await?;
    let peer = peers::resolve(&peer_list, peer_key)?;

    let (value, message) = match direction {
        Direction::Upstream => (
            peer.data_rates.tx,
            format!("'upstream'={:.2}kbps", peer.data_rates.tx),
        ),
        Direction::Downstream => (
            peer.data_rates.rx,
            format!("'downstream'={:.2}kbps", peer.data_rates.rx),
        ),
    };
    Ok(CheckOutcome {
        verdict: evaluate(value, warning, critical),
        message,
    })
}

/// Seconds since the peer's last handshake. A peer that has never completed
/// one reports epoch 0, so its age is the full epoch and trips any
/// configured threshold.
pub fn handshake_age(peer: &WgPeer, now: i64) -> i64 {
    now - peer.latest_handshake
}
