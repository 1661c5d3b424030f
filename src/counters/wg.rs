// WireGuard peer counters via `wg show <interface> dump`

use std::time::Duration;

use tokio::process::Command;

use super::{PeerCounters, PeerSource};
use crate::error::SampleError;

const SOURCE: &str = "wg dump";

/// Runs the peer-link dump command and parses its tab-separated output.
/// The default invocation is `wg show <interface> dump`; configuration may
/// substitute a wrapper (sudo, a busybox path) or, in tests, `cat` on a
/// canned dump file.
pub struct WgDumpSource {
    command: Vec<String>,
    timeout: Duration,
}

impl WgDumpSource {
    pub fn new(command: Vec<String>, timeout: Duration) -> Self {
        Self { command, timeout }
    }
}

impl PeerSource for WgDumpSource {
    async fn dump(&self) -> Result<Vec<PeerCounters>, SampleError> {
        let (program, args) = self
            .command
            .split_first()
            .ok_or_else(|| unavailable("empty dump command"))?;

        let run = Command::new(program).args(args).output();
        let output = tokio::time::timeout(self.timeout, run)
            .await
            .map_err(|_| unavailable(format!("timed out after {:?}", self.timeout)))?
            .map_err(|e| unavailable(format!("spawning {program:?} failed: {e}")))?;

        if !output.status.success() {
            return Err(unavailable(format!("{program:?} exited with {}", output.status)));
        }
        parse_dump(&String::from_utf8_lossy(&output.stdout))
    }
}

fn unavailable(reason: impl Into<String>) -> SampleError {
    SampleError::SourceUnavailable {
        origin: SOURCE,
        reason: reason.into(),
    }
}

/// Parses a wg dump. The first line is interface metadata and is discarded;
/// each remaining line is one peer. Rows that do not parse are skipped with
/// a warning so one odd peer cannot hide the rest. Empty output means the
/// command itself misbehaved and is a source failure.
pub(super) fn parse_dump(text: &str) -> Result<Vec<PeerCounters>, SampleError> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return Err(unavailable("dump produced no output"));
    }

    let mut peers = Vec::new();
    for line in trimmed.lines().skip(1) {
        match parse_peer_row(line) {
            Ok(peer) => peers.push(peer),
            Err(e) => tracing::warn!(error = %e, "skipping peer row"),
        }
    }
    Ok(peers)
}

// Peer line layout (wg >= 0.0.20171111): public-key, preshared-key,
// endpoint, allowed-ips, latest-handshake, transfer-rx, transfer-tx,
// persistent-keepalive.
fn parse_peer_row(line: &str) -> Result<PeerCounters, SampleError> {
    let cols: Vec<&str> = line.split('\t').collect();
    if cols.len() < 8 {
        return Err(malformed(line));
    }
    Ok(PeerCounters {
        external_ip: cols[2].to_string(),
        internal_ip: cols[3].to_string(),
        latest_handshake: cols[4].parse().map_err(|_| malformed(line))?,
        rx_bytes: cols[5].parse().map_err(|_| malformed(line))?,
        tx_bytes: cols[6].parse().map_err(|_| malformed(line))?,
    })
}

fn malformed(line: &str) -> SampleError {
    SampleError::MalformedCounterRow {
        origin: SOURCE,
        row: line.to_string(),
    }
}
