// Windowed rate sampling: two counter snapshots, a delta, a rate

use std::collections::{HashMap, HashSet};
use std::time::Duration;

use tokio::time::Instant;

use crate::counters::{CounterSource, CpuTicks, MemInfo, NetDevCounters, PeerCounters, PeerSource};
use crate::error::SampleError;
use crate::models::{CpuUsage, MemUsage, NetUsage, PeerRate, WgPeer};

/// CPU usage over one window. Percentages are tick deltas against the total
/// tick delta, so elapsed wall time never enters the formula.
pub async fn sample_cpu<C: CounterSource>(
    source: &C,
    window: Duration,
) -> Result<CpuUsage, SampleError> {
    let before = source.cpu()?;
    tokio::time::sleep(window).await;
    let after = source.cpu()?;
    cpu_percentages(before, after)
}

/// Per-interface rates over one window. Interfaces are paired by name; a
/// row present on only one side is dropped from the result.
pub async fn sample_network<C: CounterSource>(
    source: &C,
    window: Duration,
) -> Result<Vec<NetUsage>, SampleError> {
    let before = source.network()?;
    let started = Instant::now();
    tokio::time::sleep(window).await;
    let after = source.network()?;
    net_rates(&before, &after, started.elapsed().as_secs_f64())
}

/// Per-peer rates over one window, paired by internal address. Addressing
/// and handshake fields come from the later snapshot.
pub async fn sample_peers<P: PeerSource>(
    source: &P,
    window: Duration,
) -> Result<Vec<WgPeer>, SampleError> {
    let before = source.dump().await?;
    let started = Instant::now();
    tokio::time::sleep(window).await;
    let after = source.dump().await?;
    peer_rates(&before, &after, started.elapsed().as_secs_f64())
}

/// Memory is a point-in-time ratio, not a delta. Swap percentages are
/// reported only when asked for and only when a swap device exists.
pub fn sample_memory<C: CounterSource>(
    source: &C,
    include_swap: bool,
) -> Result<MemUsage, SampleError> {
    memory_usage(source.memory()?, include_swap)
}

pub fn sample_uptime<C: CounterSource>(source: &C) -> Result<u64, SampleError> {
    Ok(source.uptime()?.as_secs())
}

pub fn cpu_percentages(before: CpuTicks, after: CpuTicks) -> Result<CpuUsage, SampleError> {
    let total = after.total.saturating_sub(before.total);
    if total == 0 {
        return Err(SampleError::InsufficientDelta { what: "cpu ticks" });
    }
    let pct = |b: u64, a: u64| a.saturating_sub(b) as f64 / total as f64 * 100.0;
    Ok(CpuUsage {
        user: pct(before.user, after.user),
        system: pct(before.system, after.system),
        idle: pct(before.idle, after.idle),
    })
}

pub fn memory_usage(mem: MemInfo, include_swap: bool) -> Result<MemUsage, SampleError> {
    if mem.total == 0 {
        return Err(SampleError::InsufficientDelta {
            what: "memory total",
        });
    }
    let total = mem.total as f64;
    let used = mem.total.saturating_sub(mem.free).saturating_sub(mem.cached);

    let mut usage = MemUsage {
        used: used as f64 / total * 100.0,
        cached: mem.cached as f64 / total * 100.0,
        free: mem.free as f64 / total * 100.0,
        swap_used: None,
        swap_free: None,
    };
    if include_swap && mem.swap_total > 0 {
        let swap_total = mem.swap_total as f64;
        let swap_used = mem.swap_total.saturating_sub(mem.swap_free);
        usage.swap_used = Some(swap_used as f64 / swap_total * 100.0);
        usage.swap_free = Some(mem.swap_free as f64 / swap_total * 100.0);
    }
    Ok(usage)
}

pub fn net_rates(
    before: &[NetDevCounters],
    after: &[NetDevCounters],
    secs: f64,
) -> Result<Vec<NetUsage>, SampleError> {
    if secs <= 0.0 {
        return Err(SampleError::InsufficientDelta {
            what: "network window",
        });
    }

    let earlier: HashMap<&str, &NetDevCounters> =
        before.iter().map(|c| (c.device.as_str(), c)).collect();
    let mut rates = Vec::with_capacity(after.len());
    for now in after {
        let Some(then) = earlier.get(now.device.as_str()) else {
            warn_mismatch(&now.device);
            continue;
        };
        rates.push(NetUsage {
            device: now.device.clone(),
            rx: rate_kbit(now.rx_bytes.saturating_sub(then.rx_bytes), secs),
            tx: rate_kbit(now.tx_bytes.saturating_sub(then.tx_bytes), secs),
        });
    }
    warn_vanished(
        before.iter().map(|c| c.device.as_str()),
        after.iter().map(|c| c.device.as_str()),
    );
    Ok(rates)
}

pub fn peer_rates(
    before: &[PeerCounters],
    after: &[PeerCounters],
    secs: f64,
) -> Result<Vec<WgPeer>, SampleError> {
    if secs <= 0.0 {
        return Err(SampleError::InsufficientDelta {
            what: "peer window",
        });
    }

    let earlier: HashMap<&str, &PeerCounters> =
        before.iter().map(|p| (p.internal_ip.as_str(), p)).collect();
    let mut peers = Vec::with_capacity(after.len());
    for now in after {
        let Some(then) = earlier.get(now.internal_ip.as_str()) else {
            warn_mismatch(&now.internal_ip);
            continue;
        };
        peers.push(WgPeer {
            internal_ip: now.internal_ip.clone(),
            external_ip: now.external_ip.clone(),
            latest_handshake: now.latest_handshake,
            data_rates: PeerRate {
                rx: rate_kbit(now.rx_bytes.saturating_sub(then.rx_bytes), secs),
                tx: rate_kbit(now.tx_bytes.saturating_sub(then.tx_bytes), secs),
            },
        });
    }
    warn_vanished(
        before.iter().map(|p| p.internal_ip.as_str()),
        after.iter().map(|p| p.internal_ip.as_str()),
    );
    Ok(peers)
}

// kbit/s = bytes * 8 / 1000 / s
fn rate_kbit(delta_bytes: u64, secs: f64) -> f64 {
    delta_bytes as f64 / secs / 125.0
}

fn warn_mismatch(key: &str) {
    let e = SampleError::RowSetMismatch {
        key: key.to_string(),
    };
    tracing::warn!(error = %e, "dropping row from rate sample");
}

fn warn_vanished<'a>(
    before: impl Iterator<Item = &'a str>,
    after: impl Iterator<Item = &'a str>,
) {
    let kept: HashSet<&str> = after.collect();
    for key in before {
        if !kept.contains(key) {
            warn_mismatch(key);
        }
    }
}
