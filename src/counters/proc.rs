// /proc-backed counter source

use std::time::Duration;

use super::{CounterSource, CpuTicks, MemInfo, NetDevCounters};
use crate::error::SampleError;

/// Reads cumulative counters from /proc. Stateless; every method call is an
/// independent snapshot.
#[derive(Debug, Clone, Copy, Default)]
pub struct ProcCounters;

impl ProcCounters {
    pub fn new() -> Self {
        Self
    }
}

impl CounterSource for ProcCounters {
    fn cpu(&self) -> Result<CpuTicks, SampleError> {
        parse_cpu_ticks(&read_proc("/proc/stat")?)
    }

    fn memory(&self) -> Result<MemInfo, SampleError> {
        parse_meminfo(&read_proc("/proc/meminfo")?)
    }

    fn network(&self) -> Result<Vec<NetDevCounters>, SampleError> {
        parse_net_dev(&read_proc("/proc/net/dev")?)
    }

    fn uptime(&self) -> Result<Duration, SampleError> {
        parse_uptime(&read_proc("/proc/uptime")?)
    }
}

fn read_proc(path: &'static str) -> Result<String, SampleError> {
    std::fs::read_to_string(path).map_err(|e| SampleError::SourceUnavailable {
        origin: path,
        reason: e.to_string(),
    })
}

/// Parses the aggregate `cpu` line of /proc/stat. Ticks are folded so the
/// three buckets cover every counted tick: nice counts as user, iowait as
/// idle, and irq/softirq/steal as system. Kernels older than 2.6.11 report
/// fewer columns; missing trailing columns read as zero.
pub(super) fn parse_cpu_ticks(stat: &str) -> Result<CpuTicks, SampleError> {
    let line = stat
        .lines()
        .find(|l| l.starts_with("cpu "))
        .ok_or_else(|| malformed("/proc/stat", stat.lines().next().unwrap_or_default()))?;

    let ticks: Vec<u64> = line
        .split_whitespace()
        .skip(1)
        .map(|f| f.parse())
        .collect::<Result<_, _>>()
        .map_err(|_| malformed("/proc/stat", line))?;
    if ticks.len() < 4 {
        return Err(malformed("/proc/stat", line));
    }

    let t = |i: usize| ticks.get(i).copied().unwrap_or(0);
    let user = t(0) + t(1);
    let system = t(2) + t(5) + t(6) + t(7);
    let idle = t(3) + t(4);
    Ok(CpuTicks {
        user,
        system,
        idle,
        total: user + system + idle,
    })
}

/// Parses /proc/meminfo (values in KiB). Buffers and reclaimable slab are
/// folded into `cached` to match what tools like free(1) report.
pub(super) fn parse_meminfo(text: &str) -> Result<MemInfo, SampleError> {
    let mut total = None;
    let mut free = None;
    let mut buffers = 0;
    let mut cached = 0;
    let mut sreclaimable = 0;
    let mut swap_total = 0;
    let mut swap_free = 0;

    for line in text.lines() {
        let Some((key, rest)) = line.split_once(':') else {
            continue;
        };
        match key {
            "MemTotal" => total = Some(parse_kib(rest, line)?),
            "MemFree" => free = Some(parse_kib(rest, line)?),
            "Buffers" => buffers = parse_kib(rest, line)?,
            "Cached" => cached = parse_kib(rest, line)?,
            "SReclaimable" => sreclaimable = parse_kib(rest, line)?,
            "SwapTotal" => swap_total = parse_kib(rest, line)?,
            "SwapFree" => swap_free = parse_kib(rest, line)?,
            _ => {}
        }
    }

    let total = total.ok_or_else(|| malformed("/proc/meminfo", "missing MemTotal"))?;
    let free = free.ok_or_else(|| malformed("/proc/meminfo", "missing MemFree"))?;
    Ok(MemInfo {
        total,
        free,
        cached: buffers + cached + sreclaimable,
        swap_total,
        swap_free,
    })
}

fn parse_kib(rest: &str, line: &str) -> Result<u64, SampleError> {
    rest.split_whitespace()
        .next()
        .and_then(|v| v.parse().ok())
        .ok_or_else(|| malformed("/proc/meminfo", line))
}

/// Parses /proc/net/dev. Unparseable rows are skipped with a warning so one
/// odd interface cannot hide the rest.
pub(super) fn parse_net_dev(text: &str) -> Result<Vec<NetDevCounters>, SampleError> {
    let mut rows = Vec::new();
    for line in text.lines() {
        let Some((name, rest)) = line.split_once(':') else {
            continue;
        };
        match parse_net_dev_row(name, rest, line) {
            Ok(row) => rows.push(row),
            Err(e) => tracing::warn!(error = %e, "skipping interface counter row"),
        }
    }
    Ok(rows)
}

fn parse_net_dev_row(name: &str, rest: &str, line: &str) -> Result<NetDevCounters, SampleError> {
    let fields: Vec<&str> = rest.split_whitespace().collect();
    // 8 receive columns then 8 transmit columns; bytes are first of each
    if fields.len() < 16 {
        return Err(malformed("/proc/net/dev", line));
    }
    let rx_bytes = fields[0]
        .parse()
        .map_err(|_| malformed("/proc/net/dev", line))?;
    let tx_bytes = fields[8]
        .parse()
        .map_err(|_| malformed("/proc/net/dev", line))?;
    Ok(NetDevCounters {
        device: name.trim().to_string(),
        rx_bytes,
        tx_bytes,
    })
}

pub(super) fn parse_uptime(text: &str) -> Result<Duration, SampleError> {
    let secs: f64 = text
        .split_whitespace()
        .next()
        .and_then(|v| v.parse().ok())
        .ok_or_else(|| malformed("/proc/uptime", text.trim()))?;
    Ok(Duration::from_secs_f64(secs))
}

fn malformed(origin: &'static str, row: &str) -> SampleError {
    SampleError::MalformedCounterRow {
        origin,
        row: row.to_string(),
    }
}
