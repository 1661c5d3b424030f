// Concurrent fan-out collection of one host snapshot

use std::time::Duration;

use sysinfo::System;

use crate::counters::{CounterSource, PeerSource, ProcCounters, WgDumpSource};
use crate::error::{CollectError, SampleError};
use crate::models::{CpuUsage, HostSnapshot, MemUsage, NetUsage, WgPeer};
use crate::sampler;

/// The production wiring: /proc counters plus the wg dump command.
pub type HostCollector = Collector<ProcCounters, WgDumpSource>;

/// Sampling knobs shared by all measurements of one cycle.
#[derive(Debug, Clone, Copy)]
pub struct CollectOptions {
    pub window: Duration,
    pub include_swap: bool,
}

/// Runs the five measurements of one collection cycle concurrently and
/// assembles the snapshot. A failed measurement leaves its slot at the zero
/// value and is logged; only all five failing turns the whole cycle into an
/// error. The rate samplers sleep through their windows in parallel, so a
/// cycle takes about one window regardless of how many metrics it covers.
pub struct Collector<C, P> {
    counters: C,
    peers: P,
    options: CollectOptions,
}

impl<C: CounterSource, P: PeerSource> Collector<C, P> {
    pub fn new(counters: C, peers: P, options: CollectOptions) -> Self {
        Self {
            counters,
            peers,
            options,
        }
    }

    pub async fn collect(&self) -> Result<HostSnapshot, CollectError> {
        let window = self.options.window;
        let (uptime, cpu, memory, network, wireguard) = tokio::join!(
            async { sampler::sample_uptime(&self.counters) },
            sampler::sample_cpu(&self.counters, window),
            async { sampler::sample_memory(&self.counters, self.options.include_swap) },
            sampler::sample_network(&self.counters, window),
            sampler::sample_peers(&self.peers, window),
        );

        let mut errors = Vec::new();
        let uptime = unwrap_slot(uptime, "uptime", &mut errors);
        let cpu = unwrap_slot(cpu, "cpu", &mut errors);
        let memory = unwrap_slot(memory, "memory", &mut errors);
        let network = unwrap_slot(network, "network", &mut errors);
        let wireguard = unwrap_slot(wireguard, "wireguard", &mut errors);

        if errors.len() == 5 {
            return Err(CollectError::new(&errors));
        }

        Ok(HostSnapshot {
            hostname: hostname(),
            uptime,
            cpu,
            memory,
            network,
            wireguard,
        })
    }

    pub fn uptime(&self) -> Result<u64, SampleError> {
        sampler::sample_uptime(&self.counters)
    }

    pub async fn cpu(&self) -> Result<CpuUsage, SampleError> {
        sampler::sample_cpu(&self.counters, self.options.window).await
    }

    pub fn memory(&self) -> Result<MemUsage, SampleError> {
        sampler::sample_memory(&self.counters, self.options.include_swap)
    }

    pub async fn network(&self) -> Result<Vec<NetUsage>, SampleError> {
        sampler::sample_network(&self.counters, self.options.window).await
    }

    pub async fn wireguard(&self) -> Result<Vec<WgPeer>, SampleError> {
        sampler::sample_peers(&self.peers, self.options.window).await
    }
}

fn unwrap_slot<T: Default>(
    result: Result<T, SampleError>,
    operation: &'static str,
    errors: &mut Vec<SampleError>,
) -> T {
    match result {
        Ok(value) => value,
        Err(e) => {
            tracing::warn!(error = %e, operation, "measurement failed");
            errors.push(e);
            T::default()
        }
    }
}

/// Host name via sysinfo. An unnamed host degrades to an empty string
/// instead of failing the cycle.
fn hostname() -> String {
    System::host_name().unwrap_or_else(|| {
        tracing::warn!(operation = "hostname", "host name unavailable");
        String::new()
    })
}
