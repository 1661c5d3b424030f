// Delta and rate math over counter snapshot pairs

use wgmon::counters::{CpuTicks, MemInfo, NetDevCounters, PeerCounters};
use wgmon::error::SampleError;
use wgmon::sampler::{cpu_percentages, memory_usage, net_rates, peer_rates};

fn close(a: f64, b: f64) -> bool {
    (a - b).abs() < 1e-9
}

fn nic(device: &str, rx_bytes: u64, tx_bytes: u64) -> NetDevCounters {
    NetDevCounters {
        device: device.to_string(),
        rx_bytes,
        tx_bytes,
    }
}

fn peer_row(internal_ip: &str, latest_handshake: i64, rx_bytes: u64, tx_bytes: u64) -> PeerCounters {
    PeerCounters {
        internal_ip: internal_ip.to_string(),
        external_ip: "203.0.113.10:51820".to_string(),
        latest_handshake,
        rx_bytes,
        tx_bytes,
    }
}

#[test]
fn test_cpu_percentages_from_tick_deltas() {
    let before = CpuTicks {
        user: 100,
        system: 50,
        idle: 850,
        total: 1000,
    };
    let after = CpuTicks {
        user: 200,
        system: 100,
        idle: 1700,
        total: 2000,
    };

    let cpu = cpu_percentages(before, after).unwrap();
    assert!(close(cpu.user, 10.0));
    assert!(close(cpu.system, 5.0));
    assert!(close(cpu.idle, 85.0));
}

#[test]
fn test_cpu_percentages_sum_to_one_hundred() {
    let pairs = [
        (
            CpuTicks {
                user: 0,
                system: 0,
                idle: 0,
                total: 0,
            },
            CpuTicks {
                user: 7,
                system: 3,
                idle: 90,
                total: 100,
            },
        ),
        (
            CpuTicks {
                user: 4123,
                system: 997,
                idle: 881_204,
                total: 886_324,
            },
            CpuTicks {
                user: 4130,
                system: 1001,
                idle: 881_500,
                total: 886_631,
            },
        ),
        (
            CpuTicks {
                user: 1,
                system: 1,
                idle: 1,
                total: 3,
            },
            CpuTicks {
                user: 2,
                system: 1,
                idle: 1,
                total: 4,
            },
        ),
    ];

    for (before, after) in pairs {
        let cpu = cpu_percentages(before, after).unwrap();
        let sum = cpu.user + cpu.system + cpu.idle;
        assert!((sum - 100.0).abs() < 0.01, "sum {sum} for {after:?}");
    }
}

#[test]
fn test_cpu_zero_delta_is_an_error() {
    let ticks = CpuTicks {
        user: 100,
        system: 50,
        idle: 850,
        total: 1000,
    };
    let err = cpu_percentages(ticks, ticks).unwrap_err();
    assert!(matches!(err, SampleError::InsufficientDelta { .. }));
}

#[test]
fn test_cpu_field_rollover_clamps_to_zero() {
    // A single bucket going backwards must not underflow while the
    // total still advances.
    let before = CpuTicks {
        user: 500,
        system: 0,
        idle: 500,
        total: 1000,
    };
    let after = CpuTicks {
        user: 400,
        system: 100,
        idle: 1600,
        total: 2100,
    };

    let cpu = cpu_percentages(before, after).unwrap();
    assert!(close(cpu.user, 0.0));
}

#[test]
fn test_memory_percentages_sum_to_one_hundred() {
    let mem = MemInfo {
        total: 16_384_000,
        free: 4_096_000,
        cached: 2_048_000,
        swap_total: 0,
        swap_free: 0,
    };

    let usage = memory_usage(mem, false).unwrap();
    assert!(close(usage.used, 62.5));
    assert!(close(usage.cached, 12.5));
    assert!(close(usage.free, 25.0));
    assert!((usage.used + usage.cached + usage.free - 100.0).abs() < 0.01);
}

#[test]
fn test_memory_swap_reported_only_when_enabled() {
    let mem = MemInfo {
        total: 8_000_000,
        free: 4_000_000,
        cached: 1_000_000,
        swap_total: 8_000_000,
        swap_free: 6_000_000,
    };

    let without = memory_usage(mem, false).unwrap();
    assert_eq!(without.swap_used, None);
    assert_eq!(without.swap_free, None);

    let with = memory_usage(mem, true).unwrap();
    assert!(close(with.swap_used.unwrap(), 25.0));
    assert!(close(with.swap_free.unwrap(), 75.0));
}

#[test]
fn test_memory_swapless_host_never_reports_swap() {
    let mem = MemInfo {
        total: 8_000_000,
        free: 4_000_000,
        cached: 1_000_000,
        swap_total: 0,
        swap_free: 0,
    };

    let usage = memory_usage(mem, true).unwrap();
    assert_eq!(usage.swap_used, None);
    assert_eq!(usage.swap_free, None);
}

#[test]
fn test_memory_zero_total_is_an_error() {
    let err = memory_usage(MemInfo::default(), false).unwrap_err();
    assert!(matches!(err, SampleError::InsufficientDelta { .. }));
}

#[test]
fn test_kilobit_rate_math() {
    // 1000 bytes in one second is 8 kbit/s.
    let rates = net_rates(&[nic("eth0", 0, 0)], &[nic("eth0", 1000, 250)], 1.0).unwrap();
    assert!(close(rates[0].rx, 8.0));
    assert!(close(rates[0].tx, 2.0));

    let rates = net_rates(&[nic("eth0", 0, 0)], &[nic("eth0", 125_000, 0)], 2.0).unwrap();
    assert!(close(rates[0].rx, 500.0));
}

#[test]
fn test_net_rates_pair_rows_by_device_name() {
    let before = vec![nic("eth0", 1000, 2000), nic("wg0", 500, 700)];
    let after = vec![nic("wg0", 1750, 700), nic("eth0", 1000, 4500)];

    let rates = net_rates(&before, &after, 1.0).unwrap();
    assert_eq!(rates.len(), 2);
    assert_eq!(rates[0].device, "wg0");
    assert!(close(rates[0].rx, 10.0));
    assert!(close(rates[0].tx, 0.0));
    assert_eq!(rates[1].device, "eth0");
    assert!(close(rates[1].rx, 0.0));
    assert!(close(rates[1].tx, 20.0));
}

#[test]
fn test_net_rates_drop_unmatched_rows() {
    // eth1 came up mid-window; without both endpoints there is no delta.
    let before = vec![nic("eth0", 0, 0)];
    let after = vec![nic("eth0", 1000, 0), nic("eth1", 9999, 9999)];

    let rates = net_rates(&before, &after, 1.0).unwrap();
    assert_eq!(rates.len(), 1);
    assert_eq!(rates[0].device, "eth0");

    // And the reverse: an interface that vanished mid-window.
    let rates = net_rates(&after, &before, 1.0).unwrap();
    assert_eq!(rates.len(), 1);
    assert_eq!(rates[0].device, "eth0");
}

#[test]
fn test_net_rates_zero_window_is_an_error() {
    let rows = vec![nic("eth0", 0, 0)];
    let err = net_rates(&rows, &rows, 0.0).unwrap_err();
    assert!(matches!(err, SampleError::InsufficientDelta { .. }));
}

#[test]
fn test_net_counter_reset_clamps_to_zero() {
    let rates = net_rates(&[nic("eth0", 5000, 5000)], &[nic("eth0", 100, 100)], 1.0).unwrap();
    assert!(close(rates[0].rx, 0.0));
    assert!(close(rates[0].tx, 0.0));
}

#[test]
fn test_peer_rates_pair_rows_by_internal_ip() {
    let before = vec![
        peer_row("10.0.10.2/32", 0, 0, 0),
        peer_row("10.0.10.7/32", 1_724_000_000, 1000, 1000),
    ];
    let after = vec![
        peer_row("10.0.10.7/32", 1_724_380_000, 13_500, 1000),
        peer_row("10.0.10.2/32", 1_724_380_100, 125_000, 62_500),
    ];

    let peers = peer_rates(&before, &after, 1.0).unwrap();
    assert_eq!(peers.len(), 2);

    assert_eq!(peers[0].internal_ip, "10.0.10.7/32");
    assert!(close(peers[0].data_rates.rx, 100.0));
    assert!(close(peers[0].data_rates.tx, 0.0));
    // Addressing and handshake always come from the later snapshot.
    assert_eq!(peers[0].latest_handshake, 1_724_380_000);

    assert_eq!(peers[1].internal_ip, "10.0.10.2/32");
    assert!(close(peers[1].data_rates.rx, 1000.0));
    assert!(close(peers[1].data_rates.tx, 500.0));
}

#[test]
fn test_peer_rates_drop_unmatched_rows() {
    let before = vec![peer_row("10.0.10.2/32", 0, 0, 0)];
    let after = vec![
        peer_row("10.0.10.2/32", 0, 2000, 0),
        peer_row("10.0.10.9/32", 0, 500, 500),
    ];

    let peers = peer_rates(&before, &after, 2.0).unwrap();
    assert_eq!(peers.len(), 1);
    assert_eq!(peers[0].internal_ip, "10.0.10.2/32");
    assert!(close(peers[0].data_rates.rx, 8.0));
}
