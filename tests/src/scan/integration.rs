#![cfg(test)]
use std::time::Duration;

use bannr_common::config::Config;
use bannr_common::network::outcome::{ProbeStatus, ScanResult};
use bannr_common::network::target::Target;
use bannr_core::scanner::{self, PortScanner};

use crate::utils::{self, closed_port, spawn_banner_listener, spawn_silent_listener, test_config};

/// One listener greeting with "ready\n" and one refused port:
/// only the listener shows up, with its trimmed banner.
#[tokio::test]
async fn scan_reports_banner_and_skips_closed_port() {
    let open = spawn_banner_listener(b"ready\n").await;
    let closed = closed_port().await;

    let result: ScanResult = scanner::scan_ports("127.0.0.1", &[closed, open], &test_config(100))
        .await
        .unwrap();

    let mut expected = ScanResult::new("127.0.0.1");
    expected.open_ports.insert(open, Some("ready".to_string()));
    assert_eq!(result, expected);
    assert!(!result.is_open(closed));
}

#[tokio::test]
async fn scan_of_refused_ports_is_empty() {
    let first = closed_port().await;
    let second = closed_port().await;
    let target = Target::new("127.0.0.1", vec![first, second]);
    let scanner = PortScanner::new(&test_config(10));

    let outcomes = scanner.probe_all(&target).await.unwrap();
    assert_eq!(outcomes.len(), 2);
    assert!(outcomes.iter().all(|o| o.status == ProbeStatus::Refused));

    let result = scanner.scan(&target).await.unwrap();
    assert!(result.is_empty());
}

#[tokio::test]
async fn empty_port_list_yields_empty_result() {
    let result = scanner::scan_ports("127.0.0.1", &[], &test_config(10)).await.unwrap();

    assert_eq!(result.host, "127.0.0.1");
    assert!(result.is_empty());
}

#[tokio::test]
async fn silent_service_is_open_without_banner() {
    let port = spawn_silent_listener().await;

    let result = scanner::scan_ports("127.0.0.1", &[port], &test_config(10)).await.unwrap();

    assert!(result.is_open(port));
    assert_eq!(result.open_ports.get(&port), Some(&None));
}

#[tokio::test]
async fn connections_never_exceed_concurrency_limit() {
    let (port, gauge) = utils::spawn_counting_listener(b"hello\r\n", Duration::from_millis(20)).await;
    let ports: Vec<u16> = vec![port; 24];

    let result = scanner::scan_ports("127.0.0.1", &ports, &test_config(4)).await.unwrap();

    assert_eq!(result.banner(port), Some("hello"));
    assert_eq!(gauge.accepted(), 24);
    assert!(gauge.peak() <= 4, "listener saw {} simultaneous connections", gauge.peak());
}

#[tokio::test]
async fn repeated_scans_agree() {
    let open = spawn_banner_listener(b"SSH-2.0-Test\r\n").await;
    let silent = spawn_silent_listener().await;
    let closed = closed_port().await;
    let ports = [open, silent, closed];
    let cfg = test_config(8);

    let first = scanner::scan_ports("127.0.0.1", &ports, &cfg).await.unwrap();
    let second = scanner::scan_ports("127.0.0.1", &ports, &cfg).await.unwrap();

    assert_eq!(first, second);
    assert_eq!(first.len(), 2);
}

/// One slow probe holds the only permit past the scan deadline: it keeps its
/// connection as open without a banner, the queued ones never connect.
#[tokio::test]
async fn scan_deadline_cuts_off_slow_probes() {
    let silent = spawn_silent_listener().await;
    let cfg = Config {
        connect_timeout: Duration::from_secs(2),
        scan_timeout: Some(Duration::from_millis(200)),
        ..test_config(1)
    };
    let target = Target::new("127.0.0.1", vec![silent, silent, silent]);

    let outcomes = PortScanner::new(&cfg).probe_all(&target).await.unwrap();

    assert_eq!(outcomes.len(), 3);
    let open: Vec<_> = outcomes.iter().filter(|o| o.status == ProbeStatus::Open).collect();
    let timed_out = outcomes.iter().filter(|o| o.status == ProbeStatus::Timeout).count();
    assert_eq!(open.len(), 1);
    assert!(open[0].banner.is_none());
    assert_eq!(timed_out, 2);
}

/// The pause after each connection may outlast the scan deadline without
/// costing an already-found banner.
#[tokio::test]
async fn banner_survives_pause_longer_than_scan_deadline() {
    let open = spawn_banner_listener(b"ready\n").await;
    let cfg = Config {
        probe_delay: Duration::from_millis(1000),
        scan_timeout: Some(Duration::from_millis(300)),
        ..test_config(10)
    };
    let target = Target::new("127.0.0.1", vec![open]);

    let outcomes = PortScanner::new(&cfg).probe_all(&target).await.unwrap();

    assert_eq!(outcomes.len(), 1);
    assert_eq!(outcomes[0].status, ProbeStatus::Open);
    assert_eq!(outcomes[0].banner.as_deref(), Some("ready"));

    let result = PortScanner::new(&cfg).scan(&target).await.unwrap();
    assert_eq!(result.banner(open), Some("ready"));
}
