use std::io::ErrorKind;
use std::time::Duration;

use async_trait::async_trait;
use bannr_common::config::Config;
use bannr_common::network::outcome::{ProbeOutcome, ProbeStatus};
use tokio::io::AsyncWriteExt;
use tokio::net::TcpStream;
use tokio::time::{Instant, sleep, timeout_at};
use tracing::{debug, error, warn};

use crate::network::banner::read_banner;
use crate::network::limiter::ConcurrencyLimiter;
use crate::scanner::Prober;

/// Full TCP handshake prober that grabs the service banner of open ports.
#[derive(Debug, Clone)]
pub struct TcpProber {
    connect_timeout: Duration,
    probe_delay: Duration,
}

impl TcpProber {
    pub fn new(connect_timeout: Duration, probe_delay: Duration) -> Self {
        Self {
            connect_timeout,
            probe_delay,
        }
    }

    pub fn from_config(cfg: &Config) -> Self {
        Self::new(cfg.connect_timeout, cfg.probe_delay)
    }

    /// Waits for a permit, then runs the handshake.
    ///
    /// A `scan_deadline` bounds the permit wait, the connect and the banner
    /// read. Probes still waiting for a permit when it passes time out without
    /// connecting.
    async fn bounded_probe(
        &self,
        host: &str,
        port: u16,
        limiter: &ConcurrencyLimiter,
        scan_deadline: Option<Instant>,
    ) -> ProbeOutcome {
        let acquired = match scan_deadline {
            Some(deadline) => match timeout_at(deadline, limiter.acquire()).await {
                Ok(acquired) => acquired,
                Err(_elapsed) => return ProbeOutcome::timeout(port),
            },
            None => limiter.acquire().await,
        };

        let _permit = match acquired {
            Ok(permit) => permit,
            Err(e) => return ProbeOutcome::error(port, e.to_string()),
        };

        if scan_deadline.is_some_and(|deadline| Instant::now() >= deadline) {
            return ProbeOutcome::timeout(port);
        }

        self.handshake_probe(host, port, scan_deadline).await
    }

    /// Connects, reads the banner and tears the connection down, all within
    /// one `connect_timeout` budget.
    async fn handshake_probe(&self, host: &str, port: u16, scan_deadline: Option<Instant>) -> ProbeOutcome {
        let deadline: Instant = earliest(Instant::now() + self.connect_timeout, scan_deadline);

        let mut stream: TcpStream = match timeout_at(deadline, TcpStream::connect((host, port))).await {
            Ok(Ok(stream)) => stream,
            Ok(Err(e)) => return classify_connect_error(port, e),
            Err(_elapsed) => return ProbeOutcome::timeout(port),
        };

        let banner = read_banner(&mut stream, deadline).await;

        if let Err(e) = stream.shutdown().await {
            debug!(host, port, error = %e, "shutdown after banner read failed");
        }
        drop(stream);

        match banner {
            Ok(banner) => ProbeOutcome::open(port, banner),
            Err(e) => ProbeOutcome::error(port, e.to_string()),
        }
    }
}

#[async_trait]
impl Prober for TcpProber {
    async fn probe(
        &self,
        host: &str,
        port: u16,
        limiter: &ConcurrencyLimiter,
        scan_deadline: Option<Instant>,
    ) -> ProbeOutcome {
        let outcome: ProbeOutcome = self.bounded_probe(host, port, limiter, scan_deadline).await;

        log_outcome(host, &outcome);
        sleep(self.probe_delay).await;
        outcome
    }
}

fn earliest(deadline: Instant, cap: Option<Instant>) -> Instant {
    cap.map_or(deadline, |cap| deadline.min(cap))
}

fn classify_connect_error(port: u16, e: std::io::Error) -> ProbeOutcome {
    match e.kind() {
        ErrorKind::ConnectionRefused => ProbeOutcome::refused(port),
        ErrorKind::TimedOut => ProbeOutcome::timeout(port),
        _ => ProbeOutcome::error(port, e.to_string()),
    }
}

fn log_outcome(host: &str, outcome: &ProbeOutcome) {
    let port: u16 = outcome.port;
    let status: ProbeStatus = outcome.status;
    match status {
        ProbeStatus::Open => {}
        ProbeStatus::Timeout => warn!(host, port, %status, "Timeout occurred for port {port} on {host}"),
        ProbeStatus::Refused => warn!(host, port, %status, "Connection refused for port {port} on {host}"),
        ProbeStatus::Error => {
            let detail: &str = outcome.detail.as_deref().unwrap_or("unknown error");
            error!(host, port, %status, "Unexpected error for port {port} on {host}: {detail}");
        }
    }
}

// ╔════════════════════════════════════════════╗
// ║ ████████╗███████╗███████╗████████╗███████╗ ║
// ║ ╚══██╔══╝██╔════╝██╔════╝╚══██╔══╝██╔════╝ ║
// ║    ██║   █████╗  ███████╗   ██║   ███████╗ ║
// ║    ██║   ██╔══╝  ╚════██║   ██║   ╚════██║ ║
// ║    ██║   ███████╗███████║   ██║   ███████║ ║
// ║    ╚═╝   ╚══════╝╚══════╝   ╚═╝   ╚══════╝ ║
// ╚════════════════════════════════════════════╝
