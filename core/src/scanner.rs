//! The central **orchestration** of a port scan.
//!
//! A scan fans out one probe per requested port, lets every probe contend for
//! a shared [`ConcurrencyLimiter`], and joins all of them before building the
//! [`ScanResult`]. Nothing is streamed: either every probe finishes and a
//! result is produced, or the scan fails as a whole. The optional scan deadline
//! is handed to every probe, which stops waiting or connecting once it passes.
//!
//! **Architectural Note:**
//! The orchestrator only depends on the [`Prober`] abstraction. The concrete
//! [`TcpProber`] is plugged in by [`PortScanner::new`]; tests plug in their own.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use bannr_common::config::Config;
use bannr_common::error::ScanError;
use bannr_common::network::outcome::{ProbeOutcome, ScanResult};
use bannr_common::network::target::Target;
use tokio::task::{Id, JoinError, JoinSet};
use tokio::time::Instant;
use tracing::error;

use crate::network::limiter::ConcurrencyLimiter;
use crate::network::tcp::TcpProber;

/// Strategy for classifying a single port.
#[async_trait]
pub trait Prober: Send + Sync {
    /// Probes `host:port`. Must hold a permit from `limiter` for as long as a
    /// connection is open, and must never fail: every failure is an outcome.
    ///
    /// Once `scan_deadline` passes, a probe that has not finished its connect
    /// and banner read reports a timeout. An outcome already reached is never
    /// changed by it.
    async fn probe(
        &self,
        host: &str,
        port: u16,
        limiter: &ConcurrencyLimiter,
        scan_deadline: Option<Instant>,
    ) -> ProbeOutcome;
}

/// Invoked with the number of finished probes every time one completes.
pub type ProgressCallback = Box<dyn Fn(usize) + Send + Sync>;

pub struct PortScanner<P> {
    prober: Arc<P>,
    concurrency: usize,
    scan_timeout: Option<Duration>,
    on_probe_done: Option<ProgressCallback>,
}

impl PortScanner<TcpProber> {
    pub fn new(cfg: &Config) -> Self {
        Self::with_prober(TcpProber::from_config(cfg), cfg)
    }
}

impl<P: Prober + 'static> PortScanner<P> {
    pub fn with_prober(prober: P, cfg: &Config) -> Self {
        Self {
            prober: Arc::new(prober),
            concurrency: cfg.concurrency,
            scan_timeout: cfg.scan_timeout,
            on_probe_done: None,
        }
    }

    pub fn on_probe_done(mut self, callback: ProgressCallback) -> Self {
        self.on_probe_done = Some(callback);
        self
    }

    /// Probes every port of `target` and keeps the open ones.
    pub async fn scan(&self, target: &Target) -> Result<ScanResult, ScanError> {
        let outcomes: Vec<ProbeOutcome> = self.probe_all(target).await?;
        Ok(ScanResult::from_outcomes(target.host.clone(), outcomes))
    }

    /// Probes every port of `target` and returns all outcomes, in completion order.
    ///
    /// A fresh limiter is built for each call so scans never share permits.
    pub async fn probe_all(&self, target: &Target) -> Result<Vec<ProbeOutcome>, ScanError> {
        let limiter: ConcurrencyLimiter = ConcurrencyLimiter::new(self.concurrency)?;
        let scan_deadline: Option<Instant> = self.scan_timeout.map(|limit| Instant::now() + limit);
        let host: Arc<str> = Arc::from(target.host.as_str());

        let mut tasks: JoinSet<ProbeOutcome> = JoinSet::new();
        let mut pending: HashMap<Id, u16> = HashMap::with_capacity(target.ports.len());

        for &port in &target.ports {
            let prober = Arc::clone(&self.prober);
            let limiter = limiter.clone();
            let host = Arc::clone(&host);

            let handle = tasks.spawn(async move { prober.probe(&host, port, &limiter, scan_deadline).await });
            pending.insert(handle.id(), port);
        }

        let mut outcomes: Vec<ProbeOutcome> = Vec::with_capacity(target.ports.len());
        self.join_all(&mut tasks, &mut pending, &mut outcomes).await?;
        Ok(outcomes)
    }

    async fn join_all(
        &self,
        tasks: &mut JoinSet<ProbeOutcome>,
        pending: &mut HashMap<Id, u16>,
        outcomes: &mut Vec<ProbeOutcome>,
    ) -> Result<(), ScanError> {
        while let Some(joined) = tasks.join_next_with_id().await {
            match joined {
                Ok((id, outcome)) => {
                    pending.remove(&id);
                    outcomes.push(outcome);
                    if let Some(callback) = &self.on_probe_done {
                        callback(outcomes.len());
                    }
                }
                Err(e) => return Err(task_failure(pending, e)),
            }
        }
        Ok(())
    }
}

/// Probes `ports` on `host` with a [`TcpProber`] configured from `cfg`.
pub async fn scan_ports(host: &str, ports: &[u16], cfg: &Config) -> Result<ScanResult, ScanError> {
    let target: Target = Target::new(host, ports.to_vec());
    PortScanner::new(cfg).scan(&target).await
}

fn task_failure(pending: &mut HashMap<Id, u16>, e: JoinError) -> ScanError {
    let port: u16 = pending.remove(&e.id()).unwrap_or_default();
    error!(port, error = %e, "probe task failed");
    ScanError::ProbeTask {
        port,
        message: e.to_string(),
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
