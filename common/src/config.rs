use std::time::Duration;

/// Upper bound on simultaneously in-flight probes.
pub const DEFAULT_CONCURRENCY: usize = 100;
pub const DEFAULT_CONNECT_TIMEOUT: Duration = Duration::from_secs(1);
pub const DEFAULT_PROBE_DELAY: Duration = Duration::from_millis(100);

#[derive(Debug, Clone)]
pub struct Config {
    /// Capacity of the permit pool shared by every probe of one scan.
    pub concurrency: usize,
    /// Budget for connecting and reading the banner, per probe.
    ///
    /// The banner read only gets what is left after the connect.
    pub connect_timeout: Duration,
    /// Pause taken by every probe after its permit is released.
    pub probe_delay: Duration,
    /// Hard cap on the whole scan. Probes still pending when it expires are
    /// aborted and reported as timed out.
    pub scan_timeout: Option<Duration>,
    pub quiet: u8,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            concurrency: DEFAULT_CONCURRENCY,
            connect_timeout: DEFAULT_CONNECT_TIMEOUT,
            probe_delay: DEFAULT_PROBE_DELAY,
            scan_timeout: None,
            quiet: 0,
        }
    }
}
