use thiserror::Error;

/// Failures of the scan machinery itself, as opposed to the outcome of a probe.
#[derive(Error, Debug)]
pub enum ScanError {
    #[error("concurrency limit must be between 1 and {max}, got {requested}")]
    InvalidConcurrency { requested: usize, max: usize },

    #[error("concurrency limiter was closed")]
    LimiterClosed,

    #[error("probe task for port {port} failed: {message}")]
    ProbeTask { port: u16, message: String },
}

#[derive(Error, Debug, PartialEq, Eq)]
pub enum PortParseError {
    #[error("empty port specification")]
    Empty,

    #[error("invalid port '{0}': expected a number between 1 and 65535")]
    InvalidPort(String),

    #[error("invalid port range {start}-{end}: start is greater than end")]
    ReversedRange { start: u16, end: u16 },
}
