//! Per-port probe outcomes and the aggregate handed to result sinks.

use std::collections::BTreeMap;
use std::fmt;

use serde::Serialize;

/// Classification of a single probe. Exactly one per port per scan.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ProbeStatus {
    /// The connection was established. A banner may or may not follow.
    Open,
    /// The connect did not finish within the budget.
    Timeout,
    /// The remote side actively rejected the connection.
    Refused,
    /// Anything else: resolution failure, unreachable network, undecodable banner.
    Error,
}

impl ProbeStatus {
    pub fn is_open(self) -> bool {
        matches!(self, ProbeStatus::Open)
    }
}

impl fmt::Display for ProbeStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ProbeStatus::Open => "open",
            ProbeStatus::Timeout => "timeout",
            ProbeStatus::Refused => "refused",
            ProbeStatus::Error => "error",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProbeOutcome {
    pub port: u16,
    pub status: ProbeStatus,
    /// Only ever set for [`ProbeStatus::Open`].
    pub banner: Option<String>,
    /// Only ever set for [`ProbeStatus::Error`].
    pub detail: Option<String>,
}

impl ProbeOutcome {
    pub fn open(port: u16, banner: Option<String>) -> Self {
        Self {
            port,
            status: ProbeStatus::Open,
            banner,
            detail: None,
        }
    }

    pub fn timeout(port: u16) -> Self {
        Self::closed(port, ProbeStatus::Timeout, None)
    }

    pub fn refused(port: u16) -> Self {
        Self::closed(port, ProbeStatus::Refused, None)
    }

    pub fn error(port: u16, detail: impl Into<String>) -> Self {
        Self::closed(port, ProbeStatus::Error, Some(detail.into()))
    }

    fn closed(port: u16, status: ProbeStatus, detail: Option<String>) -> Self {
        Self {
            port,
            status,
            banner: None,
            detail,
        }
    }
}

/// Open ports of one host mapped to whatever banner they sent.
///
/// Serializes as `{"host": ..., "open_ports": {"<port>": <banner|null>}}`,
/// ports ascending.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ScanResult {
    pub host: String,
    pub open_ports: BTreeMap<u16, Option<String>>,
}

impl ScanResult {
    pub fn new(host: impl Into<String>) -> Self {
        Self {
            host: host.into(),
            open_ports: BTreeMap::new(),
        }
    }

    /// Builds the aggregate from finished probes, dropping everything not open.
    pub fn from_outcomes<I>(host: impl Into<String>, outcomes: I) -> Self
    where
        I: IntoIterator<Item = ProbeOutcome>,
    {
        let mut result = Self::new(host);
        for outcome in outcomes {
            result.record(outcome);
        }
        result
    }

    /// Keeps `outcome` if it is open. A later outcome for the same port wins.
    pub fn record(&mut self, outcome: ProbeOutcome) {
        if outcome.status.is_open() {
            self.open_ports.insert(outcome.port, outcome.banner);
        }
    }

    pub fn is_empty(&self) -> bool {
        self.open_ports.is_empty()
    }

    pub fn len(&self) -> usize {
        self.open_ports.len()
    }

    pub fn banner(&self, port: u16) -> Option<&str> {
        self.open_ports.get(&port).and_then(|b| b.as_deref())
    }

    pub fn is_open(&self, port: u16) -> bool {
        self.open_ports.contains_key(&port)
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
