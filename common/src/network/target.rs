//! # Scan Target Model
//!
//! Defines the input of a port scan: one host and the ports to probe on it.
//!
//! Port lists arrive from the command line as specifications, each of which is:
//! * A single port (e.g., `22`).
//! * An inclusive range (e.g., `100-102`).
//! * A comma-separated list of either (e.g., `22,80,8000-8002`).
//!
//! Expansion happens here, before the scanner runs; the scanner only ever sees
//! a flat sequence of ports.

use std::str::FromStr;

use crate::error::PortParseError;

/// A host and the ports to probe on it. Read-only for the duration of a scan.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Target {
    /// Hostname or IP address, passed through to the resolver untouched.
    pub host: String,
    pub ports: Vec<u16>,
}

impl Target {
    pub fn new(host: impl Into<String>, ports: Vec<u16>) -> Self {
        Self {
            host: host.into(),
            ports,
        }
    }
}

/// One port specification as typed by the user.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum PortSpec {
    Single(u16),
    Range { start: u16, end: u16 },
    List(Vec<PortSpec>),
}

impl PortSpec {
    /// Appends every port described by this spec to `out`, in order.
    fn expand_into(&self, out: &mut Vec<u16>) {
        match self {
            PortSpec::Single(port) => out.push(*port),
            PortSpec::Range { start, end } => out.extend(*start..=*end),
            PortSpec::List(specs) => {
                for spec in specs {
                    spec.expand_into(out);
                }
            }
        }
    }
}

impl FromStr for PortSpec {
    type Err = PortParseError;

    /// Parses a string into a `PortSpec`.
    ///
    /// Supported formats:
    /// * **Single**: "443".
    /// * **Range**: "Start-End", inclusive (e.g., "8000-8010").
    /// * **List**: comma-separated singles and ranges (e.g., "22,80,100-102").
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if s.is_empty() {
            return Err(PortParseError::Empty);
        }

        if s.contains(',') {
            return parse_commas(s);
        }

        if let Some(spec) = parse_range(s)? {
            return Ok(spec);
        }

        parse_port(s).map(PortSpec::Single)
    }
}

/// Expands a sequence of port specifications into a flat port list.
///
/// Order is preserved and duplicates are kept; probing a port twice is
/// redundant but harmless.
pub fn expand_ports(specs: &[PortSpec]) -> Vec<u16> {
    let mut ports = Vec::new();
    for spec in specs {
        spec.expand_into(&mut ports);
    }
    ports
}

fn parse_commas(s: &str) -> Result<PortSpec, PortParseError> {
    let mut specs = Vec::new();

    for part in s.split(',') {
        let part = part.trim();
        if part.is_empty() {
            continue;
        }
        specs.push(PortSpec::from_str(part)?);
    }

    if specs.is_empty() {
        return Err(PortParseError::Empty);
    }

    Ok(PortSpec::List(specs))
}

/// Parses "start-end". Returns `None` when the string is not a range at all.
fn parse_range(s: &str) -> Result<Option<PortSpec>, PortParseError> {
    let Some((start_str, end_str)) = s.split_once('-') else {
        return Ok(None);
    };

    let start = parse_port(start_str)?;
    let end = parse_port(end_str)?;

    if start > end {
        return Err(PortParseError::ReversedRange { start, end });
    }

    Ok(Some(PortSpec::Range { start, end }))
}

fn parse_port(s: &str) -> Result<u16, PortParseError> {
    let s = s.trim();
    match s.parse::<u16>() {
        Ok(0) | Err(_) => Err(PortParseError::InvalidPort(s.to_string())),
        Ok(port) => Ok(port),
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
