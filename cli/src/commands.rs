pub mod scan;

use std::path::PathBuf;
use std::time::Duration;

use bannr_common::config::{Config, DEFAULT_CONCURRENCY};
use bannr_common::network::target::{PortSpec, Target, expand_ports};
use clap::{ArgAction, Parser};

use crate::output::OutputFormat;

#[derive(Parser, Debug)]
#[command(name = "bannr")]
#[command(about = "Probe TCP ports and grab the banners of open services.", version)]
pub struct CommandLine {
    /// Hostname or IP address of the target
    pub host: String,

    /// Ports to scan: single ports, ranges (100-102) or comma lists (22,80)
    #[arg(required = true, num_args = 1..)]
    pub ports: Vec<PortSpec>,

    /// Format of the results file
    #[arg(long, value_enum, default_value_t = OutputFormat::Json)]
    pub output: OutputFormat,

    /// Where to write results [default: scan_results.json or scan_results.csv]
    #[arg(long)]
    pub output_file: Option<PathBuf>,

    /// File receiving timestamped log entries, appended across runs
    #[arg(long, default_value = "port_scanner.log")]
    pub log_file: PathBuf,

    /// Maximum number of probes in flight at once
    #[arg(short, long, default_value_t = DEFAULT_CONCURRENCY, value_parser = parse_concurrency)]
    pub concurrency: usize,

    /// Per-port budget for connecting and reading the banner
    #[arg(long = "timeout-ms", default_value_t = 1000, value_parser = clap::value_parser!(u64).range(1..))]
    pub timeout_ms: u64,

    /// Pause after each probe
    #[arg(long = "delay-ms", default_value_t = 100)]
    pub delay_ms: u64,

    /// Abort probes still running after this long and count them as timed out
    #[arg(long = "scan-timeout-ms", value_parser = clap::value_parser!(u64).range(1..))]
    pub scan_timeout_ms: Option<u64>,

    /// Less terminal output (-q compact, -qq results only)
    #[arg(short, long, action = ArgAction::Count)]
    pub quiet: u8,
}

impl CommandLine {
    pub fn parse_args() -> Self {
        Self::parse()
    }

    pub fn target(&self) -> Target {
        Target::new(self.host.clone(), expand_ports(&self.ports))
    }

    pub fn config(&self) -> Config {
        Config {
            concurrency: self.concurrency,
            connect_timeout: Duration::from_millis(self.timeout_ms),
            probe_delay: Duration::from_millis(self.delay_ms),
            scan_timeout: self.scan_timeout_ms.map(Duration::from_millis),
            quiet: self.quiet,
        }
    }

    pub fn output_path(&self) -> PathBuf {
        self.output_file
            .clone()
            .unwrap_or_else(|| PathBuf::from(self.output.default_file_name()))
    }
}

fn parse_concurrency(s: &str) -> Result<usize, String> {
    match s.parse::<usize>() {
        Ok(0) => Err("must be at least 1".to_string()),
        Ok(n) => Ok(n),
        Err(e) => Err(e.to_string()),
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
