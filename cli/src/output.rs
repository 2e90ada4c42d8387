//! Result sink: persists a finished scan as JSON or CSV.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use anyhow::Context;
use bannr_common::network::outcome::ScanResult;
use clap::ValueEnum;
use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Json,
    Csv,
}

impl OutputFormat {
    pub fn default_file_name(self) -> &'static str {
        match self {
            OutputFormat::Json => "scan_results.json",
            OutputFormat::Csv => "scan_results.csv",
        }
    }
}

pub fn save_scan_results(result: &ScanResult, format: OutputFormat, path: &Path) -> anyhow::Result<()> {
    let file = File::create(path)
        .with_context(|| format!("failed to create results file {}", path.display()))?;
    let writer = BufWriter::new(file);

    let written = match format {
        OutputFormat::Json => write_json(result, writer),
        OutputFormat::Csv => write_csv(result, writer),
    };
    written.with_context(|| format!("failed to write results to {}", path.display()))
}

/// `{"host": ..., "open_ports": {...}}`, indented by four spaces.
pub fn write_json<W: Write>(result: &ScanResult, mut writer: W) -> anyhow::Result<()> {
    let formatter = serde_json::ser::PrettyFormatter::with_indent(b"    ");
    let mut serializer = serde_json::Serializer::with_formatter(&mut writer, formatter);
    result.serialize(&mut serializer)?;
    writer.write_all(b"\n")?;
    writer.flush()?;
    Ok(())
}

/// Two columns, one row per open port. Missing banners are empty fields.
pub fn write_csv<W: Write>(result: &ScanResult, writer: W) -> anyhow::Result<()> {
    let mut wtr = csv::Writer::from_writer(writer);
    wtr.write_record(["Port", "Service Banner"])?;

    for (port, banner) in &result.open_ports {
        wtr.write_record([port.to_string(), banner.clone().unwrap_or_default()])?;
    }

    wtr.flush()?;
    Ok(())
}

// ╔════════════════════════════════════════════╗
// ║ ████████╗███████╗███████╗████████╗███████╗ ║
// ║ ╚══██╔══╝██╔════╝██╔════╝╚══██╔══╝██╔════╝ ║
// ║    ██║   █████╗  ███████╗   ██║   ███████╗ ║
// ║    ██║   ██╔══╝  ╚════██║   ██║   ╚════██║ ║
// ║    ██║   ███████╗███████║   ██║   ███████║ ║
// ║    ╚═╝   ╚══════╝╚══════╝   ╚═╝   ╚══════╝ ║
// ╚════════════════════════════════════════════╝
