use std::path::Path;
use std::time::{Duration, Instant};

use anyhow::Context;
use bannr_common::config::Config;
use bannr_common::network::outcome::ScanResult;
use bannr_common::network::target::Target;
use bannr_core::scanner::PortScanner;
use colored::*;
use tracing::info;

use crate::mprint;
use crate::output::{self, OutputFormat};
use crate::terminal::{colors, print, spinner};

pub async fn scan(target: Target, cfg: &Config, format: OutputFormat, output_path: &Path) -> anyhow::Result<()> {
    print::print_status(format!("Starting scan on {}...", target.host.color(colors::ACCENT)));

    let total: usize = target.ports.len();
    spinner::start_scan_spinner(total, cfg.quiet);

    let start_time: Instant = Instant::now();
    let scanner = PortScanner::new(cfg)
        .on_probe_done(Box::new(move |done| spinner::report_scan_progress(done, total)));
    let scanned = scanner.scan(&target).await;

    spinner::get_spinner().finish_and_clear();
    let result: ScanResult = scanned.with_context(|| format!("scan of {} failed", target.host))?;

    info!(
        host = %result.host,
        open = result.len(),
        "Results for {}: {:?}",
        result.host,
        result.open_ports
    );

    scan_ends(&result, start_time.elapsed(), cfg);

    output::save_scan_results(&result, format, output_path)?;
    print::print_status(format!(
        "Results written to {}",
        output_path.display().to_string().color(colors::ACCENT)
    ));
    print::end_of_program();
    Ok(())
}

fn scan_ends(result: &ScanResult, total_time: Duration, cfg: &Config) {
    if result.is_empty() {
        print::no_results(&result.host, cfg.quiet);
        return;
    }

    if cfg.quiet > 0 {
        mprint!();
    }

    print::header("open ports", cfg.quiet);
    print::print_status(format!("Discovered open ports on {}:", result.host.color(colors::ACCENT)));
    print_ports(result);
    print_summary(result.len(), total_time, cfg);
}

fn print_ports(result: &ScanResult) {
    let labels: Vec<String> = result.open_ports.keys().map(|port| format!("Port {port}")).collect();
    let key_width: usize = labels.iter().map(String::len).max().unwrap_or(0);

    for (label, banner) in labels.iter().zip(result.open_ports.values()) {
        let value: ColoredString = match banner {
            Some(text) => text.color(colors::BANNER),
            None => "no banner".color(colors::MUTED).italic(),
        };
        print::aligned_line(label, value, key_width);
    }
}

fn print_summary(open_len: usize, total_time: Duration, cfg: &Config) {
    let open_ports: ColoredString = format!("{open_len} open ports").bold().green();
    let total_time: ColoredString = format!("{:.2}s", total_time.as_secs_f64()).bold().yellow();
    let output: String = format!("Scan Complete: {open_ports} found in {total_time}");

    match cfg.quiet {
        0 => {
            print::fat_separator();
            print::centerln(&output);
        }
        _ => {
            mprint!();
            print::print_status(output);
        }
    }
}
