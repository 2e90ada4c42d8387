use std::io::Write;
use std::sync::OnceLock;
use std::time::Duration;

use colored::*;
use indicatif::{ProgressBar, ProgressStyle};

const TICK_INTERVAL: Duration = Duration::from_millis(100);

pub struct SpinnerHandle {
    pub spinner: ProgressBar,
}

impl SpinnerHandle {
    /// Prints above the spinner without tearing it.
    pub fn println(&self, msg: &str) {
        self.spinner.suspend(|| {
            let mut stdout = std::io::stdout().lock();
            let _ = writeln!(stdout, "{msg}");
        });
    }

    pub fn finish_and_clear(&self) {
        self.spinner.finish_and_clear();
    }

    pub fn set_message(&self, msg: String) {
        self.spinner.set_message(msg);
    }
}

pub(crate) static SPINNER: OnceLock<SpinnerHandle> = OnceLock::new();

pub fn get_spinner() -> &'static SpinnerHandle {
    SPINNER.get_or_init(init_spinner)
}

fn init_spinner() -> SpinnerHandle {
    let pb = ProgressBar::new_spinner();
    let style = ProgressStyle::with_template("{spinner:.blue} {msg}")
        .unwrap_or_else(|_| ProgressStyle::default_spinner())
        .tick_strings(&[
            "▁▁▁▁▁",
            "▁▂▂▂▁",
            "▁▄▂▄▁",
            "▂▄▆▄▂",
            "▄▆█▆▄",
            "▂▄▆▄▂",
            "▁▄▂▄▁",
            "▁▂▂▂▁",
        ]);

    pb.set_style(style);
    SpinnerHandle { spinner: pb }
}

pub fn start_scan_spinner(total: usize, quiet: u8) {
    let handle = get_spinner();
    if quiet > 1 {
        handle.spinner.set_draw_target(indicatif::ProgressDrawTarget::hidden());
        return;
    }
    report_scan_progress(0, total);
    handle.spinner.enable_steady_tick(TICK_INTERVAL);
}

pub fn report_scan_progress(done: usize, total: usize) {
    get_spinner().set_message(format!(
        "Probed {} of {} ports...",
        done.to_string().green().bold(),
        total
    ));
}

/// Routes formatted log lines through the spinner.
pub struct SpinnerWriter;

impl Write for SpinnerWriter {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        let msg = String::from_utf8_lossy(buf);
        get_spinner().println(msg.trim_end());
        Ok(buf.len())
    }

    fn flush(&mut self) -> std::io::Result<()> {
        Ok(())
    }
}
