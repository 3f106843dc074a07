use std::io::{self, Write};
use std::sync::OnceLock;
use std::time::Duration;

use colored::*;
use indicatif::{ProgressBar, ProgressStyle};
use tracing::Metadata;
use tracing_subscriber::fmt::MakeWriter;

use crate::terminal::logging::PRINT_TARGET;

static SPINNER: OnceLock<ProgressBar> = OnceLock::new();

pub fn get_spinner() -> &'static ProgressBar {
    SPINNER.get_or_init(init_spinner)
}

fn init_spinner() -> ProgressBar {
    let pb = ProgressBar::new_spinner();
    let style = ProgressStyle::with_template("{spinner:.blue} {msg} {elapsed:.dim}")
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
    pb
}

/// Starts animating with `msg`. Hidden automatically when stderr is not a
/// terminal.
pub fn start(msg: String) {
    let pb = get_spinner();
    pb.set_message(msg);
    pb.enable_steady_tick(Duration::from_millis(100));
}

pub fn set_message(msg: String) {
    get_spinner().set_message(msg);
}

pub fn stop() {
    let pb = get_spinner();
    pb.disable_steady_tick();
    pb.finish_and_clear();
}

pub fn report_scan_progress(done: usize) {
    set_message(format!(
        "Finished scanning {} hosts so far...",
        done.to_string().green().bold()
    ));
}

/// Routes log output around the spinner so lines never tear it.
///
/// Report output goes to stdout, everything else to stderr.
pub struct TerminalWriter;

impl<'a> MakeWriter<'a> for TerminalWriter {
    type Writer = SpinnerWriter;

    fn make_writer(&'a self) -> Self::Writer {
        SpinnerWriter::Stderr
    }

    fn make_writer_for(&'a self, meta: &Metadata<'_>) -> Self::Writer {
        if meta.target() == PRINT_TARGET {
            SpinnerWriter::Stdout
        } else {
            SpinnerWriter::Stderr
        }
    }
}

pub enum SpinnerWriter {
    Stdout,
    Stderr,
}

impl Write for SpinnerWriter {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        get_spinner().suspend(|| match self {
            SpinnerWriter::Stdout => io::stdout().lock().write_all(buf),
            SpinnerWriter::Stderr => io::stderr().lock().write_all(buf),
        })?;
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        match self {
            SpinnerWriter::Stdout => io::stdout().flush(),
            SpinnerWriter::Stderr => io::stderr().flush(),
        }
    }
}
