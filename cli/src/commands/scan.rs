use std::time::{Duration, Instant};

use anyhow::Context;
use colored::*;
use sweepr_common::config::Config;
use sweepr_common::network::target::ScanTarget;
use sweepr_common::report::{self, ReportMap};
use sweepr_common::{success, warn};
use sweepr_core::recon::{ReconReport, ReconService};

use crate::mprint;
use crate::terminal::{colors, format, print, spinner};

pub async fn scan(service: &ReconService, scan_target: &ScanTarget, cfg: &Config) -> anyhow::Result<()> {
    print::header("starting scanner", cfg.quiet);
    if cfg.quiet == 0 {
        let flags = if scan_target.flags.is_empty() {
            "(none)".to_string()
        } else {
            scan_target.flags.join(" ")
        };
        print::aligned_line("Target", scan_target.target.to_string());
        print::aligned_line("Flags", flags);
    }

    spinner::start(format!("Discovering hosts in {}...", scan_target.target));
    let start_time: Instant = Instant::now();
    let result = service.perform_recon(scan_target).await;
    spinner::stop();

    let run: ReconReport = result.context("reconnaissance aborted")?;
    scan_ends(&run, start_time.elapsed(), cfg)
}

fn scan_ends(run: &ReconReport, total_time: Duration, cfg: &Config) -> anyhow::Result<()> {
    for failure in &run.failures {
        warn!("{} is missing from the report", failure.addr());
    }

    if cfg.json {
        mprint!(&serde_json::to_string_pretty(&report::sorted(&run.report))?);
        return Ok(());
    }

    if run.report.is_empty() {
        print::header("nothing to report", cfg.quiet);
        print::no_results("scan results");
        return Ok(());
    }

    print::header("Scan Results", cfg.quiet);
    print_report(&run.report);
    print_summary(run, total_time, cfg);
    Ok(())
}

fn print_report(report: &ReportMap) {
    let sorted = report::sorted(report);
    let last = sorted.len().saturating_sub(1);
    for (idx, (host_id, record)) in sorted.into_iter().enumerate() {
        print::tree_head(idx, host_id);
        print::as_tree_one_level(format::record_to_details(record));
        if idx != last {
            mprint!();
        }
    }
}

fn print_summary(run: &ReconReport, total_time: Duration, cfg: &Config) {
    let reported: ColoredString = format!("{} hosts", run.report.len()).bold().green();
    let failed: ColoredString = match run.failures.len() {
        0 => "no failures".normal(),
        n => format!("{n} failed").bold().red(),
    };
    let total_time: ColoredString = format!("{:.2}s", total_time.as_secs_f64()).bold().yellow();
    let output: String = format!(
        "Scan Complete: {reported} of {} discovered, {failed}, in {total_time}",
        run.hosts.len()
    )
    .color(colors::TEXT_DEFAULT)
    .to_string();

    match cfg.quiet {
        0 => {
            print::fat_separator();
            print::centerln(&output);
        }
        _ => success!("{output}"),
    }
}
