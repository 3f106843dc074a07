use std::time::{Duration, Instant};

use anyhow::Context;
use colored::*;
use sweepr_common::config::Config;
use sweepr_common::network::target::{self, ScanTarget};
use sweepr_common::success;
use sweepr_core::recon::ReconService;

use crate::mprint;
use crate::terminal::{colors, format, print, spinner};

pub async fn discover(service: &ReconService, scan_target: &ScanTarget, cfg: &Config) -> anyhow::Result<()> {
    print::header("getting ready for discovery", cfg.quiet);
    let collection = target::to_collection(&scan_target.target);
    if cfg.quiet == 0 {
        print::aligned_line("Target", scan_target.target.to_string());
        if !collection.is_empty() {
            print::aligned_line("Range", format!("{} addresses", collection.len()));
        }
    }

    spinner::start(format!("Pinging {}...", scan_target.target));
    let start_time: Instant = Instant::now();
    let result = service.perform_discovery(scan_target).await;
    spinner::stop();

    let hosts = result.context("discovery aborted")?;
    discovery_ends(&hosts, start_time.elapsed(), cfg)
}

fn discovery_ends(hosts: &[String], total_time: Duration, cfg: &Config) -> anyhow::Result<()> {
    if cfg.json {
        mprint!(&serde_json::to_string_pretty(hosts)?);
        return Ok(());
    }

    if hosts.is_empty() {
        print::header("zero hosts detected", cfg.quiet);
        print::no_results("responding hosts");
        return Ok(());
    }

    print::header("Network Discovery", cfg.quiet);
    for (idx, host) in hosts.iter().enumerate() {
        match cfg.quiet {
            2 => {
                mprint!(host);
            }
            _ => {
                print::tree_head(idx, host);
                print::as_tree_one_level(vec![format::addr_to_detail(host)]);
            }
        }
    }
    print_summary(hosts.len(), total_time, cfg);
    Ok(())
}

fn print_summary(hosts_len: usize, total_time: Duration, cfg: &Config) {
    let active_hosts: ColoredString = format!("{hosts_len} active hosts").bold().green();
    let total_time: ColoredString = format!("{:.2}s", total_time.as_secs_f64()).bold().yellow();
    let output: String = format!("Discovery Complete: {active_hosts} identified in {total_time}")
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
