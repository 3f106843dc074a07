mod commands;
mod terminal;

use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;

use commands::{CommandLine, Commands, discover, scan};
use sweepr_common::config::{Config, DEFAULT_SCANNER, FileConfig};
use sweepr_common::error::ConfigError;
use sweepr_core::engine::NmapEngine;
use sweepr_core::recon::ReconService;
use terminal::{logging, print, spinner};

/// Exit code for runs that never started because the invocation was unusable.
const USAGE_ERROR: u8 = 2;

#[tokio::main]
async fn main() -> ExitCode {
    let commands = CommandLine::parse_args();

    logging::init_logging(commands.verbose, commands.quiet);

    let cfg = Config {
        json: commands.json,
        quiet: if commands.json { commands.quiet.max(2) } else { commands.quiet },
        no_banner: commands.no_banner,
    };

    match run(commands, &cfg).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            sweepr_common::error!("{e:#}");
            match e.downcast_ref::<ConfigError>() {
                Some(_) => ExitCode::from(USAGE_ERROR),
                None => ExitCode::FAILURE,
            }
        }
    }
}

async fn run(commands: CommandLine, cfg: &Config) -> anyhow::Result<()> {
    print::banner(cfg.no_banner, cfg.quiet);

    let file_cfg = FileConfig::load_or_default(commands.config.as_deref())?;

    let program: PathBuf = commands
        .nmap
        .or(file_cfg.nmap_path.clone())
        .unwrap_or_else(|| PathBuf::from(DEFAULT_SCANNER));
    let max_concurrency = commands.max_concurrency.or(file_cfg.max_concurrency);

    let service = ReconService::new(Arc::new(NmapEngine::new(program)))
        .with_max_concurrency(max_concurrency)
        .with_progress(Some(Box::new(spinner::report_scan_progress)));

    match commands.command {
        Commands::Discover { target } => {
            let scan_target = file_cfg.resolve_target(target.as_deref())?;
            discover::discover(&service, &scan_target, cfg).await
        }
        Commands::Scan { target } => {
            let scan_target = file_cfg.resolve_target(target.as_deref())?;
            scan::scan(&service, &scan_target, cfg).await
        }
    }
}
