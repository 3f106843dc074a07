pub mod discover;
pub mod scan;

use std::path::PathBuf;

use clap::{ArgAction, Parser, Subcommand};

#[derive(Parser)]
#[command(name = "sweepr", version)]
#[command(about = "Finds live hosts, then deep scans every one of them in parallel.")]
pub struct CommandLine {
    #[command(subcommand)]
    pub command: Commands,

    /// Configuration file (.json or .toml). Defaults to ./config.json when present.
    #[arg(short, long, global = true, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Print results as JSON on stdout
    #[arg(long, global = true)]
    pub json: bool,

    /// Less output; repeat to print only the results
    #[arg(short, long, global = true, action = ArgAction::Count)]
    pub quiet: u8,

    /// Show debug logging
    #[arg(short, long, global = true, conflicts_with = "quiet")]
    pub verbose: bool,

    #[arg(long, global = true)]
    pub no_banner: bool,

    /// Maximum number of host scans running at once (unbounded by default)
    #[arg(long, global = true, value_name = "N")]
    pub max_concurrency: Option<usize>,

    /// Scanner binary to invoke instead of `nmap`
    #[arg(long, global = true, value_name = "PATH")]
    pub nmap: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// List the hosts that respond in a given network
    #[command(alias = "d")]
    Discover {
        /// Used when the config file names no target
        target: Option<String>,
    },
    /// Discover hosts, then scan each one and merge the results
    #[command(alias = "s")]
    Scan {
        /// Used when the config file names no target
        target: Option<String>,
    },
}

impl CommandLine {
    pub fn parse_args() -> Self {
        Self::parse()
    }
}
