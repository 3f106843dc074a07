use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::error::ConfigError;
use crate::network::target::ScanTarget;

pub const DEFAULT_CONFIG_PATH: &str = "config.json";
pub const DEFAULT_SCANNER: &str = "nmap";

/// Runtime presentation settings shared by the commands.
#[derive(Debug, Clone, Default)]
pub struct Config {
    /// Print the final report as JSON instead of the tree view.
    pub json: bool,
    /// 0 prints everything, 1 drops headers, 2 prints only the report.
    pub quiet: u8,
    pub no_banner: bool,
}

/// Contents of the on-disk configuration file.
#[derive(Debug, Clone, Default, Deserialize, PartialEq, Eq)]
pub struct FileConfig {
    #[serde(default)]
    pub target: Option<String>,

    /// Flags passed, in order, to every per-host scan.
    #[serde(default)]
    pub nmap_flags: Vec<String>,

    /// Upper bound on simultaneously running host scans. Unbounded when absent.
    #[serde(default)]
    pub max_concurrency: Option<usize>,

    #[serde(default)]
    pub nmap_path: Option<PathBuf>,
}

impl FileConfig {
    /// Reads a `.json` or `.toml` configuration file.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let contents = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;

        let extension = path
            .extension()
            .and_then(|ext| ext.to_str())
            .unwrap_or_default()
            .to_ascii_lowercase();

        match extension.as_str() {
            "json" => serde_json::from_str(&contents).map_err(|source| ConfigError::Json {
                path: path.to_path_buf(),
                source,
            }),
            "toml" => toml::from_str(&contents).map_err(|source| ConfigError::Toml {
                path: path.to_path_buf(),
                source,
            }),
            other => Err(ConfigError::UnsupportedFormat(other.to_string())),
        }
    }

    /// Loads `path` when given, otherwise the default file if it exists.
    ///
    /// An explicitly requested file must exist. A missing default file yields
    /// an empty configuration.
    pub fn load_or_default(path: Option<&Path>) -> Result<Self, ConfigError> {
        match path {
            Some(path) => Self::load(path),
            None => {
                let default_path = Path::new(DEFAULT_CONFIG_PATH);
                if default_path.exists() {
                    Self::load(default_path)
                } else {
                    tracing::debug!("no {DEFAULT_CONFIG_PATH} found, using defaults");
                    Ok(Self::default())
                }
            }
        }
    }

    /// Picks the target: the file's own target first, then the command line.
    pub fn resolve_target(&self, cli_target: Option<&str>) -> Result<ScanTarget, ConfigError> {
        let spec = self
            .target
            .as_deref()
            .filter(|t| !t.trim().is_empty())
            .or(cli_target.filter(|t| !t.trim().is_empty()))
            .ok_or(ConfigError::MissingTarget)?;

        ScanTarget::parse(spec, self.nmap_flags.clone())
    }
}
