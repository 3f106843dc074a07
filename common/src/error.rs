//! # Error Kinds
//!
//! Errors are split by how far they are allowed to travel:
//!
//! * [`ConfigError`] is fatal before any scanning starts.
//! * [`DiscoveryError`] is fatal and aborts the whole run.
//! * [`TaskError`] belongs to a single host and is contained by the orchestrator.
//!
//! [`ExecError`] describes a failed invocation of the external scanner and is
//! carried by both of the latter two.

use std::io;
use std::path::PathBuf;
use std::process::ExitStatus;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("malformed JSON in {path}: {source}")]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("malformed TOML in {path}: {source}")]
    Toml {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("unsupported config format '{0}' (expected .json or .toml)")]
    UnsupportedFormat(String),

    #[error("no target given: pass one on the command line or set `target` in the config file")]
    MissingTarget,

    #[error("invalid target: {0}")]
    InvalidTarget(String),
}

/// Failure of a single external scanner invocation.
#[derive(Debug, Error)]
pub enum ExecError {
    #[error("failed to start {program}: {source}")]
    Spawn {
        program: String,
        #[source]
        source: io::Error,
    },

    #[error("{program} exited with {status}{}", stderr_suffix(.stderr))]
    ExitStatus {
        program: String,
        status: ExitStatus,
        stderr: String,
    },

    #[error("failed to read output of {program}: {source}")]
    Stream {
        program: String,
        #[source]
        source: io::Error,
    },

    #[error("{0} has no stdout pipe")]
    MissingPipe(String),
}

fn stderr_suffix(stderr: &str) -> String {
    let trimmed = stderr.trim();
    if trimmed.is_empty() {
        String::new()
    } else {
        format!(": {trimmed}")
    }
}

#[derive(Debug, Error)]
#[error("host discovery failed: {0}")]
pub struct DiscoveryError(#[from] pub ExecError);

#[derive(Debug, Error)]
pub enum TaskError {
    #[error("scan of {addr} failed: {source}")]
    Exec {
        addr: String,
        #[source]
        source: ExecError,
    },

    #[error("scan task for {addr} did not complete: {reason}")]
    Aborted { addr: String, reason: String },
}

impl TaskError {
    pub fn addr(&self) -> &str {
        match self {
            TaskError::Exec { addr, .. } | TaskError::Aborted { addr, .. } => addr,
        }
    }
}
