//! Process-backed engine.
//!
//! Spawns the scanner binary with piped stdout/stderr. Stderr is drained on a
//! separate task so a chatty scanner can never block on a full pipe, and its
//! tail is kept for the error message when the process exits unsuccessfully.

use std::path::PathBuf;
use std::process::{ExitStatus, Stdio};

use async_trait::async_trait;
use sweepr_common::config::DEFAULT_SCANNER;
use sweepr_common::error::ExecError;
use tokio::io::{AsyncBufReadExt, AsyncRead, AsyncReadExt, BufReader};
use tokio::process::{Child, Command};
use tracing::debug;

use super::ScanEngine;

const STDERR_TAIL: usize = 512;

#[derive(Debug, Clone)]
pub struct NmapEngine {
    program: PathBuf,
    /// Arguments placed before every invocation's own arguments, e.g. the
    /// script path when `program` is an interpreter.
    prefix_args: Vec<String>,
}

impl Default for NmapEngine {
    fn default() -> Self {
        Self::new(DEFAULT_SCANNER)
    }
}

impl NmapEngine {
    pub fn new(program: impl Into<PathBuf>) -> Self {
        Self {
            program: program.into(),
            prefix_args: Vec::new(),
        }
    }

    pub fn with_prefix_args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.prefix_args = args.into_iter().map(Into::into).collect();
        self
    }

    fn name(&self) -> String {
        self.program.display().to_string()
    }

    fn spawn(&self, args: &[String]) -> Result<Child, ExecError> {
        debug!(program = %self.name(), ?args, "spawning scanner");
        Command::new(&self.program)
            .args(&self.prefix_args)
            .args(args)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(|source| ExecError::Spawn {
                program: self.name(),
                source,
            })
    }

    fn check_status(&self, status: ExitStatus, stderr: String) -> Result<(), ExecError> {
        if status.success() {
            return Ok(());
        }
        Err(ExecError::ExitStatus {
            program: self.name(),
            status,
            stderr: tail(&stderr, STDERR_TAIL),
        })
    }
}

#[async_trait]
impl ScanEngine for NmapEngine {
    async fn stream(
        &self,
        args: &[String],
        on_line: &mut (dyn for<'a> FnMut(&'a str) + Send),
    ) -> Result<(), ExecError> {
        let mut child = self.spawn(args)?;
        let stdout = child
            .stdout
            .take()
            .ok_or_else(|| ExecError::MissingPipe(self.name()))?;
        let stderr_task = tokio::spawn(drain(child.stderr.take()));

        let mut reader = BufReader::new(stdout);
        let mut buf = Vec::new();
        loop {
            buf.clear();
            match reader.read_until(b'\n', &mut buf).await {
                Ok(0) => break,
                Ok(_) => {
                    let line = String::from_utf8_lossy(&buf);
                    on_line(line.trim_end_matches(|c: char| c == '\r' || c == '\n'));
                }
                Err(source) => {
                    let _ = child.kill().await;
                    return Err(ExecError::Stream {
                        program: self.name(),
                        source,
                    });
                }
            }
        }

        let status = child.wait().await.map_err(|source| ExecError::Stream {
            program: self.name(),
            source,
        })?;
        let stderr = stderr_task.await.unwrap_or_default();
        self.check_status(status, stderr)
    }

    async fn capture(&self, args: &[String]) -> Result<String, ExecError> {
        let child = self.spawn(args)?;
        let output = child
            .wait_with_output()
            .await
            .map_err(|source| ExecError::Stream {
                program: self.name(),
                source,
            })?;

        self.check_status(output.status, String::from_utf8_lossy(&output.stderr).into_owned())?;
        Ok(String::from_utf8_lossy(&output.stdout).into_owned())
    }
}

async fn drain<R: AsyncRead + Unpin>(pipe: Option<R>) -> String {
    let mut collected = Vec::new();
    if let Some(mut pipe) = pipe {
        let _ = pipe.read_to_end(&mut collected).await;
    }
    String::from_utf8_lossy(&collected).into_owned()
}

/// Last `max` bytes of `text`, cut on a char boundary.
fn tail(text: &str, max: usize) -> String {
    let text = text.trim();
    if text.len() <= max {
        return text.to_string();
    }
    let mut start = text.len() - max;
    while !text.is_char_boundary(start) {
        start += 1;
    }
    text[start..].to_string()
}
