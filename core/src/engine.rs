//! The **abstraction** over the external scanning capability.
//!
//! High-level modules depend on [`ScanEngine`] only. [`NmapEngine`] drives a
//! real scanner process; tests substitute an in-memory engine.

use async_trait::async_trait;
use sweepr_common::error::ExecError;

mod nmap;

#[cfg(test)]
pub(crate) mod mock;

pub use nmap::NmapEngine;

/// Runs one scanner invocation per call.
#[async_trait]
pub trait ScanEngine: Send + Sync {
    /// Runs the scanner and hands every stdout line to `on_line` as soon as it
    /// is read. Fails if the process cannot start, its output cannot be read,
    /// or it exits unsuccessfully.
    async fn stream(
        &self,
        args: &[String],
        on_line: &mut (dyn for<'a> FnMut(&'a str) + Send),
    ) -> Result<(), ExecError>;

    /// Runs the scanner to completion and returns its whole stdout.
    async fn capture(&self, args: &[String]) -> Result<String, ExecError>;
}
