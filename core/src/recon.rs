//! # Reconnaissance Service
//!
//! Implements the end-to-end use case: discover responding hosts, deep scan
//! each one concurrently, merge the parsed results.

use std::sync::Arc;

use sweepr_common::error::{DiscoveryError, TaskError};
use sweepr_common::network::target::ScanTarget;
use sweepr_common::report::ReportMap;
use tracing::info;

use crate::discovery::DiscoveryScanner;
use crate::engine::ScanEngine;
use crate::scanner::{ProgressCallback, ScanOrchestrator};

/// Everything a full run produced.
#[derive(Debug, Default)]
pub struct ReconReport {
    /// Addresses reported by discovery, in emission order.
    pub hosts: Vec<String>,
    pub report: ReportMap,
    pub scanned: usize,
    pub failures: Vec<TaskError>,
}

pub struct ReconService {
    engine: Arc<dyn ScanEngine>,
    max_concurrency: Option<usize>,
    on_host_done: Option<ProgressCallback>,
}

impl ReconService {
    pub fn new(engine: Arc<dyn ScanEngine>) -> Self {
        Self {
            engine,
            max_concurrency: None,
            on_host_done: None,
        }
    }

    pub fn with_max_concurrency(mut self, limit: Option<usize>) -> Self {
        self.max_concurrency = limit;
        self
    }

    pub fn with_progress(mut self, on_host_done: Option<Box<dyn Fn(usize) + Send + Sync>>) -> Self {
        self.on_host_done = on_host_done.map(Arc::from);
        self
    }

    pub async fn perform_discovery(&self, target: &ScanTarget) -> Result<Vec<String>, DiscoveryError> {
        let hosts = DiscoveryScanner::new(self.engine.clone())
            .discover(target)
            .await?;
        info!(count = hosts.len(), "discovery finished");
        Ok(hosts)
    }

    /// Runs discovery and then the per-host scans.
    ///
    /// Only a discovery failure is returned as an error. Individual host
    /// failures end up in [`ReconReport::failures`].
    pub async fn perform_recon(&self, target: &ScanTarget) -> Result<ReconReport, DiscoveryError> {
        let hosts = self.perform_discovery(target).await?;

        let outcome = ScanOrchestrator::new(self.engine.clone(), target.flags.clone())
            .with_max_concurrency(self.max_concurrency)
            .with_progress(self.on_host_done.clone())
            .scan_hosts(hosts.clone())
            .await;

        Ok(ReconReport {
            hosts,
            report: outcome.report,
            scanned: outcome.scanned,
            failures: outcome.failures,
        })
    }
}
