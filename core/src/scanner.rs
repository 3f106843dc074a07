//! # Per-Host Scan Orchestrator
//!
//! Fans out one deep scan per discovered address. Every task owns its own
//! scanner process and its own [`OutputParser`](crate::parser::OutputParser);
//! the only shared state is the channel the parsed reports are deposited in.
//!
//! The channel is sized to the number of tasks so producers never wait on it.
//! The orchestrator waits on every task handle, which is the single barrier of
//! a run, and only then lets the aggregator read the channel, so a partial set
//! of results is never observed.
//!
//! Fan-out is unbounded unless a concurrency limit is configured, in which case
//! tasks still spawn eagerly but queue on a semaphore before launching their
//! process. There are no timeouts: a hung scanner holds the barrier.

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use sweepr_common::error::TaskError;
use sweepr_common::report::ReportMap;
use tokio::sync::{Semaphore, mpsc};
use tracing::{debug, error};

use crate::aggregate;
use crate::discovery::MACHINE_READABLE_FLAGS;
use crate::engine::ScanEngine;
use crate::parser;

/// Called with the number of finished host scans, successful or not.
pub type ProgressCallback = Arc<dyn Fn(usize) + Send + Sync>;

/// Result of one orchestration round.
#[derive(Debug, Default)]
pub struct ScanOutcome {
    pub report: ReportMap,
    /// Addresses whose scan completed and was parsed.
    pub scanned: usize,
    pub failures: Vec<TaskError>,
}

pub fn deep_scan_args(flags: &[String], addr: &str) -> Vec<String> {
    let mut args = Vec::with_capacity(flags.len() + 3);
    args.extend(flags.iter().cloned());
    args.push(addr.to_string());
    args.extend(MACHINE_READABLE_FLAGS.iter().map(|s| s.to_string()));
    args
}

/// Hands a parsed report to the aggregator. Returns false when the receiving
/// side is already gone and the report was dropped.
async fn deposit(tx: &mpsc::Sender<ReportMap>, addr: &str, report: ReportMap) -> bool {
    match tx.send(report).await {
        Ok(()) => true,
        Err(mpsc::error::SendError(lost)) => {
            debug!(%addr, hosts = lost.len(), "aggregator closed, report dropped");
            false
        }
    }
}

/// Runs and parses the deep scan of a single address.
pub async fn scan_host(
    engine: &dyn ScanEngine,
    flags: &[String],
    addr: &str,
) -> Result<ReportMap, TaskError> {
    let args = deep_scan_args(flags, addr);
    let output = engine
        .capture(&args)
        .await
        .map_err(|source| TaskError::Exec {
            addr: addr.to_string(),
            source,
        })?;

    Ok(parser::parse_output(&output))
}

pub struct ScanOrchestrator {
    engine: Arc<dyn ScanEngine>,
    flags: Arc<[String]>,
    max_concurrency: Option<usize>,
    on_host_done: Option<ProgressCallback>,
}

impl ScanOrchestrator {
    pub fn new(engine: Arc<dyn ScanEngine>, flags: Vec<String>) -> Self {
        Self {
            engine,
            flags: flags.into(),
            max_concurrency: None,
            on_host_done: None,
        }
    }

    /// Caps simultaneously running scans. `None` keeps fan-out unbounded.
    pub fn with_max_concurrency(mut self, limit: Option<usize>) -> Self {
        self.max_concurrency = limit.map(|n| n.max(1));
        self
    }

    pub fn with_progress(mut self, on_host_done: Option<ProgressCallback>) -> Self {
        self.on_host_done = on_host_done;
        self
    }

    /// Scans every address concurrently and merges what succeeded.
    ///
    /// Never fails as a whole: failed hosts are logged, listed in
    /// [`ScanOutcome::failures`] and left out of the report.
    pub async fn scan_hosts(&self, hosts: Vec<String>) -> ScanOutcome {
        if hosts.is_empty() {
            return ScanOutcome::default();
        }

        let (tx, rx) = mpsc::channel::<ReportMap>(hosts.len());
        let limiter = self.max_concurrency.map(|n| Arc::new(Semaphore::new(n)));
        let finished = Arc::new(AtomicUsize::new(0));

        debug!(hosts = hosts.len(), limit = ?self.max_concurrency, "launching host scans");

        let mut handles = Vec::with_capacity(hosts.len());
        for addr in hosts {
            let engine = self.engine.clone();
            let flags = self.flags.clone();
            let tx = tx.clone();
            let limiter = limiter.clone();
            let finished = finished.clone();
            let on_host_done = self.on_host_done.clone();
            let task_addr = addr.clone();

            let handle = tokio::spawn(async move {
                let _permit = match limiter {
                    Some(sem) => sem.acquire_owned().await.ok(),
                    None => None,
                };

                let result = scan_host(engine.as_ref(), &flags, &task_addr).await;

                let count = finished.fetch_add(1, Ordering::Relaxed) + 1;
                if let Some(cb) = on_host_done {
                    cb(count);
                }

                match result {
                    Ok(report) => {
                        debug!(addr = %task_addr, hosts = report.len(), "host scan parsed");
                        deposit(&tx, &task_addr, report).await;
                        Ok(())
                    }
                    Err(e) => {
                        error!(addr = %task_addr, "{e}");
                        Err(e)
                    }
                }
            });
            handles.push((addr, handle));
        }
        drop(tx);

        let mut outcome = ScanOutcome::default();
        for (addr, handle) in handles {
            match handle.await {
                Ok(Ok(())) => outcome.scanned += 1,
                Ok(Err(e)) => outcome.failures.push(e),
                Err(join_err) => {
                    error!(%addr, "scan task did not complete: {join_err}");
                    outcome.failures.push(TaskError::Aborted {
                        addr,
                        reason: join_err.to_string(),
                    });
                }
            }
        }

        outcome.report = aggregate::drain(rx).await;
        outcome
    }
}
