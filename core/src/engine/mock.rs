use std::collections::HashMap;
use std::io;
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use sweepr_common::error::ExecError;
use tokio::sync::Barrier;

use super::ScanEngine;

/// In-memory scanner: canned discovery output plus one canned deep-scan output
/// per address. Addresses without an entry fail.
#[derive(Default)]
pub(crate) struct MockEngine {
    discovery: Option<String>,
    hosts: HashMap<String, String>,
    delay: Duration,
    gate: Option<Barrier>,
    active: AtomicUsize,
    peak: AtomicUsize,
    calls: Mutex<Vec<Vec<String>>>,
}

impl MockEngine {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn with_discovery(mut self, output: &str) -> Self {
        self.discovery = Some(output.to_string());
        self
    }

    pub(crate) fn with_host(mut self, addr: &str, output: &str) -> Self {
        self.hosts.insert(addr.to_string(), output.to_string());
        self
    }

    pub(crate) fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    /// Every deep scan waits until `n` scans are running at once.
    pub(crate) fn with_gate(mut self, n: usize) -> Self {
        self.gate = Some(Barrier::new(n));
        self
    }

    pub(crate) fn peak(&self) -> usize {
        self.peak.load(Ordering::SeqCst)
    }

    pub(crate) fn calls(&self) -> Vec<Vec<String>> {
        self.calls.lock().unwrap().clone()
    }

    fn fail(reason: &str) -> ExecError {
        ExecError::Spawn {
            program: "mock".to_string(),
            source: io::Error::new(io::ErrorKind::NotFound, reason.to_string()),
        }
    }
}

#[async_trait]
impl ScanEngine for MockEngine {
    async fn stream(
        &self,
        args: &[String],
        on_line: &mut (dyn for<'a> FnMut(&'a str) + Send),
    ) -> Result<(), ExecError> {
        self.calls.lock().unwrap().push(args.to_vec());
        let output = self
            .discovery
            .as_deref()
            .ok_or_else(|| Self::fail("discovery unavailable"))?;
        for line in output.lines() {
            on_line(line);
        }
        Ok(())
    }

    async fn capture(&self, args: &[String]) -> Result<String, ExecError> {
        self.calls.lock().unwrap().push(args.to_vec());

        let running = self.active.fetch_add(1, Ordering::SeqCst) + 1;
        self.peak.fetch_max(running, Ordering::SeqCst);

        if let Some(gate) = &self.gate {
            gate.wait().await;
        }
        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }

        self.active.fetch_sub(1, Ordering::SeqCst);

        // Deep scans end with `<addr> -oG -`.
        let addr = args.iter().rev().nth(2).map(String::as_str).unwrap_or_default();
        self.hosts
            .get(addr)
            .cloned()
            .ok_or_else(|| Self::fail(addr))
    }
}
