#![cfg(unix)]

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use sweepr_common::error::ExecError;
use sweepr_core::engine::ScanEngine;
use sweepr_core::recon::ReconService;
use sweepr_core::scanner::ScanOrchestrator;

use crate::utils::{fake_scanner, service, target};

#[tokio::test]
async fn full_run_merges_every_responding_host() {
    let run = service()
        .perform_recon(&target("10.10.0.0/29", &["-sV", "-O"]))
        .await
        .unwrap();

    assert_eq!(run.hosts.len(), 4);
    assert_eq!(run.scanned, 3);
    assert_eq!(
        run.report["IP: 10.10.0.1 (gateway)"].lines(),
        vec![
            "Ports:",
            "    22/open/ssh",
            "    53/open/domain",
            "    80/open/http",
            "OS:",
            "    Linux 4.15 - 5.8",
        ]
    );
    assert_eq!(
        run.report["IP: 10.10.0.2"].lines(),
        vec!["Ports:", "    445/filtered/microsoft-ds"]
    );
    assert_eq!(run.report["IP: 10.10.0.3 (quiet.lan)"].lines(), vec!["Ports:"]);

    assert_eq!(run.report.len(), 3);
    assert_eq!(run.failures.len(), 1);
    assert_eq!(run.failures[0].addr(), "10.10.0.4");
}

#[tokio::test]
async fn flags_reach_every_host_scan() {
    let run = service()
        .perform_recon(&target("10.10.0.0/29", &["-sV"]))
        .await
        .unwrap();

    let gateway = &run.report["IP: 10.10.0.1 (gateway)"];
    assert_eq!(gateway.ports().count(), 3);
    assert_eq!(gateway.os().count(), 0);
}

#[tokio::test]
async fn bounded_fan_out_over_real_processes() {
    let finished = Arc::new(AtomicUsize::new(0));
    let counter = finished.clone();

    let run = tokio::time::timeout(
        Duration::from_secs(60),
        service()
            .with_max_concurrency(Some(4))
            .with_progress(Some(Box::new(move |_done: usize| {
                counter.fetch_add(1, Ordering::SeqCst);
            })))
            .perform_recon(&target("10.20.0.0/26", &["-Pn"])),
    )
    .await
    .expect("run finished")
    .unwrap();

    assert_eq!(run.hosts.len(), 40);
    assert_eq!(run.report.len(), 40);
    assert!(run.failures.is_empty());
    assert_eq!(finished.load(Ordering::SeqCst), 40);
    assert_eq!(
        run.report["IP: 10.20.0.17"].lines(),
        vec!["Ports:", "    443/open/https"]
    );
}

#[tokio::test]
async fn unknown_hosts_are_isolated_failures() {
    let outcome = ScanOrchestrator::new(Arc::new(fake_scanner()), vec!["-sV".to_string()])
        .scan_hosts(vec![
            "10.10.0.2".to_string(),
            "172.16.0.9".to_string(),
            "10.10.0.3".to_string(),
        ])
        .await;

    assert_eq!(outcome.scanned, 2);
    assert_eq!(outcome.report.len(), 2);
    assert_eq!(outcome.failures.len(), 1);
    assert_eq!(outcome.failures[0].addr(), "172.16.0.9");
}

/// Engine that answers discovery with a fixed list and every host scan with
/// the same port line, rewritten for the scanned address.
struct StaticEngine {
    hosts: Vec<&'static str>,
}

#[async_trait]
impl ScanEngine for StaticEngine {
    async fn stream(
        &self,
        _args: &[String],
        on_line: &mut (dyn for<'a> FnMut(&'a str) + Send),
    ) -> Result<(), ExecError> {
        for host in &self.hosts {
            on_line(&format!("Host: {host} ()\tStatus: Up"));
        }
        Ok(())
    }

    async fn capture(&self, args: &[String]) -> Result<String, ExecError> {
        let addr = args.iter().rev().nth(2).cloned().unwrap_or_default();
        Ok(format!("Host: {addr} (static)\tPorts: 8080/open/tcp//http-proxy///\n"))
    }
}

#[tokio::test]
async fn custom_engine_plugs_into_the_service() {
    let engine = StaticEngine {
        hosts: vec!["192.168.7.1", "192.168.7.2", "192.168.7.1"],
    };
    let run = ReconService::new(Arc::new(engine))
        .perform_recon(&target("192.168.7.0/30", &[]))
        .await
        .unwrap();

    assert_eq!(run.hosts.len(), 3);
    assert_eq!(run.scanned, 3);
    assert_eq!(run.report.len(), 2);
    assert_eq!(
        run.report["IP: 192.168.7.2 (static)"].lines(),
        vec!["Ports:", "    8080/open/http-proxy"]
    );
}
