#![cfg(unix)]

use std::sync::Arc;

use sweepr_common::error::ExecError;
use sweepr_core::engine::NmapEngine;
use sweepr_core::recon::ReconService;

use crate::utils::{service, target};

#[tokio::test]
async fn discovery_reports_hosts_in_emission_order() {
    let hosts = service()
        .perform_discovery(&target("10.10.0.0/29", &["-sV"]))
        .await
        .unwrap();

    assert_eq!(hosts, vec!["10.10.0.1", "10.10.0.2", "10.10.0.3", "10.10.0.4"]);
}

#[tokio::test]
async fn discovery_with_no_responders_is_empty() {
    let hosts = service()
        .perform_discovery(&target("198.51.100.0/24", &[]))
        .await
        .unwrap();

    assert!(hosts.is_empty());
}

#[tokio::test]
async fn failing_discovery_carries_scanner_stderr() {
    let err = service()
        .perform_discovery(&target("192.0.2.0/24", &[]))
        .await
        .unwrap_err();

    match &err.0 {
        ExecError::ExitStatus { stderr, .. } => assert!(stderr.contains("Failed to resolve")),
        other => panic!("unexpected error: {other:?}"),
    }
    assert!(err.to_string().starts_with("host discovery failed"));
}

#[tokio::test]
async fn missing_scanner_binary_fails_discovery() {
    let service = ReconService::new(Arc::new(NmapEngine::new("/nonexistent/sweepr-nmap")));
    let err = service
        .perform_discovery(&target("10.10.0.0/29", &[]))
        .await
        .unwrap_err();

    assert!(matches!(err.0, ExecError::Spawn { .. }));
}
