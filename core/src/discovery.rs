//! # Host Discovery
//!
//! Runs the scanner in ping-only mode against the whole target and collects
//! the addresses it reports, in the order they were emitted.

use std::sync::Arc;

use sweepr_common::error::DiscoveryError;
use sweepr_common::network::target::ScanTarget;
use tracing::debug;

use crate::engine::ScanEngine;

/// Lines naming a responding host start with this token.
pub const HOST_MARKER: &str = "Host";

const DISCOVERY_FLAG: &str = "-sn";
pub const MACHINE_READABLE_FLAGS: [&str; 2] = ["-oG", "-"];

pub fn discovery_args(target: &ScanTarget) -> Vec<String> {
    let mut args = vec![DISCOVERY_FLAG.to_string()];
    args.extend(target.target.to_scanner_args());
    args.extend(MACHINE_READABLE_FLAGS.iter().map(|s| s.to_string()));
    args
}

/// The second whitespace-separated token of a marker line.
pub fn extract_address(line: &str) -> Option<&str> {
    if !line.starts_with(HOST_MARKER) {
        return None;
    }
    line.split_whitespace().nth(1)
}

pub struct DiscoveryScanner {
    engine: Arc<dyn ScanEngine>,
}

impl DiscoveryScanner {
    pub fn new(engine: Arc<dyn ScanEngine>) -> Self {
        Self { engine }
    }

    /// Returns every responding address. Duplicates are kept when the scanner
    /// repeats itself.
    pub async fn discover(&self, target: &ScanTarget) -> Result<Vec<String>, DiscoveryError> {
        let args = discovery_args(target);
        let mut hosts = Vec::new();

        self.engine
            .stream(&args, &mut |line: &str| {
                if let Some(addr) = extract_address(line) {
                    debug!(%addr, "host responded");
                    hosts.push(addr.to_string());
                }
            })
            .await?;

        Ok(hosts)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::mock::MockEngine;

    fn target(spec: &str) -> ScanTarget {
        ScanTarget::parse(spec, vec!["-sV".to_string()]).unwrap()
    }

    #[test]
    fn extracts_second_token_of_marker_lines() {
        assert_eq!(extract_address("Host: 10.0.0.1 (gw)\tStatus: Up"), Some("10.0.0.1"));
        assert_eq!(extract_address("Host: 10.0.0.2 ()\tStatus: Up"), Some("10.0.0.2"));
        assert_eq!(extract_address("Host:"), None);
        assert_eq!(extract_address("# Nmap done at ..."), None);
        assert_eq!(extract_address("  Host: 10.0.0.3"), None);
    }

    #[test]
    fn discovery_args_ignore_scan_flags() {
        let args = discovery_args(&target("10.0.0.0/24"));
        assert_eq!(args, vec!["-sn", "10.0.0.0/24", "-oG", "-"]);
    }

    #[tokio::test]
    async fn returns_hosts_in_emission_order_with_duplicates() {
        let engine = Arc::new(MockEngine::new().with_discovery(
            "# Nmap 7.94 scan initiated\n\
             Host: 10.0.0.9 (nine)\tStatus: Up\n\
             Host: 10.0.0.1 ()\tStatus: Up\n\
             Host: 10.0.0.9 (nine)\tStatus: Up\n\
             # Nmap done: 256 IP addresses (2 hosts up)\n",
        ));
        let scanner = DiscoveryScanner::new(engine.clone());

        let hosts = scanner.discover(&target("10.0.0.0/24")).await.unwrap();

        assert_eq!(hosts, vec!["10.0.0.9", "10.0.0.1", "10.0.0.9"]);
        assert_eq!(engine.calls()[0][0], "-sn");
    }

    #[tokio::test]
    async fn engine_failure_is_a_discovery_error() {
        let scanner = DiscoveryScanner::new(Arc::new(MockEngine::new()));
        let err = scanner.discover(&target("10.0.0.1")).await.unwrap_err();
        assert!(err.to_string().starts_with("host discovery failed"));
    }
}
