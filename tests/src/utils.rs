use std::path::PathBuf;
use std::sync::Arc;

use sweepr_common::network::target::ScanTarget;
use sweepr_core::engine::NmapEngine;
use sweepr_core::recon::ReconService;

pub fn fake_scanner() -> NmapEngine {
    let script: PathBuf = [env!("CARGO_MANIFEST_DIR"), "fixtures", "fake_nmap.sh"]
        .iter()
        .collect();
    NmapEngine::new("sh").with_prefix_args([script.display().to_string()])
}

pub fn service() -> ReconService {
    ReconService::new(Arc::new(fake_scanner()))
}

pub fn target(spec: &str, flags: &[&str]) -> ScanTarget {
    ScanTarget::parse(spec, flags.iter().map(|f| f.to_string()).collect()).unwrap()
}
