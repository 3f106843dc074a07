//! Reconnaissance core: host discovery, concurrent per-host deep scans, and
//! merging of the parsed results.
//!
//! - [`engine`]: the seam to the external scanner process
//! - [`parser`]: grepable output -> [`ReportMap`](sweepr_common::report::ReportMap)
//! - [`discovery`]: finds responding addresses
//! - [`scanner`]: fans out one deep scan per address
//! - [`aggregate`]: merges the per-host reports
//! - [`recon`]: the end-to-end use case

pub mod aggregate;
pub mod discovery;
pub mod engine;
pub mod parser;
pub mod recon;
pub mod scanner;
