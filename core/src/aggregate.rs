//! Merges per-host reports into the final report.
//!
//! Later deposits replace earlier records under the same key wholesale; there
//! is no field-level union. Each task normally owns a distinct address, so
//! collisions only happen when discovery repeats a host.

use sweepr_common::report::ReportMap;
use tokio::sync::mpsc::Receiver;

pub fn merge<I>(maps: I) -> ReportMap
where
    I: IntoIterator<Item = ReportMap>,
{
    let mut merged = ReportMap::new();
    for map in maps {
        merged.extend(map);
    }
    merged
}

/// Drains the collection point in deposit order until every sender is gone.
pub async fn drain(mut rx: Receiver<ReportMap>) -> ReportMap {
    let mut deposits = Vec::new();
    while let Some(map) = rx.recv().await {
        deposits.push(map);
    }
    merge(deposits)
}
