use std::net::IpAddr;

use colored::*;
use sweepr_common::report::{HostRecord, RecordEntry};

use crate::terminal::colors;

pub type Detail = (String, ColoredString);

pub fn addr_to_detail(addr: &str) -> Detail {
    match addr.parse::<IpAddr>() {
        Ok(IpAddr::V4(v4)) => ("IPv4".to_string(), v4.to_string().color(colors::IPV4_ADDR)),
        Ok(IpAddr::V6(v6)) => ("IPv6".to_string(), v6.to_string().color(colors::IPV6_ADDR)),
        Err(_) => ("Addr".to_string(), addr.normal()),
    }
}

/// Colours a `port/state/service` line by its state.
pub fn port_to_detail(entry: &str) -> Detail {
    let state = entry.split('/').nth(1).unwrap_or_default();
    let color = match state {
        "open" => colors::PORT_OPEN,
        "closed" => colors::PORT_CLOSED,
        _ => colors::PORT_FILTERED,
    };
    ("Port".to_string(), entry.color(color))
}

pub fn record_to_details(record: &HostRecord) -> Vec<Detail> {
    let details: Vec<Detail> = record
        .entries()
        .iter()
        .map(|entry| match entry {
            RecordEntry::Port(port) => port_to_detail(port.as_str()),
            RecordEntry::Os(os) => ("OS".to_string(), os.color(colors::OS)),
        })
        .collect();

    if details.is_empty() {
        return vec![("Ports".to_string(), "none reported".dimmed())];
    }
    details
}
