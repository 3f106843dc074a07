//! # Report Model
//!
//! Structured per-host results as produced by the output parser and merged by
//! the aggregator.

use std::collections::{BTreeMap, HashMap};
use std::fmt;

use serde::ser::{Serialize, SerializeSeq, Serializer};

pub const PORTS_MARKER: &str = "Ports:";
pub const OS_MARKER: &str = "OS:";
const INDENT: &str = "    ";

/// Host-identifier -> record. Keys carry no ordering; use [`sorted`] for
/// deterministic output.
pub type ReportMap = HashMap<String, HostRecord>;

/// Builds the display key for a host: `IP: <addr> (<name>)`, or `IP: <addr>`
/// when no name was resolved.
pub fn host_identifier(addr: &str, name: Option<&str>) -> String {
    match name.filter(|n| !n.is_empty()) {
        Some(name) => format!("IP: {addr} ({name})"),
        None => format!("IP: {addr}"),
    }
}

/// Borrowing view of a report ordered by host-identifier.
pub fn sorted(report: &ReportMap) -> BTreeMap<&str, &HostRecord> {
    report.iter().map(|(k, v)| (k.as_str(), v)).collect()
}

/// A pre-formatted `port/state/service` line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PortEntry(String);

impl PortEntry {
    pub fn new(port: &str, state: &str, service: &str) -> Self {
        Self(format!("{port}/{state}/{service}"))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for PortEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RecordEntry {
    Port(PortEntry),
    Os(String),
}

/// Everything learned about one host within one scan, in discovery order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HostRecord {
    entries: Vec<RecordEntry>,
}

impl HostRecord {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push_port(&mut self, entry: PortEntry) {
        self.entries.push(RecordEntry::Port(entry));
    }

    pub fn push_os(&mut self, description: impl Into<String>) {
        self.entries.push(RecordEntry::Os(description.into()));
    }

    pub fn entries(&self) -> &[RecordEntry] {
        &self.entries
    }

    pub fn ports(&self) -> impl Iterator<Item = &PortEntry> {
        self.entries.iter().filter_map(|entry| match entry {
            RecordEntry::Port(port) => Some(port),
            RecordEntry::Os(_) => None,
        })
    }

    pub fn os(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().filter_map(|entry| match entry {
            RecordEntry::Os(os) => Some(os.as_str()),
            RecordEntry::Port(_) => None,
        })
    }

    /// Flat line rendering: the `Ports:` marker, indented port lines, and an
    /// `OS:` marker ahead of each indented OS description.
    pub fn lines(&self) -> Vec<String> {
        let mut lines = Vec::with_capacity(self.entries.len() * 2 + 1);
        lines.push(PORTS_MARKER.to_string());
        for entry in &self.entries {
            match entry {
                RecordEntry::Port(port) => lines.push(format!("{INDENT}{port}")),
                RecordEntry::Os(os) => {
                    lines.push(OS_MARKER.to_string());
                    lines.push(format!("{INDENT}{os}"));
                }
            }
        }
        lines
    }
}

impl Serialize for HostRecord {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let lines = self.lines();
        let mut seq = serializer.serialize_seq(Some(lines.len()))?;
        for line in &lines {
            seq.serialize_element(line)?;
        }
        seq.end()
    }
}
