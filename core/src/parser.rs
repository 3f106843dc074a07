//! # Grepable Output Parser
//!
//! Turns the line-oriented machine-readable output of one scan into a
//! [`ReportMap`].
//!
//! A single forward pass keeps one piece of state: the host the most recent
//! `Host:` line named. Every line is checked, in order, for a host identity, for
//! port triples and for an OS description. A real grepable line usually carries
//! all three at once, separated by tabs:
//!
//! ```text
//! Host: 10.0.0.5 (foo)	Ports: 22/open/tcp//ssh///	Ignored State: closed (998)	OS: Linux 5.X
//! ```
//!
//! Anything else is skipped without complaint. The patterns only understand
//! IPv4 addresses and hostnames without parentheses.

use std::sync::OnceLock;

use regex::Regex;
use sweepr_common::report::{self, HostRecord, PortEntry, ReportMap};
use tracing::trace;

struct Patterns {
    host: Regex,
    port: Regex,
    os: Regex,
}

static PATTERNS: OnceLock<Patterns> = OnceLock::new();

fn patterns() -> &'static Patterns {
    PATTERNS.get_or_init(|| Patterns {
        host: Regex::new(r"Host: ([\d.]+)(?: \(([^)]*)\))?").expect("host pattern is valid"),
        port: Regex::new(r"(\d+)/([\w|]+)/tcp//([\w|.?+-]+)").expect("port pattern is valid"),
        os: Regex::new(r"OS: ([^\t]+)").expect("os pattern is valid"),
    })
}

/// Parser state for exactly one scan's output. Build a fresh one per stream.
#[derive(Debug, Default)]
pub struct OutputParser {
    report: ReportMap,
    current: Option<String>,
}

impl OutputParser {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn feed_line(&mut self, line: &str) {
        let patterns = patterns();

        if let Some(caps) = patterns.host.captures(line) {
            let addr = &caps[1];
            let name = caps.get(2).map(|m| m.as_str());
            let id = report::host_identifier(addr, name);
            if !self.report.contains_key(&id) {
                trace!(host = %id, "new host record");
                self.report.insert(id.clone(), HostRecord::new());
            }
            self.current = Some(id);
        }

        let Some(record) = self.current.as_ref().and_then(|id| self.report.get_mut(id)) else {
            return;
        };

        for caps in patterns.port.captures_iter(line) {
            record.push_port(PortEntry::new(&caps[1], &caps[2], &caps[3]));
        }

        if let Some(caps) = patterns.os.captures(line) {
            let description = caps[1].trim_end();
            if !description.is_empty() {
                record.push_os(description);
            }
        }
    }

    pub fn finish(self) -> ReportMap {
        self.report
    }
}

/// Parses a complete, already buffered scan output.
pub fn parse_output(output: &str) -> ReportMap {
    let mut parser = OutputParser::new();
    for line in output.lines() {
        parser.feed_line(line);
    }
    parser.finish()
}
