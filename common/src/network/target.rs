//! # Scan Target Model
//!
//! Defines the possible inputs for a reconnaissance run.
//!
//! This module handles parsing and representing targets, which can be:
//! * A single IP address (host).
//! * An IPv4 Range (e.g., `192.168.1.1-100`).
//! * A CIDR block (e.g., `192.168.1.0/24`).
//! * A comma-separated list of any of the above.
//!
//! Anything else the scanner understands on its own (hostnames, IPv6 CIDR
//! blocks, octet ranges like `10.0.1-3.1-254`) is passed through verbatim.

use std::fmt;
use std::net::{IpAddr, Ipv4Addr};
use std::str::FromStr;

use crate::error::ConfigError;
use crate::network::range::{self, IpCollection, Ipv4Range};
use crate::success;

/// Represents a distinct target to be scanned.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Target {
    /// Scan a single specific host.
    Host { target_addr: IpAddr },
    /// Scan a range of IPv4 addresses. CIDR blocks are stored as ranges too.
    Range { ipv4_range: Ipv4Range },
    /// Holds a list of different targets
    Multi { targets: Vec<Target> },
    /// Scanner syntax this crate does not model, handed over unchanged.
    Raw { spec: String },
}

impl FromStr for Target {
    type Err = String;

    /// Parses a string into a `Target`.
    ///
    /// Supported formats:
    /// * **Host**: Single IPv4/IPv6 address (e.g., "192.168.1.5").
    /// * **Range**: "Start-End" (e.g., "192.168.1.1-50", "192.168.1.1-192.168.1.50").
    /// * **CIDR**: "Network/Prefix" (e.g., "192.168.1.0/24").
    /// * **List**: comma separated (e.g., "10.0.0.1, 10.0.1.0/24").
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();

        if s.contains(',') {
            return parse_commas(s);
        }

        if let Some(target) = parse_host(s) {
            return Ok(target);
        }

        match parse_ip_range(s) {
            Ok(Some(target)) => return Ok(target),
            Err(e) if ipv4_before(s, '-') => return Err(e),
            _ => {}
        }

        match parse_cidr_range(s) {
            Ok(Some(target)) => return Ok(target),
            Err(e) if ipv4_before(s, '/') => return Err(e),
            _ => {}
        }

        if is_scanner_syntax(s) {
            return Ok(Target::Raw { spec: s.to_string() });
        }

        Err(format!("invalid target: {s}"))
    }
}

impl Target {
    /// Renders the target as scanner command-line operands.
    ///
    /// Ranges become the minimal covering set of CIDR blocks since the scanner
    /// has no syntax for arbitrary start-end spans.
    pub fn to_scanner_args(&self) -> Vec<String> {
        match self {
            Target::Host { target_addr } => vec![target_addr.to_string()],
            Target::Range { ipv4_range } => ipv4_range
                .to_cidr_blocks()
                .into_iter()
                .map(|net| {
                    if net.prefix() == 32 {
                        net.ip().to_string()
                    } else {
                        net.to_string()
                    }
                })
                .collect(),
            Target::Multi { targets } => targets.iter().flat_map(Target::to_scanner_args).collect(),
            Target::Raw { spec } => vec![spec.clone()],
        }
    }
}

impl fmt::Display for Target {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Target::Host { target_addr } => write!(f, "{target_addr}"),
            Target::Range { ipv4_range } => write!(f, "{ipv4_range}"),
            Target::Multi { targets } => {
                let parts: Vec<String> = targets.iter().map(ToString::to_string).collect();
                write!(f, "{}", parts.join(", "))
            }
            Target::Raw { spec } => write!(f, "{spec}"),
        }
    }
}

/// Immutable input to both scanners: what to scan and with which flags.
#[derive(Clone, Debug)]
pub struct ScanTarget {
    pub target: Target,
    pub flags: Vec<String>,
}

impl ScanTarget {
    pub fn new(target: Target, flags: Vec<String>) -> Self {
        Self { target, flags }
    }

    pub fn parse(spec: &str, flags: Vec<String>) -> Result<Self, ConfigError> {
        let target = Target::from_str(spec).map_err(ConfigError::InvalidTarget)?;
        Ok(Self::new(target, flags))
    }
}

fn resolve_target(target: &Target, collection: &mut IpCollection) {
    match target {
        Target::Host { target_addr } => collection.add_single(*target_addr),
        Target::Range { ipv4_range } => collection.add_range(*ipv4_range),
        Target::Multi { targets } => {
            for target in targets {
                resolve_target(target, collection);
            }
        }
        Target::Raw { .. } => {}
    }
}

/// Converts a target into an IP collection.
pub fn to_collection(target: &Target) -> IpCollection {
    let mut collection = IpCollection::new();

    resolve_target(target, &mut collection);

    let len: usize = collection.len();
    let unit: &str = if len == 1 { "IP address has been" } else { "IP addresses have been" };
    success!("{len} {unit} parsed successfully");

    collection
}

/// Parses a comma-separated list of targets (e.g., "192.168.1.5, 10.0.0.1-50").
pub fn parse_commas(s: &str) -> Result<Target, String> {
    let mut targets = Vec::new();

    for part in s.split(',') {
        let part = part.trim();
        if part.is_empty() {
            continue;
        }

        let target = Target::from_str(part)
            .map_err(|e| format!("failed to parse target '{part}': {e}"))?;

        targets.push(target);
    }

    if targets.is_empty() {
        return Err(format!("target list is empty: {s}"));
    }

    Ok(Target::Multi { targets })
}

/// True when the part of `s` before `sep` is a complete IPv4 address, i.e. the
/// input was meant as one of our own range forms and its error should stand.
fn ipv4_before(s: &str, sep: char) -> bool {
    s.split_once(sep)
        .is_some_and(|(head, _)| head.parse::<Ipv4Addr>().is_ok())
}

/// Characters the scanner accepts in a single target operand. A leading `-`
/// would be read as an option.
fn is_scanner_syntax(s: &str) -> bool {
    !s.is_empty()
        && !s.starts_with('-')
        && s
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '.' | ':' | '/' | '-' | '_' | '*' | '%'))
}

/// Parses a single IP address.
fn parse_host(s: &str) -> Option<Target> {
    s.parse::<IpAddr>()
        .ok()
        .map(|target_addr| Target::Host { target_addr })
}

/// Parses a range string like "1.1.1.1-2.2.2.2" or "1.1.1.1-50".
fn parse_ip_range(s: &str) -> Result<Option<Target>, String> {
    let Some((start_str, end_str)) = s.split_once('-') else {
        return Ok(None);
    };

    let start_addr = start_str
        .parse::<Ipv4Addr>()
        .map_err(|e| format!("Invalid start IP in range '{start_str}': {e}"))?;

    let end_addr = parse_range_end_addr(end_str, &start_addr, s)?;

    if u32::from(end_addr) < u32::from(start_addr) {
        return Err(format!("Range end is before range start: {s}"));
    }

    let ipv4_range = Ipv4Range::new(start_addr, end_addr);
    Ok(Some(Target::Range { ipv4_range }))
}

/// Helper to parse the end address of a range.
///
/// Handles abbreviated forms like "192.168.1.1-50" (implies 192.168.1.50)
/// and full forms like "192.168.1.1-192.168.1.255".
fn parse_range_end_addr(
    end_str: &str,
    start_addr: &Ipv4Addr,
    original_s: &str,
) -> Result<Ipv4Addr, String> {
    if let Ok(full_addr) = end_str.parse::<Ipv4Addr>() {
        return Ok(full_addr);
    }

    if end_str.is_empty() {
        return Err(format!("End range cannot be empty: {original_s}"));
    }

    let mut end_octets = start_addr.octets();
    let partial_octets: Vec<u8> = end_str
        .split('.')
        .map(|octet_str| octet_str.parse::<u8>())
        .collect::<Result<Vec<u8>, _>>()
        .map_err(|e| format!("Invalid end range '{end_str}': {e}"))?;

    if partial_octets.len() > 4 {
        return Err(format!("End range has too many octets: {end_str}"));
    }

    let start_index = 4 - partial_octets.len();
    end_octets[start_index..].copy_from_slice(&partial_octets);

    Ok(Ipv4Addr::from(end_octets))
}

/// Parses CIDR notation like "192.168.1.0/24".
fn parse_cidr_range(s: &str) -> Result<Option<Target>, String> {
    let Some((ip_str, prefix_str)) = s.split_once('/') else {
        return Ok(None);
    };

    let ipv4_addr = ip_str
        .parse::<Ipv4Addr>()
        .map_err(|e| format!("Invalid IP in CIDR '{ip_str}': {e}"))?;

    let prefix = prefix_str
        .parse::<u8>()
        .map_err(|e| format!("Invalid prefix in CIDR '{prefix_str}': {e}"))?;

    let ipv4_range = range::cidr_range(ipv4_addr, prefix).map_err(|e| e.to_string())?;

    Ok(Some(Target::Range { ipv4_range }))
}
