use std::fmt;
use std::net::{IpAddr, Ipv4Addr};

use pnet::ipnetwork::Ipv4Network;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Ipv4Range {
    pub start_addr: Ipv4Addr,
    pub end_addr: Ipv4Addr,
}

impl Ipv4Range {
    pub fn new(start_addr: Ipv4Addr, end_addr: Ipv4Addr) -> Self {
        Self {
            start_addr,
            end_addr,
        }
    }

    pub fn len(&self) -> usize {
        let start: u32 = self.start_addr.into();
        let end: u32 = self.end_addr.into();
        if end < start {
            0
        } else {
            (end - start) as usize + 1
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Splits the range into the smallest set of CIDR blocks covering exactly
    /// the same addresses, in ascending order.
    pub fn to_cidr_blocks(&self) -> Vec<Ipv4Network> {
        let mut blocks = Vec::new();
        let mut start: u64 = u32::from(self.start_addr) as u64;
        let end: u64 = u32::from(self.end_addr) as u64;

        while start <= end {
            // Largest block aligned on `start` that does not overshoot `end`.
            let mut size: u64 = if start == 0 { 1 << 32 } else { start & start.wrapping_neg() };
            while start + size - 1 > end {
                size >>= 1;
            }

            let prefix = 32 - size.trailing_zeros() as u8;
            if let Ok(net) = Ipv4Network::new(Ipv4Addr::from(start as u32), prefix) {
                blocks.push(net);
            }
            start += size;
        }

        blocks
    }
}

impl fmt::Display for Ipv4Range {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.start_addr, self.end_addr)
    }
}

pub fn cidr_range(ip: Ipv4Addr, prefix: u8) -> anyhow::Result<Ipv4Range> {
    let network = Ipv4Network::new(ip, prefix)?;
    let start = network.network();
    let end = network.broadcast();

    Ok(Ipv4Range::new(start, end))
}

/// Flattened view of everything a target names.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IpCollection {
    pub singles: Vec<IpAddr>,
    pub ranges: Vec<Ipv4Range>,
}

impl IpCollection {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_single(&mut self, addr: IpAddr) {
        self.singles.push(addr);
    }

    pub fn add_range(&mut self, range: Ipv4Range) {
        self.ranges.push(range);
    }

    /// Number of addresses named, counting duplicates.
    pub fn len(&self) -> usize {
        self.singles.len() + self.ranges.iter().map(Ipv4Range::len).sum::<usize>()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn blocks(start: [u8; 4], end: [u8; 4]) -> Vec<String> {
        Ipv4Range::new(Ipv4Addr::from(start), Ipv4Addr::from(end))
            .to_cidr_blocks()
            .iter()
            .map(|net| net.to_string())
            .collect()
    }

    #[test]
    fn aligned_range_is_a_single_block() {
        assert_eq!(blocks([10, 0, 0, 0], [10, 0, 0, 255]), vec!["10.0.0.0/24"]);
    }

    #[test]
    fn unaligned_range_splits_into_minimal_blocks() {
        assert_eq!(
            blocks([192, 168, 1, 1], [192, 168, 1, 10]),
            vec![
                "192.168.1.1/32",
                "192.168.1.2/31",
                "192.168.1.4/30",
                "192.168.1.8/31",
                "192.168.1.10/32",
            ]
        );
    }

    #[test]
    fn single_address_range() {
        assert_eq!(blocks([172, 16, 0, 9], [172, 16, 0, 9]), vec!["172.16.0.9/32"]);
    }

    #[test]
    fn full_address_space() {
        assert_eq!(blocks([0, 0, 0, 0], [255, 255, 255, 255]), vec!["0.0.0.0/0"]);
    }

    #[test]
    fn inverted_range_is_empty() {
        let range = Ipv4Range::new(Ipv4Addr::new(10, 0, 0, 9), Ipv4Addr::new(10, 0, 0, 1));
        assert!(range.is_empty());
        assert!(range.to_cidr_blocks().is_empty());
    }

    #[test]
    fn cidr_range_normalises_host_bits() {
        let range = cidr_range(Ipv4Addr::new(10, 1, 2, 3), 24).unwrap();
        assert_eq!(range.start_addr, Ipv4Addr::new(10, 1, 2, 0));
        assert_eq!(range.end_addr, Ipv4Addr::new(10, 1, 2, 255));
        assert_eq!(range.len(), 256);
    }

    #[test]
    fn collection_counts_singles_and_ranges() {
        let mut collection = IpCollection::new();
        collection.add_single("::1".parse().unwrap());
        collection.add_range(Ipv4Range::new(
            Ipv4Addr::new(10, 0, 0, 1),
            Ipv4Addr::new(10, 0, 0, 4),
        ));
        assert_eq!(collection.len(), 5);
    }
}
