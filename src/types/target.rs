//! Address specification and host expansion.
//!
//! Accepts strictly formatted IPv4 input:
//! - Single address (192.168.1.5)
//! - CIDR block (192.168.1.0/24)
//!
//! Expansion is pure: the same spec always yields the same ascending host list.

use ipnetwork::Ipv4Network;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::net::Ipv4Addr;
use std::str::FromStr;

/// A single host address produced by expanding an [`AddressSpec`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct HostTarget(Ipv4Addr);

impl HostTarget {
    /// Wrap an IPv4 address.
    pub const fn new(ip: Ipv4Addr) -> Self {
        Self(ip)
    }

    /// Get the underlying address.
    pub const fn ip(self) -> Ipv4Addr {
        self.0
    }
}

impl fmt::Display for HostTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Error type for address parsing.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AddressError {
    #[error("invalid address or CIDR block: {0}")]
    Invalid(String),
}

/// A validated scan target: one address or one CIDR block.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AddressSpec {
    /// A single IPv4 address.
    Single(Ipv4Addr),
    /// An IPv4 network block.
    Cidr(Ipv4Network),
}

impl AddressSpec {
    /// Parse an address specification.
    ///
    /// The address must be a dotted quad of 1-3 digit octets, optionally
    /// followed by `/` and a 1-2 digit prefix no larger than 32.
    pub fn parse(s: &str) -> Result<Self, AddressError> {
        let s = s.trim();
        let invalid = || AddressError::Invalid(s.to_string());

        let (addr, prefix) = match s.split_once('/') {
            Some((addr, prefix)) => (addr, Some(prefix)),
            None => (s, None),
        };

        let ip = parse_dotted_quad(addr).ok_or_else(invalid)?;

        match prefix {
            None => Ok(Self::Single(ip)),
            Some(prefix) => {
                if prefix.is_empty() || prefix.len() > 2 || !is_ascii_digits(prefix) {
                    return Err(invalid());
                }
                let prefix: u8 = prefix.parse().map_err(|_| invalid())?;
                let network = Ipv4Network::new(ip, prefix).map_err(|_| invalid())?;
                Ok(Self::Cidr(network))
            }
        }
    }

    /// Number of hosts this spec expands to.
    pub fn host_count(&self) -> u64 {
        match self {
            Self::Single(_) => 1,
            Self::Cidr(network) => 1u64 << (32 - u32::from(network.prefix())),
        }
    }

    /// Iterate over every host in ascending numeric order.
    ///
    /// For a CIDR block this covers the whole block from the network address
    /// to the broadcast address inclusive.
    pub fn hosts(&self) -> impl Iterator<Item = HostTarget> {
        let (first, last) = match self {
            Self::Single(ip) => (u32::from(*ip), u32::from(*ip)),
            Self::Cidr(network) => (u32::from(network.network()), u32::from(network.broadcast())),
        };
        (first..=last).map(|n| HostTarget(Ipv4Addr::from(n)))
    }

    /// Expand into the full ordered host list.
    pub fn expand(&self) -> Vec<HostTarget> {
        self.hosts().collect()
    }

    /// Check if this spec is a CIDR block.
    pub fn is_cidr(&self) -> bool {
        matches!(self, Self::Cidr(_))
    }
}

impl FromStr for AddressSpec {
    type Err = AddressError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl fmt::Display for AddressSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Single(ip) => write!(f, "{}", ip),
            Self::Cidr(network) => write!(f, "{}/{}", network.ip(), network.prefix()),
        }
    }
}

impl Serialize for AddressSpec {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

fn is_ascii_digits(s: &str) -> bool {
    s.bytes().all(|b| b.is_ascii_digit())
}

fn parse_dotted_quad(s: &str) -> Option<Ipv4Addr> {
    let mut octets = [0u8; 4];
    let mut parts = s.split('.');

    for octet in &mut octets {
        let part = parts.next()?;
        if part.is_empty() || part.len() > 3 || !is_ascii_digits(part) {
            return None;
        }
        *octet = part.parse().ok()?;
    }

    if parts.next().is_some() {
        return None;
    }

    Some(Ipv4Addr::from(octets))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn hosts(spec: &str) -> Vec<String> {
        AddressSpec::parse(spec)
            .unwrap()
            .expand()
            .iter()
            .map(|h| h.to_string())
            .collect()
    }

    #[test]
    fn test_single_address() {
        assert_eq!(hosts("192.168.1.5"), vec!["192.168.1.5"]);
    }

    #[test]
    fn test_cidr_slash_30() {
        assert_eq!(
            hosts("10.0.0.0/30"),
            vec!["10.0.0.0", "10.0.0.1", "10.0.0.2", "10.0.0.3"]
        );
    }

    #[test]
    fn test_cidr_slash_32() {
        assert_eq!(hosts("10.1.2.3/32"), vec!["10.1.2.3"]);
    }

    #[test]
    fn test_cidr_base_not_aligned() {
        // The block is taken from the masked network address.
        assert_eq!(
            hosts("10.0.0.6/30"),
            vec!["10.0.0.4", "10.0.0.5", "10.0.0.6", "10.0.0.7"]
        );
    }

    #[test]
    fn test_prefix_24_through_32_sizes_and_order() {
        for prefix in 24u32..=32 {
            let spec = AddressSpec::parse(&format!("172.16.5.0/{}", prefix)).unwrap();
            let expanded = spec.expand();
            assert_eq!(expanded.len() as u64, 1u64 << (32 - prefix));
            assert_eq!(spec.host_count(), expanded.len() as u64);
            assert!(expanded.windows(2).all(|w| u32::from(w[0].ip()) < u32::from(w[1].ip())));
        }
    }

    #[test]
    fn test_invalid_inputs() {
        for input in ["999.1.1.1", "1.2.3", "", "1.2.3.4.5", "a.b.c.d", "1.2.3.4/33", "1.2.3.4/", "1.2.3.4/abc", "1.2.3.4/008", "1.2.3.4 /24"] {
            assert!(
                matches!(AddressSpec::parse(input), Err(AddressError::Invalid(_))),
                "expected {:?} to be rejected",
                input
            );
        }
    }

    #[test]
    fn test_whitespace_trimmed() {
        assert_eq!(hosts("  10.0.0.1 "), vec!["10.0.0.1"]);
    }

    #[test]
    fn test_display() {
        assert_eq!(AddressSpec::parse("10.0.0.6/30").unwrap().to_string(), "10.0.0.6/30");
        assert_eq!(AddressSpec::parse("8.8.8.8").unwrap().to_string(), "8.8.8.8");
    }

    #[test]
    fn test_large_block_counted_without_expanding() {
        let spec = AddressSpec::parse("10.0.0.0/8").unwrap();
        assert_eq!(spec.host_count(), 16_777_216);
        assert!(spec.is_cidr());
    }
}
