//! IPv4 range matching on raw record text.

use std::fmt;
use std::sync::LazyLock;

use regex::Regex;

use crate::error::{Error, Result};

/// Four dotted-quad groups. Groups are 1-3 digits and are not range-checked,
/// so `999.0.0.1` yields `[999, 0, 0, 1]`.
pub type Octets = [u16; 4];

static IPV4_SHAPED: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"([0-9]{1,3})\.([0-9]{1,3})\.([0-9]{1,3})\.([0-9]{1,3})").expect("valid IPv4 regex")
});

/// Find the first IPv4-shaped substring anywhere in `text`.
pub fn extract_octets(text: &str) -> Option<Octets> {
    let caps = IPV4_SHAPED.captures(text)?;
    let mut octets = [0u16; 4];
    for (slot, group) in octets.iter_mut().zip(caps.iter().skip(1)) {
        *slot = group?.as_str().parse().ok()?;
    }
    Some(octets)
}

/// Inclusive range compared octet by octet.
///
/// `10.0.23.2,10.2.0.254` therefore does NOT contain `10.1.1.1`: the third
/// octet 1 is below the start's 23.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IpRange {
    pub start: Octets,
    pub end: Octets,
}

impl IpRange {
    /// Parse a `start,end` token.
    ///
    /// Each side is scanned for its first IPv4-shaped substring, so
    /// surrounding noise is tolerated.
    pub fn parse(token: &str) -> Result<Self> {
        let invalid = || Error::InvalidRange(token.to_string());

        let (start, end) = token.split_once(',').ok_or_else(invalid)?;
        let start = extract_octets(start).ok_or_else(invalid)?;
        let end = extract_octets(end).ok_or_else(invalid)?;

        Ok(Self { start, end })
    }

    pub fn contains(&self, ip: &Octets) -> bool {
        ip.iter()
            .zip(self.start.iter().zip(self.end.iter()))
            .all(|(octet, (lo, hi))| octet >= lo && octet <= hi)
    }
}

impl fmt::Display for IpRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let [a, b, c, d] = self.start;
        let [w, x, y, z] = self.end;
        write!(f, "[{a}.{b}.{c}.{d} - {w}.{x}.{y}.{z}]")
    }
}

/// Accepts a record when its first embedded IPv4 address falls in any range
#[derive(Debug, Clone, Default)]
pub struct IpRangeMatcher {
    ranges: Vec<IpRange>,
}

impl IpRangeMatcher {
    pub fn new(ranges: Vec<IpRange>) -> Self {
        Self { ranges }
    }

    /// Validate every token up front; the first bad one is reported.
    pub fn parse_all<S: AsRef<str>>(tokens: &[S]) -> Result<Self> {
        let ranges = tokens
            .iter()
            .map(|token| IpRange::parse(token.as_ref()))
            .collect::<Result<Vec<_>>>()?;
        Ok(Self::new(ranges))
    }

    pub fn ranges(&self) -> &[IpRange] {
        &self.ranges
    }

    /// A record without any IPv4-shaped text never matches.
    pub fn matches(&self, record: &str) -> bool {
        match extract_octets(record) {
            Some(ip) => self.ranges.iter().any(|range| range.contains(&ip)),
            None => false,
        }
    }
}
