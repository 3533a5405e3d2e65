use super::ip_range::IpRangeMatcher;
use crate::error::Result;

/// One filter category. Alternatives inside a category are OR-ed.
#[derive(Debug, Clone)]
pub enum Filter {
    /// Record contains any of the terms as a substring
    Terms(Vec<String>),
    /// Record's first IPv4 address lies in any of the ranges
    IpRanges(IpRangeMatcher),
}

impl Filter {
    pub fn matches(&self, record: &str) -> bool {
        match self {
            Filter::Terms(terms) => terms.iter().any(|term| record.contains(term.as_str())),
            Filter::IpRanges(matcher) => matcher.matches(record),
        }
    }
}

/// Categories AND-ed together. An empty chain accepts everything.
#[derive(Debug, Clone, Default)]
pub struct FilterChain {
    filters: Vec<Filter>,
}

impl FilterChain {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build the chain from raw `--filter` and `--ip-range` values.
    ///
    /// Range tokens are validated here so a bad one aborts before any file is
    /// touched. Empty lists add no category.
    pub fn from_args(terms: &[String], ip_ranges: &[String]) -> Result<Self> {
        let mut chain = Self::new();

        if !ip_ranges.is_empty() {
            chain.push(Filter::IpRanges(IpRangeMatcher::parse_all(ip_ranges)?));
        }
        if !terms.is_empty() {
            chain.push(Filter::Terms(terms.to_vec()));
        }

        Ok(chain)
    }

    pub fn push(&mut self, filter: Filter) {
        self.filters.push(filter);
    }

    pub fn filters(&self) -> &[Filter] {
        &self.filters
    }

    pub fn is_empty(&self) -> bool {
        self.filters.is_empty()
    }

    pub fn accepts(&self, record: &str) -> bool {
        self.filters.iter().all(|filter| filter.matches(record))
    }
}
