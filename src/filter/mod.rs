//! Record filters.
//!
//! A [`FilterChain`] holds one [`Filter`] per configured category. A record
//! survives when every category accepts it; within a category any single
//! term or range is enough.

mod chain;
mod ip_range;

pub use chain::{Filter, FilterChain};
pub use ip_range::{IpRange, IpRangeMatcher, Octets, extract_octets};
