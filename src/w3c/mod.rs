//! W3C extended log decoding and conversion.
//!
//! - [`decoder`]: gzip archive to text
//! - [`parser`]: log text to comma-delimited header and records
//! - [`structures`]: the [`Archive`] and [`TabularLog`] values passed between them

mod decoder;
mod parser;
mod structures;

pub use decoder::decode;
pub use parser::parse;
pub use structures::*;
