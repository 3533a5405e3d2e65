use std::io::Read;

use flate2::read::MultiGzDecoder;

use crate::error::{Error, Result};

use super::structures::Archive;

/// Decompress a gzip archive into text.
///
/// Concatenated gzip members are decoded back to back. Invalid UTF-8 is
/// replaced rather than rejected.
pub fn decode(archive: &Archive) -> Result<String> {
    let mut decoder = MultiGzDecoder::new(archive.bytes.as_slice());
    let mut raw = Vec::with_capacity(archive.bytes.len() * 4);

    decoder
        .read_to_end(&mut raw)
        .map_err(|source| Error::Decode {
            path: archive.path.clone(),
            source,
        })?;

    Ok(String::from_utf8_lossy(&raw).into_owned())
}
