//! Error types for logmerge.

use std::path::PathBuf;

use thiserror::Error;

/// Error type for the convert and combine pipeline.
#[derive(Error, Debug)]
pub enum Error {
    /// Archive could not be decompressed
    #[error("failed to decompress '{}': {source}", .path.display())]
    Decode {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Second line of a log is not a `#Fields:` directive
    #[error("missing '#Fields:' header line in '{}'", .path.display())]
    MalformedHeader { path: PathBuf },

    /// Unparsable `--ip-range` argument
    #[error("Failed to parse --ip-range of '{0}'")]
    InvalidRange(String),

    /// Unrecoverable filesystem failure
    #[error("I/O error on '{}': {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Destination stayed busy for every append attempt
    #[error("'{}' still busy after {attempts} attempts: {source}", .path.display())]
    RetriesExhausted {
        path: PathBuf,
        attempts: u32,
        #[source]
        source: std::io::Error,
    },
}

impl Error {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Error::Io {
            path: path.into(),
            source,
        }
    }
}

/// Result type alias for logmerge operations.
pub type Result<T> = std::result::Result<T, Error>;
