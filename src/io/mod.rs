mod appender;
mod local;

pub use appender::{ResilientAppender, RetryPolicy};
pub use local::{LocalFs, ensure_dir, list_files, read_file};

use async_trait::async_trait;
use std::path::Path;

/// Trait for appending bytes to the end of a file-like destination
#[async_trait]
pub trait AppendTarget: Send + Sync {
    /// Append `contents` to `path`, creating it if missing
    async fn append(&self, path: &Path, contents: &[u8]) -> std::io::Result<()>;
}
