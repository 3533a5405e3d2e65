use std::path::PathBuf;

use crate::io::RetryPolicy;

/// Storage locations and append policy for one run
#[derive(Debug, Clone)]
pub struct PipelineConfig {
    /// Directory holding the `.gz` archives
    pub archive_dir: PathBuf,
    /// Directory receiving one `.csv` per archive
    pub csv_dir: PathBuf,
    /// Directory receiving the merged `logs.<epoch-ms>.csv`
    pub output_dir: PathBuf,
    pub retry: RetryPolicy,
}

impl PipelineConfig {
    pub fn new(
        archive_dir: impl Into<PathBuf>,
        csv_dir: impl Into<PathBuf>,
        output_dir: impl Into<PathBuf>,
    ) -> Self {
        Self {
            archive_dir: archive_dir.into(),
            csv_dir: csv_dir.into(),
            output_dir: output_dir.into(),
            retry: RetryPolicy::default(),
        }
    }

    pub fn with_retry(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self::new("gzip", "csv", ".")
    }
}
