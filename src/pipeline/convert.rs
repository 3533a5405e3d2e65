use std::path::{Path, PathBuf};

use futures::future::try_join_all;
use tokio::fs;
use tracing::{debug, info};

use super::PipelineConfig;
use crate::error::{Error, Result};
use crate::io::{ensure_dir, list_files, read_file};
use crate::w3c::{self, Archive};

/// Convert every archive in the archive directory to a CSV file.
///
/// Archives are converted concurrently on the current task. Each writes its
/// own destination, so completion order does not matter; the returned paths
/// follow the directory listing. The first failure aborts the batch.
pub async fn convert_archives(config: &PipelineConfig) -> Result<Vec<PathBuf>> {
    ensure_dir(&config.archive_dir).await?;
    ensure_dir(&config.csv_dir).await?;

    let archives = list_files(&config.archive_dir).await?;
    info!(
        count = archives.len(),
        dir = %config.archive_dir.display(),
        "converting archives"
    );

    try_join_all(
        archives
            .iter()
            .map(|path| convert_archive(path, &config.csv_dir)),
    )
    .await
}

/// Decode and parse one archive, writing the result into `csv_dir`.
pub async fn convert_archive(path: &Path, csv_dir: &Path) -> Result<PathBuf> {
    let archive = Archive::new(path, read_file(path).await?);
    let text = w3c::decode(&archive)?;
    let log = w3c::parse(path, &text)?;

    let dest = csv_dir.join(archive.csv_file_name());
    fs::write(&dest, log.to_csv())
        .await
        .map_err(|e| Error::io(&dest, e))?;

    debug!(
        src = %path.display(),
        dest = %dest.display(),
        records = log.records.len(),
        "converted archive"
    );
    Ok(dest)
}
