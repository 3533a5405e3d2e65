use super::AppendTarget;
use crate::error::{Error, Result};
use async_trait::async_trait;
use std::path::{Path, PathBuf};
use tokio::fs;
use tokio::io::AsyncWriteExt;

/// Appends to files on the local filesystem
#[derive(Debug, Clone, Copy, Default)]
pub struct LocalFs;

#[async_trait]
impl AppendTarget for LocalFs {
    async fn append(&self, path: &Path, contents: &[u8]) -> std::io::Result<()> {
        let mut file = fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(path)
            .await?;
        file.write_all(contents).await?;
        // tokio hands writes to a blocking task; wait for it to land
        file.flush().await
    }
}

/// Create `dir` and any missing parents. Existing directories are fine.
pub async fn ensure_dir(dir: &Path) -> Result<()> {
    fs::create_dir_all(dir)
        .await
        .map_err(|e| Error::io(dir, e))
}

/// Regular files directly inside `dir`, in the order the OS lists them.
pub async fn list_files(dir: &Path) -> Result<Vec<PathBuf>> {
    let mut entries = fs::read_dir(dir).await.map_err(|e| Error::io(dir, e))?;
    let mut files = Vec::new();

    while let Some(entry) = entries.next_entry().await.map_err(|e| Error::io(dir, e))? {
        let file_type = entry.file_type().await.map_err(|e| Error::io(entry.path(), e))?;
        if file_type.is_file() {
            files.push(entry.path());
        }
    }

    Ok(files)
}

pub async fn read_file(path: &Path) -> Result<Vec<u8>> {
    fs::read(path).await.map_err(|e| Error::io(path, e))
}
