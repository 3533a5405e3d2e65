use std::path::PathBuf;

/// A compressed log archive as read from disk
#[derive(Debug, Clone)]
pub struct Archive {
    pub path: PathBuf,
    pub bytes: Vec<u8>,
}

impl Archive {
    pub fn new(path: impl Into<PathBuf>, bytes: Vec<u8>) -> Self {
        Self {
            path: path.into(),
            bytes,
        }
    }

    /// File name of the archive, without its directory
    pub fn file_name(&self) -> String {
        self.path
            .file_name()
            .map(|s| s.to_string_lossy().to_string())
            .unwrap_or_default()
    }

    /// Name of the tabular file produced from this archive.
    ///
    /// Only the first `.gz` is rewritten, so `access.gz.1` becomes `access.csv.1`.
    pub fn csv_file_name(&self) -> String {
        self.file_name().replacen(".gz", ".csv", 1)
    }
}

/// Comma-delimited log: one header line plus records in input order
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct TabularLog {
    pub header: String,
    pub records: Vec<String>,
}

impl TabularLog {
    /// Parse the intermediate CSV text written by [`TabularLog::to_csv`].
    ///
    /// The first line is the header; empty lines after it are skipped.
    pub fn from_csv(text: &str) -> Self {
        let mut lines = text.lines();
        let header = lines.next().unwrap_or_default().to_string();
        let records = lines
            .filter(|line| !line.is_empty())
            .map(str::to_string)
            .collect();

        Self { header, records }
    }

    /// Header, newline, then records joined by newlines (no trailing newline).
    pub fn to_csv(&self) -> String {
        let mut out = String::with_capacity(
            self.header.len() + self.records.iter().map(|r| r.len() + 1).sum::<usize>(),
        );
        out.push_str(&self.header);
        out.push('\n');
        out.push_str(&self.records.join("\n"));
        out
    }
}
