use std::path::{Path, PathBuf};
use std::sync::Arc;

use chrono::Utc;
use tracing::{debug, info};

use super::PipelineConfig;
use crate::error::Result;
use crate::filter::FilterChain;
use crate::io::{
    AppendTarget, LocalFs, ResilientAppender, RetryPolicy, ensure_dir, list_files, read_file,
};
use crate::w3c::TabularLog;

/// Outcome of one merge
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CombineSummary {
    pub destination: PathBuf,
    pub files_combined: usize,
    pub records_seen: usize,
    pub records_accepted: usize,
}

impl CombineSummary {
    pub fn filtered_out(&self) -> usize {
        self.records_seen - self.records_accepted
    }
}

/// `logs.<unix-epoch-ms>.csv` inside `output_dir`
pub fn destination_path(output_dir: &Path) -> PathBuf {
    output_dir.join(format!("logs.{}.csv", Utc::now().timestamp_millis()))
}

/// Merges CSV sources into a single destination.
///
/// Sources are handled one at a time: each is read, filtered and appended
/// before the next is opened. That sequencing is what keeps appends to the
/// shared destination from interleaving. Only the first source's header is
/// written.
pub struct Combiner<T: AppendTarget> {
    appender: ResilientAppender<T>,
    filters: FilterChain,
    csv_dir: PathBuf,
}

impl<T: AppendTarget> Combiner<T> {
    /// Relative sources passed to [`Combiner::combine`] resolve against `csv_dir`.
    pub fn new(
        target: Arc<T>,
        destination: PathBuf,
        csv_dir: PathBuf,
        filters: FilterChain,
        retry: RetryPolicy,
    ) -> Self {
        Self {
            appender: ResilientAppender::with_policy(target, destination, retry),
            filters,
            csv_dir,
        }
    }

    pub fn destination(&self) -> &Path {
        self.appender.path()
    }

    /// Append every source in order.
    ///
    /// On failure the run stops; whatever was already appended stays in the
    /// destination.
    pub async fn combine(&self, sources: &[PathBuf]) -> Result<CombineSummary> {
        let mut summary = CombineSummary {
            destination: self.destination().to_path_buf(),
            files_combined: 0,
            records_seen: 0,
            records_accepted: 0,
        };

        for (index, source) in sources.iter().enumerate() {
            let path = self.csv_dir.join(source);
            let bytes = read_file(&path).await?;
            let log = TabularLog::from_csv(&String::from_utf8_lossy(&bytes));

            if index == 0 {
                self.appender.append(&format!("{}\n", log.header)).await?;
            }

            let accepted: Vec<&str> = log
                .records
                .iter()
                .map(String::as_str)
                .filter(|record| self.filters.accepts(record))
                .collect();

            if !accepted.is_empty() {
                let mut chunk = accepted.join("\n");
                chunk.push('\n');
                self.appender.append(&chunk).await?;
            }

            debug!(
                source = %path.display(),
                seen = log.records.len(),
                accepted = accepted.len(),
                "combined source"
            );
            summary.files_combined += 1;
            summary.records_seen += log.records.len();
            summary.records_accepted += accepted.len();
        }

        info!(
            files = summary.files_combined,
            filtered_out = summary.filtered_out(),
            dest = %summary.destination.display(),
            "combine finished"
        );
        Ok(summary)
    }
}

/// Merge `sources`, or every file in the CSV directory when `None`, into a
/// fresh timestamped file in the output directory.
pub async fn combine_csv(
    config: &PipelineConfig,
    filters: FilterChain,
    sources: Option<Vec<PathBuf>>,
) -> Result<CombineSummary> {
    ensure_dir(&config.csv_dir).await?;

    let sources = match sources {
        Some(sources) => sources,
        None => list_files(&config.csv_dir).await?,
    };

    let combiner = Combiner::new(
        Arc::new(LocalFs),
        destination_path(&config.output_dir),
        config.csv_dir.clone(),
        filters,
        config.retry,
    );
    combiner.combine(&sources).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;
    use async_trait::async_trait;
    use std::io::ErrorKind;
    use std::sync::atomic::{AtomicU32, Ordering};

    fn write_csv(dir: &Path, name: &str, header: &str, records: &[&str]) -> PathBuf {
        let log = TabularLog {
            header: header.to_string(),
            records: records.iter().map(|r| r.to_string()).collect(),
        };
        let path = dir.join(name);
        std::fs::write(&path, log.to_csv()).unwrap();
        path
    }

    fn local_combiner(csv_dir: &Path, dest: PathBuf, filters: FilterChain) -> Combiner<LocalFs> {
        Combiner::new(
            Arc::new(LocalFs),
            dest,
            csv_dir.to_path_buf(),
            filters,
            RetryPolicy::immediate(3),
        )
    }

    /// Answers `burst` ResourceBusy errors after each successful write
    struct Flaky {
        burst: u32,
        pending: AtomicU32,
    }

    #[async_trait]
    impl AppendTarget for Flaky {
        async fn append(&self, path: &Path, contents: &[u8]) -> std::io::Result<()> {
            let left = self.pending.load(Ordering::SeqCst);
            if left > 0 {
                self.pending.store(left - 1, Ordering::SeqCst);
                return Err(std::io::Error::from(ErrorKind::ResourceBusy));
            }
            self.pending.store(self.burst, Ordering::SeqCst);
            LocalFs.append(path, contents).await
        }
    }

    #[tokio::test]
    async fn test_order_and_single_header() {
        let csv = tempfile::tempdir().unwrap();
        let out = tempfile::tempdir().unwrap();
        let a = write_csv(csv.path(), "a.csv", "date,time", &["a1", "a2"]);
        let b = write_csv(csv.path(), "b.csv", "date,time", &["b1", "b2"]);

        let dest = out.path().join("merged.csv");
        let summary = local_combiner(csv.path(), dest.clone(), FilterChain::new())
            .combine(&[a, b])
            .await
            .unwrap();

        assert_eq!(
            std::fs::read_to_string(&dest).unwrap(),
            "date,time\na1\na2\nb1\nb2\n"
        );
        assert_eq!(summary.files_combined, 2);
        assert_eq!(summary.records_seen, 4);
        assert_eq!(summary.filtered_out(), 0);
    }

    #[tokio::test]
    async fn test_header_written_once_for_many_files() {
        let csv = tempfile::tempdir().unwrap();
        let out = tempfile::tempdir().unwrap();
        let sources: Vec<PathBuf> = (0..5)
            .map(|i| write_csv(csv.path(), &format!("{i}.csv"), "c-ip,cs-method", &["r"]))
            .collect();

        let dest = out.path().join("merged.csv");
        local_combiner(csv.path(), dest.clone(), FilterChain::new())
            .combine(&sources)
            .await
            .unwrap();

        let text = std::fs::read_to_string(&dest).unwrap();
        assert_eq!(text.lines().filter(|l| *l == "c-ip,cs-method").count(), 1);
        assert_eq!(text.lines().count(), 6);
    }

    #[tokio::test]
    async fn test_relative_sources_resolve_against_csv_dir() {
        let csv = tempfile::tempdir().unwrap();
        let out = tempfile::tempdir().unwrap();
        write_csv(csv.path(), "only.csv", "h", &["x"]);

        let dest = out.path().join("merged.csv");
        local_combiner(csv.path(), dest.clone(), FilterChain::new())
            .combine(&[PathBuf::from("only.csv")])
            .await
            .unwrap();

        assert_eq!(std::fs::read_to_string(&dest).unwrap(), "h\nx\n");
    }

    #[tokio::test]
    async fn test_filtering_counts_rejected_records() {
        let csv = tempfile::tempdir().unwrap();
        let out = tempfile::tempdir().unwrap();
        let a = write_csv(csv.path(), "a.csv", "ip,method", &["10.0.0.1,GET", "10.0.0.2,POST"]);
        let b = write_csv(csv.path(), "b.csv", "ip,method", &["10.0.0.3,POST"]);

        let filters = FilterChain::from_args(&["GET".to_string()], &[]).unwrap();
        let dest = out.path().join("merged.csv");
        let summary = local_combiner(csv.path(), dest.clone(), filters)
            .combine(&[a, b])
            .await
            .unwrap();

        assert_eq!(std::fs::read_to_string(&dest).unwrap(), "ip,method\n10.0.0.1,GET\n");
        assert_eq!(summary.records_seen, 3);
        assert_eq!(summary.records_accepted, 1);
        assert_eq!(summary.filtered_out(), 2);
    }

    #[tokio::test]
    async fn test_busy_destination_gives_identical_output() {
        let csv = tempfile::tempdir().unwrap();
        let out = tempfile::tempdir().unwrap();
        let a = write_csv(csv.path(), "a.csv", "h", &["a1", "a2"]);
        let b = write_csv(csv.path(), "b.csv", "h", &["b1"]);
        let sources = vec![a, b];

        let clean = out.path().join("clean.csv");
        local_combiner(csv.path(), clean.clone(), FilterChain::new())
            .combine(&sources)
            .await
            .unwrap();

        let flaky = out.path().join("flaky.csv");
        let combiner = Combiner::new(
            Arc::new(Flaky {
                burst: 3,
                pending: AtomicU32::new(3),
            }),
            flaky.clone(),
            csv.path().to_path_buf(),
            FilterChain::new(),
            RetryPolicy::immediate(3),
        );
        combiner.combine(&sources).await.unwrap();

        assert_eq!(
            std::fs::read(&clean).unwrap(),
            std::fs::read(&flaky).unwrap()
        );
    }

    #[tokio::test]
    async fn test_exhausted_retries_abort_and_keep_partial_output() {
        let csv = tempfile::tempdir().unwrap();
        let out = tempfile::tempdir().unwrap();
        let a = write_csv(csv.path(), "a.csv", "h", &["a1"]);

        let dest = out.path().join("merged.csv");
        // Header lands, then the records chunk sees four busy replies
        let combiner = Combiner::new(
            Arc::new(Flaky {
                burst: 4,
                pending: AtomicU32::new(0),
            }),
            dest.clone(),
            csv.path().to_path_buf(),
            FilterChain::new(),
            RetryPolicy::immediate(3),
        );

        let err = combiner.combine(&[a]).await.unwrap_err();
        assert!(matches!(err, Error::RetriesExhausted { attempts: 4, .. }));
        assert_eq!(std::fs::read_to_string(&dest).unwrap(), "h\n");
    }

    #[tokio::test]
    async fn test_missing_source_aborts() {
        let csv = tempfile::tempdir().unwrap();
        let out = tempfile::tempdir().unwrap();
        let a = write_csv(csv.path(), "a.csv", "h", &["a1"]);

        let dest = out.path().join("merged.csv");
        let err = local_combiner(csv.path(), dest.clone(), FilterChain::new())
            .combine(&[a, PathBuf::from("gone.csv")])
            .await
            .unwrap_err();

        assert!(matches!(err, Error::Io { .. }));
        assert_eq!(std::fs::read_to_string(&dest).unwrap(), "h\na1\n");
    }

    #[tokio::test]
    async fn test_combine_csv_lists_directory_when_no_sources() {
        let csv = tempfile::tempdir().unwrap();
        let out = tempfile::tempdir().unwrap();
        write_csv(csv.path(), "a.csv", "h", &["r1"]);
        write_csv(csv.path(), "b.csv", "h", &["r2"]);

        let config = PipelineConfig::new(csv.path().join("unused"), csv.path(), out.path())
            .with_retry(RetryPolicy::immediate(3));
        let summary = combine_csv(&config, FilterChain::new(), None).await.unwrap();

        assert_eq!(summary.files_combined, 2);
        let name = summary.destination.file_name().unwrap().to_string_lossy().to_string();
        assert!(name.starts_with("logs.") && name.ends_with(".csv"));

        let text = std::fs::read_to_string(&summary.destination).unwrap();
        let mut lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.remove(0), "h");
        lines.sort();
        assert_eq!(lines, vec!["r1", "r2"]);
    }

    #[test]
    fn test_destination_path_is_timestamped() {
        let path = destination_path(Path::new("/var/out"));
        let name = path.file_name().unwrap().to_str().unwrap();
        let millis = name
            .strip_prefix("logs.")
            .and_then(|rest| rest.strip_suffix(".csv"))
            .unwrap();
        assert!(millis.parse::<i64>().unwrap() > 0);
        assert_eq!(path.parent(), Some(Path::new("/var/out")));
    }
}
