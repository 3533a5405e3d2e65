//! # logmerge
//!
//! Turns a directory of gzipped W3C extended logs (IIS style) into a single
//! CSV file.
//!
//! The work happens in two stages:
//!
//! 1. **Convert** — every `.gz` archive is decompressed, its banner line
//!    dropped, its `#Fields:` directive turned into a CSV header and its
//!    tab-delimited records turned into comma-delimited ones. Each archive
//!    gets its own `.csv` file.
//! 2. **Combine** — the CSV files are merged in directory order into
//!    `logs.<unix-epoch-ms>.csv` with a single header line. Records can be
//!    narrowed by substring terms and by IPv4 ranges.
//!
//! ## Example
//!
//! ```no_run
//! use logmerge::{FilterChain, PipelineConfig, create_log};
//!
//! #[tokio::main(flavor = "current_thread")]
//! async fn main() -> anyhow::Result<()> {
//!     let config = PipelineConfig::new("gzip", "csv", ".");
//!     let filters = FilterChain::from_args(
//!         &["GET".to_string()],
//!         &["10.0.0.0,10.0.0.255".to_string()],
//!     )?;
//!
//!     let (converted, summary) = create_log(&config, filters).await?;
//!     println!("{} files -> {}", converted.len(), summary.destination.display());
//!
//!     Ok(())
//! }
//! ```

pub mod cli;
pub mod error;
pub mod filter;
pub mod io;
pub mod pipeline;
pub mod w3c;

pub use cli::Cli;
pub use error::{Error, Result};
pub use filter::{Filter, FilterChain, IpRange, IpRangeMatcher};
pub use io::{AppendTarget, LocalFs, ResilientAppender, RetryPolicy};
pub use pipeline::{
    CombineSummary, Combiner, PipelineConfig, combine_csv, convert_archives, create_log,
};
pub use w3c::{Archive, TabularLog};
