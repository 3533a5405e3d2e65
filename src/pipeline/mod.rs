//! The convert and combine stages.
//!
//! [`convert_archives`] turns every archive into its own CSV file and may run
//! them in any order. [`combine_csv`] then merges CSV files strictly one after
//! another into a single destination. [`create_log`] runs both back to back.

mod combine;
mod config;
mod convert;

pub use combine::{CombineSummary, Combiner, combine_csv, destination_path};
pub use config::PipelineConfig;
pub use convert::{convert_archive, convert_archives};

use std::path::PathBuf;

use crate::error::Result;
use crate::filter::FilterChain;

/// Convert all archives, then merge exactly the files just written.
pub async fn create_log(
    config: &PipelineConfig,
    filters: FilterChain,
) -> Result<(Vec<PathBuf>, CombineSummary)> {
    let converted = convert_archives(config).await?;
    let summary = combine_csv(config, filters, Some(converted.clone())).await?;
    Ok((converted, summary))
}
