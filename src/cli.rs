use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

use crate::error::Result;
use crate::filter::FilterChain;
use crate::pipeline::PipelineConfig;

#[derive(Parser, Debug)]
#[command(name = "logmerge")]
#[command(version)]
#[command(about = "Convert gzipped W3C logs to CSV and merge them into one log", long_about = None)]
#[command(after_help = "Examples:\n  \
  logmerge create-log\n  \
  logmerge create-log --filter POST --filter GET\n  \
  logmerge create-log --filter /todos --ip-range 10.0.23.2,10.2.0.254\n  \
  logmerge create-log --ip-range 10.0.23.2,10.2.0.254 --ip-range 10.18.77.0,10.12.77.4")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Command>,

    /// Directory holding the .gz archives
    #[arg(long, global = true, value_name = "DIR", default_value = "gzip")]
    pub gzip_dir: PathBuf,

    /// Directory for the per-archive .csv files
    #[arg(long, global = true, value_name = "DIR", default_value = "csv")]
    pub csv_dir: PathBuf,

    /// Directory the merged logs.<epoch-ms>.csv is written to
    #[arg(long, global = true, value_name = "DIR", default_value = ".")]
    pub output_dir: PathBuf,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Converts all .gz files in the gzip folder to .csv files in the csv folder
    ToCsv,

    /// Combines all .csv files in the csv folder into a single .csv file
    CombineCsv(FilterArgs),

    /// Creates a unified .csv log from the .gz files (to-csv followed by combine-csv)
    CreateLog(FilterArgs),
}

#[derive(Args, Debug, Clone, Default)]
pub struct FilterArgs {
    /// Filter by specific search terms
    #[arg(short = 'f', long = "filter", value_name = "TERM")]
    pub filters: Vec<String>,

    /// Specialized form of --filter that keeps records whose IP falls in START,END
    #[arg(long = "ip-range", visible_alias = "ip", value_name = "START,END")]
    pub ip_ranges: Vec<String>,
}

impl FilterArgs {
    /// Validates every `--ip-range` before returning.
    pub fn filter_chain(&self) -> Result<FilterChain> {
        FilterChain::from_args(&self.filters, &self.ip_ranges)
    }
}

impl Cli {
    pub fn pipeline_config(&self) -> PipelineConfig {
        PipelineConfig::new(&self.gzip_dir, &self.csv_dir, &self.output_dir)
    }
}
