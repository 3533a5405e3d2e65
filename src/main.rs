//! Main entry point for the logmerge CLI application.
//!
//! Parses arguments, validates filters before touching any file, runs the
//! requested stage and prints a short report.

use anyhow::Result;
use clap::{CommandFactory, Parser};
use tracing_subscriber::EnvFilter;

use logmerge::cli::{Command, FilterArgs};
use logmerge::filter::Filter;
use logmerge::{Cli, CombineSummary, FilterChain, combine_csv, convert_archives, create_log};

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Default to warnings only; RUST_LOG overrides
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let Some(command) = &cli.command else {
        Cli::command().print_help()?;
        return Ok(());
    };

    let config = cli.pipeline_config();

    match command {
        Command::ToCsv => {
            let converted = convert_archives(&config).await?;
            report_converted(converted.len());
        }
        Command::CombineCsv(args) => {
            let filters = prepare_filters(args)?;
            let summary = combine_csv(&config, filters, None).await?;
            report_combined(&summary);
        }
        Command::CreateLog(args) => {
            let filters = prepare_filters(args)?;
            let (converted, summary) = create_log(&config, filters).await?;
            report_converted(converted.len());
            report_combined(&summary);
        }
    }

    Ok(())
}

/// Validate the filter flags and list the active filters.
///
/// A bad `--ip-range` fails here, before any directory is read.
fn prepare_filters(args: &FilterArgs) -> Result<FilterChain> {
    let filters = args.filter_chain()?;

    for filter in filters.filters() {
        match filter {
            Filter::IpRanges(matcher) => {
                println!("Filtering logs by ip-ranges:");
                for range in matcher.ranges() {
                    println!(" - {}", range);
                }
            }
            Filter::Terms(terms) => {
                println!("Filtering logs by terms:");
                for term in terms {
                    println!(" - '{}'", term);
                }
            }
        }
    }

    Ok(filters)
}

fn report_converted(count: usize) {
    println!(
        "done converting {} file{} to .csv",
        count,
        if count == 1 { "" } else { "s" }
    );
}

fn report_combined(summary: &CombineSummary) {
    println!("Filtered out {} logs.", summary.filtered_out());
    println!(
        "Combined all CSV files into '{}'",
        summary.destination.display()
    );
}
