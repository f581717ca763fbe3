//! Command-line interface argument parsing.

use clap::Parser;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

/// SSC Result Dashboard
///
/// Opens an interactive dashboard over annual exam results, or writes the
/// same views as static charts with --export.
///
/// Examples:
///   ssc_dashboard
///   ssc_dashboard --data results.csv --year 2024
///   ssc_dashboard --export report/
///   ssc_dashboard --init-config
#[derive(Parser, Debug, Clone)]
#[command(author, version, about, long_about = None)]
pub struct Args {
    /// CSV dataset to load (overrides [data].path)
    #[arg(short, long, value_name = "FILE")]
    pub data: Option<PathBuf>,

    /// Year selected on start-up (overrides [data].default_year)
    #[arg(short, long, value_name = "YEAR")]
    pub year: Option<i64>,

    /// Path to configuration file
    ///
    /// If not specified, looks for dashboard.toml in the current directory
    #[arg(short, long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Write summary.json and PNG charts to this directory instead of opening a window
    #[arg(short, long, value_name = "DIR")]
    pub export: Option<PathBuf>,

    /// Write a default dashboard.toml and exit
    #[arg(long)]
    pub init_config: bool,

    /// Enable verbose logging output
    #[arg(short, long, conflicts_with = "quiet")]
    pub verbose: bool,

    /// Only log errors
    #[arg(short, long)]
    pub quiet: bool,
}

impl Args {
    /// Parse command-line arguments.
    pub fn parse_args() -> Self {
        Self::parse()
    }

    /// Get the log level based on verbosity flags.
    pub fn log_level(&self) -> tracing::Level {
        if self.quiet {
            tracing::Level::ERROR
        } else if self.verbose {
            tracing::Level::DEBUG
        } else {
            tracing::Level::INFO
        }
    }

    /// `RUST_LOG` when set, otherwise the level chosen by the verbosity flags.
    pub fn log_filter(&self) -> EnvFilter {
        EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::default().add_directive(self.log_level().into()))
    }
}
