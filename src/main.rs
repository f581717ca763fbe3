//! SSC Dashboard - Exam Result Analysis Dashboard
//!
//! Aggregates annual SSC exam results from a CSV file and shows KPIs,
//! distributions, trends and a per-year drill-down in a native window,
//! or exports the same views as JSON and PNG charts.

mod charts;
mod cli;
mod config;
mod data;
mod gui;
mod report;
mod stats;

use anyhow::{Context, Result};
use cli::Args;
use config::{Config, DEFAULT_CONFIG_FILE};
use data::DataLoader;
use eframe::egui;
use gui::DashboardApp;
use report::ReportExporter;
use std::path::Path;
use tracing::{debug, info};
use tracing_subscriber::FmtSubscriber;

fn main() -> Result<()> {
    let args = Args::parse_args();

    // Handle --init-config early (no logging needed)
    if args.init_config {
        return handle_init_config();
    }

    init_logging(&args);
    info!("SSC Dashboard v{}", env!("CARGO_PKG_VERSION"));
    debug!("Arguments: {:?}", args);

    let mut config = load_config(&args)?;
    config.merge_with_args(&args);

    match args.export {
        Some(ref out_dir) => run_export(&config, out_dir),
        None => run_dashboard(config),
    }
}

/// Handle --init-config: generate a default dashboard.toml.
fn handle_init_config() -> Result<()> {
    let path = Path::new(DEFAULT_CONFIG_FILE);

    if path.exists() {
        anyhow::bail!("{} already exists. Remove it first or edit it manually.", DEFAULT_CONFIG_FILE);
    }

    std::fs::write(path, Config::default_toml()?)
        .with_context(|| format!("Failed to write {}", DEFAULT_CONFIG_FILE))?;

    println!("Created {} with default settings.", DEFAULT_CONFIG_FILE);
    Ok(())
}

/// Initialize logging based on verbosity settings.
fn init_logging(args: &Args) {
    let subscriber = FmtSubscriber::builder()
        .with_env_filter(args.log_filter())
        .with_target(false)
        .compact()
        .finish();

    if let Err(e) = tracing::subscriber::set_global_default(subscriber) {
        eprintln!("Failed to set tracing subscriber: {}", e);
    }
}

/// Explicit --config wins; otherwise dashboard.toml if present, else defaults.
fn load_config(args: &Args) -> Result<Config> {
    match args.config {
        Some(ref path) => Config::load(path),
        None => Ok(Config::load_default()?.unwrap_or_default()),
    }
}

fn run_export(config: &Config, out_dir: &Path) -> Result<()> {
    let table = DataLoader::new()
        .load(&config.data.path)
        .with_context(|| format!("Failed to load {}", config.data.path.display()))?;

    let written = ReportExporter::new(&config.export)
        .export(&table, &config.data.path, config.data.default_year, out_dir)
        .context("Export failed")?;

    for path in &written {
        println!("{}", path.display());
    }
    Ok(())
}

fn run_dashboard(config: Config) -> Result<()> {
    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([config.window.width, config.window.height])
            .with_min_inner_size([900.0, 600.0])
            .with_title("SSC Result Analysis Dashboard"),
        ..Default::default()
    };

    eframe::run_native(
        "SSC Result Analysis Dashboard",
        options,
        Box::new(|cc| Ok(Box::new(DashboardApp::new(cc, config)))),
    )
    .map_err(|e| anyhow::anyhow!("Dashboard window failed: {}", e))
}
