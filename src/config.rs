//! Configuration file handling.
//!
//! Loads `dashboard.toml` and merges command-line overrides into it.

use crate::stats::DEFAULT_YEAR;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// File looked up in the working directory when `--config` is not given.
pub const DEFAULT_CONFIG_FILE: &str = "dashboard.toml";

/// Root configuration structure.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub data: DataConfig,

    #[serde(default)]
    pub display: DisplayConfig,

    #[serde(default)]
    pub window: WindowConfig,

    #[serde(default)]
    pub export: ExportConfig,
}

/// Dataset settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DataConfig {
    /// CSV file with one row per exam year.
    #[serde(default = "default_data_path")]
    pub path: PathBuf,

    /// Year selected on start-up when the dataset contains it.
    #[serde(default = "default_year")]
    pub default_year: i64,
}

impl Default for DataConfig {
    fn default() -> Self {
        Self {
            path: default_data_path(),
            default_year: default_year(),
        }
    }
}

fn default_data_path() -> PathBuf {
    PathBuf::from("data.csv")
}

fn default_year() -> i64 {
    DEFAULT_YEAR
}

/// Page texts.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DisplayConfig {
    #[serde(default = "default_title")]
    pub title: String,

    #[serde(default = "default_subtitle")]
    pub subtitle: String,

    /// Footer line, hidden when unset.
    #[serde(default)]
    pub footer: Option<String>,
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            title: default_title(),
            subtitle: default_subtitle(),
            footer: None,
        }
    }
}

fn default_title() -> String {
    "Gobindashi High School".to_string()
}

fn default_subtitle() -> String {
    "SSC Result analysis year 2011 to 2025".to_string()
}

/// Native window size.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WindowConfig {
    #[serde(default = "default_window_width")]
    pub width: f32,

    #[serde(default = "default_window_height")]
    pub height: f32,
}

impl Default for WindowConfig {
    fn default() -> Self {
        Self {
            width: default_window_width(),
            height: default_window_height(),
        }
    }
}

fn default_window_width() -> f32 {
    1400.0
}

fn default_window_height() -> f32 {
    900.0
}

/// Static chart export settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExportConfig {
    /// PNG width in pixels.
    #[serde(default = "default_export_width")]
    pub width: u32,

    /// PNG height in pixels.
    #[serde(default = "default_export_height")]
    pub height: u32,
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            width: default_export_width(),
            height: default_export_height(),
        }
    }
}

fn default_export_width() -> u32 {
    900
}

fn default_export_height() -> u32 {
    600
}

impl Config {
    /// Load configuration from a file path.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let config: Config = toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

        Ok(config)
    }

    /// Load `dashboard.toml` from the working directory if present.
    ///
    /// Returns `Ok(None)` if the file doesn't exist, `Err` if it exists but can't be parsed.
    pub fn load_default() -> Result<Option<Self>> {
        let default_path = Path::new(DEFAULT_CONFIG_FILE);

        if default_path.exists() {
            Ok(Some(Self::load(default_path)?))
        } else {
            Ok(None)
        }
    }

    /// Apply command-line overrides. Only values given on the command line win.
    pub fn merge_with_args(&mut self, args: &crate::cli::Args) {
        if let Some(ref path) = args.data {
            self.data.path = path.clone();
        }
        if let Some(year) = args.year {
            self.data.default_year = year;
        }
    }

    /// Generate a default configuration file content.
    pub fn default_toml() -> Result<String> {
        toml::to_string_pretty(&Config::default()).context("Failed to serialize default config")
    }
}
