//! CSV Data Loader Module
//! Loads the result table with Polars, normalizes headers and memoizes per path.

use polars::prelude::*;
use std::collections::{HashMap, HashSet};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use thiserror::Error;
use tracing::{debug, info};

#[derive(Error, Debug)]
pub enum LoadError {
    #[error("Data file not found: {}", .0.display())]
    NotFound(PathBuf),
    #[error("Failed to load CSV: {0}")]
    Csv(#[from] PolarsError),
    #[error("Column '{0}' appears more than once after trimming header whitespace")]
    DuplicateColumn(String),
}

/// Loads result tables and keeps every loaded table for the lifetime of the loader.
///
/// Tables are shared behind an `Arc` and never mutated after load, so handing
/// the same table to several views is free.
pub struct DataLoader {
    cache: HashMap<PathBuf, Arc<DataFrame>>,
}

impl Default for DataLoader {
    fn default() -> Self {
        Self::new()
    }
}

impl DataLoader {
    pub fn new() -> Self {
        Self {
            cache: HashMap::new(),
        }
    }

    /// Load a CSV file, returning the cached table when this path was loaded before.
    pub fn load(&mut self, path: &Path) -> Result<Arc<DataFrame>, LoadError> {
        if let Some(df) = self.cache.get(path) {
            debug!("Cache hit for {}", path.display());
            return Ok(Arc::clone(df));
        }

        let df = Arc::new(Self::read_csv(path)?);
        info!(
            "Loaded {} ({} rows, {} columns)",
            path.display(),
            df.height(),
            df.width()
        );
        self.cache.insert(path.to_path_buf(), Arc::clone(&df));
        Ok(df)
    }

    /// Whether a table for this path is already held in memory.
    pub fn is_cached(&self, path: &Path) -> bool {
        self.cache.contains_key(path)
    }

    /// Read and normalize a CSV file without touching the cache.
    pub fn read_csv(path: &Path) -> Result<DataFrame, LoadError> {
        if !path.is_file() {
            return Err(LoadError::NotFound(path.to_path_buf()));
        }

        let mut df = LazyCsvReader::new(path)
            .with_has_header(true)
            .with_infer_schema_length(Some(10000))
            .finish()?
            .collect()?;

        Self::trim_column_names(&mut df)?;
        Ok(df)
    }

    /// Strip leading and trailing whitespace from every column name.
    fn trim_column_names(df: &mut DataFrame) -> Result<(), LoadError> {
        let names: Vec<String> = df
            .get_column_names()
            .iter()
            .map(|s| s.to_string())
            .collect();

        let mut seen = HashSet::new();
        for name in &names {
            let trimmed = name.trim();
            if !seen.insert(trimmed.to_string()) {
                return Err(LoadError::DuplicateColumn(trimmed.to_string()));
            }
        }

        for name in &names {
            let trimmed = name.trim();
            if trimmed != name {
                df.rename(name, trimmed.into())?;
            }
        }
        // polars 0.46 `rename` leaves the cached schema stale; refresh it so
        // lazy plans see the trimmed names.
        df.clear_schema();

        Ok(())
    }
}

/// Get list of column names from a table.
pub fn column_names(df: &DataFrame) -> Vec<String> {
    df.get_column_names()
        .iter()
        .map(|s| s.to_string())
        .collect()
}
