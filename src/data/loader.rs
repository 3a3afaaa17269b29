//! Timing Table Loader Module
//! Loads per-device operation averages from CSV using Polars.
//!
//! Expected columns: `device`, `function`, `operation_avg_ms`.

use polars::prelude::*;
use std::collections::{BTreeMap, HashMap};
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, info};

pub const DEVICE_COL: &str = "device";
pub const FUNCTION_COL: &str = "function";
pub const AVG_COL: &str = "operation_avg_ms";

#[derive(Error, Debug)]
pub enum LoaderError {
    #[error("Failed to load CSV: {0}")]
    CsvError(#[from] PolarsError),
    #[error("Timing table {path} has no column '{column}'")]
    MissingColumn { path: PathBuf, column: &'static str },
    #[error("Timing table {0} contains no devices")]
    NoData(PathBuf),
}

/// Averaged timings of one device, keyed by AlgTest method name.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Profile {
    pub device: String,
    pub timings: BTreeMap<String, f64>,
}

impl Profile {
    pub fn new(device: impl Into<String>) -> Self {
        Self {
            device: device.into(),
            timings: BTreeMap::new(),
        }
    }

    /// Add a timing; non-positive or non-finite averages count as unsupported.
    pub fn with_timing(mut self, function: impl Into<String>, avg_ms: f64) -> Self {
        self.record(function, avg_ms);
        self
    }

    pub fn record(&mut self, function: impl Into<String>, avg_ms: f64) {
        if avg_ms.is_finite() && avg_ms > 0.0 {
            self.timings.insert(function.into(), avg_ms);
        }
    }

    /// Average execution time of `function`, if measured.
    pub fn operation_avg(&self, function: &str) -> Option<f64> {
        self.timings.get(function).copied()
    }
}

/// Handles timing table loading with Polars.
pub struct TimingLoader;

impl TimingLoader {
    /// Load a timing CSV into profiles, in order of first appearance.
    pub fn load_csv(path: &Path) -> Result<Vec<Profile>, LoaderError> {
        let path_str = path.to_string_lossy().to_string();
        let df = LazyCsvReader::new(path_str.as_str())
            .with_infer_schema_length(Some(10000))
            .with_ignore_errors(true)
            .finish()?
            .collect()?;

        debug!(path = %path.display(), rows = df.height(), "timing table read");

        let profiles = Self::profiles_from_frame(&df, path)?;
        if profiles.is_empty() {
            return Err(LoaderError::NoData(path.to_path_buf()));
        }

        info!(
            path = %path.display(),
            devices = profiles.len(),
            "loaded timing profiles"
        );
        Ok(profiles)
    }

    /// Group the rows of a long-format timing frame by device.
    pub fn profiles_from_frame(df: &DataFrame, path: &Path) -> Result<Vec<Profile>, LoaderError> {
        let names: Vec<String> = df
            .get_column_names()
            .iter()
            .map(|s| s.to_string())
            .collect();
        for column in [DEVICE_COL, FUNCTION_COL, AVG_COL] {
            if !names.iter().any(|n| n == column) {
                return Err(LoaderError::MissingColumn {
                    path: path.to_path_buf(),
                    column,
                });
            }
        }

        let device_series = df.column(DEVICE_COL)?;
        let function_series = df.column(FUNCTION_COL)?;
        let avg_f64 = df.column(AVG_COL)?.cast(&DataType::Float64)?;
        let avg_ca = avg_f64.f64()?;

        let mut profiles: Vec<Profile> = Vec::new();
        let mut index: HashMap<String, usize> = HashMap::new();

        for i in 0..df.height() {
            let (Ok(d), Ok(f)) = (device_series.get(i), function_series.get(i)) else {
                continue;
            };
            if d.is_null() || f.is_null() {
                continue;
            }
            let device = d.to_string().trim_matches('"').to_string();
            let function = f.to_string().trim_matches('"').to_string();

            let slot = *index.entry(device.clone()).or_insert_with(|| {
                profiles.push(Profile::new(device.clone()));
                profiles.len() - 1
            });

            // Missing averages still register the device, with the function unsupported.
            if let Some(avg) = avg_ca.get(i) {
                profiles[slot].record(function, avg);
            }
        }

        Ok(profiles)
    }
}
