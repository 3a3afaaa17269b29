//! Pairwise Compare Module
//! Builds one compare dataset for every ordered pair of devices and writes
//! them out in parallel.

use crate::charts::config::Layout;
use crate::charts::script::{pair_file_name, CompareScript, ScriptError, JSON_SUFFIX, SCRIPT_SUFFIX};
use crate::data::{catalog, Dataset, Profile};
use crate::settings::{Settings, SettingsError};
use crate::stats::{NormalizeError, NormalizedTable};
use rayon::prelude::*;
use serde::Serialize;
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, info};

#[derive(Error, Debug)]
pub enum CompareError {
    #[error(transparent)]
    Normalize(#[from] NormalizeError),
    #[error(transparent)]
    Script(#[from] ScriptError),
    #[error("Failed to write {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("Failed to encode {path}: {source}")]
    Json {
        path: PathBuf,
        source: serde_json::Error,
    },
    #[error(transparent)]
    Settings(#[from] SettingsError),
    #[error("At least two devices are needed for a comparison, got {0}")]
    TooFewProfiles(usize),
    #[error("Devices `{first}` and `{second}` share the file name `{name}`")]
    NameCollision {
        name: String,
        first: String,
        second: String,
    },
}

/// Output file flavour.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum OutputFormat {
    /// `<A>_vs_<B>_compare.js`
    #[default]
    Script,
    /// `<A>_vs_<B>_compare.json`
    Json,
}

impl OutputFormat {
    pub fn suffix(self) -> &'static str {
        match self {
            OutputFormat::Script => SCRIPT_SUFFIX,
            OutputFormat::Json => JSON_SUFFIX,
        }
    }
}

/// JSON form of a compare file.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct CompareDocument<'a> {
    products: [&'a str; 2],
    target: &'a str,
    layout: &'a Layout,
    data: &'a Dataset,
    max_value: f64,
    levels: i64,
}

/// Profiles normalized on one shared scale, ready to be paired.
pub struct Comparator<'a> {
    profiles: &'a [Profile],
    table: NormalizedTable,
    settings: &'a Settings,
}

impl<'a> Comparator<'a> {
    pub fn new(profiles: &'a [Profile], settings: &'a Settings) -> Result<Self, CompareError> {
        if profiles.len() < 2 {
            return Err(CompareError::TooFewProfiles(profiles.len()));
        }
        settings.validate()?;
        let table = NormalizedTable::compute(
            &catalog::compare_axes(),
            profiles,
            settings.slowdown_cap,
        )?;
        Ok(Self {
            profiles,
            table,
            settings,
        })
    }

    /// Every ordered pair of distinct profiles, first index major.
    pub fn pairs(&self) -> Vec<(usize, usize)> {
        let n = self.profiles.len();
        (0..n)
            .flat_map(|a| (0..n).filter(move |&b| b != a).map(move |b| (a, b)))
            .collect()
    }

    /// Compare script for profiles `a` and `b`.
    pub fn pair(&self, a: usize, b: usize) -> CompareScript {
        let with_axis = self.settings.title_with_axis;
        let first = self.table.series_for(a, &self.profiles[a], with_axis);
        let second = self.table.series_for(b, &self.profiles[b], with_axis);

        let mut script = CompareScript::new(Dataset::new(first, second))
            .with_products(&self.profiles[a].device, &self.profiles[b].device);
        script.target = self.settings.target.clone();
        script.layout = self.settings.layout();
        script.max_value = self.settings.max_value;
        script.levels = i64::from(self.settings.levels);
        script
    }

    /// Write every pair into `out_dir`; returns the written paths in pair order.
    pub fn write_all(&self, out_dir: &Path, format: OutputFormat) -> Result<Vec<PathBuf>, CompareError> {
        let names = self.file_names()?;
        fs::create_dir_all(out_dir).map_err(|source| CompareError::Io {
            path: out_dir.to_path_buf(),
            source,
        })?;

        let written = self
            .pairs()
            .into_par_iter()
            .map(|(a, b)| {
                let script = self.pair(a, b);
                let name = pair_file_name(&names[a], &names[b], format.suffix());
                let path = out_dir.join(name);
                write_script(&script, &path, format)?;
                debug!(path = %path.display(), "wrote compare file");
                Ok(path)
            })
            .collect::<Result<Vec<_>, CompareError>>()?;

        info!(
            files = written.len(),
            dir = %out_dir.display(),
            "compare files written"
        );
        Ok(written)
    }

    /// File-safe device names, one per profile; two devices may not share one.
    fn file_names(&self) -> Result<Vec<String>, CompareError> {
        let mut seen: HashMap<String, &str> = HashMap::new();
        let mut names = Vec::with_capacity(self.profiles.len());
        for profile in self.profiles {
            let name = file_safe(&profile.device);
            if let Some(first) = seen.insert(name.clone(), &profile.device) {
                return Err(CompareError::NameCollision {
                    name,
                    first: first.to_string(),
                    second: profile.device.clone(),
                });
            }
            names.push(name);
        }
        Ok(names)
    }
}

fn write_script(script: &CompareScript, path: &Path, format: OutputFormat) -> Result<(), CompareError> {
    match format {
        OutputFormat::Script => Ok(script.write(path)?),
        OutputFormat::Json => {
            let (a, b) = script
                .products
                .as_ref()
                .map(|(a, b)| (a.as_str(), b.as_str()))
                .unwrap_or_default();
            let doc = CompareDocument {
                products: [a, b],
                target: &script.target,
                layout: &script.layout,
                data: &script.data,
                max_value: script.max_value,
                levels: script.levels,
            };
            let text = serde_json::to_string_pretty(&doc).map_err(|source| CompareError::Json {
                path: path.to_path_buf(),
                source,
            })?;
            fs::write(path, text).map_err(|source| CompareError::Io {
                path: path.to_path_buf(),
                source,
            })
        }
    }
}

/// Device names go into file names; path separators must not.
fn file_safe(name: &str) -> String {
    name.replace(['/', '\\'], "_")
}
