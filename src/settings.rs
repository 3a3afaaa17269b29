//! Settings Module
//! Generation and checking options, optionally loaded from a JSON file.

use crate::charts::config::{
    Layout, DEFAULT_HEADER_OFFSET, DEFAULT_INSET, DEFAULT_LEVELS, DEFAULT_MAX_VALUE,
    DEFAULT_TARGET,
};
use crate::data::{validate_config, SentinelPolicy, ValidationRules};
use crate::stats::DEFAULT_CAP;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum SettingsError {
    #[error("Failed to read settings {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("Invalid settings {path}: {source}")]
    Parse {
        path: PathBuf,
        source: serde_json::Error,
    },
    #[error("Invalid settings: {}", .issues.join("; "))]
    Invalid { issues: Vec<String> },
}

/// All tunables; every field may be omitted from the file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Settings {
    /// Mount point selector of the chart.
    pub target: String,
    pub header_offset: u32,
    pub width_inset: u32,
    pub height_inset: u32,
    pub max_value: f64,
    pub levels: u32,
    /// Slowdown factor applied to the slowest average of each axis.
    pub slowdown_cap: f64,
    /// Axes per series expected by `check`; `null` disables the check.
    pub expected_axes: Option<usize>,
    pub sentinel: SentinelPolicy,
    /// Prefix timing titles with the axis label.
    pub title_with_axis: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            target: DEFAULT_TARGET.to_string(),
            header_offset: DEFAULT_HEADER_OFFSET,
            width_inset: DEFAULT_INSET,
            height_inset: DEFAULT_INSET,
            max_value: DEFAULT_MAX_VALUE,
            levels: DEFAULT_LEVELS,
            slowdown_cap: DEFAULT_CAP,
            expected_axes: Some(24),
            sentinel: SentinelPolicy::Preserve,
            title_with_axis: false,
        }
    }
}

impl Settings {
    /// Load settings from a JSON file.
    pub fn load(path: &Path) -> Result<Self, SettingsError> {
        let text = fs::read_to_string(path).map_err(|source| SettingsError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let settings: Self = serde_json::from_str(&text).map_err(|source| SettingsError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
        settings.validate()?;
        Ok(settings)
    }

    /// Generated files must pass `check`: `max_value` of 1 and positive `levels`.
    pub fn validate(&self) -> Result<(), SettingsError> {
        let report = validate_config(self.max_value, i64::from(self.levels));
        if report.has_errors() {
            return Err(SettingsError::Invalid {
                issues: report.issues.iter().map(ToString::to_string).collect(),
            });
        }
        Ok(())
    }

    /// Load from `path` if given, defaults otherwise.
    pub fn load_or_default(path: Option<&Path>) -> Result<Self, SettingsError> {
        match path {
            Some(p) => Self::load(p),
            None => Ok(Self::default()),
        }
    }

    pub fn layout(&self) -> Layout {
        Layout {
            header_offset: self.header_offset,
            width_inset: self.width_inset,
            height_inset: self.height_inset,
        }
    }

    pub fn validation_rules(&self) -> ValidationRules {
        ValidationRules {
            expected_axes: self.expected_axes,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn partial_file_keeps_defaults() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{ "levels": 5, "sentinel": "normalize", "expected_axes": null }}"#).unwrap();
        let settings = Settings::load(file.path()).unwrap();
        assert_eq!(settings.levels, 5);
        assert_eq!(settings.sentinel, SentinelPolicy::Normalize);
        assert_eq!(settings.expected_axes, None);
        assert_eq!(settings.slowdown_cap, 1.11);
        assert_eq!(settings.layout(), Layout::default());
    }

    #[test]
    fn unknown_keys_are_rejected() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{ "level": 5 }}"#).unwrap();
        assert!(matches!(
            Settings::load(file.path()),
            Err(SettingsError::Parse { .. })
        ));
    }

    #[test]
    fn chart_config_out_of_range_is_rejected() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{ "levels": 0, "max_value": 0.5 }}"#).unwrap();
        match Settings::load(file.path()) {
            Err(SettingsError::Invalid { issues }) => assert_eq!(issues.len(), 2),
            other => panic!("unexpected {other:?}"),
        }
        assert!(Settings::default().validate().is_ok());
    }

    #[test]
    fn missing_file_is_a_read_error() {
        let err = Settings::load(Path::new("/nonexistent/cardradar.json")).unwrap_err();
        assert!(matches!(err, SettingsError::Read { .. }));
        assert_eq!(Settings::load_or_default(None).unwrap(), Settings::default());
    }
}
