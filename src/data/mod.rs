//! Data module - benchmark samples, axis catalog, timing tables and checks

pub mod catalog;
mod loader;
pub mod sample;
pub mod validate;

pub use catalog::AxisSpec;
pub use loader::{LoaderError, Profile, TimingLoader};
pub use sample::{Dataset, MetricSample, SentinelPolicy, Series};
pub use validate::{validate_config, validate_dataset, Issue, IssueKind, Report, Severity, ValidationRules};
