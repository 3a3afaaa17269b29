//! Cardradar - smartcard benchmark radar comparisons
//!
//! Typed model, codec and integrity checks for the two-product radar chart
//! data files, plus their generation from averaged timing tables.

pub mod charts;
pub mod compare;
pub mod data;
pub mod logging;
pub mod settings;
pub mod stats;

pub use charts::{ChartConfig, CompareScript, JsonRenderer, RadarRenderer, Viewport};
pub use compare::{Comparator, OutputFormat};
pub use data::{Dataset, MetricSample, Series};
pub use settings::Settings;
