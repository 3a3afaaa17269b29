//! Metric Sample Module
//! Fixed-shape records handed to the radar renderer: one sample per axis,
//! one series per product, two series per dataset.

use serde::{Deserialize, Serialize};

/// Title marker for a benchmark that was not supported or not measured.
pub const NOT_SUPPORTED: &str = "NS";

/// Value written for unsupported samples.
pub const UNSUPPORTED_VALUE: f64 = 0.0;

/// Value the capped scale assigns to the slowest product (`1 - 1/1.11`, rounded).
pub const SLOWEST_VALUE: f64 = 0.099;

/// One spoke of the radar chart for one product.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MetricSample {
    /// Benchmark name and operand size, kept verbatim.
    pub axis: String,
    /// Relative performance in [0,1]; higher is faster.
    pub value: f64,
    /// Literal timing (`"41.4 ms"`) or `"NS"`.
    pub title: String,
}

impl MetricSample {
    pub fn new(axis: impl Into<String>, value: f64, title: impl Into<String>) -> Self {
        Self {
            axis: axis.into(),
            value,
            title: title.into(),
        }
    }

    /// Sample for a benchmark the product does not support.
    pub fn not_supported(axis: impl Into<String>) -> Self {
        Self::new(axis, UNSUPPORTED_VALUE, NOT_SUPPORTED)
    }

    pub fn is_not_supported(&self) -> bool {
        self.title == NOT_SUPPORTED
    }

    /// Timing in milliseconds parsed from the trailing `<number> ms` of the title.
    pub fn timing_ms(&self) -> Option<f64> {
        let rest = self.title.trim_end().strip_suffix("ms")?.trim_end();
        let number = rest.rsplit(char::is_whitespace).next()?;
        number.parse::<f64>().ok().filter(|v| v.is_finite())
    }

    /// Whether the value should count as a measured result.
    pub fn is_supported(&self) -> bool {
        !self.is_not_supported() && self.value > UNSUPPORTED_VALUE
    }
}

/// Ordered samples of one compared product.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Series {
    pub samples: Vec<MetricSample>,
}

impl Series {
    pub fn new(samples: Vec<MetricSample>) -> Self {
        Self { samples }
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    pub fn axes(&self) -> impl Iterator<Item = &str> {
        self.samples.iter().map(|s| s.axis.as_str())
    }

    pub fn iter(&self) -> std::slice::Iter<'_, MetricSample> {
        self.samples.iter()
    }
}

impl FromIterator<MetricSample> for Series {
    fn from_iter<I: IntoIterator<Item = MetricSample>>(iter: I) -> Self {
        Self::new(iter.into_iter().collect())
    }
}

/// Ordered pair of series overlaid on shared radial axes.
///
/// Serializes to the renderer's shape: `[[{axis,value,title},...],[...]]`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Dataset {
    pub series: [Series; 2],
}

impl Dataset {
    pub fn new(first: Series, second: Series) -> Self {
        Self {
            series: [first, second],
        }
    }

    pub fn first(&self) -> &Series {
        &self.series[0]
    }

    pub fn second(&self) -> &Series {
        &self.series[1]
    }

    /// Pairs of positionally matching samples, up to the shorter series.
    pub fn zipped(&self) -> impl Iterator<Item = (&MetricSample, &MetricSample)> {
        self.series[0].iter().zip(self.series[1].iter())
    }

    pub fn samples_mut(&mut self) -> impl Iterator<Item = &mut MetricSample> {
        self.series.iter_mut().flat_map(|s| s.samples.iter_mut())
    }
}

/// How `NS` samples carrying a non-zero value are treated on load.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SentinelPolicy {
    /// Keep values exactly as written.
    #[default]
    Preserve,
    /// Force every `NS` sample to 0.0.
    Normalize,
}

impl SentinelPolicy {
    /// Apply the policy in place; returns how many samples changed.
    pub fn apply(self, dataset: &mut Dataset) -> usize {
        match self {
            SentinelPolicy::Preserve => 0,
            SentinelPolicy::Normalize => {
                let mut changed = 0;
                for sample in dataset.samples_mut() {
                    if sample.is_not_supported() && sample.value != UNSUPPORTED_VALUE {
                        sample.value = UNSUPPORTED_VALUE;
                        changed += 1;
                    }
                }
                changed
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalize_policy_zeroes_unsupported_only() {
        let mut ds = Dataset::new(
            Series::new(vec![
                MetricSample::new("A", SLOWEST_VALUE, NOT_SUPPORTED),
                MetricSample::new("B", SLOWEST_VALUE, "62.4 ms"),
            ]),
            Series::new(vec![
                MetricSample::not_supported("A"),
                MetricSample::new("B", 0.9, "8.1 ms"),
            ]),
        );
        let untouched = ds.clone();
        assert_eq!(SentinelPolicy::Preserve.apply(&mut ds), 0);
        assert_eq!(ds, untouched);

        assert_eq!(SentinelPolicy::Normalize.apply(&mut ds), 1);
        assert_eq!(ds.first().samples[0].value, 0.0);
        assert_eq!(ds.first().samples[1].value, SLOWEST_VALUE);
    }

    #[test]
    fn timing_is_read_from_plain_and_labelled_titles() {
        let plain = MetricSample::new("SHA-1 hash (256B)", 0.834, "11.5 ms");
        assert_eq!(plain.timing_ms(), Some(11.5));

        let labelled = MetricSample::new("ECDH 256b", 0.5, "ECDH 256b 104.72 ms");
        assert_eq!(labelled.timing_ms(), Some(104.72));

        let ns = MetricSample::not_supported("RSA1024 encrypt");
        assert!(ns.is_not_supported());
        assert_eq!(ns.timing_ms(), None);
        assert!(!ns.is_supported());
    }

    #[test]
    fn dataset_serializes_as_nested_arrays() {
        let ds = Dataset::new(
            Series::new(vec![MetricSample::new("A", 0.5, "1.0 ms")]),
            Series::new(vec![MetricSample::not_supported("A")]),
        );
        let json = serde_json::to_string(&ds).unwrap();
        assert_eq!(
            json,
            r#"[[{"axis":"A","value":0.5,"title":"1.0 ms"}],[{"axis":"A","value":0.0,"title":"NS"}]]"#
        );
        let back: Dataset = serde_json::from_str(&json).unwrap();
        assert_eq!(back, ds);
    }

    #[test]
    fn dataset_rejects_more_than_two_series() {
        let json = r#"[[],[],[]]"#;
        assert!(serde_json::from_str::<Dataset>(json).is_err());
    }
}
