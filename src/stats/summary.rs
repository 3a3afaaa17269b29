//! Comparison Summary Module
//! Per-series scores for a two-product dataset.

use crate::data::{Dataset, Series};
use serde::Serialize;
use statrs::statistics::{Data, Median, Statistics};

/// Scores of one series against the other.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SeriesSummary {
    pub axes: usize,
    pub supported: usize,
    /// Mean of supported values; NaN when nothing is supported.
    pub mean: f64,
    pub median: f64,
    /// Axes where this series is strictly faster and both are supported.
    pub wins: usize,
}

impl Default for SeriesSummary {
    fn default() -> Self {
        Self {
            axes: 0,
            supported: 0,
            mean: f64::NAN,
            median: f64::NAN,
            wins: 0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DatasetSummary {
    pub series: [SeriesSummary; 2],
    /// Axes supported by both series.
    pub shared: usize,
}

impl DatasetSummary {
    /// Index of the series with more wins, `None` on a tie.
    pub fn leader(&self) -> Option<usize> {
        let [a, b] = &self.series;
        match a.wins.cmp(&b.wins) {
            std::cmp::Ordering::Greater => Some(0),
            std::cmp::Ordering::Less => Some(1),
            std::cmp::Ordering::Equal => None,
        }
    }
}

/// Summarize a dataset.
pub fn summarize(dataset: &Dataset) -> DatasetSummary {
    let mut first = describe(dataset.first());
    let mut second = describe(dataset.second());
    let mut shared = 0;

    for (a, b) in dataset.zipped() {
        if !(a.is_supported() && b.is_supported()) {
            continue;
        }
        shared += 1;
        if a.value > b.value {
            first.wins += 1;
        } else if b.value > a.value {
            second.wins += 1;
        }
    }

    DatasetSummary {
        series: [first, second],
        shared,
    }
}

fn describe(series: &Series) -> SeriesSummary {
    let values: Vec<f64> = series
        .iter()
        .filter(|s| s.is_supported())
        .map(|s| s.value)
        .collect();

    if values.is_empty() {
        return SeriesSummary {
            axes: series.len(),
            ..Default::default()
        };
    }

    let mean = values.iter().mean();
    let median = Data::new(values.clone()).median();

    SeriesSummary {
        axes: series.len(),
        supported: values.len(),
        mean,
        median,
        wins: 0,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::MetricSample;

    #[test]
    fn wins_count_only_shared_axes() {
        let ds = Dataset::new(
            Series::new(vec![
                MetricSample::new("A", 0.9, "1.0 ms"),
                MetricSample::new("B", 0.2, "9.0 ms"),
                MetricSample::new("C", 0.5, "3.0 ms"),
            ]),
            Series::new(vec![
                MetricSample::new("A", 0.4, "4.0 ms"),
                MetricSample::new("B", 0.6, "2.0 ms"),
                MetricSample::not_supported("C"),
            ]),
        );
        let summary = summarize(&ds);
        assert_eq!(summary.shared, 2);
        assert_eq!(summary.series[0].wins, 1);
        assert_eq!(summary.series[1].wins, 1);
        assert_eq!(summary.leader(), None);

        assert_eq!(summary.series[0].supported, 3);
        assert!((summary.series[0].mean - 1.6 / 3.0).abs() < 1e-12);
        assert!((summary.series[0].median - 0.5).abs() < 1e-12);
        assert_eq!(summary.series[1].supported, 2);
        assert!((summary.series[1].median - 0.5).abs() < 1e-12);
    }

    #[test]
    fn unsupported_series_has_nan_scores() {
        let ds = Dataset::new(
            Series::new(vec![MetricSample::not_supported("A")]),
            Series::new(vec![MetricSample::new("A", 0.7, "2.0 ms")]),
        );
        let summary = summarize(&ds);
        assert_eq!(summary.series[0].supported, 0);
        assert!(summary.series[0].mean.is_nan());
        assert_eq!(summary.shared, 0);
        assert_eq!(summary.series[1].supported, 1);
        assert_eq!(summary.series[1].mean, 0.7);
    }
}
