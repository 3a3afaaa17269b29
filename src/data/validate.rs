//! Dataset Integrity Checks
//! Flags structural and value problems in a dataset without rejecting it.

use crate::data::sample::{Dataset, MetricSample, SLOWEST_VALUE, UNSUPPORTED_VALUE};
use serde::Serialize;
use std::fmt;
use tracing::{error, warn};

/// Tolerance for comparing values written with three decimals.
const VALUE_EPSILON: f64 = 1e-9;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Warning,
    Error,
}

/// What was found wrong.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum IssueKind {
    LengthMismatch { first: usize, second: usize },
    AxisMismatch { first: String, second: String },
    UnexpectedAxisCount { expected: usize, found: usize },
    ValueOutOfRange { value: f64 },
    /// `NS` carrying the slowest-product floor instead of 0.
    SlowestValueOnUnsupported,
    UnsupportedWithValue { value: f64 },
    /// Measured timing but plotted at the center.
    ZeroValueWithTiming,
    UnreadableTitle { title: String },
    EmptyAxis,
    MaxValue { value: f64 },
    Levels { value: i64 },
}

/// One finding, located by series and sample index where it applies.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Issue {
    pub severity: Severity,
    pub series: Option<usize>,
    pub index: Option<usize>,
    #[serde(flatten)]
    pub kind: IssueKind,
}

impl fmt::Display for Issue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sev = match self.severity {
            Severity::Warning => "warning",
            Severity::Error => "error",
        };
        write!(f, "{sev}")?;
        match (self.series, self.index) {
            (Some(s), Some(i)) => write!(f, " [series {s}, sample {i}]")?,
            (Some(s), None) => write!(f, " [series {s}]")?,
            (None, Some(i)) => write!(f, " [sample {i}]")?,
            (None, None) => {}
        }
        match &self.kind {
            IssueKind::LengthMismatch { first, second } => {
                write!(f, ": series lengths differ ({first} vs {second})")
            }
            IssueKind::AxisMismatch { first, second } => {
                write!(f, ": axis labels differ ('{first}' vs '{second}')")
            }
            IssueKind::UnexpectedAxisCount { expected, found } => {
                write!(f, ": expected {expected} axes, found {found}")
            }
            IssueKind::ValueOutOfRange { value } => write!(f, ": value {value} outside [0,1]"),
            IssueKind::SlowestValueOnUnsupported => {
                write!(f, ": NS sample uses {SLOWEST_VALUE} instead of 0.0")
            }
            IssueKind::UnsupportedWithValue { value } => {
                write!(f, ": NS sample has value {value}")
            }
            IssueKind::ZeroValueWithTiming => write!(f, ": measured sample plotted at 0.0"),
            IssueKind::UnreadableTitle { title } => {
                write!(f, ": title '{title}' is neither NS nor a timing in ms")
            }
            IssueKind::EmptyAxis => write!(f, ": empty axis label"),
            IssueKind::MaxValue { value } => write!(f, ": maxValue is {value}, expected 1.0"),
            IssueKind::Levels { value } => write!(f, ": levels must be positive, got {value}"),
        }
    }
}

/// Checks applied to a dataset.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ValidationRules {
    /// Required number of axes per series, if any.
    pub expected_axes: Option<usize>,
}

impl Default for ValidationRules {
    fn default() -> Self {
        Self {
            expected_axes: Some(24),
        }
    }
}

/// Result of validating one dataset.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Report {
    pub issues: Vec<Issue>,
}

impl Report {
    pub fn has_errors(&self) -> bool {
        self.issues.iter().any(|i| i.severity == Severity::Error)
    }

    pub fn warnings(&self) -> usize {
        self.issues
            .iter()
            .filter(|i| i.severity == Severity::Warning)
            .count()
    }

    pub fn errors(&self) -> usize {
        self.issues
            .iter()
            .filter(|i| i.severity == Severity::Error)
            .count()
    }

    pub fn is_clean(&self) -> bool {
        self.issues.is_empty()
    }

    /// Emit every issue as a `warn!` or `error!` event for `source`.
    pub fn log(&self, source: &str) {
        for issue in &self.issues {
            match issue.severity {
                Severity::Warning => warn!(source, "{issue}"),
                Severity::Error => error!(source, "{issue}"),
            }
        }
    }

    fn push(&mut self, severity: Severity, series: Option<usize>, index: Option<usize>, kind: IssueKind) {
        self.issues.push(Issue {
            severity,
            series,
            index,
            kind,
        });
    }
}

fn approx_eq(a: f64, b: f64) -> bool {
    (a - b).abs() < VALUE_EPSILON
}

/// Validate a dataset's shape and sample values.
pub fn validate_dataset(dataset: &Dataset, rules: &ValidationRules) -> Report {
    let mut report = Report::default();

    let (first, second) = (dataset.first(), dataset.second());
    if first.len() != second.len() {
        report.push(
            Severity::Error,
            None,
            None,
            IssueKind::LengthMismatch {
                first: first.len(),
                second: second.len(),
            },
        );
    }

    for (i, (a, b)) in dataset.zipped().enumerate() {
        if a.axis != b.axis {
            report.push(
                Severity::Error,
                None,
                Some(i),
                IssueKind::AxisMismatch {
                    first: a.axis.clone(),
                    second: b.axis.clone(),
                },
            );
        }
    }

    for (s, series) in dataset.series.iter().enumerate() {
        if let Some(expected) = rules.expected_axes {
            if series.len() != expected {
                report.push(
                    Severity::Warning,
                    Some(s),
                    None,
                    IssueKind::UnexpectedAxisCount {
                        expected,
                        found: series.len(),
                    },
                );
            }
        }
        for (i, sample) in series.iter().enumerate() {
            check_sample(&mut report, s, i, sample);
        }
    }

    report
}

fn check_sample(report: &mut Report, s: usize, i: usize, sample: &MetricSample) {
    let at = (Some(s), Some(i));

    if sample.axis.trim().is_empty() {
        report.push(Severity::Error, at.0, at.1, IssueKind::EmptyAxis);
    }

    if !(0.0..=1.0).contains(&sample.value) {
        report.push(
            Severity::Error,
            at.0,
            at.1,
            IssueKind::ValueOutOfRange {
                value: sample.value,
            },
        );
    }

    if sample.is_not_supported() {
        if approx_eq(sample.value, SLOWEST_VALUE) {
            report.push(
                Severity::Warning,
                at.0,
                at.1,
                IssueKind::SlowestValueOnUnsupported,
            );
        } else if !approx_eq(sample.value, UNSUPPORTED_VALUE) {
            report.push(
                Severity::Error,
                at.0,
                at.1,
                IssueKind::UnsupportedWithValue {
                    value: sample.value,
                },
            );
        }
    } else if sample.timing_ms().is_none() {
        report.push(
            Severity::Error,
            at.0,
            at.1,
            IssueKind::UnreadableTitle {
                title: sample.title.clone(),
            },
        );
    } else if approx_eq(sample.value, UNSUPPORTED_VALUE) {
        report.push(Severity::Warning, at.0, at.1, IssueKind::ZeroValueWithTiming);
    }
}

/// Validate the chart configuration constants.
pub fn validate_config(max_value: f64, levels: i64) -> Report {
    let mut report = Report::default();
    if !approx_eq(max_value, 1.0) {
        report.push(
            Severity::Error,
            None,
            None,
            IssueKind::MaxValue { value: max_value },
        );
    }
    if levels <= 0 {
        report.push(Severity::Error, None, None, IssueKind::Levels { value: levels });
    }
    report
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::sample::Series;
    use std::io;
    use std::sync::{Arc, Mutex};
    use tracing_subscriber::fmt::MakeWriter;

    #[derive(Clone, Default)]
    struct Captured(Arc<Mutex<Vec<u8>>>);

    impl io::Write for Captured {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    impl<'a> MakeWriter<'a> for Captured {
        type Writer = Captured;

        fn make_writer(&'a self) -> Self::Writer {
            self.clone()
        }
    }

    fn rules() -> ValidationRules {
        ValidationRules {
            expected_axes: None,
        }
    }

    fn pair(a: Vec<MetricSample>, b: Vec<MetricSample>) -> Dataset {
        Dataset::new(Series::new(a), Series::new(b))
    }

    #[test]
    fn clean_dataset_has_no_issues() {
        let ds = pair(
            vec![
                MetricSample::new("SHA-1 hash (256B)", 0.834, "11.5 ms"),
                MetricSample::not_supported("RSA1024 encrypt"),
            ],
            vec![
                MetricSample::new("SHA-1 hash (256B)", 0.099, "62.4 ms"),
                MetricSample::new("RSA1024 encrypt", 0.5, "12.0 ms"),
            ],
        );
        let report = validate_dataset(&ds, &rules());
        assert!(report.is_clean(), "{:?}", report.issues);
    }

    #[test]
    fn mismatched_lengths_and_axes_are_errors() {
        let ds = pair(
            vec![
                MetricSample::new("A", 0.5, "1.0 ms"),
                MetricSample::new("B", 0.5, "1.0 ms"),
            ],
            vec![MetricSample::new("X", 0.5, "1.0 ms")],
        );
        let report = validate_dataset(&ds, &rules());
        assert_eq!(report.errors(), 2);
        assert!(report
            .issues
            .iter()
            .any(|i| matches!(i.kind, IssueKind::LengthMismatch { first: 2, second: 1 })));
        assert!(report
            .issues
            .iter()
            .any(|i| matches!(i.kind, IssueKind::AxisMismatch { .. }) && i.index == Some(0)));
    }

    #[test]
    fn sentinel_on_unsupported_is_flagged_not_rejected() {
        let ds = pair(
            vec![MetricSample::new("A", 0.099, "NS")],
            vec![MetricSample::new("A", 0.3, "NS")],
        );
        let report = validate_dataset(&ds, &rules());
        assert_eq!(report.warnings(), 1);
        assert_eq!(report.errors(), 1);
        assert_eq!(report.issues[0].kind, IssueKind::SlowestValueOnUnsupported);
        assert_eq!(report.issues[1].kind, IssueKind::UnsupportedWithValue { value: 0.3 });
    }

    #[test]
    fn out_of_range_and_bad_titles() {
        let ds = pair(
            vec![MetricSample::new("A", 1.2, "fast")],
            vec![MetricSample::new("A", 0.0, "3.1 ms")],
        );
        let report = validate_dataset(&ds, &rules());
        let kinds: Vec<_> = report.issues.iter().map(|i| &i.kind).collect();
        assert!(kinds.contains(&&IssueKind::ValueOutOfRange { value: 1.2 }));
        assert!(kinds.contains(&&IssueKind::UnreadableTitle {
            title: "fast".into()
        }));
        assert!(kinds.contains(&&IssueKind::ZeroValueWithTiming));
    }

    #[test]
    fn axis_count_is_a_warning() {
        let ds = pair(
            vec![MetricSample::new("A", 0.5, "1.0 ms")],
            vec![MetricSample::new("A", 0.5, "1.0 ms")],
        );
        let report = validate_dataset(&ds, &ValidationRules::default());
        assert!(!report.has_errors());
        assert_eq!(report.warnings(), 2);
    }

    #[test]
    fn config_constants() {
        assert!(validate_config(1.0, 10).is_clean());
        let report = validate_config(0.5, 0);
        assert_eq!(report.errors(), 2);
    }

    #[test]
    fn issue_display_names_location() {
        let issue = Issue {
            severity: Severity::Warning,
            series: Some(1),
            index: Some(4),
            kind: IssueKind::SlowestValueOnUnsupported,
        };
        assert_eq!(
            issue.to_string(),
            "warning [series 1, sample 4]: NS sample uses 0.099 instead of 0.0"
        );
    }

    #[test]
    fn log_emits_one_event_per_issue() {
        let mut report = validate_config(1.0, 0);
        report.push(
            Severity::Warning,
            Some(0),
            Some(3),
            IssueKind::SlowestValueOnUnsupported,
        );

        let captured = Captured::default();
        let subscriber = tracing_subscriber::fmt()
            .with_writer(captured.clone())
            .with_ansi(false)
            .finish();
        tracing::subscriber::with_default(subscriber, || report.log("a_vs_b_compare.js"));

        let text = String::from_utf8(captured.0.lock().unwrap().clone()).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 2);
        assert!(lines[0].contains("ERROR"));
        assert!(lines[1].contains("WARN"));
        assert!(lines[1].contains("[series 0, sample 3]"));
        assert!(text.contains("a_vs_b_compare.js"));
    }
}
