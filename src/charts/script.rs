//! Compare Script Codec
//! Reads and writes the `<A>_vs_<B>_compare.js` data files.
//!
//! A file declares the viewport-derived sizes, a two-series `data` literal,
//! a `config` literal and one `RadarChart.draw` call. Both the multi-line
//! double-quoted layout and the single-line single-quoted layout are read;
//! writing always produces the multi-line layout.

use crate::charts::config::{
    ChartConfig, Layout, Viewport, DEFAULT_LEVELS, DEFAULT_MAX_VALUE, DEFAULT_TARGET,
};
use crate::charts::renderer::{RadarRenderer, RenderError};
use crate::data::sample::UNSUPPORTED_VALUE;
use crate::data::{
    validate_config, validate_dataset, Dataset, MetricSample, Report, Series, ValidationRules,
};
use crate::stats::normalize::round_to;
use regex::{Captures, Regex};
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::LazyLock;
use thiserror::Error;
use tracing::debug;

pub const SCRIPT_SUFFIX: &str = "_compare.js";
pub const JSON_SUFFIX: &str = "_compare.json";
const PAIR_SEPARATOR: &str = "_vs_";

#[derive(Error, Debug)]
pub enum ScriptError {
    #[error("Failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("Failed to write {path}: {source}")]
    Write {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("Missing `{0}` declaration")]
    Missing(&'static str),
    #[error("Line {line}: {message}")]
    Syntax { line: usize, message: String },
    #[error("Expected 2 series in data, found {0}")]
    SeriesCount(usize),
    #[error("Invalid config entry `{key}: {value}`")]
    Config { key: String, value: String },
    #[error("Series {series}, sample {index}: value {value} cannot be written")]
    NonFinite {
        series: usize,
        index: usize,
        value: f64,
    },
}

static HEADER_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"window\.innerHeight\s*(?:-\s*(\d+))?").expect("valid header regex")
});

static DRAW_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"RadarChart\.draw\(\s*(?:"((?:[^"\\]|\\.)*)"|'((?:[^'\\]|\\.)*)')\s*,"#)
        .expect("valid draw regex")
});

static DATA_START_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"var\s+data\s*=\s*\[").expect("valid data regex"));

static CONFIG_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"var\s+config\s*=\s*\{([^}]*)\}").expect("valid config regex"));

static DIMENSION_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^([wh])\s*(?:-\s*(\d+))?$").expect("valid dimension regex"));

static TOKEN_RE: LazyLock<Regex> = LazyLock::new(|| {
    let string = r#""(?:[^"\\]|\\.)*"|'(?:[^'\\]|\\.)*'"#;
    let number = r"[-+]?(?:\d+\.?\d*|\.\d+)(?:[eE][-+]?\d+)?";
    Regex::new(&format!(
        r"(?P<open>\[)|(?P<close>\])|(?P<rec>\{{\s*axis\s*:\s*(?P<axis>{string})\s*,\s*value\s*:\s*(?P<value>{number})\s*,\s*title\s*:\s*(?P<title>{string})\s*,?\s*\}})|(?P<other>[^\s,])"
    ))
    .expect("valid token regex")
});

/// One compare data file.
#[derive(Debug, Clone, PartialEq)]
pub struct CompareScript {
    /// Product names taken from the file name, when known.
    pub products: Option<(String, String)>,
    pub target: String,
    pub layout: Layout,
    pub data: Dataset,
    pub max_value: f64,
    /// Kept signed so that invalid files still load and can be reported.
    pub levels: i64,
}

impl CompareScript {
    pub fn new(data: Dataset) -> Self {
        Self {
            products: None,
            target: DEFAULT_TARGET.to_string(),
            layout: Layout::default(),
            data,
            max_value: DEFAULT_MAX_VALUE,
            levels: i64::from(DEFAULT_LEVELS),
        }
    }

    pub fn with_products(mut self, first: impl Into<String>, second: impl Into<String>) -> Self {
        self.products = Some((first.into(), second.into()));
        self
    }

    /// Read a script file; product names come from its name.
    pub fn read(path: &Path) -> Result<Self, ScriptError> {
        let text = fs::read_to_string(path).map_err(|source| ScriptError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let mut script = Self::parse(&text)?;
        script.products = products_from_path(path);
        debug!(
            path = %path.display(),
            samples = script.data.first().len(),
            "parsed compare script"
        );
        Ok(script)
    }

    /// Write the script to `path`.
    pub fn write(&self, path: &Path) -> Result<(), ScriptError> {
        self.check_finite()?;
        fs::write(path, self.encode()).map_err(|source| ScriptError::Write {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Parse script text.
    pub fn parse(text: &str) -> Result<Self, ScriptError> {
        let target = DRAW_RE
            .captures(text)
            .map(|c| unescape(quoted_group(&c)))
            .ok_or(ScriptError::Missing("RadarChart.draw"))?;

        let header_offset = match HEADER_RE.captures(text) {
            Some(c) => match c.get(1) {
                Some(m) => parse_u32("h", m.as_str())?,
                None => 0,
            },
            None => return Err(ScriptError::Missing("window.innerHeight")),
        };

        let data = parse_data(text)?;

        let body = CONFIG_RE
            .captures(text)
            .and_then(|c| c.get(1))
            .ok_or(ScriptError::Missing("config"))?
            .as_str();
        let config = parse_config(body)?;

        Ok(Self {
            products: None,
            target,
            layout: Layout {
                header_offset,
                width_inset: config.width_inset,
                height_inset: config.height_inset,
            },
            data,
            max_value: config.max_value,
            levels: config.levels,
        })
    }

    /// Every value must be finite to survive the text layout.
    pub fn check_finite(&self) -> Result<(), ScriptError> {
        for (series, samples) in self.data.series.iter().enumerate() {
            if let Some((index, sample)) = samples.iter().enumerate().find(|(_, s)| !s.value.is_finite()) {
                return Err(ScriptError::NonFinite {
                    series,
                    index,
                    value: sample.value,
                });
            }
        }
        Ok(())
    }

    /// Encode to the published multi-line layout. Values are assumed finite;
    /// `write` checks that first.
    pub fn encode(&self) -> String {
        let mut out = String::new();
        let element = self.target.trim_start_matches('#');
        out.push_str(&format!(
            "var w = document.getElementById('{}').offsetWidth,\n",
            escape(element, '\'')
        ));
        out.push_str(&format!(
            "    h = window.innerHeight -{};\n",
            self.layout.header_offset
        ));
        out.push_str("var colorscale = d3.scale.category10();\n");
        out.push_str("var data = [\n");
        for series in &self.data.series {
            out.push_str("[\n");
            for sample in series.iter() {
                out.push_str(&format!(
                    "{{axis:\"{}\",value:{},title:\"{}\"}},\n",
                    escape(&sample.axis, '"'),
                    format_value(sample.value),
                    escape(&sample.title, '"')
                ));
            }
            out.push_str("],\n");
        }
        out.push_str("];\n\n");
        out.push_str(&format!("var config = {{ w: w-{},\n", self.layout.width_inset));
        out.push_str(&format!(" h: h-{},\n", self.layout.height_inset));
        out.push_str(&format!(" maxValue: {:?},\n", self.max_value));
        out.push_str(&format!(" levels: {},\n", self.levels));
        out.push_str(" }\n\n");
        out.push_str(&format!(
            "RadarChart.draw(\"{}\", data, config);",
            escape(&self.target, '"')
        ));
        out
    }

    /// Resolve the draw-call config for a viewport.
    pub fn chart_config(&self, viewport: &Viewport) -> ChartConfig {
        let levels = u32::try_from(self.levels.max(0)).unwrap_or(u32::MAX);
        ChartConfig::resolve(&self.layout, viewport, self.max_value, levels)
    }

    /// Hand the dataset to a renderer, with sizes taken from `viewport`.
    pub fn render<R: RadarRenderer>(&self, viewport: &Viewport, mut renderer: R) -> Result<(), RenderError> {
        renderer.draw(&self.target, &self.data, &self.chart_config(viewport))
    }

    /// Dataset and config checks together.
    pub fn validate(&self, rules: &ValidationRules) -> Report {
        let mut report = validate_config(self.max_value, self.levels);
        report.issues.extend(validate_dataset(&self.data, rules).issues);
        report
    }
}

/// File name of the compare file for products `a` and `b`.
pub fn pair_file_name(a: &str, b: &str, suffix: &str) -> String {
    format!("{a}{PAIR_SEPARATOR}{b}{suffix}")
}

/// Product names encoded in a compare file name.
pub fn products_from_path(path: &Path) -> Option<(String, String)> {
    let name = path.file_name()?.to_str()?;
    let stem = name
        .strip_suffix(SCRIPT_SUFFIX)
        .or_else(|| name.strip_suffix(JSON_SUFFIX))?;
    let (a, b) = stem.split_once(PAIR_SEPARATOR)?;
    Some((a.to_string(), b.to_string()))
}

/// `0.0` for unsupported, three decimals otherwise.
/// Three decimals when that is exact, shortest form otherwise.
fn format_value(value: f64) -> String {
    if value == UNSUPPORTED_VALUE {
        "0.0".to_string()
    } else if round_to(value, 3) == value {
        format!("{value:.3}")
    } else {
        format!("{value:?}")
    }
}

fn escape(text: &str, quote: char) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        if c == quote || c == '\\' {
            out.push('\\');
        }
        out.push(c);
    }
    out
}

fn unescape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut chars = text.chars();
    while let Some(c) = chars.next() {
        if c == '\\' {
            if let Some(next) = chars.next() {
                out.push(next);
            }
        } else {
            out.push(c);
        }
    }
    out
}

/// Contents of the first matching quoted group (double or single).
fn quoted_group<'t>(caps: &Captures<'t>) -> &'t str {
    caps.get(1)
        .or_else(|| caps.get(2))
        .map(|m| m.as_str())
        .unwrap_or_default()
}

/// Strip the surrounding quotes of a string token and unescape it.
fn string_literal(token: &str) -> String {
    unescape(&token[1..token.len() - 1])
}

fn line_of(text: &str, offset: usize) -> usize {
    text[..offset].matches('\n').count() + 1
}

fn parse_u32(key: &str, value: &str) -> Result<u32, ScriptError> {
    value.trim().parse().map_err(|_| ScriptError::Config {
        key: key.to_string(),
        value: value.trim().to_string(),
    })
}

fn parse_data(text: &str) -> Result<Dataset, ScriptError> {
    let start = DATA_START_RE
        .find(text)
        .ok_or(ScriptError::Missing("data"))?;
    // Scan from the opening bracket of the outer array.
    let from = start.end() - 1;

    let mut depth = 0usize;
    let mut series: Vec<Series> = Vec::new();
    let mut current: Vec<MetricSample> = Vec::new();
    let mut closed = false;

    for caps in TOKEN_RE.captures_iter(&text[from..]) {
        let Some(whole) = caps.get(0) else { continue };
        let offset = from + whole.start();
        let syntax = |message: String| ScriptError::Syntax {
            line: line_of(text, offset),
            message,
        };

        if caps.name("open").is_some() {
            depth += 1;
            if depth > 2 {
                return Err(syntax("data nested deeper than two arrays".into()));
            }
        } else if caps.name("close").is_some() {
            if depth == 2 {
                series.push(Series::new(std::mem::take(&mut current)));
            }
            depth -= 1;
            if depth == 0 {
                closed = true;
                break;
            }
        } else if caps.name("rec").is_some() {
            if depth != 2 {
                return Err(syntax("sample outside of a series".into()));
            }
            let axis = string_literal(&caps["axis"]);
            let title = string_literal(&caps["title"]);
            let value: f64 = caps["value"]
                .parse()
                .map_err(|_| syntax(format!("bad value `{}`", &caps["value"])))?;
            current.push(MetricSample::new(axis, value, title));
        } else {
            let snippet: String = text[offset..].chars().take(24).collect();
            return Err(syntax(format!("unexpected `{}`", snippet.trim_end())));
        }
    }

    if !closed {
        return Err(ScriptError::Syntax {
            line: line_of(text, text.len()),
            message: "unterminated data array".into(),
        });
    }

    match <[Series; 2]>::try_from(series) {
        Ok([first, second]) => Ok(Dataset::new(first, second)),
        Err(series) => Err(ScriptError::SeriesCount(series.len())),
    }
}

struct ConfigFields {
    width_inset: u32,
    height_inset: u32,
    max_value: f64,
    levels: i64,
}

fn parse_config(body: &str) -> Result<ConfigFields, ScriptError> {
    let mut fields = ConfigFields {
        width_inset: 0,
        height_inset: 0,
        max_value: DEFAULT_MAX_VALUE,
        levels: i64::from(DEFAULT_LEVELS),
    };

    for entry in body.split(',') {
        let entry = entry.trim();
        if entry.is_empty() {
            continue;
        }
        let Some((key, value)) = entry.split_once(':') else {
            return Err(ScriptError::Config {
                key: entry.to_string(),
                value: String::new(),
            });
        };
        let (key, value) = (key.trim(), value.trim());
        let invalid = || ScriptError::Config {
            key: key.to_string(),
            value: value.to_string(),
        };

        match key {
            "w" | "h" => {
                let caps = DIMENSION_RE.captures(value).ok_or_else(invalid)?;
                if &caps[1] != key {
                    return Err(invalid());
                }
                let inset = match caps.get(2) {
                    Some(m) => m.as_str().parse().map_err(|_| invalid())?,
                    None => 0,
                };
                if key == "w" {
                    fields.width_inset = inset;
                } else {
                    fields.height_inset = inset;
                }
            }
            "maxValue" => fields.max_value = value.parse().map_err(|_| invalid())?,
            "levels" => fields.levels = value.parse().map_err(|_| invalid())?,
            _ => debug!(key, value, "ignoring unknown config entry"),
        }
    }

    Ok(fields)
}
