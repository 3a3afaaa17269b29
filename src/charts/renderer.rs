//! Radar Renderer Module
//! The draw-call seam towards an external radar-chart facility.
//!
//! Nothing here rasterizes. Implementations hand the call to something that
//! does: a JSON document for a host page, or a standalone script.

use crate::charts::config::ChartConfig;
use crate::data::Dataset;
use serde::{Deserialize, Serialize};
use std::io::Write;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum RenderError {
    #[error("Failed to write draw call: {0}")]
    Io(#[from] std::io::Error),
    #[error("Failed to encode draw call: {0}")]
    Json(#[from] serde_json::Error),
}

/// External radar-chart facility: `draw(target, data, config)`.
///
/// Expected to overlay one polygon per series on shared spokes, scaled so
/// `value == config.max_value` reaches the outer ring, with `config.levels`
/// rings and each sample's title shown for its vertex.
pub trait RadarRenderer {
    fn draw(&mut self, target: &str, data: &Dataset, config: &ChartConfig) -> Result<(), RenderError>;
}

impl<R: RadarRenderer + ?Sized> RadarRenderer for &mut R {
    fn draw(&mut self, target: &str, data: &Dataset, config: &ChartConfig) -> Result<(), RenderError> {
        (**self).draw(target, data, config)
    }
}

/// One complete draw call, as handed to the facility.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DrawCall {
    pub target: String,
    pub data: Dataset,
    pub config: ChartConfig,
}

/// Writes each draw call as a JSON document.
pub struct JsonRenderer<W: Write> {
    out: W,
    pretty: bool,
}

impl<W: Write> JsonRenderer<W> {
    pub fn new(out: W) -> Self {
        Self { out, pretty: false }
    }

    pub fn pretty(mut self, pretty: bool) -> Self {
        self.pretty = pretty;
        self
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}

impl<W: Write> RadarRenderer for JsonRenderer<W> {
    fn draw(&mut self, target: &str, data: &Dataset, config: &ChartConfig) -> Result<(), RenderError> {
        let call = DrawCall {
            target: target.to_string(),
            data: data.clone(),
            config: *config,
        };
        if self.pretty {
            serde_json::to_writer_pretty(&mut self.out, &call)?;
        } else {
            serde_json::to_writer(&mut self.out, &call)?;
        }
        writeln!(self.out)?;
        Ok(())
    }
}

/// Writes a standalone script invoking `RadarChart.draw` with literal arguments.
pub struct ScriptRenderer<W: Write> {
    out: W,
}

impl<W: Write> ScriptRenderer<W> {
    pub fn new(out: W) -> Self {
        Self { out }
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}

impl<W: Write> RadarRenderer for ScriptRenderer<W> {
    fn draw(&mut self, target: &str, data: &Dataset, config: &ChartConfig) -> Result<(), RenderError> {
        writeln!(self.out, "var data = {};", serde_json::to_string(data)?)?;
        writeln!(self.out, "var config = {};", serde_json::to_string(config)?)?;
        writeln!(
            self.out,
            "RadarChart.draw({}, data, config);",
            serde_json::to_string(target)?
        )?;
        Ok(())
    }
}
