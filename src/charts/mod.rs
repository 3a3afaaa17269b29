//! Charts module - draw-call config, renderer seam and compare scripts

pub mod config;
mod renderer;
pub mod script;

pub use config::{ChartConfig, Layout, Viewport};
pub use renderer::{DrawCall, JsonRenderer, RadarRenderer, RenderError, ScriptRenderer};
pub use script::{CompareScript, ScriptError};
