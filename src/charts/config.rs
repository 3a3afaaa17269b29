//! Chart Configuration Module
//! Draw-call configuration and the host layout it is derived from.

use serde::{Deserialize, Serialize};

/// Default mount point of the chart.
pub const DEFAULT_TARGET: &str = "#chart";
/// Page header height subtracted from the window height.
pub const DEFAULT_HEADER_OFFSET: u32 = 70;
/// Margin subtracted from both chart dimensions.
pub const DEFAULT_INSET: u32 = 175;
pub const DEFAULT_MAX_VALUE: f64 = 1.0;
pub const DEFAULT_LEVELS: u32 = 10;

/// Size of the drawable region, supplied by the host at draw time.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Viewport {
    /// Pixel width of the mount element.
    pub chart_width: f64,
    /// Inner height of the window.
    pub inner_height: f64,
}

impl Viewport {
    pub fn new(chart_width: f64, inner_height: f64) -> Self {
        Self {
            chart_width,
            inner_height,
        }
    }
}

impl Default for Viewport {
    fn default() -> Self {
        Self::new(1280.0, 900.0)
    }
}

/// How chart dimensions follow the viewport.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Layout {
    pub header_offset: u32,
    pub width_inset: u32,
    pub height_inset: u32,
}

impl Default for Layout {
    fn default() -> Self {
        Self {
            header_offset: DEFAULT_HEADER_OFFSET,
            width_inset: DEFAULT_INSET,
            height_inset: DEFAULT_INSET,
        }
    }
}

impl Layout {
    /// Resolve chart dimensions; negative sizes clamp to 0.
    pub fn resolve(&self, viewport: &Viewport) -> (f64, f64) {
        let w = viewport.chart_width - f64::from(self.width_inset);
        let h = viewport.inner_height
            - f64::from(self.header_offset)
            - f64::from(self.height_inset);
        (w.max(0.0), h.max(0.0))
    }
}

/// The `config` argument of `draw(target, data, config)`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChartConfig {
    pub w: f64,
    pub h: f64,
    /// Value reaching the outer ring.
    pub max_value: f64,
    /// Number of concentric rings.
    pub levels: u32,
}

impl ChartConfig {
    pub fn resolve(layout: &Layout, viewport: &Viewport, max_value: f64, levels: u32) -> Self {
        let (w, h) = layout.resolve(viewport);
        Self {
            w,
            h,
            max_value,
            levels,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dimensions_follow_viewport() {
        let cfg = ChartConfig::resolve(
            &Layout::default(),
            &Viewport::new(1000.0, 800.0),
            DEFAULT_MAX_VALUE,
            DEFAULT_LEVELS,
        );
        assert_eq!(cfg.w, 825.0);
        assert_eq!(cfg.h, 555.0);
        assert_eq!(cfg.levels, 10);
    }

    #[test]
    fn tiny_viewport_clamps_to_zero() {
        let (w, h) = Layout::default().resolve(&Viewport::new(100.0, 200.0));
        assert_eq!((w, h), (0.0, 0.0));
    }

    #[test]
    fn config_uses_renderer_field_names() {
        let cfg = ChartConfig {
            w: 1.0,
            h: 2.0,
            max_value: 1.0,
            levels: 10,
        };
        let json = serde_json::to_string(&cfg).unwrap();
        assert_eq!(json, r#"{"w":1.0,"h":2.0,"maxValue":1.0,"levels":10}"#);
    }
}
