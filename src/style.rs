use crate::error::{ChartError, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Visual configuration for a chart.
///
/// Sizes are in points. The figure is rendered at one pixel per point, so a
/// PDF page comes out at the physical size given by `fig_width_in` and
/// `aspect_ratio`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ChartStyle {
    /// Figure width in inches
    pub fig_width_in: f64,
    /// Height as a fraction of the width
    pub aspect_ratio: f64,
    pub points_per_inch: f64,
    pub font_family: String,
    pub font_size: f64,
    pub legend_font_size: f64,
    /// Width of one bar in axis units, where one benchmark group spans 1.0
    pub bar_width: f64,
    /// Fixed top of the y-axis, or `None` to fit the data
    pub y_max: Option<f64>,
    /// Height of the horizontal reference line, if any
    pub baseline: Option<f64>,
    pub baseline_width: f64,
    pub x_desc: String,
    pub y_desc: String,
    /// Legend columns, `None` for one per configuration
    pub legend_columns: Option<usize>,
    /// Horizontal grid lines
    pub y_grid: bool,
}

impl ChartStyle {
    /// Load style overrides from a JSON document; missing fields keep their
    /// defaults.
    pub fn load(path: &Path) -> Result<Self> {
        let json = std::fs::read_to_string(path).map_err(|source| ChartError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        serde_json::from_str(&json).map_err(|source| ChartError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Figure `(width, height)` in points
    pub fn figure_size(&self) -> (f64, f64) {
        let width = self.fig_width_in * self.points_per_inch;
        (width, width * self.aspect_ratio)
    }

    /// Figure size rounded to whole pixels for the drawing backend
    pub fn pixel_size(&self) -> (u32, u32) {
        let (width, height) = self.figure_size();
        (width.round().max(1.0) as u32, height.round().max(1.0) as u32)
    }

    /// Top of the y-axis for a data set whose largest value is `max_value`
    pub fn y_limit(&self, max_value: f64) -> f64 {
        match self.y_max {
            Some(y_max) => y_max,
            None if max_value > 0.0 => max_value * 1.05,
            None => 1.0,
        }
    }

    /// Switch to a speedup plot. The built-in seconds scale and axis title no
    /// longer apply and are replaced; values set by a style file are kept.
    pub fn for_speedup(&mut self) {
        let defaults = ChartStyle::default();
        if self.y_max == defaults.y_max {
            self.y_max = None;
        }
        if self.y_desc == defaults.y_desc {
            self.y_desc = "Speedup".to_string();
        }
    }
}

impl Default for ChartStyle {
    fn default() -> Self {
        Self {
            fig_width_in: 6.5,
            aspect_ratio: 0.70,
            points_per_inch: 72.0,
            font_family: "serif".to_string(),
            font_size: 16.0,
            legend_font_size: 12.0,
            bar_width: 0.10,
            y_max: Some(930.0),
            baseline: Some(1.0),
            baseline_width: 1.5,
            x_desc: "Run Type".to_string(),
            y_desc: "Total Execution Time in Seconds".to_string(),
            legend_columns: None,
            y_grid: true,
        }
    }
}
