//! Bar geometry for grouped bar charts.
//!
//! Benchmark `j` owns the unit interval starting at `j`. Inside it, bars for
//! each configuration sit side by side, the first one offset by a single bar
//! width, so the groups are separated by a gap of at least one bar.

use std::ops::Range;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BarLayout {
    num_benchmarks: usize,
    num_configs: usize,
    bar_width: f64,
}

impl BarLayout {
    pub fn new(num_benchmarks: usize, num_configs: usize, bar_width: f64) -> Self {
        Self {
            num_benchmarks,
            num_configs,
            bar_width,
        }
    }

    pub fn bar_width(&self) -> f64 {
        self.bar_width
    }

    /// Left edge of the bar for configuration `config` in benchmark group `bench`
    pub fn bar_left(&self, config: usize, bench: usize) -> f64 {
        bench as f64 + self.bar_width * (config + 1) as f64
    }

    /// `(left, right)` extent of a bar
    pub fn bar_span(&self, config: usize, bench: usize) -> (f64, f64) {
        let left = self.bar_left(config, bench);
        (left, left + self.bar_width)
    }

    /// Tick position centered under benchmark group `bench`
    pub fn tick(&self, bench: usize) -> f64 {
        let mid = self.num_configs as f64 / 2.0;
        bench as f64 + mid * self.bar_width + self.bar_width
    }

    pub fn ticks(&self) -> Vec<f64> {
        (0..self.num_benchmarks).map(|j| self.tick(j)).collect()
    }

    /// Visible x-axis: every group plus one bar width of padding on the right
    pub fn x_range(&self) -> Range<f64> {
        let last = self.num_benchmarks.saturating_sub(1) as f64;
        0.0..last + (self.num_configs + 2) as f64 * self.bar_width
    }

    /// Index of the benchmark whose tick lies within half a bar of `x`
    pub fn nearest_tick(&self, x: f64) -> Option<usize> {
        let tolerance = self.bar_width / 2.0;
        (0..self.num_benchmarks).find(|&j| (self.tick(j) - x).abs() <= tolerance)
    }
}
