use crate::data::ResultSet;
use crate::error::{ChartError, Result};
use crate::layout::BarLayout;
use crate::output::{write_atomic, OutputFormat};
use crate::palette::Palette;
use crate::style::ChartStyle;
use plotters::coord::combinators::BindKeyPoints;
use plotters::coord::Shift;
use plotters::prelude::*;
use plotters::style::text_anchor::{HPos, Pos, VPos};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use svg2pdf::usvg;
use svg2pdf::usvg::fontdb;
use tracing::{debug, info};

// Layout tuning, in points
const MARGIN: u32 = 6;
const LEGEND_ROW_SPACING: f64 = 1.6;
const LEGEND_SWATCH_GAP: i32 = 4;

/// One bar of the chart in axis coordinates
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bar {
    pub config: usize,
    pub benchmark: usize,
    pub left: f64,
    pub right: f64,
    pub height: f64,
    pub color: RGBColor,
}

/// What a call to [`render`] produced
#[derive(Debug, Clone)]
pub struct RenderSummary {
    pub path: PathBuf,
    pub format: OutputFormat,
    pub bytes: usize,
}

/// Everything needed to draw one chart.
///
/// Creating a context validates the inputs, so a context that exists can
/// always be drawn.
#[derive(Debug)]
pub struct ChartContext<'a> {
    data: &'a ResultSet,
    colors: &'a [RGBColor],
    style: &'a ChartStyle,
    layout: BarLayout,
    y_limit: f64,
}

impl<'a> ChartContext<'a> {
    pub fn new(data: &'a ResultSet, palette: &'a Palette, style: &'a ChartStyle) -> Result<Self> {
        data.validate()?;
        palette.check(data.num_configs())?;
        validate_style(style)?;

        let layout = BarLayout::new(data.num_benchmarks(), data.num_configs(), style.bar_width);
        let y_limit = style.y_limit(data.max_value());
        if !(y_limit.is_finite() && y_limit > 0.0) {
            return Err(ChartError::InvalidStyle(format!(
                "y-axis maximum must be positive, got {}",
                y_limit
            )));
        }

        debug!(
            benchmarks = data.num_benchmarks(),
            configs = data.num_configs(),
            y_limit,
            "chart context ready"
        );

        Ok(Self {
            data,
            colors: &palette.colors()[..data.num_configs()],
            style,
            layout,
            y_limit,
        })
    }

    pub fn layout(&self) -> &BarLayout {
        &self.layout
    }

    pub fn y_limit(&self) -> f64 {
        self.y_limit
    }

    /// Benchmark labels with their tick positions
    pub fn ticks(&self) -> Vec<(f64, &str)> {
        self.data
            .benchmarks
            .iter()
            .enumerate()
            .map(|(j, name)| (self.layout.tick(j), name.as_str()))
            .collect()
    }

    /// Endpoints of the horizontal reference line across the full x range,
    /// or `None` when it is disabled or falls outside the y-axis.
    pub fn baseline(&self) -> Option<((f64, f64), (f64, f64))> {
        let y = self
            .style
            .baseline
            .filter(|&y| y >= 0.0 && y <= self.y_limit)?;
        let x = self.layout.x_range();
        Some(((x.start, y), (x.end, y)))
    }

    /// Legend entries in configuration order
    pub fn legend_entries(&self) -> Vec<(&str, RGBColor)> {
        self.data
            .configs
            .iter()
            .zip(self.colors)
            .map(|(name, &color)| (name.as_str(), color))
            .collect()
    }

    /// All bars, configuration-major. Heights are clipped to the y-axis.
    pub fn bars(&self) -> Vec<Bar> {
        let mut bars = Vec::with_capacity(self.data.num_configs() * self.data.num_benchmarks());
        for (config, (row, &color)) in self.data.results.iter().zip(self.colors).enumerate() {
            for (benchmark, &value) in row.iter().enumerate() {
                let (left, right) = self.layout.bar_span(config, benchmark);
                bars.push(Bar {
                    config,
                    benchmark,
                    left,
                    right,
                    height: value.min(self.y_limit),
                    color,
                });
            }
        }
        bars
    }

    fn columns(&self) -> usize {
        self.style
            .legend_columns
            .unwrap_or(self.colors.len())
            .clamp(1, self.colors.len().max(1))
    }

    fn legend_height(&self) -> u32 {
        let rows = self.colors.len().div_ceil(self.columns());
        (rows as f64 * self.style.legend_font_size * LEGEND_ROW_SPACING).ceil() as u32 + MARGIN
    }

    // Room for tick labels plus the rotated axis title
    fn y_label_area(&self) -> u32 {
        let digits = format!("{:.0}", self.y_limit).len().max(3) as f64;
        (self.style.font_size * (digits * 0.6 + 1.8)).ceil() as u32
    }

    fn x_label_area(&self) -> u32 {
        (self.style.font_size * 2.8).ceil() as u32
    }

    /// Draw the chart onto any plotters drawing area
    pub fn draw_on<DB: DrawingBackend>(&self, root: &DrawingArea<DB, Shift>) -> Result<()> {
        root.fill(&WHITE).map_err(drawing_err)?;

        let (legend_area, plot_area) = root.split_vertically(self.legend_height());
        self.draw_legend(&legend_area)?;

        let family = self.style.font_family.as_str();

        let mut chart = ChartBuilder::on(&plot_area)
            .margin_right(MARGIN)
            .margin_top(MARGIN)
            .x_label_area_size(self.x_label_area())
            .y_label_area_size(self.y_label_area())
            .build_cartesian_2d(
                self.layout.x_range().with_key_points(self.layout.ticks()),
                0.0..self.y_limit,
            )
            .map_err(drawing_err)?;

        let benchmarks = &self.data.benchmarks;
        let layout = &self.layout;
        let benchmark_label = |x: &f64| {
            layout
                .nearest_tick(*x)
                .and_then(|j| benchmarks.get(j))
                .cloned()
                .unwrap_or_default()
        };

        let mut mesh = chart.configure_mesh();
        mesh.disable_x_mesh()
            .x_labels(benchmarks.len())
            .x_label_formatter(&benchmark_label)
            .y_labels(6)
            .x_desc(self.style.x_desc.as_str())
            .y_desc(self.style.y_desc.as_str())
            .axis_style(BLACK.stroke_width(1))
            .bold_line_style(BLACK.mix(0.2).stroke_width(1))
            .light_line_style(TRANSPARENT.stroke_width(0))
            .label_style((family, self.style.font_size))
            .axis_desc_style((family, self.style.font_size));
        if !self.style.y_grid {
            mesh.disable_y_mesh();
        }
        mesh.draw().map_err(drawing_err)?;

        let bars = self.bars();
        chart
            .draw_series(bars.iter().map(|bar| {
                Rectangle::new([(bar.left, 0.0), (bar.right, bar.height)], bar.color.filled())
            }))
            .map_err(drawing_err)?;
        // Bar edges
        chart
            .draw_series(bars.iter().map(|bar| {
                Rectangle::new([(bar.left, 0.0), (bar.right, bar.height)], BLACK.stroke_width(1))
            }))
            .map_err(drawing_err)?;

        if let Some((start, end)) = self.baseline() {
            let width = self.style.baseline_width.round().max(1.0) as u32;
            chart
                .draw_series(LineSeries::new(vec![start, end], BLACK.stroke_width(width)))
                .map_err(drawing_err)?;
        }

        Ok(())
    }

    // Frameless legend above the plot, laid out in rows of `columns` entries
    fn draw_legend<DB: DrawingBackend>(&self, area: &DrawingArea<DB, Shift>) -> Result<()> {
        let (width, _) = area.dim_in_pixel();
        let left = self.y_label_area() as i32;
        let usable = (width as i32 - left - MARGIN as i32).max(1);
        let columns = self.columns();
        let column_width = usable / columns as i32;

        let font_size = self.style.legend_font_size;
        let row_height = (font_size * LEGEND_ROW_SPACING).round() as i32;
        let swatch_width = (font_size * 1.6).round() as i32;
        let swatch_half = (font_size * 0.4).round() as i32;
        let text_style = (self.style.font_family.as_str(), font_size)
            .into_font()
            .color(&BLACK)
            .pos(Pos::new(HPos::Left, VPos::Center));

        for (idx, (label, color)) in self.legend_entries().into_iter().enumerate() {
            let x = left + (idx % columns) as i32 * column_width;
            let y = MARGIN as i32 + (idx / columns) as i32 * row_height + row_height / 2;

            area.draw(&Rectangle::new(
                [(x, y - swatch_half), (x + swatch_width, y + swatch_half)],
                color.filled(),
            ))
            .map_err(drawing_err)?;
            area.draw(&Rectangle::new(
                [(x, y - swatch_half), (x + swatch_width, y + swatch_half)],
                BLACK.stroke_width(1),
            ))
            .map_err(drawing_err)?;
            area.draw(&Text::new(
                label.to_string(),
                (x + swatch_width + LEGEND_SWATCH_GAP, y),
                text_style.clone(),
            ))
            .map_err(drawing_err)?;
        }

        Ok(())
    }

    /// Render the chart as an SVG document
    pub fn draw_svg(&self) -> Result<String> {
        let mut svg = String::new();
        {
            let root =
                SVGBackend::with_string(&mut svg, self.style.pixel_size()).into_drawing_area();
            self.draw_on(&root)?;
            root.present().map_err(drawing_err)?;
        }
        debug!(bytes = svg.len(), "drew SVG");
        Ok(svg)
    }

    /// Convert an SVG document drawn by this context into a single-page PDF
    pub fn to_pdf(&self, svg: &str) -> Result<Vec<u8>> {
        let mut options = usvg::Options::default();
        options.fontdb = Arc::new(font_database());

        let tree =
            usvg::Tree::from_str(svg, &options).map_err(|e| ChartError::Pdf(e.to_string()))?;
        let pdf = svg2pdf::to_pdf(
            &tree,
            svg2pdf::ConversionOptions::default(),
            svg2pdf::PageOptions::default(),
        )
        .map_err(|e| ChartError::Pdf(format!("{:?}", e)))?;

        debug!(bytes = pdf.len(), "converted to PDF");
        Ok(pdf)
    }
}

/// Render `data` as a grouped bar chart and write it to `output`.
///
/// Inputs are validated before anything is written; on error an existing
/// file at `output` is left untouched.
pub fn render(
    data: &ResultSet,
    palette: &Palette,
    style: &ChartStyle,
    output: &Path,
) -> Result<RenderSummary> {
    let context = ChartContext::new(data, palette, style)?;
    let format = OutputFormat::from_path(output);

    let svg = context.draw_svg()?;
    let bytes = match format {
        OutputFormat::Svg => svg.into_bytes(),
        OutputFormat::Pdf => context.to_pdf(&svg)?,
    };

    write_atomic(output, &bytes)?;
    info!(path = %output.display(), format = format.name(), bytes = bytes.len(), "chart written");

    Ok(RenderSummary {
        path: output.to_path_buf(),
        format,
        bytes: bytes.len(),
    })
}

fn validate_style(style: &ChartStyle) -> Result<()> {
    let positive = [
        ("bar width", style.bar_width),
        ("figure width", style.fig_width_in),
        ("aspect ratio", style.aspect_ratio),
        ("points per inch", style.points_per_inch),
        ("font size", style.font_size),
        ("legend font size", style.legend_font_size),
        ("baseline width", style.baseline_width),
    ];
    for (name, value) in positive {
        if !(value.is_finite() && value > 0.0) {
            return Err(ChartError::InvalidStyle(format!(
                "{} must be positive, got {}",
                name, value
            )));
        }
    }
    if style.legend_columns == Some(0) {
        return Err(ChartError::InvalidStyle(
            "legend needs at least one column".to_string(),
        ));
    }
    Ok(())
}

// System fonts, with the generic families pointed at whatever is installed
// when the usual defaults are missing.
fn font_database() -> fontdb::Database {
    let mut db = fontdb::Database::new();
    db.load_system_fonts();

    let fallback = db
        .faces()
        .find_map(|face| face.families.first().map(|(name, _)| name.clone()));
    if let Some(name) = fallback {
        for serif in [true, false] {
            let family = if serif {
                fontdb::Family::Serif
            } else {
                fontdb::Family::SansSerif
            };
            let query = fontdb::Query {
                families: &[family],
                ..fontdb::Query::default()
            };
            if db.query(&query).is_some() {
                continue;
            }
            if serif {
                db.set_serif_family(name.clone());
            } else {
                db.set_sans_serif_family(name.clone());
            }
        }
    }

    debug!(faces = db.len(), "loaded fonts");
    db
}

fn drawing_err<E: std::fmt::Display>(e: E) -> ChartError {
    ChartError::Drawing(e.to_string())
}
