use anyhow::{Context, Result};
use bench_chart::chart::render;
use bench_chart::data::{print_results, ResultSet};
use bench_chart::output::default_output_path;
use bench_chart::palette::Palette;
use bench_chart::style::ChartStyle;
use clap::Parser;
use std::path::PathBuf;
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "bench-chart")]
#[command(about = "Render a grouped bar chart of benchmark execution times")]
struct Cli {
    /// JSON result set to plot instead of the built-in one
    #[arg(short, long)]
    data: Option<PathBuf>,

    /// Output file, `.svg` or `.pdf` (defaults to `<program name>.pdf`)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// JSON style overrides
    #[arg(short, long)]
    style: Option<PathBuf>,

    /// Comma-separated bar colors, one per configuration
    #[arg(long, value_delimiter = ',')]
    colors: Option<Vec<String>>,

    /// Fixed top of the y-axis
    #[arg(long, conflicts_with = "auto_y")]
    y_max: Option<f64>,

    /// Fit the y-axis to the data
    #[arg(long)]
    auto_y: bool,

    /// Plot speedup relative to the first configuration
    #[arg(long)]
    normalize: bool,

    /// Enable verbose logging
    #[arg(short, long, default_value = "false")]
    verbose: bool,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let mut data = match &cli.data {
        Some(path) => ResultSet::load(path)?,
        None => ResultSet::builtin(),
    };

    let mut style = match &cli.style {
        Some(path) => ChartStyle::load(path)?,
        None => ChartStyle::default(),
    };

    let palette = match &cli.colors {
        Some(colors) => Palette::parse(colors)?,
        None => Palette::builtin(),
    };

    if cli.normalize {
        data = data
            .normalized()
            .context("Failed to normalize results")?;
        style.for_speedup();
    }
    if let Some(y_max) = cli.y_max {
        style.y_max = Some(y_max);
    }
    if cli.auto_y {
        style.y_max = None;
    }

    let output = cli
        .output
        .unwrap_or_else(|| default_output_path(std::env::args_os().next().as_deref()));
    debug!(output = %output.display(), ?style, "configuration");

    print_results(&data);

    info!("Rendering chart...");
    let summary = render(&data, &palette, &style, &output)
        .with_context(|| format!("Failed to render {}", output.display()))?;

    println!(
        "Generated: {} ({}, {} bytes)",
        summary.path.display(),
        summary.format.name(),
        summary.bytes
    );
    Ok(())
}

fn init_logging(verbose: bool) {
    let default_level = if verbose { "debug" } else { "warn" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}
