//! CPS Charts - command line entry point
//!
//! Renders the report-card charts from the progress report CSV.

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use cps_charts::charts::ChartConfig;
use cps_charts::dataset::DEFAULT_DATA_FILE;
use cps_charts::{ChartKind, ChartReport};
use log::info;
use std::path::PathBuf;

#[derive(Debug, Clone, Copy, ValueEnum)]
enum ChartArg {
    /// Mean environment and safety score per school network
    Bar,
    /// Parent engagement, parent environment, AYP and policy level pies
    Pies,
    /// College enrollment rate against instruction score
    Scatter,
    /// All three charts from a single load
    All,
}

impl ChartArg {
    fn kinds(self) -> Vec<ChartKind> {
        match self {
            ChartArg::Bar => vec![ChartKind::Bar],
            ChartArg::Pies => vec![ChartKind::Pies],
            ChartArg::Scatter => vec![ChartKind::Scatter],
            ChartArg::All => ChartKind::ALL.to_vec(),
        }
    }
}

#[derive(Parser)]
#[command(name = "cps-charts")]
#[command(about = "Charts from the Chicago Public Schools progress report cards", long_about = None)]
struct Cli {
    /// Which chart to draw
    #[arg(value_enum, default_value_t = ChartArg::All)]
    chart: ChartArg,

    /// Progress report CSV
    #[arg(short, long, default_value = DEFAULT_DATA_FILE)]
    data: PathBuf,

    /// Directory the PNG files are written to
    #[arg(short, long, default_value = "charts")]
    output_dir: PathBuf,

    /// JSON file overriding chart sizes, titles and palettes
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Also write each chart's aggregated numbers as CSV
    #[arg(long)]
    export_summary: bool,
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => ChartConfig::from_json_file(path)
            .with_context(|| format!("loading chart config {}", path.display()))?,
        None => ChartConfig::default(),
    };

    let report = ChartReport::new(config, &cli.output_dir).with_summary_export(cli.export_summary);
    let written = report
        .run(&cli.data, &cli.chart.kinds())
        .with_context(|| format!("rendering charts from {}", cli.data.display()))?;

    for path in written {
        info!("Chart ready: {}", path.display());
    }
    Ok(())
}
