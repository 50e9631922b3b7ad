//! tabplot - draw statistical charts from a CSV file
//!
//! Loads the CSV with Polars and drives [`ChartPlotter`]. Charts are written
//! to the output directory with `--save`; otherwise `chart` and `heatmap`
//! print their SVG to stdout. `--show` opens them in the system viewer.

use anyhow::Context;
use clap::{Args, Parser, Subcommand};
use log::{info, warn, LevelFilter};
use simplelog::{ColorChoice, Config, TermLogger, TerminalMode};
use std::path::{Path, PathBuf};
use tabplot::charts::DEFAULT_SAMPLE;
use tabplot::data::DataLoader;
use tabplot::{ChartKind, ChartPlotter, ChartRequest, Figure, PlotterConfig};

#[derive(Parser, Debug)]
#[command(name = "tabplot", version, about = "Statistical charts from CSV tables")]
struct Cli {
    #[command(flatten)]
    output: OutputArgs,

    /// Log debug output to stderr
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Args, Debug)]
struct OutputArgs {
    /// Write every chart to the output directory
    #[arg(long, global = true)]
    save: bool,

    /// Output directory
    #[arg(long, global = true)]
    path: Option<PathBuf>,

    /// Output format: svg, png, jpg, ...
    #[arg(long, global = true)]
    format: Option<String>,

    /// JSON config file; flags override its values
    #[arg(long, global = true)]
    config: Option<PathBuf>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Draw one chart
    Chart {
        /// Chart kind, e.g. box, violin, scatter, lm
        kind: ChartKind,
        csv: PathBuf,
        #[arg(short)]
        x: Option<String>,
        #[arg(short)]
        y: Option<String>,
        #[arg(long)]
        title: Option<String>,
        /// Open the chart in the system viewer
        #[arg(long)]
        show: bool,
    },
    /// Linear-model chart of LABEL against every other numeric column
    Regression {
        csv: PathBuf,
        #[arg(long)]
        label: String,
    },
    /// Count chart per column
    Unique { csv: PathBuf },
    /// Box chart per column
    Outliers { csv: PathBuf },
    /// Annotated correlation heatmap of the numeric columns
    Heatmap {
        csv: PathBuf,
        #[arg(long)]
        title: Option<String>,
        /// Open the chart in the system viewer
        #[arg(long)]
        show: bool,
    },
    /// Export the head of the table as a shaded PNG (needs --save)
    Table {
        csv: PathBuf,
        #[arg(long, default_value_t = DEFAULT_SAMPLE)]
        sample: usize,
    },
}

fn build_config(args: &OutputArgs) -> anyhow::Result<PlotterConfig> {
    let mut config = match &args.config {
        Some(path) => PlotterConfig::from_json_file(path)
            .with_context(|| format!("Failed to read config {}", path.display()))?,
        None => PlotterConfig::default(),
    };
    if args.save {
        config.save_plots = true;
    }
    if let Some(path) = &args.path {
        config.path = path.clone();
    }
    if let Some(format) = &args.format {
        config.format = format.clone();
    }
    Ok(config)
}

fn load(csv: &Path) -> anyhow::Result<polars::prelude::DataFrame> {
    let mut loader = DataLoader::new();
    loader
        .load_csv(csv)
        .with_context(|| format!("Failed to load {}", csv.display()))?;
    if loader.row_count() == 0 {
        warn!("{} has no rows", csv.display());
    }
    Ok(loader.into_dataframe()?)
}

/// Print where a figure went, or its SVG when it was neither saved nor shown.
fn emit(plotter: &ChartPlotter, figure: &Figure, show: bool) -> anyhow::Result<()> {
    if show {
        let preview = plotter.show(figure).context("Failed to open the chart viewer")?;
        info!("Showing {}", preview.display());
    }
    match figure.saved_to() {
        Some(path) => println!("{}", path.display()),
        None if !show => print!("{}", figure.to_svg()?),
        None => {}
    }
    Ok(())
}

fn report(figures: &[Figure]) {
    for figure in figures {
        match figure.saved_to() {
            Some(path) => println!("{}", path.display()),
            None => println!("{} (not saved)", figure.title().unwrap_or(figure.tag())),
        }
    }
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let level = if cli.verbose {
        LevelFilter::Debug
    } else {
        LevelFilter::Warn
    };
    TermLogger::init(level, Config::default(), TerminalMode::Stderr, ColorChoice::Auto)?;

    let plotter = ChartPlotter::new(build_config(&cli.output)?)?;

    match cli.command {
        Command::Chart {
            kind,
            csv,
            x,
            y,
            title,
            show,
        } => {
            let data = load(&csv)?;
            let request = ChartRequest { x, y, title };
            emit(&plotter, &plotter.plot(kind, &data, &request)?, show)?;
        }
        Command::Regression { csv, label } => {
            report(&plotter.regression_plot(&load(&csv)?, &label)?);
        }
        Command::Unique { csv } => {
            report(&plotter.count_unique_plot(&load(&csv)?)?);
        }
        Command::Outliers { csv } => {
            report(&plotter.show_outliers(&load(&csv)?)?);
        }
        Command::Heatmap { csv, title, show } => {
            let figure = plotter.correlation_heatmap(&load(&csv)?, title.as_deref())?;
            emit(&plotter, &figure, show)?;
        }
        Command::Table { csv, sample } => {
            match plotter.export_table_as_png(&load(&csv)?, sample)? {
                Some(path) => println!("{}", path.display()),
                None => warn!("Table export writes a PNG file; pass --save to enable it"),
            }
        }
    }
    Ok(())
}
