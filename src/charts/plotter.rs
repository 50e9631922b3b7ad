//! Chart Plotter Module
//! Facade that turns a table plus column selectors into figures and,
//! when configured to, persists them under timestamped filenames.

use crate::charts::export::{self, OutputFormat};
use crate::charts::figure::Figure;
use crate::charts::kind::ChartKind;
use crate::charts::{categorical, matrix, relational, renderer, table};
use crate::config::PlotterConfig;
use crate::error::Result;
use chrono::Local;
use log::{debug, info};
use polars::prelude::DataFrame;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

/// Column selectors and title of one chart call.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ChartRequest {
    pub x: Option<String>,
    pub y: Option<String>,
    pub title: Option<String>,
}

impl ChartRequest {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn x(mut self, column: &str) -> Self {
        self.x = Some(column.to_string());
        self
    }

    pub fn y(mut self, column: &str) -> Self {
        self.y = Some(column.to_string());
        self
    }

    pub fn title(mut self, title: &str) -> Self {
        self.title = Some(title.to_string());
        self
    }

    fn from_parts(x: Option<&str>, y: Option<&str>, title: Option<&str>) -> Self {
        Self {
            x: x.map(str::to_string),
            y: y.map(str::to_string),
            title: title.map(str::to_string),
        }
    }
}

/// Builds one figure per call; persists it when `save_plots` is set.
#[derive(Debug)]
pub struct ChartPlotter {
    config: PlotterConfig,
}

impl ChartPlotter {
    /// Create the facade. With persistence on, the output directory is
    /// created here; an existing directory is fine.
    pub fn new(config: PlotterConfig) -> Result<Self> {
        renderer::register_fonts()?;

        if config.save_plots {
            match fs::create_dir(&config.path) {
                Ok(()) => info!("Created output directory {}", config.path.display()),
                Err(e) if e.kind() == ErrorKind::AlreadyExists => {
                    info!("Directory {} already exists", config.path.display())
                }
                Err(e) => return Err(e.into()),
            }
        }

        Ok(Self { config })
    }

    pub fn config(&self) -> &PlotterConfig {
        &self.config
    }

    /// Build a chart of `kind`, apply the title and persist it if enabled.
    pub fn plot(&self, kind: ChartKind, data: &DataFrame, request: &ChartRequest) -> Result<Figure> {
        let x = request.x.as_deref();
        let y = request.y.as_deref();
        let theme = &self.config.theme;
        debug!("Building {} (x: {:?}, y: {:?})", kind, x, y);

        let mut figure = match kind {
            ChartKind::Pair => relational::pair(data, x, y, theme)?,
            ChartKind::Scatter => relational::scatter(data, x, y, theme)?,
            ChartKind::Line => relational::line(data, x, y, theme)?,
            ChartKind::LinearModel => relational::lmplot(data, x, y, theme)?,
            ChartKind::Category => categorical::cat(data, x, y, theme)?,
            ChartKind::Strip => categorical::strip(data, x, y, theme)?,
            ChartKind::Swarm => categorical::swarm(data, x, y, theme)?,
            ChartKind::Violin => categorical::violin(data, x, y, theme)?,
            ChartKind::Box => categorical::boxplot(data, x, y, theme)?,
            ChartKind::Boxen => categorical::boxen(data, x, y, theme)?,
            ChartKind::Count => categorical::count(data, x, y, theme)?,
            ChartKind::Bar => categorical::bar(data, x, y, theme)?,
            ChartKind::Point => categorical::point(data, x, y, theme)?,
            ChartKind::CorrelationHeatmap => matrix::correlation_heatmap(data, theme)?,
        };
        figure.set_title(request.title.as_deref());

        if self.config.save_plots {
            let path = self.save_plot(&figure, kind.tag())?;
            figure.set_saved_to(path);
        }
        Ok(figure)
    }

    fn plot_parts(
        &self,
        kind: ChartKind,
        data: &DataFrame,
        x: Option<&str>,
        y: Option<&str>,
        title: Option<&str>,
    ) -> Result<Figure> {
        self.plot(kind, data, &ChartRequest::from_parts(x, y, title))
    }

    /// Grid of pairwise scatters over every numeric column.
    pub fn pairplot(&self, data: &DataFrame, title: Option<&str>) -> Result<Figure> {
        self.plot_parts(ChartKind::Pair, data, None, None, title)
    }

    pub fn scatterplot(
        &self,
        data: &DataFrame,
        x: Option<&str>,
        y: Option<&str>,
        title: Option<&str>,
    ) -> Result<Figure> {
        self.plot_parts(ChartKind::Scatter, data, x, y, title)
    }

    pub fn lineplot(
        &self,
        data: &DataFrame,
        x: Option<&str>,
        y: Option<&str>,
        title: Option<&str>,
    ) -> Result<Figure> {
        self.plot_parts(ChartKind::Line, data, x, y, title)
    }

    pub fn catplot(
        &self,
        data: &DataFrame,
        x: Option<&str>,
        y: Option<&str>,
        title: Option<&str>,
    ) -> Result<Figure> {
        self.plot_parts(ChartKind::Category, data, x, y, title)
    }

    pub fn stripplot(
        &self,
        data: &DataFrame,
        x: Option<&str>,
        y: Option<&str>,
        title: Option<&str>,
    ) -> Result<Figure> {
        self.plot_parts(ChartKind::Strip, data, x, y, title)
    }

    pub fn swarmplot(
        &self,
        data: &DataFrame,
        x: Option<&str>,
        y: Option<&str>,
        title: Option<&str>,
    ) -> Result<Figure> {
        self.plot_parts(ChartKind::Swarm, data, x, y, title)
    }

    pub fn violinplot(
        &self,
        data: &DataFrame,
        x: Option<&str>,
        y: Option<&str>,
        title: Option<&str>,
    ) -> Result<Figure> {
        self.plot_parts(ChartKind::Violin, data, x, y, title)
    }

    pub fn boxplot(
        &self,
        data: &DataFrame,
        x: Option<&str>,
        y: Option<&str>,
        title: Option<&str>,
    ) -> Result<Figure> {
        self.plot_parts(ChartKind::Box, data, x, y, title)
    }

    pub fn boxenplot(
        &self,
        data: &DataFrame,
        x: Option<&str>,
        y: Option<&str>,
        title: Option<&str>,
    ) -> Result<Figure> {
        self.plot_parts(ChartKind::Boxen, data, x, y, title)
    }

    /// Exactly one of `x` and `y` must be given.
    pub fn countplot(
        &self,
        data: &DataFrame,
        x: Option<&str>,
        y: Option<&str>,
        title: Option<&str>,
    ) -> Result<Figure> {
        self.plot_parts(ChartKind::Count, data, x, y, title)
    }

    pub fn barplot(
        &self,
        data: &DataFrame,
        x: Option<&str>,
        y: Option<&str>,
        title: Option<&str>,
    ) -> Result<Figure> {
        self.plot_parts(ChartKind::Bar, data, x, y, title)
    }

    pub fn pointplot(
        &self,
        data: &DataFrame,
        x: Option<&str>,
        y: Option<&str>,
        title: Option<&str>,
    ) -> Result<Figure> {
        self.plot_parts(ChartKind::Point, data, x, y, title)
    }

    /// Linear model fit; needs both `x` and `y`.
    pub fn lmplot(
        &self,
        data: &DataFrame,
        x: Option<&str>,
        y: Option<&str>,
        title: Option<&str>,
    ) -> Result<Figure> {
        self.plot_parts(ChartKind::LinearModel, data, x, y, title)
    }

    pub fn correlation_heatmap(&self, data: &DataFrame, title: Option<&str>) -> Result<Figure> {
        self.plot_parts(ChartKind::CorrelationHeatmap, data, None, None, title)
    }

    /// One linear-model chart of `label` against every other numeric column,
    /// titled `"{label}:{column}"`.
    pub fn regression_plot(&self, data: &DataFrame, label: &str) -> Result<Vec<Figure>> {
        let columns: Vec<String> = crate::data::DataProcessor::numeric_columns(data)
            .into_iter()
            .filter(|column| column != label)
            .collect();
        debug!("Regression sweep of '{}' over {} columns", label, columns.len());

        columns
            .iter()
            .map(|column| {
                let title = format!("{}:{}", label, column);
                self.lmplot(data, Some(column.as_str()), Some(label), Some(&title))
            })
            .collect()
    }

    /// One count chart per column, in column order.
    pub fn count_unique_plot(&self, data: &DataFrame) -> Result<Vec<Figure>> {
        data.get_column_names()
            .iter()
            .map(|column| self.countplot(data, Some(column.as_str()), None, None))
            .collect()
    }

    /// One box chart per column, in column order.
    pub fn show_outliers(&self, data: &DataFrame) -> Result<Vec<Figure>> {
        data.get_column_names()
            .iter()
            .map(|column| self.boxplot(data, Some(column.as_str()), None, None))
            .collect()
    }

    /// Write the first `sample` rows as a shaded PNG table. Does nothing and
    /// returns `None` unless persistence is enabled.
    pub fn export_table_as_png(&self, data: &DataFrame, sample: usize) -> Result<Option<PathBuf>> {
        if !self.config.save_plots {
            debug!("Persistence disabled, skipping table export");
            return Ok(None);
        }
        let figure = table::table_figure(data, sample, &self.config.theme)?;
        let path = self.save_plot(&figure, figure.tag())?;
        Ok(Some(path))
    }

    /// Write `figure` as `{path}/{tag}-{timestamp}.{ext}` and return the
    /// path. The figure's forced format wins over the configured one.
    pub fn save_plot(&self, figure: &Figure, tag: &str) -> Result<PathBuf> {
        let (format, ext) = self.output_format(figure)?;
        let now = Local::now().naive_local();
        let path = export::write_figure(figure, &self.config.path, tag, &ext, format, &now)?;
        info!("Saved {} to {}", tag, path.display());
        Ok(path)
    }

    /// Write `figure` to the temp directory and open it in the system
    /// viewer. Works whether or not persistence is enabled.
    pub fn show(&self, figure: &Figure) -> Result<PathBuf> {
        let path = self.write_preview(figure, &std::env::temp_dir())?;
        open::that(&path)?;
        debug!("Opened {}", path.display());
        Ok(path)
    }

    fn write_preview(&self, figure: &Figure, dir: &Path) -> Result<PathBuf> {
        let (format, ext) = self.output_format(figure)?;
        let tag = format!("{}-preview", figure.tag());
        let now = Local::now().naive_local();
        export::write_figure(figure, dir, &tag, &ext, format, &now)
    }

    fn output_format(&self, figure: &Figure) -> Result<(OutputFormat, String)> {
        match figure.format_override() {
            Some(format) => Ok((format, format.extension().to_string())),
            None => {
                let ext = self.config.format.trim().trim_start_matches('.').to_string();
                Ok((OutputFormat::from_extension(&ext)?, ext))
            }
        }
    }
}
