//! Retained figure model.
//!
//! A [`Figure`] is what one chart call produces: a grid of panels, each with
//! two axes and a list of marks in data coordinates. Nothing is drawn until
//! the figure is rendered, so every figure starts from a clean surface and
//! can be rendered any number of times to any backend.

use crate::charts::export::OutputFormat;
use crate::charts::kind::ChartKind;
use crate::charts::palette::ColorMap;
use crate::charts::renderer;
use crate::config::Theme;
use crate::error::Result;
use chrono::{DateTime, Utc};
use image::RgbImage;
use plotters::style::{Color, RGBColor, ShapeStyle};
use std::io::Cursor;
use std::ops::Range;
use std::path::{Path, PathBuf};

/// Fraction of the data span added on each side of a continuous axis.
const AXIS_MARGIN: f64 = 0.05;

const MILLIS_PER_DAY: f64 = 86_400_000.0;

#[derive(Debug, Clone, PartialEq)]
pub enum Scale {
    Linear { min: f64, max: f64 },
    /// Milliseconds since the Unix epoch.
    Time { min: f64, max: f64 },
    /// Category `i` sits at position `i`.
    Category(Vec<String>),
}

impl Scale {
    /// Linear scale covering `values` with a small margin.
    pub fn fit<I: IntoIterator<Item = f64>>(values: I) -> Self {
        let (min, max) = padded_extent(values);
        Scale::Linear { min, max }
    }

    /// Like [`Scale::fit`] but always includes zero, for bars.
    pub fn fit_from_zero<I: IntoIterator<Item = f64>>(values: I) -> Self {
        Self::fit(values.into_iter().chain(std::iter::once(0.0)))
    }

    pub fn fit_time<I: IntoIterator<Item = f64>>(values: I) -> Self {
        let (min, max) = padded_extent(values);
        Scale::Time { min, max }
    }

    pub fn range(&self) -> Range<f64> {
        match self {
            Scale::Linear { min, max } | Scale::Time { min, max } => *min..*max,
            Scale::Category(names) => -0.5..(names.len().max(1) as f64 - 0.5),
        }
    }

    pub fn tick_count(&self) -> usize {
        match self {
            Scale::Linear { .. } | Scale::Time { .. } => 6,
            Scale::Category(names) => names.len().max(1),
        }
    }

    pub fn tick_label(&self, value: f64) -> String {
        match self {
            Scale::Linear { .. } => format_number(value),
            Scale::Time { min, max } => {
                let fmt = if max - min < 2.0 * MILLIS_PER_DAY {
                    "%m-%d %H:%M"
                } else {
                    "%Y-%m-%d"
                };
                DateTime::<Utc>::from_timestamp_millis(value as i64)
                    .map(|t| t.format(fmt).to_string())
                    .unwrap_or_default()
            }
            Scale::Category(names) => {
                let idx = value.round();
                if (value - idx).abs() > 1e-6 || idx < 0.0 {
                    return String::new();
                }
                names.get(idx as usize).cloned().unwrap_or_default()
            }
        }
    }
}

fn padded_extent<I: IntoIterator<Item = f64>>(values: I) -> (f64, f64) {
    let (min, max) = values
        .into_iter()
        .filter(|v| v.is_finite())
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), v| {
            (lo.min(v), hi.max(v))
        });
    if min > max {
        return (0.0, 1.0);
    }
    if min == max {
        let pad = if min == 0.0 { 1.0 } else { min.abs() * 0.1 };
        return (min - pad, max + pad);
    }
    let pad = (max - min) * AXIS_MARGIN;
    (min - pad, max + pad)
}

/// Compact tick label: trailing zeros trimmed, scientific for extremes.
pub fn format_number(value: f64) -> String {
    let magnitude = value.abs();
    if magnitude != 0.0 && !(1e-3..1e5).contains(&magnitude) {
        return format!("{:.1e}", value);
    }
    let text = format!("{:.3}", value);
    let text = text.trim_end_matches('0').trim_end_matches('.');
    if text == "-0" {
        "0".to_string()
    } else {
        text.to_string()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Axis {
    pub label: Option<String>,
    pub scale: Scale,
}

impl Axis {
    pub fn new(label: Option<&str>, scale: Scale) -> Self {
        Self {
            label: label.map(str::to_string),
            scale,
        }
    }
}

/// Stroke or fill of a mark.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Style {
    pub color: RGBColor,
    pub alpha: f64,
    pub filled: bool,
    pub stroke_width: u32,
}

impl Style {
    pub fn fill(color: RGBColor) -> Self {
        Self {
            color,
            alpha: 1.0,
            filled: true,
            stroke_width: 1,
        }
    }

    pub fn stroke(color: RGBColor, width: u32) -> Self {
        Self {
            color,
            alpha: 1.0,
            filled: false,
            stroke_width: width,
        }
    }

    pub fn alpha(mut self, alpha: f64) -> Self {
        self.alpha = alpha;
        self
    }

    pub fn shape(&self) -> ShapeStyle {
        ShapeStyle {
            color: self.color.mix(self.alpha),
            filled: self.filled,
            stroke_width: self.stroke_width,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Mark {
    Points {
        points: Vec<(f64, f64)>,
        radius: u32,
        style: Style,
        label: Option<String>,
    },
    Line {
        points: Vec<(f64, f64)>,
        style: Style,
        label: Option<String>,
    },
    Polygon {
        points: Vec<(f64, f64)>,
        style: Style,
    },
    Rect {
        corners: [(f64, f64); 2],
        style: Style,
    },
    Segment {
        from: (f64, f64),
        to: (f64, f64),
        style: Style,
    },
    /// Centred on `at`.
    Text {
        at: (f64, f64),
        text: String,
        size: f64,
        color: RGBColor,
    },
}

impl Mark {
    pub fn label(&self) -> Option<&str> {
        match self {
            Mark::Points { label, .. } | Mark::Line { label, .. } => label.as_deref(),
            _ => None,
        }
    }
}

/// One set of axes.
#[derive(Debug, Clone, PartialEq)]
pub struct Panel {
    pub x: Axis,
    pub y: Axis,
    pub marks: Vec<Mark>,
    /// Draw background, grid and tick labels. Off for table snapshots.
    pub framed: bool,
}

impl Panel {
    pub fn new(x: Axis, y: Axis) -> Self {
        Self {
            x,
            y,
            marks: Vec::new(),
            framed: true,
        }
    }

    pub fn push(&mut self, mark: Mark) {
        self.marks.push(mark);
    }
}

/// Continuous colour legend drawn to the right of the panels.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Colorbar {
    pub map: ColorMap,
    pub min: f64,
    pub max: f64,
}

/// The in-memory result of one chart call.
#[derive(Debug, Clone)]
pub struct Figure {
    tag: &'static str,
    kind: Option<ChartKind>,
    title: Option<String>,
    size: (u32, u32),
    grid: (usize, usize),
    panels: Vec<Panel>,
    colorbar: Option<Colorbar>,
    format_override: Option<OutputFormat>,
    theme: Theme,
    saved_to: Option<PathBuf>,
}

impl Figure {
    pub fn new(kind: ChartKind, theme: &Theme) -> Self {
        let size = if kind.is_figure_level() {
            (theme.facet_size, theme.facet_size)
        } else {
            theme.figure_size
        };
        Self::with_tag(kind.tag(), Some(kind), size, theme)
    }

    pub(crate) fn with_tag(
        tag: &'static str,
        kind: Option<ChartKind>,
        size: (u32, u32),
        theme: &Theme,
    ) -> Self {
        Self {
            tag,
            kind,
            title: None,
            size,
            grid: (1, 1),
            panels: Vec::new(),
            colorbar: None,
            format_override: None,
            theme: theme.clone(),
            saved_to: None,
        }
    }

    pub fn set_title(&mut self, title: Option<&str>) {
        self.title = title.map(str::to_string);
    }

    pub fn set_size(&mut self, width: u32, height: u32) {
        self.size = (width.max(1), height.max(1));
    }

    /// Lay panels out row-major on a `rows` x `cols` grid.
    pub fn set_grid(&mut self, rows: usize, cols: usize) {
        self.grid = (rows.max(1), cols.max(1));
    }

    pub fn add_panel(&mut self, panel: Panel) {
        self.panels.push(panel);
    }

    pub fn set_colorbar(&mut self, colorbar: Colorbar) {
        self.colorbar = Some(colorbar);
    }

    /// Persist in this format whatever the facade is configured with.
    pub(crate) fn force_format(&mut self, format: OutputFormat) {
        self.format_override = Some(format);
    }

    pub(crate) fn set_saved_to(&mut self, path: PathBuf) {
        self.saved_to = Some(path);
    }

    /// Filename prefix used when this figure is saved.
    pub fn tag(&self) -> &'static str {
        self.tag
    }

    /// Chart kind, `None` for table snapshots.
    pub fn kind(&self) -> Option<ChartKind> {
        self.kind
    }

    pub fn title(&self) -> Option<&str> {
        self.title.as_deref()
    }

    pub fn size(&self) -> (u32, u32) {
        self.size
    }

    pub fn grid(&self) -> (usize, usize) {
        self.grid
    }

    pub fn panels(&self) -> &[Panel] {
        &self.panels
    }

    pub fn colorbar(&self) -> Option<&Colorbar> {
        self.colorbar.as_ref()
    }

    pub fn theme(&self) -> &Theme {
        &self.theme
    }

    pub fn format_override(&self) -> Option<OutputFormat> {
        self.format_override
    }

    /// Where the facade wrote this figure, if it was persisted.
    pub fn saved_to(&self) -> Option<&Path> {
        self.saved_to.as_deref()
    }

    /// Render as an SVG document.
    pub fn to_svg(&self) -> Result<String> {
        renderer::render_svg(self)
    }

    /// Render to an RGB raster of `size()` pixels.
    pub fn to_rgb_image(&self) -> Result<RgbImage> {
        renderer::render_rgb(self)
    }

    /// Render and encode in `format`.
    pub fn encode(&self, format: OutputFormat) -> Result<Vec<u8>> {
        match format {
            OutputFormat::Svg => Ok(self.to_svg()?.into_bytes()),
            OutputFormat::Raster(image_format) => {
                let image = self.to_rgb_image()?;
                let mut bytes = Cursor::new(Vec::new());
                image.write_to(&mut bytes, image_format)?;
                Ok(bytes.into_inner())
            }
        }
    }
}
