//! Static Chart Renderer
//! Draws a [`Figure`] onto a plotters backend.
//!
//! Layout:
//! 1. Optional title across the top
//! 2. Panels on an even grid, row-major
//! 3. Optional colour bar strip on the right

use crate::charts::figure::{Colorbar, Figure, Mark, Panel};
use crate::charts::palette::{rgb, EDGE_GRAY};
use crate::config::Theme;
use crate::error::{PlotError, Result};
use image::RgbImage;
use plotters::coord::cartesian::Cartesian2d;
use plotters::coord::types::RangedCoordf64;
use plotters::coord::Shift;
use plotters::prelude::*;
use plotters::style::text_anchor::{HPos, Pos, VPos};
use plotters::style::FontStyle;
use std::sync::OnceLock;

const FONT_FAMILY: &str = "sans-serif";
static FONT_DATA: &[u8] = include_bytes!("../../assets/DejaVuSans.ttf");
static FONT_REGISTERED: OnceLock<bool> = OnceLock::new();

const COLORBAR_WIDTH: u32 = 90;
const COLORBAR_STEPS: usize = 64;

type Chart<'a, DB> = ChartContext<'a, DB, Cartesian2d<RangedCoordf64, RangedCoordf64>>;

/// Register the bundled font with the text engine. Runs once per process.
pub fn register_fonts() -> Result<()> {
    let ok = *FONT_REGISTERED.get_or_init(|| {
        let registered = plotters::style::register_font(FONT_FAMILY, FontStyle::Normal, FONT_DATA);
        if registered.is_err() {
            log::error!("Bundled font could not be parsed");
        }
        registered.is_ok()
    });
    if ok {
        Ok(())
    } else {
        Err(PlotError::Font)
    }
}

pub fn render_svg(figure: &Figure) -> Result<String> {
    register_fonts()?;
    let mut svg = String::new();
    {
        let root = SVGBackend::with_string(&mut svg, figure.size()).into_drawing_area();
        draw_figure(figure, &root)?;
        root.present()?;
    }
    Ok(svg)
}

pub fn render_rgb(figure: &Figure) -> Result<RgbImage> {
    register_fonts()?;
    let (width, height) = figure.size();
    let mut buffer = vec![0u8; width as usize * height as usize * 3];
    {
        let root = BitMapBackend::with_buffer(&mut buffer, (width, height)).into_drawing_area();
        draw_figure(figure, &root)?;
        root.present()?;
    }
    RgbImage::from_raw(width, height, buffer)
        .ok_or_else(|| PlotError::Render("raster buffer does not match figure size".to_string()))
}

fn draw_figure<DB: DrawingBackend>(figure: &Figure, root: &DrawingArea<DB, Shift>) -> Result<()> {
    let theme = figure.theme();
    root.fill(&WHITE)?;

    let body = match figure.title() {
        Some(title) => root.titled(title, (FONT_FAMILY, theme.title_size))?,
        None => root.clone(),
    };

    let panels_area = match figure.colorbar() {
        Some(colorbar) => {
            let (width, _) = body.dim_in_pixel();
            let (left, right) = body.split_horizontally(width.saturating_sub(COLORBAR_WIDTH));
            draw_colorbar(&right, colorbar, theme)?;
            left
        }
        None => body,
    };

    let areas = panels_area.split_evenly(figure.grid());
    for (panel, area) in figure.panels().iter().zip(areas.iter()) {
        draw_panel(area, panel, theme)?;
    }
    Ok(())
}

fn draw_panel<DB: DrawingBackend>(
    area: &DrawingArea<DB, Shift>,
    panel: &Panel,
    theme: &Theme,
) -> Result<()> {
    let mut builder = ChartBuilder::on(area);
    if panel.framed {
        let x_area = if panel.x.label.is_some() { 44 } else { 26 };
        let y_area = if panel.y.label.is_some() { 72 } else { 56 };
        builder
            .margin(8)
            .x_label_area_size(x_area)
            .y_label_area_size(y_area);
    }
    let mut chart = builder.build_cartesian_2d(panel.x.scale.range(), panel.y.scale.range())?;

    if panel.framed {
        chart.plotting_area().fill(&rgb(theme.background))?;

        let x_formatter = |v: &f64| panel.x.scale.tick_label(*v);
        let y_formatter = |v: &f64| panel.y.scale.tick_label(*v);

        let mut mesh = chart.configure_mesh();
        mesh.x_labels(panel.x.scale.tick_count())
            .y_labels(panel.y.scale.tick_count())
            .x_label_formatter(&x_formatter)
            .y_label_formatter(&y_formatter)
            .max_light_lines(0)
            .bold_line_style(rgb(theme.grid).stroke_width(1))
            .axis_style(TRANSPARENT.stroke_width(0))
            .x_label_style((FONT_FAMILY, theme.x_tick_label_size))
            .y_label_style((FONT_FAMILY, theme.y_tick_label_size))
            .axis_desc_style((FONT_FAMILY, theme.axis_label_size));
        if let Some(label) = &panel.x.label {
            mesh.x_desc(label.as_str());
        }
        if let Some(label) = &panel.y.label {
            mesh.y_desc(label.as_str());
        }
        mesh.draw()?;
    }

    let mut labelled = false;
    for mark in &panel.marks {
        labelled |= draw_mark(&mut chart, mark)?;
    }

    if labelled {
        chart
            .configure_series_labels()
            .position(SeriesLabelPosition::UpperRight)
            .background_style(WHITE.mix(0.8).filled())
            .border_style(EDGE_GRAY.stroke_width(1))
            .label_font((FONT_FAMILY, theme.y_tick_label_size))
            .draw()?;
    }
    Ok(())
}

/// Draw one mark; returns whether it registered a legend entry.
fn draw_mark<DB: DrawingBackend>(chart: &mut Chart<'_, DB>, mark: &Mark) -> Result<bool> {
    match mark {
        Mark::Points {
            points,
            radius,
            style,
            label,
        } => {
            let shape = style.shape();
            let radius = *radius;
            let anno = chart.draw_series(points.iter().map(|&p| Circle::new(p, radius, shape)))?;
            if let Some(label) = label {
                anno.label(label.as_str())
                    .legend(move |(x, y)| Circle::new((x, y), radius.max(3), shape));
            }
        }
        Mark::Line {
            points,
            style,
            label,
        } => {
            let shape = style.shape();
            let anno = chart.draw_series(LineSeries::new(points.iter().copied(), shape))?;
            if let Some(label) = label {
                anno.label(label.as_str())
                    .legend(move |(x, y)| PathElement::new(vec![(x, y), (x + 16, y)], shape));
            }
        }
        Mark::Polygon { points, style } => {
            chart.draw_series(std::iter::once(Polygon::new(points.clone(), style.shape())))?;
        }
        Mark::Rect { corners, style } => {
            chart.draw_series(std::iter::once(Rectangle::new(*corners, style.shape())))?;
        }
        Mark::Segment { from, to, style } => {
            chart.draw_series(std::iter::once(PathElement::new(
                vec![*from, *to],
                style.shape(),
            )))?;
        }
        Mark::Text {
            at,
            text,
            size,
            color,
        } => {
            let font = (FONT_FAMILY, *size)
                .into_font()
                .color(color)
                .pos(Pos::new(HPos::Center, VPos::Center));
            chart.draw_series(std::iter::once(Text::new(text.clone(), *at, font)))?;
        }
    }
    Ok(mark.label().is_some())
}

fn draw_colorbar<DB: DrawingBackend>(
    area: &DrawingArea<DB, Shift>,
    colorbar: &Colorbar,
    theme: &Theme,
) -> Result<()> {
    let (min, max) = if colorbar.max > colorbar.min {
        (colorbar.min, colorbar.max)
    } else {
        (colorbar.min - 0.5, colorbar.min + 0.5)
    };

    let mut chart = ChartBuilder::on(area)
        .margin_top(16)
        .margin_bottom(40)
        .margin_left(8)
        .right_y_label_area_size(48)
        .build_cartesian_2d(0.0..1.0, min..max)?;

    let formatter = |v: &f64| crate::charts::figure::format_number(*v);
    chart
        .configure_mesh()
        .disable_mesh()
        .y_labels(6)
        .y_label_formatter(&formatter)
        .axis_style(TRANSPARENT.stroke_width(0))
        .label_style((FONT_FAMILY, theme.y_tick_label_size))
        .draw()?;

    let step = (max - min) / COLORBAR_STEPS as f64;
    chart.draw_series((0..COLORBAR_STEPS).map(|i| {
        let lo = min + i as f64 * step;
        let color = colorbar.map.scaled(lo + step / 2.0, min, max);
        Rectangle::new([(0.0, lo), (1.0, lo + step)], color.filled())
    }))?;
    Ok(())
}
