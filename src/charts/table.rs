//! Table snapshot: the head of a table drawn as a shaded grid of cells.

use crate::charts::export::OutputFormat;
use crate::charts::figure::{Axis, Figure, Mark, Panel, Scale, Style};
use crate::charts::palette::{text_on, ColorMap, DARK_TEXT};
use crate::config::Theme;
use crate::data::DataProcessor;
use crate::error::Result;
use image::ImageFormat;
use plotters::style::{RGBColor, WHITE};
use polars::prelude::{DataFrame, DataType};

/// Rows exported when the caller does not pick a sample size.
pub const DEFAULT_SAMPLE: usize = 25;

pub const TABLE_TAG: &str = "table";

const CELL_WIDTH: u32 = 110;
const INDEX_WIDTH: u32 = 50;
const ROW_HEIGHT: u32 = 24;
const BORDER: RGBColor = RGBColor(221, 221, 221);
const HEADER_FILL: RGBColor = RGBColor(245, 245, 245);
const GRADIENT: ColorMap = ColorMap::PuBu;

/// One rendered column: header plus per-row text and background.
struct TableColumn {
    header: String,
    cells: Vec<(String, RGBColor)>,
}

fn is_float(dtype: &DataType) -> bool {
    matches!(dtype, DataType::Float32 | DataType::Float64)
}

fn build_column(df: &DataFrame, name: &str) -> Result<TableColumn> {
    let dtype = df.column(name)?.dtype().clone();

    let cells = if DataProcessor::is_numeric(&dtype) {
        let values = DataProcessor::numeric_values(df, name)?;
        let labels = DataProcessor::labels(df, name)?;
        let (min, max) = values
            .iter()
            .flatten()
            .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), &v| {
                (lo.min(v), hi.max(v))
            });

        values
            .iter()
            .zip(labels)
            .map(|(value, label)| match value {
                Some(v) => {
                    let text = if is_float(&dtype) {
                        format!("{:.6}", v)
                    } else {
                        label.unwrap_or_default()
                    };
                    (text, GRADIENT.scaled(*v, min, max))
                }
                None => ("nan".to_string(), WHITE),
            })
            .collect()
    } else {
        DataProcessor::labels(df, name)?
            .into_iter()
            .map(|label| {
                let text = label.map_or_else(|| "nan".to_string(), |s| s.trim_matches('"').to_string());
                (text, WHITE)
            })
            .collect()
    };

    Ok(TableColumn {
        header: name.to_string(),
        cells,
    })
}

/// Render the first `sample` rows. Numeric columns get a background
/// gradient spanning the column's own range.
pub fn table_figure(df: &DataFrame, sample: usize, theme: &Theme) -> Result<Figure> {
    let head = df.head(Some(sample));
    let rows = head.height();

    let mut columns = vec![TableColumn {
        header: String::new(),
        cells: (0..rows).map(|i| (i.to_string(), HEADER_FILL)).collect(),
    }];
    for name in DataProcessor::column_names(&head) {
        columns.push(build_column(&head, &name)?);
    }
    log::debug!("Table snapshot of {} rows x {} columns", rows, columns.len() - 1);

    // Cell widths in pixels, mirrored into data units so text stays centred
    let widths: Vec<f64> = std::iter::once(INDEX_WIDTH)
        .chain(std::iter::repeat(CELL_WIDTH).take(columns.len() - 1))
        .map(f64::from)
        .collect();
    let total_width: f64 = widths.iter().sum();
    let total_rows = (rows + 1) as f64;

    let mut panel = Panel::new(
        Axis::new(None, Scale::Linear { min: 0.0, max: total_width }),
        Axis::new(None, Scale::Linear { min: 0.0, max: total_rows }),
    );
    panel.framed = false;

    let text_size = theme.y_tick_label_size + 1.0;
    let mut left = 0.0;
    for (column, width) in columns.iter().zip(&widths) {
        let right = left + width;
        let centre = left + width / 2.0;

        // Header row sits at the top
        panel.push(Mark::Text {
            at: (centre, total_rows - 0.5),
            text: column.header.clone(),
            size: text_size,
            color: DARK_TEXT,
        });

        for (row, (text, fill)) in column.cells.iter().enumerate() {
            let top = total_rows - 1.0 - row as f64;
            let corners = [(left, top - 1.0), (right, top)];
            panel.push(Mark::Rect {
                corners,
                style: Style::fill(*fill),
            });
            panel.push(Mark::Rect {
                corners,
                style: Style::stroke(BORDER, 1),
            });
            panel.push(Mark::Text {
                at: (centre, top - 0.5),
                text: text.clone(),
                size: text_size,
                color: text_on(*fill),
            });
        }
        left = right;
    }

    let size = (total_width as u32, ROW_HEIGHT * (rows as u32 + 1));
    let mut figure = Figure::with_tag(TABLE_TAG, None, size, theme);
    figure.add_panel(panel);
    figure.force_format(OutputFormat::Raster(ImageFormat::Png));
    Ok(figure)
}

#[cfg(test)]
mod tests {
    use super::*;
    use polars::prelude::*;

    fn sample() -> DataFrame {
        DataFrame::new(vec![
            Column::new("n".into(), vec![1i64, 2, 3]),
            Column::new("f".into(), vec![Some(0.5), None, Some(1.5)]),
            Column::new("s".into(), vec!["x", "y", "z"]),
        ])
        .unwrap()
    }

    fn texts(figure: &Figure) -> Vec<String> {
        figure.panels()[0]
            .marks
            .iter()
            .filter_map(|m| match m {
                Mark::Text { text, .. } => Some(text.clone()),
                _ => None,
            })
            .collect()
    }

    #[test]
    fn snapshot_is_forced_to_png() {
        let figure = table_figure(&sample(), DEFAULT_SAMPLE, &Theme::default()).unwrap();
        assert_eq!(figure.tag(), "table");
        assert_eq!(figure.kind(), None);
        assert_eq!(
            figure.format_override(),
            Some(OutputFormat::Raster(ImageFormat::Png))
        );
        assert!(!figure.panels()[0].framed);
    }

    #[test]
    fn cells_are_formatted_per_dtype() {
        let figure = table_figure(&sample(), DEFAULT_SAMPLE, &Theme::default()).unwrap();
        let texts = texts(&figure);
        assert!(texts.contains(&"0.500000".to_string()));
        assert!(texts.contains(&"nan".to_string()));
        assert!(texts.contains(&"3".to_string()));
        assert!(texts.contains(&"z".to_string()));
    }

    #[test]
    fn sample_limits_rows() {
        let figure = table_figure(&sample(), 1, &Theme::default()).unwrap();
        // index + 3 columns, header and one body row each
        assert_eq!(texts(&figure).len(), 8);
        assert_eq!(figure.size(), (INDEX_WIDTH + 3 * CELL_WIDTH, 2 * ROW_HEIGHT));
    }

    #[test]
    fn gradient_spans_column_range() {
        let column = build_column(&sample(), "n").unwrap();
        assert_eq!(column.cells[0].1, GRADIENT.sample(0.0));
        assert_eq!(column.cells[2].1, GRADIENT.sample(1.0));
        assert_eq!(text_on(column.cells[2].1), crate::charts::palette::LIGHT_TEXT);
    }
}
