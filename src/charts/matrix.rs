//! Annotated correlation heatmap.

use crate::charts::figure::{Axis, Colorbar, Figure, Mark, Panel, Scale, Style};
use crate::charts::kind::ChartKind;
use crate::charts::palette::{text_on, ColorMap};
use crate::config::Theme;
use crate::error::Result;
use crate::stats::CorrelationMatrix;
use polars::prelude::DataFrame;

const HEATMAP_MAP: ColorMap = ColorMap::Rocket;

/// Pearson correlation of every numeric column pair, one annotated cell per
/// pair. The first column sits in the top row.
pub fn correlation_heatmap(df: &DataFrame, theme: &Theme) -> Result<Figure> {
    let matrix = CorrelationMatrix::from_dataframe(df)?;
    let n = matrix.columns.len();
    let (min, max) = matrix.range().unwrap_or((-1.0, 1.0));
    log::debug!("Correlation over {} columns spans {:.3}..{:.3}", n, min, max);

    let rows: Vec<String> = matrix.columns.iter().rev().cloned().collect();
    let mut panel = Panel::new(
        Axis::new(None, Scale::Category(matrix.columns.clone())),
        Axis::new(None, Scale::Category(rows)),
    );

    for row in 0..n {
        let y = (n - 1 - row) as f64;
        for col in 0..n {
            let value = matrix.get(row, col);
            // Undefined correlations stay blank
            if !value.is_finite() {
                continue;
            }
            let x = col as f64;
            let color = HEATMAP_MAP.scaled(value, min, max);
            panel.push(Mark::Rect {
                corners: [(x - 0.5, y - 0.5), (x + 0.5, y + 0.5)],
                style: Style::fill(color),
            });
            panel.push(Mark::Text {
                at: (x, y),
                text: format!("{:.2}", value),
                size: theme.y_tick_label_size,
                color: text_on(color),
            });
        }
    }

    let mut figure = Figure::new(ChartKind::CorrelationHeatmap, theme);
    figure.add_panel(panel);
    figure.set_colorbar(Colorbar {
        map: HEATMAP_MAP,
        min,
        max,
    });
    Ok(figure)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::PlotError;
    use polars::prelude::*;

    #[test]
    fn cells_are_annotated_with_two_decimals() {
        let df = DataFrame::new(vec![
            Column::new("a".into(), vec![1.0, 2.0, 3.0, 4.0]),
            Column::new("b".into(), vec![2.0, 4.0, 6.0, 8.0]),
            Column::new("c".into(), vec![4.0, 3.0, 2.0, 1.0]),
            Column::new("label".into(), vec!["w", "x", "y", "z"]),
        ])
        .unwrap();
        let figure = correlation_heatmap(&df, &Theme::default()).unwrap();

        let texts: Vec<_> = figure.panels()[0]
            .marks
            .iter()
            .filter_map(|m| match m {
                Mark::Text { at, text, .. } => Some((*at, text.as_str())),
                _ => None,
            })
            .collect();
        assert_eq!(texts.len(), 9);
        // Row 0 is drawn at the top
        assert_eq!(texts[0], ((0.0, 2.0), "1.00"));
        assert!(texts.iter().any(|(_, t)| *t == "-1.00"));

        let colorbar = figure.colorbar().unwrap();
        assert_eq!((colorbar.min, colorbar.max), (-1.0, 1.0));
    }

    #[test]
    fn constant_columns_leave_blank_cells() {
        let df = DataFrame::new(vec![
            Column::new("a".into(), vec![1.0, 2.0, 3.0]),
            Column::new("flat".into(), vec![5.0, 5.0, 5.0]),
        ])
        .unwrap();
        let figure = correlation_heatmap(&df, &Theme::default()).unwrap();
        let cells = figure.panels()[0]
            .marks
            .iter()
            .filter(|m| matches!(m, Mark::Rect { .. }))
            .count();
        assert_eq!(cells, 1);
    }

    #[test]
    fn string_only_table_is_rejected() {
        let df = DataFrame::new(vec![Column::new("s".into(), vec!["a"])]).unwrap();
        assert!(matches!(
            correlation_heatmap(&df, &Theme::default()),
            Err(PlotError::NoNumericColumns)
        ));
    }
}
