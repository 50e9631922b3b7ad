//! Relational charts: scatter, line, linear model and the pair grid.

use crate::charts::figure::{Axis, Figure, Mark, Panel, Scale, Style};
use crate::charts::kind::ChartKind;
use crate::charts::palette::pick;
use crate::config::Theme;
use crate::data::{AxisValues, DataProcessor};
use crate::error::{PlotError, Result};
use crate::stats::{complete_pairs, LinearFit, StatsCalculator};
use polars::prelude::DataFrame;

/// Points sampled along a fitted regression line.
const FIT_SAMPLES: usize = 100;

/// One x/y series of a relational chart.
struct Series {
    label: Option<String>,
    xs: Vec<Option<f64>>,
    ys: Vec<Option<f64>>,
}

impl Series {
    fn points(&self) -> Vec<(f64, f64)> {
        let (xs, ys) = complete_pairs(&self.xs, &self.ys);
        xs.into_iter().zip(ys).collect()
    }
}

/// Series plus axis metadata after resolving the x/y selectors.
struct Resolved {
    x: Option<String>,
    y: Option<String>,
    x_temporal: bool,
    y_temporal: bool,
    series: Vec<Series>,
}

fn row_index(n: usize) -> Vec<Option<f64>> {
    (0..n).map(|i| Some(i as f64)).collect()
}

/// x and y give one series; a single selector plots against the row index;
/// neither plots every numeric column against the row index.
fn resolve(df: &DataFrame, x: Option<&str>, y: Option<&str>) -> Result<Resolved> {
    let rows = df.height();
    let single = |name: &str| -> Result<AxisValues> { DataProcessor::axis_values(df, name) };

    let resolved = match (x, y) {
        (Some(x), Some(y)) => {
            let (xv, yv) = (single(x)?, single(y)?);
            Resolved {
                x: Some(x.to_string()),
                y: Some(y.to_string()),
                x_temporal: xv.temporal,
                y_temporal: yv.temporal,
                series: vec![Series {
                    label: None,
                    xs: xv.values,
                    ys: yv.values,
                }],
            }
        }
        (Some(x), None) => {
            let xv = single(x)?;
            Resolved {
                x: Some(x.to_string()),
                y: None,
                x_temporal: xv.temporal,
                y_temporal: false,
                series: vec![Series {
                    label: None,
                    xs: xv.values,
                    ys: row_index(rows),
                }],
            }
        }
        (None, Some(y)) => {
            let yv = single(y)?;
            Resolved {
                x: None,
                y: Some(y.to_string()),
                x_temporal: false,
                y_temporal: yv.temporal,
                series: vec![Series {
                    label: None,
                    xs: row_index(rows),
                    ys: yv.values,
                }],
            }
        }
        (None, None) => {
            let columns = DataProcessor::numeric_columns(df);
            if columns.is_empty() {
                return Err(PlotError::NoNumericColumns);
            }
            let series = columns
                .into_iter()
                .map(|name| {
                    let ys = DataProcessor::numeric_values(df, &name)?;
                    Ok(Series {
                        label: Some(name),
                        xs: row_index(rows),
                        ys,
                    })
                })
                .collect::<Result<Vec<_>>>()?;
            Resolved {
                x: None,
                y: None,
                x_temporal: false,
                y_temporal: false,
                series,
            }
        }
    };
    Ok(resolved)
}

fn continuous(values: impl IntoIterator<Item = f64>, temporal: bool) -> Scale {
    if temporal {
        Scale::fit_time(values)
    } else {
        Scale::fit(values)
    }
}

fn panel_for(resolved: &Resolved, points: &[(f64, f64)]) -> Panel {
    let x_scale = continuous(points.iter().map(|p| p.0), resolved.x_temporal);
    let y_scale = continuous(points.iter().map(|p| p.1), resolved.y_temporal);
    Panel::new(
        Axis::new(resolved.x.as_deref(), x_scale),
        Axis::new(resolved.y.as_deref(), y_scale),
    )
}

pub fn scatter(df: &DataFrame, x: Option<&str>, y: Option<&str>, theme: &Theme) -> Result<Figure> {
    let resolved = resolve(df, x, y)?;
    let layers: Vec<_> = resolved.series.iter().map(Series::points).collect();
    let all: Vec<(f64, f64)> = layers.iter().flatten().copied().collect();

    let mut panel = panel_for(&resolved, &all);
    for (i, (series, points)) in resolved.series.iter().zip(layers).enumerate() {
        panel.push(Mark::Points {
            points,
            radius: 3,
            style: Style::fill(pick(&theme.palette, i)).alpha(0.8),
            label: series.label.clone(),
        });
    }

    let mut figure = Figure::new(ChartKind::Scatter, theme);
    figure.add_panel(panel);
    Ok(figure)
}

/// Mean and t-interval of y for each distinct x, sorted by x.
fn aggregate_by_x(points: &[(f64, f64)]) -> Vec<(f64, f64, f64, f64)> {
    let mut sorted = points.to_vec();
    sorted.sort_by(|a, b| a.0.partial_cmp(&b.0).unwrap_or(std::cmp::Ordering::Equal));

    let mut out = Vec::new();
    let mut start = 0;
    while start < sorted.len() {
        let x = sorted[start].0;
        let end = start + sorted[start..].iter().take_while(|p| p.0 == x).count();
        let ys: Vec<f64> = sorted[start..end].iter().map(|p| p.1).collect();
        if let Some(estimate) = StatsCalculator::mean_ci(&ys) {
            out.push((x, estimate.mean, estimate.low, estimate.high));
        }
        start = end;
    }
    out
}

pub fn line(df: &DataFrame, x: Option<&str>, y: Option<&str>, theme: &Theme) -> Result<Figure> {
    let resolved = resolve(df, x, y)?;
    let aggregated: Vec<_> = resolved
        .series
        .iter()
        .map(|s| aggregate_by_x(&s.points()))
        .collect();

    let extent: Vec<(f64, f64)> = aggregated
        .iter()
        .flatten()
        .flat_map(|&(x, _, lo, hi)| [(x, lo), (x, hi)])
        .collect();
    let mut panel = panel_for(&resolved, &extent);

    for (i, (series, rows)) in resolved.series.iter().zip(aggregated).enumerate() {
        let color = pick(&theme.palette, i);

        // Band only where repeated x values give an interval
        if rows.iter().any(|r| r.3 > r.2) {
            let mut band: Vec<(f64, f64)> = rows.iter().map(|r| (r.0, r.2)).collect();
            band.extend(rows.iter().rev().map(|r| (r.0, r.3)));
            panel.push(Mark::Polygon {
                points: band,
                style: Style::fill(color).alpha(0.2),
            });
        }
        panel.push(Mark::Line {
            points: rows.iter().map(|r| (r.0, r.1)).collect(),
            style: Style::stroke(color, 2),
            label: series.label.clone(),
        });
    }

    let mut figure = Figure::new(ChartKind::Line, theme);
    figure.add_panel(panel);
    Ok(figure)
}

/// Scatter with least-squares line and confidence band of the mean.
pub fn lmplot(df: &DataFrame, x: Option<&str>, y: Option<&str>, theme: &Theme) -> Result<Figure> {
    let (x, y) = match (x, y) {
        (Some(x), Some(y)) => (x, y),
        _ => return Err(PlotError::MissingArgument("lmplot requires both x and y")),
    };
    let (xs, ys) = complete_pairs(
        &DataProcessor::numeric_values(df, x)?,
        &DataProcessor::numeric_values(df, y)?,
    );
    let points: Vec<(f64, f64)> = xs.iter().copied().zip(ys.iter().copied()).collect();
    let color = pick(&theme.palette, 0);

    let mut marks = vec![Mark::Points {
        points: points.clone(),
        radius: 3,
        style: Style::fill(color).alpha(0.8),
        label: None,
    }];
    let mut extent = points;

    if let Some(fit) = LinearFit::fit(&xs, &ys) {
        let lo = xs.iter().copied().fold(f64::INFINITY, f64::min);
        let hi = xs.iter().copied().fold(f64::NEG_INFINITY, f64::max);
        let step = (hi - lo) / (FIT_SAMPLES - 1) as f64;
        let grid: Vec<f64> = (0..FIT_SAMPLES).map(|i| lo + i as f64 * step).collect();

        let bounds: Vec<(f64, f64)> = grid.iter().map(|&gx| fit.confidence_interval(gx)).collect();
        let mut band: Vec<(f64, f64)> = grid.iter().zip(&bounds).map(|(&gx, b)| (gx, b.0)).collect();
        band.extend(grid.iter().zip(&bounds).rev().map(|(&gx, b)| (gx, b.1)));
        extent.extend(band.iter().copied());

        marks.push(Mark::Polygon {
            points: band,
            style: Style::fill(color).alpha(0.15),
        });
        marks.push(Mark::Line {
            points: grid.iter().map(|&gx| (gx, fit.predict(gx))).collect(),
            style: Style::stroke(color, 2),
            label: None,
        });
    } else {
        log::warn!("Cannot fit {} on {}: fewer than two distinct x values", y, x);
    }

    let mut panel = Panel::new(
        Axis::new(Some(x), Scale::fit(extent.iter().map(|p| p.0))),
        Axis::new(Some(y), Scale::fit(extent.iter().map(|p| p.1))),
    );
    for mark in marks {
        panel.push(mark);
    }

    let mut figure = Figure::new(ChartKind::LinearModel, theme);
    figure.add_panel(panel);
    Ok(figure)
}

/// Grid of every variable pair: histograms on the diagonal, scatter elsewhere.
pub fn pair(df: &DataFrame, x: Option<&str>, y: Option<&str>, theme: &Theme) -> Result<Figure> {
    let mut columns: Vec<String> = match (x, y) {
        (None, None) => DataProcessor::numeric_columns(df),
        _ => x.into_iter().chain(y).map(str::to_string).collect(),
    };
    columns.dedup();
    if columns.is_empty() {
        return Err(PlotError::NoNumericColumns);
    }

    let data = columns
        .iter()
        .map(|name| DataProcessor::numeric_values(df, name))
        .collect::<Result<Vec<_>>>()?;
    let n = columns.len();
    let color = pick(&theme.palette, 0);

    let mut figure = Figure::new(ChartKind::Pair, theme);
    let side = (theme.facet_size / 2).max(1) * n as u32;
    figure.set_size(side, side);
    figure.set_grid(n, n);

    for row in 0..n {
        for col in 0..n {
            // Outer labels only, like a shared-axis grid
            let x_label = (row == n - 1).then_some(columns[col].as_str());
            let y_label = (col == 0).then_some(columns[row].as_str());

            let panel = if row == col {
                let values: Vec<f64> = data[col].iter().flatten().copied().collect();
                match StatsCalculator::histogram(&values) {
                    Some(hist) => {
                        let mut panel = Panel::new(
                            Axis::new(x_label, Scale::fit(hist.edges.iter().copied())),
                            Axis::new(
                                y_label,
                                Scale::fit_from_zero(hist.counts.iter().map(|&c| c as f64)),
                            ),
                        );
                        for (i, &count) in hist.counts.iter().enumerate() {
                            panel.push(Mark::Rect {
                                corners: [(hist.edges[i], 0.0), (hist.edges[i + 1], count as f64)],
                                style: Style::fill(color).alpha(0.8),
                            });
                        }
                        panel
                    }
                    None => Panel::new(
                        Axis::new(x_label, Scale::fit(Vec::<f64>::new())),
                        Axis::new(y_label, Scale::fit(Vec::<f64>::new())),
                    ),
                }
            } else {
                let (xs, ys) = complete_pairs(&data[col], &data[row]);
                let mut panel = Panel::new(
                    Axis::new(x_label, Scale::fit(xs.iter().copied())),
                    Axis::new(y_label, Scale::fit(ys.iter().copied())),
                );
                panel.push(Mark::Points {
                    points: xs.into_iter().zip(ys).collect(),
                    radius: 2,
                    style: Style::fill(color).alpha(0.8),
                    label: None,
                });
                panel
            };
            figure.add_panel(panel);
        }
    }
    Ok(figure)
}
