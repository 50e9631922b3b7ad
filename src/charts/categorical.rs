//! Categorical charts: one distribution or estimate per category.
//!
//! Every builder here goes through [`resolve`], which turns the x/y
//! selectors into ordered groups and an orientation. Vertical charts put
//! categories on x and values on y; horizontal charts swap them.

use crate::charts::figure::{Axis, Figure, Mark, Panel, Scale, Style};
use crate::charts::kind::ChartKind;
use crate::charts::palette::{lighten, pick, EDGE_GRAY};
use crate::config::Theme;
use crate::data::DataProcessor;
use crate::error::{PlotError, Result};
use crate::stats::StatsCalculator;
use plotters::style::WHITE;
use polars::prelude::DataFrame;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Half-range of the uniform offset applied to strip points.
pub const STRIP_JITTER: f64 = 0.2;
const JITTER_SEED: u64 = 0x5EED;

/// Half-width of boxes, bars and violins in category units.
const HALF_WIDTH: f64 = 0.4;
const KDE_POINTS: usize = 128;
const POINT_RADIUS: u32 = 3;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Orientation {
    /// Categories along x.
    Vertical,
    /// Categories along y.
    Horizontal,
}

impl Orientation {
    /// Data coordinate of `value` at category offset `pos`.
    fn place(&self, pos: f64, value: f64) -> (f64, f64) {
        match self {
            Orientation::Vertical => (pos, value),
            Orientation::Horizontal => (value, pos),
        }
    }

    fn rect(&self, pos_lo: f64, pos_hi: f64, lo: f64, hi: f64) -> [(f64, f64); 2] {
        [self.place(pos_lo, lo), self.place(pos_hi, hi)]
    }
}

/// Values grouped by category, in display order.
#[derive(Debug, Clone, PartialEq)]
pub struct Groups {
    pub orientation: Orientation,
    pub category_label: Option<String>,
    pub value_label: Option<String>,
    pub groups: Vec<(String, Vec<f64>)>,
}

impl Groups {
    fn names(&self) -> Vec<String> {
        self.groups.iter().map(|(name, _)| name.clone()).collect()
    }

    fn values(&self) -> impl Iterator<Item = f64> + '_ {
        self.groups.iter().flat_map(|(_, values)| values.iter().copied())
    }

    /// Assemble the single panel of a categorical chart.
    fn panel(&self, value_scale: Scale) -> Panel {
        let categories = Axis::new(self.category_label.as_deref(), Scale::Category(self.names()));
        let values = Axis::new(self.value_label.as_deref(), value_scale);
        match self.orientation {
            Orientation::Vertical => Panel::new(categories, values),
            Orientation::Horizontal => Panel::new(values, categories),
        }
    }
}

fn single_group(df: &DataFrame, name: &str, orientation: Orientation) -> Result<Groups> {
    let column = df.column(name)?;
    if DataProcessor::is_numeric(column.dtype()) {
        let values = DataProcessor::numeric_values(df, name)?.into_iter().flatten().collect();
        return Ok(Groups {
            orientation,
            category_label: None,
            value_label: Some(name.to_string()),
            groups: vec![(String::new(), values)],
        });
    }

    // A lone categorical selector lays out its categories with no values
    let flipped = match orientation {
        Orientation::Vertical => Orientation::Horizontal,
        Orientation::Horizontal => Orientation::Vertical,
    };
    let groups = DataProcessor::category_order(df, name)?
        .into_iter()
        .map(|c| (c, Vec::new()))
        .collect();
    Ok(Groups {
        orientation: flipped,
        category_label: Some(name.to_string()),
        value_label: None,
        groups,
    })
}

/// Resolve x/y selectors into groups.
///
/// - x and y: the numeric side is the value; y wins when both are numeric
/// - only x: one horizontal distribution
/// - only y: one vertical distribution
/// - neither: one category per numeric column
pub fn resolve(df: &DataFrame, x: Option<&str>, y: Option<&str>) -> Result<Groups> {
    match (x, y) {
        (Some(x), Some(y)) => {
            let y_dtype = df.column(y)?.dtype().clone();
            let x_numeric = DataProcessor::is_numeric(df.column(x)?.dtype());

            let (orientation, category, value) = if DataProcessor::is_numeric(&y_dtype) {
                (Orientation::Vertical, x, y)
            } else if x_numeric {
                (Orientation::Horizontal, y, x)
            } else {
                return Err(PlotError::NonNumericColumn {
                    column: y.to_string(),
                    dtype: y_dtype,
                });
            };
            Ok(Groups {
                orientation,
                category_label: Some(category.to_string()),
                value_label: Some(value.to_string()),
                groups: DataProcessor::group_by_category(df, category, value)?,
            })
        }
        (Some(x), None) => single_group(df, x, Orientation::Horizontal),
        (None, Some(y)) => single_group(df, y, Orientation::Vertical),
        (None, None) => {
            let columns = DataProcessor::numeric_columns(df);
            if columns.is_empty() {
                return Err(PlotError::NoNumericColumns);
            }
            let groups = columns
                .into_iter()
                .map(|name| {
                    let values = DataProcessor::numeric_values(df, &name)?;
                    Ok((name, values.into_iter().flatten().collect()))
                })
                .collect::<Result<Vec<_>>>()?;
            Ok(Groups {
                orientation: Orientation::Vertical,
                category_label: None,
                value_label: None,
                groups,
            })
        }
    }
}

fn finish(kind: ChartKind, theme: &Theme, panel: Panel) -> Figure {
    let mut figure = Figure::new(kind, theme);
    figure.add_panel(panel);
    figure
}

fn strip_panel(groups: &Groups, theme: &Theme) -> Panel {
    let mut rng = StdRng::seed_from_u64(JITTER_SEED);
    let mut panel = groups.panel(Scale::fit(groups.values()));

    for (i, (_, values)) in groups.groups.iter().enumerate() {
        let points = values
            .iter()
            .map(|&v| {
                let offset = rng.gen_range(-STRIP_JITTER..=STRIP_JITTER);
                groups.orientation.place(i as f64 + offset, v)
            })
            .collect();
        panel.push(Mark::Points {
            points,
            radius: POINT_RADIUS,
            style: Style::fill(pick(&theme.palette, i)).alpha(0.8),
            label: None,
        });
    }
    panel
}

pub fn strip(df: &DataFrame, x: Option<&str>, y: Option<&str>, theme: &Theme) -> Result<Figure> {
    let groups = resolve(df, x, y)?;
    Ok(finish(ChartKind::Strip, theme, strip_panel(&groups, theme)))
}

/// Figure-level strip chart on its own square canvas.
pub fn cat(df: &DataFrame, x: Option<&str>, y: Option<&str>, theme: &Theme) -> Result<Figure> {
    let groups = resolve(df, x, y)?;
    Ok(finish(ChartKind::Category, theme, strip_panel(&groups, theme)))
}

/// Offsets, perpendicular to the value axis, that keep points of diameter
/// `diameter` from overlapping. Inputs and outputs are in pixels.
///
/// Points are placed in value order at the free position closest to the
/// centre line.
pub fn beeswarm_positions(values_px: &[f64], diameter: f64) -> Vec<f64> {
    let mut order: Vec<usize> = (0..values_px.len()).collect();
    order.sort_by(|&a, &b| {
        values_px[a]
            .partial_cmp(&values_px[b])
            .unwrap_or(std::cmp::Ordering::Equal)
    });

    let mut offsets = vec![0.0; values_px.len()];
    let mut placed: Vec<(f64, f64)> = Vec::new();
    let min_gap = diameter * 0.999;

    for idx in order {
        let v = values_px[idx];
        let neighbours: Vec<(f64, f64)> = placed
            .iter()
            .copied()
            .filter(|&(pv, _)| (v - pv).abs() < diameter)
            .collect();

        let mut candidates = vec![0.0];
        for &(pv, po) in &neighbours {
            let dx = (diameter * diameter - (v - pv).powi(2)).max(0.0).sqrt();
            candidates.push(po + dx);
            candidates.push(po - dx);
        }
        candidates.sort_by(|a: &f64, b: &f64| {
            a.abs()
                .partial_cmp(&b.abs())
                .unwrap_or(std::cmp::Ordering::Equal)
        });

        let offset = candidates
            .into_iter()
            .find(|&c| {
                neighbours
                    .iter()
                    .all(|&(pv, po)| ((v - pv).powi(2) + (c - po).powi(2)).sqrt() >= min_gap)
            })
            .unwrap_or(0.0);
        offsets[idx] = offset;
        placed.push((v, offset));
    }
    offsets
}

pub fn swarm(df: &DataFrame, x: Option<&str>, y: Option<&str>, theme: &Theme) -> Result<Figure> {
    let groups = resolve(df, x, y)?;
    let value_scale = Scale::fit(groups.values());
    let value_range = value_scale.range();
    let mut panel = groups.panel(value_scale);

    // Approximate plotting area, minus axis labels and margins
    let (width, height) = theme.figure_size;
    let (value_px, category_px) = match groups.orientation {
        Orientation::Vertical => (height.saturating_sub(80), width.saturating_sub(100)),
        Orientation::Horizontal => (width.saturating_sub(100), height.saturating_sub(80)),
    };
    let px_per_value = value_px.max(1) as f64 / (value_range.end - value_range.start);
    let px_per_category = category_px.max(1) as f64 / groups.groups.len().max(1) as f64;
    let diameter = (2 * POINT_RADIUS + 1) as f64;

    for (i, (name, values)) in groups.groups.iter().enumerate() {
        let scaled: Vec<f64> = values.iter().map(|v| v * px_per_value).collect();
        let offsets = beeswarm_positions(&scaled, diameter);
        let limit = HALF_WIDTH + 0.05;
        if offsets.iter().any(|o| (o / px_per_category).abs() > limit) {
            log::warn!("Swarm for '{}' does not fit; some points overlap", name);
        }

        let points = values
            .iter()
            .zip(offsets)
            .map(|(&v, o)| {
                let offset = (o / px_per_category).clamp(-limit, limit);
                groups.orientation.place(i as f64 + offset, v)
            })
            .collect();
        panel.push(Mark::Points {
            points,
            radius: POINT_RADIUS,
            style: Style::fill(pick(&theme.palette, i)),
            label: None,
        });
    }
    Ok(finish(ChartKind::Swarm, theme, panel))
}

pub fn violin(df: &DataFrame, x: Option<&str>, y: Option<&str>, theme: &Theme) -> Result<Figure> {
    let groups = resolve(df, x, y)?;
    let orientation = groups.orientation;
    let curves: Vec<Option<Vec<(f64, f64)>>> = groups
        .groups
        .iter()
        .map(|(_, values)| StatsCalculator::kde(values, KDE_POINTS))
        .collect();

    let extent: Vec<f64> = groups
        .values()
        .chain(curves.iter().flatten().flatten().map(|&(v, _)| v))
        .collect();
    let mut panel = groups.panel(Scale::fit(extent));

    for (i, ((_, values), curve)) in groups.groups.iter().zip(&curves).enumerate() {
        let pos = i as f64;
        let color = pick(&theme.palette, i);

        if let Some(curve) = curve {
            let peak = curve.iter().map(|p| p.1).fold(0.0, f64::max);
            let scale = if peak > 0.0 { HALF_WIDTH / peak } else { 0.0 };
            let mut outline: Vec<(f64, f64)> = curve
                .iter()
                .map(|&(v, d)| orientation.place(pos + d * scale, v))
                .collect();
            outline.extend(
                curve
                    .iter()
                    .rev()
                    .map(|&(v, d)| orientation.place(pos - d * scale, v)),
            );
            panel.push(Mark::Polygon {
                points: outline.clone(),
                style: Style::fill(lighten(color, 0.15)),
            });
            outline.push(outline[0]);
            panel.push(Mark::Line {
                points: outline,
                style: Style::stroke(EDGE_GRAY, 1),
                label: None,
            });
        }

        if let Some(stats) = StatsCalculator::box_stats(values) {
            panel.push(Mark::Segment {
                from: orientation.place(pos, stats.whisker_low),
                to: orientation.place(pos, stats.whisker_high),
                style: Style::stroke(EDGE_GRAY, 1),
            });
            panel.push(Mark::Segment {
                from: orientation.place(pos, stats.q1),
                to: orientation.place(pos, stats.q3),
                style: Style::stroke(EDGE_GRAY, 5),
            });
            panel.push(Mark::Points {
                points: vec![orientation.place(pos, stats.median)],
                radius: 2,
                style: Style::fill(WHITE),
                label: None,
            });
        }
    }
    Ok(finish(ChartKind::Violin, theme, panel))
}

fn flier_marks(points: Vec<(f64, f64)>) -> Mark {
    Mark::Points {
        points,
        radius: POINT_RADIUS,
        style: Style::stroke(EDGE_GRAY, 1),
        label: None,
    }
}

pub fn boxplot(df: &DataFrame, x: Option<&str>, y: Option<&str>, theme: &Theme) -> Result<Figure> {
    let groups = resolve(df, x, y)?;
    let orientation = groups.orientation;
    let mut panel = groups.panel(Scale::fit(groups.values()));

    for (i, (_, values)) in groups.groups.iter().enumerate() {
        let Some(stats) = StatsCalculator::box_stats(values) else {
            continue;
        };
        let pos = i as f64;
        let color = pick(&theme.palette, i);
        let cap = HALF_WIDTH / 2.0;

        let corners = orientation.rect(pos - HALF_WIDTH, pos + HALF_WIDTH, stats.q1, stats.q3);
        panel.push(Mark::Rect {
            corners,
            style: Style::fill(color),
        });
        panel.push(Mark::Rect {
            corners,
            style: Style::stroke(EDGE_GRAY, 1),
        });

        let segments = [
            (pos - HALF_WIDTH, pos + HALF_WIDTH, stats.median, stats.median),
            (pos, pos, stats.q1, stats.whisker_low),
            (pos, pos, stats.q3, stats.whisker_high),
            (pos - cap, pos + cap, stats.whisker_low, stats.whisker_low),
            (pos - cap, pos + cap, stats.whisker_high, stats.whisker_high),
        ];
        for (p0, p1, v0, v1) in segments {
            panel.push(Mark::Segment {
                from: orientation.place(p0, v0),
                to: orientation.place(p1, v1),
                style: Style::stroke(EDGE_GRAY, if v0 == v1 && p0 != p1 { 2 } else { 1 }),
            });
        }

        if !stats.outliers.is_empty() {
            let fliers = stats.outliers.iter().map(|&v| orientation.place(pos, v)).collect();
            panel.push(flier_marks(fliers));
        }
    }
    Ok(finish(ChartKind::Box, theme, panel))
}

/// Letter-value boxes: the quartile box is widest, each deeper level narrower
/// and lighter.
pub fn boxen(df: &DataFrame, x: Option<&str>, y: Option<&str>, theme: &Theme) -> Result<Figure> {
    let groups = resolve(df, x, y)?;
    let orientation = groups.orientation;
    let mut panel = groups.panel(Scale::fit(groups.values()));

    for (i, (_, values)) in groups.groups.iter().enumerate() {
        let Some(letters) = StatsCalculator::letter_values(values) else {
            continue;
        };
        let pos = i as f64;
        let color = pick(&theme.palette, i);
        let depth = letters.levels.len();

        // Outermost first so inner boxes draw on top
        for (level, &(lo, hi)) in letters.levels.iter().enumerate().rev() {
            let half = HALF_WIDTH * (1.0 - level as f64 / (depth + 1) as f64);
            let corners = orientation.rect(pos - half, pos + half, lo, hi);
            panel.push(Mark::Rect {
                corners,
                style: Style::fill(lighten(color, level as f64 / (depth + 1) as f64)),
            });
            panel.push(Mark::Rect {
                corners,
                style: Style::stroke(WHITE, 1),
            });
        }

        panel.push(Mark::Segment {
            from: orientation.place(pos - HALF_WIDTH, letters.median),
            to: orientation.place(pos + HALF_WIDTH, letters.median),
            style: Style::stroke(EDGE_GRAY, 2),
        });
        if !letters.outliers.is_empty() {
            let fliers = letters.outliers.iter().map(|&v| orientation.place(pos, v)).collect();
            panel.push(flier_marks(fliers));
        }
    }
    Ok(finish(ChartKind::Boxen, theme, panel))
}

/// Mean bars with t-interval error bars.
pub fn bar(df: &DataFrame, x: Option<&str>, y: Option<&str>, theme: &Theme) -> Result<Figure> {
    let groups = resolve(df, x, y)?;
    let orientation = groups.orientation;
    let estimates: Vec<_> = groups
        .groups
        .iter()
        .map(|(_, values)| StatsCalculator::mean_ci(values))
        .collect();

    let extent = estimates.iter().flatten().flat_map(|e| [e.low, e.high]);
    let mut panel = groups.panel(Scale::fit_from_zero(extent));

    for (i, estimate) in estimates.iter().enumerate() {
        let Some(estimate) = estimate else {
            continue;
        };
        let pos = i as f64;
        panel.push(Mark::Rect {
            corners: orientation.rect(pos - HALF_WIDTH, pos + HALF_WIDTH, 0.0, estimate.mean),
            style: Style::fill(pick(&theme.palette, i)),
        });
        if estimate.high > estimate.low {
            panel.push(Mark::Segment {
                from: orientation.place(pos, estimate.low),
                to: orientation.place(pos, estimate.high),
                style: Style::stroke(EDGE_GRAY, 2),
            });
        }
    }
    Ok(finish(ChartKind::Bar, theme, panel))
}

/// Mean markers joined by a line, with t-interval bars.
pub fn point(df: &DataFrame, x: Option<&str>, y: Option<&str>, theme: &Theme) -> Result<Figure> {
    let groups = resolve(df, x, y)?;
    let orientation = groups.orientation;
    let color = pick(&theme.palette, 0);

    let estimates: Vec<(f64, _)> = groups
        .groups
        .iter()
        .enumerate()
        .filter_map(|(i, (_, values))| Some((i as f64, StatsCalculator::mean_ci(values)?)))
        .collect();
    let extent = estimates.iter().flat_map(|(_, e)| [e.low, e.high]);
    let mut panel = groups.panel(Scale::fit(extent));

    for (pos, estimate) in &estimates {
        if estimate.high > estimate.low {
            panel.push(Mark::Segment {
                from: orientation.place(*pos, estimate.low),
                to: orientation.place(*pos, estimate.high),
                style: Style::stroke(color, 2),
            });
        }
    }
    let means: Vec<(f64, f64)> = estimates
        .iter()
        .map(|(pos, e)| orientation.place(*pos, e.mean))
        .collect();
    panel.push(Mark::Line {
        points: means.clone(),
        style: Style::stroke(color, 2),
        label: None,
    });
    panel.push(Mark::Points {
        points: means,
        radius: 5,
        style: Style::fill(color),
        label: None,
    });
    Ok(finish(ChartKind::Point, theme, panel))
}

/// Row count per distinct value of x (vertical bars) or y (horizontal bars).
pub fn count(df: &DataFrame, x: Option<&str>, y: Option<&str>, theme: &Theme) -> Result<Figure> {
    let (name, orientation) = match (x, y) {
        (Some(x), None) => (x, Orientation::Vertical),
        (None, Some(y)) => (y, Orientation::Horizontal),
        (Some(_), Some(_)) => {
            return Err(PlotError::InvalidArgument(
                "countplot takes either x or y, not both",
            ))
        }
        (None, None) => return Err(PlotError::MissingArgument("countplot requires x or y")),
    };

    let counts = DataProcessor::value_counts(df, name)?;
    let groups = Groups {
        orientation,
        category_label: Some(name.to_string()),
        value_label: Some("count".to_string()),
        groups: counts.iter().map(|(c, _)| (c.clone(), Vec::new())).collect(),
    };
    let mut panel = groups.panel(Scale::fit_from_zero(counts.iter().map(|(_, n)| *n as f64)));

    for (i, (_, n)) in counts.iter().enumerate() {
        let pos = i as f64;
        panel.push(Mark::Rect {
            corners: orientation.rect(pos - HALF_WIDTH, pos + HALF_WIDTH, 0.0, *n as f64),
            style: Style::fill(pick(&theme.palette, i)),
        });
    }
    Ok(finish(ChartKind::Count, theme, panel))
}

#[cfg(test)]
mod tests {
    use super::*;
    use polars::prelude::*;

    fn sample() -> DataFrame {
        DataFrame::new(vec![
            Column::new("group".into(), vec!["b", "a", "b", "a", "b", "c"]),
            Column::new("value".into(), vec![1.0, 2.0, 3.0, 4.0, 5.0, 6.0]),
            Column::new("other".into(), vec![6i64, 5, 4, 3, 2, 1]),
        ])
        .unwrap()
    }

    fn points_of(panel: &Panel) -> Vec<(f64, f64)> {
        panel
            .marks
            .iter()
            .flat_map(|m| match m {
                Mark::Points { points, .. } => points.clone(),
                _ => Vec::new(),
            })
            .collect()
    }

    #[test]
    fn string_x_numeric_y_is_vertical() {
        let groups = resolve(&sample(), Some("group"), Some("value")).unwrap();
        assert_eq!(groups.orientation, Orientation::Vertical);
        assert_eq!(
            groups.groups,
            vec![
                ("b".to_string(), vec![1.0, 3.0, 5.0]),
                ("a".to_string(), vec![2.0, 4.0]),
                ("c".to_string(), vec![6.0]),
            ]
        );
    }

    #[test]
    fn numeric_x_string_y_is_horizontal() {
        let groups = resolve(&sample(), Some("value"), Some("group")).unwrap();
        assert_eq!(groups.orientation, Orientation::Horizontal);
        assert_eq!(groups.category_label.as_deref(), Some("group"));
    }

    #[test]
    fn two_string_columns_are_rejected() {
        let df = DataFrame::new(vec![
            Column::new("a".into(), vec!["x"]),
            Column::new("b".into(), vec!["y"]),
        ])
        .unwrap();
        let err = resolve(&df, Some("a"), Some("b")).unwrap_err();
        assert!(matches!(err, PlotError::NonNumericColumn { ref column, .. } if column == "b"));
    }

    #[test]
    fn wide_form_uses_numeric_columns() {
        let groups = resolve(&sample(), None, None).unwrap();
        let names: Vec<_> = groups.groups.iter().map(|(n, _)| n.as_str()).collect();
        assert_eq!(names, vec!["value", "other"]);
    }

    #[test]
    fn lone_string_selector_lists_categories() {
        let groups = resolve(&sample(), Some("group"), None).unwrap();
        assert_eq!(groups.orientation, Orientation::Vertical);
        assert_eq!(groups.groups.len(), 3);
        assert!(groups.groups.iter().all(|(_, v)| v.is_empty()));
        assert!(boxplot(&sample(), Some("group"), None, &Theme::default()).is_ok());
    }

    #[test]
    fn strip_jitter_is_bounded_and_reproducible() {
        let theme = Theme::default();
        let first = strip(&sample(), Some("group"), Some("value"), &theme).unwrap();
        let second = strip(&sample(), Some("group"), Some("value"), &theme).unwrap();
        let points = points_of(&first.panels()[0]);
        assert_eq!(points, points_of(&second.panels()[0]));
        assert_eq!(points.len(), 6);
        for (x, _) in points {
            let nearest = x.round();
            assert!((x - nearest).abs() <= STRIP_JITTER + 1e-12);
        }
    }

    #[test]
    fn cat_is_square() {
        let figure = cat(&sample(), Some("group"), Some("value"), &Theme::default()).unwrap();
        assert_eq!(figure.kind(), Some(ChartKind::Category));
        assert_eq!(figure.size().0, figure.size().1);
    }

    #[test]
    fn beeswarm_separates_ties() {
        let offsets = beeswarm_positions(&[10.0, 10.0, 10.0], 7.0);
        assert_eq!(offsets[0], 0.0);
        let mut sorted = offsets.clone();
        sorted.sort_by(|a, b| a.partial_cmp(b).unwrap());
        assert!(sorted.windows(2).all(|w| w[1] - w[0] >= 7.0 * 0.999));
    }

    #[test]
    fn beeswarm_keeps_distant_points_centred() {
        assert_eq!(beeswarm_positions(&[0.0, 50.0, 100.0], 7.0), vec![0.0, 0.0, 0.0]);
    }

    #[test]
    fn boxplot_draws_fliers() {
        let df = DataFrame::new(vec![Column::new(
            "v".into(),
            vec![1.0, 2.0, 3.0, 4.0, 5.0, 100.0],
        )])
        .unwrap();
        let figure = boxplot(&df, None, Some("v"), &Theme::default()).unwrap();
        assert_eq!(points_of(&figure.panels()[0]), vec![(0.0, 100.0)]);
    }

    #[test]
    fn horizontal_box_swaps_axes() {
        let figure = boxplot(&sample(), Some("value"), None, &Theme::default()).unwrap();
        let panel = &figure.panels()[0];
        assert!(matches!(panel.y.scale, Scale::Category(_)));
        assert_eq!(panel.x.label.as_deref(), Some("value"));
    }

    #[test]
    fn bars_start_at_zero() {
        let figure = bar(&sample(), Some("group"), Some("value"), &Theme::default()).unwrap();
        let panel = &figure.panels()[0];
        match &panel.marks[0] {
            Mark::Rect { corners, .. } => {
                assert_eq!(corners[0].1, 0.0);
                assert_eq!(corners[1].1, 3.0);
            }
            other => panic!("expected a bar, got {:?}", other),
        }
    }

    #[test]
    fn point_joins_means() {
        let figure = point(&sample(), Some("group"), Some("value"), &Theme::default()).unwrap();
        let line = figure.panels()[0]
            .marks
            .iter()
            .find_map(|m| match m {
                Mark::Line { points, .. } => Some(points.clone()),
                _ => None,
            })
            .unwrap();
        assert_eq!(line, vec![(0.0, 3.0), (1.0, 3.0), (2.0, 6.0)]);
    }

    #[test]
    fn count_needs_exactly_one_selector() {
        let theme = Theme::default();
        assert!(matches!(
            count(&sample(), Some("group"), Some("value"), &theme),
            Err(PlotError::InvalidArgument(_))
        ));
        assert!(matches!(
            count(&sample(), None, None, &theme),
            Err(PlotError::MissingArgument(_))
        ));
    }

    #[test]
    fn count_bars_match_value_counts() {
        let figure = count(&sample(), Some("group"), None, &Theme::default()).unwrap();
        let heights: Vec<f64> = figure.panels()[0]
            .marks
            .iter()
            .filter_map(|m| match m {
                Mark::Rect { corners, .. } => Some(corners[1].1),
                _ => None,
            })
            .collect();
        assert_eq!(heights, vec![3.0, 2.0, 1.0]);
    }

    #[test]
    fn violin_outline_is_symmetric() {
        let figure = violin(&sample(), None, Some("value"), &Theme::default()).unwrap();
        let Mark::Polygon { points, .. } = &figure.panels()[0].marks[0] else {
            panic!("expected violin body");
        };
        let half = points.len() / 2;
        let (right, left) = (points[0], points[points.len() - 1]);
        assert_eq!(half * 2, points.len());
        assert!((right.0 + left.0).abs() < 1e-9);
        assert_eq!(right.1, left.1);
    }
}
