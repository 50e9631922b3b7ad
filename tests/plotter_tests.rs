use polars::prelude::*;
use regex::Regex;
use std::fs;
use std::path::{Path, PathBuf};
use tabplot::charts::{Mark, Scale};
use tabplot::{ChartKind, ChartPlotter, ChartRequest, PlotError, PlotterConfig};
use tempfile::TempDir;

fn sample() -> DataFrame {
    DataFrame::new(vec![
        Column::new("a".into(), vec![1i64, 2, 3, 4, 5, 6, 7, 8]),
        Column::new("b".into(), vec!["x", "y", "x", "y", "z", "x", "y", "z"]),
        Column::new(
            "label".into(),
            vec![1.2, 2.3, 2.9, 4.4, 5.1, 5.8, 7.2, 8.1],
        ),
    ])
    .unwrap()
}

fn request_for(kind: ChartKind) -> ChartRequest {
    match kind {
        ChartKind::Pair | ChartKind::CorrelationHeatmap => ChartRequest::new(),
        ChartKind::Count => ChartRequest::new().x("b"),
        ChartKind::Scatter | ChartKind::Line | ChartKind::LinearModel => {
            ChartRequest::new().x("a").y("label")
        }
        _ => ChartRequest::new().x("b").y("label"),
    }
}

fn listing(dir: &Path) -> Vec<PathBuf> {
    let mut files: Vec<PathBuf> = fs::read_dir(dir)
        .unwrap()
        .map(|entry| entry.unwrap().path())
        .collect();
    files.sort();
    files
}

#[test]
fn disabled_persistence_writes_nothing() {
    let scratch = TempDir::new().unwrap();
    let out = scratch.path().join("plots");
    let config = PlotterConfig {
        path: out.clone(),
        ..Default::default()
    };
    let plotter = ChartPlotter::new(config).unwrap();

    for kind in ChartKind::ALL {
        let figure = plotter.plot(kind, &sample(), &request_for(kind)).unwrap();
        assert!(figure.saved_to().is_none(), "{} was saved", kind);
    }
    assert_eq!(plotter.export_table_as_png(&sample(), 25).unwrap(), None);
    assert!(!out.exists());
}

#[test]
fn every_kind_persists_one_named_file() {
    let scratch = TempDir::new().unwrap();
    let plotter = ChartPlotter::new(PlotterConfig::persisting(scratch.path(), "svg")).unwrap();

    for kind in ChartKind::ALL {
        let before = listing(scratch.path()).len();
        let figure = plotter.plot(kind, &sample(), &request_for(kind)).unwrap();
        let files = listing(scratch.path());
        assert_eq!(files.len(), before + 1, "{} wrote {} files", kind, files.len() - before);

        let saved = figure.saved_to().unwrap();
        let name = saved.file_name().unwrap().to_string_lossy().to_string();
        let pattern = format!(
            r"^{}-\d{{1,2}}_\d{{1,2}}_\d{{4}}-\d{{1,2}}:\d{{1,2}}:\d{{1,2}}(-\d+)?\.svg$",
            regex::escape(kind.tag())
        );
        assert!(Regex::new(&pattern).unwrap().is_match(&name), "{}", name);
        assert!(fs::read_to_string(saved).unwrap().starts_with("<svg"));
    }
}

#[test]
fn raster_format_is_honoured() {
    let scratch = TempDir::new().unwrap();
    let plotter = ChartPlotter::new(PlotterConfig::persisting(scratch.path(), "png")).unwrap();
    let figure = plotter
        .boxplot(&sample(), Some("b"), Some("label"), Some("Boxes"))
        .unwrap();

    let saved = figure.saved_to().unwrap();
    assert_eq!(saved.extension().unwrap(), "png");
    let decoded = image::open(saved).unwrap();
    assert_eq!((decoded.width(), decoded.height()), figure.size());
}

#[test]
fn table_snapshot_is_always_png() {
    let scratch = TempDir::new().unwrap();
    let plotter = ChartPlotter::new(PlotterConfig::persisting(scratch.path(), "svg")).unwrap();

    let path = plotter.export_table_as_png(&sample(), 5).unwrap().unwrap();
    let name = path.file_name().unwrap().to_string_lossy().to_string();
    assert!(name.starts_with("table-"));
    assert!(name.ends_with(".png"));
    assert!(image::open(&path).is_ok());
}

#[test]
fn regression_sweep_plots_numeric_features_against_label() {
    let scratch = TempDir::new().unwrap();
    let plotter = ChartPlotter::new(PlotterConfig::persisting(scratch.path(), "svg")).unwrap();

    let figures = plotter.regression_plot(&sample(), "label").unwrap();
    assert_eq!(figures.len(), 1);
    assert_eq!(figures[0].title(), Some("label:a"));
    assert_eq!(figures[0].kind(), Some(ChartKind::LinearModel));
    assert_eq!(listing(scratch.path()).len(), 1);
}

#[test]
fn per_column_sweeps_follow_column_order() {
    let plotter = ChartPlotter::new(PlotterConfig::default()).unwrap();

    let counts = plotter.count_unique_plot(&sample()).unwrap();
    let labels: Vec<_> = counts
        .iter()
        .map(|f| f.panels()[0].x.label.clone().unwrap())
        .collect();
    assert_eq!(labels, vec!["a", "b", "label"]);

    let boxes = plotter.show_outliers(&sample()).unwrap();
    assert_eq!(boxes.len(), 3);
    assert!(boxes.iter().all(|f| f.kind() == Some(ChartKind::Box)));
}

#[test]
fn two_facades_share_a_directory() {
    let scratch = TempDir::new().unwrap();
    let out = scratch.path().join("plots");
    ChartPlotter::new(PlotterConfig::persisting(&out, "svg")).unwrap();
    ChartPlotter::new(PlotterConfig::persisting(&out, "svg")).unwrap();
    assert!(out.is_dir());
}

#[test]
fn unusable_directory_fails_construction() {
    let scratch = TempDir::new().unwrap();
    let out = scratch.path().join("missing").join("plots");
    let err = ChartPlotter::new(PlotterConfig::persisting(&out, "svg")).unwrap_err();
    assert!(matches!(err, PlotError::Io(_)));
}

#[test]
fn same_second_saves_do_not_overwrite() {
    let scratch = TempDir::new().unwrap();
    let plotter = ChartPlotter::new(PlotterConfig::persisting(scratch.path(), "svg")).unwrap();
    let figure = plotter
        .scatterplot(&sample(), Some("a"), Some("label"), None)
        .unwrap();

    let first = plotter.save_plot(&figure, "burst").unwrap();
    let second = plotter.save_plot(&figure, "burst").unwrap();
    assert_ne!(first, second);
    assert!(first.exists() && second.exists());
}

#[test]
fn column_errors_surface_unchanged() {
    let plotter = ChartPlotter::new(PlotterConfig::default()).unwrap();

    let missing = plotter.violinplot(&sample(), Some("b"), Some("nope"), None);
    assert!(matches!(missing, Err(PlotError::Polars(_))));

    let strings = plotter.lmplot(&sample(), Some("b"), Some("label"), None);
    assert!(matches!(strings, Err(PlotError::NonNumericColumn { .. })));
}

#[test]
fn figures_are_independent() {
    let plotter = ChartPlotter::new(PlotterConfig::default()).unwrap();
    let titled = plotter
        .barplot(&sample(), Some("b"), Some("label"), Some("First"))
        .unwrap();
    let plain = plotter
        .barplot(&sample(), Some("b"), Some("label"), None)
        .unwrap();

    assert_eq!(titled.title(), Some("First"));
    assert_eq!(plain.title(), None);
    assert_eq!(titled.panels(), plain.panels());
}

#[test]
fn heatmap_annotates_every_pair() {
    let plotter = ChartPlotter::new(PlotterConfig::default()).unwrap();
    let figure = plotter.correlation_heatmap(&sample(), Some("Corr")).unwrap();
    let annotations = figure.panels()[0]
        .marks
        .iter()
        .filter(|m| matches!(m, Mark::Text { .. }))
        .count();
    assert_eq!(annotations, 4);
    assert!(figure.colorbar().is_some());
    assert!(figure.to_svg().unwrap().contains("Corr"));
}

#[test]
fn every_kind_renders_to_both_backends() {
    let plotter = ChartPlotter::new(PlotterConfig::default()).unwrap();
    for kind in ChartKind::ALL {
        let figure = plotter.plot(kind, &sample(), &request_for(kind)).unwrap();
        assert!(figure.to_svg().is_ok(), "{} failed as svg", kind);
        let image = figure.to_rgb_image().unwrap();
        assert_eq!(image.dimensions(), figure.size());
    }
}

#[test]
fn date_columns_plot_on_a_time_axis() {
    let day = Column::new("day".into(), (0..30).collect::<Vec<i32>>())
        .cast(&DataType::Date)
        .unwrap();
    let sales = Column::new("sales".into(), (0..30).map(|i| f64::from(i % 5)).collect::<Vec<_>>());
    let data = DataFrame::new(vec![day, sales]).unwrap();
    let plotter = ChartPlotter::new(PlotterConfig::default()).unwrap();

    let scatter = plotter.scatterplot(&data, Some("day"), Some("sales"), None).unwrap();
    let line = plotter.lineplot(&data, Some("day"), Some("sales"), None).unwrap();
    for figure in [scatter, line] {
        assert!(matches!(figure.panels()[0].x.scale, Scale::Time { .. }));
        assert!(figure.to_svg().unwrap().contains("1970-01-"));
    }
}
