//! Facade configuration and per-instance styling.

use crate::error::Result;
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};

/// Construction parameters for [`crate::charts::ChartPlotter`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlotterConfig {
    /// Write every chart to `path` as soon as it is built.
    pub save_plots: bool,
    pub path: PathBuf,
    /// File extension of persisted charts, e.g. "svg" or "png".
    pub format: String,
    pub theme: Theme,
}

impl Default for PlotterConfig {
    fn default() -> Self {
        Self {
            save_plots: false,
            path: PathBuf::from("./plots/"),
            format: "svg".to_string(),
            theme: Theme::default(),
        }
    }
}

impl PlotterConfig {
    /// Config that persists every chart into `path` using `format`.
    pub fn persisting(path: impl Into<PathBuf>, format: &str) -> Self {
        Self {
            save_plots: true,
            path: path.into(),
            format: format.to_string(),
            ..Default::default()
        }
    }

    /// Load a config from a JSON file. Missing keys keep their defaults.
    pub fn from_json_file(path: &Path) -> Result<Self> {
        let reader = BufReader::new(File::open(path)?);
        Ok(serde_json::from_reader(reader)?)
    }
}

/// Darkgrid styling, scoped to one facade instance.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Theme {
    /// Axes-level figure size in pixels.
    pub figure_size: (u32, u32),
    /// Side length of one facet for figure-level charts (pair, cat, lm).
    pub facet_size: u32,
    pub background: [u8; 3],
    pub grid: [u8; 3],
    pub x_tick_label_size: f64,
    pub y_tick_label_size: f64,
    pub axis_label_size: f64,
    pub title_size: f64,
    pub palette: Vec<[u8; 3]>,
}

impl Default for Theme {
    fn default() -> Self {
        Self {
            figure_size: (800, 400),
            facet_size: 500,
            background: [234, 234, 242],
            grid: [255, 255, 255],
            x_tick_label_size: 7.0,
            y_tick_label_size: 10.0,
            axis_label_size: 13.0,
            title_size: 17.0,
            palette: crate::charts::palette::DEEP.to_vec(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn defaults_match_documented_values() {
        let config = PlotterConfig::default();
        assert!(!config.save_plots);
        assert_eq!(config.path, PathBuf::from("./plots/"));
        assert_eq!(config.format, "svg");
        assert_eq!(config.theme.figure_size, (800, 400));
        assert_eq!(config.theme.x_tick_label_size, 7.0);
        assert_eq!(config.theme.y_tick_label_size, 10.0);
    }

    #[test]
    fn partial_json_keeps_defaults() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{"save_plots": true, "format": "png"}}"#).unwrap();

        let config = PlotterConfig::from_json_file(file.path()).unwrap();
        assert!(config.save_plots);
        assert_eq!(config.format, "png");
        assert_eq!(config.path, PathBuf::from("./plots/"));
        assert_eq!(config.theme, Theme::default());
    }

    #[test]
    fn malformed_json_is_a_config_error() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "{{ not json").unwrap();

        let err = PlotterConfig::from_json_file(file.path()).unwrap_err();
        assert!(matches!(err, crate::error::PlotError::Config(_)));
    }
}
