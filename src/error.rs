//! Error types for chart building and export.

use plotters::drawing::DrawingAreaErrorKind;
use polars::prelude::{DataType, PolarsError};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum PlotError {
    #[error("Polars error: {0}")]
    Polars(#[from] PolarsError),
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Image encoding failed: {0}")]
    Image(#[from] image::ImageError),
    #[error("Invalid config: {0}")]
    Config(#[from] serde_json::Error),
    #[error("Rendering failed: {0}")]
    Render(String),
    #[error("Failed to load bundled font")]
    Font,
    #[error("Unsupported output format: {0}")]
    UnsupportedFormat(String),
    #[error("Column '{column}' has non-numeric dtype {dtype}")]
    NonNumericColumn { column: String, dtype: DataType },
    #[error("Table has no numeric columns")]
    NoNumericColumns,
    #[error("{0}")]
    MissingArgument(&'static str),
    #[error("{0}")]
    InvalidArgument(&'static str),
}

impl<E> From<DrawingAreaErrorKind<E>> for PlotError
where
    E: std::error::Error + Send + Sync,
{
    fn from(err: DrawingAreaErrorKind<E>) -> Self {
        PlotError::Render(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, PlotError>;
