//! tabplot - statistical charts from Polars DataFrames
//!
//! [`charts::ChartPlotter`] builds one [`charts::Figure`] per chart call and,
//! when configured to, writes it to disk as
//! `{kind}-{day}_{month}_{year}-{hour}:{minute}:{second}.{ext}`.

pub mod charts;
pub mod config;
pub mod data;
pub mod error;
pub mod stats;

pub use charts::{ChartKind, ChartPlotter, ChartRequest, Figure};
pub use config::{PlotterConfig, Theme};
pub use error::{PlotError, Result};
