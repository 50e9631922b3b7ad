//! CSV Data Loader Module
//! Handles CSV file loading using Polars.

use polars::prelude::*;
use std::path::Path;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum LoaderError {
    #[error("Failed to load CSV: {0}")]
    CsvError(#[from] PolarsError),
    #[error("No data loaded")]
    NoData,
}

/// Loads a CSV file into a DataFrame with inferred column types.
/// Date-like text columns are parsed into Date/Datetime.
pub struct DataLoader {
    df: Option<DataFrame>,
}

impl Default for DataLoader {
    fn default() -> Self {
        Self::new()
    }
}

impl DataLoader {
    pub fn new() -> Self {
        Self { df: None }
    }

    /// Load a CSV file, replacing any previously loaded table.
    pub fn load_csv(&mut self, file_path: &Path) -> Result<&DataFrame, LoaderError> {
        let path = file_path.to_string_lossy().to_string();
        let df = LazyCsvReader::new(&path)
            .with_infer_schema_length(Some(10000))
            .with_try_parse_dates(true)
            .finish()?
            .collect()?;

        log::debug!(
            "Loaded {} rows x {} columns from {}",
            df.height(),
            df.width(),
            file_path.display()
        );

        self.df = Some(df);
        self.df.as_ref().ok_or(LoaderError::NoData)
    }

    /// Get the loaded DataFrame, taking ownership.
    pub fn into_dataframe(self) -> Result<DataFrame, LoaderError> {
        self.df.ok_or(LoaderError::NoData)
    }

    pub fn row_count(&self) -> usize {
        self.df.as_ref().map(|df| df.height()).unwrap_or(0)
    }
}
