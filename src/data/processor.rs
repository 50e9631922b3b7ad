//! Data Processor Module
//! Pulls typed values, category labels and groups out of DataFrame columns.

use crate::error::{PlotError, Result};
use polars::prelude::*;

const MILLIS_PER_DAY: f64 = 86_400_000.0;

/// Values of one column mapped onto a continuous axis.
#[derive(Debug, Clone, PartialEq)]
pub struct AxisValues {
    pub values: Vec<Option<f64>>,
    /// Values are milliseconds since the Unix epoch.
    pub temporal: bool,
}

/// Column extraction helpers shared by every chart builder.
pub struct DataProcessor;

impl DataProcessor {
    /// Integer and floating-point dtypes.
    pub fn is_numeric(dtype: &DataType) -> bool {
        matches!(
            dtype,
            DataType::Float32
                | DataType::Float64
                | DataType::Int8
                | DataType::Int16
                | DataType::Int32
                | DataType::Int64
                | DataType::UInt8
                | DataType::UInt16
                | DataType::UInt32
                | DataType::UInt64
        )
    }

    /// Names of numeric columns, in table order.
    pub fn numeric_columns(df: &DataFrame) -> Vec<String> {
        df.get_columns()
            .iter()
            .filter(|col| Self::is_numeric(col.dtype()))
            .map(|col| col.name().to_string())
            .collect()
    }

    /// Column names, in table order.
    pub fn column_names(df: &DataFrame) -> Vec<String> {
        df.get_column_names()
            .iter()
            .map(|s| s.to_string())
            .collect()
    }

    /// Numeric column as f64. Nulls and NaNs come back as `None`.
    pub fn numeric_values(df: &DataFrame, name: &str) -> Result<Vec<Option<f64>>> {
        let column = df.column(name)?;
        if !Self::is_numeric(column.dtype()) {
            return Err(PlotError::NonNumericColumn {
                column: name.to_string(),
                dtype: column.dtype().clone(),
            });
        }

        let as_f64 = column.cast(&DataType::Float64)?;
        let values = as_f64
            .f64()?
            .into_iter()
            .map(|v| v.filter(|x| !x.is_nan()))
            .collect();
        Ok(values)
    }

    /// Numeric or date/datetime column mapped onto a continuous axis.
    pub fn axis_values(df: &DataFrame, name: &str) -> Result<AxisValues> {
        let column = df.column(name)?;
        let millis_per_unit = match column.dtype() {
            DataType::Date => MILLIS_PER_DAY,
            DataType::Datetime(TimeUnit::Milliseconds, _) => 1.0,
            DataType::Datetime(TimeUnit::Microseconds, _) => 1e-3,
            DataType::Datetime(TimeUnit::Nanoseconds, _) => 1e-6,
            _ => {
                return Ok(AxisValues {
                    values: Self::numeric_values(df, name)?,
                    temporal: false,
                })
            }
        };

        let physical = column.cast(&DataType::Int64)?;
        let values = physical
            .i64()?
            .into_iter()
            .map(|v| v.map(|raw| raw as f64 * millis_per_unit))
            .collect();
        Ok(AxisValues {
            values,
            temporal: true,
        })
    }

    /// Per-row display label of any column. Nulls come back as `None`.
    pub fn labels(df: &DataFrame, name: &str) -> Result<Vec<Option<String>>> {
        let column = df.column(name)?;
        let as_str = column.cast(&DataType::String)?;
        let labels = as_str
            .str()?
            .into_iter()
            .map(|v| v.map(|s| s.to_string()))
            .collect();
        Ok(labels)
    }

    /// Distinct labels of a column: numeric columns sort by value, everything
    /// else keeps first-appearance order.
    pub fn category_order(df: &DataFrame, name: &str) -> Result<Vec<String>> {
        let labels = Self::labels(df, name)?;
        let column = df.column(name)?;

        if Self::is_numeric(column.dtype()) {
            let values = Self::numeric_values(df, name)?;
            let mut keyed: Vec<(f64, String)> = values
                .into_iter()
                .zip(labels)
                .filter_map(|(v, l)| Some((v?, l?)))
                .collect();
            keyed.sort_by(|a, b| a.0.partial_cmp(&b.0).unwrap_or(std::cmp::Ordering::Equal));
            keyed.dedup_by(|a, b| a.1 == b.1);
            return Ok(keyed.into_iter().map(|(_, l)| l).collect());
        }

        let mut order: Vec<String> = Vec::new();
        for label in labels.into_iter().flatten() {
            if !order.contains(&label) {
                order.push(label);
            }
        }
        Ok(order)
    }

    /// Values of `value_col` grouped by the labels of `category_col`.
    /// Rows where either side is missing are dropped.
    pub fn group_by_category(
        df: &DataFrame,
        category_col: &str,
        value_col: &str,
    ) -> Result<Vec<(String, Vec<f64>)>> {
        let values = Self::numeric_values(df, value_col)?;
        let labels = Self::labels(df, category_col)?;
        let order = Self::category_order(df, category_col)?;

        let mut groups: Vec<(String, Vec<f64>)> =
            order.into_iter().map(|c| (c, Vec::new())).collect();

        for (label, value) in labels.into_iter().zip(values) {
            if let (Some(label), Some(value)) = (label, value) {
                if let Some((_, bucket)) = groups.iter_mut().find(|(c, _)| *c == label) {
                    bucket.push(value);
                }
            }
        }

        Ok(groups)
    }

    /// Row count per distinct label, in category order.
    pub fn value_counts(df: &DataFrame, name: &str) -> Result<Vec<(String, usize)>> {
        let labels = Self::labels(df, name)?;
        let order = Self::category_order(df, name)?;

        let counts = order
            .into_iter()
            .map(|category| {
                let n = labels
                    .iter()
                    .filter(|l| l.as_deref() == Some(category.as_str()))
                    .count();
                (category, n)
            })
            .collect();
        Ok(counts)
    }
}
