//! Missing-value repair by per-dtype policy.
//!
//! Numeric columns take the column median, categorical columns the mode
//! (falling back to "Unknown"), boolean columns the mode (falling back to
//! `false`), date columns the column median date. Columns without nulls are
//! left untouched, so imputation is idempotent on a cleaned table.

use crate::utils::{
    boolean_mode, fill_boolean_nulls, fill_numeric_nulls, fill_string_nulls, string_mode,
};
use anyhow::Result;
use polars::prelude::*;
use tracing::debug;

/// Fallback for string columns with no mode (all-null column).
const UNKNOWN_CATEGORY: &str = "Unknown";

/// Repair every column that still holds nulls.
pub(crate) fn impute_missing(mut df: DataFrame) -> Result<DataFrame> {
    let column_names: Vec<String> = df
        .get_column_names()
        .into_iter()
        .map(|s| s.to_string())
        .collect();

    for col_name in &column_names {
        let series = df.column(col_name)?.as_materialized_series().clone();
        if series.null_count() == 0 {
            continue;
        }

        let filled = match series.dtype() {
            dtype if crate::utils::is_numeric_dtype(dtype) => impute_numeric(&series)?,
            DataType::Boolean => impute_boolean(&series)?,
            DataType::Date => impute_date(&series)?,
            _ => impute_categorical(&series)?,
        };

        debug!(
            "Imputed {} missing values in '{}'",
            series.null_count(),
            col_name
        );
        df.replace(col_name, filled)?;
    }

    Ok(df)
}

/// Numeric columns fill with the column median.
fn impute_numeric(series: &Series) -> Result<Series> {
    match series.median() {
        Some(median) => Ok(fill_numeric_nulls(series, median)?),
        // All-null numeric column has no median; zero keeps the dtype.
        None => Ok(fill_numeric_nulls(series, 0.0)?),
    }
}

/// Categorical columns fill with the mode, or "Unknown" when no mode exists.
fn impute_categorical(series: &Series) -> Result<Series> {
    let fill = string_mode(series).unwrap_or_else(|| UNKNOWN_CATEGORY.to_string());
    Ok(fill_string_nulls(series, &fill)?)
}

/// Boolean columns fill with the mode, or `false` when no mode exists.
fn impute_boolean(series: &Series) -> Result<Series> {
    let fill = boolean_mode(series).unwrap_or(false);
    Ok(fill_boolean_nulls(series, fill)?)
}

/// Date columns fill with the median date.
fn impute_date(series: &Series) -> Result<Series> {
    let as_days = series.cast(&DataType::Int32)?;
    let chunked = as_days.i32()?;

    let mut present: Vec<i32> = chunked.into_iter().flatten().collect();
    if present.is_empty() {
        return Ok(series.clone());
    }
    present.sort_unstable();
    // Lower-middle element so the fill is an actual observed date.
    let median_days = present[(present.len() - 1) / 2];

    let filled: Vec<Option<i32>> = chunked
        .into_iter()
        .map(|v| Some(v.unwrap_or(median_days)))
        .collect();

    let int_series = Series::new(series.name().clone(), filled);
    Ok(int_series.cast(&DataType::Date)?)
}
