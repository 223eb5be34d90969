//! Per-column type coercion for residual string columns.
//!
//! The CSV reader already yields native numeric and boolean columns where a
//! whole column parses; this module upgrades the remaining string columns.
//! Coercion order is fixed: numeric first, then dates; anything else stays
//! categorical text.

use crate::utils::parse_numeric_string;
use anyhow::Result;
use chrono::NaiveDate;
use once_cell::sync::Lazy;
use polars::prelude::*;
use regex::Regex;
use tracing::debug;

// Date pattern regexes - compiled once at startup
static DATE_PATTERNS: Lazy<Vec<Regex>> = Lazy::new(|| {
    vec![
        Regex::new(r"^\d{4}[-/]\d{1,2}[-/]\d{1,2}$").expect("Invalid regex: YYYY-MM-DD"),
        Regex::new(r"^\d{1,2}[-/]\d{1,2}[-/]\d{4}$").expect("Invalid regex: MM-DD-YYYY"),
        Regex::new(r"^\d{4}-\d{2}-\d{2}\s\d{2}:\d{2}:\d{2}$").expect("Invalid regex: datetime"),
        Regex::new(r"^\d{4}-\d{2}-\d{2}T\d{2}:\d{2}:\d{2}$").expect("Invalid regex: ISO"),
    ]
});

/// Accepted chrono formats, tried in order. Datetime formats are truncated
/// to their date component.
const DATE_FORMATS: [&str; 4] = ["%Y-%m-%d", "%Y/%m/%d", "%m/%d/%Y", "%m-%d-%Y"];
const DATETIME_FORMATS: [&str; 2] = ["%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M:%S"];

static EPOCH: Lazy<NaiveDate> =
    Lazy::new(|| NaiveDate::from_ymd_opt(1970, 1, 1).expect("Invalid epoch date"));

/// Apply type coercion to every column of the table.
///
/// Native numeric/boolean/date columns pass through untouched. All-null
/// columns are materialized as string so the categorical fallback applies.
pub(crate) fn infer_column_types(mut df: DataFrame) -> Result<DataFrame> {
    let column_names: Vec<String> = df
        .get_column_names()
        .into_iter()
        .map(|s| s.to_string())
        .collect();

    for col_name in &column_names {
        let series = df.column(col_name)?.as_materialized_series().clone();

        match series.dtype() {
            DataType::Null => {
                let as_string = series.cast(&DataType::String)?;
                df.replace(col_name, as_string)?;
            }
            DataType::String => {
                if let Some(numeric) = coerce_numeric(&series)? {
                    debug!("Coerced '{}' to numeric", col_name);
                    df.replace(col_name, numeric)?;
                } else if let Some(dates) = coerce_dates(&series)? {
                    debug!("Coerced '{}' to date", col_name);
                    df.replace(col_name, dates)?;
                }
            }
            _ => {}
        }
    }

    Ok(df)
}

/// Attempt to coerce a string series to Float64.
///
/// Succeeds only if every non-null value parses as a number (currency and
/// thousands formatting tolerated); a column with no values at all is left
/// alone.
pub(crate) fn coerce_numeric(series: &Series) -> Result<Option<Series>> {
    let str_series = series.str()?;
    if series.len() == series.null_count() {
        return Ok(None);
    }

    let mut values: Vec<Option<f64>> = Vec::with_capacity(str_series.len());
    for opt_val in str_series.into_iter() {
        match opt_val {
            Some(val) => match parse_numeric_string(val) {
                Some(parsed) => values.push(Some(parsed)),
                None => return Ok(None),
            },
            None => values.push(None),
        }
    }

    Ok(Some(Series::new(series.name().clone(), values)))
}

/// Attempt to coerce a string series to Date.
///
/// Succeeds only if every non-null value matches a date pattern and parses.
pub(crate) fn coerce_dates(series: &Series) -> Result<Option<Series>> {
    let str_series = series.str()?;
    if series.len() == series.null_count() {
        return Ok(None);
    }

    let mut days: Vec<Option<i32>> = Vec::with_capacity(str_series.len());
    for opt_val in str_series.into_iter() {
        match opt_val {
            Some(val) => match parse_date(val.trim()) {
                Some(date) => days.push(Some(days_since_epoch(date))),
                None => return Ok(None),
            },
            None => days.push(None),
        }
    }

    let int_series = Series::new(series.name().clone(), days);
    Ok(Some(int_series.cast(&DataType::Date)?))
}

/// Parse a single date or datetime string into a `NaiveDate`.
pub(crate) fn parse_date(value: &str) -> Option<NaiveDate> {
    if !DATE_PATTERNS.iter().any(|p| p.is_match(value)) {
        return None;
    }

    for format in DATETIME_FORMATS {
        if let Ok(dt) = chrono::NaiveDateTime::parse_from_str(value, format) {
            return Some(dt.date());
        }
    }
    for format in DATE_FORMATS {
        if let Ok(date) = NaiveDate::parse_from_str(value, format) {
            return Some(date);
        }
    }

    None
}

/// Days since the Unix epoch, the physical representation of a polars Date.
pub(crate) fn days_since_epoch(date: NaiveDate) -> i32 {
    (date - *EPOCH).num_days() as i32
}

/// Convert a polars Date physical value back to a `NaiveDate`.
pub(crate) fn date_from_days(days: i32) -> NaiveDate {
    *EPOCH + chrono::Duration::days(days as i64)
}
