//! Shared utilities for the analysis pipeline.
//!
//! Common helpers used across the cleaning, profiling and chart-planning
//! stages to keep type handling and value parsing consistent.

use polars::prelude::*;

// =============================================================================
// Data Type Utilities
// =============================================================================

/// Category of a column's data type for analysis purposes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DtypeCategory {
    /// Integer or floating point numbers
    Numeric,
    /// Date or datetime types
    Datetime,
    /// Boolean type
    Boolean,
    /// String/text type
    String,
    /// Other/unknown types
    Other,
}

/// Check if a DataType is numeric (integer or float).
#[inline]
pub fn is_numeric_dtype(dtype: &DataType) -> bool {
    matches!(
        dtype,
        DataType::Int8
            | DataType::Int16
            | DataType::Int32
            | DataType::Int64
            | DataType::UInt8
            | DataType::UInt16
            | DataType::UInt32
            | DataType::UInt64
            | DataType::Float32
            | DataType::Float64
    )
}

/// Check if a DataType is a datetime type.
#[inline]
pub fn is_datetime_dtype(dtype: &DataType) -> bool {
    matches!(
        dtype,
        DataType::Datetime(_, _) | DataType::Date | DataType::Time
    )
}

/// Check if a DataType is boolean.
#[inline]
pub fn is_boolean_dtype(dtype: &DataType) -> bool {
    matches!(dtype, DataType::Boolean)
}

/// Get the category of a DataType.
pub fn get_dtype_category(dtype: &DataType) -> DtypeCategory {
    if is_numeric_dtype(dtype) {
        DtypeCategory::Numeric
    } else if is_datetime_dtype(dtype) {
        DtypeCategory::Datetime
    } else if is_boolean_dtype(dtype) {
        DtypeCategory::Boolean
    } else if matches!(dtype, DataType::String | DataType::Categorical(_, _)) {
        DtypeCategory::String
    } else {
        DtypeCategory::Other
    }
}

/// Get the dtype category of a Series.
pub fn series_dtype_category(series: &Series) -> DtypeCategory {
    get_dtype_category(series.dtype())
}

// =============================================================================
// String Parsing Utilities
// =============================================================================

/// Characters commonly used in numeric formatting that should be stripped.
pub const NUMERIC_FORMAT_CHARS: [char; 6] = [',', '$', '%', '€', '£', ' '];

/// Clean a string for numeric parsing by removing formatting characters.
pub fn clean_numeric_string(s: &str) -> String {
    let mut result = s.trim().to_string();
    for c in NUMERIC_FORMAT_CHARS {
        result = result.replace(c, "");
    }
    result
}

/// Try to parse a string as a numeric value (f64).
///
/// Handles common formatting like currency symbols, percentages, and
/// thousands separators.
pub fn parse_numeric_string(s: &str) -> Option<f64> {
    let cleaned = clean_numeric_string(s);
    if cleaned.is_empty() {
        return None;
    }
    cleaned.parse::<f64>().ok()
}

/// Check if a string can be parsed as a numeric value.
pub fn is_numeric_string(s: &str) -> bool {
    parse_numeric_string(s).is_some()
}

// =============================================================================
// JSON Safety
// =============================================================================

/// Coerce a float into a JSON-safe value.
///
/// NaN and infinities cannot appear in emitted artifacts; they collapse to
/// the defined placeholder 0.0.
#[inline]
pub fn json_safe_f64(v: f64) -> f64 {
    if v.is_finite() { v } else { 0.0 }
}

// =============================================================================
// Series Statistics Utilities
// =============================================================================

/// Calculate the mode (most frequent value) of a string Series.
///
/// Ties break toward the lexically smallest value so repeated runs agree.
pub fn string_mode(series: &Series) -> Option<String> {
    let non_null = series.drop_nulls();
    if non_null.is_empty() {
        return None;
    }

    let str_series = match non_null.cast(&DataType::String) {
        Ok(s) => s,
        Err(_) => return None,
    };

    let str_chunked = match str_series.str() {
        Ok(s) => s,
        Err(_) => return None,
    };

    let mut value_counts: std::collections::HashMap<String, usize> =
        std::collections::HashMap::new();
    for val in str_chunked.into_iter().flatten() {
        *value_counts.entry(val.to_string()).or_insert(0) += 1;
    }

    value_counts
        .into_iter()
        .max_by(|(a_val, a_count), (b_val, b_count)| {
            a_count.cmp(b_count).then(b_val.cmp(a_val))
        })
        .map(|(val, _)| val)
}

/// Calculate the mode of a boolean Series.
pub fn boolean_mode(series: &Series) -> Option<bool> {
    let bools = series.bool().ok()?;
    let mut true_count = 0usize;
    let mut false_count = 0usize;
    for val in bools.into_iter().flatten() {
        if val {
            true_count += 1;
        } else {
            false_count += 1;
        }
    }
    if true_count == 0 && false_count == 0 {
        return None;
    }
    Some(true_count >= false_count)
}

/// Collect the non-null values of a numeric Series as plain f64s.
pub fn collect_numeric_values(series: &Series) -> PolarsResult<Vec<f64>> {
    let float_series = series.cast(&DataType::Float64)?;
    let chunked = float_series.f64()?;
    Ok(chunked.into_iter().flatten().filter(|v| v.is_finite()).collect())
}

// =============================================================================
// Series Transformation Utilities
// =============================================================================

/// Fill null values in a numeric Series with a specific value.
pub fn fill_numeric_nulls(series: &Series, fill_value: f64) -> PolarsResult<Series> {
    let mask = series.is_null();
    let len = series.len();
    let mut result_vec = Vec::with_capacity(len);

    for i in 0..len {
        if mask.get(i).unwrap_or(false) {
            result_vec.push(Some(fill_value));
        } else {
            let val = series.get(i)?;
            result_vec.push(Some(val.try_extract::<f64>()?));
        }
    }

    Ok(Series::new(series.name().clone(), result_vec))
}

/// Fill null values in a string Series with a specific value.
pub fn fill_string_nulls(series: &Series, fill_value: &str) -> PolarsResult<Series> {
    let mask = series.is_null();
    let len = series.len();
    let mut result_vec = Vec::with_capacity(len);

    for i in 0..len {
        if mask.get(i).unwrap_or(false) {
            result_vec.push(Some(fill_value.to_string()));
        } else {
            let val = series.get(i)?;
            result_vec.push(Some(format!("{}", val)));
        }
    }

    Ok(Series::new(series.name().clone(), result_vec))
}

/// Fill null values in a boolean Series with a specific value.
pub fn fill_boolean_nulls(series: &Series, fill_value: bool) -> PolarsResult<Series> {
    let bools = series.bool()?;
    let result_vec: Vec<Option<bool>> = bools
        .into_iter()
        .map(|v| Some(v.unwrap_or(fill_value)))
        .collect();

    Ok(Series::new(series.name().clone(), result_vec))
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_numeric_dtype() {
        assert!(is_numeric_dtype(&DataType::Int64));
        assert!(is_numeric_dtype(&DataType::Float64));
        assert!(!is_numeric_dtype(&DataType::String));
        assert!(!is_numeric_dtype(&DataType::Boolean));
    }

    #[test]
    fn test_is_datetime_dtype() {
        assert!(is_datetime_dtype(&DataType::Date));
        assert!(is_datetime_dtype(&DataType::Datetime(
            TimeUnit::Milliseconds,
            None
        )));
        assert!(!is_datetime_dtype(&DataType::String));
    }

    #[test]
    fn test_clean_numeric_string() {
        assert_eq!(clean_numeric_string("$1,234.56"), "1234.56");
        assert_eq!(clean_numeric_string("  42%  "), "42");
        assert_eq!(clean_numeric_string("€100"), "100");
        assert_eq!(clean_numeric_string("1 000"), "1000");
    }

    #[test]
    fn test_parse_numeric_string() {
        assert_eq!(parse_numeric_string("42"), Some(42.0));
        assert_eq!(parse_numeric_string("$1,234.56"), Some(1234.56));
        assert_eq!(parse_numeric_string("-100"), Some(-100.0));
        assert_eq!(parse_numeric_string(""), None);
        assert_eq!(parse_numeric_string("hello"), None);
    }

    #[test]
    fn test_json_safe_f64() {
        assert_eq!(json_safe_f64(3.5), 3.5);
        assert_eq!(json_safe_f64(f64::NAN), 0.0);
        assert_eq!(json_safe_f64(f64::INFINITY), 0.0);
        assert_eq!(json_safe_f64(f64::NEG_INFINITY), 0.0);
    }

    #[test]
    fn test_string_mode() {
        let series = Series::new("test".into(), &["a", "b", "a", "c", "a"]);
        assert_eq!(string_mode(&series), Some("a".to_string()));
    }

    #[test]
    fn test_string_mode_all_null() {
        let series: Series = Series::new("test".into(), &[None::<&str>, None]);
        assert_eq!(string_mode(&series), None);
    }

    #[test]
    fn test_boolean_mode() {
        let series = Series::new("flag".into(), &[Some(true), Some(true), Some(false), None]);
        assert_eq!(boolean_mode(&series), Some(true));
    }

    #[test]
    fn test_boolean_mode_all_null() {
        let series: Series = Series::new("flag".into(), &[None::<bool>, None]);
        assert_eq!(boolean_mode(&series), None);
    }

    #[test]
    fn test_fill_numeric_nulls() {
        let series = Series::new("test".into(), &[Some(1.0), None, Some(3.0)]);
        let filled = fill_numeric_nulls(&series, 0.0).unwrap();

        assert_eq!(filled.get(0).unwrap().try_extract::<f64>().unwrap(), 1.0);
        assert_eq!(filled.get(1).unwrap().try_extract::<f64>().unwrap(), 0.0);
        assert_eq!(filled.get(2).unwrap().try_extract::<f64>().unwrap(), 3.0);
    }

    #[test]
    fn test_fill_boolean_nulls() {
        let series = Series::new("flag".into(), &[Some(true), None, Some(false)]);
        let filled = fill_boolean_nulls(&series, false).unwrap();
        assert_eq!(filled.null_count(), 0);
        assert!(!filled.bool().unwrap().get(1).unwrap());
    }

    #[test]
    fn test_collect_numeric_values_skips_nulls() {
        let series = Series::new("v".into(), &[Some(1.0), None, Some(2.0)]);
        let vals = collect_numeric_values(&series).unwrap();
        assert_eq!(vals, vec![1.0, 2.0]);
    }
}
