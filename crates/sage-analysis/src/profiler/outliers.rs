//! Tukey IQR outlier detection.

use super::statistics::quantile;
use crate::types::OutlierSummary;
use crate::utils::json_safe_f64;

/// Compute Tukey bounds and the strict-outside count for one numeric column.
///
/// Bounds are `Q1 - 1.5 * IQR` and `Q3 + 1.5 * IQR`; a value counts as an
/// outlier only when strictly below the lower or strictly above the upper
/// bound.
pub(crate) fn detect_outliers(values: &[f64]) -> OutlierSummary {
    if values.is_empty() {
        return OutlierSummary::default();
    }

    let mut sorted = values.to_vec();
    sorted.sort_by(f64::total_cmp);

    let q1 = quantile(&sorted, 0.25);
    let q3 = quantile(&sorted, 0.75);
    let iqr = q3 - q1;

    let lower_bound = q1 - 1.5 * iqr;
    let upper_bound = q3 + 1.5 * iqr;

    let outliers_count = values
        .iter()
        .filter(|&&v| v < lower_bound || v > upper_bound)
        .count();

    OutlierSummary {
        lower_bound: json_safe_f64(lower_bound),
        upper_bound: json_safe_f64(upper_bound),
        outliers_count,
    }
}
