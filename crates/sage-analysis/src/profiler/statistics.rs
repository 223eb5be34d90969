//! Statistical primitives for column profiling.
//!
//! Every function returns plain finite `f64`s; undefined quantities
//! (empty input, zero variance) collapse to 0.0 rather than NaN.

use crate::types::NumericSummary;
use crate::utils::json_safe_f64;

/// Arithmetic mean. 0.0 for empty input.
pub(crate) fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    values.iter().sum::<f64>() / values.len() as f64
}

/// Sample standard deviation (n - 1 denominator). 0.0 for fewer than two
/// values.
pub(crate) fn sample_std(values: &[f64]) -> f64 {
    let n = values.len() as f64;
    if n <= 1.0 {
        return 0.0;
    }
    let m = mean(values);
    let variance = values.iter().map(|v| (v - m).powi(2)).sum::<f64>() / (n - 1.0);
    variance.sqrt()
}

/// Empirical quantile with linear interpolation over a sorted slice.
///
/// Matches the conventional `(n - 1) * q` positioning, so `quantile(_, 0.5)`
/// is the usual median.
pub(crate) fn quantile(sorted: &[f64], q: f64) -> f64 {
    match sorted.len() {
        0 => 0.0,
        1 => sorted[0],
        n => {
            let pos = (n - 1) as f64 * q;
            let lower = pos.floor() as usize;
            let frac = pos - lower as f64;
            if lower + 1 < n {
                sorted[lower] + frac * (sorted[lower + 1] - sorted[lower])
            } else {
                sorted[lower]
            }
        }
    }
}

/// Median over a sorted slice.
pub(crate) fn median(sorted: &[f64]) -> f64 {
    quantile(sorted, 0.5)
}

/// Pearson correlation coefficient of two equally long series.
///
/// 0.0 when either series has zero variance or fewer than two points.
pub(crate) fn pearson(x: &[f64], y: &[f64]) -> f64 {
    let n = x.len();
    if n < 2 || n != y.len() {
        return 0.0;
    }

    let mean_x = mean(x);
    let mean_y = mean(y);

    let mut cov = 0.0;
    let mut var_x = 0.0;
    let mut var_y = 0.0;
    for i in 0..n {
        let dx = x[i] - mean_x;
        let dy = y[i] - mean_y;
        cov += dx * dy;
        var_x += dx * dx;
        var_y += dy * dy;
    }

    let denom = (var_x * var_y).sqrt();
    if denom == 0.0 {
        return 0.0;
    }
    json_safe_f64(cov / denom)
}

/// Build the summary record for one numeric column from its non-null values.
pub(crate) fn summarize(values: &[f64]) -> NumericSummary {
    if values.is_empty() {
        return NumericSummary::default();
    }

    let mut sorted = values.to_vec();
    sorted.sort_by(f64::total_cmp);

    NumericSummary {
        count: values.len(),
        mean: json_safe_f64(mean(values)),
        median: json_safe_f64(median(&sorted)),
        std: json_safe_f64(sample_std(values)),
        min: sorted[0],
        max: sorted[sorted.len() - 1],
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mean_basic() {
        assert_eq!(mean(&[1.0, 2.0, 3.0]), 2.0);
        assert_eq!(mean(&[]), 0.0);
    }

    #[test]
    fn test_sample_std_basic() {
        // Values 1..=5: variance 10/4 = 2.5, std ~= 1.5811
        let std = sample_std(&[1.0, 2.0, 3.0, 4.0, 5.0]);
        assert!((std - 2.5_f64.sqrt()).abs() < 1e-12);
    }

    #[test]
    fn test_sample_std_degenerate() {
        assert_eq!(sample_std(&[5.0]), 0.0);
        assert_eq!(sample_std(&[]), 0.0);
        assert_eq!(sample_std(&[3.0, 3.0, 3.0]), 0.0);
    }

    #[test]
    fn test_quantile_interpolation() {
        let sorted = [1.0, 2.0, 3.0, 4.0];
        // (n-1)*0.25 = 0.75 -> 1 + 0.75*(2-1) = 1.75
        assert!((quantile(&sorted, 0.25) - 1.75).abs() < 1e-12);
        assert!((quantile(&sorted, 0.5) - 2.5).abs() < 1e-12);
        assert!((quantile(&sorted, 0.75) - 3.25).abs() < 1e-12);
        assert_eq!(quantile(&sorted, 0.0), 1.0);
        assert_eq!(quantile(&sorted, 1.0), 4.0);
    }

    #[test]
    fn test_median_odd_and_even() {
        assert_eq!(median(&[10.0, 20.0, 30.0, 40.0, 50.0]), 30.0);
        assert_eq!(median(&[10.0, 20.0, 40.0, 50.0]), 30.0);
        assert_eq!(median(&[7.0]), 7.0);
    }

    #[test]
    fn test_pearson_perfect_correlation() {
        let x = [1.0, 2.0, 3.0, 4.0];
        let y = [2.0, 4.0, 6.0, 8.0];
        assert!((pearson(&x, &y) - 1.0).abs() < 1e-12);

        let inverse = [8.0, 6.0, 4.0, 2.0];
        assert!((pearson(&x, &inverse) + 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_pearson_symmetry() {
        let x = [1.0, 5.0, 2.0, 8.0, 3.0];
        let y = [2.0, 3.0, 7.0, 1.0, 9.0];
        assert!((pearson(&x, &y) - pearson(&y, &x)).abs() < 1e-12);
    }

    #[test]
    fn test_pearson_zero_variance_is_finite() {
        let constant = [5.0, 5.0, 5.0];
        let varying = [1.0, 2.0, 3.0];
        assert_eq!(pearson(&constant, &varying), 0.0);
    }

    #[test]
    fn test_pearson_degenerate_lengths() {
        assert_eq!(pearson(&[1.0], &[2.0]), 0.0);
        assert_eq!(pearson(&[1.0, 2.0], &[1.0]), 0.0);
    }

    #[test]
    fn test_summarize() {
        let summary = summarize(&[10.0, 20.0, 30.0, 40.0, 50.0]);
        assert_eq!(summary.count, 5);
        assert_eq!(summary.mean, 30.0);
        assert_eq!(summary.median, 30.0);
        assert_eq!(summary.min, 10.0);
        assert_eq!(summary.max, 50.0);
        assert!(summary.std > 0.0);
    }

    #[test]
    fn test_summarize_empty() {
        let summary = summarize(&[]);
        assert_eq!(summary.count, 0);
        assert_eq!(summary.mean, 0.0);
    }
}
