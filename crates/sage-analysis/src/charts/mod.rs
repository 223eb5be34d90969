//! Visualization planning stage.
//!
//! Derives declarative chart specifications from the cleaned table and its
//! metadata. Nothing is rendered here; the specs are payloads for a
//! downstream renderer. Emission policy:
//!
//! - one correlation heatmap when at least two numeric columns exist
//! - one histogram and one boxplot per numeric column, up to a cap
//! - one top-K bar chart per categorical column, up to a cap
//! - one daily-count line chart per datetime column
//! - a bounded set of scatter plots over the leading numeric columns
//!
//! Large series are down-sampled with a seeded RNG and every emitted float
//! is JSON-safe.

mod sampling;

use crate::cleaner::date_from_days;
use crate::config::PipelineConfig;
use crate::profiler::pearson;
use crate::types::{ChartPlan, ChartSpec, TableMetadata};
use crate::utils::json_safe_f64;
use anyhow::Result;
use polars::prelude::*;
use rand::SeedableRng;
use rand::rngs::StdRng;
use std::collections::BTreeMap;
use tracing::{debug, info};

/// Planner producing a [`ChartPlan`] from a cleaned table and its metadata.
pub struct ChartPlanner;

impl ChartPlanner {
    /// Plan all charts for the table.
    pub fn plan(df: &DataFrame, metadata: &TableMetadata, config: &PipelineConfig) -> Result<ChartPlan> {
        let mut rng = StdRng::seed_from_u64(config.sample_seed);
        let mut charts: Vec<ChartSpec> = Vec::new();

        let numeric = &metadata.numeric_columns;
        let categorical = &metadata.categorical_columns;
        let datetime = &metadata.datetime_columns;

        if numeric.len() >= 2 {
            charts.push(Self::correlation_heatmap(df, numeric)?);
        }

        for col in numeric.iter().take(config.max_numeric_charts) {
            charts.push(Self::histogram(df, col, config.distribution_sample_cap, &mut rng)?);
            charts.push(Self::boxplot(df, col, config.distribution_sample_cap, &mut rng)?);
        }

        for col in categorical.iter().take(config.max_categorical_charts) {
            charts.push(Self::bar_chart(df, col, config.bar_top_k)?);
        }

        for col in datetime {
            charts.push(Self::line_chart(df, col)?);
        }

        // Bounded scatter subset: the first numeric column against the next
        // two, never the full pair grid.
        if numeric.len() >= 2 {
            for i in 0..1.min(numeric.len()) {
                for j in (i + 1)..3.min(numeric.len()) {
                    charts.push(Self::scatter(
                        df,
                        &numeric[i],
                        &numeric[j],
                        config.scatter_sample_cap,
                        &mut rng,
                    )?);
                }
            }
        }

        info!(total = charts.len(), "Chart planning complete");
        let total_charts = charts.len();
        Ok(ChartPlan {
            charts,
            total_charts,
        })
    }

    /// Non-null values of a numeric column, coerced JSON-safe.
    fn numeric_values(df: &DataFrame, column: &str) -> Result<Vec<f64>> {
        let series = df.column(column)?.as_materialized_series().clone();
        let float_series = series.cast(&DataType::Float64)?;
        Ok(float_series
            .f64()?
            .into_iter()
            .flatten()
            .map(json_safe_f64)
            .collect())
    }

    fn histogram(
        df: &DataFrame,
        column: &str,
        cap: usize,
        rng: &mut StdRng,
    ) -> Result<ChartSpec> {
        let values = Self::numeric_values(df, column)?;
        let data = sampling::sample_values(&values, cap, rng);
        debug!(column, points = data.len(), "Planned histogram");
        Ok(ChartSpec::Histogram {
            id: format!("hist_{}", column),
            column: column.to_string(),
            data,
            title: format!("Distribution of {}", column),
        })
    }

    fn boxplot(df: &DataFrame, column: &str, cap: usize, rng: &mut StdRng) -> Result<ChartSpec> {
        let values = Self::numeric_values(df, column)?;
        let data = sampling::sample_values(&values, cap, rng);
        Ok(ChartSpec::Boxplot {
            id: format!("box_{}", column),
            column: column.to_string(),
            data,
            title: format!("Outliers Detection: {}", column),
        })
    }

    /// Bar chart of the top-K most frequent values.
    ///
    /// Ordered by descending count, ties broken lexically so the plan is
    /// stable across runs.
    fn bar_chart(df: &DataFrame, column: &str, top_k: usize) -> Result<ChartSpec> {
        let series = df.column(column)?.as_materialized_series().clone();
        let as_string = series.cast(&DataType::String)?;
        let chunked = as_string.str()?;

        let mut counts: BTreeMap<String, usize> = BTreeMap::new();
        for val in chunked.into_iter().flatten() {
            *counts.entry(val.to_string()).or_insert(0) += 1;
        }

        let mut ranked: Vec<(String, usize)> = counts.into_iter().collect();
        ranked.sort_by(|(a_val, a_count), (b_val, b_count)| {
            b_count.cmp(a_count).then(a_val.cmp(b_val))
        });
        ranked.truncate(top_k);

        let (x, y): (Vec<String>, Vec<usize>) = ranked.into_iter().unzip();
        Ok(ChartSpec::Bar {
            id: format!("bar_{}", column),
            column: column.to_string(),
            x,
            y,
            title: format!("Total Counts by {}", column),
        })
    }

    /// Line chart of row counts per date, ascending by date.
    fn line_chart(df: &DataFrame, column: &str) -> Result<ChartSpec> {
        let series = df.column(column)?.as_materialized_series().clone();
        let as_days = series.cast(&DataType::Int32)?;

        let mut counts: BTreeMap<i32, usize> = BTreeMap::new();
        for days in as_days.i32()?.into_iter().flatten() {
            *counts.entry(days).or_insert(0) += 1;
        }

        let mut x = Vec::with_capacity(counts.len());
        let mut y = Vec::with_capacity(counts.len());
        for (days, count) in counts {
            x.push(date_from_days(days).format("%Y-%m-%d").to_string());
            y.push(count);
        }

        Ok(ChartSpec::Line {
            id: format!("line_{}", column),
            column: column.to_string(),
            x,
            y,
            title: format!("Trend Analysis: {}", column),
        })
    }

    fn scatter(
        df: &DataFrame,
        x_col: &str,
        y_col: &str,
        cap: usize,
        rng: &mut StdRng,
    ) -> Result<ChartSpec> {
        let x_values = Self::numeric_values(df, x_col)?;
        let y_values = Self::numeric_values(df, y_col)?;
        let len = x_values.len().min(y_values.len());

        // One index sample keeps the (x, y) pairs aligned.
        let indices = sampling::sample_indices(len, cap, rng);
        let x = indices.iter().map(|&i| x_values[i]).collect();
        let y = indices.iter().map(|&i| y_values[i]).collect();

        Ok(ChartSpec::Scatter {
            id: format!("scatter_{}_vs_{}", x_col, y_col),
            x,
            y,
            x_label: x_col.to_string(),
            y_label: y_col.to_string(),
            title: format!("Correlation: {} vs {}", x_col, y_col),
        })
    }

    /// Correlation heatmap over all numeric columns, in table order.
    fn correlation_heatmap(df: &DataFrame, numeric_columns: &[String]) -> Result<ChartSpec> {
        let mut column_values: Vec<Vec<f64>> = Vec::with_capacity(numeric_columns.len());
        for name in numeric_columns {
            column_values.push(Self::numeric_values(df, name)?);
        }

        let n = numeric_columns.len();
        let mut z = vec![vec![0.0; n]; n];
        for i in 0..n {
            for j in 0..n {
                z[i][j] = if i == j {
                    1.0
                } else {
                    json_safe_f64(pearson(&column_values[i], &column_values[j]))
                };
            }
        }

        Ok(ChartSpec::Heatmap {
            id: "correlation_heatmap".to_string(),
            x: numeric_columns.to_vec(),
            y: numeric_columns.to_vec(),
            z,
            title: "Feature Correlation Heatmap".to_string(),
        })
    }
}
