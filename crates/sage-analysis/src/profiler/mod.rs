//! Profiling (EDA) stage.
//!
//! A pure function of the cleaned table: re-derives the column type
//! partition from dtypes (independently of the cleaning metadata), then
//! computes summary statistics, categorical distributions, pairwise Pearson
//! correlations, missing-value counts and Tukey outlier bounds.

mod outliers;
mod statistics;

pub(crate) use statistics::pearson;

use crate::types::{ColumnTypeMap, DatasetOverview, EdaReport};
use crate::utils::{DtypeCategory, collect_numeric_values, series_dtype_category};
use anyhow::Result;
use polars::prelude::*;
use std::collections::BTreeMap;
use tracing::{debug, info};

/// Profiler producing an [`EdaReport`] from a cleaned table.
pub struct DataProfiler;

impl DataProfiler {
    /// Profile a cleaned table.
    pub fn run(df: &DataFrame) -> Result<EdaReport> {
        info!(rows = df.height(), columns = df.width(), "Profiling table");

        let column_types = Self::column_types(df);
        let summary_statistics = Self::summary_statistics(df, &column_types.numeric)?;
        let categorical_distributions =
            Self::categorical_distributions(df, &column_types.categorical)?;
        let correlations = Self::correlations(df, &column_types.numeric)?;
        let missing_values = Self::missing_values(df);
        let outliers = Self::outlier_bounds(df, &column_types.numeric)?;

        debug!(
            numeric = column_types.numeric.len(),
            categorical = column_types.categorical.len(),
            datetime = column_types.datetime.len(),
            correlations = correlations.len(),
            "Profiling complete"
        );

        Ok(EdaReport {
            overview: DatasetOverview {
                rows: df.height(),
                columns: df.width(),
            },
            column_types,
            summary_statistics,
            categorical_distributions,
            correlations,
            missing_values,
            outliers,
        })
    }

    /// Partition columns by dtype. Booleans and anything non-numeric,
    /// non-date count as categorical so the partition stays exhaustive.
    fn column_types(df: &DataFrame) -> ColumnTypeMap {
        let mut partition = ColumnTypeMap::default();
        for col in df.get_columns() {
            let series = col.as_materialized_series();
            let name = series.name().to_string();
            match series_dtype_category(series) {
                DtypeCategory::Numeric => partition.numeric.push(name),
                DtypeCategory::Datetime => partition.datetime.push(name),
                DtypeCategory::Boolean | DtypeCategory::String | DtypeCategory::Other => {
                    partition.categorical.push(name)
                }
            }
        }
        partition
    }

    fn summary_statistics(
        df: &DataFrame,
        numeric_columns: &[String],
    ) -> Result<BTreeMap<String, crate::types::NumericSummary>> {
        let mut stats = BTreeMap::new();
        for name in numeric_columns {
            let series = df.column(name)?.as_materialized_series().clone();
            let values = collect_numeric_values(&series)?;
            stats.insert(name.clone(), statistics::summarize(&values));
        }
        Ok(stats)
    }

    fn categorical_distributions(
        df: &DataFrame,
        categorical_columns: &[String],
    ) -> Result<BTreeMap<String, BTreeMap<String, usize>>> {
        let mut distributions = BTreeMap::new();
        for name in categorical_columns {
            let series = df.column(name)?.as_materialized_series().clone();
            let as_string = series.cast(&DataType::String)?;
            let chunked = as_string.str()?;

            let mut counts: BTreeMap<String, usize> = BTreeMap::new();
            for val in chunked.into_iter().flatten() {
                *counts.entry(val.to_string()).or_insert(0) += 1;
            }
            distributions.insert(name.clone(), counts);
        }
        Ok(distributions)
    }

    /// Pairwise Pearson correlations keyed `"a_vs_b"` with `a < b` lexically.
    ///
    /// Fewer than two numeric columns is not an error; the mapping is simply
    /// empty.
    fn correlations(df: &DataFrame, numeric_columns: &[String]) -> Result<BTreeMap<String, f64>> {
        let mut result = BTreeMap::new();
        if numeric_columns.len() < 2 {
            return Ok(result);
        }

        let mut sorted_names = numeric_columns.to_vec();
        sorted_names.sort();

        let mut series_values: BTreeMap<&String, Vec<f64>> = BTreeMap::new();
        for name in &sorted_names {
            let series = df.column(name)?.as_materialized_series().clone();
            series_values.insert(name, collect_numeric_values(&series)?);
        }

        for (i, first) in sorted_names.iter().enumerate() {
            for second in &sorted_names[i + 1..] {
                let r = pearson(&series_values[first], &series_values[second]);
                result.insert(format!("{}_vs_{}", first, second), r);
            }
        }

        Ok(result)
    }

    fn missing_values(df: &DataFrame) -> BTreeMap<String, usize> {
        df.get_columns()
            .iter()
            .map(|col| {
                let series = col.as_materialized_series();
                (series.name().to_string(), series.null_count())
            })
            .collect()
    }

    fn outlier_bounds(
        df: &DataFrame,
        numeric_columns: &[String],
    ) -> Result<BTreeMap<String, crate::types::OutlierSummary>> {
        let mut result = BTreeMap::new();
        for name in numeric_columns {
            let series = df.column(name)?.as_materialized_series().clone();
            let values = collect_numeric_values(&series)?;
            result.insert(name.clone(), outliers::detect_outliers(&values));
        }
        Ok(result)
    }
}
