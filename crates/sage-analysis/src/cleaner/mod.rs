//! Data cleaning stage.
//!
//! Loads a raw CSV into a table and repairs it in a fixed order:
//!
//! 1. Normalize column labels (collisions get numeric suffixes)
//! 2. Remove exact-duplicate rows
//! 3. Infer per-column types (numeric first, then dates)
//! 4. Impute missing values by per-dtype policy
//! 5. Remove exact-duplicate rows again (imputation can collapse rows)
//!
//! The stage never raises: every failure is folded into an error outcome
//! whose status flag the orchestrator checks.

mod imputers;
mod labels;
mod type_inference;

pub(crate) use type_inference::date_from_days;

use crate::types::{CleaningOutcome, TableMetadata};
use crate::utils::{DtypeCategory, series_dtype_category};
use anyhow::{Context, Result, bail};
use polars::io::csv::read::CsvReadOptions;
use polars::prelude::*;
use std::collections::BTreeMap;
use std::path::Path;
use tracing::{debug, info, warn};

/// Data cleaner producing a cleaned table plus metadata from a CSV path.
pub struct DataCleaner;

impl DataCleaner {
    /// Run the full cleaning sequence on a CSV file.
    ///
    /// Never returns `Err`; inspect [`CleaningOutcome::status`].
    pub fn preprocess(path: &Path) -> CleaningOutcome {
        match Self::run(path) {
            Ok((table, metadata)) => {
                info!(
                    rows = metadata.rows,
                    columns = metadata.column_count(),
                    "Data cleaning completed"
                );
                CleaningOutcome::success(table, metadata, "Data cleaning completed successfully")
            }
            Err(e) => {
                warn!("Cleaning failed: {:#}", e);
                CleaningOutcome::error(format!("Error during cleaning: {:#}", e))
            }
        }
    }

    fn run(path: &Path) -> Result<(DataFrame, TableMetadata)> {
        let df = Self::load(path)?;
        info!(rows = df.height(), columns = df.width(), "Data loaded");

        let df = Self::normalize_column_labels(df)?;
        let df = Self::remove_duplicates(df)?;
        let df = type_inference::infer_column_types(df).context("type inference")?;
        let df = imputers::impute_missing(df).context("imputation")?;
        let df = Self::remove_duplicates(df)?;

        let metadata = Self::generate_metadata(&df)?;
        Ok((df, metadata))
    }

    /// Load a CSV file with a header row.
    fn load(path: &Path) -> Result<DataFrame> {
        if !path.exists() {
            bail!("File not found: {}", path.display());
        }

        let df = CsvReadOptions::default()
            .with_has_header(true)
            .try_into_reader_with_file_path(Some(path.to_path_buf()))?
            .finish()
            .context("reading CSV")?;

        if df.width() == 0 {
            bail!("File has no columns: {}", path.display());
        }

        Ok(df)
    }

    /// Replace the header row with normalized, collision-free labels.
    fn normalize_column_labels(mut df: DataFrame) -> Result<DataFrame> {
        let original: Vec<String> = df
            .get_column_names()
            .into_iter()
            .map(|s| s.to_string())
            .collect();
        let normalized = labels::normalize_labels(&original);

        for (old, new) in original.iter().zip(&normalized) {
            if old != new {
                debug!("Renamed column '{}' -> '{}'", old, new);
            }
        }

        df.set_column_names(normalized)?;
        Ok(df)
    }

    /// Remove exact-duplicate rows, keeping first occurrences in order.
    fn remove_duplicates(df: DataFrame) -> Result<DataFrame> {
        let before = df.height();
        let df = df.unique_stable(None, UniqueKeepStrategy::First, None)?;
        let removed = before - df.height();
        if removed > 0 {
            debug!("Removed {} duplicate rows", removed);
        }
        Ok(df)
    }

    /// Derive metadata from a cleaned table.
    ///
    /// Every column lands in exactly one of the three partitions; boolean
    /// and other non-numeric, non-date dtypes count as categorical.
    pub fn generate_metadata(df: &DataFrame) -> Result<TableMetadata> {
        let mut columns = Vec::with_capacity(df.width());
        let mut numeric_columns = Vec::new();
        let mut categorical_columns = Vec::new();
        let mut datetime_columns = Vec::new();
        let mut missing_values = BTreeMap::new();

        for col in df.get_columns() {
            let series = col.as_materialized_series();
            let name = series.name().to_string();

            match series_dtype_category(series) {
                DtypeCategory::Numeric => numeric_columns.push(name.clone()),
                DtypeCategory::Datetime => datetime_columns.push(name.clone()),
                DtypeCategory::Boolean | DtypeCategory::String | DtypeCategory::Other => {
                    categorical_columns.push(name.clone())
                }
            }

            missing_values.insert(name.clone(), series.null_count());
            columns.push(name);
        }

        Ok(TableMetadata {
            rows: df.height(),
            columns,
            numeric_columns,
            categorical_columns,
            datetime_columns,
            missing_values,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn write_csv(content: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::Builder::new()
            .suffix(".csv")
            .tempfile()
            .expect("temp file");
        file.write_all(content.as_bytes()).expect("write csv");
        file
    }

    #[test]
    fn test_preprocess_missing_file_is_error_outcome() {
        let outcome = DataCleaner::preprocess(Path::new("/nonexistent/input.csv"));
        assert!(!outcome.is_success());
        assert!(outcome.message.contains("File not found"));
        assert!(outcome.table.is_none());
    }

    #[test]
    fn test_preprocess_end_to_end() {
        let file = write_csv(
            "Id,Category,Value\n\
             1,A,10\n\
             2,A,20\n\
             3,B,\n\
             4,B,40\n\
             5,C,50\n",
        );

        let outcome = DataCleaner::preprocess(file.path());
        assert!(outcome.is_success(), "{}", outcome.message);

        let metadata = &outcome.metadata;
        assert_eq!(metadata.rows, 5);
        assert_eq!(metadata.columns, vec!["id", "category", "value"]);
        assert_eq!(metadata.numeric_columns, vec!["id", "value"]);
        assert_eq!(metadata.categorical_columns, vec!["category"]);
        assert!(metadata.datetime_columns.is_empty());

        // No residual nulls after imputation.
        for (col, count) in &metadata.missing_values {
            assert_eq!(*count, 0, "column '{}' still has nulls", col);
        }

        // The null was imputed with the median of {10, 20, 40, 50}.
        let table = outcome.table.unwrap();
        let value = table.column("value").unwrap().as_materialized_series().clone();
        let value = value.cast(&DataType::Float64).unwrap();
        assert_eq!(value.f64().unwrap().get(2), Some(30.0));
    }

    #[test]
    fn test_preprocess_removes_duplicates() {
        let file = write_csv(
            "a,b\n\
             1,x\n\
             1,x\n\
             2,y\n",
        );
        let outcome = DataCleaner::preprocess(file.path());
        assert!(outcome.is_success());
        assert_eq!(outcome.metadata.rows, 2);
    }

    #[test]
    fn test_preprocess_is_idempotent() {
        let file = write_csv(
            "Id,Category,Value\n\
             1,A,10\n\
             2,A,\n\
             3,B,30\n\
             3,B,30\n",
        );
        let first = DataCleaner::preprocess(file.path());
        assert!(first.is_success());
        let table = first.table.unwrap();

        // Re-running the post-load steps on an already-cleaned table
        // changes nothing.
        let renormalized = DataCleaner::normalize_column_labels(table.clone()).unwrap();
        let deduped = DataCleaner::remove_duplicates(renormalized).unwrap();
        let retyped = type_inference::infer_column_types(deduped).unwrap();
        let reimputed = imputers::impute_missing(retyped).unwrap();
        let final_df = DataCleaner::remove_duplicates(reimputed).unwrap();

        assert!(final_df.equals(&table));
    }

    #[test]
    fn test_metadata_partition_is_exhaustive_and_disjoint() {
        let file = write_csv(
            "num,cat,flag,when\n\
             1,x,true,2024-01-01\n\
             2,y,false,2024-01-02\n",
        );
        let outcome = DataCleaner::preprocess(file.path());
        assert!(outcome.is_success());

        let metadata = outcome.metadata;
        let mut all: Vec<&String> = metadata
            .numeric_columns
            .iter()
            .chain(&metadata.categorical_columns)
            .chain(&metadata.datetime_columns)
            .collect();
        all.sort();
        let mut expected: Vec<&String> = metadata.columns.iter().collect();
        expected.sort();
        assert_eq!(all, expected);
        // Boolean counts as categorical.
        assert!(metadata.categorical_columns.contains(&"flag".to_string()));
        assert_eq!(metadata.datetime_columns, vec!["when"]);
    }

    #[test]
    fn test_label_collision_keeps_both_columns() {
        let file = write_csv(
            "Total Sales,total-sales\n\
             1,2\n\
             3,4\n",
        );
        let outcome = DataCleaner::preprocess(file.path());
        assert!(outcome.is_success());
        assert_eq!(
            outcome.metadata.columns,
            vec!["total_sales", "total_sales_2"]
        );
    }
}
