//! Shared data types for the analysis pipeline.
//!
//! Every artifact the pipeline emits is defined here: table metadata, the
//! profiling report, chart specifications, the insight report and the
//! accumulating pipeline state threaded through the stages. Artifacts are
//! JSON-compatible by construction; map-shaped fields use `BTreeMap` so the
//! serialized key order is deterministic.

use polars::prelude::DataFrame;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::PathBuf;

// ============================================================================
// Cleaning artifacts
// ============================================================================

/// Description of a cleaned table.
///
/// The three type partitions are disjoint and together cover every column;
/// boolean columns are counted as categorical. `missing_values` tracks
/// residual nulls per column and is expected to be all-zero after cleaning
/// (kept for audit).
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct TableMetadata {
    /// Number of rows in the cleaned table.
    pub rows: usize,
    /// Ordered column labels (post-normalization).
    pub columns: Vec<String>,
    /// Columns with a numeric dtype.
    pub numeric_columns: Vec<String>,
    /// Columns with a categorical (string or boolean) dtype.
    pub categorical_columns: Vec<String>,
    /// Columns with a date dtype.
    pub datetime_columns: Vec<String>,
    /// Residual null count per column.
    pub missing_values: BTreeMap<String, usize>,
}

impl TableMetadata {
    /// Number of columns in the cleaned table.
    pub fn column_count(&self) -> usize {
        self.columns.len()
    }
}

/// Status flag of the cleaning stage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CleaningStatus {
    Success,
    Error,
}

/// Result of the cleaning stage.
///
/// Cleaning never raises: any internal failure is folded into
/// `{status: Error, message}` and the orchestrator decides whether to abort.
#[derive(Debug)]
pub struct CleaningOutcome {
    /// The cleaned table; `None` on error.
    pub table: Option<DataFrame>,
    /// Metadata derived from the cleaned table; default-empty on error.
    pub metadata: TableMetadata,
    /// Success or error flag the orchestrator must check.
    pub status: CleaningStatus,
    /// Human-readable completion or failure message.
    pub message: String,
}

impl CleaningOutcome {
    /// Build a success outcome.
    pub fn success(table: DataFrame, metadata: TableMetadata, message: impl Into<String>) -> Self {
        Self {
            table: Some(table),
            metadata,
            status: CleaningStatus::Success,
            message: message.into(),
        }
    }

    /// Build an error outcome.
    pub fn error(message: impl Into<String>) -> Self {
        Self {
            table: None,
            metadata: TableMetadata::default(),
            status: CleaningStatus::Error,
            message: message.into(),
        }
    }

    /// Check whether cleaning completed successfully.
    pub fn is_success(&self) -> bool {
        self.status == CleaningStatus::Success
    }
}

// ============================================================================
// Profiling artifacts
// ============================================================================

/// Row/column counts of the profiled table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct DatasetOverview {
    pub rows: usize,
    pub columns: usize,
}

/// Column partition by analysis type.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct ColumnTypeMap {
    pub numeric: Vec<String>,
    pub categorical: Vec<String>,
    pub datetime: Vec<String>,
}

/// Summary statistics for one numeric column. All values are finite.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct NumericSummary {
    pub count: usize,
    pub mean: f64,
    pub median: f64,
    pub std: f64,
    pub min: f64,
    pub max: f64,
}

/// Tukey IQR outlier bounds for one numeric column.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct OutlierSummary {
    pub lower_bound: f64,
    pub upper_bound: f64,
    pub outliers_count: usize,
}

/// The full profiling (EDA) report over a cleaned table.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct EdaReport {
    pub overview: DatasetOverview,
    pub column_types: ColumnTypeMap,
    pub summary_statistics: BTreeMap<String, NumericSummary>,
    pub categorical_distributions: BTreeMap<String, BTreeMap<String, usize>>,
    /// Pearson correlations keyed `"a_vs_b"` with `a < b` lexically.
    /// Empty when the table has fewer than two numeric columns.
    pub correlations: BTreeMap<String, f64>,
    pub missing_values: BTreeMap<String, usize>,
    pub outliers: BTreeMap<String, OutlierSummary>,
}

// ============================================================================
// Chart specifications
// ============================================================================

/// A declarative chart specification for a downstream renderer.
///
/// Specs never hold rendered images; payload series are plain JSON-safe
/// numbers and strings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum ChartSpec {
    Histogram {
        id: String,
        column: String,
        data: Vec<f64>,
        title: String,
    },
    Bar {
        id: String,
        column: String,
        x: Vec<String>,
        y: Vec<usize>,
        title: String,
    },
    Line {
        id: String,
        column: String,
        x: Vec<String>,
        y: Vec<usize>,
        title: String,
    },
    Scatter {
        id: String,
        x: Vec<f64>,
        y: Vec<f64>,
        x_label: String,
        y_label: String,
        title: String,
    },
    Heatmap {
        id: String,
        x: Vec<String>,
        y: Vec<String>,
        z: Vec<Vec<f64>>,
        title: String,
    },
    Boxplot {
        id: String,
        column: String,
        data: Vec<f64>,
        title: String,
    },
}

impl ChartSpec {
    /// The spec's identifier.
    pub fn id(&self) -> &str {
        match self {
            Self::Histogram { id, .. }
            | Self::Bar { id, .. }
            | Self::Line { id, .. }
            | Self::Scatter { id, .. }
            | Self::Heatmap { id, .. }
            | Self::Boxplot { id, .. } => id,
        }
    }

    /// The chart kind as it serializes.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Histogram { .. } => "histogram",
            Self::Bar { .. } => "bar",
            Self::Line { .. } => "line",
            Self::Scatter { .. } => "scatter",
            Self::Heatmap { .. } => "heatmap",
            Self::Boxplot { .. } => "boxplot",
        }
    }
}

/// Ordered chart specifications plus their count.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct ChartPlan {
    pub charts: Vec<ChartSpec>,
    pub total_charts: usize,
}

// ============================================================================
// Insight artifacts
// ============================================================================

/// Narrative insight report with exactly four fields.
///
/// Every field is always present; missing fields in a collaborator response
/// default to empty independently, so downstream rendering never checks for
/// presence.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct InsightReport {
    #[serde(default)]
    pub summary: String,
    #[serde(default)]
    pub key_insights: Vec<String>,
    #[serde(default)]
    pub risks: Vec<String>,
    #[serde(default)]
    pub recommendations: Vec<String>,
}

// ============================================================================
// Report artifacts
// ============================================================================

/// Paths of the rendered report file(s).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportOutput {
    /// The primary markdown document (always produced).
    pub markdown_path: PathBuf,
    /// The optional HTML representation.
    pub html_path: Option<PathBuf>,
}

// ============================================================================
// Pipeline state
// ============================================================================

/// The single state record threaded through all five stages.
///
/// Created with only the input path populated; each stage writes its own
/// fields exactly once and never touches another stage's fields.
#[derive(Debug, Default)]
pub struct AnalysisState {
    pub file_path: PathBuf,
    /// Written by the cleaning stage.
    pub table: Option<DataFrame>,
    /// Written by the cleaning stage.
    pub metadata: Option<TableMetadata>,
    /// Written by the profiling stage.
    pub eda: Option<EdaReport>,
    /// Written by the chart-planning stage.
    pub charts: Option<ChartPlan>,
    /// Written by the insight stage.
    pub insights: Option<InsightReport>,
    /// Written by the report stage.
    pub report: Option<ReportOutput>,
}

impl AnalysisState {
    /// Create a fresh state for one pipeline invocation.
    pub fn new(file_path: impl Into<PathBuf>) -> Self {
        Self {
            file_path: file_path.into(),
            ..Self::default()
        }
    }
}

/// The fully-populated artifact bundle returned to the caller.
#[derive(Debug, Serialize)]
pub struct AnalysisResult {
    /// The cleaned table (not serialized; consume programmatically).
    #[serde(skip)]
    pub table: DataFrame,
    pub metadata: TableMetadata,
    pub eda: EdaReport,
    pub charts: ChartPlan,
    pub insights: InsightReport,
    /// `None` when report rendering was disabled.
    pub report: Option<ReportOutput>,
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cleaning_outcome_success() {
        let df = DataFrame::default();
        let outcome = CleaningOutcome::success(df, TableMetadata::default(), "done");
        assert!(outcome.is_success());
        assert!(outcome.table.is_some());
    }

    #[test]
    fn test_cleaning_outcome_error() {
        let outcome = CleaningOutcome::error("file not found");
        assert!(!outcome.is_success());
        assert!(outcome.table.is_none());
        assert_eq!(outcome.message, "file not found");
        assert_eq!(outcome.metadata.rows, 0);
    }

    #[test]
    fn test_cleaning_status_serialization() {
        assert_eq!(
            serde_json::to_string(&CleaningStatus::Success).unwrap(),
            "\"success\""
        );
        assert_eq!(
            serde_json::to_string(&CleaningStatus::Error).unwrap(),
            "\"error\""
        );
    }

    #[test]
    fn test_chart_spec_tagged_serialization() {
        let spec = ChartSpec::Histogram {
            id: "hist_value".to_string(),
            column: "value".to_string(),
            data: vec![1.0, 2.0],
            title: "Distribution of value".to_string(),
        };
        let json = serde_json::to_value(&spec).unwrap();
        assert_eq!(json["type"], "histogram");
        assert_eq!(json["column"], "value");
        assert_eq!(spec.kind(), "histogram");
        assert_eq!(spec.id(), "hist_value");
    }

    #[test]
    fn test_chart_spec_roundtrip() {
        let spec = ChartSpec::Scatter {
            id: "scatter_a_vs_b".to_string(),
            x: vec![1.0],
            y: vec![2.0],
            x_label: "a".to_string(),
            y_label: "b".to_string(),
            title: "Correlation: a vs b".to_string(),
        };
        let json = serde_json::to_string(&spec).unwrap();
        let back: ChartSpec = serde_json::from_str(&json).unwrap();
        assert_eq!(back, spec);
    }

    #[test]
    fn test_insight_report_partial_defaults() {
        // Only summary present: the other three fields default independently.
        let parsed: InsightReport =
            serde_json::from_str(r#"{"summary": "Sales trend upward"}"#).unwrap();
        assert_eq!(parsed.summary, "Sales trend upward");
        assert!(parsed.key_insights.is_empty());
        assert!(parsed.risks.is_empty());
        assert!(parsed.recommendations.is_empty());
    }

    #[test]
    fn test_insight_report_default_is_all_empty() {
        let report = InsightReport::default();
        assert_eq!(report.summary, "");
        assert!(report.key_insights.is_empty());
        assert!(report.risks.is_empty());
        assert!(report.recommendations.is_empty());
    }

    #[test]
    fn test_metadata_column_count() {
        let metadata = TableMetadata {
            rows: 3,
            columns: vec!["a".to_string(), "b".to_string()],
            ..TableMetadata::default()
        };
        assert_eq!(metadata.column_count(), 2);
    }

    #[test]
    fn test_analysis_state_starts_empty() {
        let state = AnalysisState::new("data.csv");
        assert_eq!(state.file_path, PathBuf::from("data.csv"));
        assert!(state.table.is_none());
        assert!(state.metadata.is_none());
        assert!(state.eda.is_none());
        assert!(state.charts.is_none());
        assert!(state.insights.is_none());
        assert!(state.report.is_none());
    }

    #[test]
    fn test_eda_report_serializes_without_nan() {
        let mut report = EdaReport::default();
        report.correlations.insert("a_vs_b".to_string(), 0.5);
        let json = serde_json::to_string(&report).unwrap();
        assert!(!json.contains("NaN"));
        assert!(json.contains("a_vs_b"));
    }
}
