//! Custom error types for the analysis pipeline.
//!
//! This module provides the error hierarchy using `thiserror`. Errors are
//! serializable as `{code, message}` so an embedding layer (HTTP API, UI)
//! can surface them without knowing the variant set.

use serde::Serialize;
use serde::ser::SerializeStruct;
use thiserror::Error;

/// The main error type for the analysis pipeline.
#[derive(Error, Debug)]
pub enum AnalysisError {
    /// Column was not found in the table.
    #[error("Column '{0}' not found in table")]
    ColumnNotFound(String),

    /// Invalid configuration provided.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// No valid values found in a column for computation.
    #[error("No valid values found in column '{0}'")]
    NoValidValues(String),

    /// Cleaning stage reported an error outcome.
    #[error("Failed to clean data: {0}")]
    CleaningFailed(String),

    /// Profiling stage failed.
    #[error("Failed to profile table: {0}")]
    ProfilingFailed(String),

    /// Chart planning failed.
    #[error("Failed to plan charts: {0}")]
    ChartPlanningFailed(String),

    /// Report rendering failed (output location unwritable, etc.).
    #[error("Failed to render report: {0}")]
    ReportRenderFailed(String),

    /// Internal error (invariant breakage, unexpected state).
    #[error("Internal error: {0}")]
    Internal(String),

    /// IO error wrapper.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Polars error wrapper.
    #[error("Polars error: {0}")]
    Polars(#[from] polars::error::PolarsError),

    /// JSON serialization/deserialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// HTTP request error (narrative provider, only with "ai" feature).
    #[cfg(feature = "ai")]
    #[error("HTTP request error: {0}")]
    HttpRequest(#[from] reqwest::Error),

    /// Generic error with context.
    #[error("{context}: {source}")]
    WithContext {
        context: String,
        #[source]
        source: Box<AnalysisError>,
    },
}

impl AnalysisError {
    /// Add context to an error.
    pub fn with_context(self, context: impl Into<String>) -> Self {
        AnalysisError::WithContext {
            context: context.into(),
            source: Box::new(self),
        }
    }

    /// Get a stable error code for embedding layers.
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::ColumnNotFound(_) => "COLUMN_NOT_FOUND",
            Self::InvalidConfig(_) => "INVALID_CONFIG",
            Self::NoValidValues(_) => "NO_VALID_VALUES",
            Self::CleaningFailed(_) => "CLEANING_FAILED",
            Self::ProfilingFailed(_) => "PROFILING_FAILED",
            Self::ChartPlanningFailed(_) => "CHART_PLANNING_FAILED",
            Self::ReportRenderFailed(_) => "REPORT_RENDER_FAILED",
            Self::Internal(_) => "INTERNAL_ERROR",
            Self::Io(_) => "IO_ERROR",
            Self::Polars(_) => "POLARS_ERROR",
            Self::Json(_) => "JSON_ERROR",
            #[cfg(feature = "ai")]
            Self::HttpRequest(_) => "HTTP_REQUEST_ERROR",
            Self::WithContext { source, .. } => source.error_code(),
        }
    }

    /// Check if this error originated in the cleaning stage.
    ///
    /// Cleaning errors are the only ones the orchestrator produces from a
    /// status flag rather than a propagated fault.
    pub fn is_cleaning_error(&self) -> bool {
        match self {
            Self::CleaningFailed(_) => true,
            Self::WithContext { source, .. } => source.is_cleaning_error(),
            _ => false,
        }
    }
}

/// Serialize implementation for embedding layers.
///
/// Errors are serialized as a struct with `code` and `message` fields.
impl Serialize for AnalysisError {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        let mut state = serializer.serialize_struct("AnalysisError", 2)?;
        state.serialize_field("code", &self.error_code())?;
        state.serialize_field("message", &self.to_string())?;
        state.end()
    }
}

/// Result type alias for analysis operations.
pub type Result<T> = std::result::Result<T, AnalysisError>;

/// Extension trait for adding context to Results.
pub trait ResultExt<T> {
    /// Add context to an error result.
    fn context(self, context: impl Into<String>) -> Result<T>;
}

impl<T> ResultExt<T> for Result<T> {
    fn context(self, context: impl Into<String>) -> Result<T> {
        self.map_err(|e| e.with_context(context))
    }
}

impl<T> ResultExt<T> for std::result::Result<T, polars::error::PolarsError> {
    fn context(self, context: impl Into<String>) -> Result<T> {
        self.map_err(|e| AnalysisError::Polars(e).with_context(context))
    }
}
