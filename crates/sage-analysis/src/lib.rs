//! CSV Analysis Pipeline Library
//!
//! An automated data-analysis library built with Rust and Polars. One
//! invocation takes a CSV file through a fixed five-stage pipeline and
//! returns a deterministic bundle of artifacts:
//!
//! 1. **Cleaning**: label normalization, type inference, missing-value
//!    imputation, duplicate removal
//! 2. **Profiling**: summary statistics, categorical distributions,
//!    Pearson correlations, Tukey outlier bounds
//! 3. **Visualization planning**: declarative chart specifications
//!    (histograms, bars, lines, scatters, heatmap, boxplots)
//! 4. **Insight synthesis**: narrative generation through a pluggable
//!    provider, normalized into a fixed four-field report
//! 5. **Report assembly**: a markdown document plus an optional HTML
//!    rendering
//!
//! # Quick Start
//!
//! ```rust,ignore
//! use sage_analysis::{Pipeline, PipelineConfig};
//! use sage_analysis::insight::GroqProvider;
//! use std::sync::Arc;
//!
//! // Option 1: With narrative insights from Groq
//! let provider = Arc::new(GroqProvider::new(api_key)?);
//!
//! let result = Pipeline::builder()
//!     .narrative_provider(provider)
//!     .build()?
//!     .process("data.csv")?;
//!
//! // Option 2: Offline (insights default to empty)
//! let config = PipelineConfig::builder()
//!     .generate_reports(false)
//!     .build()?;
//!
//! let result = Pipeline::builder()
//!     .config(config)
//!     .build()?
//!     .process("data.csv")?;
//!
//! println!("{} rows, {} charts", result.metadata.rows, result.charts.total_charts);
//! ```
//!
//! # Narrative Providers
//!
//! Insight synthesis talks to an external text-generation service through
//! the [`insight::NarrativeProvider`] trait. The built-in implementation is
//! [`insight::GroqProvider`] (behind the `ai` feature, on by default). Any
//! provider failure degrades to the all-empty default insight report; the
//! pipeline itself never fails because of the collaborator.
//!
//! # Configuration
//!
//! Use [`PipelineConfig`] to tune chart caps, down-sampling and report
//! output:
//!
//! ```rust,ignore
//! use sage_analysis::config::*;
//!
//! let config = PipelineConfig::builder()
//!     .max_numeric_charts(4)          // histogram+boxplot for 4 columns
//!     .bar_top_k(10)                  // top-10 bars per categorical column
//!     .distribution_sample_cap(500)   // payload size bound
//!     .report_format(ReportFormat::Html)
//!     .output_dir("reports")
//!     .build()?;
//! ```

pub mod charts;
pub mod cleaner;
pub mod config;
pub mod error;
pub mod insight;
pub mod pipeline;
pub mod profiler;
pub mod reporting;
pub mod types;
pub mod utils;

// Re-exports for convenient access
pub use charts::ChartPlanner;
pub use cleaner::DataCleaner;
pub use config::{ConfigValidationError, PipelineConfig, PipelineConfigBuilder, ReportFormat};
pub use error::{AnalysisError, ResultExt};
pub use insight::{InsightAgent, NarrativeProvider};
pub use pipeline::{Pipeline, PipelineBuilder};
pub use profiler::DataProfiler;
pub use reporting::ReportGenerator;
pub use types::{
    AnalysisResult, AnalysisState, ChartPlan, ChartSpec, CleaningOutcome, CleaningStatus,
    ColumnTypeMap, DatasetOverview, EdaReport, InsightReport, NumericSummary, OutlierSummary,
    ReportOutput, TableMetadata,
};
