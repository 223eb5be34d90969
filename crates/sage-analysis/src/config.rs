//! Configuration types for the analysis pipeline.
//!
//! This module provides configuration options using the builder pattern
//! for flexible and ergonomic pipeline setup.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Output representation(s) for the rendered report.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum ReportFormat {
    /// Markdown document only
    #[default]
    Markdown,
    /// Markdown plus a styled HTML wrapper of the same content
    Html,
}

/// Configuration for the analysis pipeline.
///
/// Use [`PipelineConfig::builder()`] to create a new configuration
/// with fluent API.
///
/// # Example
///
/// ```rust,ignore
/// use sage_analysis::config::{PipelineConfig, ReportFormat};
///
/// let config = PipelineConfig::builder()
///     .max_numeric_charts(4)
///     .report_format(ReportFormat::Html)
///     .build()?;
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PipelineConfig {
    /// Maximum number of numeric columns that receive a histogram and a
    /// boxplot. Default: 6
    pub max_numeric_charts: usize,

    /// Maximum number of categorical columns that receive a bar chart.
    /// Default: 5
    pub max_categorical_charts: usize,

    /// Number of most frequent values kept in each bar chart.
    /// Default: 15
    pub bar_top_k: usize,

    /// Maximum number of points in histogram and boxplot payloads; larger
    /// series are uniformly down-sampled without replacement.
    /// Default: 1000
    pub distribution_sample_cap: usize,

    /// Maximum number of points in scatter plot payloads.
    /// Default: 800
    pub scatter_sample_cap: usize,

    /// Seed for the down-sampling RNG. The whole artifact sequence is
    /// deterministic for a fixed seed and input.
    /// Default: 42
    pub sample_seed: u64,

    /// Output directory for generated report files.
    /// Default: "reports"
    pub output_dir: PathBuf,

    /// Which report representation(s) to render.
    /// Default: Markdown
    pub report_format: ReportFormat,

    /// Whether to render report files at all. When false, the pipeline
    /// still produces every in-memory artifact.
    /// Default: true
    pub generate_reports: bool,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            max_numeric_charts: 6,
            max_categorical_charts: 5,
            bar_top_k: 15,
            distribution_sample_cap: 1000,
            scatter_sample_cap: 800,
            sample_seed: 42,
            output_dir: PathBuf::from("reports"),
            report_format: ReportFormat::default(),
            generate_reports: true,
        }
    }
}

impl PipelineConfig {
    /// Create a new configuration builder.
    pub fn builder() -> PipelineConfigBuilder {
        PipelineConfigBuilder::default()
    }

    /// Validate the configuration and return errors if invalid.
    pub fn validate(&self) -> Result<(), ConfigValidationError> {
        if self.bar_top_k == 0 {
            return Err(ConfigValidationError::ZeroCap("bar_top_k"));
        }
        if self.distribution_sample_cap == 0 {
            return Err(ConfigValidationError::ZeroCap("distribution_sample_cap"));
        }
        if self.scatter_sample_cap == 0 {
            return Err(ConfigValidationError::ZeroCap("scatter_sample_cap"));
        }
        Ok(())
    }
}

/// Errors that can occur during configuration validation.
#[derive(Debug, thiserror::Error)]
pub enum ConfigValidationError {
    #[error("'{0}' must be at least 1")]
    ZeroCap(&'static str),
}

/// Builder for [`PipelineConfig`].
#[derive(Debug, Default)]
pub struct PipelineConfigBuilder {
    max_numeric_charts: Option<usize>,
    max_categorical_charts: Option<usize>,
    bar_top_k: Option<usize>,
    distribution_sample_cap: Option<usize>,
    scatter_sample_cap: Option<usize>,
    sample_seed: Option<u64>,
    output_dir: Option<PathBuf>,
    report_format: Option<ReportFormat>,
    generate_reports: Option<bool>,
}

impl PipelineConfigBuilder {
    /// Set the numeric chart cap.
    pub fn max_numeric_charts(mut self, cap: usize) -> Self {
        self.max_numeric_charts = Some(cap);
        self
    }

    /// Set the categorical chart cap.
    pub fn max_categorical_charts(mut self, cap: usize) -> Self {
        self.max_categorical_charts = Some(cap);
        self
    }

    /// Set the bar chart top-K value count.
    pub fn bar_top_k(mut self, top_k: usize) -> Self {
        self.bar_top_k = Some(top_k);
        self
    }

    /// Set the histogram/boxplot sample cap.
    pub fn distribution_sample_cap(mut self, cap: usize) -> Self {
        self.distribution_sample_cap = Some(cap);
        self
    }

    /// Set the scatter plot sample cap.
    pub fn scatter_sample_cap(mut self, cap: usize) -> Self {
        self.scatter_sample_cap = Some(cap);
        self
    }

    /// Set the down-sampling RNG seed.
    pub fn sample_seed(mut self, seed: u64) -> Self {
        self.sample_seed = Some(seed);
        self
    }

    /// Set the report output directory.
    pub fn output_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.output_dir = Some(dir.into());
        self
    }

    /// Set the report format.
    pub fn report_format(mut self, format: ReportFormat) -> Self {
        self.report_format = Some(format);
        self
    }

    /// Enable or disable report rendering.
    pub fn generate_reports(mut self, enabled: bool) -> Self {
        self.generate_reports = Some(enabled);
        self
    }

    /// Build and validate the configuration.
    pub fn build(self) -> Result<PipelineConfig, ConfigValidationError> {
        let defaults = PipelineConfig::default();
        let config = PipelineConfig {
            max_numeric_charts: self.max_numeric_charts.unwrap_or(defaults.max_numeric_charts),
            max_categorical_charts: self
                .max_categorical_charts
                .unwrap_or(defaults.max_categorical_charts),
            bar_top_k: self.bar_top_k.unwrap_or(defaults.bar_top_k),
            distribution_sample_cap: self
                .distribution_sample_cap
                .unwrap_or(defaults.distribution_sample_cap),
            scatter_sample_cap: self.scatter_sample_cap.unwrap_or(defaults.scatter_sample_cap),
            sample_seed: self.sample_seed.unwrap_or(defaults.sample_seed),
            output_dir: self.output_dir.unwrap_or(defaults.output_dir),
            report_format: self.report_format.unwrap_or(defaults.report_format),
            generate_reports: self.generate_reports.unwrap_or(defaults.generate_reports),
        };
        config.validate()?;
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = PipelineConfig::default();
        assert_eq!(config.max_numeric_charts, 6);
        assert_eq!(config.max_categorical_charts, 5);
        assert_eq!(config.bar_top_k, 15);
        assert_eq!(config.distribution_sample_cap, 1000);
        assert_eq!(config.scatter_sample_cap, 800);
        assert!(config.generate_reports);
        assert_eq!(config.report_format, ReportFormat::Markdown);
    }

    #[test]
    fn test_builder_overrides() {
        let config = PipelineConfig::builder()
            .max_numeric_charts(3)
            .bar_top_k(10)
            .report_format(ReportFormat::Html)
            .output_dir("out")
            .build()
            .unwrap();

        assert_eq!(config.max_numeric_charts, 3);
        assert_eq!(config.bar_top_k, 10);
        assert_eq!(config.report_format, ReportFormat::Html);
        assert_eq!(config.output_dir, PathBuf::from("out"));
        // untouched fields keep their defaults
        assert_eq!(config.scatter_sample_cap, 800);
    }

    #[test]
    fn test_validation_rejects_zero_caps() {
        assert!(PipelineConfig::builder().bar_top_k(0).build().is_err());
        assert!(
            PipelineConfig::builder()
                .distribution_sample_cap(0)
                .build()
                .is_err()
        );
        assert!(
            PipelineConfig::builder()
                .scatter_sample_cap(0)
                .build()
                .is_err()
        );
    }

    #[test]
    fn test_zero_chart_caps_are_allowed() {
        // A cap of zero charts is a valid way to suppress a category.
        let config = PipelineConfig::builder()
            .max_numeric_charts(0)
            .max_categorical_charts(0)
            .build()
            .unwrap();
        assert_eq!(config.max_numeric_charts, 0);
    }

    #[test]
    fn test_config_serialization_roundtrip() {
        let config = PipelineConfig::default();
        let json = serde_json::to_string(&config).unwrap();
        let back: PipelineConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(back.max_numeric_charts, config.max_numeric_charts);
        assert_eq!(back.report_format, config.report_format);
    }
}
