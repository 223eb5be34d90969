//! The analysis pipeline and its builder.

use crate::charts::ChartPlanner;
use crate::cleaner::DataCleaner;
use crate::config::PipelineConfig;
use crate::error::{AnalysisError, Result};
use crate::insight::{InsightAgent, NarrativeProvider};
use crate::profiler::DataProfiler;
use crate::reporting::ReportGenerator;
use crate::types::{AnalysisResult, AnalysisState};
use std::path::Path;
use std::sync::Arc;
use std::time::Instant;
use tracing::{error, info};

/// The five-stage CSV analysis pipeline.
///
/// Use [`Pipeline::builder()`] to configure and construct one. The narrative
/// provider handle is owned by the embedding layer and passed in here; a
/// pipeline without a provider produces default (empty) insights.
///
/// # Example
///
/// ```rust,ignore
/// use sage_analysis::{Pipeline, PipelineConfig};
/// use sage_analysis::insight::GroqProvider;
/// use std::sync::Arc;
///
/// let provider = Arc::new(GroqProvider::new(api_key)?);
///
/// let result = Pipeline::builder()
///     .narrative_provider(provider)
///     .config(PipelineConfig::default())
///     .build()?
///     .process("data.csv")?;
///
/// println!("{} charts planned", result.charts.total_charts);
/// ```
pub struct Pipeline {
    config: PipelineConfig,
    narrative_provider: Option<Arc<dyn NarrativeProvider>>,
    reporter: ReportGenerator,
}

impl std::fmt::Debug for Pipeline {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Pipeline")
            .field("config", &self.config)
            .field(
                "narrative_provider",
                &self.narrative_provider.as_ref().map(|_| "<provider>"),
            )
            .field("reporter", &"<reporter>")
            .finish()
    }
}

// One pipeline may be handed to a worker thread by the embedding layer.
static_assertions::assert_impl_all!(Pipeline: Send);

impl Pipeline {
    /// Create a new pipeline builder.
    pub fn builder() -> PipelineBuilder {
        PipelineBuilder::default()
    }

    /// Run the full pipeline on a CSV file.
    ///
    /// # Errors
    ///
    /// - [`AnalysisError::CleaningFailed`] when stage 1 reports an error
    ///   outcome (missing file, unreadable CSV, ...)
    /// - [`AnalysisError::ProfilingFailed`] / [`AnalysisError::ChartPlanningFailed`]
    ///   on unexpected stage faults
    /// - [`AnalysisError::ReportRenderFailed`] when the output location is
    ///   unwritable; all in-memory artifacts up to that point were valid
    ///
    /// Narrative provider failures never surface here; stage 4 recovers to
    /// default insights locally.
    pub fn process(&self, path: impl AsRef<Path>) -> Result<AnalysisResult> {
        match self.process_internal(path.as_ref()) {
            Ok(result) => Ok(result),
            Err(e) => {
                error!("Pipeline error: {}", e);
                Err(e)
            }
        }
    }

    fn process_internal(&self, path: &Path) -> Result<AnalysisResult> {
        let start_time = Instant::now();
        info!(path = %path.display(), "Starting analysis pipeline");

        let mut state = AnalysisState::new(path);

        // Stage 1: cleaning. The stage never raises; the orchestrator
        // checks its status flag and aborts on anything but success.
        let outcome = DataCleaner::preprocess(path);
        if !outcome.is_success() {
            return Err(AnalysisError::CleaningFailed(outcome.message));
        }
        state.table = outcome.table;
        state.metadata = Some(outcome.metadata);

        let table = Self::written(&state.table, "cleaning")?;
        let metadata = Self::written(&state.metadata, "cleaning")?;

        // Stage 2: profiling.
        let eda = DataProfiler::run(table)
            .map_err(|e| AnalysisError::ProfilingFailed(format!("{:#}", e)))?;
        state.eda = Some(eda);

        // Stage 3: chart planning.
        let charts = ChartPlanner::plan(table, metadata, &self.config)
            .map_err(|e| AnalysisError::ChartPlanningFailed(format!("{:#}", e)))?;
        state.charts = Some(charts);

        // Stage 4: insight synthesis. Degrades to defaults internally.
        let insights = InsightAgent::run(
            Self::written(&state.eda, "profiling")?,
            metadata,
            self.narrative_provider.as_deref(),
        );
        state.insights = Some(insights);

        // Stage 5: report assembly.
        if self.config.generate_reports {
            let report = self
                .reporter
                .render(
                    Self::written(&state.eda, "profiling")?,
                    Self::written(&state.charts, "chart planning")?,
                    Self::written(&state.insights, "insight synthesis")?,
                )
                .map_err(|e| AnalysisError::ReportRenderFailed(format!("{:#}", e)))?;
            state.report = Some(report);
        }

        info!(
            duration_ms = start_time.elapsed().as_millis() as u64,
            "Analysis pipeline completed"
        );

        let AnalysisState {
            table: Some(table),
            metadata: Some(metadata),
            eda: Some(eda),
            charts: Some(charts),
            insights: Some(insights),
            report,
            ..
        } = state
        else {
            return Err(AnalysisError::Internal(
                "pipeline state incompletely populated".into(),
            ));
        };

        Ok(AnalysisResult {
            table,
            metadata,
            eda,
            charts,
            insights,
            report,
        })
    }

    /// Borrow a field another stage has already written.
    fn written<'a, T>(field: &'a Option<T>, stage: &str) -> Result<&'a T> {
        field
            .as_ref()
            .ok_or_else(|| AnalysisError::Internal(format!("missing {} artifact", stage)))
    }
}

/// Builder for [`Pipeline`].
#[derive(Default)]
pub struct PipelineBuilder {
    config: Option<PipelineConfig>,
    narrative_provider: Option<Arc<dyn NarrativeProvider>>,
}

impl PipelineBuilder {
    /// Set the pipeline configuration.
    pub fn config(mut self, config: PipelineConfig) -> Self {
        self.config = Some(config);
        self
    }

    /// Set the narrative provider used by insight synthesis.
    pub fn narrative_provider(mut self, provider: Arc<dyn NarrativeProvider>) -> Self {
        self.narrative_provider = Some(provider);
        self
    }

    /// Build the pipeline.
    pub fn build(self) -> Result<Pipeline> {
        let config = self.config.unwrap_or_default();
        config
            .validate()
            .map_err(|e| AnalysisError::InvalidConfig(e.to_string()))?;

        let reporter = ReportGenerator::new(config.output_dir.clone(), config.report_format);

        Ok(Pipeline {
            config,
            narrative_provider: self.narrative_provider,
            reporter,
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

    fn no_report_pipeline() -> Pipeline {
        Pipeline::builder()
            .config(
                PipelineConfig::builder()
                    .generate_reports(false)
                    .build()
                    .unwrap(),
            )
            .build()
            .unwrap()
    }

    #[test]
    fn test_process_happy_path() {
        let file = write_csv(
            "Id,Category,Value\n\
             1,A,10\n\
             2,A,20\n\
             3,B,\n\
             4,B,40\n\
             5,C,50\n",
        );

        let result = no_report_pipeline().process(file.path()).unwrap();

        assert_eq!(result.metadata.rows, 5);
        assert_eq!(result.eda.overview.rows, 5);
        assert!(result.charts.total_charts > 0);
        // No provider: default insights.
        assert_eq!(result.insights, crate::types::InsightReport::default());
        // Reports disabled.
        assert!(result.report.is_none());
    }

    #[test]
    fn test_missing_file_aborts_with_cleaning_error() {
        let result = no_report_pipeline().process("/nonexistent/data.csv");
        let err = result.unwrap_err();
        assert!(err.is_cleaning_error());
        assert_eq!(err.error_code(), "CLEANING_FAILED");
        assert!(err.to_string().contains("File not found"));
    }

    #[test]
    fn test_unwritable_report_dir_fails_stage_five_only() {
        let file = write_csv("a,b\n1,x\n2,y\n");
        let dir = tempfile::tempdir().unwrap();
        let blocked = dir.path().join("blocked");
        std::fs::write(&blocked, b"file").unwrap();

        let pipeline = Pipeline::builder()
            .config(
                PipelineConfig::builder()
                    .output_dir(blocked)
                    .build()
                    .unwrap(),
            )
            .build()
            .unwrap();

        let err = pipeline.process(file.path()).unwrap_err();
        assert_eq!(err.error_code(), "REPORT_RENDER_FAILED");
    }

    #[test]
    fn test_report_written_when_enabled() {
        let file = write_csv("a,b\n1,x\n2,y\n3,x\n");
        let dir = tempfile::tempdir().unwrap();

        let pipeline = Pipeline::builder()
            .config(
                PipelineConfig::builder()
                    .output_dir(dir.path())
                    .build()
                    .unwrap(),
            )
            .build()
            .unwrap();

        let result = pipeline.process(file.path()).unwrap();
        let report = result.report.unwrap();
        assert!(report.markdown_path.exists());
        assert!(report.html_path.is_none());
    }

    #[test]
    fn test_invalid_config_rejected_at_build() {
        let result = Pipeline::builder()
            .config(PipelineConfig {
                bar_top_k: 0,
                ..PipelineConfig::default()
            })
            .build();
        assert!(matches!(
            result.unwrap_err(),
            AnalysisError::InvalidConfig(_)
        ));
    }
}
