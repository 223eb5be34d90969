//! CLI entry point for the CSV analysis pipeline.

use anyhow::{Result, anyhow};
use clap::{Parser, ValueEnum};
use dotenv::dotenv;
use sage_analysis::{Pipeline, PipelineConfig, ReportFormat};
use serde_json::json;
use tracing::{info, warn};

#[cfg(feature = "ai")]
use sage_analysis::insight::GroqProvider;
#[cfg(feature = "ai")]
use std::env;
#[cfg(feature = "ai")]
use std::sync::Arc;

/// CLI-compatible report format enum
#[derive(Debug, Clone, Copy, ValueEnum)]
enum CliReportFormat {
    /// Markdown document only
    Markdown,
    /// Markdown plus a styled HTML rendering
    Html,
}

impl From<CliReportFormat> for ReportFormat {
    fn from(cli: CliReportFormat) -> Self {
        match cli {
            CliReportFormat::Markdown => ReportFormat::Markdown,
            CliReportFormat::Html => ReportFormat::Html,
        }
    }
}

#[derive(Parser, Debug)]
#[command(
    version,
    about = "Automated CSV Analysis Pipeline",
    long_about = "Cleans a CSV dataset and derives statistics, chart specifications,\n\
                  narrative insights and a rendered report in one pass.\n\n\
                  ENVIRONMENT VARIABLES:\n  \
                  GROQ_API_KEY    API key for Groq (required for narrative insights)\n\n\
                  EXAMPLES:\n  \
                  # Basic usage\n  \
                  sage-analysis -i data.csv\n\n  \
                  # HTML report into a custom directory\n  \
                  sage-analysis -i data.csv -o reports/ --format html\n\n  \
                  # Machine-readable artifacts on stdout, no report files\n  \
                  sage-analysis -i data.csv --json --no-report\n\n  \
                  # Skip the narrative provider\n  \
                  sage-analysis -i data.csv --no-insights"
)]
struct Args {
    /// Path to the CSV file to analyze
    #[arg(short, long)]
    input: String,

    /// Output directory for report files
    #[arg(short, long, default_value = "reports")]
    output: String,

    /// Report representation(s) to render
    #[arg(long, value_enum, default_value = "markdown")]
    format: CliReportFormat,

    /// Skip report file rendering
    #[arg(long)]
    no_report: bool,

    /// Skip the narrative provider (insights default to empty)
    #[arg(long)]
    no_insights: bool,

    /// Log level (trace, debug, info, warn, error)
    #[arg(short, long, default_value = "info")]
    log_level: String,

    /// Suppress progress output (only show warnings and errors)
    #[arg(short, long)]
    quiet: bool,

    /// Print the artifacts as JSON to stdout
    ///
    /// Disables all progress logs; only outputs the final JSON document.
    /// Useful for piping to other tools: `... --json | jq .eda.overview`
    #[arg(long)]
    json: bool,
}

/// Initialize the tracing subscriber for logging.
///
/// When `json_output` is true, logging is completely disabled to ensure
/// only JSON is written to stdout.
fn init_logging(level: &str, quiet: bool, json_output: bool) {
    if json_output {
        return;
    }

    use tracing_subscriber::EnvFilter;

    let effective_level = if quiet { "warn" } else { level };
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(effective_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();
}

#[cfg(feature = "ai")]
fn narrative_provider(disabled: bool) -> Option<Arc<GroqProvider>> {
    if disabled {
        return None;
    }
    match env::var("GROQ_API_KEY") {
        Ok(key) if !key.is_empty() => match GroqProvider::new(key) {
            Ok(provider) => Some(Arc::new(provider)),
            Err(e) => {
                warn!("Failed to create Groq provider: {}", e);
                None
            }
        },
        _ => {
            warn!("GROQ_API_KEY not set; insights will use defaults");
            None
        }
    }
}

fn main() -> Result<()> {
    dotenv().ok();
    let args = Args::parse();
    init_logging(&args.log_level, args.quiet, args.json);

    let config = PipelineConfig::builder()
        .output_dir(args.output.clone())
        .report_format(args.format.into())
        .generate_reports(!args.no_report)
        .build()
        .map_err(|e| anyhow!("Invalid configuration: {}", e))?;

    let mut builder = Pipeline::builder().config(config);

    #[cfg(feature = "ai")]
    if let Some(provider) = narrative_provider(args.no_insights) {
        builder = builder.narrative_provider(provider);
    }
    #[cfg(not(feature = "ai"))]
    if !args.no_insights {
        warn!("Built without the 'ai' feature; insights will use defaults");
    }

    let pipeline = builder.build()?;
    let result = pipeline
        .process(&args.input)
        .map_err(|e| anyhow!("{} ({})", e, e.error_code()))?;

    if args.json {
        let document = json!({
            "metadata": result.metadata,
            "eda": result.eda,
            "charts": result.charts,
            "insights": result.insights,
            "report": result.report,
        });
        println!("{}", serde_json::to_string_pretty(&document)?);
        return Ok(());
    }

    info!(
        rows = result.metadata.rows,
        columns = result.metadata.column_count(),
        charts = result.charts.total_charts,
        "Analysis complete"
    );
    if let Some(report) = &result.report {
        println!("Report: {}", report.markdown_path.display());
        if let Some(html) = &report.html_path {
            println!("HTML report: {}", html.display());
        }
    }

    Ok(())
}
