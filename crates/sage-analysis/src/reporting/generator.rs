//! Markdown/HTML report rendering.

use crate::config::ReportFormat;
use crate::types::{ChartPlan, EdaReport, InsightReport, ReportOutput};
use anyhow::{Context, Result};
use chrono::Local;
use std::fs::{self, File};
use std::io::Write;
use std::path::PathBuf;
use tracing::{debug, info};

/// Renders analysis artifacts into report files.
pub struct ReportGenerator {
    output_dir: PathBuf,
    format: ReportFormat,
}

impl Default for ReportGenerator {
    fn default() -> Self {
        Self {
            output_dir: PathBuf::from("reports"),
            format: ReportFormat::Markdown,
        }
    }
}

impl ReportGenerator {
    /// Create a generator with custom output settings.
    pub fn new(output_dir: PathBuf, format: ReportFormat) -> Self {
        Self { output_dir, format }
    }

    /// Render the report file(s) and return their paths.
    ///
    /// The markdown document is always produced; the HTML representation is
    /// additive when the format asks for it. An unwritable output location
    /// is an error — the caller's earlier artifacts stay valid regardless.
    pub fn render(
        &self,
        eda: &EdaReport,
        charts: &ChartPlan,
        insights: &InsightReport,
    ) -> Result<ReportOutput> {
        let timestamp = Local::now().format("%Y%m%d_%H%M%S").to_string();
        let base_name = format!("data_report_{}", timestamp);

        let markdown = self.build_markdown(eda, charts, insights, &timestamp);

        fs::create_dir_all(&self.output_dir).with_context(|| {
            format!("creating output directory {}", self.output_dir.display())
        })?;

        let markdown_path = self.output_dir.join(format!("{}.md", base_name));
        let mut file = File::create(&markdown_path)
            .with_context(|| format!("creating {}", markdown_path.display()))?;
        file.write_all(markdown.as_bytes())?;
        info!("Report saved: {}", markdown_path.display());

        let html_path = if self.format == ReportFormat::Html {
            let html = Self::markdown_to_html(&markdown);
            let path = self.output_dir.join(format!("{}.html", base_name));
            let mut file =
                File::create(&path).with_context(|| format!("creating {}", path.display()))?;
            file.write_all(html.as_bytes())?;
            debug!("HTML report saved: {}", path.display());
            Some(path)
        } else {
            None
        };

        Ok(ReportOutput {
            markdown_path,
            html_path,
        })
    }

    fn build_markdown(
        &self,
        eda: &EdaReport,
        charts: &ChartPlan,
        insights: &InsightReport,
        timestamp: &str,
    ) -> String {
        let mut md = format!(
            "# Automated Data Analysis Report\n\nGenerated on **{}**\n\n",
            timestamp
        );
        md.push_str(&Self::overview_section(eda, charts));
        md.push_str(&Self::column_types_section(eda));
        md.push_str(&Self::summary_section(eda));
        md.push_str(&Self::missing_section(eda));
        md.push_str(&Self::outliers_section(eda));
        md.push_str(&Self::insights_section(insights));
        md
    }

    fn overview_section(eda: &EdaReport, charts: &ChartPlan) -> String {
        format!(
            "## Dataset Overview\n\n\
             - **Total Rows:** {}\n\
             - **Total Columns:** {}\n\
             - **Charts Planned:** {}\n",
            eda.overview.rows, eda.overview.columns, charts.total_charts
        )
    }

    fn column_types_section(eda: &EdaReport) -> String {
        let mut md = String::from("\n## Column Types\n");
        let groups = [
            ("Numeric", &eda.column_types.numeric),
            ("Categorical", &eda.column_types.categorical),
            ("Datetime", &eda.column_types.datetime),
        ];
        for (label, columns) in groups {
            md.push_str(&format!("\n**{} Columns ({}):**\n", label, columns.len()));
            if columns.is_empty() {
                md.push_str("None");
            } else {
                md.push_str(&columns.join(", "));
            }
            md.push('\n');
        }
        md
    }

    fn summary_section(eda: &EdaReport) -> String {
        let mut md = String::from("\n## Summary Statistics\n");
        for (column, stats) in &eda.summary_statistics {
            md.push_str(&format!("\n### {}\n", column));
            md.push_str(&format!("- count: {}\n", stats.count));
            md.push_str(&format!("- mean: {}\n", Self::format_number(stats.mean)));
            md.push_str(&format!("- median: {}\n", Self::format_number(stats.median)));
            md.push_str(&format!("- std: {}\n", Self::format_number(stats.std)));
            md.push_str(&format!("- min: {}\n", Self::format_number(stats.min)));
            md.push_str(&format!("- max: {}\n", Self::format_number(stats.max)));
        }
        md
    }

    fn missing_section(eda: &EdaReport) -> String {
        let mut md = String::from("\n## Missing Values\n");
        for (column, count) in &eda.missing_values {
            md.push_str(&format!("- {}: {}\n", column, count));
        }
        md
    }

    fn outliers_section(eda: &EdaReport) -> String {
        let mut md = String::from("\n## Outlier Analysis\n");
        for (column, summary) in &eda.outliers {
            md.push_str(&format!(
                "\n### {}\n\
                 - Lower Bound: {}\n\
                 - Upper Bound: {}\n\
                 - Outliers Count: {}\n",
                column,
                Self::format_number(summary.lower_bound),
                Self::format_number(summary.upper_bound),
                summary.outliers_count
            ));
        }
        md
    }

    fn insights_section(insights: &InsightReport) -> String {
        let mut md = String::from("\n## AI-Generated Insights\n");

        if !insights.summary.is_empty() {
            md.push_str(&format!("\n{}\n", insights.summary));
        }

        for (index, insight) in insights.key_insights.iter().enumerate() {
            md.push_str(&format!("\n{}. {}\n", index + 1, insight));
        }

        md.push_str("\n### Recommendations\n");
        for recommendation in &insights.recommendations {
            md.push_str(&format!("- {}\n", recommendation));
        }

        md.push_str("\n### Risks & Anomalies\n");
        for risk in &insights.risks {
            md.push_str(&format!("- {}\n", risk));
        }

        md
    }

    /// Render a float rounded to four decimals, dropping trailing zeros.
    fn format_number(value: f64) -> String {
        let rounded = (value * 10_000.0).round() / 10_000.0;
        format!("{}", rounded)
    }

    fn markdown_to_html(markdown: &str) -> String {
        let escaped = markdown
            .replace('&', "&amp;")
            .replace('<', "&lt;")
            .replace('>', "&gt;");
        format!(
            "<!DOCTYPE html>\n\
             <html>\n\
             <head>\n\
             <meta charset=\"utf-8\">\n\
             <title>Automated Data Report</title>\n\
             <style>\n\
             body {{ font-family: Arial, sans-serif; padding: 40px; }}\n\
             h1, h2, h3 {{ color: #2c3e50; }}\n\
             pre {{ white-space: pre-wrap; }}\n\
             </style>\n\
             </head>\n\
             <body>\n\
             <pre>\n{}\n</pre>\n\
             </body>\n\
             </html>\n",
            escaped
        )
    }
}
