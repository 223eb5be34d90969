//! Insight synthesis stage.
//!
//! Builds a sanitized profiling context, hands it to an external narrative
//! provider and normalizes whatever comes back into the fixed four-field
//! [`InsightReport`]. Every failure mode — no provider, unreachable
//! provider, malformed response — degrades to the all-empty default report;
//! this stage never fails a pipeline.

#[cfg(feature = "ai")]
mod groq;
mod parser;
mod provider;

#[cfg(feature = "ai")]
pub use groq::{GroqConfig, GroqConfigBuilder, GroqProvider};
pub use provider::NarrativeProvider;

use crate::types::{EdaReport, InsightReport, TableMetadata};
use serde_json::{Map, Number, Value, json};
use tracing::{debug, warn};

/// Insight agent: context preparation, provider call, response normalization.
pub struct InsightAgent;

impl InsightAgent {
    /// Produce an insight report for a profiled table.
    ///
    /// With no provider the default report is returned directly (offline
    /// mode); with a provider, its response is normalized and any error is
    /// recovered locally.
    pub fn run(
        eda: &EdaReport,
        metadata: &TableMetadata,
        provider: Option<&dyn NarrativeProvider>,
    ) -> InsightReport {
        let context = Self::prepare_context(eda, metadata);

        let Some(provider) = provider else {
            debug!("No narrative provider configured; using default insights");
            return InsightReport::default();
        };

        match provider.generate_insights(&context) {
            Ok(text) => Self::normalize_response(&text),
            Err(e) => {
                warn!(provider = provider.name(), "Narrative provider failed: {:#}", e);
                InsightReport::default()
            }
        }
    }

    /// Build the sanitized context object sent to the provider.
    ///
    /// Restricted to the documented fields; every number is a plain finite
    /// JSON number.
    pub fn prepare_context(eda: &EdaReport, metadata: &TableMetadata) -> Value {
        let context = json!({
            "overview": eda.overview,
            "column_types": eda.column_types,
            "summary_statistics": eda.summary_statistics,
            "categorical_distributions": eda.categorical_distributions,
            "correlations": eda.correlations,
            "outliers": eda.outliers,
            "missing_values": eda.missing_values,
            "dataset_info": {
                "rows": metadata.rows,
                "columns": metadata.columns,
            },
        });
        Self::sanitize(context)
    }

    /// Recursively rebuild a JSON value with every float forced finite.
    fn sanitize(value: Value) -> Value {
        match value {
            Value::Array(items) => Value::Array(items.into_iter().map(Self::sanitize).collect()),
            Value::Object(map) => {
                let mut sanitized = Map::with_capacity(map.len());
                for (key, val) in map {
                    sanitized.insert(key, Self::sanitize(val));
                }
                Value::Object(sanitized)
            }
            Value::Number(n) => {
                if let Some(f) = n.as_f64() {
                    if n.is_f64() {
                        return Number::from_f64(crate::utils::json_safe_f64(f))
                            .map(Value::Number)
                            .unwrap_or_else(|| Value::Number(0.into()));
                    }
                }
                Value::Number(n)
            }
            other => other,
        }
    }

    /// Normalize a provider response into a fully-populated report.
    ///
    /// Accepts either a pure JSON object or free text with one embedded
    /// object; each of the four fields defaults independently when absent
    /// or of the wrong shape.
    pub fn normalize_response(text: &str) -> InsightReport {
        let direct = serde_json::from_str::<Value>(text)
            .ok()
            .filter(|v| v.is_object());
        let value = direct.or_else(|| {
            parser::extract_json_object(text).filter(|v| v.is_object())
        });

        match value {
            Some(v) => Self::report_from_value(&v),
            None => {
                warn!("No parseable JSON object in narrative response; using defaults");
                InsightReport::default()
            }
        }
    }

    fn report_from_value(value: &Value) -> InsightReport {
        InsightReport {
            summary: value
                .get("summary")
                .and_then(Value::as_str)
                .unwrap_or_default()
                .to_string(),
            key_insights: Self::string_list(value.get("key_insights")),
            risks: Self::string_list(value.get("risks")),
            recommendations: Self::string_list(value.get("recommendations")),
        }
    }

    fn string_list(value: Option<&Value>) -> Vec<String> {
        value
            .and_then(Value::as_array)
            .map(|items| {
                items
                    .iter()
                    .filter_map(Value::as_str)
                    .map(str::to_string)
                    .collect()
            })
            .unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::anyhow;

    struct CannedProvider(String);

    impl NarrativeProvider for CannedProvider {
        fn generate_insights(&self, _context: &Value) -> anyhow::Result<String> {
            Ok(self.0.clone())
        }

        fn name(&self) -> &str {
            "canned"
        }
    }

    struct FailingProvider;

    impl NarrativeProvider for FailingProvider {
        fn generate_insights(&self, _context: &Value) -> anyhow::Result<String> {
            Err(anyhow!("service unreachable"))
        }

        fn name(&self) -> &str {
            "failing"
        }
    }

    fn sample_inputs() -> (EdaReport, TableMetadata) {
        let eda = EdaReport {
            overview: crate::types::DatasetOverview { rows: 5, columns: 3 },
            ..EdaReport::default()
        };
        let metadata = TableMetadata {
            rows: 5,
            columns: vec!["id".to_string(), "category".to_string(), "value".to_string()],
            ..TableMetadata::default()
        };
        (eda, metadata)
    }

    #[test]
    fn test_context_is_restricted_to_documented_fields() {
        let (eda, metadata) = sample_inputs();
        let context = InsightAgent::prepare_context(&eda, &metadata);
        let object = context.as_object().unwrap();

        let mut keys: Vec<&String> = object.keys().collect();
        keys.sort();
        assert_eq!(
            keys,
            vec![
                "categorical_distributions",
                "column_types",
                "correlations",
                "dataset_info",
                "missing_values",
                "outliers",
                "overview",
                "summary_statistics",
            ]
        );
        assert_eq!(context["dataset_info"]["rows"], 5);
        assert_eq!(context["dataset_info"]["columns"][0], "id");
    }

    #[test]
    fn test_normalize_pure_json_object() {
        let report = InsightAgent::normalize_response(
            r#"{"summary": "s", "key_insights": ["k1", "k2"], "risks": ["r"], "recommendations": ["x"]}"#,
        );
        assert_eq!(report.summary, "s");
        assert_eq!(report.key_insights, vec!["k1", "k2"]);
        assert_eq!(report.risks, vec!["r"]);
        assert_eq!(report.recommendations, vec!["x"]);
    }

    #[test]
    fn test_normalize_embedded_object() {
        let report = InsightAgent::normalize_response(
            "Sure! Here is the analysis:\n{\"summary\": \"embedded\"}\nHope this helps.",
        );
        assert_eq!(report.summary, "embedded");
    }

    #[test]
    fn test_fields_default_independently() {
        // Only summary present: the three lists default to empty.
        let report = InsightAgent::normalize_response(r#"{"summary": "only summary"}"#);
        assert_eq!(report.summary, "only summary");
        assert!(report.key_insights.is_empty());
        assert!(report.risks.is_empty());
        assert!(report.recommendations.is_empty());

        // A wrong-shaped field defaults without dragging the others down.
        let report = InsightAgent::normalize_response(
            r#"{"summary": "s", "risks": "not a list", "recommendations": ["keep"]}"#,
        );
        assert_eq!(report.summary, "s");
        assert!(report.risks.is_empty());
        assert_eq!(report.recommendations, vec!["keep"]);
    }

    #[test]
    fn test_unparseable_response_falls_back_to_defaults() {
        let report = InsightAgent::normalize_response("I could not produce JSON, sorry.");
        assert_eq!(report, InsightReport::default());
    }

    #[test]
    fn test_provider_error_recovers_to_defaults() {
        let (eda, metadata) = sample_inputs();
        let report = InsightAgent::run(&eda, &metadata, Some(&FailingProvider));
        assert_eq!(report, InsightReport::default());
    }

    #[test]
    fn test_no_provider_yields_defaults() {
        let (eda, metadata) = sample_inputs();
        let report = InsightAgent::run(&eda, &metadata, None);
        assert_eq!(report, InsightReport::default());
    }

    #[test]
    fn test_run_with_canned_provider() {
        let (eda, metadata) = sample_inputs();
        let provider = CannedProvider(
            r#"{"summary": "clean data", "key_insights": ["low variance"]}"#.to_string(),
        );
        let report = InsightAgent::run(&eda, &metadata, Some(&provider));
        assert_eq!(report.summary, "clean data");
        assert_eq!(report.key_insights, vec!["low variance"]);
        assert!(report.risks.is_empty());
    }

    #[test]
    fn test_sanitize_forces_finite_numbers() {
        let value = json!({"a": [1.5, 2], "b": {"c": 3.25}});
        let sanitized = InsightAgent::sanitize(value.clone());
        assert_eq!(sanitized, value);
    }
}
