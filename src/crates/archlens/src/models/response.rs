//! Evaluation result schema
//!
//! The model is instructed to answer with a single JSON object in this shape.
//! Parsing is all-or-nothing: every field is required, every list must be a
//! JSON array, and `reliability_analysis.what_breaks_first` must carry text.

use serde::{Deserialize, Serialize};
use serde_json::error::Category;
use thiserror::Error;

/// A single architectural component identified in the design
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArchitectureComponent {
    /// Name of the component (e.g. "User Service", "Redis Cache")
    pub name: String,
    /// Component type (API, DB, Cache, Queue, CDN, External)
    #[serde(rename = "type")]
    pub component_type: String,
    /// Primary responsibility of the component
    pub responsibility: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArchitectureBreakdown {
    pub components: Vec<ArchitectureComponent>,
    /// Assumptions made due to missing or unclear information
    pub assumptions: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DataFlow {
    /// Step-by-step read request flow
    pub read_path: Vec<String>,
    /// Step-by-step write request flow
    pub write_path: Vec<String>,
    pub synchronous_operations: Vec<String>,
    pub asynchronous_operations: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScalabilityRisk {
    pub component: String,
    pub risk: String,
    /// Why the risk emerges under scale
    pub reason: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScalabilityAnalysis {
    /// Components that scale horizontally with minimal friction
    pub scalable_components: Vec<String>,
    pub bottlenecks: Vec<ScalabilityRisk>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FailureMode {
    pub scenario: String,
    pub impacted_components: Vec<String>,
    pub failure_behavior: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReliabilityAnalysis {
    pub single_points_of_failure: Vec<String>,
    /// First component or interaction expected to fail under load or partial outage
    pub what_breaks_first: String,
    pub failure_modes: Vec<FailureMode>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CostTradeoff {
    /// Architectural decision impacting cost
    pub decision: String,
    pub option_a: String,
    pub option_b: String,
    pub cost_impact: String,
    pub scalability_impact: String,
    pub risk: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InfraCostEstimate {
    /// Traffic tier (e.g. "1K", "100K", "1M users")
    pub user_scale: String,
    pub assumptions: Vec<String>,
    /// Directional monthly cost range, never exact pricing
    #[serde(alias = "estimated_monthly_cost_INR")]
    pub estimated_monthly_cost: String,
}

/// The structured critique returned to callers
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EvaluationResult {
    pub architecture_breakdown: ArchitectureBreakdown,
    pub data_flow: DataFlow,
    pub scalability_analysis: ScalabilityAnalysis,
    pub reliability_analysis: ReliabilityAnalysis,
    pub cost_tradeoffs: Vec<CostTradeoff>,
    pub infra_cost_estimates: Vec<InfraCostEstimate>,
    /// Global assumptions applied across the evaluation; the only optional section
    #[serde(default)]
    pub assumptions: Vec<String>,
    /// High-level assessment of the architecture and key risks
    pub overall_summary: String,
}

/// Top-level sections the model must return, in prompt order.
pub const REQUIRED_SECTIONS: [&str; 8] = [
    "architecture_breakdown",
    "data_flow",
    "scalability_analysis",
    "reliability_analysis",
    "cost_tradeoffs",
    "infra_cost_estimates",
    "assumptions",
    "overall_summary",
];

/// Model output that does not satisfy the result schema
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SchemaError {
    /// Output is not a parseable JSON document
    #[error("model output is not valid JSON: {0}")]
    InvalidJson(String),

    /// JSON parsed but a field is missing or has the wrong type
    #[error("model output does not match the evaluation schema: {0}")]
    Shape(String),

    /// A mandatory text field is present but blank
    #[error("model output field `{0}` must not be empty")]
    EmptyField(&'static str),
}

impl From<serde_json::Error> for SchemaError {
    fn from(err: serde_json::Error) -> Self {
        match err.classify() {
            Category::Data => SchemaError::Shape(err.to_string()),
            Category::Syntax | Category::Eof | Category::Io => SchemaError::InvalidJson(err.to_string()),
        }
    }
}

impl EvaluationResult {
    /// Parse raw model text into a validated result.
    pub fn parse(raw_text: &str) -> Result<Self, SchemaError> {
        let body = strip_code_fence(raw_text);
        if body.is_empty() {
            return Err(SchemaError::InvalidJson("model output is empty".to_string()));
        }

        let result: EvaluationResult = serde_json::from_str(body)?;
        result.check()?;
        Ok(result)
    }

    /// Constraints serde cannot express.
    fn check(&self) -> Result<(), SchemaError> {
        if self.reliability_analysis.what_breaks_first.trim().is_empty() {
            return Err(SchemaError::EmptyField("reliability_analysis.what_breaks_first"));
        }
        Ok(())
    }
}

/// Unwrap a single enclosing Markdown code fence, if present.
fn strip_code_fence(raw: &str) -> &str {
    let trimmed = raw.trim();
    let Some(rest) = trimmed.strip_prefix("```") else {
        return trimmed;
    };
    let Some(inner) = rest.strip_suffix("```") else {
        return trimmed;
    };
    // Drop the info string ("json", "JSON", ...), which may share the line with the body.
    match inner.split_once('\n') {
        Some((info, body)) if !info.trim_start().starts_with('{') => body.trim(),
        _ => inner.trim_start_matches(|c: char| c.is_ascii_alphabetic()).trim(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn sample() -> serde_json::Value {
        json!({
            "architecture_breakdown": {
                "components": [{"name": "API", "type": "API", "responsibility": "Serve requests"}],
                "assumptions": []
            },
            "data_flow": {
                "read_path": ["client -> API -> Postgres"],
                "write_path": ["client -> API -> Postgres"],
                "synchronous_operations": ["order placement"],
                "asynchronous_operations": []
            },
            "scalability_analysis": {
                "scalable_components": ["API"],
                "bottlenecks": [{"component": "Postgres", "risk": "write contention", "reason": "single primary"}]
            },
            "reliability_analysis": {
                "single_points_of_failure": ["Postgres"],
                "what_breaks_first": "Postgres connection pool",
                "failure_modes": [{"scenario": "primary down", "impacted_components": ["API"], "failure_behavior": "writes fail"}]
            },
            "cost_tradeoffs": [],
            "infra_cost_estimates": [{"user_scale": "10K", "assumptions": ["single region"], "estimated_monthly_cost": "low hundreds USD"}],
            "assumptions": ["stateless API"],
            "overall_summary": "Simple and cheap until the database saturates."
        })
    }

    #[test]
    fn test_parse_valid_output() {
        let result = EvaluationResult::parse(&sample().to_string()).unwrap();
        assert_eq!(result.reliability_analysis.what_breaks_first, "Postgres connection pool");
        assert_eq!(result.architecture_breakdown.components[0].component_type, "API");
    }

    #[test]
    fn test_parse_fenced_output() {
        let raw = format!("```json\n{}\n```", sample());
        assert!(EvaluationResult::parse(&raw).is_ok());

        let bare = format!("```\n{}\n```", sample());
        assert!(EvaluationResult::parse(&bare).is_ok());
    }

    #[test]
    fn test_prose_around_json_is_rejected() {
        let raw = format!("Here is the evaluation:\n{}", sample());
        assert!(matches!(
            EvaluationResult::parse(&raw),
            Err(SchemaError::InvalidJson(_))
        ));
    }

    #[test]
    fn test_missing_what_breaks_first() {
        let mut value = sample();
        value["reliability_analysis"]
            .as_object_mut()
            .unwrap()
            .remove("what_breaks_first");

        let err = EvaluationResult::parse(&value.to_string()).unwrap_err();
        assert!(matches!(err, SchemaError::Shape(ref msg) if msg.contains("what_breaks_first")));
    }

    #[test]
    fn test_blank_what_breaks_first() {
        let mut value = sample();
        value["reliability_analysis"]["what_breaks_first"] = json!("  ");

        assert_eq!(
            EvaluationResult::parse(&value.to_string()).unwrap_err(),
            SchemaError::EmptyField("reliability_analysis.what_breaks_first")
        );
    }

    #[test]
    fn test_null_list_is_rejected() {
        let mut value = sample();
        value["cost_tradeoffs"] = serde_json::Value::Null;
        assert!(matches!(
            EvaluationResult::parse(&value.to_string()),
            Err(SchemaError::Shape(_))
        ));
    }

    #[test]
    fn test_missing_global_assumptions_defaults_to_empty() {
        let mut value = sample();
        value.as_object_mut().unwrap().remove("assumptions");
        let result = EvaluationResult::parse(&value.to_string()).unwrap();
        assert!(result.assumptions.is_empty());

        value["assumptions"] = serde_json::Value::Null;
        assert!(matches!(
            EvaluationResult::parse(&value.to_string()),
            Err(SchemaError::Shape(_))
        ));
    }

    #[test]
    fn test_nested_assumptions_stay_required() {
        let mut value = sample();
        value["architecture_breakdown"]
            .as_object_mut()
            .unwrap()
            .remove("assumptions");
        assert!(matches!(
            EvaluationResult::parse(&value.to_string()),
            Err(SchemaError::Shape(ref msg)) if msg.contains("assumptions")
        ));
    }

    #[test]
    fn test_single_line_fence() {
        let raw = format!("```json{}```", sample());
        assert!(EvaluationResult::parse(&raw).is_ok());

        let bare = format!("```{}```", sample());
        assert!(EvaluationResult::parse(&bare).is_ok());
    }

    #[test]
    fn test_legacy_cost_key_is_accepted() {
        let mut value = sample();
        value["infra_cost_estimates"] = json!([
            {"user_scale": "1M", "assumptions": [], "estimated_monthly_cost_INR": "2-5 lakh"}
        ]);

        let result = EvaluationResult::parse(&value.to_string()).unwrap();
        assert_eq!(result.infra_cost_estimates[0].estimated_monthly_cost, "2-5 lakh");

        let reserialized = serde_json::to_value(&result).unwrap();
        assert!(reserialized["infra_cost_estimates"][0]
            .get("estimated_monthly_cost")
            .is_some());
    }

    #[test]
    fn test_empty_output() {
        assert!(matches!(
            EvaluationResult::parse("   "),
            Err(SchemaError::InvalidJson(_))
        ));
    }

    #[test]
    fn test_required_sections_match_serialized_keys() {
        let result = EvaluationResult::parse(&sample().to_string()).unwrap();
        let value = serde_json::to_value(&result).unwrap();
        let keys: Vec<&str> = value.as_object().unwrap().keys().map(String::as_str).collect();
        for section in REQUIRED_SECTIONS {
            assert!(keys.contains(&section), "missing {section}");
        }
        assert_eq!(keys.len(), REQUIRED_SECTIONS.len());
    }
}
