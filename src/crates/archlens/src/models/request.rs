//! Evaluation request schema
//!
//! Inbound requests arrive as loosely-typed JSON. `EvaluationRequest::validate`
//! walks the raw value field by field, collecting every violation instead of
//! stopping at the first, and produces a normalized request where every
//! optional list is an (ordered) empty vector rather than `null`.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Nature of the system being evaluated
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SystemType {
    Interview,
    Production,
    Startup,
    Enterprise,
}

/// Knowledge sources a grounding provider can draw from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RagSource {
    CloudPricing,
    LatencyBaselines,
    ArchitecturePatterns,
}

/// Architectural aspects a caller may ask the reviewer to emphasize
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FocusArea {
    Scalability,
    Reliability,
    Cost,
    Security,
}

/// Closed string enumeration with a fixed wire spelling.
///
/// Implemented by every enum the request schema accepts so that parsing,
/// rendering, and error messages share one list of allowed values.
pub trait ClosedSet: Sized + Copy + 'static {
    /// Every member, in declaration order.
    const ALL: &'static [Self];

    /// Wire spelling of this member.
    fn as_str(&self) -> &'static str;

    /// Look up a member by its wire spelling.
    fn parse_member(value: &str) -> Option<Self> {
        Self::ALL.iter().copied().find(|member| member.as_str() == value)
    }

    /// Comma-separated list of allowed spellings, for error messages.
    fn allowed() -> String {
        Self::ALL
            .iter()
            .map(|member| member.as_str())
            .collect::<Vec<_>>()
            .join(", ")
    }
}

impl ClosedSet for SystemType {
    const ALL: &'static [Self] = &[
        SystemType::Interview,
        SystemType::Production,
        SystemType::Startup,
        SystemType::Enterprise,
    ];

    fn as_str(&self) -> &'static str {
        match self {
            SystemType::Interview => "interview",
            SystemType::Production => "production",
            SystemType::Startup => "startup",
            SystemType::Enterprise => "enterprise",
        }
    }
}

impl ClosedSet for RagSource {
    const ALL: &'static [Self] = &[
        RagSource::CloudPricing,
        RagSource::LatencyBaselines,
        RagSource::ArchitecturePatterns,
    ];

    fn as_str(&self) -> &'static str {
        match self {
            RagSource::CloudPricing => "cloud_pricing",
            RagSource::LatencyBaselines => "latency_baselines",
            RagSource::ArchitecturePatterns => "architecture_patterns",
        }
    }
}

impl ClosedSet for FocusArea {
    const ALL: &'static [Self] = &[
        FocusArea::Scalability,
        FocusArea::Reliability,
        FocusArea::Cost,
        FocusArea::Security,
    ];

    fn as_str(&self) -> &'static str {
        match self {
            FocusArea::Scalability => "scalability",
            FocusArea::Reliability => "reliability",
            FocusArea::Cost => "cost",
            FocusArea::Security => "security",
        }
    }
}

macro_rules! impl_display_from_str {
    ($($ty:ty),+) => {
        $(
            impl fmt::Display for $ty {
                fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                    f.write_str(self.as_str())
                }
            }

            impl FromStr for $ty {
                type Err = String;

                fn from_str(s: &str) -> Result<Self, Self::Err> {
                    <$ty as ClosedSet>::parse_member(s)
                        .ok_or_else(|| format!("expected one of: {}", <$ty as ClosedSet>::allowed()))
                }
            }
        )+
    };
}

impl_display_from_str!(SystemType, RagSource, FocusArea);

/// Optional context that guides evaluation depth and assumptions
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EvaluationContext {
    /// Nature of the system being evaluated
    pub system_type: Option<SystemType>,

    /// Expected scale (e.g. "100k users", "10M requests/day")
    pub expected_scale: Option<String>,

    /// Explicit constraints such as compliance, latency, budget, region (order preserved)
    pub constraints: Vec<String>,
}

/// Controls for retrieval-augmented generation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RagConfig {
    /// Whether grounding text should be requested at all
    pub enabled: bool,

    /// Knowledge sources to draw from; empty means no category filter
    pub sources: Vec<RagSource>,
}

impl Default for RagConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            sources: Vec::new(),
        }
    }
}

/// A validated, normalized evaluation request
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EvaluationRequest {
    /// Textual description of the system design to be evaluated (never empty)
    pub design_text: String,

    /// Optional context to guide evaluation
    pub context: Option<EvaluationContext>,

    /// Grounding controls, always present
    pub rag_config: RagConfig,

    /// Aspects to emphasize, in caller order (duplicates preserved)
    pub focus_areas: Vec<FocusArea>,
}

impl EvaluationRequest {
    /// Create a request with defaults for everything except the design text.
    ///
    /// Does not validate; use [`EvaluationRequest::validate`] for untrusted input.
    pub fn new(design_text: impl Into<String>) -> Self {
        Self {
            design_text: design_text.into(),
            context: None,
            rag_config: RagConfig::default(),
            focus_areas: Vec::new(),
        }
    }

    pub fn with_context(mut self, context: EvaluationContext) -> Self {
        self.context = Some(context);
        self
    }

    pub fn with_rag_config(mut self, rag_config: RagConfig) -> Self {
        self.rag_config = rag_config;
        self
    }

    pub fn with_focus_areas(mut self, focus_areas: Vec<FocusArea>) -> Self {
        self.focus_areas = focus_areas;
        self
    }

    /// Parse and validate a raw JSON document.
    pub fn from_json_str(raw: &str) -> Result<Self, ValidationError> {
        let value: Value = serde_json::from_str(raw).map_err(|e| {
            ValidationError::single("$", format!("request body is not valid JSON: {}", e))
        })?;
        Self::validate(&value)
    }

    /// Validate a raw JSON value against the request schema.
    ///
    /// Every violation is reported; the error lists them in document order.
    pub fn validate(raw: &Value) -> Result<Self, ValidationError> {
        let Some(obj) = raw.as_object() else {
            return Err(ValidationError::single(
                "$",
                format!("expected a JSON object, found {}", type_name(raw)),
            ));
        };

        let mut violations = Violations::default();

        let design_text = match obj.get("design_text") {
            None | Some(Value::Null) => {
                violations.push("design_text", "field is required");
                None
            }
            Some(Value::String(text)) if text.trim().is_empty() => {
                violations.push("design_text", "must not be empty");
                None
            }
            Some(Value::String(text)) => Some(text.clone()),
            Some(other) => {
                violations.push("design_text", expected("a string", other));
                None
            }
        };

        let context = match obj.get("context") {
            None | Some(Value::Null) => None,
            Some(Value::Object(ctx)) => Some(validate_context(ctx, &mut violations)),
            Some(other) => {
                violations.push("context", expected("an object", other));
                None
            }
        };

        let rag_config = match obj.get("rag_config") {
            None | Some(Value::Null) => RagConfig::default(),
            Some(Value::Object(cfg)) => validate_rag_config(cfg, &mut violations),
            Some(other) => {
                violations.push("rag_config", expected("an object", other));
                RagConfig::default()
            }
        };

        let focus_areas = members_of::<FocusArea>(obj.get("focus_areas"), "focus_areas", &mut violations);

        violations.into_result()?;

        Ok(Self {
            // Absent only when a violation was recorded above.
            design_text: design_text.unwrap_or_default(),
            context,
            rag_config,
            focus_areas,
        })
    }
}

fn validate_context(ctx: &Map<String, Value>, violations: &mut Violations) -> EvaluationContext {
    let system_type = match ctx.get("system_type") {
        None | Some(Value::Null) => None,
        Some(value) => member_of::<SystemType>(value, "context.system_type", violations),
    };

    let expected_scale = match ctx.get("expected_scale") {
        None | Some(Value::Null) => None,
        Some(Value::String(scale)) => Some(scale.clone()),
        Some(other) => {
            violations.push("context.expected_scale", expected("a string", other));
            None
        }
    };

    let constraints = match ctx.get("constraints") {
        None | Some(Value::Null) => Vec::new(),
        Some(Value::Array(items)) => items
            .iter()
            .enumerate()
            .filter_map(|(i, item)| match item {
                Value::String(s) => Some(s.clone()),
                other => {
                    violations.push(
                        format!("context.constraints[{}]", i),
                        expected("a string", other),
                    );
                    None
                }
            })
            .collect(),
        Some(other) => {
            violations.push("context.constraints", expected("an array", other));
            Vec::new()
        }
    };

    EvaluationContext {
        system_type,
        expected_scale,
        constraints,
    }
}

fn validate_rag_config(cfg: &Map<String, Value>, violations: &mut Violations) -> RagConfig {
    let enabled = match cfg.get("enabled") {
        None | Some(Value::Null) => true,
        Some(Value::Bool(enabled)) => *enabled,
        Some(other) => {
            violations.push("rag_config.enabled", expected("a boolean", other));
            true
        }
    };

    let sources = members_of::<RagSource>(cfg.get("sources"), "rag_config.sources", violations);

    RagConfig { enabled, sources }
}

/// Validate a single closed-set member.
fn member_of<T: ClosedSet>(value: &Value, field: &str, violations: &mut Violations) -> Option<T> {
    match value {
        Value::String(s) => match T::parse_member(s) {
            Some(member) => Some(member),
            None => {
                violations.push(
                    field,
                    format!("unknown value \"{}\", expected one of: {}", s, T::allowed()),
                );
                None
            }
        },
        other => {
            violations.push(field, expected("a string", other));
            None
        }
    }
}

/// Validate an optional list of closed-set members, preserving order and duplicates.
fn members_of<T: ClosedSet>(value: Option<&Value>, field: &str, violations: &mut Violations) -> Vec<T> {
    match value {
        None | Some(Value::Null) => Vec::new(),
        Some(Value::Array(items)) => items
            .iter()
            .enumerate()
            .filter_map(|(i, item)| member_of::<T>(item, &format!("{}[{}]", field, i), violations))
            .collect(),
        Some(other) => {
            violations.push(field, expected("an array", other));
            Vec::new()
        }
    }
}

fn expected(what: &str, found: &Value) -> String {
    format!("expected {}, found {}", what, type_name(found))
}

fn type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

/// A single schema violation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldViolation {
    /// Dotted path of the offending field, e.g. `context.constraints[2]`
    pub field: String,
    /// What is wrong with it
    pub message: String,
}

impl fmt::Display for FieldViolation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

/// Request rejected by the schema; lists every violated field
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid evaluation request: {}", join_violations(.violations))]
pub struct ValidationError {
    pub violations: Vec<FieldViolation>,
}

impl ValidationError {
    fn single(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            violations: vec![FieldViolation {
                field: field.into(),
                message: message.into(),
            }],
        }
    }

    /// Paths of all violated fields, in document order.
    pub fn fields(&self) -> impl Iterator<Item = &str> {
        self.violations.iter().map(|v| v.field.as_str())
    }

    /// Whether any violation concerns `field` or one of its elements.
    pub fn mentions(&self, field: &str) -> bool {
        self.fields().any(|f| {
            f == field || f.strip_prefix(field).is_some_and(|rest| rest.starts_with(['[', '.']))
        })
    }
}

fn join_violations(violations: &[FieldViolation]) -> String {
    violations
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}

#[derive(Default)]
struct Violations(Vec<FieldViolation>);

impl Violations {
    fn push(&mut self, field: impl Into<String>, message: impl Into<String>) {
        self.0.push(FieldViolation {
            field: field.into(),
            message: message.into(),
        });
    }

    fn into_result(self) -> Result<(), ValidationError> {
        if self.0.is_empty() {
            Ok(())
        } else {
            Err(ValidationError { violations: self.0 })
        }
    }
}
