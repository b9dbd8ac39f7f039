//! User prompt sections
//!
//! Each renderer emits one complete section or nothing. `USER_SECTIONS`
//! fixes the order; the builder joins the emitted sections with a blank line.

use crate::models::{ClosedSet, EvaluationRequest, REQUIRED_SECTIONS};

/// Everything a section renderer may look at.
#[derive(Debug, Clone, Copy)]
pub struct SectionInput<'a> {
    pub request: &'a EvaluationRequest,
    /// Text from the grounding provider, if any was retrieved
    pub grounding: Option<&'a str>,
}

impl<'a> SectionInput<'a> {
    pub fn new(request: &'a EvaluationRequest, grounding: Option<&'a str>) -> Self {
        Self { request, grounding }
    }

    /// Grounding text that may be shown to the model.
    ///
    /// `None` when RAG is disabled for the request or the provider supplied
    /// nothing usable, regardless of what was passed in.
    pub fn usable_grounding(&self) -> Option<&'a str> {
        if !self.request.rag_config.enabled {
            return None;
        }
        self.grounding.filter(|text| !text.trim().is_empty())
    }
}

/// Renders one section, or `None` when its gate is closed.
pub type SectionRenderer = fn(&SectionInput<'_>) -> Option<String>;

/// Section renderers in prompt order.
pub const USER_SECTIONS: &[SectionRenderer] = &[
    design_text,
    evaluation_context,
    reference_context,
    focus_areas,
    output_requirements,
];

fn heading(title: &str) -> String {
    format!("{}\n{}\n", title, "=".repeat(title.len()))
}

fn design_text(input: &SectionInput<'_>) -> Option<String> {
    let mut out = heading("SYSTEM DESIGN TO EVALUATE");
    out.push_str(&input.request.design_text);
    out.push('\n');
    Some(out)
}

fn evaluation_context(input: &SectionInput<'_>) -> Option<String> {
    let ctx = input.request.context.as_ref()?;

    let mut out = heading("EVALUATION CONTEXT");
    if let Some(system_type) = ctx.system_type {
        out.push_str(&format!("- System type: {}\n", system_type.as_str()));
    }
    if let Some(scale) = &ctx.expected_scale {
        out.push_str(&format!("- Expected scale: {}\n", scale));
    }
    if !ctx.constraints.is_empty() {
        out.push_str("- Constraints:\n");
        for constraint in &ctx.constraints {
            out.push_str(&format!("  - {}\n", constraint));
        }
    }
    Some(out)
}

fn reference_context(input: &SectionInput<'_>) -> Option<String> {
    let out = match input.usable_grounding() {
        Some(grounding) => {
            let mut out = heading("REFERENCE CONTEXT (FOR GROUNDING ONLY)");
            out.push_str(grounding);
            out.push_str(
                "\n\n\
Rules for using reference context:
- Use this context only for factual grounding (pricing ranges, latency orders, known patterns).
- Do NOT invent facts beyond the provided context.
- If information is missing, state assumptions explicitly.
",
            );
            out
        }
        None => {
            let mut out = heading("REFERENCE CONTEXT");
            out.push_str(
                "\
No external reference context is available.

Rules:
- Rely on architectural heuristics and first-principles reasoning.
- Widen uncertainty ranges where applicable.
- Explicitly list the assumptions behind cost and scalability analysis.
",
            );
            out
        }
    };
    Some(out)
}

fn focus_areas(input: &SectionInput<'_>) -> Option<String> {
    let areas = &input.request.focus_areas;
    if areas.is_empty() {
        return None;
    }

    let mut out = heading("FOCUS AREAS");
    out.push_str("Emphasize the following areas during evaluation:\n");
    for area in areas {
        out.push_str(&format!("- {}\n", area.as_str()));
    }
    Some(out)
}

/// Field names and nesting of the result object, shown to the model verbatim.
const RESULT_SKELETON: &str = r#"{
  "architecture_breakdown": {
    "components": [{"name": "string", "type": "API | DB | Cache | Queue | CDN | External", "responsibility": "string"}],
    "assumptions": ["string"]
  },
  "data_flow": {
    "read_path": ["string"],
    "write_path": ["string"],
    "synchronous_operations": ["string"],
    "asynchronous_operations": ["string"]
  },
  "scalability_analysis": {
    "scalable_components": ["string"],
    "bottlenecks": [{"component": "string", "risk": "string", "reason": "string"}]
  },
  "reliability_analysis": {
    "single_points_of_failure": ["string"],
    "what_breaks_first": "string",
    "failure_modes": [{"scenario": "string", "impacted_components": ["string"], "failure_behavior": "string"}]
  },
  "cost_tradeoffs": [{"decision": "string", "option_a": "string", "option_b": "string", "cost_impact": "string", "scalability_impact": "string", "risk": "string"}],
  "infra_cost_estimates": [{"user_scale": "string", "assumptions": ["string"], "estimated_monthly_cost": "string"}],
  "assumptions": ["string"],
  "overall_summary": "string"
}
"#;

fn output_requirements(_input: &SectionInput<'_>) -> Option<String> {
    let mut out = heading("OUTPUT REQUIREMENTS");
    out.push_str("Return the evaluation strictly using the following structured format:\n\n");
    for section in REQUIRED_SECTIONS {
        out.push_str(&format!("- {}\n", section));
        if section == "reliability_analysis" {
            out.push_str("  - Must explicitly include \"what_breaks_first\"\n");
        }
    }
    out.push_str("\nUse exactly this JSON structure (field names and nesting):\n");
    out.push_str(RESULT_SKELETON);
    out.push_str(
        "\n\
Rules:
- Respond with a single JSON object whose top-level keys are exactly the sections above.
- Do NOT omit any section.
- Do NOT add extra sections.
- Do NOT include explanatory text outside the structured output.
- All lists must be returned as lists, even if empty.
",
    );
    Some(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{EvaluationContext, FocusArea, RagConfig, SystemType};

    #[test]
    fn test_heading_underline_matches_title() {
        assert_eq!(heading("FOCUS AREAS"), "FOCUS AREAS\n===========\n");
    }

    #[test]
    fn test_context_renders_only_present_fields() {
        let request = EvaluationRequest::new("x").with_context(EvaluationContext {
            system_type: None,
            expected_scale: Some("50k DAU".to_string()),
            constraints: vec![],
        });

        let rendered = evaluation_context(&SectionInput::new(&request, None)).unwrap();
        assert_eq!(
            rendered,
            "EVALUATION CONTEXT\n==================\n- Expected scale: 50k DAU\n"
        );
    }

    #[test]
    fn test_context_section_lists_constraints_in_order() {
        let request = EvaluationRequest::new("x").with_context(EvaluationContext {
            system_type: Some(SystemType::Production),
            expected_scale: None,
            constraints: vec!["HIPAA".to_string(), "p99<200ms".to_string()],
        });

        let rendered = evaluation_context(&SectionInput::new(&request, None)).unwrap();
        assert!(rendered.contains("- System type: production\n- Constraints:\n  - HIPAA\n  - p99<200ms\n"));
    }

    #[test]
    fn test_blank_grounding_is_not_usable() {
        let request = EvaluationRequest::new("x");
        assert_eq!(SectionInput::new(&request, Some("  \n")).usable_grounding(), None);
        assert_eq!(SectionInput::new(&request, Some("p50 ~1ms")).usable_grounding(), Some("p50 ~1ms"));
    }

    #[test]
    fn test_disabled_rag_hides_grounding() {
        let request = EvaluationRequest::new("x").with_rag_config(RagConfig {
            enabled: false,
            sources: vec![],
        });
        assert_eq!(SectionInput::new(&request, Some("pricing")).usable_grounding(), None);
    }

    #[test]
    fn test_focus_areas_gate() {
        let empty = EvaluationRequest::new("x");
        assert!(focus_areas(&SectionInput::new(&empty, None)).is_none());

        let request = EvaluationRequest::new("x").with_focus_areas(vec![FocusArea::Security]);
        let rendered = focus_areas(&SectionInput::new(&request, None)).unwrap();
        assert!(rendered.ends_with("- security\n"));
    }

    #[test]
    fn test_output_requirements_lists_every_section() {
        let request = EvaluationRequest::new("x");
        let rendered = output_requirements(&SectionInput::new(&request, None)).unwrap();
        for section in REQUIRED_SECTIONS {
            assert!(rendered.contains(&format!("- {}\n", section)));
        }
        assert!(rendered.contains("- reliability_analysis\n  - Must explicitly include \"what_breaks_first\"\n"));
    }

    #[test]
    fn test_result_skeleton_is_valid_json_with_every_section() {
        let skeleton: serde_json::Value = serde_json::from_str(RESULT_SKELETON).unwrap();
        let keys: Vec<&str> = skeleton.as_object().unwrap().keys().map(String::as_str).collect();
        assert_eq!(keys.len(), REQUIRED_SECTIONS.len());
        for section in REQUIRED_SECTIONS {
            assert!(keys.contains(&section), "skeleton lacks {}", section);
        }
    }

    #[test]
    fn test_output_requirements_spell_out_nested_fields() {
        let request = EvaluationRequest::new("A monolith with a single Postgres instance");
        let rendered = output_requirements(&SectionInput::new(&request, None)).unwrap();
        for key in [
            "\"read_path\"",
            "\"bottlenecks\"",
            "\"reason\"",
            "\"impacted_components\"",
            "\"failure_behavior\"",
            "\"option_a\"",
            "\"option_b\"",
            "\"estimated_monthly_cost\"",
            "\"type\"",
            "\"responsibility\"",
        ] {
            assert!(rendered.contains(key), "missing {}", key);
        }
        let skeleton = rendered.find("\"architecture_breakdown\": {").unwrap();
        assert!(skeleton < rendered.find("Rules:").unwrap());
    }
}
