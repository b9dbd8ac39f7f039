//! Prompt construction
//!
//! Renders the two-part prompt sent to the model:
//! - a fixed system instruction establishing the reviewer persona and rules
//! - a user instruction composed from ordered, independently gated sections
//!
//! Rendering is pure. The same request and grounding text always produce
//! byte-identical output, and no input is ever rejected here.

mod sections;

use serde::{Deserialize, Serialize};

use crate::models::EvaluationRequest;

pub use sections::{SectionInput, SectionRenderer, USER_SECTIONS};

/// Reviewer persona and behavioral rules, identical for every request.
pub const SYSTEM_PROMPT: &str = "\
You are a senior software engineer performing a system design review.

You evaluate the design you are given; you do not redesign it or propose an ideal architecture.
Concentrate on trade-offs, scalability limits, reliability risks, failure modes, and cost implications.

Rules you must follow at all times:
- Reason explicitly and step by step.
- Whenever information is missing or unclear, state the assumption you are making.
- Avoid vague language and avoid false precision.
- Never present a single \"best\" solution; discuss the trade-offs between options instead.
- Always identify what breaks first under load or partial failure.
- Keep cost estimates directional and tied to stated assumptions.
- Never invent exact prices, benchmarks, or guarantees.
";

/// A fully rendered prompt, consumed by a single model call
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RenderedPrompt {
    pub system: String,
    pub user: String,
}

/// Return the fixed system instruction.
pub fn build_system_prompt() -> &'static str {
    SYSTEM_PROMPT
}

/// Render the user instruction by applying every section renderer in order.
pub fn build_user_prompt(request: &EvaluationRequest, grounding: Option<&str>) -> String {
    let input = SectionInput::new(request, grounding);
    USER_SECTIONS
        .iter()
        .filter_map(|render| render(&input))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Render both halves of the prompt.
pub fn build_prompt(request: &EvaluationRequest, grounding: Option<&str>) -> RenderedPrompt {
    RenderedPrompt {
        system: build_system_prompt().to_string(),
        user: build_user_prompt(request, grounding),
    }
}
