//! Evaluation pipeline
//!
//! validated request → grounding (optional) → prompt → model → result schema
//!
//! The evaluator owns no mutable state. One instance is shared by all
//! request handlers, and every call runs exactly one model invocation.

use std::sync::Arc;

use llm::{ChatMessage, ChatModel, ChatRequest, ChatResponse};
use tracing::{debug, info, warn};

use crate::error::Result;
use crate::grounding::{GroundingProvider, NoGrounding};
use crate::models::{EvaluationRequest, EvaluationResult};
use crate::prompt::{build_prompt, RenderedPrompt};

/// Sampling temperature used when none is configured.
pub const DEFAULT_TEMPERATURE: f32 = 0.2;

/// Runs design evaluations against a chat model
#[derive(Clone)]
pub struct Evaluator {
    model: Arc<dyn ChatModel>,
    grounding: Arc<dyn GroundingProvider>,
    temperature: f32,
}

impl Evaluator {
    /// Create an evaluator with no grounding provider.
    pub fn new(model: Arc<dyn ChatModel>) -> Self {
        Self {
            model,
            grounding: Arc::new(NoGrounding),
            temperature: DEFAULT_TEMPERATURE,
        }
    }

    /// Use the given grounding provider for RAG-enabled requests.
    pub fn with_grounding(mut self, grounding: Arc<dyn GroundingProvider>) -> Self {
        self.grounding = grounding;
        self
    }

    /// Set the sampling temperature passed to the model.
    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = temperature;
        self
    }

    /// Name of the underlying model.
    pub fn model_name(&self) -> &str {
        self.model.model_name()
    }

    /// Fetch grounding text for the request.
    ///
    /// Returns `None` without consulting the provider when RAG is disabled.
    /// Provider failures are logged and degrade to `None`.
    pub async fn grounding_for(&self, request: &EvaluationRequest) -> Option<String> {
        if !request.rag_config.enabled {
            return None;
        }

        match self.grounding.retrieve(&request.rag_config.sources).await {
            Ok(text) => text,
            Err(e) => {
                warn!(error = %e, "grounding unavailable, continuing without reference context");
                None
            }
        }
    }

    /// Render the prompt for a request, including any grounding text.
    pub async fn render(&self, request: &EvaluationRequest) -> RenderedPrompt {
        let grounding = self.grounding_for(request).await;
        build_prompt(request, grounding.as_deref())
    }

    /// Evaluate a validated request end to end.
    pub async fn evaluate(&self, request: &EvaluationRequest) -> Result<EvaluationResult> {
        let prompt = self.render(request).await;
        debug!(
            system_bytes = prompt.system.len(),
            user_bytes = prompt.user.len(),
            "rendered evaluation prompt"
        );

        let response = self.invoke(prompt).await?;
        let result = EvaluationResult::parse(&response.content).map_err(|e| {
            // "length" here means the completion was cut off, not that the model ignored the schema
            let finish_reason = response
                .metadata
                .get("finish_reason")
                .and_then(|v| v.as_str())
                .unwrap_or("unknown");
            warn!(
                error = %e,
                finish_reason,
                output_bytes = response.content.len(),
                "model output rejected by schema"
            );
            e
        })?;

        info!(
            model = self.model.model_name(),
            components = result.architecture_breakdown.components.len(),
            "evaluation completed"
        );
        Ok(result)
    }

    /// Send a rendered prompt to the model in JSON-output mode.
    pub async fn invoke(&self, prompt: RenderedPrompt) -> Result<ChatResponse> {
        let request = ChatRequest::new(vec![
            ChatMessage::system(prompt.system),
            ChatMessage::user(prompt.user),
        ])
        .with_temperature(self.temperature)
        .with_json_output();

        let response = self.model.chat(request).await?;
        if let Some(usage) = response.usage {
            debug!(
                input_tokens = usage.input_tokens,
                output_tokens = usage.output_tokens,
                "model usage"
            );
        }
        Ok(response)
    }
}
