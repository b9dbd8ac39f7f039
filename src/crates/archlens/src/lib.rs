//! ArchLens: LLM-backed system design review
//!
//! Turns a free-text design description plus optional context into a
//! deterministic, rule-governed prompt, sends it to a chat model, and accepts
//! the answer only if it matches the fixed evaluation schema.
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use archlens::{Evaluator, EvaluationRequest};
//! use llm::remote::OpenRouterClient;
//!
//! let client = OpenRouterClient::new(config.llm_config()?)?;
//! let evaluator = Evaluator::new(Arc::new(client));
//!
//! let request = EvaluationRequest::from_json_str(r#"{"design_text": "A monolith with a single Postgres instance"}"#)?;
//! let result = evaluator.evaluate(&request).await?;
//! println!("{}", result.reliability_analysis.what_breaks_first);
//! ```

pub mod api;
pub mod config;
pub mod error;
pub mod evaluator;
pub mod grounding;
pub mod models;
pub mod prompt;

pub use config::{ArchLensConfig, ConfigError};
pub use error::{EvaluationError, Result};
pub use evaluator::Evaluator;
pub use grounding::{GroundingError, GroundingProvider, NoGrounding, StaticGroundingProvider};
pub use models::{EvaluationRequest, EvaluationResult, SchemaError, ValidationError};
pub use prompt::{build_prompt, RenderedPrompt};
