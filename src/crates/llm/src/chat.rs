//! Core chat types and the `ChatModel` trait.
//!
//! Providers convert a `ChatRequest` into their wire format, perform the call,
//! and hand back a `ChatResponse` holding the assistant's raw text. Callers
//! never see provider-specific payloads.

use crate::error::Result;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Role of a chat message author.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChatRole {
    /// Instructions that frame the whole exchange
    System,
    /// End-user input
    User,
    /// Model output
    Assistant,
}

impl ChatRole {
    /// Wire name used by OpenAI-compatible APIs.
    pub fn as_str(&self) -> &'static str {
        match self {
            ChatRole::System => "system",
            ChatRole::User => "user",
            ChatRole::Assistant => "assistant",
        }
    }
}

/// A single message in a chat exchange.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: ChatRole,
    pub content: String,
}

impl ChatMessage {
    /// Create a message with an explicit role.
    pub fn new(role: ChatRole, content: impl Into<String>) -> Self {
        Self {
            role,
            content: content.into(),
        }
    }

    /// Create a system message.
    pub fn system(content: impl Into<String>) -> Self {
        Self::new(ChatRole::System, content)
    }

    /// Create a user message.
    pub fn user(content: impl Into<String>) -> Self {
        Self::new(ChatRole::User, content)
    }
}

/// Generation parameters for a request.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ChatConfig {
    /// Sampling temperature (0.0 - 2.0)
    pub temperature: Option<f32>,

    /// Ask the provider to constrain output to a single JSON object
    pub json_output: bool,
}

/// A complete chat request.
#[derive(Debug, Clone, PartialEq)]
pub struct ChatRequest {
    pub messages: Vec<ChatMessage>,
    pub config: ChatConfig,
}

impl ChatRequest {
    /// Create a request with default generation parameters.
    pub fn new(messages: Vec<ChatMessage>) -> Self {
        Self {
            messages,
            config: ChatConfig::default(),
        }
    }

    /// Set the sampling temperature.
    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.config.temperature = Some(temperature);
        self
    }

    /// Request JSON-object output where the provider supports it.
    pub fn with_json_output(mut self) -> Self {
        self.config.json_output = true;
        self
    }
}

/// Token accounting reported by the provider.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct UsageMetadata {
    pub input_tokens: usize,
    pub output_tokens: usize,
    pub total_tokens: usize,
}

impl UsageMetadata {
    pub fn new(input_tokens: usize, output_tokens: usize) -> Self {
        Self {
            input_tokens,
            output_tokens,
            total_tokens: input_tokens + output_tokens,
        }
    }
}

/// A complete, non-streamed model response.
#[derive(Debug, Clone, PartialEq)]
pub struct ChatResponse {
    /// Raw assistant text, exactly as returned by the provider
    pub content: String,

    /// Token usage, when the provider reports it
    pub usage: Option<UsageMetadata>,

    /// Provider-specific details (model, finish reason, routed provider)
    pub metadata: HashMap<String, serde_json::Value>,
}

impl ChatResponse {
    /// Create a response carrying only text.
    pub fn new(content: impl Into<String>) -> Self {
        Self {
            content: content.into(),
            usage: None,
            metadata: HashMap::new(),
        }
    }
}

/// Provider-agnostic chat interface.
///
/// Implementations must be `Send + Sync` so a single client can be shared
/// behind an `Arc` by concurrent request handlers.
#[async_trait]
pub trait ChatModel: Send + Sync {
    /// Send the request and wait for the complete response.
    ///
    /// # Errors
    ///
    /// Returns an `LlmError` for transport failures, authentication or rate
    /// limit rejections, provider-side errors, and responses that carry no
    /// assistant message.
    async fn chat(&self, request: ChatRequest) -> Result<ChatResponse>;

    /// Identifier of the model this client targets.
    fn model_name(&self) -> &str;
}
