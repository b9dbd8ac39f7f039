//! OpenRouter chat completions client.
//!
//! Sends one non-streaming `/chat/completions` request per call and maps
//! HTTP failures onto [`LlmError`] variants. Retries are left to the caller.
//!
//! ```rust,ignore
//! let client = OpenRouterClient::new(RemoteLlmConfig::new(key, base_url, "openai/gpt-oss-120b:free"))?;
//! let reply = client.chat(ChatRequest::new(vec![ChatMessage::user("ping")])).await?;
//! ```

use crate::chat::{ChatMessage, ChatModel, ChatRequest, ChatResponse, UsageMetadata};
use crate::config::RemoteLlmConfig;
use crate::error::{LlmError, Result};
use async_trait::async_trait;
use reqwest::header::{HeaderMap, RETRY_AFTER};
use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::time::Duration;
use tracing::{debug, warn};

/// Chat model backed by the OpenRouter HTTP API
#[derive(Clone)]
pub struct OpenRouterClient {
    config: RemoteLlmConfig,
    client: Client,
}

impl OpenRouterClient {
    /// Build the HTTP client; the configured timeout covers the whole call.
    pub fn new(config: RemoteLlmConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| LlmError::Config(format!("failed to create HTTP client: {}", e)))?;

        Ok(Self { config, client })
    }

    /// Convert a chat message to OpenRouter message format.
    fn convert_message(msg: &ChatMessage) -> OpenRouterMessage {
        OpenRouterMessage {
            role: msg.role.as_str().to_string(),
            content: Some(msg.content.clone()),
        }
    }

    fn build_body(&self, request: &ChatRequest) -> OpenRouterRequest {
        OpenRouterRequest {
            model: self.config.model.clone(),
            messages: request.messages.iter().map(Self::convert_message).collect(),
            temperature: request.config.temperature,
            response_format: request.config.json_output.then(ResponseFormat::json_object),
            stream: false,
        }
    }

    /// Take the first choice's text plus usage and routing metadata.
    ///
    /// OpenRouter may answer 200 with an `error` object when the routed
    /// provider fails mid-generation; that is treated like a non-success status.
    fn convert_response(router_resp: OpenRouterResponse) -> Result<ChatResponse> {
        if let Some(error) = router_resp.error {
            return Err(Self::status_error(error.status(), error.message, None));
        }

        let choice = router_resp
            .choices
            .into_iter()
            .next()
            .ok_or_else(|| LlmError::MalformedCompletion("response contained no choices".to_string()))?;

        let content = choice
            .message
            .content
            .ok_or_else(|| LlmError::MalformedCompletion("assistant message has no content".to_string()))?;

        let usage = router_resp
            .usage
            .as_ref()
            .map(|u| UsageMetadata::new(u.prompt_tokens, u.completion_tokens));

        let mut metadata = HashMap::new();
        metadata.insert(
            "model".to_string(),
            serde_json::Value::String(router_resp.model.unwrap_or_default()),
        );
        metadata.insert(
            "finish_reason".to_string(),
            serde_json::Value::String(choice.finish_reason.unwrap_or_default()),
        );
        if let Some(provider) = router_resp.provider {
            metadata.insert("provider".to_string(), serde_json::Value::String(provider));
        }

        Ok(ChatResponse {
            content,
            usage,
            metadata,
        })
    }

    fn status_error(status: StatusCode, message: String, retry_after: Option<Duration>) -> LlmError {
        match status {
            StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => LlmError::Unauthorized {
                status: status.as_u16(),
                message,
            },
            StatusCode::TOO_MANY_REQUESTS => LlmError::RateLimited { retry_after },
            _ => LlmError::Upstream {
                status: status.as_u16(),
                message,
            },
        }
    }

    /// Prefer the message inside OpenRouter's error envelope over the raw body.
    fn error_message(body: &str) -> String {
        match serde_json::from_str::<OpenRouterErrorEnvelope>(body) {
            Ok(envelope) => envelope.error.message,
            Err(_) => body.trim().to_string(),
        }
    }

    fn transport_error(&self, err: reqwest::Error) -> LlmError {
        if err.is_timeout() {
            LlmError::Timeout(self.config.timeout)
        } else {
            LlmError::Transport(err)
        }
    }

    /// `Retry-After` in its delta-seconds form.
    fn retry_after(headers: &HeaderMap) -> Option<Duration> {
        headers
            .get(RETRY_AFTER)?
            .to_str()
            .ok()?
            .trim()
            .parse::<u64>()
            .ok()
            .map(Duration::from_secs)
    }
}

#[async_trait]
impl ChatModel for OpenRouterClient {
    async fn chat(&self, request: ChatRequest) -> Result<ChatResponse> {
        let url = self.config.chat_completions_url();
        let req_body = self.build_body(&request);

        let mut req = self
            .client
            .post(&url)
            .bearer_auth(&self.config.api_key)
            .json(&req_body);

        // OpenRouter attribution headers
        if let Some(app_name) = &self.config.app_name {
            req = req.header("HTTP-Referer", app_name);
            req = req.header("X-Title", app_name);
        }

        debug!(model = %self.config.model, messages = req_body.messages.len(), "sending chat completion");

        let response = req.send().await.map_err(|e| self.transport_error(e))?;

        let status = response.status();
        if !status.is_success() {
            let retry_after = Self::retry_after(response.headers());
            let body = response.text().await.unwrap_or_default();
            warn!(status = status.as_u16(), "chat completion failed");
            return Err(Self::status_error(status, Self::error_message(&body), retry_after));
        }

        let body = response.text().await.map_err(|e| self.transport_error(e))?;
        let router_resp: OpenRouterResponse = serde_json::from_str(&body)?;

        Self::convert_response(router_resp)
    }

    fn model_name(&self) -> &str {
        &self.config.model
    }
}

// Wire format
#[derive(Debug, Serialize)]
struct OpenRouterRequest {
    model: String,
    messages: Vec<OpenRouterMessage>,
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    response_format: Option<ResponseFormat>,
    stream: bool,
}

#[derive(Debug, Serialize)]
struct ResponseFormat {
    #[serde(rename = "type")]
    kind: &'static str,
}

impl ResponseFormat {
    fn json_object() -> Self {
        Self { kind: "json_object" }
    }
}

#[derive(Debug, Serialize, Deserialize)]
struct OpenRouterMessage {
    role: String,
    #[serde(default)]
    content: Option<String>,
}

#[derive(Debug, Deserialize)]
struct OpenRouterResponse {
    #[serde(default)]
    model: Option<String>,
    #[serde(default)]
    choices: Vec<OpenRouterChoice>,
    usage: Option<OpenRouterUsage>,
    #[serde(default)]
    provider: Option<String>,
    #[serde(default)]
    error: Option<OpenRouterErrorBody>,
}

#[derive(Debug, Deserialize)]
struct OpenRouterErrorEnvelope {
    error: OpenRouterErrorBody,
}

#[derive(Debug, Deserialize)]
struct OpenRouterErrorBody {
    #[serde(default)]
    code: Option<u16>,
    message: String,
}

impl OpenRouterErrorBody {
    fn status(&self) -> StatusCode {
        self.code
            .and_then(|code| StatusCode::from_u16(code).ok())
            .unwrap_or(StatusCode::BAD_GATEWAY)
    }
}

#[derive(Debug, Deserialize)]
struct OpenRouterChoice {
    message: OpenRouterMessage,
    finish_reason: Option<String>,
}

#[derive(Debug, Deserialize)]
struct OpenRouterUsage {
    prompt_tokens: usize,
    completion_tokens: usize,
}
