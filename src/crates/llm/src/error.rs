//! Errors raised while calling a chat model.

use std::time::Duration;
use thiserror::Error;

/// Result type for LLM operations.
pub type Result<T> = std::result::Result<T, LlmError>;

/// A chat call that did not produce a completion
#[derive(Debug, Error)]
pub enum LlmError {
    /// Connection, TLS, or body transfer failure.
    #[error("transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// The provider rejected the API key (HTTP 401/403).
    #[error("provider rejected credentials (HTTP {status}): {message}")]
    Unauthorized { status: u16, message: String },

    /// HTTP 429. `retry_after` is taken from the response header when present.
    #[error("rate limited by provider{}", retry_hint(.retry_after))]
    RateLimited { retry_after: Option<Duration> },

    /// No response within the configured client timeout.
    #[error("model call timed out after {0:?}")]
    Timeout(Duration),

    /// Any other non-success status from the provider.
    #[error("provider returned HTTP {status}: {message}")]
    Upstream { status: u16, message: String },

    /// A success status whose body carries no usable completion.
    #[error("malformed completion: {0}")]
    MalformedCompletion(String),

    /// The client could not be constructed.
    #[error("invalid client configuration: {0}")]
    Config(String),
}

fn retry_hint(retry_after: &Option<Duration>) -> String {
    match retry_after {
        Some(wait) => format!(", retry after {}s", wait.as_secs()),
        None => String::new(),
    }
}

impl LlmError {
    /// Whether the same call could succeed if repeated later.
    pub fn is_retryable(&self) -> bool {
        match self {
            LlmError::Transport(_) | LlmError::Timeout(_) | LlmError::RateLimited { .. } => true,
            LlmError::Upstream { status, .. } => *status >= 500 || *status == 408,
            LlmError::Unauthorized { .. } | LlmError::MalformedCompletion(_) | LlmError::Config(_) => false,
        }
    }

    pub fn is_auth_error(&self) -> bool {
        matches!(self, LlmError::Unauthorized { .. })
    }
}

impl From<serde_json::Error> for LlmError {
    fn from(err: serde_json::Error) -> Self {
        LlmError::MalformedCompletion(err.to_string())
    }
}
