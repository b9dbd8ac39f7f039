//! Connection settings for OpenAI-compatible chat endpoints.

use std::fmt;
use std::time::Duration;

/// Default client-side timeout for one completion.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(120);

/// Endpoint, credential, and model for a remote chat provider.
///
/// Built once at process start and handed to the client constructor; clients
/// never read the environment themselves. `Debug` output redacts the key.
#[derive(Clone, PartialEq, Eq)]
pub struct RemoteLlmConfig {
    pub api_key: String,
    /// API root, e.g. `https://openrouter.ai/api/v1`
    pub base_url: String,
    /// Provider model slug, e.g. `openai/gpt-oss-120b:free`
    pub model: String,
    pub timeout: Duration,
    /// Sent as `HTTP-Referer` / `X-Title` attribution headers
    pub app_name: Option<String>,
}

impl RemoteLlmConfig {
    pub fn new(
        api_key: impl Into<String>,
        base_url: impl Into<String>,
        model: impl Into<String>,
    ) -> Self {
        Self {
            api_key: api_key.into(),
            base_url: base_url.into(),
            model: model.into(),
            timeout: DEFAULT_TIMEOUT,
            app_name: None,
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn with_app_name(mut self, app_name: impl Into<String>) -> Self {
        self.app_name = Some(app_name.into());
        self
    }

    /// Chat completions endpoint; tolerates a trailing slash on `base_url`.
    pub fn chat_completions_url(&self) -> String {
        format!("{}/chat/completions", self.base_url.trim_end_matches('/'))
    }
}

impl fmt::Debug for RemoteLlmConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RemoteLlmConfig")
            .field("api_key", &"<redacted>")
            .field("base_url", &self.base_url)
            .field("model", &self.model)
            .field("timeout", &self.timeout)
            .field("app_name", &self.app_name)
            .finish()
    }
}
