//! Server configuration for archlens-server
//!
//! Loads `archlens.toml` (optional) and applies environment overrides once at
//! process start. Nothing else in the crate reads the environment.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::net::{SocketAddr, ToSocketAddrs};
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;

use llm::RemoteLlmConfig;

use crate::evaluator::DEFAULT_TEMPERATURE;
use crate::grounding::{GroundingError, StaticGroundingProvider};
use crate::models::RagSource;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file {path}: {source}")]
    ReadError {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("Failed to parse TOML: {0}")]
    ParseError(#[from] toml::de::Error),
    #[error("Missing model API key: set OPENROUTER_API_KEY or model.api_key")]
    MissingApiKey,
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
    #[error(transparent)]
    Grounding(#[from] GroundingError),
}

/// HTTP listener settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerSection {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
    /// Browser origins allowed by CORS; empty allows any
    #[serde(default)]
    pub cors_origins: Vec<String>,
}

impl Default for ServerSection {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            cors_origins: Vec::new(),
        }
    }
}

/// Model provider settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelSection {
    /// Provider API key (OPENROUTER_API_KEY takes precedence)
    #[serde(default)]
    pub api_key: Option<String>,
    #[serde(default = "default_base_url")]
    pub base_url: String,
    #[serde(default = "default_model")]
    pub model: String,
    #[serde(default = "default_temperature")]
    pub temperature: f32,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
    /// Sent to OpenRouter as attribution headers
    #[serde(default)]
    pub app_name: Option<String>,
}

impl Default for ModelSection {
    fn default() -> Self {
        Self {
            api_key: None,
            base_url: default_base_url(),
            model: default_model(),
            temperature: default_temperature(),
            timeout_secs: default_timeout_secs(),
            app_name: None,
        }
    }
}

/// Complete server configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ArchLensConfig {
    #[serde(default)]
    pub server: ServerSection,
    #[serde(default)]
    pub model: ModelSection,
    /// Reference document path per grounding source name
    #[serde(default)]
    pub grounding: BTreeMap<String, PathBuf>,
}

impl ArchLensConfig {
    /// Load configuration from a TOML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::ReadError {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&content)
    }

    /// Load configuration from TOML string
    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(content)?)
    }

    /// Load configuration from the default location and the process environment
    ///
    /// Searches for config in:
    /// 1. CONFIG_PATH environment variable
    /// 2. ./config/archlens.toml
    /// 3. ./archlens.toml
    ///
    /// A missing file yields defaults; environment overrides are applied last.
    pub fn load() -> Result<Self, ConfigError> {
        let env = |key: &str| std::env::var(key).ok();

        let mut config = match env("CONFIG_PATH") {
            Some(path) => Self::from_file(path)?,
            None => {
                let candidates = [
                    PathBuf::from("config/archlens.toml"),
                    PathBuf::from("archlens.toml"),
                ];
                match candidates.iter().find(|p| p.exists()) {
                    Some(path) => Self::from_file(path)?,
                    None => Self::default(),
                }
            }
        };

        config.apply_env(env)?;
        config.validate()?;
        Ok(config)
    }

    /// Apply environment overrides using the given lookup.
    pub fn apply_env<F>(&mut self, lookup: F) -> Result<(), ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(key) = lookup("OPENROUTER_API_KEY") {
            self.model.api_key = Some(key);
        }
        if let Some(url) = lookup("OPENROUTER_BASE_URL") {
            self.model.base_url = url;
        }
        if let Some(model) = lookup("OPENROUTER_MODEL") {
            self.model.model = model;
        }
        if let Some(host) = lookup("HOST") {
            self.server.host = host;
        }
        if let Some(port) = lookup("PORT") {
            self.server.port = port
                .parse()
                .map_err(|_| ConfigError::InvalidConfig(format!("PORT must be a valid u16, got {:?}", port)))?;
        }
        Ok(())
    }

    /// Check cross-field constraints.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.api_key().is_none() {
            return Err(ConfigError::MissingApiKey);
        }
        if !(0.0..=2.0).contains(&self.model.temperature) {
            return Err(ConfigError::InvalidConfig(format!(
                "model.temperature must be between 0 and 2, got {}",
                self.model.temperature
            )));
        }
        if self.model.timeout_secs == 0 {
            return Err(ConfigError::InvalidConfig("model.timeout_secs must be positive".to_string()));
        }
        if self.model.base_url.trim().is_empty() {
            return Err(ConfigError::InvalidConfig("model.base_url must not be empty".to_string()));
        }
        if let Some(origin) = self
            .server
            .cors_origins
            .iter()
            .find(|o| !(o.starts_with("http://") || o.starts_with("https://")))
        {
            return Err(ConfigError::InvalidConfig(format!(
                "server.cors_origins entry {:?} must be an http(s) origin",
                origin
            )));
        }
        self.grounding_paths()?;
        Ok(())
    }

    /// Grounding document paths keyed by their parsed source.
    pub fn grounding_paths(&self) -> Result<Vec<(RagSource, &Path)>, ConfigError> {
        self.grounding
            .iter()
            .map(|(name, path)| {
                let source = name.parse::<RagSource>().map_err(|allowed| {
                    ConfigError::InvalidConfig(format!("grounding.{}: {}", name, allowed))
                })?;
                Ok((source, path.as_path()))
            })
            .collect()
    }

    fn api_key(&self) -> Option<&str> {
        self.model.api_key.as_deref().filter(|k| !k.trim().is_empty())
    }

    /// Socket address to bind. Hostnames such as `localhost` are resolved; the first address wins.
    pub fn socket_addr(&self) -> Result<SocketAddr, ConfigError> {
        let host = self.server.host.as_str();
        (host, self.server.port)
            .to_socket_addrs()
            .map_err(|e| ConfigError::InvalidConfig(format!("invalid listen host '{}': {}", host, e)))?
            .next()
            .ok_or_else(|| ConfigError::InvalidConfig(format!("listen host '{}' resolved to no address", host)))
    }

    /// Configuration for the model client.
    pub fn llm_config(&self) -> Result<RemoteLlmConfig, ConfigError> {
        let api_key = self.api_key().ok_or(ConfigError::MissingApiKey)?;
        let mut config = RemoteLlmConfig::new(api_key, &self.model.base_url, &self.model.model)
            .with_timeout(Duration::from_secs(self.model.timeout_secs));
        if let Some(app_name) = &self.model.app_name {
            config = config.with_app_name(app_name);
        }
        Ok(config)
    }

    /// Load the configured grounding documents.
    pub fn grounding_provider(&self) -> Result<StaticGroundingProvider, ConfigError> {
        Ok(StaticGroundingProvider::from_files(self.grounding_paths()?)?)
    }
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    8000
}

fn default_base_url() -> String {
    "https://openrouter.ai/api/v1".to_string()
}

fn default_model() -> String {
    "openai/gpt-oss-120b:free".to_string()
}

fn default_temperature() -> f32 {
    DEFAULT_TEMPERATURE
}

fn default_timeout_secs() -> u64 {
    120
}
