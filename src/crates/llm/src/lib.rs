//! Chat model abstraction and provider clients for ArchLens.
//!
//! This crate defines the minimal `ChatModel` trait the evaluation pipeline
//! talks to, and ships one remote implementation:
//! - **OpenRouter** - OpenAI-compatible unified API for multiple providers
//!
//! The trait is intentionally small: one request in, one complete response
//! out. Streaming, tool calling, and retries are not part of the contract.
//!
//! # Example Usage
//!
//! ```rust,ignore
//! use llm::remote::OpenRouterClient;
//! use llm::config::RemoteLlmConfig;
//! use llm::{ChatMessage, ChatModel, ChatRequest};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = RemoteLlmConfig::new(
//!         "sk-or-...",
//!         "https://openrouter.ai/api/v1",
//!         "openai/gpt-oss-120b:free",
//!     );
//!     let client = OpenRouterClient::new(config)?;
//!
//!     let request = ChatRequest::new(vec![
//!         ChatMessage::system("You review system designs."),
//!         ChatMessage::user("A monolith with a single Postgres instance"),
//!     ])
//!     .with_temperature(0.2);
//!
//!     let response = client.chat(request).await?;
//!     println!("{}", response.content);
//!     Ok(())
//! }
//! ```

pub mod chat;
pub mod config;
pub mod error;
pub mod remote;

pub use chat::{ChatConfig, ChatMessage, ChatModel, ChatRequest, ChatResponse, ChatRole, UsageMetadata};
pub use config::RemoteLlmConfig;
pub use error::{LlmError, Result};
