//! Remote LLM provider implementations.
//!
//! # Providers
//!
//! - **OpenRouter** - Unified, OpenAI-compatible API for multiple providers

pub mod openrouter;

pub use openrouter::OpenRouterClient;
