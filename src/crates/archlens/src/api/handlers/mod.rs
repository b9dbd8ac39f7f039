//! API request handlers

pub mod evaluate;
pub mod health;

pub use evaluate::{evaluate, preview_prompt};
pub use health::health;
