//! REST API layer
//!
//! Provides HTTP endpoints for:
//! - Liveness (`GET /`, `GET /health`)
//! - Design evaluation (`POST /api/v1/evaluate`)
//! - Prompt preview (`POST /api/v1/prompt`)

pub mod error;
pub mod handlers;
pub mod middleware;
pub mod models;
pub mod routes;

pub use error::{ApiError, ApiErrorResponse, ApiResult};
pub use routes::{create_router, AppState};
