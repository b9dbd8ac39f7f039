//! API route definitions

use axum::{
    routing::{get, post},
    Router,
};
use std::sync::Arc;

use crate::api::{handlers, middleware};
use crate::evaluator::Evaluator;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub evaluator: Arc<Evaluator>,
}

/// Build the complete API router
///
/// `cors_origins` lists the browser origins allowed to call the API; empty
/// allows any origin.
pub fn create_router(evaluator: Arc<Evaluator>, cors_origins: &[String]) -> Router {
    let app_state = AppState { evaluator };

    Router::new()
        // Health check endpoints
        .route("/", get(handlers::health))
        .route("/health", get(handlers::health))
        // Evaluation endpoints
        .route("/api/v1/evaluate", post(handlers::evaluate))
        .route("/api/v1/prompt", post(handlers::preview_prompt))
        .layer(middleware::logging_layer())
        .layer(middleware::cors_layer(cors_origins))
        .with_state(app_state)
}
