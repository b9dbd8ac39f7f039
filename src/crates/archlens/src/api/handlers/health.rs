//! Health check endpoint handler

use axum::Json;

use crate::api::models::HealthResponse;

/// Handler for GET / and GET /health
///
/// Static availability indicator; does not touch the model provider.
pub async fn health() -> Json<HealthResponse> {
    Json(HealthResponse::running())
}
