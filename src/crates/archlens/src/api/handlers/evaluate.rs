//! Evaluation endpoint handlers

use axum::{extract::State, Json};
use serde_json::Value;

use crate::api::{error::ApiResult, routes::AppState};
use crate::models::{EvaluationRequest, EvaluationResult};
use crate::prompt::RenderedPrompt;

/// Evaluate a system design
///
/// POST /api/v1/evaluate
pub async fn evaluate(
    State(app_state): State<AppState>,
    payload: Result<Json<Value>, axum::extract::rejection::JsonRejection>,
) -> ApiResult<Json<EvaluationResult>> {
    let Json(raw) = payload?;
    let request = EvaluationRequest::validate(&raw)?;

    tracing::info!(
        design_bytes = request.design_text.len(),
        rag_enabled = request.rag_config.enabled,
        focus_areas = request.focus_areas.len(),
        "evaluating design"
    );

    let result = app_state.evaluator.evaluate(&request).await?;
    Ok(Json(result))
}

/// Render the prompt an evaluation would send, without calling the model
///
/// POST /api/v1/prompt
pub async fn preview_prompt(
    State(app_state): State<AppState>,
    payload: Result<Json<Value>, axum::extract::rejection::JsonRejection>,
) -> ApiResult<Json<RenderedPrompt>> {
    let Json(raw) = payload?;
    let request = EvaluationRequest::validate(&raw)?;

    Ok(Json(app_state.evaluator.render(&request).await))
}
