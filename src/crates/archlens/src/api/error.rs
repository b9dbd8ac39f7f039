//! Error responses for the evaluation API
//!
//! Maps evaluation failures onto HTTP status codes. Each failure kind has its
//! own `code` so callers can tell a provider outage from a malformed answer.

use axum::{
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::error::EvaluationError;
use crate::models::{FieldViolation, SchemaError, ValidationError};

/// JSON body of every non-2xx response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiErrorResponse {
    /// Failure kind, e.g. `SchemaError`
    pub error: String,
    pub message: String,
    /// Stable machine-readable code, e.g. `SCHEMA_ERROR`
    pub code: String,
    /// Per-field problems, for validation failures
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub details: Vec<FieldViolation>,
}

impl ApiErrorResponse {
    pub fn new(error: impl Into<String>, message: impl Into<String>, code: impl Into<String>) -> Self {
        Self {
            error: error.into(),
            message: message.into(),
            code: code.into(),
            details: Vec::new(),
        }
    }

    pub fn with_details(mut self, details: Vec<FieldViolation>) -> Self {
        self.details = details;
        self
    }
}

pub type ApiResult<T> = Result<T, ApiError>;

/// A request the API could not complete
#[derive(Debug, Error)]
pub enum ApiError {
    /// Body is not a JSON document
    #[error("Bad request: {0}")]
    BadRequest(String),

    /// Request failed schema validation
    #[error("{0}")]
    Validation(#[from] ValidationError),

    /// The model provider could not be reached or refused the call
    #[error("{0}")]
    ModelInvocation(String),

    /// The model answered outside the result schema
    #[error("{0}")]
    Schema(#[from] SchemaError),
}

impl ApiError {
    /// 400 for unreadable bodies, 422 for schema violations, 502 for model failures.
    pub fn status_code(&self) -> StatusCode {
        match self {
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::Validation(_) => StatusCode::UNPROCESSABLE_ENTITY,
            ApiError::ModelInvocation(_) | ApiError::Schema(_) => StatusCode::BAD_GATEWAY,
        }
    }

    pub fn code(&self) -> &'static str {
        match self {
            ApiError::BadRequest(_) => "BAD_REQUEST",
            ApiError::Validation(_) => "VALIDATION_ERROR",
            ApiError::ModelInvocation(_) => "MODEL_INVOCATION_ERROR",
            ApiError::Schema(_) => "SCHEMA_ERROR",
        }
    }

    pub fn error_type(&self) -> &'static str {
        match self {
            ApiError::BadRequest(_) => "BadRequest",
            ApiError::Validation(_) => "ValidationError",
            ApiError::ModelInvocation(_) => "ModelInvocationError",
            ApiError::Schema(_) => "SchemaError",
        }
    }

    fn body(&self) -> ApiErrorResponse {
        let body = ApiErrorResponse::new(self.error_type(), self.to_string(), self.code());
        match self {
            ApiError::Validation(err) => body.with_details(err.violations.clone()),
            _ => body,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let body = self.body();

        if status.is_server_error() {
            tracing::error!(code = %body.code, message = %body.message, "evaluation failed");
        } else {
            tracing::info!(code = %body.code, message = %body.message, "request rejected");
        }

        (status, Json(body)).into_response()
    }
}

impl From<EvaluationError> for ApiError {
    fn from(err: EvaluationError) -> Self {
        match err {
            EvaluationError::Validation(e) => ApiError::Validation(e),
            EvaluationError::Schema(e) => ApiError::Schema(e),
            EvaluationError::ModelInvocation(e) => ApiError::ModelInvocation(e.to_string()),
        }
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        ApiError::BadRequest(rejection.body_text())
    }
}
