//! HTTP-level tests for the API router

use archlens::api::{create_router, ApiErrorResponse};
use archlens::{Evaluator, RenderedPrompt};
use async_trait::async_trait;
use axum::body::Body;
use axum::http::{header, Request, StatusCode};
use axum::Router;
use http_body_util::BodyExt;
use llm::{ChatModel, ChatRequest, ChatResponse, LlmError};
use serde_json::{json, Value};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use tower::ServiceExt;

enum Reply {
    Text(String),
    Unreachable,
}

struct StubModel {
    reply: Reply,
    calls: AtomicUsize,
}

impl StubModel {
    fn new(reply: Reply) -> Arc<Self> {
        Arc::new(Self {
            reply,
            calls: AtomicUsize::new(0),
        })
    }
}

#[async_trait]
impl ChatModel for StubModel {
    async fn chat(&self, _request: ChatRequest) -> llm::Result<ChatResponse> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        match &self.reply {
            Reply::Text(text) => Ok(ChatResponse::new(text.clone())),
            Reply::Unreachable => Err(LlmError::Upstream {
                status: 502,
                message: "no healthy provider".to_string(),
            }),
        }
    }

    fn model_name(&self) -> &str {
        "stub"
    }
}

fn app(model: Arc<StubModel>) -> Router {
    create_router(Arc::new(Evaluator::new(model)), &[])
}

fn post_json(uri: &str, body: impl Into<String>) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.into()))
        .unwrap()
}

async fn read_json<T: serde::de::DeserializeOwned>(response: axum::response::Response) -> T {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

fn evaluation_json() -> Value {
    json!({
        "architecture_breakdown": {"components": [], "assumptions": ["No design details given"]},
        "data_flow": {"read_path": [], "write_path": [], "synchronous_operations": [], "asynchronous_operations": []},
        "scalability_analysis": {"scalable_components": [], "bottlenecks": []},
        "reliability_analysis": {
            "single_points_of_failure": ["Database"],
            "what_breaks_first": "Database",
            "failure_modes": []
        },
        "cost_tradeoffs": [],
        "infra_cost_estimates": [],
        "assumptions": [],
        "overall_summary": "Too little detail for a confident review."
    })
}

#[tokio::test]
async fn test_health_endpoints() {
    let router = app(StubModel::new(Reply::Unreachable));

    for uri in ["/", "/health"] {
        let response = router
            .clone()
            .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let body: Value = read_json(response).await;
        assert_eq!(body, json!({"status": "archlens backend is running"}));
    }
}

#[tokio::test]
async fn test_evaluate_success() {
    let model = StubModel::new(Reply::Text(evaluation_json().to_string()));
    let response = app(model.clone())
        .oneshot(post_json("/api/v1/evaluate", r#"{"design_text": "Single VM running everything"}"#))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body: Value = read_json(response).await;
    assert_eq!(body, evaluation_json());
    assert_eq!(model.calls.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn test_invalid_request_is_422_with_details() {
    let model = StubModel::new(Reply::Unreachable);
    let payload = json!({
        "design_text": "",
        "context": {"system_type": "hobby"},
        "focus_areas": ["cost", "latency"]
    });
    let response = app(model.clone())
        .oneshot(post_json("/api/v1/evaluate", payload.to_string()))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    let body: ApiErrorResponse = read_json(response).await;
    assert_eq!(body.code, "VALIDATION_ERROR");

    let fields: Vec<&str> = body.details.iter().map(|d| d.field.as_str()).collect();
    assert_eq!(fields, vec!["design_text", "context.system_type", "focus_areas[1]"]);
    assert_eq!(model.calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn test_malformed_body_is_400() {
    let response = app(StubModel::new(Reply::Unreachable))
        .oneshot(post_json("/api/v1/evaluate", "{not json"))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body: ApiErrorResponse = read_json(response).await;
    assert_eq!(body.code, "BAD_REQUEST");
    assert!(body.details.is_empty());
}

#[tokio::test]
async fn test_provider_failure_is_502_invocation() {
    let response = app(StubModel::new(Reply::Unreachable))
        .oneshot(post_json("/api/v1/evaluate", r#"{"design_text": "x"}"#))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_GATEWAY);
    let body: ApiErrorResponse = read_json(response).await;
    assert_eq!(body.code, "MODEL_INVOCATION_ERROR");
}

#[tokio::test]
async fn test_nonconforming_output_is_502_schema() {
    let response = app(StubModel::new(Reply::Text("Looks fine to me!".to_string())))
        .oneshot(post_json("/api/v1/evaluate", r#"{"design_text": "x"}"#))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_GATEWAY);
    let body: ApiErrorResponse = read_json(response).await;
    assert_eq!(body.code, "SCHEMA_ERROR");
    assert_eq!(body.error, "SchemaError");
}

#[tokio::test]
async fn test_prompt_preview_skips_model() {
    let model = StubModel::new(Reply::Unreachable);
    let payload = json!({
        "design_text": "API gateway in front of three services",
        "context": {"constraints": ["PCI-DSS"]},
        "rag_config": {"enabled": false}
    });
    let response = app(model.clone())
        .oneshot(post_json("/api/v1/prompt", payload.to_string()))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let prompt: RenderedPrompt = read_json(response).await;
    assert!(prompt.system.contains("system design review"));
    assert!(prompt.user.contains("API gateway in front of three services"));
    assert!(prompt.user.contains("  - PCI-DSS\n"));
    assert_eq!(model.calls.load(Ordering::SeqCst), 0);
}
