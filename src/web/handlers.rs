use axum::{Json, extract::State, http::StatusCode, response::IntoResponse, response::Response};
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::sync::Arc;
use tracing::{error, info};

use crate::query::{self, ChatError};
use crate::web::state::AppState;

#[derive(Debug, Deserialize)]
pub struct ChatRequest {
    #[serde(default)]
    pub question: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct SystemStatus {
    pub version: String,
    pub uptime_seconds: i64,
}

/// POST /chat: validates the question, runs the workflow, and maps every
/// outcome to a JSON body with a status in {200, 400, 500}.
pub async fn chat(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<ChatRequest>,
) -> Response {
    let question = payload.question.unwrap_or_default();
    if question.trim().is_empty() {
        return (
            StatusCode::BAD_REQUEST,
            Json(json!({"error": "Question is required"})),
        )
            .into_response();
    }

    info!("Chat question: {}", question);

    match query::answer_question(&state.config.database, state.llm.as_ref(), &question).await {
        Ok(response) => (StatusCode::OK, Json(response)).into_response(),
        Err(ChatError::Generation { message, details }) => {
            error!("SQL generation failed: {}", message);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({"error": message, "details": details})),
            )
                .into_response()
        }
        // Everything else flattens into a generic error text
        Err(e) => {
            error!("Chat request failed: {}", e);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({"error": e.to_string()})),
            )
                .into_response()
        }
    }
}

// System status
pub async fn system_status(State(state): State<Arc<AppState>>) -> Json<SystemStatus> {
    let uptime = chrono::Utc::now()
        .signed_duration_since(state.startup_time)
        .num_seconds();

    Json(SystemStatus {
        version: env!("CARGO_PKG_VERSION").to_string(),
        uptime_seconds: uptime,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::AppConfig;
    use crate::llm::{LlmError, TextGenerator};
    use crate::web::routes;
    use async_trait::async_trait;
    use axum::Router;
    use axum::body::Body;
    use axum::http::Request;
    use http_body_util::BodyExt;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use tower::ServiceExt;

    /// Fails every call while counting them, to assert the handler rejects
    /// bad input before touching the LLM.
    struct CountingGenerator {
        calls: AtomicUsize,
    }

    #[async_trait]
    impl TextGenerator for CountingGenerator {
        async fn generate(&self, _prompt: &str) -> Result<String, LlmError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Err(LlmError::ResponseError {
                message: "should not be called".to_string(),
                details: None,
            })
        }
    }

    fn test_app() -> (Router, Arc<CountingGenerator>) {
        let llm = Arc::new(CountingGenerator {
            calls: AtomicUsize::new(0),
        });
        let state = Arc::new(AppState::new(AppConfig::default(), llm.clone()));
        (routes::api_routes().with_state(state), llm)
    }

    async fn post_chat(app: Router, body: &str) -> (StatusCode, serde_json::Value) {
        let response = app
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/chat")
                    .header("content-type", "application/json")
                    .body(Body::from(body.to_string()))
                    .unwrap(),
            )
            .await
            .unwrap();

        let status = response.status();
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        let json = serde_json::from_slice(&bytes).unwrap();
        (status, json)
    }

    #[tokio::test]
    async fn missing_question_is_rejected_without_llm_call() {
        let (app, llm) = test_app();
        let (status, body) = post_chat(app, "{}").await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], "Question is required");
        assert_eq!(llm.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn empty_question_is_rejected_without_llm_call() {
        let (app, llm) = test_app();
        let (status, body) = post_chat(app, r#"{"question": "   "}"#).await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], "Question is required");
        assert_eq!(llm.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn status_endpoint_reports_version() {
        let (app, _llm) = test_app();
        let response = app
            .oneshot(
                Request::builder()
                    .method("GET")
                    .uri("/status")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        let json: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(json["version"], env!("CARGO_PKG_VERSION"));
    }
}
