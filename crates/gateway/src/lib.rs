//! HTTP gateway for aocook.
//!
//! Exposes the chat endpoint, a liveness probe, the tool listing, and the
//! embedded chat UI. Built on Axum.

pub mod frontend;

use std::sync::Arc;

use axum::extract::DefaultBodyLimit;
use axum::extract::rejection::JsonRejection;
use axum::{
    Router,
    extract::State,
    http::{HeaderValue, StatusCode},
    response::Json,
    routing::{get, post},
};
use serde::{Deserialize, Serialize};
use tower_http::cors::{AllowOrigin, CorsLayer};
use tracing::{error, info, warn};

use aocook_agent::{ChatRelay, SessionStore};
use aocook_config::{AppConfig, GatewayConfig};
use aocook_core::session::ConversationId;
use aocook_core::tool::ToolDefinition;
use aocook_providers::OpenAiAssistants;

/// Shared application state for the gateway.
pub struct GatewayState {
    pub relay: Arc<ChatRelay>,
    pub sessions: SessionStore,
}

type SharedState = Arc<GatewayState>;

/// Body of `POST /api/chat`.
#[derive(Debug, Deserialize)]
pub struct ChatRequest {
    #[serde(default)]
    pub message: Option<String>,

    /// Continue an existing conversation; a new one is started when absent
    #[serde(default, alias = "conversationId")]
    pub conversation_id: Option<String>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ChatResponse {
    pub response: String,
    pub conversation_id: String,
}

#[derive(Debug, Serialize)]
struct ErrorResponse {
    error: &'static str,
}

type ApiError = (StatusCode, Json<ErrorResponse>);

fn api_error(status: StatusCode, error: &'static str) -> ApiError {
    (status, Json(ErrorResponse { error }))
}

/// Build the API routes.
pub fn build_router(state: SharedState) -> Router {
    Router::new()
        .route("/api/chat", post(chat_handler))
        .route("/api/health", get(health_handler))
        .route("/api/tools", get(tools_handler))
        .with_state(state)
}

/// Build the full application: API, frontend and middleware.
///
/// Layers applied:
/// - CORS (any origin unless `allowed_origins` is set)
/// - Request body size limit (1 MB)
/// - HTTP trace logging
pub fn build_app(state: SharedState, config: &GatewayConfig) -> Router {
    build_router(state)
        .merge(frontend::frontend_router())
        .layer(DefaultBodyLimit::max(1024 * 1024))
        .layer(cors_layer(&config.allowed_origins))
        .layer(tower_http::trace::TraceLayer::new_for_http())
}

fn cors_layer(allowed_origins: &[String]) -> CorsLayer {
    if allowed_origins.is_empty() {
        return CorsLayer::permissive();
    }

    let origins: Vec<HeaderValue> = allowed_origins
        .iter()
        .filter_map(|origin| match HeaderValue::from_str(origin) {
            Ok(value) => Some(value),
            Err(_) => {
                warn!(origin = %origin, "Ignoring invalid CORS origin");
                None
            }
        })
        .collect();

    CorsLayer::new()
        .allow_origin(AllowOrigin::list(origins))
        .allow_methods([axum::http::Method::GET, axum::http::Method::POST])
        .allow_headers([axum::http::header::CONTENT_TYPE])
}

/// Start the gateway HTTP server.
pub async fn start(config: AppConfig) -> Result<(), Box<dyn std::error::Error>> {
    let addr = format!("{}:{}", config.gateway.host, config.gateway.port);

    let backend = Arc::new(OpenAiAssistants::from_config(&config)?);
    let relay = Arc::new(ChatRelay::from_config(&config, backend));
    let state = Arc::new(GatewayState {
        relay,
        sessions: SessionStore::default(),
    });

    let app = build_app(state, &config.gateway);

    info!(
        addr = %addr,
        docs = %config.knowledge.path.display(),
        model = %config.assistant.model,
        "Gateway starting"
    );
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

async fn health_handler() -> Json<serde_json::Value> {
    Json(serde_json::json!({ "status": "OK" }))
}

async fn tools_handler(State(state): State<SharedState>) -> Json<Vec<ToolDefinition>> {
    Json(state.relay.tools().definitions())
}

async fn chat_handler(
    State(state): State<SharedState>,
    payload: Result<Json<ChatRequest>, JsonRejection>,
) -> Result<Json<ChatResponse>, ApiError> {
    let request = payload.ok().map(|Json(request)| request);
    let Some((message, conversation_id)) = request.and_then(|r| {
        r.message
            .filter(|m| !m.trim().is_empty())
            .map(|m| (m, r.conversation_id))
    }) else {
        return Err(api_error(StatusCode::BAD_REQUEST, "Message is required"));
    };

    let id = conversation_id.filter(|id| !id.is_empty()).map(ConversationId);
    let handle = state.sessions.get_or_create(id).await;
    let mut session = handle.lock().await;

    match state.relay.send(&mut session, &message).await {
        Ok(outcome) => Ok(Json(ChatResponse {
            response: outcome.into_text(),
            conversation_id: session.id.to_string(),
        })),
        Err(e) => {
            error!(conversation_id = %session.id, error = %e, "Chat turn failed");
            Err(api_error(StatusCode::INTERNAL_SERVER_ERROR, "Internal server error"))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use aocook_core::assistant::{AssistantBackend, AssistantSpec, ReplyContent, Run, RunStatus, ToolOutput};
    use aocook_core::error::AssistantError;
    use aocook_core::tool::ToolRegistry;
    use axum::body::Body;
    use axum::http::Request;
    use http_body_util::BodyExt;
    use tower::ServiceExt;

    /// Completes every run at once and echoes the last user message.
    #[derive(Default)]
    struct EchoBackend {
        fail: bool,
        last_message: std::sync::Mutex<String>,
    }

    #[async_trait::async_trait]
    impl AssistantBackend for EchoBackend {
        fn name(&self) -> &str {
            "echo"
        }

        async fn create_assistant(&self, _spec: &AssistantSpec) -> Result<String, AssistantError> {
            if self.fail {
                return Err(AssistantError::AuthenticationFailed("bad key".into()));
            }
            Ok("asst_echo".into())
        }

        async fn create_thread(&self) -> Result<String, AssistantError> {
            Ok("thread_echo".into())
        }

        async fn add_user_message(&self, _thread_id: &str, content: &str) -> Result<(), AssistantError> {
            *self.last_message.lock().unwrap() = content.to_string();
            Ok(())
        }

        async fn create_run(&self, _thread_id: &str, _assistant_id: &str) -> Result<Run, AssistantError> {
            Ok(Run {
                id: "run_echo".into(),
                status: RunStatus::Completed,
                required_tool_calls: vec![],
                last_error: None,
            })
        }

        async fn get_run(&self, thread_id: &str, _run_id: &str) -> Result<Run, AssistantError> {
            self.create_run(thread_id, "").await
        }

        async fn submit_tool_outputs(
            &self,
            thread_id: &str,
            _run_id: &str,
            _outputs: Vec<ToolOutput>,
        ) -> Result<Run, AssistantError> {
            self.create_run(thread_id, "").await
        }

        async fn cancel_run(&self, _thread_id: &str, run_id: &str) -> Result<Run, AssistantError> {
            Ok(Run {
                id: run_id.into(),
                status: RunStatus::Cancelling,
                required_tool_calls: vec![],
                last_error: None,
            })
        }

        async fn latest_reply(
            &self,
            _thread_id: &str,
            _run_id: &str,
        ) -> Result<Option<ReplyContent>, AssistantError> {
            let last = self.last_message.lock().unwrap().clone();
            Ok(Some(ReplyContent::Text {
                value: format!("echo: {last}"),
            }))
        }
    }

    fn test_state(backend: EchoBackend) -> SharedState {
        let tools = Arc::new(ToolRegistry::new());
        let relay = ChatRelay::new(Arc::new(backend), tools, "AO Cook", "test-model", "Be brief");
        Arc::new(GatewayState {
            relay: Arc::new(relay),
            sessions: SessionStore::default(),
        })
    }

    fn chat_request(body: &str) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri("/api/chat")
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    async fn json_body(response: axum::response::Response) -> serde_json::Value {
        let body = response.into_body().collect().await.unwrap().to_bytes();
        serde_json::from_slice(&body).unwrap()
    }

    #[tokio::test]
    async fn health_endpoint() {
        let app = build_router(test_state(EchoBackend::default()));

        let req = Request::builder()
            .uri("/api/health")
            .body(Body::empty())
            .unwrap();

        let response = app.oneshot(req).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(json_body(response).await, serde_json::json!({"status": "OK"}));
    }

    #[tokio::test]
    async fn chat_returns_reply_and_conversation_id() {
        let app = build_router(test_state(EchoBackend::default()));

        let response = app
            .oneshot(chat_request(r#"{"message": "What is AO?"}"#))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let body = json_body(response).await;
        assert_eq!(body["response"], "echo: What is AO?");
        assert!(!body["conversation_id"].as_str().unwrap().is_empty());
    }

    #[tokio::test]
    async fn chat_continues_known_conversation() {
        let state = test_state(EchoBackend::default());
        let app = build_router(state.clone());

        let first = app
            .clone()
            .oneshot(chat_request(r#"{"message": "one"}"#))
            .await
            .unwrap();
        let id = json_body(first).await["conversation_id"].as_str().unwrap().to_string();

        let body = format!(r#"{{"message": "two", "conversationId": "{id}"}}"#);
        let second = app.oneshot(chat_request(&body)).await.unwrap();
        assert_eq!(json_body(second).await["conversation_id"], id.as_str());

        assert_eq!(state.sessions.len().await, 1);
        let session = state.sessions.get_or_create(Some(ConversationId(id))).await;
        assert_eq!(session.lock().await.turns, 2);
    }

    #[tokio::test]
    async fn chat_rejects_missing_message() {
        for body in [r#"{}"#, r#"{"message": ""}"#, r#"{"message": "   "}"#, "not json", r#"{"message": 42}"#] {
            let app = build_router(test_state(EchoBackend::default()));
            let response = app.oneshot(chat_request(body)).await.unwrap();
            assert_eq!(response.status(), StatusCode::BAD_REQUEST, "body: {body}");
            assert_eq!(
                json_body(response).await,
                serde_json::json!({"error": "Message is required"})
            );
        }
    }

    #[tokio::test]
    async fn chat_rejects_body_without_content_type() {
        let app = build_router(test_state(EchoBackend::default()));
        let req = Request::builder()
            .method("POST")
            .uri("/api/chat")
            .body(Body::from(r#"{"message": "hi"}"#))
            .unwrap();

        let response = app.oneshot(req).await.unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn relay_failure_is_internal_error() {
        let backend = EchoBackend {
            fail: true,
            ..Default::default()
        };
        let app = build_router(test_state(backend));

        let response = app.oneshot(chat_request(r#"{"message": "hi"}"#)).await.unwrap();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(
            json_body(response).await,
            serde_json::json!({"error": "Internal server error"})
        );
    }

    #[tokio::test]
    async fn tools_endpoint_lists_definitions() {
        let app = build_router(test_state(EchoBackend::default()));
        let req = Request::builder()
            .uri("/api/tools")
            .body(Body::empty())
            .unwrap();

        let response = app.oneshot(req).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(json_body(response).await, serde_json::json!([]));
    }

    #[tokio::test]
    async fn cors_allows_any_origin_by_default() {
        let app = build_app(test_state(EchoBackend::default()), &GatewayConfig::default());
        let req = Request::builder()
            .uri("/api/health")
            .header("origin", "http://example.com")
            .body(Body::empty())
            .unwrap();

        let response = app.oneshot(req).await.unwrap();
        assert_eq!(
            response.headers().get("access-control-allow-origin").unwrap(),
            "*"
        );
    }

    #[tokio::test]
    async fn cors_restricted_to_configured_origins() {
        let config = GatewayConfig {
            allowed_origins: vec!["http://localhost:5173".into()],
            ..Default::default()
        };
        let app = build_app(test_state(EchoBackend::default()), &config);

        let allowed = Request::builder()
            .uri("/api/health")
            .header("origin", "http://localhost:5173")
            .body(Body::empty())
            .unwrap();
        let response = app.clone().oneshot(allowed).await.unwrap();
        assert_eq!(
            response.headers().get("access-control-allow-origin").unwrap(),
            "http://localhost:5173"
        );

        let denied = Request::builder()
            .uri("/api/health")
            .header("origin", "http://evil.example")
            .body(Body::empty())
            .unwrap();
        let response = app.oneshot(denied).await.unwrap();
        assert!(response.headers().get("access-control-allow-origin").is_none());
    }

    #[tokio::test]
    async fn oversized_body_rejected() {
        let app = build_app(test_state(EchoBackend::default()), &GatewayConfig::default());
        let big = format!(r#"{{"message": "{}"}}"#, "a".repeat(2 * 1024 * 1024));

        let response = app.oneshot(chat_request(&big)).await.unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }
}
