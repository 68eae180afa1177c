use axum::{
    middleware,
    routing::{get, post},
    Router,
};
use tower_http::trace::TraceLayer;

use super::chat;
use super::health;
use super::middleware::logging_middleware;
use super::state::AppState;

/// Create the router with application state
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/", post(chat::create_response))
        .route("/stream", post(chat::stream_response))
        // Health endpoints
        .route("/health", get(health::health_check))
        .route("/ready", get(health::ready_check))
        .route("/live", get(health::live_check))
        .with_state(state)
        .layer(middleware::from_fn(logging_middleware))
        .layer(TraceLayer::new_for_http())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{ConfigFiles, ModelConfig, StreamingConfig};
    use crate::domain::llm::{LlmResponse, Message, MockLlmProvider, ToolCall};
    use crate::domain::schema::{SchemaRegistry, CODE_SCHEMA};
    use crate::domain::structured::escape_payload;
    use crate::infrastructure::llm::StaticClientFactory;
    use axum::body::{to_bytes, Body};
    use axum::http::{header, Request, StatusCode};
    use std::fs;
    use std::sync::Arc;
    use tempfile::TempDir;
    use tower::ServiceExt;

    const CODE: &str = "def add(a, b):\n    return a + b";

    struct Harness {
        _dir: TempDir,
        provider: Arc<MockLlmProvider>,
        factory: Arc<StaticClientFactory>,
        router: Router,
    }

    fn code_response(arguments: &str) -> LlmResponse {
        LlmResponse::new(
            "chatcmpl-1".to_string(),
            "gpt-4o".to_string(),
            Message::assistant(""),
        )
        .with_tool_call(ToolCall {
            id: "call_1".to_string(),
            name: CODE_SCHEMA.to_string(),
            arguments: arguments.to_string(),
        })
    }

    fn harness(keys: &str, params: &str, provider: MockLlmProvider) -> Harness {
        let dir = TempDir::new().unwrap();
        let files = ConfigFiles {
            credentials: dir.path().join("keys.yaml"),
            parameters: dir.path().join("config.yaml"),
        };
        fs::write(&files.credentials, keys).unwrap();
        fs::write(&files.parameters, params).unwrap();

        let provider = Arc::new(provider);
        let factory = Arc::new(StaticClientFactory::new(provider.clone()));
        let streaming = StreamingConfig {
            pacing_ms: 1,
            ..Default::default()
        };

        let state = AppState::new(
            files,
            ModelConfig::default(),
            &streaming,
            &SchemaRegistry::with_builtins(),
            factory.clone(),
        )
        .unwrap();

        Harness {
            _dir: dir,
            provider,
            factory,
            router: create_router(state),
        }
    }

    fn default_harness() -> Harness {
        let arguments = serde_json::json!({ "code": CODE }).to_string();
        harness(
            "openai:\n  key: sk-test-key-123456\n",
            "llm:\n  instructor_max_retries: 2\n  temperature: 1\n",
            MockLlmProvider::new("mock").with_response(code_response(&arguments)),
        )
    }

    fn post(uri: &str, body: &str) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    async fn body_string(response: axum::response::Response) -> String {
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        String::from_utf8(bytes.to_vec()).unwrap()
    }

    #[tokio::test]
    async fn test_prompt_returns_code() {
        let h = default_harness();

        let response = h
            .router
            .oneshot(post("/", r#"{"message": "Write a function to add two numbers"}"#))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert!(response.headers().contains_key("x-request-id"));

        let body: serde_json::Value = serde_json::from_str(&body_string(response).await).unwrap();
        assert_eq!(body["response"], CODE);

        assert_eq!(h.provider.calls(), 1);
        assert_eq!(h.factory.keys(), vec!["sk-test-key-123456"]);

        let request = h.provider.last_request().unwrap();
        assert_eq!(request.temperature, Some(1.0));
        assert_eq!(
            request.messages.last().unwrap().content(),
            "Write a function to add two numbers"
        );
    }

    #[tokio::test]
    async fn test_missing_openai_block_fails_before_provider_call() {
        let h = harness(
            "anthropic:\n  key: x\n",
            "llm:\n  temperature: 1\n",
            MockLlmProvider::new("mock"),
        );

        let response = h
            .router
            .oneshot(post("/", r#"{"message": "hi"}"#))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
        let body: serde_json::Value = serde_json::from_str(&body_string(response).await).unwrap();
        assert_eq!(body["error"]["type"], "authentication_error");
        assert_eq!(h.provider.calls(), 0);
        assert!(h.factory.keys().is_empty());
    }

    #[tokio::test]
    async fn test_schema_mismatch_after_retries() {
        let h = harness(
            "openai:\n  key: sk-test-key-123456\n",
            "llm:\n  instructor_max_retries: 2\n",
            MockLlmProvider::new("mock").with_response(code_response(r#"{"snippet": "x"}"#)),
        );

        let response = h
            .router
            .oneshot(post("/", r#"{"message": "hi"}"#))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
        let body: serde_json::Value = serde_json::from_str(&body_string(response).await).unwrap();
        assert_eq!(body["error"]["type"], "schema_validation_error");
        assert_eq!(h.provider.calls(), 2);
    }

    #[tokio::test]
    async fn test_malformed_body_is_bad_request() {
        let h = default_harness();

        let response = h.router.oneshot(post("/", "{not json")).await.unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let body: serde_json::Value = serde_json::from_str(&body_string(response).await).unwrap();
        assert_eq!(body["error"]["type"], "invalid_request_error");
        assert_eq!(h.provider.calls(), 0);
    }

    #[tokio::test]
    async fn test_stream_emits_single_line_frames() {
        let h = default_harness();

        let response = h
            .router
            .oneshot(post("/stream", r#"{"message": "Write a function to add two numbers"}"#))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            response.headers()[header::CONTENT_TYPE],
            "text/event-stream"
        );

        let body = body_string(response).await;
        assert!(body.ends_with("\n\n"));

        let frames: Vec<&str> = body.split_terminator("\n\n").collect();
        assert!(frames.len() > 1);
        for frame in &frames {
            assert!(frame.starts_with("data: "), "bad frame: {frame:?}");
            assert!(!frame.contains('\n'));
        }

        let last = frames.last().unwrap().strip_prefix("data: ").unwrap();
        assert_eq!(last, escape_payload(CODE));
        assert!(h.provider.last_request().unwrap().stream);
    }

    #[tokio::test]
    async fn test_stream_setup_error_is_json() {
        let h = harness("", "", MockLlmProvider::new("mock"));

        let response = h
            .router
            .oneshot(post("/stream", r#"{"message": "hi"}"#))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
        let body: serde_json::Value = serde_json::from_str(&body_string(response).await).unwrap();
        assert!(body["error"]["message"].as_str().unwrap().contains("openai"));
    }

    #[tokio::test]
    async fn test_health_endpoints() {
        let h = default_harness();

        let response = h
            .router
            .clone()
            .oneshot(Request::get("/health").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let response = h
            .router
            .oneshot(Request::get("/ready").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[test]
    fn test_unknown_streaming_field_is_rejected() {
        let provider: Arc<MockLlmProvider> = Arc::new(MockLlmProvider::new("mock"));
        let streaming = StreamingConfig {
            field: Some("language".to_string()),
            ..Default::default()
        };

        let result = AppState::new(
            ConfigFiles {
                credentials: "keys.yaml".into(),
                parameters: "config.yaml".into(),
            },
            ModelConfig::default(),
            &streaming,
            &SchemaRegistry::with_builtins(),
            Arc::new(StaticClientFactory::new(provider)),
        );

        assert!(result.is_err());
    }
}
