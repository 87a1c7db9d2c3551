//! Mock-based tests for the upstream Messages API interaction.
//!
//! These tests use wiremock to simulate Anthropic responses
//! without making actual HTTP requests.

use axum::{
    body::Body,
    http::{Request, StatusCode},
    Router,
};
use claude_relay::{
    api::{app_router, AppState},
    core::{AnthropicConfig, AppConfig, ServerConfig},
};
use pretty_assertions::assert_eq;
use serde_json::{json, Value};
use std::sync::Arc;
use tower::ServiceExt;
use wiremock::{
    matchers::{body_json, header, method, path},
    Mock, MockServer, ResponseTemplate,
};

const TEST_API_KEY: &str = "sk-ant-test-key";

/// Create a test app whose upstream is `api_base`
fn create_test_app_with_base(api_base: &str) -> Router {
    let config = AppConfig {
        server: ServerConfig::default(),
        anthropic: AnthropicConfig::new(TEST_API_KEY).with_api_base(api_base),
    };

    let state = Arc::new(AppState::new(config, reqwest::Client::new()));
    app_router(state)
}

/// Create a test app with mocked upstream
fn create_test_app_with_mock(mock_server: &MockServer) -> Router {
    create_test_app_with_base(&mock_server.uri())
}

fn query_request(body: impl Into<Body>) -> Request<Body> {
    Request::builder()
        .uri("/api/claude")
        .method("POST")
        .header("content-type", "application/json")
        .body(body.into())
        .unwrap()
}

async fn send(app: Router, request: Request<Body>) -> (StatusCode, Value) {
    let response = app.oneshot(request).await.unwrap();
    let status = response.status();
    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    (status, serde_json::from_slice(&body).unwrap())
}

fn claude_text_response(text: &str) -> Value {
    json!({
        "id": "msg_01XFDUDYJgAACzvnptvVoYEL",
        "type": "message",
        "role": "assistant",
        "model": "claude-3-sonnet-20240229",
        "content": [{"type": "text", "text": text}],
        "stop_reason": "end_turn",
        "stop_sequence": null,
        "usage": {"input_tokens": 12, "output_tokens": 1}
    })
}

/// Mount a mock that must never be hit
async fn mount_unreachable_upstream(mock_server: &MockServer) {
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_json(claude_text_response("unused")))
        .expect(0)
        .mount(mock_server)
        .await;
}

#[tokio::test]
async fn test_successful_query() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/v1/messages"))
        .and(header("x-api-key", TEST_API_KEY))
        .and(header("anthropic-version", "2023-06-01"))
        .and(body_json(json!({
            "model": "claude-3-sonnet-20240229",
            "max_tokens": 1000,
            "temperature": 0.0,
            "messages": [{"role": "user", "content": "2+2?"}]
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(claude_text_response("4")))
        .expect(1)
        .mount(&mock_server)
        .await;

    let app = create_test_app_with_mock(&mock_server);
    let (status, body) = send(app, query_request(json!({"query": "2+2?"}).to_string())).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({"response": "4"}));
}

#[tokio::test]
async fn test_only_first_content_block_is_returned() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/v1/messages"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "content": [
                {"type": "text", "text": "first"},
                {"type": "text", "text": "second"}
            ]
        })))
        .mount(&mock_server)
        .await;

    let app = create_test_app_with_mock(&mock_server);
    let (status, body) = send(app, query_request(json!({"query": "hi"}).to_string())).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({"response": "first"}));
}

#[tokio::test]
async fn test_missing_query_makes_no_upstream_call() {
    let mock_server = MockServer::start().await;
    mount_unreachable_upstream(&mock_server).await;

    let app = create_test_app_with_mock(&mock_server);
    let (status, body) = send(app, query_request("{}")).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body, json!({"error": "No query provided"}));
}

#[tokio::test]
async fn test_empty_query_makes_no_upstream_call() {
    let mock_server = MockServer::start().await;
    mount_unreachable_upstream(&mock_server).await;

    let app = create_test_app_with_mock(&mock_server);
    let (status, body) = send(app, query_request(r#"{"query": ""}"#)).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body, json!({"error": "No query provided"}));
}

#[tokio::test]
async fn test_null_query_makes_no_upstream_call() {
    let mock_server = MockServer::start().await;
    mount_unreachable_upstream(&mock_server).await;

    let app = create_test_app_with_mock(&mock_server);
    let (status, body) = send(app, query_request(r#"{"query": null}"#)).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body, json!({"error": "No query provided"}));
}

#[tokio::test]
async fn test_upstream_auth_error() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/v1/messages"))
        .respond_with(ResponseTemplate::new(401).set_body_json(json!({
            "type": "error",
            "error": {
                "type": "authentication_error",
                "message": "invalid x-api-key"
            }
        })))
        .expect(1)
        .mount(&mock_server)
        .await;

    let app = create_test_app_with_mock(&mock_server);
    let (status, body) = send(app, query_request(json!({"query": "hello"}).to_string())).await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(
        body,
        json!({"error": "API Error: Error code: 401 - invalid x-api-key"})
    );
}

#[tokio::test]
async fn test_upstream_server_error_is_not_retried() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/v1/messages"))
        .respond_with(ResponseTemplate::new(529).set_body_json(json!({
            "type": "error",
            "error": {"type": "overloaded_error", "message": "Overloaded"}
        })))
        .expect(1)
        .mount(&mock_server)
        .await;

    let app = create_test_app_with_mock(&mock_server);
    let (status, body) = send(app, query_request(json!({"query": "hello"}).to_string())).await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["error"], "API Error: Error code: 529 - Overloaded");
}

#[tokio::test]
async fn test_upstream_plain_text_error() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/v1/messages"))
        .respond_with(ResponseTemplate::new(502).set_body_string("Bad Gateway"))
        .mount(&mock_server)
        .await;

    let app = create_test_app_with_mock(&mock_server);
    let (status, body) = send(app, query_request(json!({"query": "hello"}).to_string())).await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["error"], "API Error: Error code: 502 - Bad Gateway");
}

#[tokio::test]
async fn test_upstream_error_without_body() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/v1/messages"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&mock_server)
        .await;

    let app = create_test_app_with_mock(&mock_server);
    let (status, body) = send(app, query_request(json!({"query": "hello"}).to_string())).await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(
        body["error"],
        "API Error: Error code: 503 - HTTP 503 Service Unavailable"
    );
}

#[tokio::test]
async fn test_upstream_unreachable() {
    // Nothing listens on port 1
    let app = create_test_app_with_base("http://127.0.0.1:1");
    let (status, body) = send(app, query_request(json!({"query": "hello"}).to_string())).await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    let message = body["error"].as_str().unwrap();
    assert!(message.starts_with("API Error: "), "got: {}", message);
}

#[tokio::test]
async fn test_upstream_first_block_not_text() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/v1/messages"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "content": [
                {"type": "tool_use", "id": "toolu_01", "name": "calculator", "input": {}}
            ]
        })))
        .mount(&mock_server)
        .await;

    let app = create_test_app_with_mock(&mock_server);
    let (status, body) = send(app, query_request(json!({"query": "hello"}).to_string())).await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(
        body,
        json!({"error": "API Error: Response contained no text content"})
    );
}

#[tokio::test]
async fn test_upstream_empty_content() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/v1/messages"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"content": []})))
        .mount(&mock_server)
        .await;

    let app = create_test_app_with_mock(&mock_server);
    let (status, body) = send(app, query_request(json!({"query": "hello"}).to_string())).await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(
        body,
        json!({"error": "API Error: Response contained no text content"})
    );
}

#[tokio::test]
async fn test_upstream_invalid_json() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/v1/messages"))
        .respond_with(ResponseTemplate::new(200).set_body_string("not json"))
        .mount(&mock_server)
        .await;

    let app = create_test_app_with_mock(&mock_server);
    let (status, body) = send(app, query_request(json!({"query": "hello"}).to_string())).await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    let message = body["error"].as_str().unwrap();
    assert!(
        message.starts_with("API Error: Invalid response body: "),
        "got: {}",
        message
    );
}

#[tokio::test]
async fn test_malformed_json_body() {
    let mock_server = MockServer::start().await;
    mount_unreachable_upstream(&mock_server).await;

    let app = create_test_app_with_mock(&mock_server);
    let (status, body) = send(app, query_request("{not json")).await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    let message = body["error"].as_str().unwrap();
    assert!(message.starts_with("An error occurred: "), "got: {}", message);
}

#[tokio::test]
async fn test_non_string_query() {
    let mock_server = MockServer::start().await;
    mount_unreachable_upstream(&mock_server).await;

    let app = create_test_app_with_mock(&mock_server);
    let (status, body) = send(app, query_request(r#"{"query": 42}"#)).await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    let message = body["error"].as_str().unwrap();
    assert!(message.starts_with("An error occurred: "), "got: {}", message);
}

#[tokio::test]
async fn test_missing_content_type() {
    let mock_server = MockServer::start().await;
    mount_unreachable_upstream(&mock_server).await;

    let app = create_test_app_with_mock(&mock_server);
    let request = Request::builder()
        .uri("/api/claude")
        .method("POST")
        .body(Body::from(json!({"query": "hello"}).to_string()))
        .unwrap();
    let (status, body) = send(app, request).await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    let message = body["error"].as_str().unwrap();
    assert!(message.starts_with("An error occurred: "), "got: {}", message);
}

#[tokio::test]
async fn test_falsy_non_string_query_fails_schema() {
    for body in [r#"{"query": 0}"#, r#"{"query": false}"#, r#"{"query": []}"#] {
        let mock_server = MockServer::start().await;
        mount_unreachable_upstream(&mock_server).await;

        let app = create_test_app_with_mock(&mock_server);
        let (status, response) = send(app, query_request(body)).await;

        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR, "body: {}", body);
        let message = response["error"].as_str().unwrap();
        assert!(message.starts_with("An error occurred: "), "got: {}", message);
    }
}
