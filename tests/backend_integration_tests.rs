use std::time::Duration;

use newsify::api::{BackendError, HttpBackend, NewsBackend};
use serde_json::json;
use wiremock::matchers::{body_json, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn backend_for(server: &MockServer) -> HttpBackend {
    HttpBackend::new(server.uri(), Duration::from_secs(5))
}

// ============================================================================
// Headlines
// ============================================================================

#[tokio::test]
async fn test_headlines_success() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/headlines"))
        .and(query_param("category", "technology"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "headlines": [
                {"title": "Chipmaker beats estimates", "description": "Q3 earnings out."},
                {"title": "New browser release"}
            ]
        })))
        .mount(&mock_server)
        .await;

    let backend = backend_for(&mock_server);
    let headlines = backend.headlines("technology").await.unwrap();

    assert_eq!(headlines.len(), 2);
    assert_eq!(headlines[0].title, "Chipmaker beats estimates");
    assert_eq!(headlines[0].description, "Q3 earnings out.");
    assert_eq!(headlines[1].description, "", "missing description defaults empty");
}

#[tokio::test]
async fn test_headlines_server_error() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/headlines"))
        .respond_with(ResponseTemplate::new(500).set_body_string("boom"))
        .mount(&mock_server)
        .await;

    let backend = backend_for(&mock_server);
    let result = backend.headlines("general").await;

    match result {
        Err(BackendError::Api { status: 500, message }) => assert_eq!(message, "boom"),
        other => panic!("expected Api error, got {other:?}"),
    }
}

#[tokio::test]
async fn test_headlines_malformed_body_is_parse_error() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/headlines"))
        .respond_with(ResponseTemplate::new(200).set_body_string("not json"))
        .mount(&mock_server)
        .await;

    let backend = backend_for(&mock_server);
    let result = backend.headlines("general").await;

    assert!(matches!(result, Err(BackendError::Parse(_))));
}

// ============================================================================
// Sessions
// ============================================================================

#[tokio::test]
async fn test_sessions_success() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/sessions"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "sessions": [
                {"id": "demo-session", "preview": "Hello there"},
                {"id": "session-2", "preview": "Older chat"}
            ]
        })))
        .mount(&mock_server)
        .await;

    let backend = backend_for(&mock_server);
    let sessions = backend.sessions().await.unwrap();

    assert_eq!(sessions.len(), 2);
    assert_eq!(sessions[0].id, "demo-session");
    assert_eq!(sessions[1].preview, "Older chat");
}

#[tokio::test]
async fn test_sessions_missing_list_defaults_empty() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/sessions"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({})))
        .mount(&mock_server)
        .await;

    let backend = backend_for(&mock_server);
    let sessions = backend.sessions().await.unwrap();
    assert!(sessions.is_empty());
}

#[tokio::test]
async fn test_delete_all_sessions() {
    let mock_server = MockServer::start().await;

    Mock::given(method("DELETE"))
        .and(path("/sessions"))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&mock_server)
        .await;

    let backend = backend_for(&mock_server);
    assert!(backend.delete_sessions().await.is_ok());
}

#[tokio::test]
async fn test_delete_all_sessions_failure() {
    let mock_server = MockServer::start().await;

    Mock::given(method("DELETE"))
        .and(path("/sessions"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&mock_server)
        .await;

    let backend = backend_for(&mock_server);
    assert!(matches!(
        backend.delete_sessions().await,
        Err(BackendError::Api { status: 503, .. })
    ));
}

// ============================================================================
// History
// ============================================================================

#[tokio::test]
async fn test_history_success() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/history/demo-session"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "history": [
                {"user": "What happened today?", "bot": "Quite a lot."},
                {"user": "Tell me more", "bot": "Sure."}
            ]
        })))
        .mount(&mock_server)
        .await;

    let backend = backend_for(&mock_server);
    let history = backend.history("demo-session").await.unwrap();

    assert_eq!(history.len(), 2);
    assert_eq!(history[0].user, "What happened today?");
    assert_eq!(history[1].bot, "Sure.");
}

#[tokio::test]
async fn test_reset_history_hits_session_path() {
    let mock_server = MockServer::start().await;

    Mock::given(method("DELETE"))
        .and(path("/history/session-abc"))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&mock_server)
        .await;

    let backend = backend_for(&mock_server);
    assert!(backend.reset_history("session-abc").await.is_ok());
}

// ============================================================================
// Chat
// ============================================================================

#[tokio::test]
async fn test_send_message_posts_expected_body() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/chat"))
        .and(body_json(json!({
            "message": "What's the latest?",
            "sessionId": "demo-session"
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "reply": "Here's what's happening."
        })))
        .expect(1)
        .mount(&mock_server)
        .await;

    let backend = backend_for(&mock_server);
    let reply = backend
        .send_message("demo-session", "What's the latest?")
        .await
        .unwrap();
    assert_eq!(reply, "Here's what's happening.");
}

#[tokio::test]
async fn test_send_message_error_field_is_extracted() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/chat"))
        .respond_with(ResponseTemplate::new(429).set_body_json(json!({
            "error": "rate limited",
            "details": "try again later"
        })))
        .mount(&mock_server)
        .await;

    let backend = backend_for(&mock_server);
    match backend.send_message("demo-session", "hi").await {
        Err(BackendError::Api { status: 429, message }) => {
            assert_eq!(message, "rate limited", "error wins over details");
        }
        other => panic!("expected Api error, got {other:?}"),
    }
}

#[tokio::test]
async fn test_send_message_details_fallback() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/chat"))
        .respond_with(ResponseTemplate::new(502).set_body_json(json!({
            "details": "upstream unavailable"
        })))
        .mount(&mock_server)
        .await;

    let backend = backend_for(&mock_server);
    match backend.send_message("demo-session", "hi").await {
        Err(BackendError::Api { status: 502, message }) => {
            assert_eq!(message, "upstream unavailable");
        }
        other => panic!("expected Api error, got {other:?}"),
    }
}

#[tokio::test]
async fn test_send_message_non_json_error_body_is_passed_through() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/chat"))
        .respond_with(ResponseTemplate::new(500).set_body_string("Internal Server Error"))
        .mount(&mock_server)
        .await;

    let backend = backend_for(&mock_server);
    match backend.send_message("demo-session", "hi").await {
        Err(BackendError::Api { status: 500, message }) => {
            assert_eq!(message, "Internal Server Error");
        }
        other => panic!("expected Api error, got {other:?}"),
    }
}

#[tokio::test]
async fn test_send_message_missing_reply_is_parse_error() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/chat"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"unexpected": true})))
        .mount(&mock_server)
        .await;

    let backend = backend_for(&mock_server);
    assert!(matches!(
        backend.send_message("demo-session", "hi").await,
        Err(BackendError::Parse(_))
    ));
}
