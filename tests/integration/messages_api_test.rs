//! Chat API integration tests
//!
//! Drive the full router (extractors, handlers, service, store) through
//! `oneshot` requests against the in-memory store.

mod common;

use axum::http::StatusCode;
use chatline_llm::LlmConfig;
use serde_json::{json, Value};

use crate::common::{parse_body, ChatTestApp};

fn contents(body: &Value) -> Vec<&str> {
    body.as_array()
        .unwrap()
        .iter()
        .map(|m| m["content"].as_str().unwrap())
        .collect()
}

mod test_send_message {
    use super::*;

    #[test_log::test(tokio::test)]
    async fn test_offline_turn_returns_both_messages() {
        let app = ChatTestApp::offline();

        let resp = app.send(json!({"content": "Hello, how are you?"})).await;
        assert_eq!(resp.status(), StatusCode::CREATED);

        let body = parse_body(resp).await;
        assert_eq!(body["userMessage"]["role"], "user");
        assert_eq!(body["userMessage"]["content"], "Hello, how are you?");
        assert_eq!(body["botResponse"]["role"], "assistant");
        assert_eq!(
            body["botResponse"]["content"],
            "I received your message: 'Hello, how are you?'. This is a test response."
        );
        assert!(body["botResponse"]["id"].as_i64() > body["userMessage"]["id"].as_i64());
        assert!(body["userMessage"]["created_at"].is_string());

        assert_eq!(app.store.len().await, 2);
    }

    #[tokio::test]
    async fn test_missing_credential_returns_503_without_writes() {
        let app = ChatTestApp::with_llm(LlmConfig::default());

        let resp = app.send(json!({"content": "hi"})).await;
        assert_eq!(resp.status(), StatusCode::SERVICE_UNAVAILABLE);

        let body = parse_body(resp).await;
        assert_eq!(body["error"]["code"], "CONFIGURATION_ERROR");

        let history = parse_body(app.history(None).await).await;
        assert!(history.as_array().unwrap().is_empty());
        assert!(app.store.is_empty().await);
    }

    #[tokio::test]
    async fn test_invalid_content_rejected_without_writes() {
        let app = ChatTestApp::offline();

        let oversized = "x".repeat(1001);
        for content in ["", "   ", oversized.as_str()] {
            let resp = app.send(json!({ "content": content })).await;
            assert_eq!(resp.status(), StatusCode::BAD_REQUEST, "content {:?}", content);

            let body = parse_body(resp).await;
            assert_eq!(body["error"]["code"], "VALIDATION_ERROR");
        }

        assert!(app.store.is_empty().await);
    }

    #[tokio::test]
    async fn test_content_at_length_limit_is_accepted() {
        let app = ChatTestApp::offline();

        let resp = app.send(json!({ "content": "y".repeat(1000) })).await;
        assert_eq!(resp.status(), StatusCode::CREATED);
    }

    #[tokio::test]
    async fn test_surrounding_whitespace_is_trimmed() {
        let app = ChatTestApp::offline();

        let body = parse_body(app.send(json!({"content": "  spaced out  "})).await).await;
        assert_eq!(body["userMessage"]["content"], "spaced out");
    }

    #[tokio::test]
    async fn test_missing_content_field_is_bad_request() {
        let app = ChatTestApp::offline();

        let resp = app.send(json!({"text": "wrong field"})).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
        assert!(app.store.is_empty().await);
    }
}

mod test_list_messages {
    use super::*;
    use chatline_conversations::{MessageStore, NewMessage};

    async fn seeded(turns: &[&str]) -> ChatTestApp {
        let app = ChatTestApp::offline();
        for content in turns {
            let resp = app.send(json!({ "content": content })).await;
            assert_eq!(resp.status(), StatusCode::CREATED);
        }
        app
    }

    #[tokio::test]
    async fn test_limit_returns_newest_first() {
        let app = seeded(&["A", "B"]).await;

        let resp = app.history(Some("limit=3")).await;
        assert_eq!(resp.status(), StatusCode::OK);

        let body = parse_body(resp).await;
        assert_eq!(
            contents(&body),
            vec![
                "I received your message: 'B'. This is a test response.",
                "B",
                "I received your message: 'A'. This is a test response.",
            ]
        );
        assert_eq!(body[0]["role"], "assistant");
        assert_eq!(body[1]["role"], "user");
    }

    #[tokio::test]
    async fn test_default_limit_returns_everything_when_small() {
        let app = seeded(&["one", "two"]).await;

        let body = parse_body(app.history(None).await).await;
        assert_eq!(body.as_array().unwrap().len(), 4);
    }

    #[tokio::test]
    async fn test_zero_limit_returns_empty_list() {
        let app = seeded(&["one"]).await;

        let resp = app.history(Some("limit=0")).await;
        assert_eq!(resp.status(), StatusCode::OK);
        assert_eq!(parse_body(resp).await, json!([]));
    }

    #[tokio::test]
    async fn test_negative_limit_is_rejected() {
        let app = seeded(&["one"]).await;

        let resp = app.history(Some("limit=-1")).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

        let body = parse_body(resp).await;
        assert_eq!(body["error"]["code"], "VALIDATION_ERROR");
    }

    #[tokio::test]
    async fn test_non_numeric_limit_is_rejected() {
        let app = seeded(&["one"]).await;

        let resp = app.history(Some("limit=abc")).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

        let body = parse_body(resp).await;
        assert_eq!(body["error"]["code"], "VALIDATION_ERROR");
    }

    #[tokio::test]
    async fn test_limit_above_maximum_is_clamped() {
        let app = ChatTestApp::offline();
        for i in 0..250 {
            app.store
                .append(&NewMessage::user(&format!("m{}", i)).unwrap())
                .await
                .unwrap();
        }

        let resp = app.history(Some("limit=500")).await;
        assert_eq!(resp.status(), StatusCode::OK);

        let body = parse_body(resp).await;
        let page = contents(&body);
        assert_eq!(page.len(), 200);
        assert_eq!(page[0], "m249");
        assert_eq!(page[199], "m50");
    }

    #[tokio::test]
    async fn test_reads_are_idempotent() {
        let app = seeded(&["first", "second"]).await;

        let a = parse_body(app.history(Some("limit=10")).await).await;
        let b = parse_body(app.history(Some("limit=10")).await).await;
        assert_eq!(a, b);
        assert_eq!(app.store.len().await, 4);
    }

    #[tokio::test]
    async fn test_sent_messages_round_trip() {
        let app = ChatTestApp::offline();

        let sent = parse_body(app.send(json!({"content": "remember me"})).await).await;
        let history = parse_body(app.history(Some("limit=2")).await).await;

        assert_eq!(history[0], sent["botResponse"]);
        assert_eq!(history[1], sent["userMessage"]);
    }
}

mod test_service_routes {
    use super::*;
    use axum::body::Body;
    use axum::http::Request;
    use tower::ServiceExt;

    #[tokio::test]
    async fn test_health_and_root() {
        let app = ChatTestApp::offline();

        for uri in ["/health", "/"] {
            let resp = app
                .test_router()
                .oneshot(Request::get(uri).body(Body::empty()).unwrap())
                .await
                .unwrap();
            assert_eq!(resp.status(), StatusCode::OK, "{}", uri);
        }
    }
}
