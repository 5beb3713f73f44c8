//! Shared fixtures for the integration tests
//!
//! The router tests run against the in-memory store so they need no external
//! services. The Postgres tests read `TEST_DATABASE_URL` and are ignored by
//! default.

#![allow(dead_code)]

use std::env;
use std::sync::{Arc, Once};

use axum::{
    body::Body,
    http::{Method, Request, Response},
    Router,
};
use chatline_app::{body_limit_layer, build_state, create_app};
use chatline_common::Config;
use chatline_conversations::InMemoryMessageStore;
use chatline_llm::LlmConfig;
use serde_json::Value;

static INIT: Once = Once::new();

/// Postgres URL for the database-backed tests
pub fn test_database_url() -> Option<String> {
    INIT.call_once(|| {
        dotenvy::from_filename(".env.test").ok();
        dotenvy::dotenv().ok();
    });

    env::var("TEST_DATABASE_URL").ok()
}

/// Router plus a handle on the store behind it
pub struct ChatTestApp {
    pub store: InMemoryMessageStore,
    router: Router,
}

impl ChatTestApp {
    /// App whose completions come from the offline placeholder provider
    pub fn offline() -> Self {
        Self::with_llm(LlmConfig::offline())
    }

    /// App with the given provider configuration
    pub fn with_llm(llm_config: LlmConfig) -> Self {
        let config = Config::from_vars(|_| None).expect("default config is valid");
        let store = InMemoryMessageStore::new();
        let state = build_state(&config, llm_config, Arc::new(store.clone()));
        let router = create_app(state).layer(body_limit_layer());

        Self { store, router }
    }

    pub fn test_router(&self) -> Router {
        self.router.clone()
    }

    /// POST a JSON body to `/v1/messages`
    pub async fn send(&self, body: Value) -> Response<Body> {
        let req = json_request(Method::POST, "/v1/messages", Some(body));
        tower::ServiceExt::oneshot(self.test_router(), req)
            .await
            .unwrap()
    }

    /// GET `/v1/messages` with an optional raw query string
    pub async fn history(&self, query: Option<&str>) -> Response<Body> {
        let uri = match query {
            Some(q) => format!("/v1/messages?{}", q),
            None => "/v1/messages".to_string(),
        };
        let req = json_request(Method::GET, &uri, None);
        tower::ServiceExt::oneshot(self.test_router(), req)
            .await
            .unwrap()
    }
}

/// Build a request, adding a JSON body when given
pub fn json_request(method: Method, uri: &str, body: Option<Value>) -> Request<Body> {
    let builder = Request::builder().method(method).uri(uri);

    match body {
        Some(b) => builder
            .header("content-type", "application/json")
            .body(Body::from(serde_json::to_string(&b).unwrap()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    }
}

/// Parse a response body as JSON
pub async fn parse_body(response: Response<Body>) -> Value {
    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&body).unwrap()
}
