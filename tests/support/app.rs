// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1

//! Router wired to the fake platform, plus request helpers

use axum::{
    body::Body,
    http::{header, Method, Request, Response, StatusCode},
    Router,
};
use cortex_doc_chat::{
    api::{create_app, AppState, PageRenderer},
    catalog::SnowflakeCatalog,
    chat::{ChatOrchestrator, SessionConfig, SessionStore, SessionStoreConfig},
    completion::CortexCompleter,
    config::AnswerMode,
    search::SearchAdapter,
    snowflake::SnowflakeClient,
};
use serde_json::Value;
use std::sync::Arc;
use tower::util::ServiceExt; // for `oneshot`

use super::fake_snowflake::FakeSnowflake;

pub struct TestApp {
    pub fake: FakeSnowflake,
    pub state: AppState,
    pub router: Router,
}

impl TestApp {
    pub async fn start(mode: AnswerMode) -> Self {
        let fake = FakeSnowflake::start().await;
        let mut config = fake.app_config();
        config.chat.answer_mode = mode;

        let client = Arc::new(SnowflakeClient::connect(&config).await.unwrap());
        let orchestrator = Arc::new(ChatOrchestrator::new(
            SearchAdapter::new(Arc::new(client.search_service(&config.search))),
            Arc::new(SnowflakeCatalog::new(client.clone(), config.catalog.clone())),
            Arc::new(CortexCompleter::new(client.clone())),
            config.chat.clone(),
            config.catalog.presign_ttl_secs,
        ));
        let sessions = Arc::new(SessionStore::new(SessionStoreConfig {
            max_sessions: 10,
            idle_timeout: config.session_idle_timeout,
            defaults: SessionConfig::new(config.default_model()),
        }));

        let state = AppState::new(orchestrator, sessions, PageRenderer::new().unwrap());
        let router = create_app(state.clone());
        Self { fake, state, router }
    }

    pub async fn send(&self, request: Request<Body>) -> Response<Body> {
        self.router.clone().oneshot(request).await.unwrap()
    }
}

pub fn json_request(method: Method, uri: &str, cookie: Option<&str>, body: &str) -> Request<Body> {
    let mut builder = Request::builder()
        .method(method)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json");
    if let Some(cookie) = cookie {
        builder = builder.header(header::COOKIE, cookie);
    }
    builder.body(Body::from(body.to_string())).unwrap()
}

pub fn form_request(uri: &str, cookie: Option<&str>, body: &str) -> Request<Body> {
    let mut builder = Request::builder()
        .method(Method::POST)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded");
    if let Some(cookie) = cookie {
        builder = builder.header(header::COOKIE, cookie);
    }
    builder.body(Body::from(body.to_string())).unwrap()
}

pub fn get_request(uri: &str, cookie: Option<&str>) -> Request<Body> {
    let mut builder = Request::builder().method(Method::GET).uri(uri);
    if let Some(cookie) = cookie {
        builder = builder.header(header::COOKIE, cookie);
    }
    builder.body(Body::empty()).unwrap()
}

/// `name=value` part of the session cookie set by a response
pub fn session_cookie(response: &Response<Body>) -> Option<String> {
    response
        .headers()
        .get(header::SET_COOKIE)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.split(';').next())
        .map(str::to_string)
}

pub async fn body_text(response: Response<Body>) -> String {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    String::from_utf8(bytes.to_vec()).unwrap()
}

pub async fn body_json(response: Response<Body>) -> Value {
    serde_json::from_str(&body_text(response).await).unwrap()
}

pub fn assert_status(response: &Response<Body>, status: StatusCode) {
    assert_eq!(response.status(), status, "unexpected status");
}
