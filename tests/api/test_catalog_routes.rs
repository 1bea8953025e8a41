// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1

//! Health, categories, documents and raw search endpoints

use axum::http::{Method, StatusCode};
use cortex_doc_chat::config::AnswerMode;

use crate::support::app::{assert_status, body_json, get_request, json_request, TestApp};

#[tokio::test]
async fn test_health() {
    let app = TestApp::start(AnswerMode::Results).await;

    let response = app.send(get_request("/health", None)).await;
    assert_status(&response, StatusCode::OK);

    let body = body_json(response).await;
    assert_eq!(body["status"], "healthy");
    assert_eq!(body["version"], env!("CARGO_PKG_VERSION"));
    assert_eq!(body["activeSessions"], 0);
}

#[tokio::test]
async fn test_categories_start_with_all() {
    let app = TestApp::start(AnswerMode::Results).await;

    let body = body_json(app.send(get_request("/v1/categories", None)).await).await;
    assert_eq!(body["categories"], serde_json::json!(["ALL", "Bikes", "Snow"]));
}

#[tokio::test]
async fn test_documents() {
    let app = TestApp::start(AnswerMode::Results).await;

    let body = body_json(app.send(get_request("/v1/documents", None)).await).await;
    assert_eq!(body["documents"], serde_json::json!(["bikes.pdf", "skis.pdf"]));
}

#[tokio::test]
async fn test_raw_search_payload() {
    let app = TestApp::start(AnswerMode::Results).await;

    let response = app
        .send(json_request(
            Method::POST,
            "/v1/search",
            None,
            r#"{"query": "skis", "category": "Snow"}"#,
        ))
        .await;
    assert_status(&response, StatusCode::OK);

    let body = body_json(response).await;
    assert_eq!(body["results"].as_array().unwrap().len(), 3);
    assert_eq!(body["request_id"], "req-0001");
    assert_eq!(
        app.fake.searches()[0].1["filter"],
        serde_json::json!({"@eq": {"category": "Snow"}})
    );
}

#[tokio::test]
async fn test_search_rate_limit_status() {
    let app = TestApp::start(AnswerMode::Results).await;

    let response = app
        .send(json_request(
            Method::POST,
            "/v1/search",
            None,
            r#"{"query": "trigger rate limit"}"#,
        ))
        .await;

    assert_status(&response, StatusCode::TOO_MANY_REQUESTS);
    assert_eq!(response.headers()["retry-after"], "7");
}

#[tokio::test]
async fn test_search_empty_query() {
    let app = TestApp::start(AnswerMode::Results).await;

    let response = app
        .send(json_request(Method::POST, "/v1/search", None, r#"{"query": ""}"#))
        .await;

    assert_status(&response, StatusCode::BAD_REQUEST);
    assert_eq!(body_json(response).await["details"]["field"], "query");
}
