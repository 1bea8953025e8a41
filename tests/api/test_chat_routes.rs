// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1

//! /v1/chat and /v1/reset tests
//!
//! These tests verify that:
//! - Each question adds exactly two turns to the caller's session
//! - Search failures come back as error turns, not error statuses
//! - A second request for a busy session is rejected with 409
//! - Reset clears the transcript and keeps the options
//! - Generated-answer mode returns the completion text

use axum::http::{Method, StatusCode};
use cortex_doc_chat::chat::SessionId;
use cortex_doc_chat::config::AnswerMode;

use crate::support::app::{assert_status, body_json, json_request, session_cookie, TestApp};

#[tokio::test]
async fn test_first_question_creates_session() {
    let app = TestApp::start(AnswerMode::Results).await;

    let response = app
        .send(json_request(
            Method::POST,
            "/v1/chat",
            None,
            r#"{"question": "What products do you have?"}"#,
        ))
        .await;

    assert_status(&response, StatusCode::OK);
    let cookie = session_cookie(&response).expect("session cookie set");
    assert!(cookie.starts_with("cortex_chat_session="));

    let body = body_json(response).await;
    assert_eq!(body["isError"], false);
    assert!(body["answer"].as_str().unwrap().starts_with("```json"));
    assert_eq!(body["history"].as_array().unwrap().len(), 2);
    assert_eq!(body["history"][0]["role"], "user");
    assert_eq!(body["history"][1]["role"], "assistant");
    assert_eq!(body["relatedDocuments"].as_array().unwrap().len(), 2);
    assert_eq!(
        body["relatedDocuments"][0]["url"],
        "https://files.example/bikes.pdf?expires=360"
    );

    let searches = app.fake.searches();
    assert_eq!(searches[0].1["limit"], 5);
    assert!(searches[0].1.get("filter").is_none());
}

#[tokio::test]
async fn test_history_grows_by_two_per_question() {
    let app = TestApp::start(AnswerMode::Results).await;

    let first = app
        .send(json_request(Method::POST, "/v1/chat", None, r#"{"question": "bikes"}"#))
        .await;
    let cookie = session_cookie(&first).unwrap();

    for n in 2..=3 {
        let response = app
            .send(json_request(
                Method::POST,
                "/v1/chat",
                Some(&cookie),
                r#"{"question": "more bikes"}"#,
            ))
            .await;
        assert!(session_cookie(&response).is_none());
        let body = body_json(response).await;
        assert_eq!(body["history"].as_array().unwrap().len(), 2 * n);
    }
}

#[tokio::test]
async fn test_search_failure_is_error_turn() {
    let app = TestApp::start(AnswerMode::Results).await;

    let response = app
        .send(json_request(
            Method::POST,
            "/v1/chat",
            None,
            r#"{"question": "trigger failure"}"#,
        ))
        .await;

    assert_status(&response, StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["isError"], true);
    assert!(body["answer"]
        .as_str()
        .unwrap()
        .starts_with("Error processing query"));
    assert_eq!(body["history"][1]["isError"], true);
    assert_eq!(body["history"].as_array().unwrap().len(), 2);
}

#[tokio::test]
async fn test_blank_question_rejected() {
    let app = TestApp::start(AnswerMode::Results).await;

    let response = app
        .send(json_request(Method::POST, "/v1/chat", None, r#"{"question": "  "}"#))
        .await;

    assert_status(&response, StatusCode::BAD_REQUEST);
    let body = body_json(response).await;
    assert_eq!(body["errorType"], "validation_error");
    assert!(app.fake.searches().is_empty());
}

#[tokio::test]
async fn test_busy_session_conflict() {
    let app = TestApp::start(AnswerMode::Results).await;

    let first = app
        .send(json_request(Method::POST, "/v1/chat", None, r#"{"question": "bikes"}"#))
        .await;
    let cookie = session_cookie(&first).unwrap();
    let id = SessionId::parse(cookie.trim_start_matches("cortex_chat_session=")).unwrap();

    // Simulate a turn in flight
    let session = app.state.sessions.get(id).await.unwrap();
    let guard = session.lock().await;

    let response = app
        .send(json_request(
            Method::POST,
            "/v1/chat",
            Some(&cookie),
            r#"{"question": "skis"}"#,
        ))
        .await;
    assert_status(&response, StatusCode::CONFLICT);
    assert_eq!(body_json(response).await["errorType"], "session_busy");

    assert_eq!(guard.history().len(), 2);
}

#[tokio::test]
async fn test_reset_clears_history() {
    let app = TestApp::start(AnswerMode::Results).await;

    let first = app
        .send(json_request(Method::POST, "/v1/chat", None, r#"{"question": "bikes"}"#))
        .await;
    let cookie = session_cookie(&first).unwrap();

    let response = app
        .send(json_request(Method::POST, "/v1/reset", Some(&cookie), ""))
        .await;
    assert_status(&response, StatusCode::OK);
    assert_eq!(body_json(response).await["historyLength"], 0);
}

#[tokio::test]
async fn test_generate_mode_answer() {
    let app = TestApp::start(AnswerMode::Generate).await;

    let response = app
        .send(json_request(
            Method::POST,
            "/v1/chat",
            None,
            r#"{"question": "Which bike is lightest?"}"#,
        ))
        .await;

    let body = body_json(response).await;
    assert_eq!(body["answer"], "The Xtreme Road is the lightest bike.");

    let completions = app
        .fake
        .statements()
        .into_iter()
        .filter(|s| s["statement"].as_str().unwrap().contains("CORTEX.COMPLETE"))
        .count();
    assert_eq!(completions, 1);
}
