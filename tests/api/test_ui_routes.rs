// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1

//! HTML page and form endpoints

use axum::http::{header, StatusCode};
use cortex_doc_chat::config::AnswerMode;

use crate::support::app::{
    assert_status, body_json, body_text, form_request, get_request, session_cookie, TestApp,
};

#[tokio::test]
async fn test_first_visit_renders_page_and_sets_cookie() {
    let app = TestApp::start(AnswerMode::Results).await;

    let response = app.send(get_request("/", None)).await;
    assert_status(&response, StatusCode::OK);

    let cookie = response.headers()[header::SET_COOKIE].to_str().unwrap().to_string();
    assert!(cookie.starts_with("cortex_chat_session="));
    assert!(cookie.contains("HttpOnly"));

    let html = body_text(response).await;
    assert!(html.contains("Knowledge Graph Document Assistant"));
    assert!(html.contains("<option value=\"ALL\""));
    assert!(html.contains("<option value=\"Bikes\""));
    assert!(html.contains("skis.pdf"));
    assert!(html.contains("Start Over"));
}

#[tokio::test]
async fn test_ask_form_redirects_and_shows_transcript() {
    let app = TestApp::start(AnswerMode::Results).await;

    let first = app.send(get_request("/", None)).await;
    let cookie = session_cookie(&first).unwrap();

    let response = app
        .send(form_request(
            "/ask",
            Some(&cookie),
            "question=What+products+do+you+have%3F",
        ))
        .await;
    assert_status(&response, StatusCode::SEE_OTHER);
    assert_eq!(response.headers()[header::LOCATION], "/");

    let html = body_text(app.send(get_request("/", Some(&cookie))).await).await;
    assert!(html.contains("What products do you have?"));
    assert!(html.contains("Xtreme Road"));
    assert!(html.contains("Related Documents"));
}

#[tokio::test]
async fn test_settings_form_unchecked_boxes_are_false() {
    let app = TestApp::start(AnswerMode::Results).await;

    let first = app.send(get_request("/", None)).await;
    let cookie = session_cookie(&first).unwrap();

    let response = app
        .send(form_request(
            "/settings",
            Some(&cookie),
            "model=mistral-large&category=Snow",
        ))
        .await;
    assert_status(&response, StatusCode::SEE_OTHER);

    let body = body_json(app.send(get_request("/v1/session", Some(&cookie))).await).await;
    assert_eq!(body["config"]["category"], "Snow");
    assert_eq!(body["config"]["useChatHistory"], false);
    assert_eq!(body["config"]["debug"], false);
}

#[tokio::test]
async fn test_start_over_clears_transcript() {
    let app = TestApp::start(AnswerMode::Results).await;

    let first = app.send(get_request("/", None)).await;
    let cookie = session_cookie(&first).unwrap();
    app.send(form_request("/ask", Some(&cookie), "question=bikes"))
        .await;

    let response = app.send(form_request("/reset", Some(&cookie), "")).await;
    assert_status(&response, StatusCode::SEE_OTHER);

    let body = body_json(app.send(get_request("/v1/session", Some(&cookie))).await).await;
    assert_eq!(body["historyLength"], 0);
}

#[tokio::test]
async fn test_empty_question_is_ignored() {
    let app = TestApp::start(AnswerMode::Results).await;

    let first = app.send(get_request("/", None)).await;
    let cookie = session_cookie(&first).unwrap();

    let response = app
        .send(form_request("/ask", Some(&cookie), "question=+++"))
        .await;
    assert_status(&response, StatusCode::SEE_OTHER);
    assert!(app.fake.searches().is_empty());
}
