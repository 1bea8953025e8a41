// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1

//! Cortex Search tests through the real HTTP client
//!
//! Verifies the request shape the service receives: fixed limit and
//! columns, and a category filter only when a category is selected.

use cortex_doc_chat::config::SearchServiceConfig;
use cortex_doc_chat::search::{SearchAdapter, SearchError};
use cortex_doc_chat::snowflake::SnowflakeClient;
use serde_json::json;
use std::sync::Arc;
use std::time::Duration;

use crate::support::fake_snowflake::{FakeSnowflake, TOKEN};

fn adapter(fake: &FakeSnowflake, service: &str) -> SearchAdapter {
    let client = Arc::new(
        SnowflakeClient::new(
            fake.connection(TOKEN),
            Some(&fake.base_url()),
            Duration::from_secs(5),
        )
        .unwrap(),
    );
    let config = SearchServiceConfig {
        service: service.to_string(),
        ..SearchServiceConfig::default()
    };
    SearchAdapter::new(Arc::new(client.search_service(&config)))
}

#[tokio::test]
async fn test_unfiltered_search_request_shape() {
    let fake = FakeSnowflake::start().await;
    let adapter = adapter(&fake, "CC_SEARCH_SERVICE_CS");

    let result = adapter.search("What products do you have?", None).await.unwrap();

    assert_eq!(result.result_count, 3);
    assert_eq!(result.request_id.as_deref(), Some("req-0001"));
    assert_eq!(result.relative_paths(), vec!["bikes.pdf", "skis.pdf"]);

    let searches = fake.searches();
    assert_eq!(searches.len(), 1);
    let (service, body) = &searches[0];
    assert_eq!(service, "CC_SEARCH_SERVICE_CS:query");
    assert_eq!(body["query"], "What products do you have?");
    assert_eq!(body["limit"], 5);
    assert_eq!(body["columns"], json!(["chunk", "relative_path", "category"]));
    assert!(body.get("filter").is_none());
}

#[tokio::test]
async fn test_all_category_sends_no_filter() {
    let fake = FakeSnowflake::start().await;
    let adapter = adapter(&fake, "CC_SEARCH_SERVICE_CS");

    adapter.search("skis", Some("ALL")).await.unwrap();

    assert!(fake.searches()[0].1.get("filter").is_none());
}

#[tokio::test]
async fn test_category_filter_sent() {
    let fake = FakeSnowflake::start().await;
    let adapter = adapter(&fake, "CC_SEARCH_SERVICE_CS");

    adapter.search("laptops", Some("Electronics")).await.unwrap();

    assert_eq!(
        fake.searches()[0].1["filter"],
        json!({"@eq": {"category": "Electronics"}})
    );
}

#[tokio::test]
async fn test_unknown_service() {
    let fake = FakeSnowflake::start().await;
    let adapter = adapter(&fake, "NO_SUCH_SERVICE");

    let err = adapter.search("anything", None).await.unwrap_err();
    match err {
        SearchError::ServiceNotFound { service } => {
            assert_eq!(service, "BASIC_KNOWLEDGE_GRAPH.DATA.NO_SUCH_SERVICE")
        }
        other => panic!("unexpected error: {}", other),
    }
}

#[tokio::test]
async fn test_rate_limit_reads_retry_after() {
    let fake = FakeSnowflake::start().await;
    let adapter = adapter(&fake, "CC_SEARCH_SERVICE_CS");

    let err = adapter.search("trigger rate limit", None).await.unwrap_err();
    assert!(matches!(err, SearchError::RateLimited { retry_after_secs: 7 }));
}

#[tokio::test]
async fn test_server_error_surfaces() {
    let fake = FakeSnowflake::start().await;
    let adapter = adapter(&fake, "CC_SEARCH_SERVICE_CS");

    let err = adapter.search("trigger failure", None).await.unwrap_err();
    assert!(matches!(err, SearchError::ApiError { status: 500, .. }));
}

#[tokio::test]
async fn test_blank_query_never_sent() {
    let fake = FakeSnowflake::start().await;
    let adapter = adapter(&fake, "CC_SEARCH_SERVICE_CS");

    let err = adapter.search("   ", None).await.unwrap_err();
    assert!(matches!(err, SearchError::InvalidQuery { .. }));
    assert!(fake.searches().is_empty());
}
