// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1

//! Document catalog and completion statements against the fake SQL API

use cortex_doc_chat::catalog::{category_options, CatalogError, DocumentCatalog, SnowflakeCatalog};
use cortex_doc_chat::completion::{Completer, CortexCompleter};
use cortex_doc_chat::config::CatalogConfig;
use cortex_doc_chat::snowflake::SnowflakeClient;
use std::sync::Arc;
use std::time::Duration;

use crate::support::fake_snowflake::{FakeSnowflake, TOKEN};

fn client(fake: &FakeSnowflake, token: &str) -> Arc<SnowflakeClient> {
    Arc::new(
        SnowflakeClient::new(
            fake.connection(token),
            Some(&fake.base_url()),
            Duration::from_secs(5),
        )
        .unwrap(),
    )
}

#[tokio::test]
async fn test_categories_with_all_sentinel() {
    let fake = FakeSnowflake::start().await;
    let catalog = SnowflakeCatalog::new(client(&fake, TOKEN), CatalogConfig::default());

    let categories = catalog.list_categories().await.unwrap();
    assert_eq!(categories, vec!["Bikes", "Snow"]);
    assert_eq!(category_options(categories), vec!["ALL", "Bikes", "Snow"]);
}

#[tokio::test]
async fn test_documents_listed_from_stage() {
    let fake = FakeSnowflake::start().await;
    let catalog = SnowflakeCatalog::new(client(&fake, TOKEN), CatalogConfig::default());

    let documents = catalog.list_documents().await.unwrap();
    assert_eq!(documents, vec!["bikes.pdf", "skis.pdf"]);
    assert!(fake.statements()[0]["statement"]
        .as_str()
        .unwrap()
        .contains("DIRECTORY(@docs)"));
}

#[tokio::test]
async fn test_presigned_url_binds_path_and_ttl() {
    let fake = FakeSnowflake::start().await;
    let catalog = SnowflakeCatalog::new(client(&fake, TOKEN), CatalogConfig::default());

    let url = catalog.presigned_url("bikes.pdf", 360).await.unwrap();
    assert_eq!(url, "https://files.example/bikes.pdf?expires=360");
}

#[tokio::test]
async fn test_category_failure_is_typed() {
    let fake = FakeSnowflake::start().await;
    let catalog = SnowflakeCatalog::new(client(&fake, "expired"), CatalogConfig::default());

    let err = catalog.list_categories().await.unwrap_err();
    assert!(matches!(err, CatalogError::Categories(_)));
    assert!(err.to_string().starts_with("Cannot list categories"));
}

#[tokio::test]
async fn test_completion_statement() {
    let fake = FakeSnowflake::start().await;
    let completer = CortexCompleter::new(client(&fake, TOKEN));

    let answer = completer
        .complete("mistral-large", "Which bike is lightest?")
        .await
        .unwrap();
    assert_eq!(answer, "The Xtreme Road is the lightest bike.");
    assert_eq!(fake.statements()[0]["bindings"]["1"]["value"], "mistral-large");
}
