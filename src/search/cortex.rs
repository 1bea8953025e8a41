// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Cortex Search service backend
//!
//! Queries a named Cortex Search service through
//! `POST /api/v2/databases/{db}/schemas/{schema}/cortex-search-services/{name}:query`.

use async_trait::async_trait;
use reqwest::header::RETRY_AFTER;
use reqwest::StatusCode;
use serde_json::Value;
use std::sync::Arc;
use tracing::debug;

use super::provider::ChunkSearch;
use super::types::{SearchError, SearchQuery};
use crate::config::SearchServiceConfig;
use crate::snowflake::{PlatformError, SnowflakeClient};

const DEFAULT_RETRY_AFTER_SECS: u64 = 60;

/// Handle to one search service inside a database and schema
pub struct CortexSearchService {
    client: Arc<SnowflakeClient>,
    qualified_name: String,
    path: String,
}

impl CortexSearchService {
    /// Scope a connected client to one search service
    pub fn new(client: Arc<SnowflakeClient>, config: &SearchServiceConfig) -> Self {
        Self {
            client,
            qualified_name: format!("{}.{}.{}", config.database, config.schema, config.service),
            path: format!(
                "/api/v2/databases/{}/schemas/{}/cortex-search-services/{}:query",
                config.database, config.schema, config.service
            ),
        }
    }

    pub fn qualified_name(&self) -> &str {
        &self.qualified_name
    }

    pub fn path(&self) -> &str {
        &self.path
    }
}

impl SnowflakeClient {
    /// Handle scoped to a named search service
    pub fn search_service(self: &Arc<Self>, config: &SearchServiceConfig) -> CortexSearchService {
        CortexSearchService::new(Arc::clone(self), config)
    }
}

fn platform_to_search(error: PlatformError) -> SearchError {
    match error {
        PlatformError::Timeout { timeout_ms } => SearchError::Timeout { timeout_ms },
        PlatformError::Unauthorized { .. } => SearchError::Unauthorized,
        PlatformError::Http { status, message } => SearchError::ApiError { status, message },
        other => SearchError::ApiError {
            status: 0,
            message: other.to_string(),
        },
    }
}

#[async_trait]
impl ChunkSearch for CortexSearchService {
    async fn query(&self, query: &SearchQuery) -> Result<Value, SearchError> {
        debug!(
            "Querying {} (limit {}, filter {:?})",
            self.qualified_name, query.limit, query.filter
        );

        let response = self
            .client
            .post_json(&self.path, query)
            .await
            .map_err(platform_to_search)?;

        match response.status() {
            StatusCode::OK => response
                .json::<Value>()
                .await
                .map_err(|e| SearchError::MalformedResponse {
                    reason: format!("JSON parse error: {}", e),
                }),
            StatusCode::TOO_MANY_REQUESTS => {
                let retry_after_secs = response
                    .headers()
                    .get(RETRY_AFTER)
                    .and_then(|v| v.to_str().ok())
                    .and_then(|v| v.parse().ok())
                    .unwrap_or(DEFAULT_RETRY_AFTER_SECS);
                Err(SearchError::RateLimited { retry_after_secs })
            }
            StatusCode::NOT_FOUND => Err(SearchError::ServiceNotFound {
                service: self.qualified_name.clone(),
            }),
            _ => {
                let error = SnowflakeClient::error_from_response(response).await;
                Err(match error {
                    PlatformError::Statement { code, message } => SearchError::ApiError {
                        status: 0,
                        message: format!("{}: {}", code, message),
                    },
                    other => platform_to_search(other),
                })
            }
        }
    }

    fn name(&self) -> &str {
        "cortex-search"
    }
}
