// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Search adapter
//!
//! Turns a question plus category selection into a fixed-shape request,
//! sends it once, and validates the payload.

use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, info, warn};

use super::provider::ChunkSearch;
use super::types::{parse_results, SearchError, SearchQuery, SearchResult};

/// Longest question accepted, in characters
pub const MAX_QUERY_CHARS: usize = 2000;

pub struct SearchAdapter {
    backend: Arc<dyn ChunkSearch>,
}

impl SearchAdapter {
    pub fn new(backend: Arc<dyn ChunkSearch>) -> Self {
        Self { backend }
    }

    /// Search for chunks relevant to a question
    ///
    /// # Arguments
    /// * `query` - Free-text question
    /// * `category` - Category selection; `ALL` or None means unfiltered
    ///
    /// # Returns
    /// Validated results with the raw payload attached. No retries.
    pub async fn search(
        &self,
        query: &str,
        category: Option<&str>,
    ) -> Result<SearchResult, SearchError> {
        if query.trim().is_empty() {
            return Err(SearchError::InvalidQuery {
                reason: "Query cannot be empty".to_string(),
            });
        }
        if query.chars().count() > MAX_QUERY_CHARS {
            return Err(SearchError::InvalidQuery {
                reason: format!("Query too long (max {} characters)", MAX_QUERY_CHARS),
            });
        }

        let request = SearchQuery::new(query, category);
        debug!("Search request via {}: {:?}", self.backend.name(), request);

        let start = Instant::now();
        let raw = self.backend.query(&request).await.map_err(|e| {
            warn!("Search via {} failed: {}", self.backend.name(), e);
            e
        })?;
        let results = parse_results(&raw)?;
        let search_time_ms = start.elapsed().as_millis() as u64;

        let request_id = raw
            .get("request_id")
            .and_then(|v| v.as_str())
            .map(str::to_string);

        info!(
            "Search complete: {} results from {} in {}ms",
            results.len(),
            self.backend.name(),
            search_time_ms
        );

        Ok(SearchResult {
            query: request.query,
            result_count: results.len(),
            results,
            raw,
            request_id,
            search_time_ms,
        })
    }
}
