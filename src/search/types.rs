// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Core types for chunk search

use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use thiserror::Error;

/// Number of chunks requested for every question
pub const NUM_CHUNKS: usize = 5;

/// Columns projected from the search service
pub const COLUMNS: [&str; 3] = ["chunk", "relative_path", "category"];

/// Category selector value meaning "no filter"
pub const ALL_CATEGORIES: &str = "ALL";

/// One search request, serialised as the body of the query endpoint
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SearchQuery {
    /// Free-text question
    pub query: String,
    /// Column projection
    pub columns: Vec<String>,
    /// Always [`NUM_CHUNKS`]
    pub limit: usize,
    /// `{"@eq": {"category": value}}` when a category is selected
    #[serde(skip_serializing_if = "Option::is_none")]
    pub filter: Option<Value>,
}

impl SearchQuery {
    /// Build the request for a question and an optional category selection
    pub fn new(text: &str, category: Option<&str>) -> Self {
        Self {
            query: text.to_string(),
            columns: COLUMNS.iter().map(|c| c.to_string()).collect(),
            limit: NUM_CHUNKS,
            filter: Self::category_filter(category),
        }
    }

    /// Filter object for a category selection
    ///
    /// Only `ALL` or an absent selection produce no filter. Any other
    /// value is matched exactly as given.
    pub fn category_filter(category: Option<&str>) -> Option<Value> {
        match category {
            None | Some(ALL_CATEGORIES) => None,
            Some(value) => Some(json!({ "@eq": { "category": value } })),
        }
    }
}

/// A retrieved document chunk
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChunkRecord {
    /// Chunk text
    pub chunk: String,
    /// Path of the source document inside the stage
    pub relative_path: String,
    /// Category of the source document
    pub category: String,
}

/// Validated result of one search
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchResult {
    /// The query that was sent
    pub query: String,
    /// Typed chunk records, in service ranking order
    pub results: Vec<ChunkRecord>,
    /// Payload exactly as returned by the service
    pub raw: Value,
    /// Request id reported by the service, if any
    #[serde(skip_serializing_if = "Option::is_none")]
    pub request_id: Option<String>,
    /// Time taken for the search in milliseconds
    pub search_time_ms: u64,
    /// Number of results returned
    pub result_count: usize,
}

impl SearchResult {
    /// Distinct source paths, in first-seen order
    pub fn relative_paths(&self) -> Vec<String> {
        let mut paths: Vec<String> = Vec::new();
        for record in &self.results {
            if !paths.contains(&record.relative_path) {
                paths.push(record.relative_path.clone());
            }
        }
        paths
    }
}

/// Errors that can occur during search operations
#[derive(Debug, Error)]
pub enum SearchError {
    /// Rate limited by the search service
    #[error("Rate limited, retry after {retry_after_secs}s")]
    RateLimited {
        /// Seconds to wait before retrying
        retry_after_secs: u64,
    },

    /// API error from the search service
    #[error("Search API error: {status} - {message}")]
    ApiError {
        /// HTTP status code
        status: u16,
        /// Error message
        message: String,
    },

    /// Search request timed out
    #[error("Search timeout after {timeout_ms}ms")]
    Timeout {
        /// Timeout duration in milliseconds
        timeout_ms: u64,
    },

    /// Credentials were refused by the service
    #[error("Search service rejected the credentials")]
    Unauthorized,

    /// The named service does not exist or is not visible
    #[error("Search service not found: {service}")]
    ServiceNotFound {
        /// Fully qualified service name
        service: String,
    },

    /// Invalid search query
    #[error("Invalid query: {reason}")]
    InvalidQuery {
        /// Reason the query is invalid
        reason: String,
    },

    /// Response did not match the expected schema
    #[error("Malformed search response: {reason}")]
    MalformedResponse {
        /// What was wrong with the payload
        reason: String,
    },
}

/// Validate a raw payload into chunk records
///
/// The payload must carry a `results` array whose entries all have the
/// projected columns as strings; extra fields are ignored.
pub fn parse_results(raw: &Value) -> Result<Vec<ChunkRecord>, SearchError> {
    let results = raw
        .get("results")
        .and_then(Value::as_array)
        .ok_or_else(|| SearchError::MalformedResponse {
            reason: "missing 'results' array".to_string(),
        })?;

    results
        .iter()
        .enumerate()
        .map(|(i, entry)| {
            ChunkRecord::deserialize(entry).map_err(|e| SearchError::MalformedResponse {
                reason: format!("result {}: {}", i, e),
            })
        })
        .collect()
}
