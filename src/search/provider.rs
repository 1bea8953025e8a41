// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Chunk search backend trait definition

use async_trait::async_trait;
use serde_json::Value;

use super::types::{SearchError, SearchQuery};

/// Trait for remote chunk search backends
///
/// Backends send one request and hand back the payload untouched;
/// validation happens in [`super::adapter::SearchAdapter`].
#[async_trait]
pub trait ChunkSearch: Send + Sync {
    /// Run one search
    ///
    /// # Arguments
    /// * `query` - Fully built request (text, projection, limit, filter)
    ///
    /// # Returns
    /// The raw JSON payload or an error
    async fn query(&self, query: &SearchQuery) -> Result<Value, SearchError>;

    /// Backend name for logging
    fn name(&self) -> &str;
}
