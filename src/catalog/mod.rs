// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Document catalog queries
//!
//! Categories, stage listings and presigned links all come from SQL
//! statements; nothing here is cached, every page render asks again.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use thiserror::Error;
use tracing::debug;

use crate::config::CatalogConfig;
use crate::search::ALL_CATEGORIES;
use crate::snowflake::{PlatformError, SnowflakeClient};

#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("Cannot list categories: {0}")]
    Categories(PlatformError),

    #[error("Cannot list documents: {0}")]
    Documents(PlatformError),

    #[error("Cannot create link for {path}: {source}")]
    PresignedUrl {
        path: String,
        #[source]
        source: PlatformError,
    },

    #[error("Unexpected catalog result: {0}")]
    Shape(String),
}

/// A source document and a time-limited link to it
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DocumentLink {
    pub relative_path: String,
    pub url: String,
}

/// Read-only view of the indexed documents
#[async_trait]
pub trait DocumentCatalog: Send + Sync {
    /// Distinct category values of indexed chunks
    async fn list_categories(&self) -> Result<Vec<String>, CatalogError>;

    /// File names in the document stage
    async fn list_documents(&self) -> Result<Vec<String>, CatalogError>;

    /// Time-limited URL for one document
    async fn presigned_url(&self, relative_path: &str, ttl_secs: u64)
        -> Result<String, CatalogError>;
}

/// Prepend the `ALL` sentinel to the remote category list
pub fn category_options(categories: Vec<String>) -> Vec<String> {
    let mut options = Vec::with_capacity(categories.len() + 1);
    options.push(ALL_CATEGORIES.to_string());
    options.extend(categories.into_iter().filter(|c| c != ALL_CATEGORIES));
    options
}

/// Catalog backed by SQL API statements
pub struct SnowflakeCatalog {
    client: Arc<SnowflakeClient>,
    config: CatalogConfig,
}

impl SnowflakeCatalog {
    /// Identifiers in `config` must already be validated
    pub fn new(client: Arc<SnowflakeClient>, config: CatalogConfig) -> Self {
        Self { client, config }
    }

    fn categories_sql(&self) -> String {
        format!(
            "SELECT DISTINCT category FROM {} ORDER BY category",
            self.config.chunks_table
        )
    }

    fn documents_sql(&self) -> String {
        format!(
            "SELECT relative_path FROM DIRECTORY(@{}) ORDER BY relative_path",
            self.config.stage
        )
    }

    fn presign_sql(&self) -> String {
        format!(
            "SELECT GET_PRESIGNED_URL(@{}, ?, ?) AS url_link",
            self.config.stage
        )
    }
}

#[async_trait]
impl DocumentCatalog for SnowflakeCatalog {
    async fn list_categories(&self) -> Result<Vec<String>, CatalogError> {
        let result = self
            .client
            .execute(&self.categories_sql(), &[])
            .await
            .map_err(CatalogError::Categories)?;
        let categories = result
            .column("category")
            .ok_or_else(|| CatalogError::Shape("no CATEGORY column".to_string()))?;
        debug!("Found {} categories", categories.len());
        Ok(categories)
    }

    async fn list_documents(&self) -> Result<Vec<String>, CatalogError> {
        let result = self
            .client
            .execute(&self.documents_sql(), &[])
            .await
            .map_err(CatalogError::Documents)?;
        result
            .column("relative_path")
            .ok_or_else(|| CatalogError::Shape("no RELATIVE_PATH column".to_string()))
    }

    async fn presigned_url(
        &self,
        relative_path: &str,
        ttl_secs: u64,
    ) -> Result<String, CatalogError> {
        let ttl = ttl_secs.to_string();
        let result = self
            .client
            .execute(&self.presign_sql(), &[relative_path, &ttl])
            .await
            .map_err(|source| CatalogError::PresignedUrl {
                path: relative_path.to_string(),
                source,
            })?;
        result
            .scalar()
            .map(str::to_string)
            .ok_or_else(|| CatalogError::Shape(format!("no URL returned for {}", relative_path)))
    }
}
