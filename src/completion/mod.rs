// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Language-model completion step
//!
//! Used in generated-answer mode: the model answers from retrieved chunks,
//! and follow-up questions are first rewritten into standalone queries.

pub mod prompt;

use async_trait::async_trait;
use std::sync::Arc;
use std::time::Instant;
use thiserror::Error;
use tracing::{debug, info};

use crate::snowflake::{PlatformError, SnowflakeClient};

pub use prompt::{build_answer_prompt, build_summary_prompt};

#[derive(Debug, Error)]
pub enum CompletionError {
    #[error("Completion failed: {0}")]
    Platform(#[from] PlatformError),

    #[error("Model {model} returned an empty completion")]
    Empty { model: String },
}

#[async_trait]
pub trait Completer: Send + Sync {
    /// Complete a prompt with the named model
    async fn complete(&self, model: &str, prompt: &str) -> Result<String, CompletionError>;
}

/// Completer running `SNOWFLAKE.CORTEX.COMPLETE` through the SQL API
pub struct CortexCompleter {
    client: Arc<SnowflakeClient>,
}

impl CortexCompleter {
    pub fn new(client: Arc<SnowflakeClient>) -> Self {
        Self { client }
    }
}

#[async_trait]
impl Completer for CortexCompleter {
    async fn complete(&self, model: &str, prompt: &str) -> Result<String, CompletionError> {
        debug!("Completion request: model={} prompt_chars={}", model, prompt.len());
        let start = Instant::now();

        let result = self
            .client
            .execute("SELECT SNOWFLAKE.CORTEX.COMPLETE(?, ?) AS response", &[model, prompt])
            .await?;

        let text = result
            .scalar()
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .ok_or_else(|| CompletionError::Empty {
                model: model.to_string(),
            })?
            .to_string();

        info!(
            "Completion from {} in {}ms ({} chars)",
            model,
            start.elapsed().as_millis(),
            text.len()
        );
        Ok(text)
    }
}
