// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
use serde::{Deserialize, Serialize};

use super::errors::ApiError;
use crate::catalog::DocumentLink;
use crate::chat::{ChatHistory, SessionConfig};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub active_sessions: usize,
    pub features: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CategoriesResponse {
    pub categories: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DocumentsResponse {
    pub documents: Vec<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SearchApiRequest {
    pub query: String,
    #[serde(default)]
    pub category: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ChatRequest {
    pub question: String,
}

impl ChatRequest {
    /// The question exactly as typed, unless it is blank
    pub fn validate(&self) -> Result<&str, ApiError> {
        if self.question.trim().is_empty() {
            return Err(ApiError::ValidationError {
                field: "question".to_string(),
                message: "Question cannot be empty".to_string(),
            });
        }
        Ok(&self.question)
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatResponse {
    pub answer: String,
    pub is_error: bool,
    pub history: ChatHistory,
    pub related_documents: Vec<DocumentLink>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResetResponse {
    pub history_length: usize,
}

/// Partial update of session options; absent keys keep their value
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionConfigUpdate {
    #[serde(default)]
    pub model: Option<String>,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub use_chat_history: Option<bool>,
    #[serde(default)]
    pub debug: Option<bool>,
}

impl SessionConfigUpdate {
    /// Apply onto `current`, checking the model against `models`
    pub fn apply(self, current: &SessionConfig, models: &[String]) -> Result<SessionConfig, ApiError> {
        let mut config = current.clone();

        if let Some(model) = self.model {
            if !models.contains(&model) {
                return Err(ApiError::ModelNotFound {
                    model,
                    available_models: models.to_vec(),
                });
            }
            config.model_name = model;
        }
        if let Some(category) = self.category {
            config.category = category;
        }
        if let Some(use_chat_history) = self.use_chat_history {
            config.use_chat_history = use_chat_history;
        }
        if let Some(debug) = self.debug {
            config.debug = debug;
        }
        Ok(config)
    }
}
