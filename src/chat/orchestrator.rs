// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Chat orchestration
//!
//! Drives one session through Idle -> AwaitingResponse -> Idle for every
//! question. A failure at any step becomes an error turn; nothing here
//! ends the session.

use serde::Serialize;
use std::sync::Arc;
use thiserror::Error;
use tracing::{debug, info, warn};

use super::format::{format_error, format_results};
use super::session::ChatSession;
use crate::catalog::{category_options, CatalogError, DocumentCatalog, DocumentLink};
use crate::completion::{build_answer_prompt, build_summary_prompt, Completer, CompletionError};
use crate::config::{AnswerMode, ChatConfig};
use crate::search::{SearchAdapter, SearchError, SearchResult, ALL_CATEGORIES};

#[derive(Debug, Error)]
pub enum TurnError {
    #[error(transparent)]
    Search(#[from] SearchError),

    #[error(transparent)]
    Completion(#[from] CompletionError),
}

/// What a question produced
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TurnOutcome {
    pub answer: String,
    pub is_error: bool,
}

/// Catalog data needed for one page render
#[derive(Debug, Clone, Default, Serialize)]
pub struct CatalogView {
    /// `ALL` first, then the remote categories
    pub categories: Vec<String>,
    pub documents: Vec<String>,
    /// Banner messages for queries that failed
    pub errors: Vec<String>,
}

struct Answer {
    text: String,
    related: Vec<DocumentLink>,
}

pub struct ChatOrchestrator {
    search: SearchAdapter,
    catalog: Arc<dyn DocumentCatalog>,
    completer: Arc<dyn Completer>,
    config: ChatConfig,
    presign_ttl_secs: u64,
}

impl ChatOrchestrator {
    pub fn new(
        search: SearchAdapter,
        catalog: Arc<dyn DocumentCatalog>,
        completer: Arc<dyn Completer>,
        config: ChatConfig,
        presign_ttl_secs: u64,
    ) -> Self {
        Self {
            search,
            catalog,
            completer,
            config,
            presign_ttl_secs,
        }
    }

    pub fn config(&self) -> &ChatConfig {
        &self.config
    }

    /// Handle one question for a session
    ///
    /// Always appends exactly one user turn and one assistant turn.
    pub async fn ask(&self, session: &mut ChatSession, question: &str) -> TurnOutcome {
        session.begin_turn(question);

        match self.answer(session, question).await {
            Ok(answer) => {
                session.set_related_documents(answer.related);
                session.finish_turn(answer.text.clone());
                TurnOutcome {
                    answer: answer.text,
                    is_error: false,
                }
            }
            Err(e) => {
                warn!("Turn failed for session {}: {}", session.id(), e);
                let text = format_error(&e);
                session.fail_turn(text.clone());
                TurnOutcome {
                    answer: text,
                    is_error: true,
                }
            }
        }
    }

    async fn answer(&self, session: &mut ChatSession, question: &str) -> Result<Answer, TurnError> {
        let options = session.config().clone();
        let history = if options.use_chat_history {
            session.prior_turns(self.config.slide_window).to_vec()
        } else {
            Vec::new()
        };

        let search_text = match self.config.answer_mode {
            AnswerMode::Generate if !history.is_empty() => {
                let summary = self
                    .completer
                    .complete(&options.model_name, &build_summary_prompt(&history, question))
                    .await?;
                if options.debug {
                    session.push_debug_note(format!("Summary to search: {}", summary));
                }
                summary
            }
            _ => question.to_string(),
        };

        let result = self
            .search
            .search(&search_text, options.category_filter())
            .await?;
        if options.debug {
            session.push_debug_note(format!(
                "Searched '{}' (category {}): {} chunks in {}ms",
                result.query, options.category, result.result_count, result.search_time_ms
            ));
        }

        let text = match self.config.answer_mode {
            AnswerMode::Results => format_results(&result),
            AnswerMode::Generate => {
                let prompt = build_answer_prompt(question, &result.results, &history);
                self.completer.complete(&options.model_name, &prompt).await?
            }
        };

        let related = self.related_documents(&result).await;
        Ok(Answer { text, related })
    }

    /// Presigned links for the documents behind a result
    ///
    /// Links that cannot be created are skipped.
    async fn related_documents(&self, result: &SearchResult) -> Vec<DocumentLink> {
        let mut links = Vec::new();
        for path in result.relative_paths() {
            match self.catalog.presigned_url(&path, self.presign_ttl_secs).await {
                Ok(url) => links.push(DocumentLink {
                    relative_path: path,
                    url,
                }),
                Err(e) => warn!("Skipping related document: {}", e),
            }
        }
        links
    }

    /// Clear the transcript; session options stay as they are
    pub fn reset(&self, session: &mut ChatSession) {
        info!("Resetting conversation for session {}", session.id());
        session.reset();
    }

    /// Search without touching any session
    pub async fn search(
        &self,
        query: &str,
        category: Option<&str>,
    ) -> Result<SearchResult, SearchError> {
        self.search.search(query, category).await
    }

    pub async fn categories(&self) -> Result<Vec<String>, CatalogError> {
        Ok(category_options(self.catalog.list_categories().await?))
    }

    pub async fn documents(&self) -> Result<Vec<String>, CatalogError> {
        self.catalog.list_documents().await
    }

    /// Categories and documents for a full render
    ///
    /// Failures are logged and reported as banner messages; the selector
    /// still offers `ALL`.
    pub async fn catalog_view(&self) -> CatalogView {
        let mut view = CatalogView::default();

        match self.categories().await {
            Ok(categories) => view.categories = categories,
            Err(e) => {
                warn!("{}", e);
                view.categories = vec![ALL_CATEGORIES.to_string()];
                view.errors.push(e.to_string());
            }
        }

        match self.documents().await {
            Ok(documents) => view.documents = documents,
            Err(e) => {
                warn!("{}", e);
                view.errors.push(e.to_string());
            }
        }

        debug!(
            "Catalog view: {} categories, {} documents, {} errors",
            view.categories.len(),
            view.documents.len(),
            view.errors.len()
        );
        view
    }
}
