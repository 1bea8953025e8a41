// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::{Duration, Instant};
use tracing::warn;
use uuid::Uuid;

use super::history::ChatHistory;
use super::turn::{ChatRole, ChatTurn};
use crate::catalog::DocumentLink;
use crate::search::ALL_CATEGORIES;

/// Message recorded when a turn never received its answer
pub const INTERRUPTED_MESSAGE: &str = "The previous request was interrupted before it finished.";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SessionId(Uuid);

impl SessionId {
    pub fn generate() -> Self {
        Self(Uuid::new_v4())
    }

    pub fn parse(value: &str) -> Option<Self> {
        Uuid::parse_str(value).ok().map(Self)
    }
}

impl fmt::Display for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// User-selected options; each key holds exactly one current value
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionConfig {
    pub model_name: String,
    pub category: String,
    pub use_chat_history: bool,
    pub debug: bool,
}

impl SessionConfig {
    pub fn new(model_name: &str) -> Self {
        Self {
            model_name: model_name.to_string(),
            category: ALL_CATEGORIES.to_string(),
            use_chat_history: true,
            debug: false,
        }
    }

    /// Category to filter on, None for `ALL`
    pub fn category_filter(&self) -> Option<&str> {
        if self.category == ALL_CATEGORIES {
            None
        } else {
            Some(&self.category)
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum ChatState {
    Idle,
    AwaitingResponse,
}

/// Per-browser-session state
#[derive(Debug)]
pub struct ChatSession {
    id: SessionId,
    config: SessionConfig,
    history: ChatHistory,
    state: ChatState,
    related_documents: Vec<DocumentLink>,
    debug_notes: Vec<String>,
    created_at: DateTime<Utc>,
    last_activity: Instant,
}

/// Serializable view for the session-state inspector
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionSnapshot {
    pub id: SessionId,
    pub config: SessionConfig,
    pub state: ChatState,
    pub history_length: usize,
    pub history: ChatHistory,
    pub related_documents: Vec<DocumentLink>,
    pub debug_notes: Vec<String>,
    pub created_at: DateTime<Utc>,
}

impl ChatSession {
    pub fn new(id: SessionId, config: SessionConfig) -> Self {
        Self {
            id,
            config,
            history: ChatHistory::new(),
            state: ChatState::Idle,
            related_documents: Vec::new(),
            debug_notes: Vec::new(),
            created_at: Utc::now(),
            last_activity: Instant::now(),
        }
    }

    pub fn id(&self) -> SessionId {
        self.id
    }

    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    /// Replace the options; history is left alone
    pub fn set_config(&mut self, config: SessionConfig) {
        self.config = config;
        self.touch();
    }

    pub fn history(&self) -> &ChatHistory {
        &self.history
    }

    pub fn state(&self) -> ChatState {
        self.state
    }

    pub fn related_documents(&self) -> &[DocumentLink] {
        &self.related_documents
    }

    pub fn set_related_documents(&mut self, documents: Vec<DocumentLink>) {
        self.related_documents = documents;
    }

    pub fn debug_notes(&self) -> &[String] {
        &self.debug_notes
    }

    pub fn push_debug_note(&mut self, note: String) {
        self.debug_notes.push(note);
    }

    /// Turns before the question in flight, at most `n`
    pub fn prior_turns(&self, n: usize) -> &[ChatTurn] {
        match self.state {
            ChatState::Idle => self.history.window(n),
            ChatState::AwaitingResponse => {
                // drop the pending question from a window one wider
                let window = self.history.window(n.saturating_add(1));
                &window[..window.len().saturating_sub(1)]
            }
        }
    }

    /// Close a turn whose request was dropped mid-flight
    ///
    /// Returns true if a turn had to be closed.
    pub fn recover_interrupted(&mut self) -> bool {
        if self.state != ChatState::AwaitingResponse {
            return false;
        }
        warn!("Session {} had an unfinished turn, closing it", self.id);
        self.history.push(ChatTurn::error(INTERRUPTED_MESSAGE));
        self.state = ChatState::Idle;
        true
    }

    /// Idle + input: record the question and wait for the answer
    pub fn begin_turn(&mut self, question: &str) {
        self.recover_interrupted();
        self.history.push(ChatTurn::new(ChatRole::User, question));
        self.state = ChatState::AwaitingResponse;
        self.touch();
    }

    /// AwaitingResponse + answer: record it and go back to Idle
    pub fn finish_turn(&mut self, answer: String) {
        debug_assert_eq!(self.state, ChatState::AwaitingResponse);
        self.history.push(ChatTurn::new(ChatRole::Assistant, answer));
        self.state = ChatState::Idle;
        self.touch();
    }

    /// AwaitingResponse + failure: record an error turn and go back to Idle
    pub fn fail_turn(&mut self, message: String) {
        debug_assert_eq!(self.state, ChatState::AwaitingResponse);
        self.history.push(ChatTurn::error(message));
        self.state = ChatState::Idle;
        self.touch();
    }

    /// Clear the transcript from any state; options are kept
    pub fn reset(&mut self) {
        self.history.clear();
        self.related_documents.clear();
        self.debug_notes.clear();
        self.state = ChatState::Idle;
        self.touch();
    }

    pub fn touch(&mut self) {
        self.last_activity = Instant::now();
    }

    pub fn idle_for(&self) -> Duration {
        self.last_activity.elapsed()
    }

    pub fn snapshot(&self) -> SessionSnapshot {
        SessionSnapshot {
            id: self.id,
            config: self.config.clone(),
            state: self.state,
            history_length: self.history.len(),
            history: self.history.clone(),
            related_documents: self.related_documents.clone(),
            debug_notes: self.debug_notes.clone(),
            created_at: self.created_at,
        }
    }
}
