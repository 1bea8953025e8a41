// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Conversation state and turn handling

pub mod format;
pub mod history;
pub mod orchestrator;
pub mod session;
pub mod store;
pub mod turn;

pub use history::ChatHistory;
pub use orchestrator::{CatalogView, ChatOrchestrator, TurnError, TurnOutcome};
pub use session::{ChatSession, ChatState, SessionConfig, SessionId, SessionSnapshot};
pub use store::{SessionStore, SessionStoreConfig, SharedSession, StoreError};
pub use turn::{ChatRole, ChatTurn};
