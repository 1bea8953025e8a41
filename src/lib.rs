// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
pub mod api;
pub mod catalog;
pub mod chat;
pub mod cli;
pub mod completion;
pub mod config;
pub mod search;
pub mod snowflake;
pub mod version;

// Re-export main types
pub use api::{create_app, start_server, AppState, PageRenderer};
pub use catalog::{DocumentCatalog, DocumentLink, SnowflakeCatalog};
pub use chat::{ChatOrchestrator, ChatSession, SessionConfig, SessionStore, SessionStoreConfig};
pub use completion::{Completer, CortexCompleter};
pub use config::{AnswerMode, AppConfig, ConfigError, ConnectionConfig};
pub use search::{ChunkSearch, CortexSearchService, SearchAdapter};
pub use snowflake::{PlatformError, SnowflakeClient};
