// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
use clap::Parser;
use std::path::PathBuf;
use std::time::Duration;

use crate::config::{
    AnswerMode, AppConfig, ConfigError, ConnectionConfig, DEFAULT_CHUNKS_TABLE,
    DEFAULT_DOCS_STAGE, DEFAULT_LISTEN_ADDR, DEFAULT_SEARCH_DATABASE, DEFAULT_SEARCH_SCHEMA,
    DEFAULT_SEARCH_SERVICE,
};

/// Knowledge Graph Document Assistant
#[derive(Parser, Debug)]
#[command(name = "cortex-doc-chat")]
#[command(version)]
#[command(about = "Chat with your documents through Snowflake Cortex Search", long_about = None)]
pub struct Cli {
    /// Read SNOWFLAKE_* credentials from this TOML file instead of the environment
    #[arg(long)]
    pub secrets: Option<PathBuf>,

    /// Address the chat server binds to
    #[arg(long, env = "LISTEN_ADDR", default_value = DEFAULT_LISTEN_ADDR)]
    pub listen_addr: String,

    /// Base URL of the account (defaults to https://{account}.snowflakecomputing.com)
    #[arg(long, env = "SNOWFLAKE_HOST")]
    pub snowflake_host: Option<String>,

    /// Database holding the search service
    #[arg(long, env = "CORTEX_SEARCH_DATABASE", default_value = DEFAULT_SEARCH_DATABASE)]
    pub search_database: String,

    /// Schema holding the search service
    #[arg(long, env = "CORTEX_SEARCH_SCHEMA", default_value = DEFAULT_SEARCH_SCHEMA)]
    pub search_schema: String,

    /// Search service name
    #[arg(long, env = "CORTEX_SEARCH_SERVICE", default_value = DEFAULT_SEARCH_SERVICE)]
    pub search_service: String,

    /// Stage with the source documents
    #[arg(long, env = "DOCS_STAGE", default_value = DEFAULT_DOCS_STAGE)]
    pub docs_stage: String,

    /// Table of indexed chunks, used for the category list
    #[arg(long, env = "CHUNKS_TABLE", default_value = DEFAULT_CHUNKS_TABLE)]
    pub chunks_table: String,

    /// Show retrieved chunks or a generated answer
    #[arg(long, env = "ANSWER_MODE", value_enum, default_value_t = AnswerMode::Results)]
    pub answer_mode: AnswerMode,

    /// Timeout for each platform request
    #[arg(long, env = "REQUEST_TIMEOUT_SECS", default_value_t = 30)]
    pub request_timeout_secs: u64,

    /// Sessions idle longer than this are dropped
    #[arg(long, env = "SESSION_IDLE_TIMEOUT_SECS", default_value_t = 1800)]
    pub session_idle_timeout_secs: u64,

    /// Maximum number of live sessions
    #[arg(long, env = "MAX_SESSIONS", default_value_t = 1000)]
    pub max_sessions: usize,
}

impl Cli {
    /// Credentials from the secrets file when given, the environment otherwise
    pub fn connection(&self) -> Result<ConnectionConfig, ConfigError> {
        match &self.secrets {
            Some(path) => ConnectionConfig::from_secrets_file(path),
            None => ConnectionConfig::from_env(),
        }
    }

    pub fn into_app_config(self) -> Result<AppConfig, ConfigError> {
        let connection = self.connection()?;
        Ok(self.with_connection(connection))
    }

    fn with_connection(self, connection: ConnectionConfig) -> AppConfig {
        let mut config = AppConfig::with_connection(connection);
        config.host = self.snowflake_host.filter(|h| !h.trim().is_empty());
        config.listen_addr = self.listen_addr;
        config.search.database = self.search_database;
        config.search.schema = self.search_schema;
        config.search.service = self.search_service;
        config.catalog.stage = self.docs_stage;
        config.catalog.chunks_table = self.chunks_table;
        config.chat.answer_mode = self.answer_mode;
        config.request_timeout = Duration::from_secs(self.request_timeout_secs);
        config.session_idle_timeout = Duration::from_secs(self.session_idle_timeout_secs);
        config.max_sessions = self.max_sessions;
        config
    }
}
