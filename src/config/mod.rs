// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Service configuration
//!
//! Connection credentials come from [`ConnectionConfig`]; everything else
//! has a default matching the deployed search service.

pub mod connection;

use regex::Regex;
use serde::{Deserialize, Serialize};
use std::sync::OnceLock;
use std::time::Duration;
use thiserror::Error;

pub use connection::ConnectionConfig;

pub const DEFAULT_LISTEN_ADDR: &str = "0.0.0.0:8501";
pub const DEFAULT_SEARCH_DATABASE: &str = "BASIC_KNOWLEDGE_GRAPH";
pub const DEFAULT_SEARCH_SCHEMA: &str = "DATA";
pub const DEFAULT_SEARCH_SERVICE: &str = "CC_SEARCH_SERVICE_CS";
pub const DEFAULT_DOCS_STAGE: &str = "docs";
pub const DEFAULT_CHUNKS_TABLE: &str = "docs_chunks_table";
pub const DEFAULT_MODEL: &str = "mistral-large";
/// Turns of history fed into question summarisation
pub const DEFAULT_SLIDE_WINDOW: usize = 7;
/// Lifetime of presigned document links
pub const DEFAULT_PRESIGN_TTL_SECS: u64 = 360;

/// Errors raised while assembling configuration
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing configuration value {key}")]
    Missing { key: &'static str },

    #[error("Invalid value for {key}: {reason}")]
    Invalid { key: &'static str, reason: String },

    #[error("Cannot read secrets file {path}: {source}")]
    SecretsFile {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Cannot parse secrets file: {0}")]
    SecretsParse(#[from] toml::de::Error),
}

/// How an assistant turn is produced from retrieved chunks
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum AnswerMode {
    /// Show the retrieved chunks verbatim
    #[default]
    Results,
    /// Run a completion over the retrieved chunks and show the answer
    Generate,
}

/// Location of the Cortex Search service
#[derive(Debug, Clone, PartialEq)]
pub struct SearchServiceConfig {
    pub database: String,
    pub schema: String,
    pub service: String,
}

impl Default for SearchServiceConfig {
    fn default() -> Self {
        Self {
            database: DEFAULT_SEARCH_DATABASE.to_string(),
            schema: DEFAULT_SEARCH_SCHEMA.to_string(),
            service: DEFAULT_SEARCH_SERVICE.to_string(),
        }
    }
}

/// Where documents and their chunks live
#[derive(Debug, Clone, PartialEq)]
pub struct CatalogConfig {
    /// Stage name without the leading `@`
    pub stage: String,
    pub chunks_table: String,
    pub presign_ttl_secs: u64,
}

impl Default for CatalogConfig {
    fn default() -> Self {
        Self {
            stage: DEFAULT_DOCS_STAGE.to_string(),
            chunks_table: DEFAULT_CHUNKS_TABLE.to_string(),
            presign_ttl_secs: DEFAULT_PRESIGN_TTL_SECS,
        }
    }
}

/// Chat behaviour shared by every session
#[derive(Debug, Clone, PartialEq)]
pub struct ChatConfig {
    pub answer_mode: AnswerMode,
    /// Selectable completion models, first one is the default
    pub models: Vec<String>,
    pub slide_window: usize,
}

impl Default for ChatConfig {
    fn default() -> Self {
        Self {
            answer_mode: AnswerMode::Results,
            models: vec![DEFAULT_MODEL.to_string()],
            slide_window: DEFAULT_SLIDE_WINDOW,
        }
    }
}

/// Complete service configuration
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub connection: ConnectionConfig,
    /// Overrides `https://{account}.snowflakecomputing.com`
    pub host: Option<String>,
    pub listen_addr: String,
    pub search: SearchServiceConfig,
    pub catalog: CatalogConfig,
    pub chat: ChatConfig,
    pub request_timeout: Duration,
    pub session_idle_timeout: Duration,
    pub max_sessions: usize,
}

impl AppConfig {
    /// Configuration with defaults around the given credentials
    pub fn with_connection(connection: ConnectionConfig) -> Self {
        Self {
            connection,
            host: None,
            listen_addr: DEFAULT_LISTEN_ADDR.to_string(),
            search: SearchServiceConfig::default(),
            catalog: CatalogConfig::default(),
            chat: ChatConfig::default(),
            request_timeout: Duration::from_secs(30),
            session_idle_timeout: Duration::from_secs(1800),
            max_sessions: 1000,
        }
    }

    /// Validate the configuration before anything connects
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.connection.validate()?;

        validate_identifier("CORTEX_SEARCH_DATABASE", &self.search.database)?;
        validate_identifier("CORTEX_SEARCH_SCHEMA", &self.search.schema)?;
        validate_identifier("CORTEX_SEARCH_SERVICE", &self.search.service)?;
        validate_identifier("DOCS_STAGE", &self.catalog.stage)?;
        validate_identifier("CHUNKS_TABLE", &self.catalog.chunks_table)?;

        if let Some(host) = &self.host {
            url::Url::parse(host).map_err(|e| ConfigError::Invalid {
                key: "SNOWFLAKE_HOST",
                reason: e.to_string(),
            })?;
        }
        if self.listen_addr.parse::<std::net::SocketAddr>().is_err() {
            return Err(ConfigError::Invalid {
                key: "LISTEN_ADDR",
                reason: format!("'{}' is not a socket address", self.listen_addr),
            });
        }
        if self.chat.models.is_empty() {
            return Err(ConfigError::Invalid {
                key: "MODELS",
                reason: "at least one model is required".to_string(),
            });
        }
        if self.chat.slide_window == 0 {
            return Err(ConfigError::Invalid {
                key: "SLIDE_WINDOW",
                reason: "must be greater than 0".to_string(),
            });
        }
        if self.request_timeout.is_zero() {
            return Err(ConfigError::Invalid {
                key: "REQUEST_TIMEOUT_SECS",
                reason: "must be greater than 0".to_string(),
            });
        }
        if self.session_idle_timeout.is_zero() {
            return Err(ConfigError::Invalid {
                key: "SESSION_IDLE_TIMEOUT_SECS",
                reason: "must be greater than 0".to_string(),
            });
        }
        if self.max_sessions == 0 {
            return Err(ConfigError::Invalid {
                key: "MAX_SESSIONS",
                reason: "must be greater than 0".to_string(),
            });
        }
        Ok(())
    }

    pub fn default_model(&self) -> &str {
        self.chat
            .models
            .first()
            .map(String::as_str)
            .unwrap_or(DEFAULT_MODEL)
    }
}

fn identifier_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"^[A-Za-z_][A-Za-z0-9_$]*(\.[A-Za-z_][A-Za-z0-9_$]*){0,2}$")
            .expect("identifier pattern is valid")
    })
}

/// Check that a value is a plain (optionally qualified) SQL identifier
///
/// Table and stage names are interpolated into statements, so anything
/// that is not a bare identifier is refused.
pub fn validate_identifier(key: &'static str, value: &str) -> Result<(), ConfigError> {
    if identifier_pattern().is_match(value) {
        Ok(())
    } else {
        Err(ConfigError::Invalid {
            key,
            reason: format!("'{}' is not a valid identifier", value),
        })
    }
}
