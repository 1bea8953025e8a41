// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Errors from the Snowflake REST endpoints

use thiserror::Error;

#[derive(Debug, Error)]
pub enum PlatformError {
    /// Startup probe failed; credentials or network are wrong
    #[error("Cannot connect to Snowflake account {account}: {message}")]
    Connection { account: String, message: String },

    #[error("Invalid Snowflake endpoint: {0}")]
    InvalidEndpoint(String),

    #[error("Snowflake rejected the credentials (HTTP {status})")]
    Unauthorized { status: u16 },

    #[error("Snowflake API error: {status} - {message}")]
    Http { status: u16, message: String },

    #[error("Snowflake request timed out after {timeout_ms}ms")]
    Timeout { timeout_ms: u64 },

    #[error("Snowflake transport error: {0}")]
    Transport(String),

    /// The statement was accepted but failed
    #[error("Statement failed ({code}): {message}")]
    Statement { code: String, message: String },

    #[error("Statement {handle} still running after {timeout_ms}ms")]
    StillRunning { handle: String, timeout_ms: u64 },

    #[error("Unexpected Snowflake response: {0}")]
    Decode(String),
}

impl PlatformError {
    pub(crate) fn from_reqwest(e: reqwest::Error, timeout_ms: u64) -> Self {
        if e.is_timeout() {
            PlatformError::Timeout { timeout_ms }
        } else {
            PlatformError::Transport(e.to_string())
        }
    }
}
