// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Snowflake connection bundle
//!
//! The same six keys can come from two places:
//! - environment variables (optionally seeded from a local `.env` file)
//! - a secrets TOML file with identical key names

use serde::Deserialize;
use std::env;
use std::fmt;
use std::path::Path;

use super::ConfigError;

pub const ACCOUNT_KEY: &str = "SNOWFLAKE_ACCOUNT";
pub const USER_KEY: &str = "SNOWFLAKE_USER";
pub const PASSWORD_KEY: &str = "SNOWFLAKE_PASSWORD";
pub const WAREHOUSE_KEY: &str = "SNOWFLAKE_WAREHOUSE";
pub const DATABASE_KEY: &str = "SNOWFLAKE_DATABASE";
pub const SCHEMA_KEY: &str = "SNOWFLAKE_SCHEMA";

/// Credentials and default context for the remote platform
#[derive(Clone, Deserialize, PartialEq)]
pub struct ConnectionConfig {
    #[serde(rename = "SNOWFLAKE_ACCOUNT")]
    pub account: String,
    #[serde(rename = "SNOWFLAKE_USER")]
    pub user: String,
    /// Sent as a programmatic access token
    #[serde(rename = "SNOWFLAKE_PASSWORD")]
    pub password: String,
    #[serde(rename = "SNOWFLAKE_WAREHOUSE")]
    pub warehouse: String,
    #[serde(rename = "SNOWFLAKE_DATABASE")]
    pub database: String,
    #[serde(rename = "SNOWFLAKE_SCHEMA")]
    pub schema: String,
}

impl ConnectionConfig {
    /// Load the bundle from process environment variables
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Load the bundle through an arbitrary key lookup
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &'static str| -> Result<String, ConfigError> {
            lookup(key)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
                .ok_or(ConfigError::Missing { key })
        };

        Ok(Self {
            account: get(ACCOUNT_KEY)?,
            user: get(USER_KEY)?,
            password: get(PASSWORD_KEY)?,
            warehouse: get(WAREHOUSE_KEY)?,
            database: get(DATABASE_KEY)?,
            schema: get(SCHEMA_KEY)?,
        })
    }

    /// Load the bundle from a secrets TOML file
    ///
    /// Unknown keys in the file are ignored so one secrets file can be
    /// shared with other tools.
    pub fn from_secrets_file(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path).map_err(|source| ConfigError::SecretsFile {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_secrets_str(&contents)
    }

    pub fn from_secrets_str(contents: &str) -> Result<Self, ConfigError> {
        let config: ConnectionConfig = toml::from_str(contents)?;
        config.validate()?;
        Ok(config)
    }

    /// Reject blank values
    pub fn validate(&self) -> Result<(), ConfigError> {
        let fields = [
            (ACCOUNT_KEY, &self.account),
            (USER_KEY, &self.user),
            (PASSWORD_KEY, &self.password),
            (WAREHOUSE_KEY, &self.warehouse),
            (DATABASE_KEY, &self.database),
            (SCHEMA_KEY, &self.schema),
        ];
        for (key, value) in fields {
            if value.trim().is_empty() {
                return Err(ConfigError::Missing { key });
            }
        }
        Ok(())
    }
}

impl fmt::Debug for ConnectionConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ConnectionConfig")
            .field("account", &self.account)
            .field("user", &self.user)
            .field("password", &"<redacted>")
            .field("warehouse", &self.warehouse)
            .field("database", &self.database)
            .field("schema", &self.schema)
            .finish()
    }
}
