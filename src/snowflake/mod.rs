// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Snowflake platform access
//!
//! Everything heavy (search, completion, storage) runs on the platform;
//! this module only speaks its REST APIs:
//! - SQL API statements for catalog queries and completions
//! - The Cortex Search query endpoint (see [`crate::search::cortex`])

pub mod client;
pub mod errors;
pub mod sql;

pub use client::SnowflakeClient;
pub use errors::PlatformError;
pub use sql::{Binding, StatementResult};
