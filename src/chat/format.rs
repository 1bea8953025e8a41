// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Display text for assistant turns

use std::fmt::Display;

use crate::search::SearchResult;

/// Retrieved results as a fenced, 2-space indented JSON block
pub fn format_results(result: &SearchResult) -> String {
    let pretty = serde_json::to_string_pretty(&result.raw).unwrap_or_else(|_| result.raw.to_string());
    format!("```json\n{}\n```", pretty)
}

/// Inline error text for a failed turn
pub fn format_error(error: &impl Display) -> String {
    format!("Error processing query: {}", error)
}
