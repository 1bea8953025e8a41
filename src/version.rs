// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
// Version information for the Cortex document chat service

/// Semantic version number
pub const VERSION_NUMBER: &str = env!("CARGO_PKG_VERSION");

/// Product name shown in the page title and logs
pub const PRODUCT_NAME: &str = "Knowledge Graph Document Assistant";

/// Capabilities advertised on `/health`
pub const FEATURES: &[&str] = &[
    "cortex-search",
    "category-filter",
    "chat-history",
    "generated-answers",
    "presigned-document-links",
];

/// Get formatted version string for logging
pub fn get_version_string() -> String {
    format!("{} {}", PRODUCT_NAME, VERSION_NUMBER)
}
