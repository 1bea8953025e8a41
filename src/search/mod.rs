// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Document chunk search
//!
//! Key features:
//! - Fixed request shape: 5 results, chunk/relative_path/category projection
//! - Optional equality filter on category (`ALL` means none)
//! - Typed validation of the service payload, raw payload kept for display

pub mod adapter;
pub mod cortex;
pub mod provider;
pub mod types;

// Re-export commonly used types
pub use adapter::SearchAdapter;
pub use cortex::CortexSearchService;
pub use provider::ChunkSearch;
pub use types::{
    ChunkRecord, SearchError, SearchQuery, SearchResult, ALL_CATEGORIES, COLUMNS, NUM_CHUNKS,
};
