// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! SQL API wire types
//!
//! Only the single-partition result shape is handled; every statement this
//! service issues returns a handful of rows.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use super::errors::PlatformError;

/// Body of `POST /api/v2/statements`
#[derive(Debug, Serialize)]
pub struct StatementRequest<'a> {
    pub statement: &'a str,
    /// Server-side timeout in seconds
    pub timeout: u64,
    pub warehouse: &'a str,
    pub database: &'a str,
    pub schema: &'a str,
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub bindings: BTreeMap<String, Binding>,
}

/// A positional `?` parameter, always bound as text
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct Binding {
    #[serde(rename = "type")]
    pub kind: &'static str,
    pub value: String,
}

impl Binding {
    pub fn text(value: impl Into<String>) -> Self {
        Self {
            kind: "TEXT",
            value: value.into(),
        }
    }
}

/// Number bindings from 1 the way the SQL API expects
pub fn positional_bindings(values: &[&str]) -> BTreeMap<String, Binding> {
    values
        .iter()
        .enumerate()
        .map(|(i, v)| ((i + 1).to_string(), Binding::text(*v)))
        .collect()
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct StatementResponse {
    #[serde(default)]
    pub result_set_meta_data: Option<ResultSetMetaData>,
    #[serde(default)]
    pub data: Option<Vec<Vec<Option<String>>>>,
    #[serde(default)]
    pub statement_handle: Option<String>,
    #[serde(default)]
    pub code: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct ResultSetMetaData {
    #[serde(default)]
    pub row_type: Vec<ColumnType>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ColumnType {
    pub name: String,
}

/// Rows returned by a finished statement
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StatementResult {
    pub columns: Vec<String>,
    pub rows: Vec<Vec<Option<String>>>,
}

impl StatementResult {
    pub(crate) fn from_response(response: StatementResponse) -> Result<Self, PlatformError> {
        let meta = response
            .result_set_meta_data
            .ok_or_else(|| PlatformError::Decode("missing resultSetMetaData".to_string()))?;
        let columns: Vec<String> = meta.row_type.into_iter().map(|c| c.name).collect();
        let rows = response.data.unwrap_or_default();

        if let Some(bad) = rows.iter().find(|r| r.len() != columns.len()) {
            return Err(PlatformError::Decode(format!(
                "row has {} values but {} columns were declared",
                bad.len(),
                columns.len()
            )));
        }

        Ok(Self { columns, rows })
    }

    /// Non-null values of one column, matched case-insensitively
    pub fn column(&self, name: &str) -> Option<Vec<String>> {
        let index = self
            .columns
            .iter()
            .position(|c| c.eq_ignore_ascii_case(name))?;
        Some(
            self.rows
                .iter()
                .filter_map(|row| row.get(index).cloned().flatten())
                .collect(),
        )
    }

    /// First cell of the first row
    pub fn scalar(&self) -> Option<&str> {
        self.rows.first()?.first()?.as_deref()
    }

    pub fn row_count(&self) -> usize {
        self.rows.len()
    }
}
