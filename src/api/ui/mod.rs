// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Server-rendered chat page

pub mod pages;

use minijinja::Environment;
use pulldown_cmark::{html, Options, Parser};
use serde::Serialize;

use crate::chat::{CatalogView, ChatTurn, SessionSnapshot};
use crate::version::PRODUCT_NAME;

const INDEX_TEMPLATE: &str = "index.html";

/// Markdown to sanitized HTML
///
/// Turn content can hold arbitrary document text; output always goes
/// through ammonia.
pub fn render_markdown(text: &str) -> String {
    let parser = Parser::new_ext(text, Options::ENABLE_TABLES | Options::ENABLE_STRIKETHROUGH);
    let mut out = String::with_capacity(text.len() * 3 / 2);
    html::push_html(&mut out, parser);
    ammonia::clean(&out)
}

#[derive(Debug, Serialize)]
struct TranscriptEntry {
    role: &'static str,
    is_error: bool,
    html: String,
}

impl From<&ChatTurn> for TranscriptEntry {
    fn from(turn: &ChatTurn) -> Self {
        Self {
            role: turn.role().as_str(),
            is_error: turn.is_error(),
            html: render_markdown(turn.content()),
        }
    }
}

/// Everything the page shows for one session
pub struct PageData<'a> {
    pub models: &'a [String],
    pub catalog: CatalogView,
    /// None while a turn is in flight for the session
    pub session: Option<(SessionSnapshot, &'a [ChatTurn])>,
}

#[derive(Serialize)]
struct PageContext<'a> {
    title: &'static str,
    models: &'a [String],
    categories: Vec<String>,
    documents: Vec<String>,
    errors: Vec<String>,
    busy: bool,
    session: Option<SessionSnapshot>,
    session_json: String,
    transcript: Vec<TranscriptEntry>,
}

pub struct PageRenderer {
    env: Environment<'static>,
}

impl PageRenderer {
    pub fn new() -> Result<Self, minijinja::Error> {
        let mut env = Environment::new();
        env.add_template(INDEX_TEMPLATE, include_str!("templates/index.html"))?;
        Ok(Self { env })
    }

    pub fn render(&self, data: PageData<'_>) -> Result<String, minijinja::Error> {
        let (session, transcript) = match data.session {
            Some((snapshot, turns)) => (
                Some(snapshot),
                turns.iter().map(TranscriptEntry::from).collect(),
            ),
            None => (None, Vec::new()),
        };
        let session_json = session
            .as_ref()
            .and_then(|s| serde_json::to_string_pretty(s).ok())
            .unwrap_or_default();

        let context = PageContext {
            title: PRODUCT_NAME,
            models: data.models,
            categories: data.catalog.categories,
            documents: data.catalog.documents,
            errors: data.catalog.errors,
            busy: session.is_none(),
            session,
            session_json,
            transcript,
        };

        self.env.get_template(INDEX_TEMPLATE)?.render(context)
    }
}
