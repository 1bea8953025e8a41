// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! HTML form endpoints; every POST redirects back to the page

use axum::{
    extract::State,
    response::{Html, IntoResponse, Redirect, Response},
    Form,
};
use axum_extra::extract::cookie::CookieJar;
use serde::Deserialize;
use tracing::{debug, error, warn};

use super::PageData;
use crate::api::errors::ApiError;
use crate::api::http_server::AppState;
use crate::api::session_cookie;

#[derive(Debug, Deserialize)]
pub struct AskForm {
    #[serde(default)]
    pub question: String,
}

/// Checkboxes are only submitted when ticked
#[derive(Debug, Deserialize)]
pub struct SettingsForm {
    pub model: String,
    pub category: String,
    #[serde(default)]
    pub use_chat_history: Option<String>,
    #[serde(default)]
    pub debug: Option<String>,
}

/// GET /
pub async fn index_handler(
    State(state): State<AppState>,
    jar: CookieJar,
) -> Result<(CookieJar, Html<String>), ApiError> {
    let (jar, session) = session_cookie::resolve(&state.sessions, jar).await?;
    let catalog = state.orchestrator.catalog_view().await;
    let models = &state.orchestrator.config().models;

    let rendered = match session.try_lock() {
        Ok(session) => state.renderer.render(PageData {
            models,
            catalog,
            session: Some((session.snapshot(), session.history().turns())),
        }),
        Err(_) => state.renderer.render(PageData {
            models,
            catalog,
            session: None,
        }),
    };

    let page = rendered.map_err(|e| {
        error!("Page render failed: {}", e);
        ApiError::InternalError(e.to_string())
    })?;
    Ok((jar, Html(page)))
}

/// POST /ask
pub async fn ask_handler(
    State(state): State<AppState>,
    jar: CookieJar,
    Form(form): Form<AskForm>,
) -> Result<Response, ApiError> {
    let (jar, session) = session_cookie::resolve(&state.sessions, jar).await?;
    if form.question.trim().is_empty() {
        return Ok((jar, Redirect::to("/")).into_response());
    }

    match session.try_lock() {
        Ok(mut session) => {
            state.orchestrator.ask(&mut session, &form.question).await;
        }
        Err(_) => warn!("Ignoring question for a busy session"),
    }
    Ok((jar, Redirect::to("/")).into_response())
}

/// POST /settings
pub async fn settings_handler(
    State(state): State<AppState>,
    jar: CookieJar,
    Form(form): Form<SettingsForm>,
) -> Result<Response, ApiError> {
    let (jar, session) = session_cookie::resolve(&state.sessions, jar).await?;
    let mut session = session.try_lock().map_err(|_| ApiError::SessionBusy)?;

    let models = &state.orchestrator.config().models;
    if !models.contains(&form.model) {
        return Err(ApiError::ModelNotFound {
            model: form.model,
            available_models: models.clone(),
        });
    }

    let mut config = session.config().clone();
    config.model_name = form.model;
    config.category = form.category;
    config.use_chat_history = form.use_chat_history.is_some();
    config.debug = form.debug.is_some();
    debug!("Session {} options: {:?}", session.id(), config);
    session.set_config(config);

    Ok((jar, Redirect::to("/")).into_response())
}

/// POST /reset - the "Start Over" button
pub async fn reset_handler(
    State(state): State<AppState>,
    jar: CookieJar,
) -> Result<Response, ApiError> {
    let (jar, session) = session_cookie::resolve(&state.sessions, jar).await?;
    let mut session = session.try_lock().map_err(|_| ApiError::SessionBusy)?;
    state.orchestrator.reset(&mut session);
    Ok((jar, Redirect::to("/")).into_response())
}
