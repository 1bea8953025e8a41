// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! JSON endpoints

use axum::{extract::State, Json};
use axum_extra::extract::cookie::CookieJar;
use serde_json::Value;
use tracing::{debug, info, warn};

use super::errors::ApiError;
use super::handlers::{
    CategoriesResponse, ChatRequest, ChatResponse, DocumentsResponse, HealthResponse,
    ResetResponse, SearchApiRequest, SessionConfigUpdate,
};
use super::http_server::AppState;
use super::session_cookie;
use crate::chat::SessionSnapshot;
use crate::version::{FEATURES, VERSION_NUMBER};

/// GET /health
pub async fn health_handler(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy".to_string(),
        version: VERSION_NUMBER.to_string(),
        active_sessions: state.sessions.len().await,
        features: FEATURES.iter().map(|f| f.to_string()).collect(),
    })
}

/// GET /v1/categories - `ALL` followed by the indexed categories
pub async fn categories_handler(
    State(state): State<AppState>,
) -> Result<Json<CategoriesResponse>, ApiError> {
    let categories = state.orchestrator.categories().await.map_err(|e| {
        warn!("{}", e);
        ApiError::from(e)
    })?;
    Ok(Json(CategoriesResponse { categories }))
}

/// GET /v1/documents - files in the document stage
pub async fn documents_handler(
    State(state): State<AppState>,
) -> Result<Json<DocumentsResponse>, ApiError> {
    let documents = state.orchestrator.documents().await.map_err(|e| {
        warn!("{}", e);
        ApiError::from(e)
    })?;
    Ok(Json(DocumentsResponse { documents }))
}

/// POST /v1/search - raw search payload for one query
///
/// # Errors
/// - 400 Bad Request: empty or overlong query
/// - 429 Too Many Requests: search service rate limit
/// - 502 Bad Gateway: the service failed or returned an unexpected payload
/// - 504 Gateway Timeout: the service did not answer in time
pub async fn search_handler(
    State(state): State<AppState>,
    Json(request): Json<SearchApiRequest>,
) -> Result<Json<Value>, ApiError> {
    debug!("Search request: {:?}", request.query);
    let result = state
        .orchestrator
        .search(&request.query, request.category.as_deref())
        .await?;
    Ok(Json(result.raw))
}

/// POST /v1/chat - ask one question in the caller's session
///
/// Failures during the turn are reported in the body with `isError`;
/// only a busy session or an invalid request produce an error status.
pub async fn chat_handler(
    State(state): State<AppState>,
    jar: CookieJar,
    Json(request): Json<ChatRequest>,
) -> Result<(CookieJar, Json<ChatResponse>), ApiError> {
    let question = request.validate()?;
    let (jar, session) = session_cookie::resolve(&state.sessions, jar).await?;
    let mut session = session.try_lock().map_err(|_| ApiError::SessionBusy)?;

    let outcome = state.orchestrator.ask(&mut session, question).await;
    info!(
        "Session {} answered (error: {}), {} turns",
        session.id(),
        outcome.is_error,
        session.history().len()
    );

    let response = ChatResponse {
        answer: outcome.answer,
        is_error: outcome.is_error,
        history: session.history().clone(),
        related_documents: session.related_documents().to_vec(),
    };
    Ok((jar, Json(response)))
}

/// POST /v1/reset - clear the transcript, keep the options
pub async fn reset_handler(
    State(state): State<AppState>,
    jar: CookieJar,
) -> Result<(CookieJar, Json<ResetResponse>), ApiError> {
    let (jar, session) = session_cookie::resolve(&state.sessions, jar).await?;
    let mut session = session.try_lock().map_err(|_| ApiError::SessionBusy)?;
    state.orchestrator.reset(&mut session);
    Ok((
        jar,
        Json(ResetResponse {
            history_length: session.history().len(),
        }),
    ))
}

/// GET /v1/session - session-state inspector
pub async fn session_handler(
    State(state): State<AppState>,
    jar: CookieJar,
) -> Result<(CookieJar, Json<SessionSnapshot>), ApiError> {
    let (jar, session) = session_cookie::resolve(&state.sessions, jar).await?;
    let session = session.try_lock().map_err(|_| ApiError::SessionBusy)?;
    Ok((jar, Json(session.snapshot())))
}

/// PUT /v1/session/config - change model, category or flags
pub async fn session_config_handler(
    State(state): State<AppState>,
    jar: CookieJar,
    Json(update): Json<SessionConfigUpdate>,
) -> Result<(CookieJar, Json<SessionSnapshot>), ApiError> {
    let (jar, session) = session_cookie::resolve(&state.sessions, jar).await?;
    let mut session = session.try_lock().map_err(|_| ApiError::SessionBusy)?;

    let config = update.apply(session.config(), &state.orchestrator.config().models)?;
    debug!("Session {} options: {:?}", session.id(), config);
    session.set_config(config);
    Ok((jar, Json(session.snapshot())))
}
