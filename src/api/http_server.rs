// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
use axum::{
    routing::{get, post, put},
    Router,
};
use std::{net::SocketAddr, sync::Arc};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use super::routes;
use super::ui::{pages, PageRenderer};
use crate::chat::{ChatOrchestrator, SessionStore};

#[derive(Clone)]
pub struct AppState {
    pub orchestrator: Arc<ChatOrchestrator>,
    pub sessions: Arc<SessionStore>,
    pub renderer: Arc<PageRenderer>,
}

impl AppState {
    pub fn new(
        orchestrator: Arc<ChatOrchestrator>,
        sessions: Arc<SessionStore>,
        renderer: PageRenderer,
    ) -> Self {
        Self {
            orchestrator,
            sessions,
            renderer: Arc::new(renderer),
        }
    }
}

pub fn create_app(state: AppState) -> Router {
    Router::new()
        // Chat page
        .route("/", get(pages::index_handler))
        .route("/ask", post(pages::ask_handler))
        .route("/settings", post(pages::settings_handler))
        .route("/reset", post(pages::reset_handler))
        // Health check
        .route("/health", get(routes::health_handler))
        // Catalog
        .route("/v1/categories", get(routes::categories_handler))
        .route("/v1/documents", get(routes::documents_handler))
        // Search and chat
        .route("/v1/search", post(routes::search_handler))
        .route("/v1/chat", post(routes::chat_handler))
        .route("/v1/reset", post(routes::reset_handler))
        // Session inspector
        .route("/v1/session", get(routes::session_handler))
        .route("/v1/session/config", put(routes::session_config_handler))
        .layer(TraceLayer::new_for_http())
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .with_state(state)
}

pub async fn start_server(state: AppState, addr: SocketAddr) -> std::io::Result<()> {
    let app = create_app(state);
    let listener = tokio::net::TcpListener::bind(addr).await?;

    tracing::info!("Chat server listening on http://{}", addr);

    axum::serve(listener, app).await
}
