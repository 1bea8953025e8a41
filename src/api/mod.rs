// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
pub mod errors;
pub mod handlers;
pub mod http_server;
pub mod routes;
pub mod session_cookie;
pub mod ui;

pub use errors::{ApiError, ErrorResponse};
pub use handlers::{
    CategoriesResponse, ChatRequest, ChatResponse, DocumentsResponse, HealthResponse,
    ResetResponse, SearchApiRequest, SessionConfigUpdate,
};
pub use http_server::{create_app, start_server, AppState};
pub use session_cookie::SESSION_COOKIE;
pub use ui::PageRenderer;
