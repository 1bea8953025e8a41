// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};

use super::errors::ApiError;
use crate::chat::{SessionId, SessionStore, SharedSession};

pub const SESSION_COOKIE: &str = "cortex_chat_session";

pub fn session_id(jar: &CookieJar) -> Option<SessionId> {
    jar.get(SESSION_COOKIE)
        .and_then(|cookie| SessionId::parse(cookie.value()))
}

fn with_session(jar: CookieJar, id: SessionId) -> CookieJar {
    let cookie = Cookie::build((SESSION_COOKIE, id.to_string()))
        .path("/")
        .http_only(true)
        .same_site(SameSite::Lax);
    jar.add(cookie)
}

/// Session for the request's cookie, created on first visit
///
/// The returned jar carries a fresh cookie when a session was created.
pub async fn resolve(
    sessions: &SessionStore,
    jar: CookieJar,
) -> Result<(CookieJar, SharedSession), ApiError> {
    let (id, session, created) = sessions.get_or_create(session_id(&jar)).await?;
    let jar = if created { with_session(jar, id) } else { jar };
    Ok((jar, session))
}
