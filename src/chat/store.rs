// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;
use tokio::sync::{Mutex, RwLock};
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use super::session::{ChatSession, SessionConfig, SessionId};

pub type SharedSession = Arc<Mutex<ChatSession>>;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Maximum number of sessions reached ({max})")]
    Full { max: usize },
}

#[derive(Debug, Clone)]
pub struct SessionStoreConfig {
    pub max_sessions: usize,
    pub idle_timeout: Duration,
    /// Options new sessions start with
    pub defaults: SessionConfig,
}

/// Live chat sessions keyed by cookie id
///
/// Each session sits behind its own mutex so one slow turn never blocks
/// other browsers.
pub struct SessionStore {
    config: SessionStoreConfig,
    sessions: RwLock<HashMap<SessionId, SharedSession>>,
}

impl SessionStore {
    pub fn new(config: SessionStoreConfig) -> Self {
        Self {
            config,
            sessions: RwLock::new(HashMap::new()),
        }
    }

    pub fn defaults(&self) -> &SessionConfig {
        &self.config.defaults
    }

    /// Look up a session, or create one when the id is missing or unknown
    ///
    /// At capacity the least recently active session without a turn in
    /// flight makes room. Returns the id actually in use and whether it
    /// was just created.
    pub async fn get_or_create(
        &self,
        id: Option<SessionId>,
    ) -> Result<(SessionId, SharedSession, bool), StoreError> {
        if let Some(id) = id {
            if let Some(session) = self.get(id).await {
                return Ok((id, session, false));
            }
        }

        let mut sessions = self.sessions.write().await;
        if sessions.len() >= self.config.max_sessions {
            let oldest = least_recently_active(&sessions).ok_or(StoreError::Full {
                max: self.config.max_sessions,
            })?;
            sessions.remove(&oldest);
            warn!(
                "Session limit {} reached, dropped least recently active session {}",
                self.config.max_sessions, oldest
            );
        }

        let id = SessionId::generate();
        let session = Arc::new(Mutex::new(ChatSession::new(id, self.config.defaults.clone())));
        sessions.insert(id, session.clone());
        debug!("Created session {} ({} live)", id, sessions.len());
        Ok((id, session, true))
    }

    pub async fn get(&self, id: SessionId) -> Option<SharedSession> {
        let sessions = self.sessions.read().await;
        sessions.get(&id).cloned()
    }

    pub async fn len(&self) -> usize {
        self.sessions.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }

    /// Drop sessions idle for longer than the configured timeout
    ///
    /// Sessions with a turn in flight are locked and therefore skipped.
    pub async fn evict_idle(&self) -> usize {
        let mut sessions = self.sessions.write().await;
        let initial_count = sessions.len();
        let timeout = self.config.idle_timeout;

        sessions.retain(|_, session| match session.try_lock() {
            Ok(session) => session.idle_for() < timeout,
            Err(_) => true,
        });

        initial_count - sessions.len()
    }

    /// Run `evict_idle` every `interval` until the task is aborted
    pub fn spawn_eviction(store: Arc<Self>, interval: Duration) -> JoinHandle<()> {
        tokio::spawn(async move {
            let mut ticker = tokio::time::interval(interval);
            loop {
                ticker.tick().await;
                let evicted = store.evict_idle().await;
                if evicted > 0 {
                    info!("Evicted {} idle sessions", evicted);
                }
            }
        })
    }
}

/// Longest-idle session that is not locked by a turn in flight
fn least_recently_active(sessions: &HashMap<SessionId, SharedSession>) -> Option<SessionId> {
    sessions
        .iter()
        .filter_map(|(id, session)| session.try_lock().ok().map(|s| (*id, s.idle_for())))
        .max_by_key(|(_, idle)| *idle)
        .map(|(id, _)| id)
}
