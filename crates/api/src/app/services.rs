use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::{Duration, Instant};

use axum::http::StatusCode;
use axum::response::Response;

use stockroom_core::SessionId;
use stockroom_infra::{AppConfig, DocumentStore, InventorySession};

use crate::app::errors;

/// Document store shared by every session (one JSON file in production).
pub type SharedStore = Arc<dyn DocumentStore>;

pub type Session = InventorySession<SharedStore>;

/// How many sessions the registry keeps, and for how long.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct SessionLimits {
    /// Upper bound on live sessions; the least recently used one is dropped
    /// to make room.
    pub max_sessions: usize,
    /// Sessions untouched for longer than this are dropped.
    pub idle_ttl: Duration,
}

impl SessionLimits {
    pub fn from_config(config: &AppConfig) -> Self {
        Self {
            max_sessions: config.max_sessions,
            idle_ttl: config.session_idle_ttl,
        }
    }
}

impl Default for SessionLimits {
    fn default() -> Self {
        Self::from_config(&AppConfig::default())
    }
}

struct SessionEntry {
    session: Arc<Mutex<Session>>,
    last_used: Instant,
}

/// Session registry.
///
/// Each client gets its own `InventorySession`, loaded from the shared store on
/// first use and never shared with another client. Saves from different
/// sessions overwrite each other (last writer wins). The registry is bounded
/// by [`SessionLimits`]; an evicted client simply starts over from the store.
pub struct AppServices {
    store: SharedStore,
    limits: SessionLimits,
    sessions: Mutex<HashMap<SessionId, SessionEntry>>,
}

impl AppServices {
    pub fn new(store: SharedStore, limits: SessionLimits) -> Self {
        Self {
            store,
            limits,
            sessions: Mutex::new(HashMap::new()),
        }
    }

    /// Run `f` against the caller's session, opening it if needed.
    ///
    /// `f` runs on the blocking pool with the session lock held, so each
    /// action (mutate, then save) completes before the next one on that
    /// session starts.
    pub async fn with_session<R, F>(&self, id: SessionId, f: F) -> Result<R, Response>
    where
        F: FnOnce(&mut Session) -> R + Send + 'static,
        R: Send + 'static,
    {
        let session = self.session(id).await?;
        tokio::task::spawn_blocking(move || {
            let mut guard = lock(&session);
            f(&mut guard)
        })
        .await
        .map_err(task_failed)
    }

    async fn session(&self, id: SessionId) -> Result<Arc<Mutex<Session>>, Response> {
        if let Some(existing) = self.touch(id) {
            return Ok(existing);
        }

        // Loading reads the file; keep it off the registry lock.
        let store = self.store.clone();
        let opened = tokio::task::spawn_blocking(move || InventorySession::open(store))
            .await
            .map_err(task_failed)?;
        Ok(self.register(id, opened))
    }

    /// Drop idle sessions, then mark `id` as used if it is still live.
    fn touch(&self, id: SessionId) -> Option<Arc<Mutex<Session>>> {
        let now = Instant::now();
        let mut sessions = lock(&self.sessions);

        let before = sessions.len();
        sessions.retain(|_, entry| now.duration_since(entry.last_used) <= self.limits.idle_ttl);
        if sessions.len() < before {
            tracing::debug!(expired = before - sessions.len(), "idle sessions dropped");
        }

        sessions.get_mut(&id).map(|entry| {
            entry.last_used = now;
            entry.session.clone()
        })
    }

    fn register(&self, id: SessionId, opened: Session) -> Arc<Mutex<Session>> {
        let now = Instant::now();
        let mut sessions = lock(&self.sessions);

        // Another request for the same id may have finished opening first.
        if let Some(entry) = sessions.get_mut(&id) {
            entry.last_used = now;
            return entry.session.clone();
        }

        while sessions.len() >= self.limits.max_sessions.max(1) {
            let Some(oldest) = sessions
                .iter()
                .min_by_key(|(_, entry)| entry.last_used)
                .map(|(key, _)| *key)
            else {
                break;
            };
            sessions.remove(&oldest);
            tracing::debug!("session {oldest} evicted (registry full)");
        }

        tracing::info!(live = sessions.len() + 1, "opening inventory session {id}");
        let session = Arc::new(Mutex::new(opened));
        sessions.insert(
            id,
            SessionEntry {
                session: session.clone(),
                last_used: now,
            },
        );
        session
    }
}

fn task_failed(err: tokio::task::JoinError) -> Response {
    tracing::error!("session task failed: {err}");
    errors::json_error(
        StatusCode::INTERNAL_SERVER_ERROR,
        "session_unavailable",
        "session task failed",
    )
}

/// Poisoned locks are recovered: domain operations never leave a document
/// half-mutated.
fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}
