use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use tokio::task::JoinHandle;
use tokio::time::Instant;

use crate::config::AppConfig;
use crate::errors::AppError;
use crate::services::api::BookingApi;
use crate::services::auth::AuthContext;
use crate::services::notify::Notifier;
use crate::services::session::SharedSession;
use crate::services::slots::SlotCache;
use crate::services::timer::Debouncer;

struct SessionEntry {
    session: SharedSession,
    last_seen: Instant,
}

pub struct AppState {
    pub config: AppConfig,
    pub api: Box<dyn BookingApi>,
    pub auth: AuthContext,
    pub notifier: Notifier,
    sessions: Mutex<HashMap<String, SessionEntry>>,
    /// The staff slot editor's view of one date.
    pub admin_slots: tokio::sync::Mutex<SlotCache>,
    pub search: Debouncer,
}

impl AppState {
    pub fn new(config: AppConfig, api: Box<dyn BookingApi>, auth: AuthContext) -> Self {
        let search = Debouncer::new(Duration::from_millis(config.search_debounce_ms));
        Self {
            config,
            api,
            auth,
            notifier: Notifier::new(256),
            sessions: Mutex::new(HashMap::new()),
            admin_slots: tokio::sync::Mutex::new(SlotCache::new()),
            search,
        }
    }

    /// Looks a session up and marks it as seen.
    pub fn session(&self, id: &str) -> Result<SharedSession, AppError> {
        let mut sessions = self.sessions.lock().unwrap_or_else(|e| e.into_inner());
        let entry = sessions
            .get_mut(id)
            .ok_or_else(|| AppError::NotFound(format!("session {id}")))?;
        entry.last_seen = Instant::now();
        Ok(Arc::clone(&entry.session))
    }

    pub fn insert_session(&self, id: String, session: SharedSession) {
        self.sessions
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .insert(
                id,
                SessionEntry {
                    session,
                    last_seen: Instant::now(),
                },
            );
    }

    pub fn remove_session(&self, id: &str) -> Option<SharedSession> {
        self.sessions
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .remove(id)
            .map(|entry| entry.session)
    }

    pub fn session_count(&self) -> usize {
        self.sessions.lock().unwrap_or_else(|e| e.into_inner()).len()
    }

    /// Drops sessions nobody has touched for `max_idle`. Returns how many
    /// went away.
    pub fn sweep_idle(&self, max_idle: Duration) -> usize {
        let now = Instant::now();
        let mut sessions = self.sessions.lock().unwrap_or_else(|e| e.into_inner());
        let before = sessions.len();
        sessions.retain(|_, entry| now.duration_since(entry.last_seen) < max_idle);
        before - sessions.len()
    }

    pub fn auto_dismiss(&self) -> Duration {
        Duration::from_secs(self.config.auto_dismiss_secs)
    }

    pub fn session_idle(&self) -> Duration {
        Duration::from_secs(self.config.session_idle_secs)
    }
}

/// Background task that evicts idle booking sessions once a minute.
pub fn spawn_session_sweeper(state: Arc<AppState>) -> JoinHandle<()> {
    tokio::spawn(async move {
        let mut tick = tokio::time::interval(Duration::from_secs(60));
        loop {
            tick.tick().await;
            let removed = state.sweep_idle(state.session_idle());
            if removed > 0 {
                tracing::info!(removed, remaining = state.session_count(), "evicted idle sessions");
            }
        }
    })
}
