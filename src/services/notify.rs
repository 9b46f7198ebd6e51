use tokio::sync::broadcast;

use crate::models::{Notification, NotificationLevel};

/// The one user-visible message channel. SSE subscribers render it; with no
/// subscribers messages are only logged.
#[derive(Clone, Debug)]
pub struct Notifier {
    tx: broadcast::Sender<Notification>,
}

impl Notifier {
    pub fn new(capacity: usize) -> Self {
        let (tx, _) = broadcast::channel(capacity);
        Self { tx }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<Notification> {
        self.tx.subscribe()
    }

    pub fn publish(&self, level: NotificationLevel, message: &str, session_id: Option<&str>) {
        match level {
            NotificationLevel::Error => tracing::warn!(session = ?session_id, message, "notify"),
            _ => tracing::debug!(session = ?session_id, ?level, message, "notify"),
        }
        let event = Notification {
            level,
            message: message.to_string(),
            session_id: session_id.map(str::to_string),
            created_at: chrono::Utc::now().format("%Y-%m-%d %H:%M:%S").to_string(),
        };
        let _ = self.tx.send(event);
    }

    pub fn success(&self, message: &str, session_id: Option<&str>) {
        self.publish(NotificationLevel::Success, message, session_id);
    }

    pub fn warning(&self, message: &str, session_id: Option<&str>) {
        self.publish(NotificationLevel::Warning, message, session_id);
    }

    pub fn error(&self, message: &str, session_id: Option<&str>) {
        self.publish(NotificationLevel::Error, message, session_id);
    }
}
