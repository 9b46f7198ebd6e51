use std::sync::{Arc, RwLock};

use serde::Serialize;

use crate::errors::AppError;
use crate::services::api::BookingApi;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum AuthStatus {
    Unknown,
    Authenticated,
    Unauthenticated,
}

/// App-wide staff session status. Built once in `main`; clones share state.
#[derive(Debug, Clone)]
pub struct AuthContext {
    status: Arc<RwLock<AuthStatus>>,
}

impl Default for AuthContext {
    fn default() -> Self {
        Self::new()
    }
}

impl AuthContext {
    pub fn new() -> Self {
        Self {
            status: Arc::new(RwLock::new(AuthStatus::Unknown)),
        }
    }

    pub fn status(&self) -> AuthStatus {
        self.status
            .read()
            .map(|s| *s)
            .unwrap_or(AuthStatus::Unauthenticated)
    }

    pub fn set_status(&self, status: AuthStatus) {
        if let Ok(mut s) = self.status.write() {
            if *s != status {
                tracing::info!(from = ?*s, to = ?status, "auth status changed");
            }
            *s = status;
        }
    }

    /// Asks the backend whether the session is live. Any failure here means
    /// "unauthenticated"; this is the one place errors are not surfaced.
    pub async fn bootstrap(&self, api: &dyn BookingApi) -> AuthStatus {
        let status = match api.check_auth().await {
            Ok(true) => AuthStatus::Authenticated,
            Ok(false) => AuthStatus::Unauthenticated,
            Err(e) => {
                tracing::debug!(error = %e, "auth check failed, treating as signed out");
                AuthStatus::Unauthenticated
            }
        };
        self.set_status(status);
        status
    }

    /// Route guard for staff-only handlers.
    pub async fn require(&self, api: &dyn BookingApi) -> Result<(), AppError> {
        let status = match self.status() {
            AuthStatus::Unknown => self.bootstrap(api).await,
            s => s,
        };
        match status {
            AuthStatus::Authenticated => Ok(()),
            _ => Err(AppError::Auth("Unauthorized request".to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::api::mock::MockApi;

    #[test]
    fn test_starts_unknown() {
        assert_eq!(AuthContext::new().status(), AuthStatus::Unknown);
    }

    #[tokio::test]
    async fn test_bootstrap_reflects_backend() {
        let api = MockApi::new();
        let auth = AuthContext::new();
        assert_eq!(auth.bootstrap(&api).await, AuthStatus::Unauthenticated);

        *api.authenticated.lock().unwrap() = true;
        assert_eq!(auth.bootstrap(&api).await, AuthStatus::Authenticated);
    }

    #[tokio::test]
    async fn test_require_bootstraps_only_when_unknown() {
        let api = MockApi::new();
        *api.authenticated.lock().unwrap() = true;
        let auth = AuthContext::new();
        auth.require(&api).await.unwrap();
        auth.require(&api).await.unwrap();
        let checks = api.calls().iter().filter(|c| *c == "check_auth").count();
        assert_eq!(checks, 1);
    }

    #[tokio::test]
    async fn test_require_rejects_signed_out() {
        let api = MockApi::new();
        let auth = AuthContext::new();
        auth.set_status(AuthStatus::Unauthenticated);
        let err = auth.require(&api).await.unwrap_err();
        assert!(matches!(err, AppError::Auth(_)));
    }

    #[test]
    fn test_clones_share_status() {
        let auth = AuthContext::new();
        let other = auth.clone();
        other.set_status(AuthStatus::Authenticated);
        assert_eq!(auth.status(), AuthStatus::Authenticated);
    }
}
