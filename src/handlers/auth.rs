use std::sync::Arc;

use axum::extract::{Path, State};
use axum::Json;
use serde::Deserialize;
use serde_json::{json, Value};

use crate::errors::AppError;
use crate::handlers::surfaced;
use crate::models::{AccountUpdate, Credentials, PasswordReset};
use crate::services::auth::AuthStatus;
use crate::services::validation;
use crate::state::AppState;

// POST /api/auth/login
pub async fn login(
    State(state): State<Arc<AppState>>,
    Json(credentials): Json<Credentials>,
) -> Result<Json<Value>, AppError> {
    if credentials.email.trim().is_empty() || credentials.password.is_empty() {
        return Err(AppError::BadRequest(
            "Email and password are required".to_string(),
        ));
    }
    state.api.login(&credentials).await.map_err(|e| {
        tracing::info!(error = %e, "login rejected");
        surfaced(&state, e.into())
    })?;
    state.auth.set_status(AuthStatus::Authenticated);
    Ok(Json(json!({ "status": AuthStatus::Authenticated })))
}

// POST /api/auth/logout
pub async fn logout(State(state): State<Arc<AppState>>) -> Json<Value> {
    if let Err(e) = state.api.logout().await {
        tracing::warn!(error = %e, "backend logout failed");
    }
    state.auth.set_status(AuthStatus::Unauthenticated);
    Json(json!({ "status": AuthStatus::Unauthenticated, "redirect": "/login" }))
}

// GET /api/auth/status
pub async fn status(State(state): State<Arc<AppState>>) -> Json<Value> {
    let status = state.auth.bootstrap(state.api.as_ref()).await;
    Json(json!({ "status": status }))
}

// POST /api/auth/forgot
#[derive(Deserialize)]
pub struct ForgotPassword {
    pub email: String,
}

pub async fn forgot_password(
    State(state): State<Arc<AppState>>,
    Json(req): Json<ForgotPassword>,
) -> Result<Json<Value>, AppError> {
    if !validation::is_valid_email(req.email.trim()) {
        return Err(AppError::BadRequest("Invalid email format".to_string()));
    }
    let message = state
        .api
        .forgot_password(req.email.trim())
        .await
        .map_err(|e| surfaced(&state, e.into()))?;
    Ok(Json(json!({ "message": message })))
}

// GET /api/auth/reset/:token
pub async fn verify_reset_token(
    State(state): State<Arc<AppState>>,
    Path(token): Path<String>,
) -> Result<Json<Value>, AppError> {
    state.api.verify_reset_token(&token).await?;
    Ok(Json(json!({ "valid": true })))
}

// POST /api/auth/reset/:token
pub async fn reset_password(
    State(state): State<Arc<AppState>>,
    Path(token): Path<String>,
    Json(reset): Json<PasswordReset>,
) -> Result<Json<Value>, AppError> {
    validation::check_password_reset(&reset)?;
    let message = state
        .api
        .reset_password(&token, &reset)
        .await
        .map_err(|e| surfaced(&state, e.into()))?;
    state.notifier.success(&message, None);
    Ok(Json(json!({ "message": message, "redirect": "/login" })))
}

// PATCH /api/auth/account
pub async fn update_account(
    State(state): State<Arc<AppState>>,
    Json(update): Json<AccountUpdate>,
) -> Result<Json<Value>, AppError> {
    state.auth.require(state.api.as_ref()).await?;
    let message = state
        .api
        .update_account(&update)
        .await
        .map_err(|e| surfaced(&state, e.into()))?;
    state.notifier.success(&message, None);
    Ok(Json(json!({ "message": message })))
}
