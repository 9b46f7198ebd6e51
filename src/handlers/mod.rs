pub mod admin;
pub mod auth;
pub mod booking;
pub mod events;
pub mod health;

use crate::errors::AppError;
use crate::state::AppState;

/// Failures that came from the server side are also pushed to the
/// notification stream.
pub(crate) fn surfaced(state: &AppState, err: AppError) -> AppError {
    if err.is_server_error() {
        state.notifier.error(&err.to_string(), None);
    }
    err
}
