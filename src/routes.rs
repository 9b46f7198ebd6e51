use std::sync::Arc;

use axum::routing::{get, patch, post};
use axum::Router;

use crate::handlers;
use crate::state::AppState;

pub fn build_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/health", get(handlers::health::health))
        .route("/api/form/fields", get(handlers::booking::form_fields))
        .route("/api/sessions", post(handlers::booking::create_session))
        .route(
            "/api/sessions/:id",
            get(handlers::booking::get_session).delete(handlers::booking::close_session),
        )
        .route(
            "/api/sessions/:id/month",
            post(handlers::booking::change_month),
        )
        .route("/api/sessions/:id/date", post(handlers::booking::select_date))
        .route("/api/sessions/:id/slot", post(handlers::booking::select_slot))
        .route(
            "/api/sessions/:id/draft",
            patch(handlers::booking::update_draft),
        )
        .route("/api/sessions/:id/submit", post(handlers::booking::submit))
        .route("/api/sessions/:id/dismiss", post(handlers::booking::dismiss))
        .route("/api/events", get(handlers::events::events_stream))
        .route("/api/auth/login", post(handlers::auth::login))
        .route("/api/auth/logout", post(handlers::auth::logout))
        .route("/api/auth/status", get(handlers::auth::status))
        .route("/api/auth/forgot", post(handlers::auth::forgot_password))
        .route(
            "/api/auth/reset/:token",
            get(handlers::auth::verify_reset_token).post(handlers::auth::reset_password),
        )
        .route("/api/auth/account", patch(handlers::auth::update_account))
        .route("/api/admin/calendar", get(handlers::admin::calendar))
        .route("/api/admin/slots", get(handlers::admin::get_slots))
        .route("/api/admin/slots/block", post(handlers::admin::block_slots))
        .route(
            "/api/admin/slots/unblock",
            post(handlers::admin::unblock_slots),
        )
        .route(
            "/api/admin/bookings",
            get(handlers::admin::list_bookings).post(handlers::admin::create_booking),
        )
        .route(
            "/api/admin/bookings/search",
            get(handlers::admin::search_bookings),
        )
        .route(
            "/api/admin/bookings/:id",
            get(handlers::admin::get_booking)
                .patch(handlers::admin::update_booking)
                .delete(handlers::admin::delete_booking),
        )
        .route("/api/admin/refunds", post(handlers::admin::refund))
        .with_state(state)
}
