use std::sync::Arc;
use std::time::Duration;

use axum::http::{HeaderValue, Method};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing_subscriber::EnvFilter;

use motbook::config::AppConfig;
use motbook::routes::build_router;
use motbook::services::api::http::HttpBookingApi;
use motbook::services::auth::AuthContext;
use motbook::state::{spawn_session_sweeper, AppState};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();

    let config = AppConfig::from_env();

    let auth = AuthContext::new();
    let api = HttpBookingApi::new(
        config.backend_url.clone(),
        Duration::from_secs(config.request_timeout_secs),
        auth.clone(),
    )?;
    tracing::info!("using booking backend at {}", config.backend_url);

    let status = auth.bootstrap(&api).await;
    tracing::info!(?status, "initial staff session status");

    let cors = match &config.cors_origin {
        Some(origin) => CorsLayer::new()
            .allow_origin(origin.parse::<HeaderValue>()?)
            .allow_methods([Method::GET, Method::POST, Method::PATCH, Method::DELETE])
            .allow_headers(Any),
        None => CorsLayer::permissive(),
    };

    let addr = format!("0.0.0.0:{}", config.port);
    let state = Arc::new(AppState::new(config, Box::new(api), auth));
    spawn_session_sweeper(state.clone());
    let app = build_router(state)
        .layer(cors)
        .layer(TraceLayer::new_for_http());

    tracing::info!("starting server on {addr}");

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
