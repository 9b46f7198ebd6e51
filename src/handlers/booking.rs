use std::sync::Arc;

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::errors::AppError;
use crate::models::{BookingReceipt, DraftPatch, FieldDescriptor, FormMode};
use crate::services::session::{self, MonthNav, SessionView, SharedSession};
use crate::state::AppState;

fn today() -> NaiveDate {
    chrono::Local::now().date_naive()
}

/// Staff forms are only reachable with a live staff session.
async fn load(state: &AppState, id: &str) -> Result<SharedSession, AppError> {
    let session = state.session(id)?;
    let mode = {
        let mut s = session.lock().await;
        s.roll_today(today());
        s.mode()
    };
    if mode == FormMode::Admin {
        state.auth.require(state.api.as_ref()).await?;
    }
    Ok(session)
}

async fn view(session: &SharedSession) -> Result<Json<SessionView>, AppError> {
    Ok(Json(session.lock().await.view()?))
}

// GET /api/form/fields?mode=
#[derive(Deserialize)]
pub struct FieldsQuery {
    #[serde(default)]
    pub mode: FormMode,
}

pub async fn form_fields(Query(query): Query<FieldsQuery>) -> Json<&'static [FieldDescriptor]> {
    Json(query.mode.fields())
}

// POST /api/sessions
#[derive(Deserialize, Default)]
pub struct CreateSession {
    #[serde(default)]
    pub mode: FormMode,
}

pub async fn create_session(
    State(state): State<Arc<AppState>>,
    body: Option<Json<CreateSession>>,
) -> Result<(StatusCode, Json<SessionView>), AppError> {
    let req = body.map(|Json(r)| r).unwrap_or_default();
    if req.mode == FormMode::Admin {
        state.auth.require(state.api.as_ref()).await?;
    }

    let session = session::open(state.api.as_ref(), state.notifier.clone(), req.mode, today()).await;
    let snapshot = session.lock().await.view()?;
    state.insert_session(snapshot.id.clone(), session);
    Ok((StatusCode::CREATED, Json(snapshot)))
}

// GET /api/sessions/:id
pub async fn get_session(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<SessionView>, AppError> {
    let session = load(&state, &id).await?;
    view(&session).await
}

// DELETE /api/sessions/:id
pub async fn close_session(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<StatusCode, AppError> {
    let session = state
        .remove_session(&id)
        .ok_or_else(|| AppError::NotFound(format!("session {id}")))?;
    session.lock().await.close();
    tracing::debug!(session = %id, "session closed");
    Ok(StatusCode::NO_CONTENT)
}

// POST /api/sessions/:id/month
pub async fn change_month(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    Json(nav): Json<MonthNav>,
) -> Result<Json<SessionView>, AppError> {
    let session = load(&state, &id).await?;
    session::navigate(state.api.as_ref(), &session, nav).await?;
    view(&session).await
}

// POST /api/sessions/:id/date
#[derive(Deserialize)]
pub struct SelectDate {
    pub date: NaiveDate,
}

pub async fn select_date(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    Json(req): Json<SelectDate>,
) -> Result<Json<SessionView>, AppError> {
    let session = load(&state, &id).await?;
    session::select_date(state.api.as_ref(), &session, req.date).await?;
    view(&session).await
}

// POST /api/sessions/:id/slot
#[derive(Deserialize)]
pub struct SelectSlot {
    pub time: String,
}

pub async fn select_slot(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    Json(req): Json<SelectSlot>,
) -> Result<Json<SessionView>, AppError> {
    let session = load(&state, &id).await?;
    session.lock().await.select_slot(&req.time)?;
    view(&session).await
}

// PATCH /api/sessions/:id/draft
pub async fn update_draft(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    Json(patch): Json<DraftPatch>,
) -> Result<Json<SessionView>, AppError> {
    let session = load(&state, &id).await?;
    session.lock().await.update_draft(patch);
    view(&session).await
}

// POST /api/sessions/:id/submit
#[derive(Serialize)]
pub struct SubmitResponse {
    pub receipt: BookingReceipt,
    pub session: SessionView,
}

pub async fn submit(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<(StatusCode, Json<SubmitResponse>), AppError> {
    let session = load(&state, &id).await?;
    let receipt = session::submit(state.api.as_ref(), &session, state.auto_dismiss()).await?;
    let snapshot = session.lock().await.view()?;
    Ok((
        StatusCode::CREATED,
        Json(SubmitResponse {
            receipt,
            session: snapshot,
        }),
    ))
}

// POST /api/sessions/:id/dismiss
pub async fn dismiss(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<SessionView>, AppError> {
    let session = load(&state, &id).await?;
    session.lock().await.dismiss();
    view(&session).await
}
