use std::collections::BTreeMap;
use std::sync::Arc;

use axum::extract::{Path, Query, State};
use axum::http::{HeaderMap, StatusCode};
use axum::Json;
use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use crate::errors::AppError;
use crate::handlers::surfaced;
use crate::models::{
    BookingDraft, BookingReceipt, CalendarGrid, CustomerRecord, FormMode, ListParams, ListQuery,
    RefundRequest, TimeSlot,
};
use crate::services::booking_flow;
use crate::services::calendar::build_grid;
use crate::services::disabled_dates::DisabledDateSet;
use crate::services::slots::{SlotCache, SlotMutation, SlotSource};
use crate::services::validation::{self, Availability};
use crate::state::AppState;

async fn guard(state: &AppState) -> Result<(), AppError> {
    state.auth.require(state.api.as_ref()).await
}

// GET /api/admin/calendar?year=&month=&selected=
#[derive(Deserialize)]
pub struct CalendarQuery {
    pub year: Option<i32>,
    /// Zero-based, as in the grid.
    pub month: Option<u32>,
    pub selected: Option<NaiveDate>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CalendarResponse {
    pub grid: CalendarGrid,
    pub disabled_dates: Vec<NaiveDate>,
}

pub async fn calendar(
    State(state): State<Arc<AppState>>,
    Query(query): Query<CalendarQuery>,
) -> Result<Json<CalendarResponse>, AppError> {
    guard(&state).await?;
    let today = chrono::Local::now().date_naive();
    let year = query.year.unwrap_or(today.year());
    let month0 = query.month.unwrap_or(today.month0());
    let grid = build_grid(year, month0, today, query.selected)
        .map_err(|e| AppError::BadRequest(e.to_string()))?;

    let mut disabled = DisabledDateSet::new(today);
    disabled
        .refresh(state.api.as_ref(), year, month0 + 1)
        .await
        .map_err(|e| surfaced(&state, e.into()))?;

    Ok(Json(CalendarResponse {
        grid,
        disabled_dates: disabled.disabled_in_month(year, month0 + 1),
    }))
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SlotsResponse {
    pub date: Option<NaiveDate>,
    pub slots: Vec<TimeSlot>,
    pub available_slots: Vec<String>,
    pub pending_mutation: bool,
}

impl From<&SlotCache> for SlotsResponse {
    fn from(cache: &SlotCache) -> Self {
        Self {
            date: cache.date(),
            slots: cache.all_slots().to_vec(),
            available_slots: cache.available_times(),
            pending_mutation: cache.pending_mutation(),
        }
    }
}

// GET /api/admin/slots?date=
#[derive(Deserialize)]
pub struct SlotsQuery {
    pub date: NaiveDate,
}

pub async fn get_slots(
    State(state): State<Arc<AppState>>,
    Query(query): Query<SlotsQuery>,
) -> Result<Json<SlotsResponse>, AppError> {
    guard(&state).await?;
    let mut cache = state.admin_slots.lock().await;
    if let Err(e) = cache
        .refresh(state.api.as_ref(), SlotSource::Admin, query.date)
        .await
    {
        tracing::warn!(date = %query.date, error = %e, "admin slot fetch failed");
        state.notifier.warning("Failed to load time slots", None);
        return Err(e.into());
    }
    Ok(Json(SlotsResponse::from(&*cache)))
}

// POST /api/admin/slots/block, /api/admin/slots/unblock
#[derive(Deserialize)]
pub struct SlotChange {
    pub date: NaiveDate,
    pub slots: Vec<String>,
}

async fn change_slots(
    state: &AppState,
    mutation: SlotMutation,
    req: SlotChange,
) -> Result<Json<SlotsResponse>, AppError> {
    guard(state).await?;
    let mut cache = state.admin_slots.lock().await;
    cache
        .mutate(state.api.as_ref(), mutation, req.date, &req.slots)
        .await
        .map_err(|e| surfaced(state, e))?;

    let done = match mutation {
        SlotMutation::Block => "Slots blocked successfully",
        SlotMutation::Unblock => "Slots unblocked successfully",
    };
    state.notifier.success(done, None);
    Ok(Json(SlotsResponse::from(&*cache)))
}

pub async fn block_slots(
    State(state): State<Arc<AppState>>,
    Json(req): Json<SlotChange>,
) -> Result<Json<SlotsResponse>, AppError> {
    change_slots(&state, SlotMutation::Block, req).await
}

pub async fn unblock_slots(
    State(state): State<Arc<AppState>>,
    Json(req): Json<SlotChange>,
) -> Result<Json<SlotsResponse>, AppError> {
    change_slots(&state, SlotMutation::Unblock, req).await
}

// GET /api/admin/bookings?page=&pageSize=&search=
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BookingsResponse {
    pub customers: Vec<CustomerRecord>,
    pub total_pages: u32,
    pub page_index: u32,
    pub page_size: u32,
    pub search: String,
    /// Parameters the page should mirror into its URL.
    pub query: BTreeMap<&'static str, String>,
}

async fn list_page(state: &AppState, query: ListQuery) -> Result<BookingsResponse, AppError> {
    let page = state
        .api
        .list_customers(&query)
        .await
        .map_err(|e| surfaced(state, e.into()))?;
    Ok(BookingsResponse {
        customers: page.customers,
        total_pages: page.total_pages,
        page_index: query.page_index,
        page_size: query.page_size,
        query: query.to_query_pairs().into_iter().collect(),
        search: query.search,
    })
}

pub async fn list_bookings(
    State(state): State<Arc<AppState>>,
    Query(params): Query<ListParams>,
) -> Result<Json<BookingsResponse>, AppError> {
    guard(&state).await?;
    let page = list_page(&state, ListQuery::from_params(&params)).await?;
    Ok(Json(page))
}

#[derive(Serialize)]
#[serde(untagged)]
pub enum SearchResponse {
    Superseded { superseded: bool },
    Page(BookingsResponse),
}

// GET /api/admin/bookings/search?search=&pageSize=
//
// Typing in the search box fires one request per keystroke. Only the last
// request from a client inside the debounce window reaches the backend.
pub async fn search_bookings(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Query(params): Query<ListParams>,
) -> Result<Json<SearchResponse>, AppError> {
    guard(&state).await?;
    let key = headers
        .get("x-client-id")
        .and_then(|v| v.to_str().ok())
        .unwrap_or("admin")
        .to_string();

    if !state.search.settle(&key).await {
        return Ok(Json(SearchResponse::Superseded { superseded: true }));
    }

    let query = ListQuery {
        page_index: 0,
        ..ListQuery::from_params(&params)
    };
    let page = list_page(&state, query).await?;
    Ok(Json(SearchResponse::Page(page)))
}

// POST /api/admin/bookings
pub async fn create_booking(
    State(state): State<Arc<AppState>>,
    Json(mut draft): Json<BookingDraft>,
) -> Result<(StatusCode, Json<BookingReceipt>), AppError> {
    guard(&state).await?;
    // Price follows the class.
    draft.set_class(draft.class_selection);
    let today = chrono::Local::now().date_naive();

    // Field-level checks need no backend data.
    validation::validate_draft(&draft, FormMode::Admin, None).map_err(AppError::Validation)?;

    let Some(date) = draft.selected_date else {
        return Err(AppError::BadRequest("selected date is required".to_string()));
    };
    let mut disabled = DisabledDateSet::new(today);
    disabled.refresh(state.api.as_ref(), date.year(), date.month()).await?;
    let mut slots = SlotCache::new();
    slots.refresh(state.api.as_ref(), SlotSource::Admin, date).await?;
    let availability = Availability {
        disabled: &disabled,
        slots: &slots,
    };
    validation::validate_draft(&draft, FormMode::Admin, Some(&availability))
        .map_err(AppError::Validation)?;

    let receipt = booking_flow::send_booking(state.api.as_ref(), FormMode::Admin, &draft)
        .await
        .map_err(|e| surfaced(&state, e))?;
    tracing::info!(invoice = %receipt.invoice_number, %date, "staff booking created");
    state.notifier.success("Booking created successfully", None);
    Ok((StatusCode::CREATED, Json(receipt)))
}

// GET /api/admin/bookings/:id
pub async fn get_booking(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<CustomerRecord>, AppError> {
    guard(&state).await?;
    let record = state.api.get_customer(&id).await?;
    Ok(Json(record))
}

// PATCH /api/admin/bookings/:id
pub async fn update_booking(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    Json(patch): Json<Value>,
) -> Result<Json<Value>, AppError> {
    guard(&state).await?;
    if !patch.is_object() {
        return Err(AppError::BadRequest("expected a JSON object".to_string()));
    }
    let message = state
        .api
        .update_customer(&id, &patch)
        .await
        .map_err(|e| surfaced(&state, e.into()))?;
    state.notifier.success(&message, None);
    Ok(Json(json!({ "message": message })))
}

// DELETE /api/admin/bookings/:id
pub async fn delete_booking(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<Value>, AppError> {
    guard(&state).await?;
    let message = state
        .api
        .delete_customer(&id)
        .await
        .map_err(|e| surfaced(&state, e.into()))?;
    tracing::info!(customer = %id, "booking deleted");
    state.notifier.success(&message, None);
    Ok(Json(json!({ "message": message })))
}

// POST /api/admin/refunds
pub async fn refund(
    State(state): State<Arc<AppState>>,
    Json(req): Json<RefundRequest>,
) -> Result<Json<Value>, AppError> {
    guard(&state).await?;
    validation::check_refund(&req)?;
    let message = state
        .api
        .refund(&req)
        .await
        .map_err(|e| surfaced(&state, e.into()))?;
    tracing::info!(capture = %req.capture_id, amount = req.refund_amount, "refund issued");
    state.notifier.success(&message, None);
    Ok(Json(json!({ "message": message })))
}
