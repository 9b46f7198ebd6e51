pub mod http;

use async_trait::async_trait;
use chrono::NaiveDate;
use serde::Deserialize;

use crate::models::{
    AccountUpdate, BookingDraft, Credentials, CustomerPage, CustomerRecord, ListQuery,
    PasswordReset, RefundRequest, TimeSlot,
};

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ApiError {
    #[error("network error: {0}")]
    Network(String),

    #[error("unauthorized")]
    Unauthorized,

    #[error("not found: {0}")]
    NotFound(String),

    #[error("{message}")]
    Rejected { status: u16, message: String },

    #[error("failed to decode response: {0}")]
    Decode(String),
}

pub type ApiResult<T> = Result<T, ApiError>;

#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct CheckResponse {
    pub success: bool,
    #[serde(default)]
    pub message: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct CreatedBooking {
    #[serde(default)]
    pub customer: Option<serde_json::Value>,
    #[serde(default)]
    pub invoice_ref: Option<String>,
    #[serde(default)]
    pub paypal_order_id: Option<String>,
}

#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct CreateResponse {
    pub success: bool,
    #[serde(default)]
    pub data: Option<CreatedBooking>,
    #[serde(default)]
    pub message: Option<String>,
}

#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct AdminCreateResponse {
    pub status_code: u16,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub data: Option<serde_json::Value>,
}

/// The MOT booking backend. Months are one-based here, as on the wire.
#[async_trait]
pub trait BookingApi: Send + Sync {
    async fn fetch_slots(&self, date: NaiveDate) -> ApiResult<Vec<TimeSlot>>;
    async fn fetch_admin_slots(&self, date: NaiveDate) -> ApiResult<Vec<TimeSlot>>;
    async fn fetch_disabled_dates(&self, year: i32, month: u32) -> ApiResult<Vec<NaiveDate>>;
    async fn block_slots(&self, date: NaiveDate, slots: &[String]) -> ApiResult<()>;
    async fn unblock_slots(&self, date: NaiveDate, slots: &[String]) -> ApiResult<()>;

    async fn check_availability(&self, draft: &BookingDraft) -> ApiResult<CheckResponse>;
    async fn create_booking(&self, draft: &BookingDraft) -> ApiResult<CreateResponse>;
    async fn create_booking_by_admin(&self, draft: &BookingDraft)
        -> ApiResult<AdminCreateResponse>;

    async fn list_customers(&self, query: &ListQuery) -> ApiResult<CustomerPage>;
    async fn get_customer(&self, id: &str) -> ApiResult<CustomerRecord>;
    async fn update_customer(&self, id: &str, patch: &serde_json::Value) -> ApiResult<String>;
    async fn delete_customer(&self, id: &str) -> ApiResult<String>;
    async fn refund(&self, request: &RefundRequest) -> ApiResult<String>;

    async fn login(&self, credentials: &Credentials) -> ApiResult<()>;
    async fn logout(&self) -> ApiResult<()>;
    async fn check_auth(&self) -> ApiResult<bool>;
    async fn refresh_token(&self) -> ApiResult<()>;
    async fn forgot_password(&self, email: &str) -> ApiResult<String>;
    async fn verify_reset_token(&self, token: &str) -> ApiResult<()>;
    async fn reset_password(&self, token: &str, reset: &PasswordReset) -> ApiResult<String>;
    async fn update_account(&self, update: &AccountUpdate) -> ApiResult<String>;
}
