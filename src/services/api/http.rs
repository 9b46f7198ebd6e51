use std::time::Duration;

use anyhow::Context;
use async_trait::async_trait;
use chrono::NaiveDate;
use reqwest::{Method, RequestBuilder, StatusCode};
use serde::de::DeserializeOwned;
use serde_json::{json, Value};

use super::{
    AdminCreateResponse, ApiError, ApiResult, BookingApi, CheckResponse, CreateResponse,
};
use crate::models::{
    AccountUpdate, BookingDraft, Credentials, CustomerPage, CustomerRecord, ListQuery,
    PasswordReset, RefundRequest, TimeSlot,
};
use crate::services::auth::{AuthContext, AuthStatus};

/// reqwest client for the booking backend. It keeps the staff session in its
/// cookie jar. Private calls that come back 401 get one refresh-token
/// round trip and one retry.
pub struct HttpBookingApi {
    base_url: String,
    client: reqwest::Client,
    auth: AuthContext,
}

impl HttpBookingApi {
    pub fn new(base_url: String, timeout: Duration, auth: AuthContext) -> anyhow::Result<Self> {
        let client = reqwest::Client::builder()
            .cookie_store(true)
            .timeout(timeout)
            .build()
            .context("failed to build HTTP client")?;
        Ok(Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            client,
            auth,
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }

    fn request(&self, method: Method, path: &str) -> RequestBuilder {
        self.client.request(method, self.url(path))
    }

    async fn execute(&self, req: RequestBuilder) -> ApiResult<Value> {
        let resp = req
            .send()
            .await
            .map_err(|e| ApiError::Network(e.to_string()))?;
        let status = resp.status();
        let text = resp
            .text()
            .await
            .map_err(|e| ApiError::Network(e.to_string()))?;
        let body: Value = if text.trim().is_empty() {
            Value::Null
        } else {
            serde_json::from_str(&text).unwrap_or(Value::String(text))
        };

        if status == StatusCode::UNAUTHORIZED {
            return Err(ApiError::Unauthorized);
        }
        if status == StatusCode::NOT_FOUND {
            return Err(ApiError::NotFound(
                message_of(&body).unwrap_or_else(|| "resource not found".to_string()),
            ));
        }
        if !status.is_success() {
            return Err(ApiError::Rejected {
                status: status.as_u16(),
                message: message_of(&body).unwrap_or_else(|| "An error occurred".to_string()),
            });
        }
        Ok(body)
    }

    /// Sends a request that needs the staff session. `build` is called again
    /// for the retry, since a sent `RequestBuilder` is consumed.
    async fn execute_private<F>(&self, build: F) -> ApiResult<Value>
    where
        F: Fn() -> RequestBuilder + Send + Sync,
    {
        match self.execute(build()).await {
            Err(ApiError::Unauthorized) => {
                tracing::info!("session expired, refreshing access token");
                if let Err(e) = self.refresh_token().await {
                    tracing::warn!(error = %e, "token refresh failed");
                    self.auth.set_status(AuthStatus::Unauthenticated);
                    return Err(ApiError::Unauthorized);
                }
                let retried = self.execute(build()).await;
                if matches!(retried, Err(ApiError::Unauthorized)) {
                    self.auth.set_status(AuthStatus::Unauthenticated);
                }
                retried
            }
            other => other,
        }
    }
}

fn message_of(body: &Value) -> Option<String> {
    body.get("message")
        .and_then(|m| m.as_str())
        .map(|s| s.to_string())
        .or_else(|| body.as_str().map(|s| s.to_string()))
        .filter(|s| !s.is_empty())
}

fn data<T: DeserializeOwned>(body: &Value) -> ApiResult<T> {
    serde_json::from_value(body.get("data").cloned().unwrap_or(Value::Null))
        .map_err(|e| ApiError::Decode(e.to_string()))
}

fn whole<T: DeserializeOwned>(body: Value) -> ApiResult<T> {
    serde_json::from_value(body).map_err(|e| ApiError::Decode(e.to_string()))
}

/// Accepts `2025-06-03` as well as full timestamps like `2025-06-03T00:00:00.000Z`.
fn parse_wire_date(s: &str) -> Option<NaiveDate> {
    let day = s.get(..10)?;
    NaiveDate::parse_from_str(day, "%Y-%m-%d").ok()
}

fn format_date(date: NaiveDate) -> String {
    date.format("%Y-%m-%d").to_string()
}

#[async_trait]
impl BookingApi for HttpBookingApi {
    async fn fetch_slots(&self, date: NaiveDate) -> ApiResult<Vec<TimeSlot>> {
        let body = self
            .execute(
                self.request(Method::GET, "customers/slots/times-slots")
                    .query(&[("date", format_date(date))]),
            )
            .await?;
        data(&body)
    }

    async fn fetch_admin_slots(&self, date: NaiveDate) -> ApiResult<Vec<TimeSlot>> {
        let body = self
            .execute(
                self.request(Method::GET, "customers/available/slot")
                    .query(&[("date", format_date(date))]),
            )
            .await?;
        data(&body)
    }

    async fn fetch_disabled_dates(&self, year: i32, month: u32) -> ApiResult<Vec<NaiveDate>> {
        let body = self
            .execute(
                self.request(Method::GET, "customers/slots/disbale-date")
                    .query(&[("year", year.to_string()), ("month", month.to_string())]),
            )
            .await?;
        let items: Vec<Value> = data(&body)?;
        let mut dates = Vec::with_capacity(items.len());
        for item in items {
            match item.get("date").and_then(|d| d.as_str()).and_then(parse_wire_date) {
                Some(d) => dates.push(d),
                None => tracing::warn!(item = %item, "skipping unparseable disabled date"),
            }
        }
        Ok(dates)
    }

    async fn block_slots(&self, date: NaiveDate, slots: &[String]) -> ApiResult<()> {
        let body = json!({ "date": format_date(date), "slots": slots });
        self.execute_private(|| {
            self.request(Method::PATCH, "customers/blocktimeslots/")
                .json(&body)
        })
        .await?;
        Ok(())
    }

    async fn unblock_slots(&self, date: NaiveDate, slots: &[String]) -> ApiResult<()> {
        let body = json!({ "date": format_date(date), "slots": slots });
        self.execute_private(|| {
            self.request(Method::PATCH, "customers/unblocktimeslots/")
                .json(&body)
        })
        .await?;
        Ok(())
    }

    async fn check_availability(&self, draft: &BookingDraft) -> ApiResult<CheckResponse> {
        let body = self
            .execute(self.request(Method::POST, "payments/check").json(draft))
            .await?;
        whole(body)
    }

    async fn create_booking(&self, draft: &BookingDraft) -> ApiResult<CreateResponse> {
        let body = self
            .execute(self.request(Method::POST, "payments/create").json(draft))
            .await?;
        whole(body)
    }

    async fn create_booking_by_admin(
        &self,
        draft: &BookingDraft,
    ) -> ApiResult<AdminCreateResponse> {
        let body = self
            .execute_private(|| self.request(Method::POST, "customers/create").json(draft))
            .await?;
        whole(body)
    }

    async fn list_customers(&self, query: &ListQuery) -> ApiResult<CustomerPage> {
        let pairs = query.upstream_pairs();
        let body = self
            .execute_private(|| self.request(Method::GET, "customers").query(&pairs))
            .await?;
        data(&body)
    }

    async fn get_customer(&self, id: &str) -> ApiResult<CustomerRecord> {
        let path = format!("customers/{id}");
        let body = self
            .execute_private(|| self.request(Method::GET, &path))
            .await?;
        data(&body)
    }

    async fn update_customer(&self, id: &str, patch: &Value) -> ApiResult<String> {
        let path = format!("customers/{id}");
        let body = self
            .execute_private(|| self.request(Method::PATCH, &path).json(patch))
            .await?;
        Ok(message_of(&body).unwrap_or_else(|| "Booking updated successfully!".to_string()))
    }

    async fn delete_customer(&self, id: &str) -> ApiResult<String> {
        let path = format!("customers/{id}");
        let body = self
            .execute_private(|| self.request(Method::DELETE, &path))
            .await?;
        Ok(message_of(&body).unwrap_or_else(|| "Customer deleted successfully!".to_string()))
    }

    async fn refund(&self, request: &RefundRequest) -> ApiResult<String> {
        let body = self
            .execute_private(|| self.request(Method::POST, "refund").json(request))
            .await?;
        Ok(message_of(&body).unwrap_or_else(|| "Refund processed successfully".to_string()))
    }

    async fn login(&self, credentials: &Credentials) -> ApiResult<()> {
        self.execute(self.request(Method::POST, "users/login").json(credentials))
            .await?;
        Ok(())
    }

    async fn logout(&self) -> ApiResult<()> {
        self.execute_private(|| self.request(Method::POST, "users/logout"))
            .await?;
        Ok(())
    }

    async fn check_auth(&self) -> ApiResult<bool> {
        let body = self
            .execute_private(|| self.request(Method::GET, "auth/check-auth"))
            .await?;
        Ok(body["data"]["authenticated"].as_bool().unwrap_or(false))
    }

    async fn refresh_token(&self) -> ApiResult<()> {
        self.execute(self.request(Method::POST, "auth/refresh-token"))
            .await?;
        Ok(())
    }

    async fn forgot_password(&self, email: &str) -> ApiResult<String> {
        let body = self
            .execute(
                self.request(Method::POST, "users/forget")
                    .json(&json!({ "email": email })),
            )
            .await?;
        Ok(message_of(&body).unwrap_or_else(|| "Password reset link sent".to_string()))
    }

    async fn verify_reset_token(&self, token: &str) -> ApiResult<()> {
        self.execute(self.request(Method::GET, &format!("users/reset-password-token/{token}")))
            .await?;
        Ok(())
    }

    async fn reset_password(&self, token: &str, reset: &PasswordReset) -> ApiResult<String> {
        let body = self
            .execute(
                self.request(Method::PATCH, "users/reset-password/")
                    .query(&[("token", token)])
                    .json(reset),
            )
            .await?;
        Ok(message_of(&body).unwrap_or_else(|| "Password reset successfully!".to_string()))
    }

    async fn update_account(&self, update: &AccountUpdate) -> ApiResult<String> {
        let body = self
            .execute_private(|| self.request(Method::PATCH, "users/update-account").json(update))
            .await?;
        Ok(message_of(&body).unwrap_or_else(|| "Profile updated successfully!".to_string()))
    }
}
