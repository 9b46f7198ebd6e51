use serde::Serialize;

use crate::errors::AppError;
use crate::models::{BookingDraft, BookingReceipt, FormMode};
use crate::services::api::BookingApi;
use crate::services::timer::TimerHandle;

pub const FALLBACK_FAILURE: &str = "Failed to create booking";

#[derive(Debug, Clone, Default, Serialize, PartialEq)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum FlowState {
    #[default]
    Idle,
    Validating,
    Submitting,
    Completed {
        receipt: BookingReceipt,
    },
    Failed {
        message: String,
    },
}

/// Submission state for one form. Holds the auto-dismiss timer so that
/// resetting or dropping the flow also cancels it.
#[derive(Debug, Default)]
pub struct BookingFlow {
    state: FlowState,
    auto_dismiss: Option<TimerHandle>,
}

impl BookingFlow {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> &FlowState {
        &self.state
    }

    pub fn is_busy(&self) -> bool {
        matches!(self.state, FlowState::Validating | FlowState::Submitting)
    }

    pub fn begin(&mut self) -> Result<(), AppError> {
        if self.is_busy() {
            return Err(AppError::Busy(
                "A booking is already being submitted".to_string(),
            ));
        }
        self.auto_dismiss = None;
        self.state = FlowState::Validating;
        Ok(())
    }

    pub fn rejected(&mut self) {
        self.state = FlowState::Idle;
    }

    pub fn submitting(&mut self) {
        self.state = FlowState::Submitting;
    }

    pub fn complete(&mut self, receipt: BookingReceipt) {
        self.state = FlowState::Completed { receipt };
    }

    pub fn fail(&mut self, message: String) {
        self.state = FlowState::Failed { message };
    }

    pub fn arm_auto_dismiss(&mut self, timer: TimerHandle) {
        self.auto_dismiss = Some(timer);
    }

    pub fn auto_dismiss_pending(&self) -> bool {
        self.auto_dismiss.as_ref().is_some_and(|t| !t.is_finished())
    }

    pub fn dismiss(&mut self) {
        self.auto_dismiss = None;
        self.state = FlowState::Idle;
    }
}

/// What the user gets to read when a submission fails.
pub fn failure_message(err: &AppError) -> String {
    match err {
        AppError::AvailabilityConflict(m) | AppError::Upstream(m) if !m.trim().is_empty() => {
            m.clone()
        }
        _ => FALLBACK_FAILURE.to_string(),
    }
}

fn fallback_invoice() -> String {
    format!("ORD-{}", chrono::Utc::now().timestamp_millis())
}

fn receipt(
    draft: &BookingDraft,
    invoice_number: String,
    customer: Option<serde_json::Value>,
) -> BookingReceipt {
    BookingReceipt {
        invoice_number,
        amount: draft
            .total_price
            .clone()
            .unwrap_or_else(|| "N/A".to_string()),
        customer,
        selected_date: draft.selected_date,
        selected_time_slot: draft.selected_time_slot.clone(),
    }
}

/// Sends an already validated draft. Customers go through the availability
/// pre-check first; staff bookings go straight to the admin endpoint.
pub async fn send_booking(
    api: &dyn BookingApi,
    mode: FormMode,
    draft: &BookingDraft,
) -> Result<BookingReceipt, AppError> {
    match mode {
        FormMode::SelfService => {
            let check = api.check_availability(draft).await?;
            if !check.success {
                return Err(AppError::AvailabilityConflict(check.message.unwrap_or_else(
                    || "The selected slot is no longer available".to_string(),
                )));
            }

            let created = api.create_booking(draft).await?;
            if !created.success {
                return Err(AppError::Upstream(
                    created
                        .message
                        .unwrap_or_else(|| FALLBACK_FAILURE.to_string()),
                ));
            }
            let data = created.data.unwrap_or_default();
            let invoice = data
                .invoice_ref
                .or(data.paypal_order_id)
                .unwrap_or_else(fallback_invoice);
            Ok(receipt(draft, invoice, data.customer))
        }
        FormMode::Admin => {
            let created = api.create_booking_by_admin(draft).await?;
            if created.status_code != 201 {
                return Err(AppError::Upstream(
                    created
                        .message
                        .unwrap_or_else(|| FALLBACK_FAILURE.to_string()),
                ));
            }
            let invoice = created
                .data
                .as_ref()
                .and_then(|d| d.get("invoiceRef"))
                .and_then(|v| v.as_str())
                .map(str::to_string)
                .unwrap_or_else(fallback_invoice);
            Ok(receipt(draft, invoice, created.data))
        }
    }
}
