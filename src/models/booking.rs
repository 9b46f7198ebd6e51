use std::fmt;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::models::form::FieldName;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum VehicleClass {
    Class4,
    Class7,
}

impl VehicleClass {
    pub fn as_str(&self) -> &'static str {
        match self {
            VehicleClass::Class4 => "class4",
            VehicleClass::Class7 => "class7",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "class4" => Some(VehicleClass::Class4),
            "class7" => Some(VehicleClass::Class7),
            _ => None,
        }
    }

    pub fn price(&self) -> Price {
        match self {
            VehicleClass::Class4 => Price(5485),
            VehicleClass::Class7 => Price(5865),
        }
    }
}

/// Amount in pence.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct Price(pub u32);

impl fmt::Display for Price {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{:02}", self.0 / 100, self.0 % 100)
    }
}

/// No class means no price. Nothing ever falls back to a priced class.
pub fn price_for(class: Option<VehicleClass>) -> Option<Price> {
    class.map(|c| c.price())
}

pub const DEFAULT_PAYMENT_METHOD: &str = "Payment on the day";

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase", default)]
pub struct BookingDraft {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub contact_number: String,
    pub make_and_model: String,
    pub registration_no: String,
    pub selected_date: Option<NaiveDate>,
    pub selected_time_slot: Option<String>,
    pub class_selection: Option<VehicleClass>,
    pub total_price: Option<String>,
    pub payment_method: String,
    pub aware_of_cancellation_policy: bool,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub how_did_you_hear_about_us: String,
}

impl Default for BookingDraft {
    fn default() -> Self {
        Self {
            first_name: String::new(),
            last_name: String::new(),
            email: String::new(),
            contact_number: String::new(),
            make_and_model: String::new(),
            registration_no: String::new(),
            selected_date: None,
            selected_time_slot: None,
            class_selection: None,
            total_price: None,
            payment_method: DEFAULT_PAYMENT_METHOD.to_string(),
            aware_of_cancellation_policy: false,
            how_did_you_hear_about_us: String::new(),
        }
    }
}

impl BookingDraft {
    /// Staff-created bookings skip the policy checkbox.
    pub fn for_admin() -> Self {
        Self {
            aware_of_cancellation_policy: true,
            ..Self::default()
        }
    }

    pub fn set_class(&mut self, class: Option<VehicleClass>) {
        self.class_selection = class;
        self.total_price = price_for(class).map(|p| p.to_string());
    }

    /// Text value of a field, `None` for fields that are not free text.
    pub fn text(&self, field: FieldName) -> Option<&str> {
        match field {
            FieldName::FirstName => Some(&self.first_name),
            FieldName::LastName => Some(&self.last_name),
            FieldName::Email => Some(&self.email),
            FieldName::ContactNumber => Some(&self.contact_number),
            FieldName::MakeAndModel => Some(&self.make_and_model),
            FieldName::RegistrationNo => Some(&self.registration_no),
            FieldName::PaymentMethod => Some(&self.payment_method),
            FieldName::HowDidYouHearAboutUs => Some(&self.how_did_you_hear_about_us),
            FieldName::SelectedTimeSlot => self.selected_time_slot.as_deref(),
            FieldName::SelectedDate
            | FieldName::ClassSelection
            | FieldName::AwareOfCancellationPolicy => None,
        }
    }

    pub fn is_blank(&self, field: FieldName) -> bool {
        match field {
            FieldName::SelectedDate => self.selected_date.is_none(),
            FieldName::ClassSelection => self.class_selection.is_none(),
            FieldName::AwareOfCancellationPolicy => !self.aware_of_cancellation_policy,
            FieldName::SelectedTimeSlot => self
                .selected_time_slot
                .as_deref()
                .map_or(true, |s| s.trim().is_empty()),
            other => self.text(other).map_or(true, |s| s.trim().is_empty()),
        }
    }

    pub fn apply(&mut self, patch: DraftPatch) {
        if let Some(v) = patch.first_name {
            self.first_name = v;
        }
        if let Some(v) = patch.last_name {
            self.last_name = v;
        }
        if let Some(v) = patch.email {
            self.email = v;
        }
        if let Some(v) = patch.contact_number {
            self.contact_number = v;
        }
        if let Some(v) = patch.make_and_model {
            self.make_and_model = v;
        }
        if let Some(v) = patch.registration_no {
            self.registration_no = v;
        }
        if let Some(v) = patch.payment_method {
            self.payment_method = v;
        }
        if let Some(v) = patch.aware_of_cancellation_policy {
            self.aware_of_cancellation_policy = v;
        }
        if let Some(v) = patch.how_did_you_hear_about_us {
            self.how_did_you_hear_about_us = v;
        }
        if let Some(class) = patch.class_selection {
            self.set_class(VehicleClass::parse(&class));
        }
    }
}

/// Field edits. Date and slot are not here: they go through the session so
/// the slot can be cleared whenever the date moves.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DraftPatch {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub email: Option<String>,
    pub contact_number: Option<String>,
    pub make_and_model: Option<String>,
    pub registration_no: Option<String>,
    pub class_selection: Option<String>,
    pub payment_method: Option<String>,
    pub aware_of_cancellation_policy: Option<bool>,
    pub how_did_you_hear_about_us: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct BookingReceipt {
    pub invoice_number: String,
    pub amount: String,
    pub customer: Option<serde_json::Value>,
    pub selected_date: Option<NaiveDate>,
    pub selected_time_slot: Option<String>,
}
