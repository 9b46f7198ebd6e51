use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "camelCase")]
pub enum FieldName {
    FirstName,
    LastName,
    Email,
    ContactNumber,
    MakeAndModel,
    RegistrationNo,
    SelectedDate,
    SelectedTimeSlot,
    ClassSelection,
    PaymentMethod,
    HowDidYouHearAboutUs,
    AwareOfCancellationPolicy,
}

impl FieldName {
    pub fn as_str(&self) -> &'static str {
        match self {
            FieldName::FirstName => "firstName",
            FieldName::LastName => "lastName",
            FieldName::Email => "email",
            FieldName::ContactNumber => "contactNumber",
            FieldName::MakeAndModel => "makeAndModel",
            FieldName::RegistrationNo => "registrationNo",
            FieldName::SelectedDate => "selectedDate",
            FieldName::SelectedTimeSlot => "selectedTimeSlot",
            FieldName::ClassSelection => "classSelection",
            FieldName::PaymentMethod => "paymentMethod",
            FieldName::HowDidYouHearAboutUs => "howDidYouHearAboutUs",
            FieldName::AwareOfCancellationPolicy => "awareOfCancellationPolicy",
        }
    }
}

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct FieldError {
    pub field: FieldName,
    pub message: String,
}

impl FieldError {
    pub fn new(field: FieldName, message: impl Into<String>) -> Self {
        Self {
            field,
            message: message.into(),
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum FieldKind {
    Text,
    Email,
    Tel,
    Date,
    TimeSlot,
    Select,
    Checkbox,
}

#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum FieldPattern {
    /// `^\d{10,}$`
    ContactNumber,
    /// `^[^\s@]+@[^\s@]+\.[^\s@]+$`
    Email,
}

#[derive(Debug, Clone, Copy, Serialize)]
pub struct FieldRule {
    pub pattern: FieldPattern,
    pub message: &'static str,
}

/// One rendered input. The form renderer walks these in order, and so does
/// validation, which is what makes "first invalid field" well defined.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct FieldDescriptor {
    pub name: FieldName,
    pub label: &'static str,
    pub icon: &'static str,
    pub kind: FieldKind,
    pub placeholder: Option<&'static str>,
    pub required: Option<&'static str>,
    pub rule: Option<FieldRule>,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum FormMode {
    #[default]
    SelfService,
    Admin,
}

impl FormMode {
    pub fn fields(&self) -> &'static [FieldDescriptor] {
        match self {
            FormMode::SelfService => CUSTOMER_FORM_FIELDS,
            FormMode::Admin => ADMIN_FORM_FIELDS,
        }
    }
}

const CONTACT_RULE: FieldRule = FieldRule {
    pattern: FieldPattern::ContactNumber,
    message: "Invalid contact number",
};

const EMAIL_RULE: FieldRule = FieldRule {
    pattern: FieldPattern::Email,
    message: "Invalid email format",
};

pub static CUSTOMER_FORM_FIELDS: &[FieldDescriptor] = &[
    FieldDescriptor {
        name: FieldName::FirstName,
        label: "First Name",
        icon: "user",
        kind: FieldKind::Text,
        placeholder: Some("John"),
        required: Some("First name is required"),
        rule: None,
    },
    FieldDescriptor {
        name: FieldName::LastName,
        label: "Last Name",
        icon: "user",
        kind: FieldKind::Text,
        placeholder: Some("Doe"),
        required: Some("Last name is required"),
        rule: None,
    },
    FieldDescriptor {
        name: FieldName::Email,
        label: "Email",
        icon: "mail",
        kind: FieldKind::Email,
        placeholder: Some("john.doe@example.com"),
        required: Some("Email is required"),
        rule: Some(EMAIL_RULE),
    },
    FieldDescriptor {
        name: FieldName::ContactNumber,
        label: "Contact Number",
        icon: "phone",
        kind: FieldKind::Tel,
        placeholder: Some("07123456789"),
        required: Some("Contact number is required"),
        rule: Some(CONTACT_RULE),
    },
    FieldDescriptor {
        name: FieldName::SelectedDate,
        label: "Date",
        icon: "calendar",
        kind: FieldKind::Date,
        placeholder: Some("Select a date"),
        required: Some("Date is required"),
        rule: None,
    },
    FieldDescriptor {
        name: FieldName::SelectedTimeSlot,
        label: "Time Slot",
        icon: "clock",
        kind: FieldKind::TimeSlot,
        placeholder: Some("Select a time slot"),
        required: Some("Time slot is required"),
        rule: None,
    },
    FieldDescriptor {
        name: FieldName::MakeAndModel,
        label: "Make & Model",
        icon: "car",
        kind: FieldKind::Text,
        placeholder: Some("e.g., Ford Focus"),
        required: None,
        rule: None,
    },
    FieldDescriptor {
        name: FieldName::RegistrationNo,
        label: "Registration No.",
        icon: "car",
        kind: FieldKind::Text,
        placeholder: Some("e.g., AB12 CDE"),
        required: None,
        rule: None,
    },
    FieldDescriptor {
        name: FieldName::ClassSelection,
        label: "Class",
        icon: "car",
        kind: FieldKind::Select,
        placeholder: Some("Select a class"),
        required: Some("Class is required"),
        rule: None,
    },
    FieldDescriptor {
        name: FieldName::PaymentMethod,
        label: "Payment Method",
        icon: "credit-card",
        kind: FieldKind::Select,
        placeholder: None,
        required: Some("Payment method is required"),
        rule: None,
    },
    FieldDescriptor {
        name: FieldName::AwareOfCancellationPolicy,
        label: "I am aware of the cancellation policy",
        icon: "alert-circle",
        kind: FieldKind::Checkbox,
        placeholder: None,
        required: Some("Please accept the cancellation policy"),
        rule: None,
    },
];

pub static ADMIN_FORM_FIELDS: &[FieldDescriptor] = &[
    FieldDescriptor {
        name: FieldName::FirstName,
        label: "First Name",
        icon: "user",
        kind: FieldKind::Text,
        placeholder: Some("John"),
        required: Some("First name is required"),
        rule: None,
    },
    FieldDescriptor {
        name: FieldName::LastName,
        label: "Last Name",
        icon: "user",
        kind: FieldKind::Text,
        placeholder: Some("Doe"),
        required: Some("Last name is required"),
        rule: None,
    },
    FieldDescriptor {
        name: FieldName::Email,
        label: "Email",
        icon: "mail",
        kind: FieldKind::Email,
        placeholder: Some("john.doe@example.com"),
        required: None,
        rule: None,
    },
    FieldDescriptor {
        name: FieldName::ContactNumber,
        label: "Contact Number",
        icon: "phone",
        kind: FieldKind::Tel,
        placeholder: Some("07123456789"),
        required: Some("Contact number is required"),
        rule: Some(CONTACT_RULE),
    },
    FieldDescriptor {
        name: FieldName::SelectedDate,
        label: "Date",
        icon: "calendar",
        kind: FieldKind::Date,
        placeholder: Some("Select a date"),
        required: Some("Date is required"),
        rule: None,
    },
    FieldDescriptor {
        name: FieldName::SelectedTimeSlot,
        label: "Time Slot",
        icon: "clock",
        kind: FieldKind::TimeSlot,
        placeholder: Some("Select a time slot"),
        required: Some("Time slot is required"),
        rule: None,
    },
    FieldDescriptor {
        name: FieldName::MakeAndModel,
        label: "Make & Model",
        icon: "car",
        kind: FieldKind::Text,
        placeholder: Some("e.g., Ford Focus"),
        required: None,
        rule: None,
    },
    FieldDescriptor {
        name: FieldName::RegistrationNo,
        label: "Registration No.",
        icon: "car",
        kind: FieldKind::Text,
        placeholder: Some("e.g., AB12 CDE"),
        required: None,
        rule: None,
    },
    FieldDescriptor {
        name: FieldName::ClassSelection,
        label: "Class",
        icon: "car",
        kind: FieldKind::Select,
        placeholder: Some("Select a class"),
        required: None,
        rule: None,
    },
    FieldDescriptor {
        name: FieldName::HowDidYouHearAboutUs,
        label: "How did you hear about us?",
        icon: "mail",
        kind: FieldKind::Text,
        placeholder: None,
        required: None,
        rule: None,
    },
];
