use crate::errors::AppError;
use crate::models::form::FieldPattern;
use crate::models::{BookingDraft, FieldError, FieldName, FormMode, PasswordReset, RefundRequest};
use crate::services::disabled_dates::DisabledDateSet;
use crate::services::slots::SlotCache;

/// At least ten ASCII digits and nothing else.
pub fn is_valid_contact_number(s: &str) -> bool {
    s.len() >= 10 && s.bytes().all(|b| b.is_ascii_digit())
}

/// `local@domain.tld`: one `@`, no whitespace, a dot inside the domain with
/// text on both sides.
pub fn is_valid_email(s: &str) -> bool {
    if s.chars().any(char::is_whitespace) {
        return false;
    }
    let Some((local, domain)) = s.split_once('@') else {
        return false;
    };
    if local.is_empty() || domain.contains('@') {
        return false;
    }
    domain
        .char_indices()
        .any(|(i, c)| c == '.' && i > 0 && i + 1 < domain.len())
}

fn matches(pattern: FieldPattern, value: &str) -> bool {
    match pattern {
        FieldPattern::ContactNumber => is_valid_contact_number(value),
        FieldPattern::Email => is_valid_email(value),
    }
}

/// What the session currently knows about bookable dates and slots.
pub struct Availability<'a> {
    pub disabled: &'a DisabledDateSet,
    pub slots: &'a SlotCache,
}

/// Walks the form's field list in order. A field reports at most one error:
/// missing, then malformed, then no longer bookable.
pub fn validate_draft(
    draft: &BookingDraft,
    mode: FormMode,
    availability: Option<&Availability<'_>>,
) -> Result<(), Vec<FieldError>> {
    let mut errors = Vec::new();

    for field in mode.fields() {
        let blank = draft.is_blank(field.name);
        if blank {
            if let Some(message) = field.required {
                errors.push(FieldError::new(field.name, message));
            }
            continue;
        }

        if let (Some(rule), Some(value)) = (field.rule, draft.text(field.name)) {
            if !matches(rule.pattern, value) {
                errors.push(FieldError::new(field.name, rule.message));
                continue;
            }
        }

        let Some(avail) = availability else {
            continue;
        };
        match field.name {
            FieldName::SelectedDate => {
                if draft
                    .selected_date
                    .is_some_and(|date| avail.disabled.is_disabled(date))
                {
                    errors.push(FieldError::new(
                        field.name,
                        "Selected date is not available",
                    ));
                }
            }
            FieldName::SelectedTimeSlot => {
                let bookable = match (draft.selected_date, draft.selected_time_slot.as_deref()) {
                    (Some(date), Some(time)) => avail.slots.is_available(date, time),
                    _ => false,
                };
                if !bookable {
                    errors.push(FieldError::new(
                        field.name,
                        "Selected time slot is no longer available",
                    ));
                }
            }
            _ => {}
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

pub fn first_invalid_field(errors: &[FieldError]) -> Option<FieldName> {
    errors.first().map(|e| e.field)
}

pub fn check_password_reset(reset: &PasswordReset) -> Result<(), AppError> {
    if reset.password.is_empty() {
        return Err(AppError::BadRequest("Password is required".to_string()));
    }
    if reset.password != reset.confirm_password {
        return Err(AppError::BadRequest("Passwords do not match.".to_string()));
    }
    Ok(())
}

pub fn check_refund(request: &RefundRequest) -> Result<(), AppError> {
    if request.capture_id.trim().is_empty() {
        return Err(AppError::BadRequest("Capture id is required".to_string()));
    }
    if !(request.refund_amount.is_finite() && request.refund_amount > 0.0) {
        return Err(AppError::BadRequest(
            "Refund amount must be greater than zero".to_string(),
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{SlotStatus, TimeSlot, VehicleClass};
    use chrono::NaiveDate;

    fn d(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    fn complete_draft() -> BookingDraft {
        let mut draft = BookingDraft {
            first_name: "Jane".into(),
            last_name: "Doe".into(),
            email: "jane@example.com".into(),
            contact_number: "07123456789".into(),
            selected_date: Some(d("2025-06-02")),
            selected_time_slot: Some("9:00".into()),
            aware_of_cancellation_policy: true,
            ..Default::default()
        };
        draft.set_class(Some(VehicleClass::Class4));
        draft
    }

    fn messages(errors: &[FieldError]) -> Vec<&str> {
        errors.iter().map(|e| e.message.as_str()).collect()
    }

    #[test]
    fn test_contact_number_pattern() {
        assert!(is_valid_contact_number("0712345678"));
        assert!(is_valid_contact_number("071234567890123"));
        assert!(!is_valid_contact_number("071234567"));
        assert!(!is_valid_contact_number("07123 456789"));
        assert!(!is_valid_contact_number("+447123456789"));
    }

    #[test]
    fn test_padded_contact_number_rejected() {
        let draft = BookingDraft {
            contact_number: " 0712345678 ".into(),
            ..complete_draft()
        };
        let errors = validate_draft(&draft, FormMode::SelfService, None).unwrap_err();
        assert_eq!(first_invalid_field(&errors), Some(FieldName::ContactNumber));
        assert_eq!(messages(&errors), vec!["Invalid contact number"]);

        let draft = BookingDraft {
            email: "jane@example.com ".into(),
            ..complete_draft()
        };
        let errors = validate_draft(&draft, FormMode::SelfService, None).unwrap_err();
        assert_eq!(messages(&errors), vec!["Invalid email format"]);
    }

    #[test]
    fn test_placeholders_satisfy_their_rules() {
        for fields in [FormMode::SelfService.fields(), FormMode::Admin.fields()] {
            for field in fields {
                if let (Some(rule), Some(placeholder)) = (field.rule, field.placeholder) {
                    assert!(
                        matches(rule.pattern, placeholder),
                        "{} placeholder {placeholder:?}",
                        field.name.as_str()
                    );
                }
            }
        }
    }

    #[test]
    fn test_email_pattern() {
        assert!(is_valid_email("a@b.co"));
        assert!(is_valid_email("first.last@mail.example.org"));
        assert!(!is_valid_email("a@b"));
        assert!(!is_valid_email("a@.b"));
        assert!(!is_valid_email("a@b."));
        assert!(!is_valid_email("@b.co"));
        assert!(!is_valid_email("a@@b.co"));
        assert!(!is_valid_email("a b@c.co"));
    }

    #[test]
    fn test_complete_draft_passes() {
        assert!(validate_draft(&complete_draft(), FormMode::SelfService, None).is_ok());
    }

    #[test]
    fn test_missing_contact_number() {
        let draft = BookingDraft {
            contact_number: String::new(),
            ..complete_draft()
        };
        let errors = validate_draft(&draft, FormMode::SelfService, None).unwrap_err();
        assert_eq!(messages(&errors), vec!["Contact number is required"]);
        assert_eq!(first_invalid_field(&errors), Some(FieldName::ContactNumber));
    }

    #[test]
    fn test_errors_follow_field_order() {
        let errors =
            validate_draft(&BookingDraft::default(), FormMode::SelfService, None).unwrap_err();
        assert_eq!(
            messages(&errors),
            vec![
                "First name is required",
                "Last name is required",
                "Email is required",
                "Contact number is required",
                "Date is required",
                "Time slot is required",
                "Class is required",
                "Please accept the cancellation policy",
            ]
        );
        assert_eq!(first_invalid_field(&errors), Some(FieldName::FirstName));
    }

    #[test]
    fn test_admin_mode_requires_less() {
        let draft = BookingDraft {
            first_name: "Sam".into(),
            last_name: "Lee".into(),
            contact_number: "0712345678".into(),
            selected_date: Some(d("2025-06-02")),
            selected_time_slot: Some("9:00".into()),
            ..BookingDraft::for_admin()
        };
        assert!(validate_draft(&draft, FormMode::Admin, None).is_ok());

        let bad = BookingDraft {
            contact_number: "12345".into(),
            email: "not-an-email".into(),
            ..draft
        };
        let errors = validate_draft(&bad, FormMode::Admin, None).unwrap_err();
        assert_eq!(messages(&errors), vec!["Invalid contact number"]);
    }

    #[test]
    fn test_malformed_email_in_self_service() {
        let draft = BookingDraft {
            email: "jane@example".into(),
            ..complete_draft()
        };
        let errors = validate_draft(&draft, FormMode::SelfService, None).unwrap_err();
        assert_eq!(messages(&errors), vec!["Invalid email format"]);
    }

    #[test]
    fn test_disabled_date_and_stale_slot_fail() {
        let mut disabled = DisabledDateSet::new(d("2025-06-01"));
        let mut slots = SlotCache::new();
        let t = slots.begin_fetch(d("2025-06-02"));
        slots.complete_fetch(
            t,
            vec![TimeSlot {
                time: "9:00".into(),
                status: SlotStatus::Available,
            }],
        );
        let draft = complete_draft();
        let avail = Availability {
            disabled: &disabled,
            slots: &slots,
        };
        assert!(validate_draft(&draft, FormMode::SelfService, Some(&avail)).is_ok());

        disabled.mark_exhausted(d("2025-06-02"));
        let taken = BookingDraft {
            selected_time_slot: Some("9:15".into()),
            ..draft
        };
        let avail = Availability {
            disabled: &disabled,
            slots: &slots,
        };
        let errors = validate_draft(&taken, FormMode::SelfService, Some(&avail)).unwrap_err();
        assert_eq!(
            messages(&errors),
            vec![
                "Selected date is not available",
                "Selected time slot is no longer available",
            ]
        );
    }

    #[test]
    fn test_password_mismatch() {
        let err = check_password_reset(&PasswordReset {
            password: "hunter22".into(),
            confirm_password: "hunter23".into(),
        })
        .unwrap_err();
        assert_eq!(err.to_string(), "Passwords do not match.");
    }

    #[test]
    fn test_refund_amount_must_be_positive() {
        let mut req = RefundRequest {
            capture_id: "CAP-1".into(),
            refund_amount: 0.0,
            refund_reason: String::new(),
        };
        assert!(check_refund(&req).is_err());
        req.refund_amount = -3.0;
        assert!(check_refund(&req).is_err());
        req.refund_amount = 54.85;
        assert!(check_refund(&req).is_ok());
    }
}
