pub mod booking;
pub mod calendar;
pub mod customer;
pub mod form;
pub mod notification;
pub mod slot;

pub use booking::{BookingDraft, BookingReceipt, DraftPatch, Price, VehicleClass};
pub use calendar::{CalendarCell, CalendarGrid, MonthLayout, MonthOffset};
pub use customer::{
    AccountUpdate, Credentials, CustomerPage, CustomerRecord, ListParams, ListQuery,
    PasswordReset, RefundRequest,
};
pub use form::{FieldDescriptor, FieldError, FieldName, FormMode};
pub use notification::{Notification, NotificationLevel};
pub use slot::{SlotStatus, TimeSlot};
