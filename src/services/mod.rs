pub mod api;
pub mod auth;
pub mod booking_flow;
pub mod calendar;
pub mod disabled_dates;
pub mod notify;
pub mod session;
pub mod slots;
pub mod timer;
pub mod validation;
