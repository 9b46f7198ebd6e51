use std::sync::{Arc, Weak};
use std::time::Duration;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use tokio::sync::Mutex;

use crate::errors::AppError;
use crate::models::{
    BookingDraft, BookingReceipt, CalendarGrid, DraftPatch, FieldName, FormMode, TimeSlot,
};
use crate::services::api::{ApiResult, BookingApi};
use crate::services::booking_flow::{self, BookingFlow, FlowState};
use crate::services::calendar::MonthCalendar;
use crate::services::disabled_dates::{DisabledDateSet, MonthTicket};
use crate::services::notify::Notifier;
use crate::services::slots::{SlotCache, SlotFetchOutcome, SlotSource, SlotTicket};
use crate::services::timer::TimerHandle;
use crate::services::validation::{self, Availability};

pub type SharedSession = Arc<Mutex<BookingSession>>;

pub const NO_SLOTS_WARNING: &str = "No available slots for this date";
pub const SLOTS_FAILED: &str = "Failed to load time slots";
pub const DATES_FAILED: &str = "Failed to load unavailable dates";

#[derive(Debug, Clone, Copy, Deserialize, PartialEq, Eq)]
#[serde(tag = "to", rename_all = "snake_case")]
pub enum MonthNav {
    Prev,
    Next,
    /// `month` is zero-based, like the grid.
    Month { year: i32, month: u32 },
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionView {
    pub id: String,
    pub mode: FormMode,
    pub calendar: CalendarGrid,
    pub min_date: NaiveDate,
    pub disabled_dates: Vec<NaiveDate>,
    pub available_slots: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub slots: Option<Vec<TimeSlot>>,
    pub draft: BookingDraft,
    pub flow: FlowState,
}

/// One open booking form: calendar, slot picker, draft and submission
/// state. Lives behind a `tokio::sync::Mutex`; network calls happen between
/// the `begin_*` and `apply_*` halves with the lock released.
#[derive(Debug)]
pub struct BookingSession {
    id: String,
    mode: FormMode,
    today: NaiveDate,
    calendar: MonthCalendar,
    disabled: DisabledDateSet,
    slots: SlotCache,
    draft: BookingDraft,
    flow: BookingFlow,
    notifier: Notifier,
}

fn empty_draft(mode: FormMode) -> BookingDraft {
    match mode {
        FormMode::SelfService => BookingDraft::default(),
        FormMode::Admin => BookingDraft::for_admin(),
    }
}

impl BookingSession {
    pub fn new(id: String, mode: FormMode, today: NaiveDate, notifier: Notifier) -> Self {
        let (calendar, _) = MonthCalendar::mount(today);
        Self {
            id,
            mode,
            today,
            calendar,
            disabled: DisabledDateSet::new(today),
            slots: SlotCache::new(),
            draft: empty_draft(mode),
            flow: BookingFlow::new(),
            notifier,
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn mode(&self) -> FormMode {
        self.mode
    }

    pub fn draft(&self) -> &BookingDraft {
        &self.draft
    }

    pub fn flow(&self) -> &FlowState {
        self.flow.state()
    }

    pub fn calendar(&self) -> &MonthCalendar {
        &self.calendar
    }

    pub fn disabled(&self) -> &DisabledDateSet {
        &self.disabled
    }

    pub fn slots(&self) -> &SlotCache {
        &self.slots
    }

    fn slot_source(&self) -> SlotSource {
        match self.mode {
            FormMode::SelfService => SlotSource::Customer,
            FormMode::Admin => SlotSource::Admin,
        }
    }

    pub fn view(&self) -> Result<SessionView, AppError> {
        let calendar = self
            .calendar
            .grid(self.today)
            .map_err(|e| AppError::BadRequest(e.to_string()))?;
        Ok(SessionView {
            id: self.id.clone(),
            mode: self.mode,
            calendar,
            min_date: self.disabled.min_date(),
            disabled_dates: self.disabled.excluded(),
            available_slots: self.slots.available_times(),
            slots: (self.mode == FormMode::Admin).then(|| self.slots.all_slots().to_vec()),
            draft: self.draft.clone(),
            flow: self.flow.state().clone(),
        })
    }

    pub fn begin_month_fetch(&mut self) -> MonthTicket {
        self.disabled
            .begin_fetch(self.calendar.year(), self.calendar.month0() + 1)
    }

    pub fn apply_month(&mut self, ticket: MonthTicket, result: ApiResult<Vec<NaiveDate>>) {
        match result {
            Ok(dates) => {
                self.disabled.complete_fetch(ticket, dates);
            }
            Err(e) => {
                tracing::warn!(session = %self.id, year = ticket.year, month = ticket.month, error = %e, "disabled dates fetch failed");
                self.notifier.error(DATES_FAILED, Some(&self.id));
            }
        }
    }

    /// Moves the calendar. The picked date and slot belong to the old month
    /// and are dropped with it.
    pub fn navigate(&mut self, nav: MonthNav) -> Result<bool, AppError> {
        let moved = match nav {
            MonthNav::Prev => {
                self.calendar.prev_month();
                true
            }
            MonthNav::Next => {
                self.calendar.next_month();
                true
            }
            MonthNav::Month { year, month } => self
                .calendar
                .go_to(year, month)
                .map_err(|e| AppError::BadRequest(e.to_string()))?,
        };
        if moved {
            self.draft.selected_date = None;
            self.draft.selected_time_slot = None;
            self.slots.clear();
        }
        Ok(moved)
    }

    /// Picks a date and clears the slot before any fetch goes out.
    pub fn begin_select_date(&mut self, date: NaiveDate) -> Result<SlotTicket, AppError> {
        if self.disabled.is_disabled(date) {
            return Err(AppError::validation(
                FieldName::SelectedDate,
                "Selected date is not available",
            ));
        }
        self.calendar
            .select_date(date)
            .map_err(|e| AppError::BadRequest(e.to_string()))?;
        self.draft.selected_date = Some(date);
        self.draft.selected_time_slot = None;
        Ok(self.slots.begin_fetch(date))
    }

    /// Stores a slot response. A date with nothing free joins the disabled
    /// set for the rest of the session and is deselected.
    pub fn apply_slots(
        &mut self,
        ticket: SlotTicket,
        result: ApiResult<Vec<TimeSlot>>,
    ) -> Option<SlotFetchOutcome> {
        let slots = match result {
            Ok(slots) => slots,
            Err(e) => {
                tracing::warn!(session = %self.id, date = %ticket.date, error = %e, "slot fetch failed");
                self.notifier.warning(SLOTS_FAILED, Some(&self.id));
                return None;
            }
        };
        let outcome = self.slots.complete_fetch(ticket, slots);
        if outcome.stale {
            return Some(outcome);
        }
        if outcome.exhausted {
            self.disabled.mark_exhausted(ticket.date);
            if self.draft.selected_date == Some(ticket.date) {
                self.draft.selected_date = None;
                self.draft.selected_time_slot = None;
                self.calendar.clear_selection();
            }
            self.notifier.warning(NO_SLOTS_WARNING, Some(&self.id));
        }
        Some(outcome)
    }

    pub fn select_slot(&mut self, time: &str) -> Result<(), AppError> {
        let Some(date) = self.draft.selected_date else {
            return Err(AppError::validation(
                FieldName::SelectedDate,
                "Date is required",
            ));
        };
        if !self.slots.is_available(date, time) {
            return Err(AppError::validation(
                FieldName::SelectedTimeSlot,
                "Selected time slot is no longer available",
            ));
        }
        self.draft.selected_time_slot = Some(time.to_string());
        Ok(())
    }

    pub fn update_draft(&mut self, patch: DraftPatch) {
        self.draft.apply(patch);
    }

    /// Validates and marks the flow as submitting. Returns the draft to send.
    pub fn begin_submit(&mut self) -> Result<BookingDraft, AppError> {
        self.flow.begin()?;
        let availability = Availability {
            disabled: &self.disabled,
            slots: &self.slots,
        };
        if let Err(errors) = validation::validate_draft(&self.draft, self.mode, Some(&availability))
        {
            self.flow.rejected();
            return Err(AppError::Validation(errors));
        }
        self.flow.submitting();
        Ok(self.draft.clone())
    }

    /// Records the outcome. On success the draft is spent; only the picked
    /// date carries over so its slots can be shown again.
    pub fn finish_submit(
        &mut self,
        result: Result<BookingReceipt, AppError>,
    ) -> Result<BookingReceipt, AppError> {
        match result {
            Ok(receipt) => {
                tracing::info!(session = %self.id, invoice = %receipt.invoice_number, "booking created");
                let date = self.draft.selected_date;
                self.draft = empty_draft(self.mode);
                self.draft.selected_date = date;
                self.flow.complete(receipt.clone());
                self.notifier.success("Booking confirmed", Some(&self.id));
                Ok(receipt)
            }
            Err(e) => {
                let message = booking_flow::failure_message(&e);
                tracing::warn!(session = %self.id, error = %e, "booking failed");
                self.flow.fail(message.clone());
                self.notifier.error(&message, Some(&self.id));
                Err(e)
            }
        }
    }

    pub fn arm_auto_dismiss(&mut self, timer: TimerHandle) {
        self.flow.arm_auto_dismiss(timer);
    }

    pub fn dismiss(&mut self) {
        self.flow.dismiss();
    }

    pub fn auto_dismiss_pending(&self) -> bool {
        self.flow.auto_dismiss_pending()
    }

    /// Moves "today" forward for a session left open across midnight.
    pub fn roll_today(&mut self, today: NaiveDate) {
        if today > self.today {
            tracing::debug!(session = %self.id, %today, "session rolled over to a new day");
            self.today = today;
            self.disabled.set_min_date(today);
        }
    }

    /// The form was closed. Pending timers go with it.
    pub fn close(&mut self) {
        self.flow.dismiss();
        self.slots.clear();
    }

    fn expire_completed(&mut self) {
        if matches!(self.flow.state(), FlowState::Completed { .. }) {
            tracing::debug!(session = %self.id, "auto-dismissing completed booking");
            self.flow.dismiss();
        }
    }
}

pub async fn refresh_month(api: &dyn BookingApi, session: &SharedSession) {
    let ticket = session.lock().await.begin_month_fetch();
    let result = api.fetch_disabled_dates(ticket.year, ticket.month).await;
    session.lock().await.apply_month(ticket, result);
}

pub async fn select_date(
    api: &dyn BookingApi,
    session: &SharedSession,
    date: NaiveDate,
) -> Result<Option<SlotFetchOutcome>, AppError> {
    let (ticket, source) = {
        let mut s = session.lock().await;
        (s.begin_select_date(date)?, s.slot_source())
    };
    let result = source.fetch(api, date).await;
    Ok(session.lock().await.apply_slots(ticket, result))
}

/// Builds a session on today's month. Today stays picked only if it can
/// actually be booked.
pub async fn open(
    api: &dyn BookingApi,
    notifier: Notifier,
    mode: FormMode,
    today: NaiveDate,
) -> SharedSession {
    let id = uuid::Uuid::new_v4().to_string();
    tracing::info!(session = %id, ?mode, %today, "booking session opened");
    let session = Arc::new(Mutex::new(BookingSession::new(id, mode, today, notifier)));

    refresh_month(api, &session).await;
    let bookable = !session.lock().await.disabled().is_disabled(today);
    if bookable {
        if let Err(e) = select_date(api, &session, today).await {
            tracing::debug!(error = %e, "could not pick today on open");
        }
    } else {
        session.lock().await.calendar.clear_selection();
    }
    session
}

pub async fn navigate(
    api: &dyn BookingApi,
    session: &SharedSession,
    nav: MonthNav,
) -> Result<(), AppError> {
    let moved = session.lock().await.navigate(nav)?;
    if moved {
        refresh_month(api, session).await;
    }
    Ok(())
}

/// Validate, send, record, then re-read the booked date. Customer forms
/// clear themselves after `auto_dismiss`.
pub async fn submit(
    api: &dyn BookingApi,
    session: &SharedSession,
    auto_dismiss: Duration,
) -> Result<BookingReceipt, AppError> {
    let (draft, mode) = {
        let mut s = session.lock().await;
        (s.begin_submit()?, s.mode())
    };

    let sent = booking_flow::send_booking(api, mode, &draft).await;
    let receipt = session.lock().await.finish_submit(sent)?;

    if let Some(date) = receipt.selected_date {
        let ticket = session.lock().await.slots.begin_fetch(date);
        let source = session.lock().await.slot_source();
        let result = source.fetch(api, date).await;
        session.lock().await.apply_slots(ticket, result);
    }

    if mode == FormMode::SelfService {
        let weak: Weak<Mutex<BookingSession>> = Arc::downgrade(session);
        let timer = TimerHandle::after(auto_dismiss, async move {
            if let Some(session) = weak.upgrade() {
                session.lock().await.expire_completed();
            }
        });
        session.lock().await.arm_auto_dismiss(timer);
    }
    Ok(receipt)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{NotificationLevel, SlotStatus, VehicleClass};
    use crate::services::api::mock::MockApi;

    fn d(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    fn fill_in(session: &mut BookingSession) {
        session.update_draft(DraftPatch {
            first_name: Some("Jane".into()),
            last_name: Some("Doe".into()),
            email: Some("jane@example.com".into()),
            contact_number: Some("07123456789".into()),
            class_selection: Some("class4".into()),
            aware_of_cancellation_policy: Some(true),
            ..Default::default()
        });
    }

    fn june_api() -> MockApi {
        MockApi::new().with_slots(
            d("2025-06-02"),
            &[
                ("9:00", SlotStatus::Available),
                ("9:15", SlotStatus::Booked),
                ("9:30", SlotStatus::Available),
            ],
        )
    }

    #[tokio::test]
    async fn test_open_picks_today_and_fetches() {
        let api = june_api();
        let session = open(&api, Notifier::new(8), FormMode::SelfService, d("2025-06-02")).await;
        let s = session.lock().await;
        assert_eq!(s.draft().selected_date, Some(d("2025-06-02")));
        assert_eq!(s.calendar().selected(), Some(d("2025-06-02")));
        assert_eq!(s.slots().available_times(), vec!["9:00", "9:30"]);
        assert_eq!(
            api.calls(),
            vec!["fetch_disabled 2025-06", "fetch_slots 2025-06-02"]
        );
    }

    #[tokio::test]
    async fn test_open_on_weekend_leaves_nothing_picked() {
        let api = MockApi::new();
        // 7 June 2025 is a Saturday.
        let session = open(&api, Notifier::new(8), FormMode::SelfService, d("2025-06-07")).await;
        let s = session.lock().await;
        assert_eq!(s.draft().selected_date, None);
        assert_eq!(s.calendar().selected(), None);
        assert_eq!(api.calls(), vec!["fetch_disabled 2025-06"]);
    }

    #[tokio::test]
    async fn test_march_to_april_clears_and_fetches() {
        let api = MockApi::new().with_slots(d("2025-03-14"), &[("10:00", SlotStatus::Available)]);
        let session = open(&api, Notifier::new(8), FormMode::SelfService, d("2025-03-14")).await;
        session.lock().await.select_slot("10:00").unwrap();

        navigate(&api, &session, MonthNav::Next).await.unwrap();
        let s = session.lock().await;
        assert_eq!(s.calendar().selected(), None);
        assert_eq!(s.draft().selected_date, None);
        assert_eq!(s.draft().selected_time_slot, None);
        assert!(s.slots().all_slots().is_empty());
        assert_eq!(api.calls().last().unwrap(), "fetch_disabled 2025-04");
    }

    #[tokio::test]
    async fn test_date_switch_clears_slot_before_fetch() {
        let api = june_api();
        let session = open(&api, Notifier::new(8), FormMode::SelfService, d("2025-06-02")).await;
        let mut s = session.lock().await;
        s.select_slot("9:00").unwrap();
        let ticket = s.begin_select_date(d("2025-06-03")).unwrap();
        assert_eq!(s.draft().selected_time_slot, None);
        assert!(s.slots().available_times().is_empty());
        assert_eq!(ticket.date, d("2025-06-03"));
    }

    #[tokio::test]
    async fn test_zero_available_disables_date_with_warning() {
        let api = MockApi::new().with_slots(d("2025-06-03"), &[("9:00", SlotStatus::Booked)]);
        let notifier = Notifier::new(8);
        let mut rx = notifier.subscribe();
        let session = open(&api, notifier, FormMode::SelfService, d("2025-06-02")).await;
        // Today had no slots either.
        let first = rx.recv().await.unwrap();
        assert_eq!(first.message, NO_SLOTS_WARNING);

        let outcome = select_date(&api, &session, d("2025-06-03"))
            .await
            .unwrap()
            .unwrap();
        assert!(outcome.exhausted);
        let n = rx.recv().await.unwrap();
        assert_eq!(n.level, NotificationLevel::Warning);
        assert_eq!(n.message, NO_SLOTS_WARNING);

        let s = session.lock().await;
        assert!(s.disabled().is_disabled(d("2025-06-03")));
        assert_eq!(s.draft().selected_date, None);
    }

    #[tokio::test]
    async fn test_disabled_date_cannot_be_picked() {
        let api = MockApi::new().with_disabled(2025, 6, &[d("2025-06-04")]);
        let session = open(&api, Notifier::new(8), FormMode::SelfService, d("2025-06-02")).await;
        let err = select_date(&api, &session, d("2025-06-04")).await.unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));
        let err = select_date(&api, &session, d("2025-06-01")).await.unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));
        let err = select_date(&api, &session, d("2025-07-01")).await.unwrap_err();
        assert!(matches!(err, AppError::BadRequest(_)));
    }

    #[tokio::test]
    async fn test_slot_fetch_failure_keeps_list_and_warns() {
        let api = june_api();
        let notifier = Notifier::new(8);
        let mut rx = notifier.subscribe();
        let session = open(&api, notifier, FormMode::SelfService, d("2025-06-02")).await;
        *api.fail_fetch.lock().unwrap() = true;

        let ticket = session.lock().await.slots.begin_fetch(d("2025-06-02"));
        let result = api.fetch_slots(d("2025-06-02")).await;
        assert!(session.lock().await.apply_slots(ticket, result).is_none());
        assert_eq!(rx.recv().await.unwrap().message, SLOTS_FAILED);
        assert_eq!(
            session.lock().await.slots().available_times(),
            vec!["9:00", "9:30"]
        );
    }

    #[tokio::test]
    async fn test_unavailable_slot_rejected() {
        let api = june_api();
        let session = open(&api, Notifier::new(8), FormMode::SelfService, d("2025-06-02")).await;
        let mut s = session.lock().await;
        assert!(s.select_slot("9:15").is_err());
        assert!(s.select_slot("11:00").is_err());
        s.select_slot("9:30").unwrap();
        assert_eq!(s.draft().selected_time_slot.as_deref(), Some("9:30"));
    }

    #[tokio::test]
    async fn test_missing_contact_never_reaches_network() {
        let api = june_api();
        let session = open(&api, Notifier::new(8), FormMode::SelfService, d("2025-06-02")).await;
        {
            let mut s = session.lock().await;
            fill_in(&mut s);
            s.update_draft(DraftPatch {
                contact_number: Some(String::new()),
                ..Default::default()
            });
            s.select_slot("9:00").unwrap();
        }
        let before = api.calls().len();
        let err = submit(&api, &session, Duration::from_secs(5))
            .await
            .unwrap_err();
        match err {
            AppError::Validation(errors) => {
                assert_eq!(errors.len(), 1);
                assert_eq!(errors[0].field, FieldName::ContactNumber);
                assert_eq!(errors[0].message, "Contact number is required");
            }
            other => panic!("expected validation error, got {other:?}"),
        }
        assert_eq!(api.calls().len(), before);
        assert_eq!(session.lock().await.flow(), &FlowState::Idle);
    }

    #[tokio::test(start_paused = true)]
    async fn test_submit_completes_refreshes_and_auto_dismisses() {
        let api = june_api();
        let session = open(&api, Notifier::new(8), FormMode::SelfService, d("2025-06-02")).await;
        {
            let mut s = session.lock().await;
            fill_in(&mut s);
            s.select_slot("9:00").unwrap();
            assert_eq!(s.draft().class_selection, Some(VehicleClass::Class4));
        }

        let receipt = submit(&api, &session, Duration::from_secs(5)).await.unwrap();
        assert_eq!(receipt.invoice_number, "INV-1001");
        assert_eq!(receipt.amount, "54.85");
        let calls = api.calls();
        assert_eq!(
            &calls[calls.len() - 3..],
            &[
                "check 07123456789",
                "create 07123456789",
                "fetch_slots 2025-06-02",
            ]
        );
        {
            let s = session.lock().await;
            assert!(matches!(s.flow(), FlowState::Completed { .. }));
            assert_eq!(s.slots().available_times(), vec!["9:30"]);
            assert!(s.draft().first_name.is_empty());
        }

        tokio::time::sleep(Duration::from_secs(6)).await;
        assert_eq!(session.lock().await.flow(), &FlowState::Idle);
    }

    #[tokio::test]
    async fn test_conflict_fails_flow_and_dismiss_resets() {
        let api = june_api();
        *api.check.lock().unwrap() = Some(crate::services::api::CheckResponse {
            success: false,
            message: None,
        });
        let session = open(&api, Notifier::new(8), FormMode::SelfService, d("2025-06-02")).await;
        {
            let mut s = session.lock().await;
            fill_in(&mut s);
            s.select_slot("9:00").unwrap();
        }
        let err = submit(&api, &session, Duration::from_secs(5))
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::AvailabilityConflict(_)));
        let mut s = session.lock().await;
        assert!(matches!(s.flow(), FlowState::Failed { .. }));
        assert_eq!(s.draft().first_name, "Jane");
        s.dismiss();
        assert_eq!(s.flow(), &FlowState::Idle);
    }

    #[tokio::test]
    async fn test_duplicate_submit_is_busy() {
        let api = june_api();
        let session = open(&api, Notifier::new(8), FormMode::SelfService, d("2025-06-02")).await;
        let mut s = session.lock().await;
        fill_in(&mut s);
        s.select_slot("9:00").unwrap();
        s.begin_submit().unwrap();
        assert!(matches!(s.begin_submit(), Err(AppError::Busy(_))));
    }

    #[tokio::test]
    async fn test_admin_session_sees_all_slots() {
        let api = june_api();
        let session = open(&api, Notifier::new(8), FormMode::Admin, d("2025-06-02")).await;
        let view = session.lock().await.view().unwrap();
        assert_eq!(view.slots.map(|s| s.len()), Some(3));
        assert_eq!(
            api.calls(),
            vec!["fetch_disabled 2025-06", "fetch_admin_slots 2025-06-02"]
        );
        assert_eq!(view.available_slots, vec!["9:00", "9:30"]);
        assert!(view.draft.aware_of_cancellation_policy);
    }

    #[tokio::test(start_paused = true)]
    async fn test_close_cancels_auto_dismiss() {
        let api = june_api();
        let session = open(&api, Notifier::new(8), FormMode::SelfService, d("2025-06-02")).await;
        {
            let mut s = session.lock().await;
            fill_in(&mut s);
            s.select_slot("9:00").unwrap();
        }
        submit(&api, &session, Duration::from_secs(5)).await.unwrap();
        assert!(session.lock().await.auto_dismiss_pending());

        session.lock().await.close();
        let s = session.lock().await;
        assert!(!s.auto_dismiss_pending());
        assert_eq!(s.flow(), &FlowState::Idle);
        assert!(s.slots().all_slots().is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn test_dropped_session_is_freed_while_timer_armed() {
        let api = june_api();
        let session = open(&api, Notifier::new(8), FormMode::SelfService, d("2025-06-02")).await;
        {
            let mut s = session.lock().await;
            fill_in(&mut s);
            s.select_slot("9:00").unwrap();
        }
        submit(&api, &session, Duration::from_secs(5)).await.unwrap();

        let weak = Arc::downgrade(&session);
        drop(session);
        assert!(weak.upgrade().is_none());
        tokio::time::sleep(Duration::from_secs(6)).await;
    }

    #[tokio::test]
    async fn test_roll_today_moves_min_date() {
        let api = june_api();
        let session = open(&api, Notifier::new(8), FormMode::SelfService, d("2025-06-02")).await;
        let mut s = session.lock().await;
        assert!(!s.disabled().is_disabled(d("2025-06-02")));

        s.roll_today(d("2025-06-03"));
        assert!(s.disabled().is_disabled(d("2025-06-02")));
        assert_eq!(s.view().unwrap().min_date, d("2025-06-03"));

        s.roll_today(d("2025-06-01"));
        assert_eq!(s.disabled().min_date(), d("2025-06-03"));
    }
}
