use chrono::NaiveDate;

use crate::errors::AppError;
use crate::models::slot::parse_slot_time;
use crate::models::{SlotStatus, TimeSlot};
use crate::services::api::{ApiResult, BookingApi};

#[derive(Debug, thiserror::Error, PartialEq)]
pub enum SlotError {
    #[error("no time slots given")]
    Empty,
    #[error("invalid time slot: {0}")]
    InvalidTime(String),
    #[error("time slot {0} is booked and cannot be changed")]
    Booked(String),
}

impl From<SlotError> for AppError {
    fn from(e: SlotError) -> Self {
        AppError::BadRequest(e.to_string())
    }
}

/// Which backend listing feeds the cache. Staff see every status.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SlotSource {
    Customer,
    Admin,
}

impl SlotSource {
    pub async fn fetch(&self, api: &dyn BookingApi, date: NaiveDate) -> ApiResult<Vec<TimeSlot>> {
        match self {
            SlotSource::Customer => api.fetch_slots(date).await,
            SlotSource::Admin => api.fetch_admin_slots(date).await,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SlotMutation {
    Block,
    Unblock,
}

impl SlotMutation {
    pub fn as_str(&self) -> &'static str {
        match self {
            SlotMutation::Block => "block",
            SlotMutation::Unblock => "unblock",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SlotTicket {
    pub generation: u64,
    pub date: NaiveDate,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SlotFetchOutcome {
    /// The response was older than the latest request and was dropped.
    pub stale: bool,
    /// Not a single Available slot on the date.
    pub exhausted: bool,
    pub available: usize,
}

/// Read-through cache of one date's slots. Nothing is kept across dates.
#[derive(Debug, Clone, Default)]
pub struct SlotCache {
    date: Option<NaiveDate>,
    slots: Vec<TimeSlot>,
    generation: u64,
    pending_mutation: bool,
}

impl SlotCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn date(&self) -> Option<NaiveDate> {
        self.date
    }

    pub fn pending_mutation(&self) -> bool {
        self.pending_mutation
    }

    pub fn all_slots(&self) -> &[TimeSlot] {
        &self.slots
    }

    pub fn available_times(&self) -> Vec<String> {
        self.slots
            .iter()
            .filter(|s| s.is_available())
            .map(|s| s.time.clone())
            .collect()
    }

    /// True only if `time` is Available in the list last fetched for `date`.
    pub fn is_available(&self, date: NaiveDate, time: &str) -> bool {
        self.date == Some(date)
            && self
                .slots
                .iter()
                .any(|s| s.time == time && s.is_available())
    }

    pub fn clear(&mut self) {
        self.generation += 1;
        self.date = None;
        self.slots.clear();
    }

    /// Starts a fetch. A new date empties the list straight away.
    pub fn begin_fetch(&mut self, date: NaiveDate) -> SlotTicket {
        if self.date != Some(date) {
            self.slots.clear();
        }
        self.date = Some(date);
        self.generation += 1;
        SlotTicket {
            generation: self.generation,
            date,
        }
    }

    pub fn complete_fetch(&mut self, ticket: SlotTicket, slots: Vec<TimeSlot>) -> SlotFetchOutcome {
        if ticket.generation != self.generation || self.date != Some(ticket.date) {
            tracing::debug!(date = %ticket.date, "dropping superseded slot response");
            return SlotFetchOutcome {
                stale: true,
                ..Default::default()
            };
        }
        self.slots = slots;
        let available = self.slots.iter().filter(|s| s.is_available()).count();
        SlotFetchOutcome {
            stale: false,
            exhausted: available == 0,
            available,
        }
    }

    pub async fn refresh(
        &mut self,
        api: &dyn BookingApi,
        source: SlotSource,
        date: NaiveDate,
    ) -> ApiResult<SlotFetchOutcome> {
        let ticket = self.begin_fetch(date);
        let slots = source.fetch(api, date).await?;
        Ok(self.complete_fetch(ticket, slots))
    }

    /// Checks times before a block or unblock goes out. Booked slots belong
    /// to customers and are never changed from here.
    pub fn check_mutable(&self, date: NaiveDate, times: &[String]) -> Result<(), SlotError> {
        if times.is_empty() {
            return Err(SlotError::Empty);
        }
        for time in times {
            parse_slot_time(time).map_err(|_| SlotError::InvalidTime(time.clone()))?;
            let booked = self.date == Some(date)
                && self
                    .slots
                    .iter()
                    .any(|s| &s.time == time && s.status == SlotStatus::Booked);
            if booked {
                return Err(SlotError::Booked(time.clone()));
            }
        }
        Ok(())
    }

    /// Sends the block/unblock, then re-reads the date. The cached statuses
    /// only change through that re-read.
    pub async fn mutate(
        &mut self,
        api: &dyn BookingApi,
        mutation: SlotMutation,
        date: NaiveDate,
        times: &[String],
    ) -> Result<SlotFetchOutcome, AppError> {
        self.check_mutable(date, times)?;
        self.pending_mutation = true;

        let sent = match mutation {
            SlotMutation::Block => api.block_slots(date, times).await,
            SlotMutation::Unblock => api.unblock_slots(date, times).await,
        };
        if let Err(e) = sent {
            self.pending_mutation = false;
            tracing::warn!(%date, action = mutation.as_str(), error = %e, "slot update rejected");
            return Err(e.into());
        }
        tracing::info!(%date, action = mutation.as_str(), slots = ?times, "slots updated");

        let refreshed = self.refresh(api, SlotSource::Admin, date).await;
        self.pending_mutation = false;
        Ok(refreshed?)
    }
}
