use std::collections::BTreeSet;

use chrono::{Datelike, NaiveDate, Weekday};

use crate::services::api::{ApiResult, BookingApi};

/// Saturdays and Sundays are never bookable.
pub fn is_weekday(date: NaiveDate) -> bool {
    !matches!(date.weekday(), Weekday::Sat | Weekday::Sun)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MonthTicket {
    pub generation: u64,
    pub year: i32,
    pub month: u32,
}

/// Dates the picker must not offer. Four sources:
/// weekends, anything before `min_date`, what the backend reported for the
/// viewed month, and dates this session found to have no free slots.
/// The last set only ever grows.
#[derive(Debug, Clone)]
pub struct DisabledDateSet {
    min_date: NaiveDate,
    fetched: BTreeSet<NaiveDate>,
    exhausted: BTreeSet<NaiveDate>,
    generation: u64,
}

impl DisabledDateSet {
    pub fn new(today: NaiveDate) -> Self {
        Self {
            min_date: today,
            fetched: BTreeSet::new(),
            exhausted: BTreeSet::new(),
            generation: 0,
        }
    }

    pub fn min_date(&self) -> NaiveDate {
        self.min_date
    }

    pub fn set_min_date(&mut self, today: NaiveDate) {
        self.min_date = today;
    }

    pub fn is_disabled(&self, date: NaiveDate) -> bool {
        date < self.min_date
            || !is_weekday(date)
            || self.fetched.contains(&date)
            || self.exhausted.contains(&date)
    }

    /// Returns true if the date was not already ratcheted.
    pub fn mark_exhausted(&mut self, date: NaiveDate) -> bool {
        self.exhausted.insert(date)
    }

    /// Backend-reported plus session-ratcheted dates, for the picker's
    /// exclusion list.
    pub fn excluded(&self) -> Vec<NaiveDate> {
        self.fetched.union(&self.exhausted).copied().collect()
    }

    /// Every day of the given month the picker has to grey out.
    pub fn disabled_in_month(&self, year: i32, month: u32) -> Vec<NaiveDate> {
        let Some(first) = NaiveDate::from_ymd_opt(year, month, 1) else {
            return Vec::new();
        };
        first
            .iter_days()
            .take_while(|d| d.month() == month)
            .filter(|d| self.is_disabled(*d))
            .collect()
    }

    pub fn begin_fetch(&mut self, year: i32, month: u32) -> MonthTicket {
        self.generation += 1;
        MonthTicket {
            generation: self.generation,
            year,
            month,
        }
    }

    /// Applies a fetch result. A superseded ticket is ignored, and so is a
    /// failed fetch, which leaves the previous dates in place. Returns
    /// whether the set changed.
    pub fn complete_fetch(&mut self, ticket: MonthTicket, dates: Vec<NaiveDate>) -> bool {
        if ticket.generation != self.generation {
            tracing::debug!(
                year = ticket.year,
                month = ticket.month,
                "dropping superseded disabled-date response"
            );
            return false;
        }
        self.fetched = dates.into_iter().collect();
        true
    }

    pub async fn refresh(&mut self, api: &dyn BookingApi, year: i32, month: u32) -> ApiResult<()> {
        let ticket = self.begin_fetch(year, month);
        let dates = api.fetch_disabled_dates(year, month).await?;
        self.complete_fetch(ticket, dates);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::api::mock::MockApi;

    fn d(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    #[test]
    fn test_is_weekday_full_year() {
        let mut day = d("2025-01-01");
        let mut weekdays = 0;
        while day.year() == 2025 {
            let expected = !matches!(day.weekday(), Weekday::Sat | Weekday::Sun);
            assert_eq!(is_weekday(day), expected, "{day}");
            if expected {
                weekdays += 1;
            }
            day = day.succ_opt().unwrap();
        }
        assert_eq!(weekdays, 261);
    }

    #[test]
    fn test_past_dates_always_disabled() {
        let set = DisabledDateSet::new(d("2025-06-04"));
        assert!(set.is_disabled(d("2025-06-03")));
        assert!(!set.is_disabled(d("2025-06-04")));
        assert!(!set.is_disabled(d("2025-06-05")));
    }

    #[test]
    fn test_weekend_disabled() {
        let set = DisabledDateSet::new(d("2025-06-01"));
        assert!(set.is_disabled(d("2025-06-07")));
        assert!(set.is_disabled(d("2025-06-08")));
        assert!(!set.is_disabled(d("2025-06-09")));
    }

    #[test]
    fn test_ratchet_survives_refetch() {
        let mut set = DisabledDateSet::new(d("2025-06-01"));
        let t = set.begin_fetch(2025, 6);
        set.complete_fetch(t, vec![d("2025-06-10")]);
        assert!(set.mark_exhausted(d("2025-06-11")));
        assert!(!set.mark_exhausted(d("2025-06-11")));

        let t = set.begin_fetch(2025, 6);
        set.complete_fetch(t, vec![]);
        assert!(!set.is_disabled(d("2025-06-10")));
        assert!(set.is_disabled(d("2025-06-11")));
        assert_eq!(set.excluded(), vec![d("2025-06-11")]);
    }

    #[test]
    fn test_stale_month_response_dropped() {
        let mut set = DisabledDateSet::new(d("2025-03-01"));
        let march = set.begin_fetch(2025, 3);
        let april = set.begin_fetch(2025, 4);
        assert!(set.complete_fetch(april, vec![d("2025-04-08")]));
        assert!(!set.complete_fetch(march, vec![d("2025-03-12")]));
        assert!(!set.is_disabled(d("2025-03-12")));
        assert!(set.is_disabled(d("2025-04-08")));
    }

    #[test]
    fn test_disabled_in_month() {
        let mut set = DisabledDateSet::new(d("2025-06-01"));
        set.mark_exhausted(d("2025-06-02"));
        let days = set.disabled_in_month(2025, 6);
        // 9 weekend days in June 2025 plus the ratcheted Monday.
        assert_eq!(days.len(), 10);
        assert!(days.contains(&d("2025-06-02")));
        assert!(set.disabled_in_month(2025, 13).is_empty());
    }

    #[tokio::test]
    async fn test_refresh_applies_backend_dates() {
        let api = MockApi::new().with_disabled(2025, 6, &[d("2025-06-10")]);
        let mut set = DisabledDateSet::new(d("2025-06-01"));
        set.refresh(&api, 2025, 6).await.unwrap();
        assert!(set.is_disabled(d("2025-06-10")));
        assert_eq!(api.calls(), vec!["fetch_disabled 2025-06"]);
    }
}
