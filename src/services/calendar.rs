use chrono::{Datelike, NaiveDate};

use crate::models::{CalendarCell, CalendarGrid, MonthLayout, MonthOffset};

pub const GRID_CELLS: u32 = 42;

fn first_of_month(year: i32, month0: u32) -> anyhow::Result<NaiveDate> {
    if month0 > 11 {
        anyhow::bail!("month out of range: {month0} (expected 0-11)");
    }
    NaiveDate::from_ymd_opt(year, month0 + 1, 1)
        .ok_or_else(|| anyhow::anyhow!("invalid year/month: {year}-{month0}"))
}

fn shift_month(year: i32, month0: u32, delta: i32) -> (i32, u32) {
    let idx = year * 12 + month0 as i32 + delta;
    (idx.div_euclid(12), idx.rem_euclid(12) as u32)
}

/// Day count of the month: the day before the first of the following month.
pub fn days_in_month(year: i32, month0: u32) -> anyhow::Result<u32> {
    let first = first_of_month(year, month0)?;
    let (ny, nm) = shift_month(year, month0, 1);
    let next = first_of_month(ny, nm)?;
    Ok(next.signed_duration_since(first).num_days() as u32)
}

pub fn month_layout(year: i32, month0: u32) -> anyhow::Result<MonthLayout> {
    let first = first_of_month(year, month0)?;
    let days = days_in_month(year, month0)?;
    let first_weekday = first.weekday().num_days_from_sunday();
    let trailing_blanks = GRID_CELLS.saturating_sub(first_weekday + days);
    Ok(MonthLayout {
        days_in_month: days,
        first_weekday,
        trailing_blanks,
    })
}

/// Lays out six weeks: the tail of the previous month, every day of this
/// month, then next month's first days. Only current-month cells can carry
/// the today/selected flags.
pub fn build_grid(
    year: i32,
    month0: u32,
    today: NaiveDate,
    selected: Option<NaiveDate>,
) -> anyhow::Result<CalendarGrid> {
    let layout = month_layout(year, month0)?;
    let (py, pm) = shift_month(year, month0, -1);
    let prev_days = days_in_month(py, pm)?;

    let mut cells = Vec::with_capacity(GRID_CELLS as usize);
    for i in 0..layout.first_weekday {
        cells.push(CalendarCell {
            day_number: prev_days - layout.first_weekday + 1 + i,
            month_offset: MonthOffset::Prev,
            is_today: false,
            is_selected: false,
        });
    }

    let matches = |d: NaiveDate, day: u32| {
        d.year() == year && d.month0() == month0 && d.day() == day
    };
    for day in 1..=layout.days_in_month {
        cells.push(CalendarCell {
            day_number: day,
            month_offset: MonthOffset::Current,
            is_today: matches(today, day),
            is_selected: selected.is_some_and(|s| matches(s, day)),
        });
    }

    for day in 1..=layout.trailing_blanks {
        cells.push(CalendarCell {
            day_number: day,
            month_offset: MonthOffset::Next,
            is_today: false,
            is_selected: false,
        });
    }

    let title = first_of_month(year, month0)?.format("%B %Y").to_string();
    Ok(CalendarGrid {
        year,
        month: month0,
        title,
        layout,
        cells,
    })
}

/// The viewed month plus the picked day. Moving to another month drops the
/// selection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MonthCalendar {
    year: i32,
    month0: u32,
    selected: Option<NaiveDate>,
}

impl MonthCalendar {
    pub fn new(year: i32, month0: u32) -> anyhow::Result<Self> {
        first_of_month(year, month0)?;
        Ok(Self {
            year,
            month0,
            selected: None,
        })
    }

    /// Opens on today's month with today selected. The returned date is the
    /// default selection the host should be told about.
    pub fn mount(today: NaiveDate) -> (Self, NaiveDate) {
        let cal = Self {
            year: today.year(),
            month0: today.month0(),
            selected: Some(today),
        };
        (cal, today)
    }

    pub fn year(&self) -> i32 {
        self.year
    }

    pub fn month0(&self) -> u32 {
        self.month0
    }

    pub fn selected(&self) -> Option<NaiveDate> {
        self.selected
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        date.year() == self.year && date.month0() == self.month0
    }

    pub fn prev_month(&mut self) {
        let (y, m) = shift_month(self.year, self.month0, -1);
        self.year = y;
        self.month0 = m;
        self.selected = None;
    }

    pub fn next_month(&mut self) {
        let (y, m) = shift_month(self.year, self.month0, 1);
        self.year = y;
        self.month0 = m;
        self.selected = None;
    }

    /// Jumps to an arbitrary month. Returns whether the view moved.
    pub fn go_to(&mut self, year: i32, month0: u32) -> anyhow::Result<bool> {
        first_of_month(year, month0)?;
        if (year, month0) == (self.year, self.month0) {
            return Ok(false);
        }
        self.year = year;
        self.month0 = month0;
        self.selected = None;
        Ok(true)
    }

    pub fn select_day(&mut self, day: u32) -> anyhow::Result<NaiveDate> {
        let date = NaiveDate::from_ymd_opt(self.year, self.month0 + 1, day)
            .ok_or_else(|| anyhow::anyhow!("day {day} is not in the displayed month"))?;
        self.selected = Some(date);
        Ok(date)
    }

    pub fn select_date(&mut self, date: NaiveDate) -> anyhow::Result<()> {
        if !self.contains(date) {
            anyhow::bail!("{date} is not in the displayed month");
        }
        self.selected = Some(date);
        Ok(())
    }

    pub fn clear_selection(&mut self) {
        self.selected = None;
    }

    pub fn grid(&self, today: NaiveDate) -> anyhow::Result<CalendarGrid> {
        build_grid(self.year, self.month0, today, self.selected)
    }
}
