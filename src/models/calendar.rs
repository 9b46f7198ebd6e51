use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum MonthOffset {
    Prev,
    Current,
    Next,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct CalendarCell {
    pub day_number: u32,
    pub month_offset: MonthOffset,
    pub is_today: bool,
    pub is_selected: bool,
}

impl CalendarCell {
    pub fn is_selectable(&self) -> bool {
        self.month_offset == MonthOffset::Current
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct MonthLayout {
    pub days_in_month: u32,
    /// 0 = Sunday.
    pub first_weekday: u32,
    pub trailing_blanks: u32,
}

/// A rendered month. `month` is zero-based.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CalendarGrid {
    pub year: i32,
    pub month: u32,
    pub title: String,
    pub layout: MonthLayout,
    pub cells: Vec<CalendarCell>,
}

impl CalendarGrid {
    pub fn current_cells(&self) -> impl Iterator<Item = &CalendarCell> {
        self.cells
            .iter()
            .filter(|c| c.month_offset == MonthOffset::Current)
    }
}
