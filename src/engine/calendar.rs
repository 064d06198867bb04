//! Calendar projections of a classified day list.

use std::collections::HashMap;

use chrono::{Datelike, Duration, NaiveDate};
use serde::Serialize;

use super::{CycleDay, DayType};

/// Six weeks of seven days.
pub const MONTH_GRID_CELLS: usize = 42;

/// Two weeks starting on a Monday.
pub const WEEK_STRIP_DAYS: usize = 14;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct CalendarDayState {
    pub date: NaiveDate,
    pub number: u32,
    pub is_current_month: bool,
    pub is_period: bool,
    pub is_predicted_period: bool,
    pub is_fertile: bool,
    pub is_ovulation: bool,
    pub is_today: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MonthCalendar {
    pub month: NaiveDate,
    pub days: Vec<CalendarDayState>,
}

struct DayIndex<'a>(HashMap<NaiveDate, &'a CycleDay>);

impl<'a> DayIndex<'a> {
    fn new(days: &'a [CycleDay]) -> DayIndex<'a> {
        DayIndex(days.iter().map(|d| (d.date, d)).collect())
    }

    fn cell(&self, date: NaiveDate, is_current_month: bool, today: NaiveDate) -> CalendarDayState {
        let tagged = self.0.get(&date);
        let has = |day_type: DayType| tagged.is_some_and(|d| d.day_type == day_type);

        CalendarDayState {
            date,
            number: date.day(),
            is_current_month,
            is_period: has(DayType::Period),
            is_predicted_period: tagged.is_some_and(|d| d.day_type == DayType::Period && d.predicted),
            is_fertile: has(DayType::Fertile),
            is_ovulation: has(DayType::Ovulation),
            is_today: date == today,
        }
    }
}

/// Monday of the week containing `date`; `None` when that Monday is before
/// the first representable date.
pub fn week_start(date: NaiveDate) -> Option<NaiveDate> {
    date.checked_sub_signed(Duration::days(i64::from(date.weekday().num_days_from_monday())))
}

/// Month view padded with the tail of the previous month and the head of the
/// next one, always 42 cells starting on a Monday. `None` for an invalid month
/// or one whose grid would leave the representable range.
pub fn month_grid(year: i32, month: u32, days: &[CycleDay], today: NaiveDate) -> Option<MonthCalendar> {
    let first = NaiveDate::from_ymd_opt(year, month, 1)?;
    let grid_start = week_start(first)?;
    // The last cell must exist too.
    grid_start.checked_add_signed(Duration::days(MONTH_GRID_CELLS as i64 - 1))?;
    let index = DayIndex::new(days);

    let cells = grid_start
        .iter_days()
        .take(MONTH_GRID_CELLS)
        .map(|date| index.cell(date, date.year() == year && date.month() == month, today))
        .collect();

    Some(MonthCalendar { month: first, days: cells })
}

/// Up to `len` consecutive days from `start`, fewer at the end of the
/// representable range. Every cell counts as current month.
pub fn week_strip(start: NaiveDate, len: usize, days: &[CycleDay], today: NaiveDate) -> Vec<CalendarDayState> {
    let index = DayIndex::new(days);
    start.iter_days().take(len).map(|date| index.cell(date, true, today)).collect()
}
