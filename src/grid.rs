use chrono::{Datelike, NaiveDate};
use std::collections::BTreeMap;

use crate::calendar::{CalendarMonth, WeekStart};
use crate::error::Result;
use crate::navigator::NavigationTarget;

pub const GRID_ROWS: usize = 6;
pub const GRID_COLUMNS: usize = 7;
pub const GRID_CELLS: usize = GRID_ROWS * GRID_COLUMNS;

/// Appointment summaries keyed by day of month.
pub type AppointmentsByDay = BTreeMap<u32, Vec<String>>;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Day {
    num: u32,
    is_today: bool,
    indicators: Vec<String>,
    target: NavigationTarget,
}

impl Day {
    pub fn num(&self) -> u32 {
        self.num
    }

    pub fn is_today(&self) -> bool {
        self.is_today
    }

    pub fn indicators(&self) -> &[String] {
        &self.indicators
    }

    pub fn target(&self) -> &NavigationTarget {
        &self.target
    }
}

/// One slot of the month grid.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DayCell {
    Empty,
    Day(Day),
}

impl DayCell {
    pub fn is_empty(&self) -> bool {
        matches!(self, DayCell::Empty)
    }

    pub fn day(&self) -> Option<&Day> {
        match self {
            DayCell::Day(day) => Some(day),
            DayCell::Empty => None,
        }
    }

    pub fn day_num(&self) -> Option<u32> {
        self.day().map(Day::num)
    }

    pub fn is_today(&self) -> bool {
        self.day().map_or(false, Day::is_today)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MonthGrid {
    month: CalendarMonth,
    week_start: WeekStart,
    cells: Vec<DayCell>,
}

impl MonthGrid {
    pub fn month(&self) -> CalendarMonth {
        self.month
    }

    pub fn week_start(&self) -> WeekStart {
        self.week_start
    }

    pub fn cells(&self) -> &[DayCell] {
        &self.cells
    }

    pub fn rows(&self) -> impl Iterator<Item = &[DayCell]> {
        self.cells.chunks(GRID_COLUMNS)
    }

    pub fn days(&self) -> impl Iterator<Item = &Day> {
        self.cells.iter().filter_map(DayCell::day)
    }

    pub fn day(&self, num: u32) -> Option<&Day> {
        self.days().find(|day| day.num == num)
    }

    pub fn day_count(&self) -> usize {
        self.days().count()
    }

    pub fn leading_empty(&self) -> usize {
        self.cells.iter().take_while(|cell| cell.is_empty()).count()
    }

    pub fn today(&self) -> Option<&Day> {
        self.days().find(|day| day.is_today)
    }
}

/// Builds the 6x7 grid of `month0` (zero-based, normalized against `year`).
///
/// Leading cells up to the weekday of the first are empty, followed by every
/// day of the month in order, followed by empty cells up to the full grid.
/// Indicators are taken from `appointments`; days without an entry have none.
pub fn build(
    year: i32,
    month0: i32,
    week_start: WeekStart,
    today: NaiveDate,
    appointments: &AppointmentsByDay,
) -> Result<MonthGrid> {
    let month = CalendarMonth::new(year, month0)?;
    Ok(build_month(month, week_start, today, appointments))
}

pub fn build_month(
    month: CalendarMonth,
    week_start: WeekStart,
    today: NaiveDate,
    appointments: &AppointmentsByDay,
) -> MonthGrid {
    let num_days = month.days();
    let offset = month
        .first_day()
        .map_or(0, |first| week_start.column_of(first.weekday())) as usize;

    let today_num = if month.contains(&today) {
        Some(today.day())
    } else {
        None
    };

    let days = (1..=num_days).filter_map(|num| {
        // `CalendarMonth` guarantees every day up to `days()` exists
        let date = month.date(num).ok()?;
        Some(DayCell::Day(Day {
            num,
            is_today: today_num == Some(num),
            indicators: appointments.get(&num).cloned().unwrap_or_default(),
            target: NavigationTarget::new(date),
        }))
    });

    let cells: Vec<DayCell> = std::iter::repeat_with(|| DayCell::Empty)
        .take(offset)
        .chain(days)
        .chain(std::iter::repeat_with(|| DayCell::Empty))
        .take(GRID_CELLS)
        .collect();

    log::debug!(
        "Built grid for {} ({} days, {} leading empty cells)",
        month,
        num_days,
        offset
    );

    MonthGrid {
        month,
        week_start,
        cells,
    }
}
