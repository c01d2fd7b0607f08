use chrono::{Datelike, NaiveDate, Weekday};
use serde::Deserialize;
use std::convert::TryFrom;
use std::fmt;

use crate::error::{Error, ErrorKind, Result};

const MONTH_NAMES: [&str; 12] = [
    "Janeiro",
    "Fevereiro",
    "Março",
    "Abril",
    "Maio",
    "Junho",
    "Julho",
    "Agosto",
    "Setembro",
    "Outubro",
    "Novembro",
    "Dezembro",
];

/// Weekday labels, Monday first.
const WEEKDAY_LABELS: [&str; 7] = ["Seg", "Ter", "Qua", "Qui", "Sex", "Sáb", "Dom"];

/// Which weekday occupies the leftmost column of a month grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WeekStart {
    Monday,
    Sunday,
}

impl Default for WeekStart {
    fn default() -> Self {
        WeekStart::Monday
    }
}

impl WeekStart {
    /// Column of `weekday` under this convention, 0 being the first column.
    pub fn column_of(&self, weekday: Weekday) -> u32 {
        match self {
            WeekStart::Monday => weekday.num_days_from_monday(),
            WeekStart::Sunday => weekday.num_days_from_sunday(),
        }
    }

    pub fn labels(&self) -> [&'static str; 7] {
        let mut labels = WEEKDAY_LABELS;
        if let WeekStart::Sunday = self {
            labels.rotate_right(1);
        }
        labels
    }
}

/// A month of a year. The month is stored zero-based: 0 is January.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct CalendarMonth {
    year: i32,
    month0: u32,
}

impl CalendarMonth {
    /// Normalizes `month0` into the range 0..12, carrying into `year`.
    pub fn new(year: i32, month0: i32) -> Result<Self> {
        let total = i64::from(year) * 12 + i64::from(month0);
        let invalid = || {
            Error::new(
                ErrorKind::InvalidDate,
                &format!("year {} month {} is out of range", year, month0),
            )
        };

        let year = i32::try_from(total.div_euclid(12)).map_err(|_| invalid())?;
        let month0 = total.rem_euclid(12) as u32;

        // Both the first of this month and of the following one must exist
        // for the day count to be defined.
        let month = CalendarMonth { year, month0 };
        month.first_day().ok_or_else(invalid)?;
        month.first_of_next().ok_or_else(invalid)?;

        Ok(month)
    }

    pub fn year(&self) -> i32 {
        self.year
    }

    pub fn month0(&self) -> u32 {
        self.month0
    }

    pub fn name(&self) -> &'static str {
        MONTH_NAMES[self.month0 as usize]
    }

    pub fn first_day(&self) -> Option<NaiveDate> {
        NaiveDate::from_ymd_opt(self.year, self.month0 + 1, 1)
    }

    fn first_of_next(&self) -> Option<NaiveDate> {
        if self.month0 == 11 {
            NaiveDate::from_ymd_opt(self.year.checked_add(1)?, 1, 1)
        } else {
            NaiveDate::from_ymd_opt(self.year, self.month0 + 2, 1)
        }
    }

    pub fn days(&self) -> u32 {
        match (self.first_day(), self.first_of_next()) {
            (Some(first), Some(next)) => next.signed_duration_since(first).num_days() as u32,
            _ => 0,
        }
    }

    pub fn date(&self, day: u32) -> Result<NaiveDate> {
        NaiveDate::from_ymd_opt(self.year, self.month0 + 1, day).ok_or_else(|| {
            Error::new(
                ErrorKind::InvalidDate,
                &format!("{} has no day {}", self, day),
            )
        })
    }

    pub fn contains<T: Datelike>(&self, date: &T) -> bool {
        date.year() == self.year && date.month0() == self.month0
    }

    pub fn offset(&self, months: i32) -> Result<Self> {
        let month0 = i64::from(self.month0) + i64::from(months);
        let month0 = i32::try_from(month0).map_err(|_| Error::from(ErrorKind::InvalidDate))?;
        CalendarMonth::new(self.year, month0)
    }

    pub fn succ(&self) -> Result<Self> {
        self.offset(1)
    }

    pub fn pred(&self) -> Result<Self> {
        self.offset(-1)
    }
}

impl<T: Datelike> From<&T> for CalendarMonth {
    fn from(date: &T) -> Self {
        CalendarMonth {
            year: date.year(),
            month0: date.month0(),
        }
    }
}

impl fmt::Display for CalendarMonth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.name(), self.year)
    }
}
