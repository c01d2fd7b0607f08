use chrono::{Duration, NaiveDate, NaiveTime};
use serde::Deserialize;
use serde_with::DeserializeFromStr;
use std::fmt;
use std::str::FromStr;

use crate::conflict::ConflictCheck;
use crate::error::{Error, ErrorKind, Result};
use crate::parse;

/// Time of day as written in forms and configuration files (`HH:MM`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, DeserializeFromStr)]
pub struct ClockTime(pub NaiveTime);

impl FromStr for ClockTime {
    type Err = Error;
    fn from_str(s: &str) -> Result<Self> {
        parse::parse_time(s).map(ClockTime)
    }
}

impl fmt::Display for ClockTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.format("%H:%M"))
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct SlotSpec {
    pub first: ClockTime,
    pub last: ClockTime,
    pub step_minutes: u32,
}

impl Default for SlotSpec {
    fn default() -> Self {
        SlotSpec {
            first: ClockTime(NaiveTime::from_hms_opt(8, 0, 0).expect("08:00 is a valid time")),
            last: ClockTime(NaiveTime::from_hms_opt(18, 0, 0).expect("18:00 is a valid time")),
            step_minutes: 30,
        }
    }
}

impl SlotSpec {
    /// Every slot from `first` up to and including `last`.
    pub fn slots(&self) -> Vec<ClockTime> {
        if self.step_minutes == 0 {
            return vec![self.first];
        }

        let step = Duration::minutes(i64::from(self.step_minutes));
        let mut slots = Vec::new();
        let mut current = self.first.0;

        while current <= self.last.0 {
            slots.push(ClockTime(current));
            let (next, wrapped) = current.overflowing_add_signed(step);
            if wrapped != 0 {
                break;
            }
            current = next;
        }

        slots
    }
}

/// The row of time buttons on the appointment form: at most one is active.
#[derive(Debug, Clone)]
pub struct SlotPicker {
    slots: Vec<ClockTime>,
    active: Option<usize>,
}

impl SlotPicker {
    pub fn new(spec: &SlotSpec) -> Self {
        SlotPicker {
            slots: spec.slots(),
            active: None,
        }
    }

    pub fn slots(&self) -> &[ClockTime] {
        &self.slots
    }

    pub fn active(&self) -> Option<ClockTime> {
        self.active.map(|idx| self.slots[idx])
    }

    /// Activates the slot at `time` and returns the value for the form's time
    /// field. An unknown time leaves the current selection untouched.
    pub fn select(&mut self, time: &str) -> Result<String> {
        let time = ClockTime::from_str(time)?;
        let idx = self
            .slots
            .iter()
            .position(|slot| *slot == time)
            .ok_or_else(|| {
                Error::new(
                    ErrorKind::TimeParse,
                    &format!("{} is not an available slot", time),
                )
            })?;

        self.active = Some(idx);
        Ok(time.to_string())
    }

    /// Pairs every slot of `date` with the outcome of a conflict check.
    pub fn free_slots(
        &self,
        date: NaiveDate,
        checker: &dyn ConflictCheck,
    ) -> Vec<(ClockTime, Result<()>)> {
        self.slots
            .iter()
            .map(|slot| (*slot, checker.check(date, slot.0).map(|_| ())))
            .collect()
    }
}
