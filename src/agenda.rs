use chrono::{Datelike, NaiveDate, NaiveTime};
use itertools::Itertools;
use serde::Deserialize;
use std::convert::TryFrom;
use std::fs;
use std::io;
use std::path::Path;

use crate::calendar::CalendarMonth;
use crate::error::{Error, ErrorKind, Result};
use crate::grid::AppointmentsByDay;
use crate::parse;

/// Source of the appointment summaries shown on the month grid.
pub trait AppointmentsLookup {
    fn indicators_of_month(&self, month: CalendarMonth) -> AppointmentsByDay;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub enum Status {
    #[serde(rename = "agendada")]
    Scheduled,
    #[serde(rename = "concluida")]
    Completed,
    #[serde(rename = "cancelada")]
    Cancelled,
    #[serde(rename = "faltou")]
    Missed,
}

impl Default for Status {
    fn default() -> Self {
        Status::Scheduled
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Appointment {
    pub id: u32,
    pub patient: String,
    pub date: NaiveDate,
    pub time: NaiveTime,
    pub kind: String,
    pub status: Status,
}

impl Appointment {
    /// Summary shown on the calendar, e.g. `09:00 - Consulta`.
    pub fn indicator(&self) -> String {
        format!("{} - {}", self.time.format("%H:%M"), self.kind)
    }

    /// Whether the appointment still holds its time slot.
    pub fn is_active(&self) -> bool {
        self.status != Status::Cancelled
    }
}

#[derive(Debug, Deserialize)]
struct AppointmentSpec {
    id: u32,
    #[serde(default)]
    patient: String,
    date: String,
    time: String,
    kind: String,
    #[serde(default)]
    status: Status,
}

impl TryFrom<AppointmentSpec> for Appointment {
    type Error = Error;

    fn try_from(spec: AppointmentSpec) -> Result<Self> {
        let id = spec.id;
        let context = |e: Error| {
            let msg = format!("appointment {}: {}", id, e.user_message());
            e.with_msg(&msg)
        };

        Ok(Appointment {
            id,
            date: parse::parse_iso_date(&spec.date).map_err(context)?,
            time: parse::parse_time(&spec.time).map_err(context)?,
            patient: spec.patient,
            kind: spec.kind,
            status: spec.status,
        })
    }
}

#[derive(Debug, Deserialize)]
struct BookFile {
    #[serde(default, rename = "appointment")]
    appointments: Vec<AppointmentSpec>,
}

/// Read-only set of appointments backing the calendar.
#[derive(Debug, Clone, Default)]
pub struct AppointmentBook {
    appointments: Vec<Appointment>,
}

impl AppointmentBook {
    pub fn new(appointments: Vec<Appointment>) -> Self {
        AppointmentBook { appointments }
    }

    /// Parses `[[appointment]]` tables. Entries with unparsable dates or times
    /// are skipped with a warning.
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let file: BookFile = toml::from_str(content)?;

        let appointments = file
            .appointments
            .into_iter()
            .map(Appointment::try_from)
            .inspect(|res| {
                if let Err(err) = res {
                    log::warn!("{}", err)
                }
            })
            .filter_map(Result::ok)
            .collect();

        Ok(AppointmentBook::new(appointments))
    }

    pub fn from_file(path: &Path) -> Result<Self> {
        if !path.is_file() {
            return Err(Error::from(io::ErrorKind::NotFound)
                .with_msg(&format!("'{}' is not a file", path.display())));
        }

        let book = Self::from_toml_str(&fs::read_to_string(path)?)?;
        log::info!(
            "Loaded {} appointments from '{}'",
            book.len(),
            path.display()
        );

        Ok(book)
    }

    pub fn len(&self) -> usize {
        self.appointments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.appointments.is_empty()
    }

    pub fn appointments(&self) -> &[Appointment] {
        &self.appointments
    }

    /// Appointments of `date` ordered by time.
    pub fn appointments_of_day(&self, date: NaiveDate) -> Vec<&Appointment> {
        self.appointments
            .iter()
            .filter(|appointment| appointment.date == date)
            .sorted_by_key(|appointment| appointment.time)
            .collect()
    }

    pub fn is_taken(&self, date: NaiveDate, time: NaiveTime) -> bool {
        self.appointments
            .iter()
            .any(|a| a.is_active() && a.date == date && a.time == time)
    }
}

impl AppointmentsLookup for AppointmentBook {
    fn indicators_of_month(&self, month: CalendarMonth) -> AppointmentsByDay {
        self.appointments
            .iter()
            .filter(|a| a.is_active() && month.contains(&a.date))
            .sorted_by_key(|a| (a.date, a.time))
            .map(|a| (a.date.day(), a.indicator()))
            .into_group_map()
            .into_iter()
            .collect()
    }
}
