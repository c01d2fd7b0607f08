use chrono::{NaiveDate, NaiveTime};
use std::sync::{mpsc, Arc};
use std::thread;

use crate::agenda::AppointmentBook;
use crate::error::{Error, ErrorKind, Result};

const CONFLICT_MESSAGE: &str = "Já existe um agendamento para este horário.";
const AVAILABLE_MESSAGE: &str = "Horário disponível.";
const UNAVAILABLE_MESSAGE: &str = "Não foi possível verificar o horário.";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SlotStatus {
    Available,
}

impl SlotStatus {
    pub fn message(&self) -> &'static str {
        match self {
            SlotStatus::Available => AVAILABLE_MESSAGE,
        }
    }
}

/// Answers whether a date and time can still be booked. A taken slot is
/// reported as an `ErrorKind::ScheduleConflict` carrying a message for the user.
pub trait ConflictCheck: Send + Sync {
    fn check(&self, date: NaiveDate, time: NaiveTime) -> Result<SlotStatus>;
}

impl ConflictCheck for AppointmentBook {
    fn check(&self, date: NaiveDate, time: NaiveTime) -> Result<SlotStatus> {
        log::debug!("Checking conflicts for {} at {}", date, time.format("%H:%M"));

        if self.is_taken(date, time) {
            Err(Error::new(ErrorKind::ScheduleConflict, CONFLICT_MESSAGE))
        } else {
            Ok(SlotStatus::Available)
        }
    }
}

/// A single in-flight conflict check.
pub struct PendingCheck {
    rx: mpsc::Receiver<Result<SlotStatus>>,
    _handle: thread::JoinHandle<()>,
}

impl PendingCheck {
    /// Blocks until the check resolves. A worker that went away without
    /// answering is reported as `ErrorKind::Unavailable`.
    pub fn wait(self) -> Result<SlotStatus> {
        self.rx
            .recv()
            .unwrap_or_else(|_| Err(Error::new(ErrorKind::Unavailable, UNAVAILABLE_MESSAGE)))
    }

    /// Returns the outcome if it is already there.
    pub fn try_outcome(&self) -> Option<Result<SlotStatus>> {
        match self.rx.try_recv() {
            Ok(outcome) => Some(outcome),
            Err(mpsc::TryRecvError::Empty) => None,
            Err(mpsc::TryRecvError::Disconnected) => {
                Some(Err(Error::new(ErrorKind::Unavailable, UNAVAILABLE_MESSAGE)))
            }
        }
    }
}

/// Runs one check on a worker thread. There is no retry and no timeout.
pub fn spawn_check(
    checker: Arc<dyn ConflictCheck>,
    date: NaiveDate,
    time: NaiveTime,
) -> Result<PendingCheck> {
    let (tx, rx) = mpsc::channel();

    let handle = thread::Builder::new()
        .name("clinic-calendar-conflict-check".to_owned())
        .spawn(move || {
            // The receiver may have been dropped, nobody is left to tell
            let _ = tx.send(checker.check(date, time));
        })?;

    Ok(PendingCheck {
        rx,
        _handle: handle,
    })
}
