//! Plain-text rendering of month grids and day listings.

use chrono::NaiveDate;
use std::fmt::{self, Display};

use crate::agenda::Appointment;
use crate::grid::{DayCell, MonthGrid, GRID_COLUMNS};
use crate::slots::ClockTime;

#[derive(Clone, Debug)]
pub struct Theme {
    pub today_day_char: Option<char>,
    pub busy_day_char: Option<char>,
}

impl Default for Theme {
    fn default() -> Self {
        Theme {
            today_day_char: Some('*'),
            busy_day_char: Some('+'),
        }
    }
}

pub struct CellView<'a> {
    cell: &'a DayCell,
    theme: &'a Theme,
}

impl<'a> CellView<'a> {
    const CELL_WIDTH: usize = 5;

    pub fn new(cell: &'a DayCell, theme: &'a Theme) -> Self {
        CellView { cell, theme }
    }
}

impl Display for CellView<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let day = match self.cell.day() {
            Some(day) => day,
            None => return write!(f, "{:width$}", "", width = Self::CELL_WIDTH),
        };

        let arg_today = if day.is_today() {
            self.theme.today_day_char.unwrap_or(' ')
        } else {
            ' '
        };

        let arg_busy = if day.indicators().is_empty() {
            ' '
        } else {
            self.theme.busy_day_char.unwrap_or(' ')
        };

        write!(f, "{}{:>2}{} ", arg_today, day.num(), arg_busy)
    }
}

/// Title, weekday header and the grid rows. Trailing rows without any day
/// are left out.
pub fn render_month(grid: &MonthGrid, theme: &Theme) -> String {
    let width = GRID_COLUMNS * CellView::CELL_WIDTH;

    let header: String = grid
        .week_start()
        .labels()
        .iter()
        .map(|label| format!(" {:<3} ", label))
        .collect();

    let rows = grid
        .rows()
        .filter(|row| row.iter().any(|cell| !cell.is_empty()))
        .map(|row| {
            row.iter()
                .map(|cell| CellView::new(cell, theme).to_string())
                .collect::<String>()
        });

    let mut out = format!("{:^width$}\n", grid.month().to_string(), width = width);
    for line in std::iter::once(header).chain(rows) {
        out.push_str(line.trim_end());
        out.push('\n');
    }

    out
}

pub fn render_day(date: NaiveDate, appointments: &[&Appointment]) -> String {
    let mut out = format!("Agendamentos de {}\n", date.format("%d/%m/%Y"));

    if appointments.is_empty() {
        out.push_str("  Nenhum agendamento.\n");
    }

    for appointment in appointments {
        out.push_str(&format!("  {}", appointment.indicator()));
        if !appointment.patient.is_empty() {
            out.push_str(&format!(" ({})", appointment.patient));
        }
        if !appointment.is_active() {
            out.push_str(" [cancelada]");
        }
        out.push('\n');
    }

    out
}

pub fn render_slots<E>(date: NaiveDate, slots: &[(ClockTime, Result<(), E>)]) -> String {
    let mut out = format!("Horários de {}\n", date.format("%d/%m/%Y"));

    for (time, outcome) in slots {
        let state = if outcome.is_ok() { "livre" } else { "ocupado" };
        out.push_str(&format!("  {}  {}\n", time, state));
    }

    out
}
