use chrono::NaiveDate;
use std::convert::TryFrom;
use std::fmt;

use crate::agenda::AppointmentsLookup;
use crate::calendar::{CalendarMonth, WeekStart};
use crate::command::Cmd;
use crate::config::Config;
use crate::error::{Error, ErrorKind, Result};
use crate::grid::{self, MonthGrid};
use crate::parse;
use crate::tz::Tz;

pub const DAY_VIEW_PATH: &str = "/agendamentos";
const DAY_VIEW_PARAM: &str = "data";

/// Identifies the day a calendar cell links to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct NavigationTarget(NaiveDate);

impl NavigationTarget {
    pub fn new(date: NaiveDate) -> Self {
        NavigationTarget(date)
    }

    pub fn date(&self) -> NaiveDate {
        self.0
    }

    /// Link to the day view under `path`, e.g. `/agendamentos?data=2024-03-15`.
    pub fn href(&self, path: &str) -> String {
        format!("{}?{}={}", path, DAY_VIEW_PARAM, self)
    }
}

impl fmt::Display for NavigationTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.format("%Y-%m-%d"))
    }
}

/// Receives the page navigations triggered by selecting a day.
pub trait Navigate {
    fn navigate(&mut self, href: &str);
}

impl Navigate for Vec<String> {
    fn navigate(&mut self, href: &str) {
        self.push(href.to_owned());
    }
}

fn months(n: u32) -> Result<i32> {
    i32::try_from(n).map_err(|_| {
        Error::new(
            ErrorKind::InvalidDate,
            &format!("cannot move {} months", n),
        )
    })
}

/// Holds the month currently displayed by one calendar view.
pub struct Navigator<'a> {
    month: CalendarMonth,
    week_start: WeekStart,
    tz: Tz,
    day_view_path: String,
    appointments: &'a dyn AppointmentsLookup,
}

impl<'a> Navigator<'a> {
    pub fn new(config: &Config, appointments: &'a dyn AppointmentsLookup) -> Self {
        let today = config.timezone.today();

        Navigator {
            month: CalendarMonth::from(&today),
            week_start: config.week_start,
            tz: config.timezone,
            day_view_path: config.day_view_path.clone(),
            appointments,
        }
    }

    pub fn with_month(mut self, month: CalendarMonth) -> Self {
        self.month = month;
        self
    }

    /// Selects the month of the date in `raw`, either a bare `YYYY-MM-DD` or a
    /// query string carrying it as `data`. Anything unparsable selects today.
    pub fn initialize_from_query(&mut self, raw: Option<&str>) -> NaiveDate {
        let parsed = raw
            .and_then(parse::query_date_param)
            .map(parse::parse_iso_date);

        let date = match parsed {
            Some(Ok(date)) => date,
            Some(Err(e)) => {
                log::warn!("Ignoring requested date: {}", e);
                self.today()
            }
            None => self.today(),
        };

        self.month = CalendarMonth::from(&date);
        date
    }

    pub fn today(&self) -> NaiveDate {
        self.tz.today()
    }

    pub fn month(&self) -> CalendarMonth {
        self.month
    }

    pub fn week_start(&self) -> WeekStart {
        self.week_start
    }

    pub fn grid(&self) -> MonthGrid {
        let appointments = self.appointments.indicators_of_month(self.month);
        grid::build_month(self.month, self.week_start, self.today(), &appointments)
    }

    fn move_by(&mut self, months: i32) -> Result<MonthGrid> {
        self.month = self.month.offset(months)?;
        log::debug!("Displaying {}", self.month);
        Ok(self.grid())
    }

    pub fn next(&mut self) -> Result<MonthGrid> {
        self.move_by(1)
    }

    pub fn previous(&mut self) -> Result<MonthGrid> {
        self.move_by(-1)
    }

    pub fn go_to_month(&mut self, month: CalendarMonth) -> MonthGrid {
        self.month = month;
        self.grid()
    }

    /// Resolves `day` in the displayed month and navigates to its day view.
    pub fn go_to_day(&self, day: u32, navigate: &mut dyn Navigate) -> Result<NavigationTarget> {
        let target = NavigationTarget::new(self.month.date(day)?);
        let href = target.href(&self.day_view_path);

        log::info!("Navigating to {}", href);
        navigate.navigate(&href);

        Ok(target)
    }

    /// Applies a navigation command. Returns the rebuilt grid when the
    /// displayed month was (re)selected.
    pub fn handle(&mut self, cmd: &Cmd, navigate: &mut dyn Navigate) -> Result<Option<MonthGrid>> {
        match *cmd {
            Cmd::Next(n) => self.move_by(months(n)?).map(Some),
            Cmd::Prev(n) => self.move_by(-months(n)?).map(Some),
            Cmd::Today => {
                let today = self.today();
                Ok(Some(self.go_to_month(CalendarMonth::from(&today))))
            }
            Cmd::Goto(date) => Ok(Some(self.go_to_month(CalendarMonth::from(&date)))),
            Cmd::SelectDay(day) => self.go_to_day(day, navigate).map(|_| None),
            Cmd::Slots(_) | Cmd::Check(_, _) | Cmd::Quit => Ok(None),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::agenda::AppointmentBook;
    use chrono::NaiveTime;

    fn month(year: i32, month0: i32) -> CalendarMonth {
        CalendarMonth::new(year, month0).unwrap()
    }

    fn navigator(book: &AppointmentBook) -> Navigator<'_> {
        Navigator::new(&Config::default(), book)
    }

    #[test]
    fn go_to_day_builds_iso_target() {
        let book = AppointmentBook::default();
        let nav = navigator(&book).with_month(month(2024, 2));
        let mut visited = Vec::new();

        let target = nav.go_to_day(15, &mut visited).unwrap();

        assert_eq!(target.to_string(), "2024-03-15");
        assert_eq!(visited, vec!["/agendamentos?data=2024-03-15".to_owned()]);
    }

    #[test]
    fn go_to_day_rejects_days_outside_the_month() {
        let book = AppointmentBook::default();
        let nav = navigator(&book).with_month(month(2023, 1));
        let mut visited = Vec::new();

        let err = nav.go_to_day(29, &mut visited).unwrap_err();
        assert!(matches!(err.kind, ErrorKind::InvalidDate));
        assert!(visited.is_empty());
    }

    #[test]
    fn next_and_previous_carry_over_years() {
        let book = AppointmentBook::default();
        let mut nav = navigator(&book).with_month(month(2024, 11));

        let grid = nav.next().unwrap();
        assert_eq!(nav.month(), month(2025, 0));
        assert_eq!(grid.month(), month(2025, 0));

        nav.previous().unwrap();
        nav.previous().unwrap();
        assert_eq!(nav.month(), month(2024, 10));

        let mut nav = nav.with_month(month(2024, 0));
        assert_eq!(nav.previous().unwrap().month(), month(2023, 11));
    }

    #[test]
    fn initialize_from_valid_query() {
        let book = AppointmentBook::default();
        let mut nav = navigator(&book);

        let date = nav.initialize_from_query(Some("2024-03-15"));
        assert_eq!(date, NaiveDate::from_ymd_opt(2024, 3, 15).unwrap());
        assert_eq!(nav.month(), month(2024, 2));

        nav.initialize_from_query(Some("?data=2023-07-01&view=month"));
        assert_eq!(nav.month(), month(2023, 6));
    }

    #[test]
    fn initialize_from_invalid_query_falls_back_to_today() {
        let book = AppointmentBook::default();

        for raw in &[Some("2024-02-30"), Some("not-a-date"), Some(""), None] {
            let mut nav = navigator(&book).with_month(month(1999, 0));
            let date = nav.initialize_from_query(*raw);
            let today = nav.today();

            assert!((today - date).num_days().abs() <= 1, "{:?}", raw);
            assert_eq!(nav.month(), CalendarMonth::from(&date));
        }
    }

    #[test]
    fn grid_uses_the_appointment_lookup() {
        let book = AppointmentBook::from_toml_str(
            r#"
            [[appointment]]
            id = 1
            patient = "Maria"
            date = "2024-03-05"
            time = "09:00"
            kind = "Consulta"
            "#,
        )
        .unwrap();
        let nav = navigator(&book).with_month(month(2024, 2));

        let grid = nav.grid();
        assert_eq!(grid.day(5).unwrap().indicators(), &["09:00 - Consulta".to_owned()]);
    }

    #[test]
    fn handle_dispatches_commands() {
        let book = AppointmentBook::default();
        let mut nav = navigator(&book).with_month(month(2024, 0));
        let mut visited = Vec::new();

        let grid = nav.handle(&Cmd::Next(3), &mut visited).unwrap().unwrap();
        assert_eq!(grid.month(), month(2024, 3));

        nav.handle(&Cmd::Prev(5), &mut visited).unwrap();
        assert_eq!(nav.month(), month(2023, 10));

        let goto = Cmd::Goto(NaiveDate::from_ymd_opt(2024, 2, 10).unwrap());
        nav.handle(&goto, &mut visited).unwrap();
        assert_eq!(nav.month(), month(2024, 1));

        assert!(nav
            .handle(&Cmd::SelectDay(29), &mut visited)
            .unwrap()
            .is_none());
        assert_eq!(visited, vec!["/agendamentos?data=2024-02-29".to_owned()]);

        let check = Cmd::Check(1, NaiveTime::from_hms_opt(9, 0, 0).unwrap());
        assert!(nav.handle(&check, &mut visited).unwrap().is_none());
        assert_eq!(nav.month(), month(2024, 1));
    }

    #[test]
    fn custom_day_view_path() {
        let book = AppointmentBook::default();
        let mut config = Config::default();
        config.day_view_path = "/clinica/agenda".to_owned();
        let nav = Navigator::new(&config, &book).with_month(month(2024, 2));
        let mut visited = Vec::new();

        nav.go_to_day(1, &mut visited).unwrap();
        assert_eq!(visited, vec!["/clinica/agenda?data=2024-03-01".to_owned()]);
    }
}
