use chrono::{Local, NaiveDate, Utc};
use serde_with::DeserializeFromStr;
use std::fmt::Display;
use std::str::FromStr;

use crate::error::{Error, ErrorKind};

/// Time zone used to decide which date "today" is.
#[derive(Clone, Copy, Debug, PartialEq, DeserializeFromStr)]
pub enum Tz {
    Local,
    Iana(chrono_tz::Tz),
}

impl Default for Tz {
    fn default() -> Self {
        Tz::Local
    }
}

impl Tz {
    pub fn today(&self) -> NaiveDate {
        match self {
            Tz::Local => Local::now().date_naive(),
            Tz::Iana(tz) => Utc::now().with_timezone(tz).date_naive(),
        }
    }
}

impl Display for Tz {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Tz::Local => write!(f, "local"),
            Tz::Iana(tz) => write!(f, "{}", tz.name()),
        }
    }
}

impl FromStr for Tz {
    type Err = Error;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lowercase = s.to_lowercase();
        if matches!(lowercase.as_str(), "localtime" | "local") {
            Ok(Tz::Local)
        } else if let Ok(tz) = s.parse::<chrono_tz::Tz>() {
            Ok(Tz::Iana(tz))
        } else {
            Err(Error::new(
                ErrorKind::ConfigParse,
                &format!("Timezone '{}' not recognized", s),
            ))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Datelike, TimeZone};

    #[test]
    fn parse_names() {
        assert_eq!("local".parse::<Tz>().unwrap(), Tz::Local);
        assert_eq!("LocalTime".parse::<Tz>().unwrap(), Tz::Local);

        let chronotz = "America/Sao_Paulo"
            .parse::<chrono_tz::Tz>()
            .expect("'America/Sao_Paulo' is a valid IANA timezone");
        assert_eq!(
            "America/Sao_Paulo".parse::<Tz>().unwrap(),
            Tz::Iana(chronotz)
        );

        assert!("Middle/Earth".parse::<Tz>().is_err());
    }

    #[test]
    fn display_roundtrips_through_parse() {
        let tz = "Europe/Berlin".parse::<Tz>().unwrap();
        assert_eq!(tz.to_string(), "Europe/Berlin");
        assert_eq!(tz.to_string().parse::<Tz>().unwrap(), tz);
    }

    #[test]
    fn today_follows_the_zone() {
        let tz = chrono_tz::Pacific::Kiritimati;
        let expected = tz.from_utc_datetime(&Utc::now().naive_utc()).date_naive();
        let today = Tz::Iana(tz).today();

        // Allow for the clock ticking over midnight between both calls
        assert!((today - expected).num_days().abs() <= 1);
        assert!(today.year() >= 2023);
    }
}
