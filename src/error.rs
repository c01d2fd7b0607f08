use nom;
use std::convert::From;
use std::error;
use std::fmt;
use std::io;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug)]
pub struct Error {
    pub kind: ErrorKind,
    pub message: Option<String>,
}

#[derive(Debug)]
pub enum ErrorKind {
    InvalidDate,
    DateParse,
    TimeParse,
    CommandParse,
    ConfigParse,
    ScheduleConflict,
    Unavailable,
    IOError(io::Error),
}

impl Error {
    pub fn new(kind: ErrorKind, msg: &str) -> Self {
        Error {
            kind,
            message: Some(msg.to_owned()),
        }
    }

    pub fn with_msg(mut self, message: &str) -> Self {
        self.message = Some(message.to_owned());
        self
    }

    /// The message meant for the user, falling back to the kind description.
    pub fn user_message(&self) -> String {
        self.message.clone().unwrap_or_else(|| self.kind.as_str())
    }
}

impl From<ErrorKind> for Error {
    fn from(kind: ErrorKind) -> Error {
        Error {
            kind,
            message: None,
        }
    }
}

impl From<io::ErrorKind> for Error {
    fn from(kind: io::ErrorKind) -> Error {
        Error::from(io::Error::from(kind))
    }
}

impl From<io::Error> for Error {
    fn from(io_error: io::Error) -> Error {
        Error::from(ErrorKind::IOError(io_error))
    }
}

impl From<toml::de::Error> for Error {
    fn from(toml_error: toml::de::Error) -> Error {
        Error::new(ErrorKind::ConfigParse, &toml_error.to_string())
    }
}

impl<E: std::fmt::Debug> From<nom::Err<E>> for Error {
    fn from(error: nom::Err<E>) -> Self {
        Error::new(
            ErrorKind::DateParse,
            &format!("Error while parsing: {}", error),
        )
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.message {
            Some(msg) => write!(f, "{}: {}", self.kind.as_str(), msg),
            None => write!(f, "{}", self.kind.as_str()),
        }
    }
}

impl error::Error for Error {}

impl ErrorKind {
    pub fn as_str(&self) -> String {
        match self {
            ErrorKind::InvalidDate => "invalid calendar date".to_owned(),
            ErrorKind::DateParse => "invalid date format".to_owned(),
            ErrorKind::TimeParse => "invalid time format".to_owned(),
            ErrorKind::CommandParse => "unknown command".to_owned(),
            ErrorKind::ConfigParse => "invalid configuration".to_owned(),
            ErrorKind::ScheduleConflict => "schedule conflict".to_owned(),
            ErrorKind::Unavailable => "conflict check unavailable".to_owned(),
            ErrorKind::IOError(err) => err.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_with_and_without_message() {
        let bare = Error::from(ErrorKind::InvalidDate);
        assert_eq!(bare.to_string(), "invalid calendar date");

        let with_msg = Error::new(ErrorKind::TimeParse, "25:00");
        assert_eq!(with_msg.to_string(), "invalid time format: 25:00");
    }

    #[test]
    fn user_message_prefers_explicit_text() {
        let err = Error::new(ErrorKind::ScheduleConflict, "slot taken");
        assert_eq!(err.user_message(), "slot taken");
        assert_eq!(
            Error::from(ErrorKind::Unavailable).user_message(),
            "conflict check unavailable"
        );
    }

    #[test]
    fn io_error_kinds_convert() {
        let err = Error::from(io::ErrorKind::NotFound).with_msg("'book.toml' is not a file");

        assert!(matches!(&err.kind, ErrorKind::IOError(e) if e.kind() == io::ErrorKind::NotFound));
        assert_eq!(err.user_message(), "'book.toml' is not a file");
    }
}
