pub mod agenda;
pub mod calendar;
pub mod command;
pub mod config;
pub mod conflict;
pub mod error;
pub mod grid;
pub mod navigator;
pub mod parse;
pub mod render;
pub mod slots;
pub mod tz;

pub use error::{Error, ErrorKind, Result};
