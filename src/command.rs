use chrono::{NaiveDate, NaiveTime};
use nom::{
    character::complete::{alpha1, digit1, space1},
    combinator::{all_consuming, opt, rest},
    sequence::{preceded, tuple},
    IResult,
};

use crate::error::{Error, ErrorKind, Result};
use crate::parse;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Cmd {
    Next(u32),
    Prev(u32),
    Today,
    SelectDay(u32),
    Goto(NaiveDate),
    Slots(u32),
    Check(u32, NaiveTime),
    Quit,
}

enum Action {
    Repeatable(fn(u32) -> Cmd),
    NoArg(Cmd),
    Arg(fn(&str) -> Result<Cmd>),
}

const COMMANDS: &[(&str, Action)] = &[
    ("n", Action::Repeatable(Cmd::Next)),
    ("next", Action::Repeatable(Cmd::Next)),
    ("p", Action::Repeatable(Cmd::Prev)),
    ("prev", Action::Repeatable(Cmd::Prev)),
    ("t", Action::NoArg(Cmd::Today)),
    ("today", Action::NoArg(Cmd::Today)),
    ("q", Action::NoArg(Cmd::Quit)),
    ("quit", Action::NoArg(Cmd::Quit)),
    ("d", Action::Arg(|arg| day_number(arg).map(Cmd::SelectDay))),
    ("day", Action::Arg(|arg| day_number(arg).map(Cmd::SelectDay))),
    ("g", Action::Arg(|arg| parse::parse_date_input(arg).map(Cmd::Goto))),
    ("goto", Action::Arg(|arg| parse::parse_date_input(arg).map(Cmd::Goto))),
    ("s", Action::Arg(|arg| day_number(arg).map(Cmd::Slots))),
    ("slots", Action::Arg(|arg| day_number(arg).map(Cmd::Slots))),
    ("c", Action::Arg(check_args)),
    ("check", Action::Arg(check_args)),
];

fn unknown(cmd: &str) -> Error {
    Error::new(ErrorKind::CommandParse, &format!("'{}'", cmd))
}

fn day_number(arg: &str) -> Result<u32> {
    match arg.trim().parse::<u32>() {
        Ok(day) if (1..=31).contains(&day) => Ok(day),
        _ => Err(Error::new(
            ErrorKind::CommandParse,
            &format!("'{}' is not a day of the month", arg),
        )),
    }
}

fn check_args(arg: &str) -> Result<Cmd> {
    let mut parts = arg.split_whitespace();

    match (parts.next(), parts.next(), parts.next()) {
        (Some(day), Some(time), None) => Ok(Cmd::Check(day_number(day)?, parse::parse_time(time)?)),
        _ => Err(Error::new(
            ErrorKind::CommandParse,
            "usage: check <day> <HH:MM>",
        )),
    }
}

/// Parses one line of input. Movement commands take an optional count
/// prefix (`3n`), day commands take their argument after a space (`d 15`).
pub fn parse_command(line: &str) -> Result<Cmd> {
    let line = line.trim();

    let res: IResult<&str, (Option<&str>, &str, Option<&str>)> =
        all_consuming(tuple((opt(digit1), alpha1, opt(preceded(space1, rest)))))(line);
    let (_, (repeat, name, arg)) = res.map_err(|_| unknown(line))?;

    let action = COMMANDS
        .iter()
        .find(|(cmd, _)| *cmd == name)
        .map(|(_, action)| action)
        .ok_or_else(|| unknown(line))?;

    match (action, repeat, arg) {
        (Action::Repeatable(cmd), repeat, None) => {
            let count = repeat.map_or(Ok(1), str::parse::<u32>).map_err(|_| unknown(line))?;
            Ok(cmd(count))
        }
        (Action::NoArg(cmd), None, None) => Ok(*cmd),
        (Action::Arg(cmd), None, Some(arg)) => cmd(arg.trim()),
        _ => Err(unknown(line)),
    }
}
