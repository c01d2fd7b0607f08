//! Parsers for the date and time strings that reach the calendar from
//! query parameters, form inputs and the command line.

use chrono::{NaiveDate, NaiveTime};
use nom::{
    branch::alt,
    bytes::complete::{tag, take_while_m_n},
    character::complete::char,
    combinator::{all_consuming, map, map_res},
    sequence::{preceded, separated_pair, tuple},
    IResult,
};
use std::str::FromStr;

use crate::error::{Error, ErrorKind, Result};

fn is_digit(c: char) -> bool {
    c.is_ascii_digit()
}

fn number<'a, T: FromStr>(min: usize, max: usize) -> impl FnMut(&'a str) -> IResult<&'a str, T> {
    map_res(take_while_m_n(min, max, is_digit), |s: &str| s.parse::<T>())
}

/// `YYYY-MM-DD`
pub fn iso_date(input: &str) -> IResult<&str, (i32, u32, u32)> {
    tuple((
        number::<i32>(4, 4),
        preceded(char('-'), number::<u32>(2, 2)),
        preceded(char('-'), number::<u32>(2, 2)),
    ))(input)
}

/// `DD/MM/YYYY` or `DD/MM/YY`, returned as (year, month, day). Only the
/// two-digit form is moved into the 2000s.
pub fn slashed_date(input: &str) -> IResult<&str, (i32, u32, u32)> {
    let (rest, (day, month, year)) = tuple((
        number::<u32>(1, 2),
        preceded(char('/'), number::<u32>(1, 2)),
        preceded(
            char('/'),
            alt((
                number::<i32>(4, 4),
                map(number::<i32>(2, 2), |year| 2000 + year),
            )),
        ),
    ))(input)?;

    Ok((rest, (year, month, day)))
}

fn clock_time(input: &str) -> IResult<&str, (u32, u32)> {
    separated_pair(number::<u32>(1, 2), char(':'), number::<u32>(2, 2))(input)
}

fn compact_time(input: &str) -> IResult<&str, (u32, u32)> {
    map_res(take_while_m_n(1, 4, is_digit), |s: &str| {
        let padded = format!("{:0>4}", s);
        Ok::<_, std::num::ParseIntError>((padded[..2].parse::<u32>()?, padded[2..].parse::<u32>()?))
    })(input)
}

fn to_date((year, month, day): (i32, u32, u32), raw: &str) -> Result<NaiveDate> {
    NaiveDate::from_ymd_opt(year, month, day).ok_or_else(|| {
        Error::new(
            ErrorKind::InvalidDate,
            &format!("'{}' is not a calendar date", raw),
        )
    })
}

pub fn parse_iso_date(s: &str) -> Result<NaiveDate> {
    let raw = s.trim();
    let res: IResult<&str, (i32, u32, u32)> = all_consuming(iso_date)(raw);
    let (_, ymd) = res?;

    to_date(ymd, raw)
}

/// Accepts what users type into a date field: ISO dates as well as the
/// day-first slashed form.
pub fn parse_date_input(s: &str) -> Result<NaiveDate> {
    let raw = s.trim();
    let res: IResult<&str, (i32, u32, u32)> = all_consuming(alt((iso_date, slashed_date)))(raw);
    let (_, ymd) = res?;

    to_date(ymd, raw)
}

/// Accepts `HH:MM`, `H:MM` and up to four bare digits (`930` is 09:30).
pub fn parse_time(s: &str) -> Result<NaiveTime> {
    let raw = s.trim();
    let res: IResult<&str, (u32, u32)> = all_consuming(alt((clock_time, compact_time)))(raw);
    let (_, (hour, minute)) =
        res.map_err(|_| Error::new(ErrorKind::TimeParse, &format!("'{}'", raw)))?;

    NaiveTime::from_hms_opt(hour, minute, 0)
        .ok_or_else(|| Error::new(ErrorKind::TimeParse, &format!("'{}' is out of range", raw)))
}

/// Extracts the `data` parameter from a query string such as
/// `?data=2024-03-15&view=month`. A bare value without `=` is returned as is.
pub fn query_date_param(query: &str) -> Option<&str> {
    let query = query.trim().trim_start_matches('?');

    if !query.contains('=') {
        return Some(query).filter(|q| !q.is_empty());
    }

    query.split('&').find_map(|pair| {
        let res: IResult<&str, &str> = tag("data=")(pair);
        res.ok()
            .map(|(value, _)| value)
            .filter(|value| !value.is_empty())
    })
}
