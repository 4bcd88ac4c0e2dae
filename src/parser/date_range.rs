//! Date span parsing for pasted leave text.
//!
//! Two parsers live here and they are not interchangeable:
//!
//! - [`resolve_date_range`] is the tolerant one used to prefill the submission form. It accepts
//!   Indonesian or English month names, lets the start side borrow the end side's year and
//!   ignores trailing noise after each date.
//! - [`parse_staged_range`] fills the dates carried on [`super::ParsedLeaveData`]. Every side
//!   without a year gets the current year, each side must be exactly `<day> <month> <year>`,
//!   and any failure just leaves the dates unset.

use chrono::{Datelike, NaiveDate};
use derive_more::Display;
use once_cell::sync::Lazy;
use regex::Regex;

static SEGMENT_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(\d{1,2})\s+(\p{L}+)(?:\s+(\d{4}))?").expect("valid date segment regex")
});

static STAGED_SPLIT_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\s*[-–]\s*").expect("valid range split regex"));

static YEAR_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\d{4}").expect("valid year regex"));

#[derive(Debug, Clone, PartialEq, Eq, Display)]
pub enum DateRangeError {
    #[display(fmt = "expected two dates separated by a dash, found {} part(s)", _0)]
    SegmentCount(usize),
    #[display(fmt = "unrecognised date: {}", _0)]
    Segment(String),
    #[display(fmt = "unknown month: {}", _0)]
    UnknownMonth(String),
    #[display(fmt = "no such date: {}-{:02}-{:02}", year, month, day)]
    InvalidDate { year: i32, month: u32, day: u32 },
}

impl std::error::Error for DateRangeError {}

pub(crate) fn is_dash(c: char) -> bool {
    c == '-' || c == '–'
}

/// Month number (1-12) for an Indonesian or English month name, any case.
pub fn month_number(name: &str) -> Option<u32> {
    let month = match name.to_uppercase().as_str() {
        "JANUARI" | "JANUARY" => 1,
        "FEBRUARI" | "FEBRUARY" => 2,
        "MARET" | "MARCH" => 3,
        "APRIL" => 4,
        "MEI" | "MAY" => 5,
        "JUNI" | "JUNE" => 6,
        "JULI" | "JULY" => 7,
        "AGUSTUS" | "AUGUST" => 8,
        "SEPTEMBER" => 9,
        "OKTOBER" | "OCTOBER" => 10,
        "NOVEMBER" => 11,
        "DESEMBER" | "DECEMBER" => 12,
        _ => return None,
    };
    Some(month)
}

/// English spelling of an Indonesian month name that differs from it.
fn english_month(word: &str) -> Option<&'static str> {
    let english = match word.to_uppercase().as_str() {
        "JANUARI" => "January",
        "FEBRUARI" => "February",
        "MARET" => "March",
        "MEI" => "May",
        "JUNI" => "June",
        "JULI" => "July",
        "AGUSTUS" => "August",
        "OKTOBER" => "October",
        "DESEMBER" => "December",
        _ => return None,
    };
    Some(english)
}

struct Segment {
    day: u32,
    month: u32,
    year: Option<i32>,
}

fn parse_segment(segment: &str) -> Result<Segment, DateRangeError> {
    let caps = SEGMENT_RE
        .captures(segment)
        .ok_or_else(|| DateRangeError::Segment(segment.to_string()))?;

    let day = caps[1]
        .parse()
        .map_err(|_| DateRangeError::Segment(segment.to_string()))?;
    let month =
        month_number(&caps[2]).ok_or_else(|| DateRangeError::UnknownMonth(caps[2].to_string()))?;
    let year = caps.get(3).and_then(|y| y.as_str().parse().ok());

    Ok(Segment { day, month, year })
}

fn make_date(year: i32, month: u32, day: u32) -> Result<NaiveDate, DateRangeError> {
    NaiveDate::from_ymd_opt(year, month, day)
        .ok_or(DateRangeError::InvalidDate { year, month, day })
}

/// Resolve "11 DESEMBER 2025 - 28 DESEMBER 2025" or "2 December - 16 December" into two dates.
///
/// The end side without a year falls back to `today`'s year; the start side without a year takes
/// the end side's year.
pub fn resolve_date_range(
    text: &str,
    today: NaiveDate,
) -> Result<(NaiveDate, NaiveDate), DateRangeError> {
    let upper = text.to_uppercase();
    let parts: Vec<&str> = upper.split(is_dash).map(str::trim).collect();
    if parts.len() != 2 {
        return Err(DateRangeError::SegmentCount(parts.len()));
    }

    let start = parse_segment(parts[0])?;
    let end = parse_segment(parts[1])?;

    let end_year = end.year.unwrap_or_else(|| today.year());
    let start_year = start.year.unwrap_or(end_year);

    Ok((
        make_date(start_year, start.month, start.day)?,
        make_date(end_year, end.month, end.day)?,
    ))
}

fn parse_staged_date(piece: &str, today: NaiveDate) -> Result<NaiveDate, chrono::ParseError> {
    let mut piece = piece.trim().to_string();
    if !YEAR_RE.is_match(&piece) {
        piece = format!("{} {}", piece, today.year());
    }

    let normalized = piece
        .split_whitespace()
        .map(|word| english_month(word).unwrap_or(word))
        .collect::<Vec<_>>()
        .join(" ");

    NaiveDate::parse_from_str(&normalized, "%d %B %Y")
}

/// Parse the consolidated range text into dates, or `None` when either side is not a plain
/// `<day> <month> [<year>]`.
pub fn parse_staged_range(text: &str, today: NaiveDate) -> Option<(NaiveDate, NaiveDate)> {
    let mut pieces = STAGED_SPLIT_RE.split(text.trim());
    let start = pieces.next().filter(|p| !p.is_empty())?;
    let end = pieces.next().filter(|p| !p.is_empty())?;

    match (parse_staged_date(start, today), parse_staged_date(end, today)) {
        (Ok(start), Ok(end)) => Some((start, end)),
        (Err(e), _) | (_, Err(e)) => {
            tracing::debug!(error = %e, range = text, "Could not stage parsed date range");
            None
        }
    }
}
