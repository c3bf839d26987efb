// File: ./src/date.rs
//! Due date parsing and classification.
//!
//! Dates are always written `DD-MM-YYYY`. Nothing in here reads the system
//! clock: every temporal check takes `today` explicitly, and callers obtain it
//! from a [`Clock`].
use chrono::{Datelike, Local, NaiveDate};
use std::fmt;
use thiserror::Error;

pub const MIN_YEAR: i32 = 1900;
pub const MAX_YEAR: i32 = 2100;

/// Length of a `DD-MM-YYYY` string.
const DATE_LEN: usize = 10;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DateError {
    #[error("'{0}' is not a date in DD-MM-YYYY form")]
    Parse(String),
    #[error("{0} is not a real calendar date")]
    Calendar(CalendarDate),
    #[error("{0} is in the past")]
    Past(CalendarDate),
}

/// A day/month/year triple as typed by the user.
///
/// The triple is not guaranteed to be a real date; see
/// [`CalendarDate::is_valid`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CalendarDate {
    pub day: u32,
    pub month: u32,
    pub year: i32,
}

impl CalendarDate {
    pub fn new(day: u32, month: u32, year: i32) -> Self {
        Self { day, month, year }
    }

    pub fn is_valid(&self) -> bool {
        is_valid_calendar_date(self.day, self.month, self.year)
    }

    pub fn is_today_or_future(&self, today: &CalendarDate) -> bool {
        is_today_or_future(self.day, self.month, self.year, today)
    }

    pub fn is_past(&self, today: &CalendarDate) -> bool {
        is_past(self.day, self.month, self.year, today)
    }
}

impl fmt::Display for CalendarDate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02}-{:02}-{:04}", self.day, self.month, self.year)
    }
}

impl From<NaiveDate> for CalendarDate {
    fn from(d: NaiveDate) -> Self {
        Self::new(d.day(), d.month(), d.year())
    }
}

/// Source of "today" for temporal checks.
pub trait Clock {
    fn today(&self) -> CalendarDate;
}

/// Reads the local wall clock.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn today(&self) -> CalendarDate {
        Local::now().date_naive().into()
    }
}

/// Always answers the same date. Used by tests and by one-shot rendering.
#[derive(Debug, Clone, Copy)]
pub struct FixedClock(pub CalendarDate);

impl Clock for FixedClock {
    fn today(&self) -> CalendarDate {
        self.0
    }
}

/// Parses a strict `DD-MM-YYYY` string.
///
/// Only the shape is checked here; `31-02-2024` parses fine and is rejected
/// later by [`is_valid_calendar_date`].
pub fn parse_date(s: &str) -> Result<CalendarDate, DateError> {
    let bytes = s.as_bytes();
    let shape_ok = bytes.len() == DATE_LEN
        && bytes.iter().enumerate().all(|(i, b)| match i {
            2 | 5 => *b == b'-',
            _ => b.is_ascii_digit(),
        });
    if !shape_ok {
        return Err(DateError::Parse(s.to_string()));
    }

    // All fields are ASCII digits at this point, so slicing and parsing can't fail.
    let field = |range: std::ops::Range<usize>| -> Result<u32, DateError> {
        s[range]
            .parse::<u32>()
            .map_err(|_| DateError::Parse(s.to_string()))
    };
    let day = field(0..2)?;
    let month = field(3..5)?;
    let year = field(6..10)? as i32;

    Ok(CalendarDate::new(day, month, year))
}

pub fn is_leap_year(year: i32) -> bool {
    (year % 4 == 0 && year % 100 != 0) || year % 400 == 0
}

/// Number of days in `month`, or `None` for a month outside 1..=12.
pub fn days_in_month(month: u32, year: i32) -> Option<u32> {
    match month {
        1 | 3 | 5 | 7 | 8 | 10 | 12 => Some(31),
        4 | 6 | 9 | 11 => Some(30),
        2 if is_leap_year(year) => Some(29),
        2 => Some(28),
        _ => None,
    }
}

pub fn is_valid_calendar_date(day: u32, month: u32, year: i32) -> bool {
    if !(MIN_YEAR..=MAX_YEAR).contains(&year) {
        return false;
    }
    match days_in_month(month, year) {
        Some(max_day) => (1..=max_day).contains(&day),
        None => false,
    }
}

/// True when the date is `today` or later. Year decides first, then month,
/// then day.
pub fn is_today_or_future(day: u32, month: u32, year: i32, today: &CalendarDate) -> bool {
    if year != today.year {
        return year > today.year;
    }
    if month != today.month {
        return month > today.month;
    }
    day >= today.day
}

/// True when the date is strictly before `today`. Today itself is never past.
pub fn is_past(day: u32, month: u32, year: i32, today: &CalendarDate) -> bool {
    if year != today.year {
        return year < today.year;
    }
    if month != today.month {
        return month < today.month;
    }
    day < today.day
}

/// Full check applied whenever a due date is accepted from the user:
/// shape, then calendar validity, then not in the past.
pub fn validate_due_date(s: &str, today: &CalendarDate) -> Result<CalendarDate, DateError> {
    let date = parse_date(s)?;
    if !date.is_valid() {
        return Err(DateError::Calendar(date));
    }
    if !date.is_today_or_future(today) {
        return Err(DateError::Past(date));
    }
    Ok(date)
}
