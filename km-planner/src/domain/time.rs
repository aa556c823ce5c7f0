//! Timetable instants.
//!
//! The search engine works on integer minutes since the Unix epoch: every
//! comparison in the transfer-window query and every waiting-time
//! computation is plain integer arithmetic. This module converts to and from
//! the wall-clock timestamps found in timetable exports and run parameters.

use std::fmt;
use std::ops::{Add, Sub};

use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime};

/// Error returned when parsing an invalid time string.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid time {input:?}: {reason}")]
pub struct TimeError {
    input: String,
    reason: &'static str,
}

impl TimeError {
    fn new(input: &str, reason: &'static str) -> Self {
        Self {
            input: input.to_string(),
            reason,
        }
    }
}

/// Formats accepted for absolute timestamps, tried in order.
const TIMESTAMP_FORMATS: [&str; 4] = [
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%d %H:%M",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%dT%H:%M",
];

/// An instant in whole minutes since the Unix epoch.
///
/// Timetable times are wall-clock times for a single operating day, so
/// no timezone is attached: a departure at 12:02 local time is stored as
/// the minute count of `12:02` on that date read as if it were UTC.
///
/// # Examples
///
/// ```
/// use km_planner::domain::Minute;
/// use chrono::NaiveDate;
///
/// let day = NaiveDate::from_ymd_opt(2025, 8, 2).unwrap();
/// let noon = Minute::parse_hhmm("12:00", day).unwrap();
/// let later = noon + 15;
///
/// assert_eq!(later - noon, 15);
/// assert_eq!(later.to_string(), "2025-08-02 12:15");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Minute(i64);

impl Minute {
    /// The latest representable instant, used as "no end bound".
    pub const MAX: Minute = Minute(i64::MAX / 2);

    /// Create from a raw minute count.
    pub const fn new(minutes: i64) -> Self {
        Self(minutes)
    }

    /// Returns the raw minute count.
    pub fn get(&self) -> i64 {
        self.0
    }

    /// Convert a wall-clock date-time, dropping seconds.
    pub fn from_datetime(dt: NaiveDateTime) -> Self {
        Self(dt.and_utc().timestamp().div_euclid(60))
    }

    /// Convert back to a wall-clock date-time.
    pub fn to_datetime(&self) -> Option<NaiveDateTime> {
        DateTime::from_timestamp(self.0.checked_mul(60)?, 0).map(|dt| dt.naive_utc())
    }

    /// Parse a time from "HH:MM" format on the given day.
    pub fn parse_hhmm(s: &str, date: NaiveDate) -> Result<Self, TimeError> {
        let bytes = s.as_bytes();
        if bytes.len() != 5 {
            return Err(TimeError::new(s, "expected HH:MM format"));
        }
        if bytes[2] != b':' {
            return Err(TimeError::new(s, "expected colon at position 2"));
        }

        let hour = parse_two_digits(&bytes[0..2])
            .ok_or_else(|| TimeError::new(s, "invalid hour digits"))?;
        let minute = parse_two_digits(&bytes[3..5])
            .ok_or_else(|| TimeError::new(s, "invalid minute digits"))?;

        let time = NaiveTime::from_hms_opt(hour, minute, 0)
            .ok_or_else(|| TimeError::new(s, "hour must be 0-23 and minute 0-59"))?;

        Ok(Self::from_datetime(date.and_time(time)))
    }

    /// Parse an absolute timestamp as found in timetable exports.
    ///
    /// Accepts `YYYY-MM-DD HH:MM[:SS]`, the same with a `T` separator, and
    /// RFC 3339 with an offset. For RFC 3339 input the local wall-clock
    /// time is kept and the offset discarded.
    pub fn parse_timestamp(s: &str) -> Result<Self, TimeError> {
        let trimmed = s.trim();
        if trimmed.is_empty() {
            return Err(TimeError::new(s, "empty timestamp"));
        }

        for format in TIMESTAMP_FORMATS {
            if let Ok(dt) = NaiveDateTime::parse_from_str(trimmed, format) {
                return Ok(Self::from_datetime(dt));
            }
        }

        DateTime::parse_from_rfc3339(trimmed)
            .map(|dt| Self::from_datetime(dt.naive_local()))
            .map_err(|_| TimeError::new(s, "unrecognised timestamp format"))
    }
}

impl Add<i64> for Minute {
    type Output = Minute;

    fn add(self, rhs: i64) -> Self::Output {
        Minute(self.0.saturating_add(rhs))
    }
}

impl Sub for Minute {
    type Output = i64;

    /// Signed number of minutes from `rhs` to `self`.
    fn sub(self, rhs: Minute) -> Self::Output {
        self.0 - rhs.0
    }
}

impl fmt::Display for Minute {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.to_datetime() {
            Some(dt) => write!(f, "{}", dt.format("%Y-%m-%d %H:%M")),
            None => write!(f, "minute {}", self.0),
        }
    }
}

/// Parse two ASCII digit bytes into a u32.
fn parse_two_digits(bytes: &[u8]) -> Option<u32> {
    if bytes.len() != 2 {
        return None;
    }
    let d1 = (bytes[0] as char).to_digit(10)?;
    let d2 = (bytes[1] as char).to_digit(10)?;
    Some(d1 * 10 + d2)
}
