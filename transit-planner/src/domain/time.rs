//! Clock time handling for timetables.
//!
//! Timetables describe every run as minutes since midnight of the service
//! day. This module provides `ClockTime` for parsing and displaying those
//! times, and helpers that turn minute offsets on a query date back into
//! dated times, rolling over midnight where a journey runs late.

use chrono::{Duration, NaiveDate, NaiveDateTime, NaiveTime, Timelike};
use std::fmt;

/// Whole minutes. Every duration and time offset in the planner uses this unit.
pub type Minutes = u32;

/// Number of minutes in one service day.
pub const MINUTES_PER_DAY: Minutes = 24 * 60;

/// Error returned when parsing or building an invalid time.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid time: {reason}")]
pub struct TimeError {
    reason: &'static str,
}

impl TimeError {
    fn new(reason: &'static str) -> Self {
        Self { reason }
    }
}

/// A time of day on a timetable, stored as minutes since midnight.
///
/// # Examples
///
/// ```
/// use transit_planner::domain::ClockTime;
///
/// let time = ClockTime::parse_hhmm("06:02").unwrap();
/// assert_eq!(time.minutes(), 362);
/// assert_eq!(time.to_string(), "06:02");
/// ```
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ClockTime(Minutes);

impl ClockTime {
    /// Midnight at the start of the service day.
    pub const MIDNIGHT: ClockTime = ClockTime(0);

    /// Build a time from minutes since midnight.
    ///
    /// Fails unless `minutes` falls within a single day.
    pub fn from_minutes(minutes: Minutes) -> Result<Self, TimeError> {
        if minutes >= MINUTES_PER_DAY {
            return Err(TimeError::new("minutes must be below 1440"));
        }
        Ok(Self(minutes))
    }

    /// Build a time from an hour (0-23) and minute (0-59).
    pub fn from_hm(hour: u32, minute: u32) -> Result<Self, TimeError> {
        if hour > 23 {
            return Err(TimeError::new("hour must be 0-23"));
        }
        if minute > 59 {
            return Err(TimeError::new("minute must be 0-59"));
        }
        Ok(Self(hour * 60 + minute))
    }

    /// Parse a time from "HH:MM" format.
    ///
    /// # Examples
    ///
    /// ```
    /// use transit_planner::domain::ClockTime;
    ///
    /// assert!(ClockTime::parse_hhmm("00:00").is_ok());
    /// assert!(ClockTime::parse_hhmm("23:59").is_ok());
    ///
    /// assert!(ClockTime::parse_hhmm("0602").is_err());
    /// assert!(ClockTime::parse_hhmm("6:02").is_err());
    /// assert!(ClockTime::parse_hhmm("24:00").is_err());
    /// ```
    pub fn parse_hhmm(s: &str) -> Result<Self, TimeError> {
        if s.len() != 5 {
            return Err(TimeError::new("expected HH:MM format"));
        }

        let bytes = s.as_bytes();
        if bytes[2] != b':' {
            return Err(TimeError::new("expected colon at position 2"));
        }

        let hour =
            parse_two_digits(&bytes[0..2]).ok_or_else(|| TimeError::new("invalid hour digits"))?;
        let minute = parse_two_digits(&bytes[3..5])
            .ok_or_else(|| TimeError::new("invalid minute digits"))?;

        Self::from_hm(hour, minute)
    }

    /// The time of day of a chrono time, dropping seconds.
    pub fn of(time: NaiveTime) -> Self {
        Self(time.hour() * 60 + time.minute())
    }

    /// Minutes since midnight.
    pub fn minutes(self) -> Minutes {
        self.0
    }

    /// Returns the hour (0-23).
    pub fn hour(self) -> u32 {
        self.0 / 60
    }

    /// Returns the minute (0-59).
    pub fn minute(self) -> u32 {
        self.0 % 60
    }
}

impl fmt::Debug for ClockTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ClockTime({:02}:{:02})", self.hour(), self.minute())
    }
}

impl fmt::Display for ClockTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02}:{:02}", self.hour(), self.minute())
    }
}

/// The dated time `minutes` after the midnight that starts `date`.
///
/// Offsets of a day or more land on the following dates, so a journey that
/// runs past midnight keeps a correct calendar date.
///
/// # Examples
///
/// ```
/// use transit_planner::domain::at_minutes;
/// use chrono::NaiveDate;
///
/// let date = NaiveDate::from_ymd_opt(2024, 3, 15).unwrap();
/// let late = at_minutes(date, 24 * 60 + 30);
/// assert_eq!(late.date(), NaiveDate::from_ymd_opt(2024, 3, 16).unwrap());
/// assert_eq!(late.time().to_string(), "00:30:00");
/// ```
pub fn at_minutes(date: NaiveDate, minutes: Minutes) -> NaiveDateTime {
    date.and_time(NaiveTime::MIN) + Duration::minutes(i64::from(minutes))
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

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn parse_valid_times() {
        let t = ClockTime::parse_hhmm("00:00").unwrap();
        assert_eq!(t.minutes(), 0);

        let t = ClockTime::parse_hhmm("23:59").unwrap();
        assert_eq!(t.hour(), 23);
        assert_eq!(t.minute(), 59);

        let t = ClockTime::parse_hhmm("06:02").unwrap();
        assert_eq!(t.minutes(), 362);
    }

    #[test]
    fn parse_invalid_format() {
        assert!(ClockTime::parse_hhmm("0602").is_err());
        assert!(ClockTime::parse_hhmm("06:2").is_err());
        assert!(ClockTime::parse_hhmm("06:020").is_err());
        assert!(ClockTime::parse_hhmm("06-02").is_err());
        assert!(ClockTime::parse_hhmm("ab:cd").is_err());
        assert!(ClockTime::parse_hhmm("0a:30").is_err());
    }

    #[test]
    fn parse_invalid_values() {
        assert!(ClockTime::parse_hhmm("24:00").is_err());
        assert!(ClockTime::parse_hhmm("12:60").is_err());
    }

    #[test]
    fn from_minutes_bounds() {
        assert!(ClockTime::from_minutes(0).is_ok());
        assert!(ClockTime::from_minutes(1439).is_ok());
        assert!(ClockTime::from_minutes(1440).is_err());
    }

    #[test]
    fn display_and_debug() {
        let t = ClockTime::parse_hhmm("09:05").unwrap();
        assert_eq!(t.to_string(), "09:05");
        assert_eq!(format!("{:?}", t), "ClockTime(09:05)");
    }

    #[test]
    fn of_drops_seconds() {
        let t = ClockTime::of(NaiveTime::from_hms_opt(6, 2, 59).unwrap());
        assert_eq!(t.minutes(), 362);
    }

    #[test]
    fn ordering() {
        let early = ClockTime::parse_hhmm("06:02").unwrap();
        let late = ClockTime::parse_hhmm("06:30").unwrap();
        assert!(early < late);
        assert_eq!(ClockTime::MIDNIGHT.minutes(), 0);
    }

    #[test]
    fn at_minutes_same_day() {
        let d = date(2024, 3, 15);
        let t = at_minutes(d, 362);
        assert_eq!(t.date(), d);
        assert_eq!(ClockTime::of(t.time()).to_string(), "06:02");
    }

    #[test]
    fn at_minutes_rolls_over_midnight() {
        let d = date(2024, 3, 15);
        let t = at_minutes(d, MINUTES_PER_DAY + 5);
        assert_eq!(t.date(), date(2024, 3, 16));
        assert_eq!(ClockTime::of(t.time()).minutes(), 5);
    }
}
