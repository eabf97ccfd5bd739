//! Working calendar and intra-day time windows.
//!
//! Defines which dates a court sits on: a fixed set of weekend days plus
//! explicit holidays. Benches may add their own unavailable dates on top.
//!
//! # Precedence
//! A date is a working day iff:
//! - Its weekday is NOT in `weekend`, AND
//! - It does NOT appear in `holidays`.

use chrono::{Datelike, Duration, NaiveDate, NaiveTime, Timelike, Weekday};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// A minute-of-day interval [start, end).
///
/// Half-open interval: includes start, excludes end.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct TimeWindow {
    /// Interval start (minutes after midnight, inclusive).
    pub start_minute: u32,
    /// Interval end (minutes after midnight, exclusive).
    pub end_minute: u32,
}

impl TimeWindow {
    /// Creates a new time window.
    pub fn new(start_minute: u32, end_minute: u32) -> Self {
        Self {
            start_minute,
            end_minute,
        }
    }

    /// Window starting at `start` and lasting `duration_minutes`.
    pub fn starting_at(start: NaiveTime, duration_minutes: u32) -> Self {
        let start_minute = start.hour() * 60 + start.minute();
        Self::new(start_minute, start_minute + duration_minutes)
    }

    /// Duration of this window (minutes).
    #[inline]
    pub fn duration_minutes(&self) -> u32 {
        self.end_minute.saturating_sub(self.start_minute)
    }

    /// Whether a minute-of-day falls within this window.
    #[inline]
    pub fn contains(&self, minute: u32) -> bool {
        minute >= self.start_minute && minute < self.end_minute
    }

    /// Whether two windows overlap.
    pub fn overlaps(&self, other: &Self) -> bool {
        self.start_minute < other.end_minute && other.start_minute < self.end_minute
    }
}

/// Court sitting calendar.
///
/// Empty `holidays` and empty `weekend` means every date is a working day.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorkingCalendar {
    /// Weekdays the court never sits.
    #[serde(default = "default_weekend")]
    pub weekend: Vec<Weekday>,
    /// Dates the court does not sit (public holidays, vacations).
    #[serde(default)]
    pub holidays: BTreeSet<NaiveDate>,
}

fn default_weekend() -> Vec<Weekday> {
    vec![Weekday::Sat, Weekday::Sun]
}

impl Default for WorkingCalendar {
    fn default() -> Self {
        Self {
            weekend: default_weekend(),
            holidays: BTreeSet::new(),
        }
    }
}

impl WorkingCalendar {
    /// Monday–Friday calendar without holidays.
    pub fn weekdays() -> Self {
        Self::default()
    }

    /// Calendar on which every date is a working day.
    pub fn every_day() -> Self {
        Self {
            weekend: Vec::new(),
            holidays: BTreeSet::new(),
        }
    }

    /// Adds a holiday.
    pub fn with_holiday(mut self, date: NaiveDate) -> Self {
        self.holidays.insert(date);
        self
    }

    /// Adds several holidays.
    pub fn with_holidays(mut self, dates: impl IntoIterator<Item = NaiveDate>) -> Self {
        self.holidays.extend(dates);
        self
    }

    /// Replaces the weekend days.
    pub fn with_weekend(mut self, weekend: Vec<Weekday>) -> Self {
        self.weekend = weekend;
        self
    }

    /// Whether the court sits on `date`.
    pub fn is_working_day(&self, date: NaiveDate) -> bool {
        if self.holidays.contains(&date) {
            return false;
        }
        !self.weekend.contains(&date.weekday())
    }

    /// Working days in the calendar window `[start, start + num_days)`.
    ///
    /// Returned in chronological order.
    pub fn working_days(&self, start: NaiveDate, num_days: u32) -> Vec<NaiveDate> {
        (0..num_days)
            .filter_map(|offset| start.checked_add_signed(Duration::days(i64::from(offset))))
            .filter(|d| self.is_working_day(*d))
            .collect()
    }

    /// First working day at or after `from`, searching at most `limit` days.
    pub fn next_working_day(&self, from: NaiveDate, limit: u32) -> Option<NaiveDate> {
        self.working_days(from, limit).into_iter().next()
    }
}
