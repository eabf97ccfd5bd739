//! Bench model.
//!
//! A bench is a schedulable court resource: a courtroom with its presiding
//! judge(s). Each bench offers a fixed number of same-length hearing slots
//! per working day.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// A court bench that can host hearings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Bench {
    /// Unique bench identifier. Also the deterministic scan order.
    pub id: String,
    /// Human-readable name.
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub court_number: String,
    /// Nominal hearing slots per working day.
    pub capacity: i32,
    /// Inactive benches are never offered capacity.
    #[serde(default = "default_active")]
    pub is_active: bool,
    /// Dates this bench does not sit, on top of the court calendar.
    #[serde(default)]
    pub unavailable_dates: BTreeSet<NaiveDate>,
}

fn default_active() -> bool {
    true
}

impl Bench {
    /// Creates an active bench with the given daily capacity.
    pub fn new(id: impl Into<String>, capacity: i32) -> Self {
        Self {
            id: id.into(),
            name: String::new(),
            court_number: String::new(),
            capacity,
            is_active: true,
            unavailable_dates: BTreeSet::new(),
        }
    }

    /// Sets the bench name.
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// Sets the court number.
    pub fn with_court_number(mut self, court_number: impl Into<String>) -> Self {
        self.court_number = court_number.into();
        self
    }

    /// Marks the bench inactive.
    pub fn inactive(mut self) -> Self {
        self.is_active = false;
        self
    }

    /// Adds a date on which this bench does not sit.
    pub fn with_unavailable_date(mut self, date: NaiveDate) -> Self {
        self.unavailable_dates.insert(date);
        self
    }

    /// Slots usable per day after withholding `slack_percentage` as buffer.
    ///
    /// `floor(capacity * (1 - slack))`; zero for inactive or non-positive
    /// capacity benches.
    pub fn effective_slots(&self, slack_percentage: f64) -> u32 {
        if !self.is_active || self.capacity <= 0 {
            return 0;
        }
        let usable = f64::from(self.capacity) * (1.0 - slack_percentage);
        // Guard against 0.85 * 20 = 16.999… style representation error.
        (usable + 1e-9).floor().max(0.0) as u32
    }

    /// Whether the bench sits on `date` (ignoring the court calendar).
    pub fn sits_on(&self, date: NaiveDate) -> bool {
        self.is_active && !self.unavailable_dates.contains(&date)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bench_builder() {
        let b = Bench::new("B1", 10)
            .with_name("District Court 1")
            .with_court_number("DC-1");

        assert_eq!(b.id, "B1");
        assert_eq!(b.name, "District Court 1");
        assert_eq!(b.court_number, "DC-1");
        assert_eq!(b.capacity, 10);
        assert!(b.is_active);
    }

    #[test]
    fn test_effective_slots_with_slack() {
        assert_eq!(Bench::new("B1", 10).effective_slots(0.15), 8);
        assert_eq!(Bench::new("B1", 20).effective_slots(0.15), 17);
        assert_eq!(Bench::new("B1", 50).effective_slots(0.15), 42);
        assert_eq!(Bench::new("B1", 10).effective_slots(0.0), 10);
    }

    #[test]
    fn test_effective_slots_inactive_or_empty() {
        assert_eq!(Bench::new("B1", 10).inactive().effective_slots(0.15), 0);
        assert_eq!(Bench::new("B1", 0).effective_slots(0.15), 0);
        assert_eq!(Bench::new("B1", -3).effective_slots(0.15), 0);
        assert_eq!(Bench::new("B1", 1).effective_slots(0.15), 0);
    }

    #[test]
    fn test_sits_on() {
        let off = NaiveDate::from_ymd_opt(2024, 2, 6).unwrap();
        let b = Bench::new("B1", 10).with_unavailable_date(off);
        assert!(!b.sits_on(off));
        assert!(b.sits_on(off.succ_opt().unwrap()));
        assert!(!Bench::new("B2", 10).inactive().sits_on(off));
    }

    #[test]
    fn test_bench_deserialize_defaults() {
        let b: Bench = serde_json::from_str(r#"{"id": "B7", "capacity": 12}"#).unwrap();
        assert!(b.is_active);
        assert!(b.unavailable_dates.is_empty());
    }
}
