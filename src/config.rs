//! Scheduler configuration.
//!
//! Every field has a default, so an empty JSON object is a valid
//! configuration. Builder methods follow the `with_*` convention used
//! across the models.

use chrono::{Duration, NaiveTime};
use serde::{Deserialize, Serialize};

use crate::error::{ConfigurationError, RulesError};
use crate::models::{Bench, WorkingCalendar};

/// Default fraction of nominal capacity withheld per bench-day.
pub const DEFAULT_SLACK_PERCENTAGE: f64 = 0.15;

/// How benches are scanned within a day.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BenchSelection {
    /// Benches in ascending id order; first with a free slot wins.
    #[default]
    FirstAvailable,
    /// Bench with the fewest committed hearings that day first; ties by id.
    LeastLoaded,
}

/// Allocation policy shared by every run of a scheduler.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SchedulerConfig {
    /// Fraction of nominal daily capacity withheld as overrun buffer.
    pub slack_percentage: f64,
    /// Time the first slot of a day starts.
    pub day_start: NaiveTime,
    /// Length of the sitting day; divided evenly among nominal slots.
    pub day_minutes: u32,
    pub calendar: WorkingCalendar,
    pub bench_selection: BenchSelection,
}

impl Default for SchedulerConfig {
    fn default() -> Self {
        Self {
            slack_percentage: DEFAULT_SLACK_PERCENTAGE,
            day_start: NaiveTime::from_hms_opt(9, 0, 0).unwrap_or_default(),
            day_minutes: 480,
            calendar: WorkingCalendar::default(),
            bench_selection: BenchSelection::default(),
        }
    }
}

impl SchedulerConfig {
    /// Creates the default configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Parses a configuration from JSON; absent fields take defaults.
    pub fn from_json(json: &str) -> Result<Self, RulesError> {
        let config: Self = serde_json::from_str(json)?;
        config
            .validate()
            .map_err(|e| RulesError::Invalid(e.to_string()))?;
        Ok(config)
    }

    /// Sets the slack percentage.
    pub fn with_slack(mut self, slack_percentage: f64) -> Self {
        self.slack_percentage = slack_percentage;
        self
    }

    /// Sets the sitting-day start time and length.
    pub fn with_day(mut self, day_start: NaiveTime, day_minutes: u32) -> Self {
        self.day_start = day_start;
        self.day_minutes = day_minutes;
        self
    }

    /// Sets the working calendar.
    pub fn with_calendar(mut self, calendar: WorkingCalendar) -> Self {
        self.calendar = calendar;
        self
    }

    /// Sets the bench scan policy.
    pub fn with_bench_selection(mut self, selection: BenchSelection) -> Self {
        self.bench_selection = selection;
        self
    }

    /// Checks value ranges.
    pub fn validate(&self) -> Result<(), ConfigurationError> {
        if !(0.0..1.0).contains(&self.slack_percentage) {
            return Err(ConfigurationError::InvalidSlack(self.slack_percentage));
        }
        if self.day_minutes == 0 || self.day_minutes > 24 * 60 {
            return Err(ConfigurationError::InvalidDayLength(self.day_minutes));
        }
        Ok(())
    }

    /// Length of one slot on `bench` (minutes, at least 1).
    pub fn slot_minutes(&self, bench: &Bench) -> u32 {
        let nominal = u32::try_from(bench.capacity).unwrap_or(1).max(1);
        (self.day_minutes / nominal).max(1)
    }

    /// Start time of `slot` on `bench`.
    pub fn slot_start(&self, bench: &Bench, slot: u32) -> NaiveTime {
        let offset = i64::from(slot) * i64::from(self.slot_minutes(bench));
        self.day_start + Duration::minutes(offset)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Weekday;

    #[test]
    fn test_defaults() {
        let c = SchedulerConfig::default();
        assert!((c.slack_percentage - 0.15).abs() < 1e-12);
        assert_eq!(c.day_start, NaiveTime::from_hms_opt(9, 0, 0).unwrap());
        assert_eq!(c.day_minutes, 480);
        assert_eq!(c.bench_selection, BenchSelection::FirstAvailable);
        assert!(c.validate().is_ok());
    }

    #[test]
    fn test_from_json_partial() {
        let c = SchedulerConfig::from_json(
            r#"{
                "slack_percentage": 0.2,
                "bench_selection": "least_loaded",
                "calendar": {"weekend": ["Sun"], "holidays": ["2024-08-15"]}
            }"#,
        )
        .unwrap();
        assert!((c.slack_percentage - 0.2).abs() < 1e-12);
        assert_eq!(c.bench_selection, BenchSelection::LeastLoaded);
        assert_eq!(c.calendar.weekend, vec![Weekday::Sun]);
        assert_eq!(c.day_minutes, 480);
    }

    #[test]
    fn test_from_json_rejects_bad_slack() {
        let err = SchedulerConfig::from_json(r#"{"slack_percentage": 1.5}"#).unwrap_err();
        assert!(matches!(err, RulesError::Invalid(_)));
    }

    #[test]
    fn test_validate_ranges() {
        assert_eq!(
            SchedulerConfig::new().with_slack(-0.1).validate(),
            Err(ConfigurationError::InvalidSlack(-0.1))
        );
        assert_eq!(
            SchedulerConfig::new()
                .with_day(NaiveTime::default(), 0)
                .validate(),
            Err(ConfigurationError::InvalidDayLength(0))
        );
    }

    #[test]
    fn test_slot_times() {
        let c = SchedulerConfig::default();
        let bench = Bench::new("B1", 10);
        assert_eq!(c.slot_minutes(&bench), 48);
        assert_eq!(c.slot_start(&bench, 0), NaiveTime::from_hms_opt(9, 0, 0).unwrap());
        assert_eq!(c.slot_start(&bench, 5), NaiveTime::from_hms_opt(13, 0, 0).unwrap());
    }
}
