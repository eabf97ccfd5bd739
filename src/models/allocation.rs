//! Allocation (solution) model.
//!
//! An allocation result is the outcome of one scheduler run: the ordered
//! hearings it placed, the cases it could not place (each with a typed
//! reason), and summary statistics. It is never persisted by this crate.
//!
//! # Wire shape
//! ```text
//! {
//!   "scheduled_hearings": [{"case_id", "bench_id", "hearing_date", "start_time"}],
//!   "unplaced_cases":     [{"case_id", "reason"}],
//!   "statistics":         {"total_scheduled", "by_priority": {"low", "medium", "high", "urgent"}}
//! }
//! ```
//! Field and element order is stable so serialized results can be compared
//! byte-for-byte.

use chrono::{NaiveDate, NaiveTime};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

use super::{Hearing, Priority};

/// Result of one allocation run.
///
/// Every input row is accounted for exactly once: it is either a placement
/// or an unplaced entry. A distinct case id therefore appears in only one of
/// the two lists, with one exception: when an id repeats in the input, the
/// later rows are reported as `duplicate_case` while the first row may
/// still be placed. [`AllocationResult::unplaced_reason`] is then
/// `Some(DuplicateCase)` alongside a placement for the same id.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AllocationResult {
    /// Placements in the order they were committed.
    pub scheduled_hearings: Vec<ScheduledHearing>,
    /// Cases left without a slot, in processing order.
    pub unplaced_cases: Vec<UnplacedCase>,
    pub statistics: AllocationStatistics,
}

/// A committed placement of one case.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScheduledHearing {
    pub case_id: String,
    pub bench_id: String,
    pub hearing_date: NaiveDate,
    pub start_time: NaiveTime,
    /// Slot index on the bench-day.
    #[serde(skip)]
    pub slot: u32,
    #[serde(skip)]
    pub duration_minutes: u32,
    #[serde(skip)]
    pub priority: Priority,
}

/// A case the scheduler could not place.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UnplacedCase {
    pub case_id: String,
    pub reason: UnplacedReason,
}

/// Why a case was not placed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UnplacedReason {
    /// No bench-day within the horizon had a free slot.
    NoCapacityInHorizon,
    MissingTrack,
    MissingPriority,
    /// Duration absent or zero.
    InvalidDuration,
    /// The same case id appeared earlier in the batch.
    DuplicateCase,
    /// Case is not filed / under review.
    IneligibleStatus,
    /// Case already holds a hearing in the store.
    AlreadyScheduled,
    /// The run was cancelled before this case was processed.
    AllocationCancelled,
}

impl UnplacedReason {
    pub fn as_str(self) -> &'static str {
        match self {
            UnplacedReason::NoCapacityInHorizon => "no_capacity_in_horizon",
            UnplacedReason::MissingTrack => "missing_track",
            UnplacedReason::MissingPriority => "missing_priority",
            UnplacedReason::InvalidDuration => "invalid_duration",
            UnplacedReason::DuplicateCase => "duplicate_case",
            UnplacedReason::IneligibleStatus => "ineligible_status",
            UnplacedReason::AlreadyScheduled => "already_scheduled",
            UnplacedReason::AllocationCancelled => "allocation_cancelled",
        }
    }

    /// Whether the case itself was malformed (as opposed to capacity or
    /// run-level conditions).
    pub fn is_validation_failure(self) -> bool {
        matches!(
            self,
            UnplacedReason::MissingTrack
                | UnplacedReason::MissingPriority
                | UnplacedReason::InvalidDuration
                | UnplacedReason::DuplicateCase
                | UnplacedReason::IneligibleStatus
        )
    }
}

impl fmt::Display for UnplacedReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Aggregate counts of a run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AllocationStatistics {
    pub total_scheduled: usize,
    /// Placed cases per priority; every priority is present.
    pub by_priority: BTreeMap<Priority, usize>,
}

impl Default for AllocationStatistics {
    fn default() -> Self {
        Self {
            total_scheduled: 0,
            by_priority: Priority::ALL.iter().map(|p| (*p, 0)).collect(),
        }
    }
}

impl ScheduledHearing {
    /// Deterministic hearing identifier derived from bench, date and slot.
    pub fn hearing_id(&self) -> String {
        format!("H-{}-{}-{}", self.bench_id, self.hearing_date, self.slot)
    }

    /// Materializes the hearing row this placement stands for.
    pub fn to_hearing(&self) -> Hearing {
        Hearing::new(
            self.hearing_id(),
            &self.case_id,
            &self.bench_id,
            self.hearing_date,
            self.start_time,
            self.slot,
            self.duration_minutes,
        )
    }
}

impl AllocationResult {
    /// Creates an empty result.
    pub fn new() -> Self {
        Self::default()
    }

    /// Records a placement and updates statistics.
    pub fn add_placement(&mut self, placement: ScheduledHearing) {
        self.statistics.total_scheduled += 1;
        *self
            .statistics
            .by_priority
            .entry(placement.priority)
            .or_insert(0) += 1;
        self.scheduled_hearings.push(placement);
    }

    /// Records an unplaced case.
    pub fn add_unplaced(&mut self, case_id: impl Into<String>, reason: UnplacedReason) {
        self.unplaced_cases.push(UnplacedCase {
            case_id: case_id.into(),
            reason,
        });
    }

    /// Placement for a case, if any.
    pub fn placement_for(&self, case_id: &str) -> Option<&ScheduledHearing> {
        self.scheduled_hearings.iter().find(|h| h.case_id == case_id)
    }

    /// Unplaced entry for a case, if any.
    pub fn unplaced_reason(&self, case_id: &str) -> Option<UnplacedReason> {
        self.unplaced_cases
            .iter()
            .find(|u| u.case_id == case_id)
            .map(|u| u.reason)
    }

    /// Placements on one bench.
    pub fn placements_for_bench(&self, bench_id: &str) -> Vec<&ScheduledHearing> {
        self.scheduled_hearings
            .iter()
            .filter(|h| h.bench_id == bench_id)
            .collect()
    }

    /// Placements on one date.
    pub fn placements_on(&self, date: NaiveDate) -> Vec<&ScheduledHearing> {
        self.scheduled_hearings
            .iter()
            .filter(|h| h.hearing_date == date)
            .collect()
    }

    /// Hearing rows for every placement, in commit order.
    pub fn hearings(&self) -> Vec<Hearing> {
        self.scheduled_hearings
            .iter()
            .map(ScheduledHearing::to_hearing)
            .collect()
    }

    /// Number of cases accounted for (placed + unplaced).
    pub fn case_count(&self) -> usize {
        self.scheduled_hearings.len() + self.unplaced_cases.len()
    }

    /// Compact JSON with fixed field order, for determinism comparisons.
    pub fn canonical_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }
}

/// A problem found when auditing a set of hearings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Conflict {
    pub kind: ConflictKind,
    pub bench_id: String,
    pub date: NaiveDate,
    /// Hearings involved.
    pub hearing_ids: Vec<String>,
    pub message: String,
}

/// Classification of hearing conflicts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConflictKind {
    /// Two hearings share a bench, date and slot.
    DoubleBooking,
    /// More hearings on a bench-day than its effective slots.
    CapacityExceeded,
    /// [start, start + duration) intervals overlap on a bench-day.
    TimeOverlap,
    /// Hearing on an inactive or unknown bench.
    UnknownBench,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn placement(case_id: &str, bench: &str, day: u32, slot: u32, p: Priority) -> ScheduledHearing {
        ScheduledHearing {
            case_id: case_id.into(),
            bench_id: bench.into(),
            hearing_date: NaiveDate::from_ymd_opt(2024, 2, day).unwrap(),
            start_time: NaiveTime::from_hms_opt(9, 0, 0).unwrap(),
            slot,
            duration_minutes: 60,
            priority: p,
        }
    }

    fn sample_result() -> AllocationResult {
        let mut r = AllocationResult::new();
        r.add_placement(placement("C1", "B1", 5, 0, Priority::Urgent));
        r.add_placement(placement("C2", "B2", 5, 0, Priority::High));
        r.add_placement(placement("C3", "B1", 6, 0, Priority::High));
        r.add_unplaced("C4", UnplacedReason::NoCapacityInHorizon);
        r
    }

    #[test]
    fn test_statistics_track_placements() {
        let r = sample_result();
        assert_eq!(r.statistics.total_scheduled, 3);
        assert_eq!(r.statistics.by_priority[&Priority::High], 2);
        assert_eq!(r.statistics.by_priority[&Priority::Urgent], 1);
        assert_eq!(r.statistics.by_priority[&Priority::Low], 0);
        assert_eq!(r.case_count(), 4);
    }

    #[test]
    fn test_lookups() {
        let r = sample_result();
        assert_eq!(r.placement_for("C2").unwrap().bench_id, "B2");
        assert!(r.placement_for("C4").is_none());
        assert_eq!(
            r.unplaced_reason("C4"),
            Some(UnplacedReason::NoCapacityInHorizon)
        );
        assert_eq!(r.placements_for_bench("B1").len(), 2);
        assert_eq!(
            r.placements_on(NaiveDate::from_ymd_opt(2024, 2, 5).unwrap())
                .len(),
            2
        );
    }

    #[test]
    fn test_hearing_materialization() {
        let r = sample_result();
        let hearings = r.hearings();
        assert_eq!(hearings.len(), 3);
        assert_eq!(hearings[0].id, "H-B1-2024-02-05-0");
        assert_eq!(hearings[0].duration_minutes, 60);
    }

    #[test]
    fn test_wire_shape() {
        let mut r = AllocationResult::new();
        r.add_placement(placement("C1", "B1", 5, 2, Priority::High));
        r.add_unplaced("C9", UnplacedReason::NoCapacityInHorizon);

        let json = r.canonical_json().unwrap();
        assert_eq!(
            json,
            concat!(
                r#"{"scheduled_hearings":[{"case_id":"C1","bench_id":"B1","hearing_date":"2024-02-05","start_time":"09:00:00"}],"#,
                r#""unplaced_cases":[{"case_id":"C9","reason":"no_capacity_in_horizon"}],"#,
                r#""statistics":{"total_scheduled":1,"by_priority":{"low":0,"medium":0,"high":1,"urgent":0}}}"#
            )
        );
    }

    #[test]
    fn test_reason_categories() {
        assert!(UnplacedReason::MissingTrack.is_validation_failure());
        assert!(!UnplacedReason::NoCapacityInHorizon.is_validation_failure());
        assert!(!UnplacedReason::AllocationCancelled.is_validation_failure());
        assert_eq!(
            UnplacedReason::AllocationCancelled.to_string(),
            "allocation_cancelled"
        );
    }
}
