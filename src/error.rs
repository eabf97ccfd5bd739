//! Error types.
//!
//! Only [`ConfigurationError`] aborts an allocation run. Per-case problems
//! are reported as [`UnplacedReason`](crate::models::UnplacedReason)
//! entries in the result instead.

use chrono::NaiveDate;
use thiserror::Error;

use crate::models::HearingStatus;

/// Fatal problems with the resource model or horizon of a run.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ConfigurationError {
    #[error("no active benches available for scheduling")]
    NoActiveBenches,

    #[error("no active bench has positive effective capacity at slack {slack}")]
    NoCapacity { slack: f64 },

    #[error("scheduling horizon must span at least one day")]
    EmptyHorizon,

    #[error("horizon starting {start} ({num_days} days) contains no working days")]
    NoWorkingDays { start: NaiveDate, num_days: u32 },

    #[error("slack percentage must be within [0, 1), got {0}")]
    InvalidSlack(f64),

    #[error("duplicate bench id: {0}")]
    DuplicateBench(String),

    #[error("working day must be between 1 and 1440 minutes, got {0}")]
    InvalidDayLength(u32),
}

/// Problems loading classifier rule tables or scheduler configuration.
#[derive(Error, Debug)]
pub enum RulesError {
    #[error("failed to parse configuration: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("invalid rule table: {0}")]
    Invalid(String),
}

/// Illegal hearing lifecycle operations.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum LifecycleError {
    #[error("hearing {hearing_id}: cannot move from {from:?} to {to:?}")]
    InvalidTransition {
        hearing_id: String,
        from: HearingStatus,
        to: HearingStatus,
    },

    #[error("hearing {hearing_id}: slot {slot} on {bench_id} {date} is no longer free")]
    SlotTaken {
        hearing_id: String,
        bench_id: String,
        date: NaiveDate,
        slot: u32,
    },
}
