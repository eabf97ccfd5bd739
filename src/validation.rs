//! Input validation for allocation runs.
//!
//! Two levels:
//! - **Resources and horizon** are checked up front. Any problem is a
//!   [`ConfigurationError`] and the run does not start.
//! - **Cases** are screened one by one. A bad case never aborts the run;
//!   it is reported as unplaced with a typed [`UnplacedReason`].

use chrono::NaiveDate;
use std::collections::HashSet;

use crate::config::SchedulerConfig;
use crate::error::ConfigurationError;
use crate::models::{Bench, Case, UnplacedReason};
use crate::scheduler::SlotStore;

/// Resolved resources for a run.
#[derive(Debug, Clone, PartialEq)]
pub struct Horizon {
    /// Working days in chronological order.
    pub days: Vec<NaiveDate>,
    /// Active benches with positive effective capacity, sorted by id.
    pub benches: Vec<Bench>,
}

/// Validates configuration, benches and horizon.
///
/// Checks, in order:
/// 1. Configuration value ranges
/// 2. `num_days > 0`
/// 3. No duplicate bench IDs
/// 4. At least one active bench
/// 5. At least one active bench with positive effective capacity
/// 6. At least one working day in the window
pub fn validate_resources(
    benches: &[Bench],
    config: &SchedulerConfig,
    start_date: NaiveDate,
    num_days: u32,
) -> Result<Horizon, ConfigurationError> {
    config.validate()?;

    if num_days == 0 {
        return Err(ConfigurationError::EmptyHorizon);
    }

    let mut ids = HashSet::new();
    for b in benches {
        if !ids.insert(b.id.as_str()) {
            return Err(ConfigurationError::DuplicateBench(b.id.clone()));
        }
    }

    if !benches.iter().any(|b| b.is_active) {
        return Err(ConfigurationError::NoActiveBenches);
    }

    let mut usable: Vec<Bench> = benches
        .iter()
        .filter(|b| b.effective_slots(config.slack_percentage) > 0)
        .cloned()
        .collect();
    if usable.is_empty() {
        return Err(ConfigurationError::NoCapacity {
            slack: config.slack_percentage,
        });
    }
    usable.sort_by(|a, b| a.id.cmp(&b.id));

    let days = config.calendar.working_days(start_date, num_days);
    if days.is_empty() {
        return Err(ConfigurationError::NoWorkingDays {
            start: start_date,
            num_days,
        });
    }

    Ok(Horizon {
        days,
        benches: usable,
    })
}

/// Checks the fields the scheduler needs on one case.
///
/// Order of checks: status, track, priority, duration.
pub fn validate_case(case: &Case) -> Result<(), UnplacedReason> {
    if !case.is_pending() {
        return Err(UnplacedReason::IneligibleStatus);
    }
    if case.track.is_none() {
        return Err(UnplacedReason::MissingTrack);
    }
    if case.priority.is_none() {
        return Err(UnplacedReason::MissingPriority);
    }
    match case.estimated_duration_minutes {
        Some(m) if m > 0 => Ok(()),
        _ => Err(UnplacedReason::InvalidDuration),
    }
}

/// Outcome of screening a batch.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Screening {
    /// Indices of cases that may be offered to the calendar, in input order.
    pub eligible: Vec<usize>,
    /// Rejected case indices with their reason, in input order.
    pub rejected: Vec<(usize, UnplacedReason)>,
}

/// Screens a batch against the store.
///
/// The first occurrence of an id is screened normally; later occurrences
/// are rejected as duplicates. Cases already holding a slot in `store` are
/// rejected as already scheduled.
pub fn screen_cases<S: SlotStore + ?Sized>(cases: &[Case], store: &S) -> Screening {
    let mut screening = Screening::default();
    let mut seen = HashSet::new();

    for (i, case) in cases.iter().enumerate() {
        let outcome = if !seen.insert(case.id.as_str()) {
            Err(UnplacedReason::DuplicateCase)
        } else if store.holds_case(&case.id) {
            Err(UnplacedReason::AlreadyScheduled)
        } else {
            validate_case(case)
        };

        match outcome {
            Ok(()) => screening.eligible.push(i),
            Err(reason) => {
                tracing::warn!(case_id = %case.id, reason = %reason, "case rejected before allocation");
                screening.rejected.push((i, reason));
            }
        }
    }

    screening
}
