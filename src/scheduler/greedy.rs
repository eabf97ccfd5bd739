//! Greedy multi-bench hearing allocator.
//!
//! # Algorithm
//!
//! 1. Validate configuration, benches and horizon (fatal on error).
//! 2. Screen cases; rejects become unplaced entries with a reason.
//! 3. Order eligible cases with the dispatching rule engine
//!    (default: priority desc → filing date asc → id asc).
//! 4. For each case, walk working days chronologically and benches in
//!    scan order; on the first bench-day with remaining capacity, commit
//!    the lowest free slot through the [`SlotStore`].
//! 5. A commit the store refuses is a lost race: try the next free slot,
//!    then the next bench-day. Each candidate slot is tried at most once.
//!
//! # Complexity
//! O(n · d · b · s) where n=cases, d=working days, b=benches, s=slots/day.
//!
//! # Reference
//! Pinedo (2016), "Scheduling", Ch. 4: Priority Dispatching

use chrono::NaiveDate;

use super::{CancellationFlag, SlotStore};
use crate::config::{BenchSelection, SchedulerConfig};
use crate::dispatching::{DispatchContext, RuleEngine};
use crate::error::ConfigurationError;
use crate::models::{AllocationResult, Bench, Case, ScheduledHearing, UnplacedReason};
use crate::validation::{screen_cases, validate_resources};

/// Input container for one allocation run.
#[derive(Debug, Clone)]
pub struct AllocationRequest {
    /// Cases to place. Must carry track, priority and duration.
    pub cases: Vec<Case>,
    /// Benches offering capacity.
    pub benches: Vec<Bench>,
    /// First calendar day of the horizon.
    pub start_date: NaiveDate,
    /// Calendar days in the horizon (non-working days are skipped).
    pub num_days: u32,
    /// Reference "today" for age-based dispatching rules.
    pub as_of: NaiveDate,
}

impl AllocationRequest {
    /// Creates a request; `as_of` defaults to `start_date`.
    pub fn new(cases: Vec<Case>, benches: Vec<Bench>, start_date: NaiveDate, num_days: u32) -> Self {
        Self {
            cases,
            benches,
            start_date,
            num_days,
            as_of: start_date,
        }
    }

    /// Sets the reference date.
    pub fn with_as_of(mut self, as_of: NaiveDate) -> Self {
        self.as_of = as_of;
        self
    }
}

/// Greedy, priority-driven, first-fit hearing scheduler.
///
/// # Example
///
/// ```
/// use chrono::NaiveDate;
/// use dcm_schedule::models::{Bench, Case, CaseType, Priority, Track};
/// use dcm_schedule::scheduler::{AllocationRequest, GreedyScheduler, InMemorySlotStore};
///
/// let monday = NaiveDate::from_ymd_opt(2024, 2, 5).unwrap();
/// let cases = vec![Case::new("C1", CaseType::Civil, monday)
///     .with_track(Track::Regular)
///     .with_priority(Priority::High)
///     .with_duration(60)];
/// let request = AllocationRequest::new(cases, vec![Bench::new("B1", 10)], monday, 5);
///
/// let mut store = InMemorySlotStore::new();
/// let result = GreedyScheduler::new().allocate(&request, &mut store).unwrap();
/// assert_eq!(result.statistics.total_scheduled, 1);
/// assert_eq!(result.scheduled_hearings[0].hearing_date, monday);
/// ```
#[derive(Debug, Clone)]
pub struct GreedyScheduler {
    config: SchedulerConfig,
    rule_engine: RuleEngine,
    cancel: Option<CancellationFlag>,
}

impl GreedyScheduler {
    /// Creates a scheduler with the default configuration and case order.
    pub fn new() -> Self {
        Self {
            config: SchedulerConfig::default(),
            rule_engine: RuleEngine::case_order(),
            cancel: None,
        }
    }

    /// Replaces the configuration.
    pub fn with_config(mut self, config: SchedulerConfig) -> Self {
        self.config = config;
        self
    }

    /// Sets the slack percentage.
    pub fn with_slack(mut self, slack_percentage: f64) -> Self {
        self.config.slack_percentage = slack_percentage;
        self
    }

    /// Sets a rule engine for case ordering.
    pub fn with_rule_engine(mut self, engine: RuleEngine) -> Self {
        self.rule_engine = engine;
        self
    }

    /// Observes `flag` between cases.
    pub fn with_cancellation(mut self, flag: CancellationFlag) -> Self {
        self.cancel = Some(flag);
        self
    }

    /// The active configuration.
    pub fn config(&self) -> &SchedulerConfig {
        &self.config
    }

    /// Allocates the request's cases into `store`.
    ///
    /// Every input case appears exactly once in the result, either as a
    /// scheduled hearing or as an unplaced case.
    pub fn allocate<S: SlotStore + ?Sized>(
        &self,
        request: &AllocationRequest,
        store: &mut S,
    ) -> Result<AllocationResult, ConfigurationError> {
        let horizon = validate_resources(
            &request.benches,
            &self.config,
            request.start_date,
            request.num_days,
        )?;

        tracing::info!(
            cases = request.cases.len(),
            benches = horizon.benches.len(),
            working_days = horizon.days.len(),
            slack = self.config.slack_percentage,
            "allocation started"
        );

        let mut result = AllocationResult::new();
        let screening = screen_cases(&request.cases, &*store);
        for (i, reason) in &screening.rejected {
            result.add_unplaced(&request.cases[*i].id, *reason);
        }

        let eligible: Vec<Case> = screening
            .eligible
            .iter()
            .map(|&i| request.cases[i].clone())
            .collect();
        let context = DispatchContext::as_of(request.as_of);
        let order = self.rule_engine.sort_indices(&eligible, &context);

        let mut cancelled = false;
        for idx in order {
            let case = &eligible[idx];

            if !cancelled && self.is_cancelled() {
                cancelled = true;
                tracing::warn!(
                    placed = result.scheduled_hearings.len(),
                    "allocation cancelled; remaining cases left unplaced"
                );
            }
            if cancelled {
                result.add_unplaced(&case.id, UnplacedReason::AllocationCancelled);
                continue;
            }

            match self.place(case, &horizon.days, &horizon.benches, store) {
                Some(placement) => {
                    tracing::debug!(
                        case_id = %placement.case_id,
                        bench_id = %placement.bench_id,
                        date = %placement.hearing_date,
                        slot = placement.slot,
                        "case placed"
                    );
                    result.add_placement(placement);
                }
                None => {
                    tracing::debug!(case_id = %case.id, "no capacity left in horizon");
                    result.add_unplaced(&case.id, UnplacedReason::NoCapacityInHorizon);
                }
            }
        }

        tracing::info!(
            scheduled = result.statistics.total_scheduled,
            unplaced = result.unplaced_cases.len(),
            "allocation finished"
        );

        Ok(result)
    }

    fn is_cancelled(&self) -> bool {
        self.cancel.as_ref().is_some_and(CancellationFlag::is_cancelled)
    }

    /// First-fit search over days, then benches, then slots.
    fn place<S: SlotStore + ?Sized>(
        &self,
        case: &Case,
        days: &[NaiveDate],
        benches: &[Bench],
        store: &mut S,
    ) -> Option<ScheduledHearing> {
        let slack = self.config.slack_percentage;

        for &day in days {
            for bench in self.scan_order(benches, day, &*store) {
                let slots = bench.effective_slots(slack);
                if store.remaining_capacity(&bench.id, day, slots) == 0 {
                    continue;
                }
                for slot in 0..slots {
                    if !store.is_free(&bench.id, day, slot) {
                        continue;
                    }
                    if store.commit(&case.id, &bench.id, day, slot) {
                        return Some(ScheduledHearing {
                            case_id: case.id.clone(),
                            bench_id: bench.id.clone(),
                            hearing_date: day,
                            start_time: self.config.slot_start(bench, slot),
                            slot,
                            duration_minutes: case.estimated_duration_minutes.unwrap_or(0),
                            priority: case.priority.unwrap_or_default(),
                        });
                    }
                    tracing::debug!(
                        case_id = %case.id,
                        bench_id = %bench.id,
                        date = %day,
                        slot,
                        "slot taken during commit; trying next"
                    );
                }
            }
        }
        None
    }

    /// Benches sitting on `day`, in the configured scan order.
    fn scan_order<'a, S: SlotStore + ?Sized>(
        &self,
        benches: &'a [Bench],
        day: NaiveDate,
        store: &S,
    ) -> Vec<&'a Bench> {
        let mut sitting: Vec<&Bench> = benches.iter().filter(|b| b.sits_on(day)).collect();
        if self.config.bench_selection == BenchSelection::LeastLoaded {
            let slack = self.config.slack_percentage;
            // Stable sort keeps id order among equally loaded benches.
            sitting.sort_by_key(|b| {
                let slots = b.effective_slots(slack);
                slots - store.remaining_capacity(&b.id, day, slots)
            });
        }
        sitting
    }
}

impl Default for GreedyScheduler {
    fn default() -> Self {
        Self::new()
    }
}
