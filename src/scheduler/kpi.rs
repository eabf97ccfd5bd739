//! Allocation quality metrics (KPIs).
//!
//! Computes indicators from a finished allocation, its input cases and the
//! bench capacity that was on offer.
//!
//! # Metrics
//!
//! | Metric | Definition |
//! |--------|-----------|
//! | Placement Rate | scheduled / total cases × 100 |
//! | Bench Utilization | hearings / (effective slots × sitting days) |
//! | Hearings per Day | count of placements per date |
//! | Lead Time | hearing date − filing date, in days |
//! | Avg Duration | mean estimated minutes of placed cases |
//!
//! # Reference
//! Pinedo (2016), "Scheduling", Ch. 1.2: Performance Measures

use chrono::NaiveDate;
use serde::Serialize;
use std::collections::{BTreeMap, HashMap};

use crate::models::{AllocationResult, Bench, Case};

/// Allocation performance indicators.
#[derive(Debug, Clone, Serialize)]
pub struct AllocationKpi {
    pub total_cases: usize,
    pub scheduled_count: usize,
    pub unplaced_count: usize,
    /// Percentage of cases placed (0.0..100.0).
    pub placement_rate: f64,
    /// Per-bench utilization of offered slots (0.0..1.0).
    pub utilization_by_bench: BTreeMap<String, f64>,
    /// Mean bench utilization (0.0..1.0).
    pub avg_utilization: f64,
    pub hearings_per_day: BTreeMap<NaiveDate, usize>,
    /// Mean days from filing to hearing.
    pub avg_lead_days: f64,
    pub max_lead_days: i64,
    pub total_duration_minutes: u64,
    pub avg_duration_minutes: f64,
}

impl AllocationKpi {
    /// Computes KPIs.
    ///
    /// # Arguments
    /// * `result` - The finished allocation.
    /// * `cases` - Input cases (for filing dates).
    /// * `benches` - Benches that were offered.
    /// * `days` - Working days of the horizon.
    /// * `slack_percentage` - Slack used for the run.
    pub fn calculate(
        result: &AllocationResult,
        cases: &[Case],
        benches: &[Bench],
        days: &[NaiveDate],
        slack_percentage: f64,
    ) -> Self {
        let filed: HashMap<&str, NaiveDate> =
            cases.iter().map(|c| (c.id.as_str(), c.filing_date)).collect();

        let scheduled = result.scheduled_hearings.len();
        let total = result.case_count();

        let mut hearings_per_day = BTreeMap::new();
        let mut per_bench: HashMap<&str, usize> = HashMap::new();
        let mut total_lead: i64 = 0;
        let mut max_lead: i64 = 0;
        let mut counted_leads: usize = 0;
        let mut total_duration: u64 = 0;

        for h in &result.scheduled_hearings {
            *hearings_per_day.entry(h.hearing_date).or_insert(0) += 1;
            *per_bench.entry(h.bench_id.as_str()).or_insert(0) += 1;
            total_duration += u64::from(h.duration_minutes);

            if let Some(filing) = filed.get(h.case_id.as_str()) {
                let lead = (h.hearing_date - *filing).num_days();
                total_lead += lead;
                max_lead = max_lead.max(lead);
                counted_leads += 1;
            }
        }

        let mut utilization_by_bench = BTreeMap::new();
        for bench in benches.iter().filter(|b| b.is_active) {
            let sitting = days.iter().filter(|d| bench.sits_on(**d)).count();
            let offered = bench.effective_slots(slack_percentage) as usize * sitting;
            let used = per_bench.get(bench.id.as_str()).copied().unwrap_or(0);
            let utilization = if offered == 0 {
                0.0
            } else {
                used as f64 / offered as f64
            };
            utilization_by_bench.insert(bench.id.clone(), utilization);
        }

        let avg_utilization = if utilization_by_bench.is_empty() {
            0.0
        } else {
            let sum: f64 = utilization_by_bench.values().sum();
            sum / utilization_by_bench.len() as f64
        };

        let placement_rate = if total == 0 {
            0.0
        } else {
            scheduled as f64 / total as f64 * 100.0
        };

        let avg_lead_days = if counted_leads == 0 {
            0.0
        } else {
            total_lead as f64 / counted_leads as f64
        };

        let avg_duration_minutes = if scheduled == 0 {
            0.0
        } else {
            total_duration as f64 / scheduled as f64
        };

        Self {
            total_cases: total,
            scheduled_count: scheduled,
            unplaced_count: result.unplaced_cases.len(),
            placement_rate,
            utilization_by_bench,
            avg_utilization,
            hearings_per_day,
            avg_lead_days,
            max_lead_days: max_lead,
            total_duration_minutes: total_duration,
            avg_duration_minutes,
        }
    }

    /// Whether the allocation meets the given quality thresholds.
    pub fn meets_thresholds(&self, min_placement_rate: f64, max_avg_lead_days: f64) -> bool {
        self.placement_rate >= min_placement_rate && self.avg_lead_days <= max_avg_lead_days
    }
}
