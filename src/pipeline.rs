//! End-to-end allocation: classify, then schedule.
//!
//! Cases arriving without a track or priority are classified first; cases
//! with a pre-set track keep it. The classified batch is then handed to the
//! greedy scheduler, and cases that received a hearing move to
//! `CaseStatus::Scheduled`.

use chrono::NaiveDate;
use std::collections::HashSet;

use crate::classifier::{ClassificationResult, ClassificationSummary, Classifier};
use crate::error::ConfigurationError;
use crate::models::{AllocationResult, Bench, Case, CaseStatus};
use crate::scheduler::{AllocationRequest, GreedyScheduler, InMemorySlotStore, SlotStore};

/// Output of a pipeline run.
#[derive(Debug, Clone)]
pub struct PipelineOutput {
    /// Input cases with classification applied and status updated.
    pub cases: Vec<Case>,
    /// Classifier output for every case that was missing a field.
    pub classifications: Vec<ClassificationResult>,
    pub result: AllocationResult,
}

impl PipelineOutput {
    /// Aggregate view of the classifications made in this run.
    pub fn classification_summary(&self) -> ClassificationSummary {
        ClassificationSummary::from_results(&self.classifications)
    }
}

/// Classifier and scheduler wired together.
#[derive(Debug, Clone, Default)]
pub struct AllocationPipeline {
    classifier: Classifier,
    scheduler: GreedyScheduler,
}

impl AllocationPipeline {
    /// Creates a pipeline with default rules and configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Replaces the classifier.
    pub fn with_classifier(mut self, classifier: Classifier) -> Self {
        self.classifier = classifier;
        self
    }

    /// Replaces the scheduler.
    pub fn with_scheduler(mut self, scheduler: GreedyScheduler) -> Self {
        self.scheduler = scheduler;
        self
    }

    pub fn classifier(&self) -> &Classifier {
        &self.classifier
    }

    pub fn scheduler(&self) -> &GreedyScheduler {
        &self.scheduler
    }

    /// Classifies missing fields, then allocates into `store`.
    pub fn run<S: SlotStore + ?Sized>(
        &self,
        mut request: AllocationRequest,
        store: &mut S,
    ) -> Result<PipelineOutput, ConfigurationError> {
        let classifications: Vec<ClassificationResult> = request
            .cases
            .iter_mut()
            .filter(|c| c.is_pending())
            .filter_map(|c| self.classifier.apply(c))
            .collect();

        let result = self.scheduler.allocate(&request, store)?;

        // only the first row of a repeated id was eligible for placement
        let mut cases = request.cases;
        let mut seen = HashSet::new();
        for case in &mut cases {
            if !seen.insert(case.id.clone()) {
                continue;
            }
            if result.placement_for(&case.id).is_some() && case.is_pending() {
                case.status = CaseStatus::Scheduled;
            }
        }

        Ok(PipelineOutput {
            cases,
            classifications,
            result,
        })
    }
}

/// Classifies and allocates `cases` over a fresh in-memory store.
///
/// `num_days` counts calendar days from `start_date`; weekends are skipped.
pub fn allocate(
    cases: &[Case],
    benches: &[Bench],
    start_date: NaiveDate,
    num_days: u32,
    slack_percentage: f64,
) -> Result<AllocationResult, ConfigurationError> {
    let pipeline = AllocationPipeline::new()
        .with_scheduler(GreedyScheduler::new().with_slack(slack_percentage));
    let request = AllocationRequest::new(cases.to_vec(), benches.to_vec(), start_date, num_days);
    let output = pipeline.run(request, &mut InMemorySlotStore::new())?;
    Ok(output.result)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{CaseType, Priority, Track, UnplacedReason};

    fn monday() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 2, 5).unwrap()
    }

    fn filed() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 1, 2).unwrap()
    }

    #[test]
    fn test_pipeline_classifies_then_schedules() {
        let cases = vec![
            Case::new("C1", CaseType::Criminal, filed())
                .with_title("Bail application")
                .with_synopsis("Regular bail for accused")
                .with_duration(60),
            Case::new("C2", CaseType::Civil, filed())
                .with_synopsis("Rent dispute with landlord")
                .with_duration(45),
        ];
        let request = AllocationRequest::new(cases, vec![Bench::new("B1", 2)], monday(), 5);
        let output = AllocationPipeline::new()
            .run(request, &mut InMemorySlotStore::new())
            .unwrap();

        assert_eq!(output.classifications.len(), 2);
        assert_eq!(output.cases[0].track, Some(Track::Fast));
        assert_eq!(output.cases[0].priority, Some(Priority::Urgent));
        assert!(output.cases.iter().all(|c| c.status == CaseStatus::Scheduled));
        // urgent bail case first
        assert_eq!(output.result.scheduled_hearings[0].case_id, "C1");
        assert_eq!(output.classification_summary().count(Track::Fast), 2);
    }

    #[test]
    fn test_pipeline_keeps_override_and_leaves_unplaced_pending() {
        let cases = vec![
            Case::new("C1", CaseType::Criminal, filed())
                .with_synopsis("Murder trial")
                .with_track(Track::Fast)
                .with_priority(Priority::Low)
                .with_duration(60),
            Case::new("C2", CaseType::Civil, filed())
                .with_synopsis("Habeas corpus petition")
                .with_duration(30),
        ];
        // one slot in the whole horizon
        let request = AllocationRequest::new(cases, vec![Bench::new("B1", 2)], monday(), 1);
        let output = AllocationPipeline::new()
            .run(request, &mut InMemorySlotStore::new())
            .unwrap();

        assert_eq!(output.classifications.len(), 1);
        assert_eq!(output.cases[0].track, Some(Track::Fast));
        assert_eq!(output.result.placement_for("C2").map(|h| h.priority), Some(Priority::Urgent));
        assert_eq!(
            output.result.unplaced_reason("C1"),
            Some(UnplacedReason::NoCapacityInHorizon)
        );
        assert_eq!(output.cases[0].status, CaseStatus::Filed);
    }

    #[test]
    fn test_summary_counts_override_track() {
        let cases = vec![Case::new("C1", CaseType::Civil, filed())
            .with_synopsis("Recovery suit for dues")
            .with_track(Track::Complex)
            .with_duration(60)];
        let request = AllocationRequest::new(cases, vec![Bench::new("B1", 10)], monday(), 5);
        let output = AllocationPipeline::new()
            .run(request, &mut InMemorySlotStore::new())
            .unwrap();

        assert_eq!(output.cases[0].track, Some(Track::Complex));
        assert_eq!(output.classifications[0].track, Track::Complex);
        let summary = output.classification_summary();
        assert_eq!(summary.count(Track::Complex), 1);
        assert_eq!(summary.count(Track::Regular), 0);
    }

    #[test]
    fn test_repeated_id_marks_only_first_row_scheduled() {
        let cases = vec![
            Case::new("C1", CaseType::Civil, filed())
                .with_synopsis("Rent dispute")
                .with_duration(30),
            Case::new("C1", CaseType::Civil, filed())
                .with_synopsis("Rent dispute, refiled")
                .with_duration(30),
        ];
        let request = AllocationRequest::new(cases, vec![Bench::new("B1", 10)], monday(), 5);
        let output = AllocationPipeline::new()
            .run(request, &mut InMemorySlotStore::new())
            .unwrap();

        assert_eq!(output.result.statistics.total_scheduled, 1);
        assert_eq!(output.result.case_count(), 2);
        assert_eq!(
            output.result.unplaced_reason("C1"),
            Some(UnplacedReason::DuplicateCase)
        );
        assert_eq!(output.cases[0].status, CaseStatus::Scheduled);
        assert_eq!(output.cases[1].status, CaseStatus::Filed);
    }

    #[test]
    fn test_allocate_free_function() {
        let cases: Vec<Case> = (0..12)
            .map(|i| {
                Case::new(format!("C{i:02}"), CaseType::Family, filed())
                    .with_synopsis("Maintenance petition")
                    .with_duration(60)
            })
            .collect();
        // capacity 10 at 20% slack -> 8 slots per day
        let result = allocate(&cases, &[Bench::new("B1", 10)], monday(), 1, 0.2).unwrap();
        assert_eq!(result.statistics.total_scheduled, 8);
        assert_eq!(result.unplaced_cases.len(), 4);
        assert_eq!(result.statistics.by_priority[&Priority::Medium], 8);
    }

    #[test]
    fn test_allocate_rejects_empty_horizon() {
        let err = allocate(&[], &[Bench::new("B1", 10)], monday(), 0, 0.15).unwrap_err();
        assert_eq!(err, ConfigurationError::EmptyHorizon);
    }

    #[test]
    fn test_insufficient_text_case_is_still_scheduled() {
        let cases = vec![Case::new("C1", CaseType::Civil, filed()).with_duration(30)];
        let result = allocate(&cases, &[Bench::new("B1", 10)], monday(), 5, 0.15).unwrap();
        assert_eq!(result.statistics.total_scheduled, 1);
    }
}
