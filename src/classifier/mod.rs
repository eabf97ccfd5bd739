//! Differentiated case management (DCM) track classifier.
//!
//! Assigns each case a complexity [`Track`] and, when the filer did not
//! supply one, a default [`Priority`]. Evaluation is a pure function of the
//! case and a declarative [`RuleTable`].
//!
//! # Algorithm
//!
//! 1. Every rule that fires adds its signed weight to one track bucket:
//!    keywords in the full text, title hints, case-type bias, every duration
//!    band containing the estimate (bands may overlap), and baseline priors.
//! 2. The highest bucket wins. Ties go to Complex, then Regular, then Fast.
//! 3. `confidence = (best - runner_up) / best`, clamped to [0, 1].
//! 4. Missing priority: the highest-ranked priority keyword present, else
//!    the default for the (override or derived) track.
//!
//! A track already set on the case is authoritative: it is returned as is,
//! with the single reason `override`, and no rule is evaluated for it.
//!
//! Cases with no text at all are never rejected: they classify as Regular
//! with zero confidence and the single reason `insufficient_text`.
//!
//! # Usage
//!
//! ```
//! use chrono::NaiveDate;
//! use dcm_schedule::classifier::Classifier;
//! use dcm_schedule::models::{Case, CaseType, Priority, Track};
//!
//! let case = Case::new("C1", CaseType::Criminal, NaiveDate::from_ymd_opt(2024, 1, 15).unwrap())
//!     .with_title("State v. Roe")
//!     .with_synopsis("Murder and criminal conspiracy")
//!     .with_duration(300);
//!
//! let result = Classifier::new().classify(&case);
//! assert_eq!(result.track, Track::Complex);
//! assert_eq!(result.priority, Priority::High);
//! ```

pub mod rules;
mod summary;

pub use rules::{KeywordRule, MatchMode, PriorityKeyword, RuleTable};
pub use summary::ClassificationSummary;

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::models::{Case, Priority, Track};

/// Reason reported for cases without any text to evaluate.
pub const INSUFFICIENT_TEXT: &str = "insufficient_text";

/// Reason reported when the case already carries a track.
pub const OVERRIDE: &str = "override";

/// Where a result's priority came from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "source", rename_all = "snake_case")]
pub enum PrioritySource {
    /// Filer supplied it; kept unchanged.
    Supplied,
    /// A priority keyword fired.
    Keyword { pattern: String },
    /// Fallback for the track.
    TrackDefault,
}

/// Output of classifying one case.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClassificationResult {
    pub case_id: String,
    pub track: Track,
    /// Accumulated score of the winning bucket (unbounded).
    pub track_score: f64,
    /// Names of the rules that fired, in evaluation order.
    pub reasons: Vec<String>,
    /// Normalized winning margin in [0, 1].
    pub confidence: f64,
    /// Final score of every bucket.
    pub scores: BTreeMap<Track, f64>,
    pub priority: Priority,
    pub priority_source: PrioritySource,
}

/// Rule-table driven classifier.
#[derive(Debug, Clone)]
pub struct Classifier {
    rules: RuleTable,
}

impl Classifier {
    /// Creates a classifier with the curated default tables.
    pub fn new() -> Self {
        Self::with_rules(RuleTable::default())
    }

    /// Creates a classifier with custom tables.
    pub fn with_rules(mut rules: RuleTable) -> Self {
        rules.normalize();
        Self { rules }
    }

    /// The tables in use.
    pub fn rules(&self) -> &RuleTable {
        &self.rules
    }

    /// Classifies one case. Never fails.
    pub fn classify(&self, case: &Case) -> ClassificationResult {
        let mut scores: BTreeMap<Track, f64> = Track::TIE_BREAK_ORDER
            .iter()
            .map(|t| (*t, 0.0))
            .collect();

        if let Some(track) = case.track {
            let track_score = case.track_score.unwrap_or(0.0);
            scores.insert(track, track_score);
            let (priority, priority_source) =
                self.resolve_priority(case, &case.searchable_text(), track);
            return ClassificationResult {
                case_id: case.id.clone(),
                track,
                track_score,
                reasons: vec![OVERRIDE.to_string()],
                confidence: 1.0,
                scores,
                priority,
                priority_source,
            };
        }

        if case.has_no_text() {
            let (priority, priority_source) = self.resolve_priority(case, "", Track::Regular);
            return ClassificationResult {
                case_id: case.id.clone(),
                track: Track::Regular,
                track_score: 0.0,
                reasons: vec![INSUFFICIENT_TEXT.to_string()],
                confidence: 0.0,
                scores,
                priority,
                priority_source,
            };
        }

        let text = case.searchable_text();
        let title = case.title.to_lowercase();
        let mut reasons = Vec::new();

        for (track, rules) in &self.rules.keywords {
            for rule in rules.iter().filter(|r| r.matches(&text)) {
                add(&mut scores, *track, rule.weight);
                reasons.push(format!("keyword:{track}:{}", rule.pattern));
            }
        }

        for (track, rules) in &self.rules.title_hints {
            for rule in rules.iter().filter(|r| r.matches(&title)) {
                add(&mut scores, *track, rule.weight);
                reasons.push(format!("title:{track}:{}", rule.pattern));
            }
        }

        for rule in self
            .rules
            .case_types
            .iter()
            .filter(|r| r.case_type == case.case_type)
        {
            add(&mut scores, rule.track, rule.weight);
            reasons.push(format!("case_type:{}:{}", case.case_type, rule.track));
        }

        if let Some(minutes) = case.estimated_duration_minutes {
            for band in self.rules.duration_bands.iter().filter(|b| b.contains(minutes)) {
                add(&mut scores, band.track, band.weight);
                reasons.push(format!("duration:{}", band.track));
            }
        }

        for (track, weight) in &self.rules.baseline {
            if *weight != 0.0 {
                add(&mut scores, *track, *weight);
                reasons.push(format!("baseline:{track}"));
            }
        }

        let (track, best, runner_up) = pick_winner(&scores);
        let confidence = if best > 0.0 {
            ((best - runner_up) / best).clamp(0.0, 1.0)
        } else {
            0.0
        };

        let (priority, priority_source) = self.resolve_priority(case, &text, track);

        let result = ClassificationResult {
            case_id: case.id.clone(),
            track,
            track_score: round2(best),
            reasons,
            confidence: round2(confidence),
            scores,
            priority,
            priority_source,
        };

        tracing::debug!(
            case_id = %case.id,
            track = %result.track,
            score = result.track_score,
            confidence = result.confidence,
            rules_fired = result.reasons.len(),
            "case classified"
        );

        result
    }

    /// Classifies every case, preserving input order.
    pub fn classify_batch(&self, cases: &[Case]) -> Vec<ClassificationResult> {
        cases.iter().map(|c| self.classify(c)).collect()
    }

    /// Fills in a missing track and/or priority on `case`.
    ///
    /// A track that is already set is authoritative and left untouched
    /// (as are its score and reasons). Returns `None` when nothing was
    /// missing.
    pub fn apply(&self, case: &mut Case) -> Option<ClassificationResult> {
        if case.track.is_some() && case.priority.is_some() {
            return None;
        }
        let result = self.classify(case);
        if case.track.is_none() {
            case.track = Some(result.track);
            case.track_score = Some(result.track_score);
            case.track_reasons = result.reasons.clone();
        }
        if case.priority.is_none() {
            case.priority = Some(result.priority);
        }
        Some(result)
    }

    fn resolve_priority(&self, case: &Case, text: &str, derived: Track) -> (Priority, PrioritySource) {
        if let Some(p) = case.priority {
            return (p, PrioritySource::Supplied);
        }

        let mut best: Option<&PriorityKeyword> = None;
        for rule in self.rules.priority_keywords.iter().filter(|r| r.matches(text)) {
            if best.map_or(true, |b| rule.priority > b.priority) {
                best = Some(rule);
            }
        }
        if let Some(rule) = best {
            return (
                rule.priority,
                PrioritySource::Keyword {
                    pattern: rule.pattern.clone(),
                },
            );
        }

        let track = case.track.unwrap_or(derived);
        let priority = self
            .rules
            .default_priority
            .get(&track)
            .copied()
            .unwrap_or_default();
        (priority, PrioritySource::TrackDefault)
    }
}

impl Default for Classifier {
    fn default() -> Self {
        Self::new()
    }
}

/// Classifies a case with the default tables.
pub fn classify(case: &Case) -> ClassificationResult {
    Classifier::new().classify(case)
}

fn add(scores: &mut BTreeMap<Track, f64>, track: Track, weight: f64) {
    *scores.entry(track).or_insert(0.0) += weight;
}

/// Returns (winner, winner score, best other score).
fn pick_winner(scores: &BTreeMap<Track, f64>) -> (Track, f64, f64) {
    let score_of = |t: Track| scores.get(&t).copied().unwrap_or(0.0);

    let mut winner = Track::TIE_BREAK_ORDER[0];
    for track in Track::TIE_BREAK_ORDER {
        // Strictly greater: earlier entries in the tie-break order keep ties.
        if score_of(track) > score_of(winner) {
            winner = track;
        }
    }
    let runner_up = Track::TIE_BREAK_ORDER
        .iter()
        .filter(|t| **t != winner)
        .map(|t| score_of(*t))
        .fold(f64::NEG_INFINITY, f64::max);

    (winner, score_of(winner), runner_up)
}

fn round2(x: f64) -> f64 {
    (x * 100.0).round() / 100.0
}
