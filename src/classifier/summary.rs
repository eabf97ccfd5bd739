use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use super::ClassificationResult;
use crate::models::Track;

/// Aggregate view of a classified batch.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClassificationSummary {
    pub total_cases: usize,
    /// Count per track; every track is present.
    pub track_distribution: BTreeMap<Track, usize>,
    /// Share per track in percent, rounded to 2 decimals.
    pub track_percentages: BTreeMap<Track, f64>,
    pub average_score: f64,
    pub average_confidence: f64,
}

impl ClassificationSummary {
    /// Summarizes a batch of results. An empty batch yields all zeros.
    pub fn from_results(results: &[ClassificationResult]) -> Self {
        let mut track_distribution: BTreeMap<Track, usize> =
            Track::TIE_BREAK_ORDER.iter().map(|t| (*t, 0)).collect();
        for r in results {
            *track_distribution.entry(r.track).or_insert(0) += 1;
        }

        let total = results.len();
        let share = |n: usize| {
            if total == 0 {
                0.0
            } else {
                round2(n as f64 / total as f64 * 100.0)
            }
        };
        let track_percentages = track_distribution
            .iter()
            .map(|(t, n)| (*t, share(*n)))
            .collect();

        let mean = |f: fn(&ClassificationResult) -> f64| {
            if total == 0 {
                0.0
            } else {
                round2(results.iter().map(f).sum::<f64>() / total as f64)
            }
        };

        Self {
            total_cases: total,
            track_distribution,
            track_percentages,
            average_score: mean(|r| r.track_score),
            average_confidence: mean(|r| r.confidence),
        }
    }

    /// Count for one track.
    pub fn count(&self, track: Track) -> usize {
        self.track_distribution.get(&track).copied().unwrap_or(0)
    }
}

fn round2(x: f64) -> f64 {
    (x * 100.0).round() / 100.0
}
