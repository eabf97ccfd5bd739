//! Rule engine for multi-criteria case ordering.
//!
//! Composes dispatching rules in sequence: each later rule only decides
//! ties left by the earlier ones, then a final tie-breaking strategy.
//!
//! # Reference
//! Haupt (1989), "A Survey of Priority Rule-Based Scheduling"

use std::sync::Arc;

use super::{rules, DispatchContext, DispatchingRule, RuleScore};
use crate::models::Case;

/// How ties are broken after all rules are exhausted.
#[derive(Debug, Clone, Default)]
pub enum TieBreaker {
    /// Use the next rule in the chain (default).
    #[default]
    NextRule,
    /// Deterministic by case ID (lexicographic).
    ById,
}

/// A composable rule engine for case prioritization.
///
/// Evaluates rules as sequential layers (primary rule → tie-breaker).
#[derive(Clone)]
pub struct RuleEngine {
    rules: Vec<Arc<dyn DispatchingRule>>,
    tie_breaker: TieBreaker,
    epsilon: f64,
}

impl RuleEngine {
    /// Creates an empty rule engine.
    pub fn new() -> Self {
        Self {
            rules: Vec::new(),
            tie_breaker: TieBreaker::NextRule,
            epsilon: 1e-9,
        }
    }

    /// The allocation order: priority desc, filing date asc, case id asc.
    pub fn case_order() -> Self {
        Self::new()
            .with_rule(rules::HighestPriority)
            .with_tie_breaker(rules::Fifo)
            .with_final_tie_breaker(TieBreaker::ById)
    }

    /// Adds a primary rule.
    pub fn with_rule<R: DispatchingRule + 'static>(mut self, rule: R) -> Self {
        self.rules.push(Arc::new(rule));
        self
    }

    /// Adds a tie-breaking rule, consulted only when earlier rules tie.
    pub fn with_tie_breaker<R: DispatchingRule + 'static>(self, rule: R) -> Self {
        self.with_rule(rule)
    }

    /// Sets the final tie-breaking strategy.
    pub fn with_final_tie_breaker(mut self, tie_breaker: TieBreaker) -> Self {
        self.tie_breaker = tie_breaker;
        self
    }

    /// Sorts cases by priority (highest priority first).
    ///
    /// Returns indices into the input slice. The sort is stable, so
    /// fully tied cases keep their input order under `TieBreaker::NextRule`.
    pub fn sort_indices(&self, cases: &[Case], context: &DispatchContext) -> Vec<usize> {
        if cases.is_empty() {
            return Vec::new();
        }

        let mut indices: Vec<usize> = (0..cases.len()).collect();
        indices.sort_by(|&a, &b| self.compare_sequential(&cases[a], &cases[b], context));
        indices
    }

    /// Returns `cases` reordered by priority.
    pub fn sort<'a>(&self, cases: &'a [Case], context: &DispatchContext) -> Vec<&'a Case> {
        self.sort_indices(cases, context)
            .into_iter()
            .map(|i| &cases[i])
            .collect()
    }

    /// Evaluates a single case and returns the score of each rule.
    pub fn evaluate(&self, case: &Case, context: &DispatchContext) -> Vec<RuleScore> {
        self.rules
            .iter()
            .map(|rule| rule.evaluate(case, context))
            .collect()
    }

    fn compare_sequential(
        &self,
        a: &Case,
        b: &Case,
        context: &DispatchContext,
    ) -> std::cmp::Ordering {
        for rule in &self.rules {
            let score_a = rule.evaluate(a, context);
            let score_b = rule.evaluate(b, context);

            if (score_a - score_b).abs() > self.epsilon {
                return score_a
                    .partial_cmp(&score_b)
                    .unwrap_or(std::cmp::Ordering::Equal);
            }
        }

        self.final_tie_break(a, b)
    }

    fn final_tie_break(&self, a: &Case, b: &Case) -> std::cmp::Ordering {
        match &self.tie_breaker {
            TieBreaker::NextRule => std::cmp::Ordering::Equal,
            TieBreaker::ById => a.id.cmp(&b.id),
        }
    }
}

impl Default for RuleEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for RuleEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RuleEngine")
            .field(
                "rules",
                &self
                    .rules
                    .iter()
                    .map(|r| r.name())
                    .collect::<Vec<_>>(),
            )
            .field("tie_breaker", &self.tie_breaker)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dispatching::rules;
    use crate::models::{CaseType, Priority};
    use chrono::NaiveDate;

    fn date(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 1, d).unwrap()
    }

    fn make_case(id: &str, priority: Priority, filed: u32, minutes: u32) -> Case {
        Case::new(id, CaseType::Civil, date(filed))
            .with_priority(priority)
            .with_duration(minutes)
    }

    fn ctx() -> DispatchContext {
        DispatchContext::as_of(date(31))
    }

    fn ids(engine: &RuleEngine, cases: &[Case]) -> Vec<String> {
        engine
            .sort(cases, &ctx())
            .into_iter()
            .map(|c| c.id.clone())
            .collect()
    }

    #[test]
    fn test_priority_ordering() {
        let cases = vec![
            make_case("low", Priority::Low, 1, 60),
            make_case("urgent", Priority::Urgent, 20, 60),
            make_case("medium", Priority::Medium, 5, 60),
        ];
        let engine = RuleEngine::new().with_rule(rules::HighestPriority);
        assert_eq!(ids(&engine, &cases), vec!["urgent", "medium", "low"]);
    }

    #[test]
    fn test_sequential_with_tie_breaker() {
        let cases = vec![
            make_case("late", Priority::High, 10, 60),
            make_case("early", Priority::High, 2, 60),
        ];
        let engine = RuleEngine::new()
            .with_rule(rules::HighestPriority)
            .with_tie_breaker(rules::Fifo);
        // Priority ties → FIFO breaks it
        assert_eq!(ids(&engine, &cases), vec!["early", "late"]);
    }

    #[test]
    fn test_case_order_breaks_full_ties_by_id() {
        let cases = vec![
            make_case("C-3", Priority::Medium, 4, 60),
            make_case("C-1", Priority::Medium, 4, 60),
            make_case("C-2", Priority::High, 9, 60),
        ];
        assert_eq!(
            ids(&RuleEngine::case_order(), &cases),
            vec!["C-2", "C-1", "C-3"]
        );
    }

    #[test]
    fn test_case_order_is_input_order_independent() {
        let mut cases = vec![
            make_case("B", Priority::Low, 3, 60),
            make_case("A", Priority::Low, 3, 60),
            make_case("C", Priority::Urgent, 7, 60),
            make_case("D", Priority::Medium, 1, 60),
        ];
        let engine = RuleEngine::case_order();
        let first = ids(&engine, &cases);
        cases.reverse();
        assert_eq!(ids(&engine, &cases), first);
    }

    #[test]
    fn test_input_order_kept_without_final_tie_breaker() {
        let cases = vec![
            make_case("Z", Priority::Medium, 4, 60),
            make_case("A", Priority::Medium, 4, 60),
        ];
        let engine = RuleEngine::new()
            .with_rule(rules::HighestPriority)
            .with_tie_breaker(rules::Fifo);
        assert_eq!(ids(&engine, &cases), vec!["Z", "A"]);
    }

    #[test]
    fn test_empty_cases() {
        let engine = RuleEngine::case_order();
        assert!(engine.sort_indices(&[], &ctx()).is_empty());
    }

    #[test]
    fn test_evaluate_scores() {
        let case = make_case("T1", Priority::High, 1, 90);
        let engine = RuleEngine::new()
            .with_rule(rules::HighestPriority)
            .with_rule(rules::Spt);

        let scores = engine.evaluate(&case, &ctx());
        assert_eq!(scores.len(), 2);
        assert!((scores[0] + 2.0).abs() < 1e-10);
        assert!((scores[1] - 90.0).abs() < 1e-10);
    }
}
