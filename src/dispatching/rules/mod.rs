//! Built-in dispatching rules.
//!
//! # Categories
//!
//! - **Priority**: PRIORITY
//! - **Arrival**: FIFO
//! - **Duration**: SPT
//!
//! # Score Convention
//! All rules return lower scores for cases that should be offered first.
//!
//! # References
//! - Pinedo (2016), "Scheduling: Theory, Algorithms, and Systems", Ch. 4
//! - Haupt (1989), "A Survey of Priority Rule-Based Scheduling"

use chrono::Datelike;

use super::{DispatchContext, DispatchingRule, RuleScore};
use crate::models::Case;

// ======================== Priority rules ========================

/// Highest priority first.
///
/// Score is the negated priority rank; a case without a priority ranks
/// below `Low`.
#[derive(Debug, Clone, Copy)]
pub struct HighestPriority;

impl DispatchingRule for HighestPriority {
    fn name(&self) -> &'static str {
        "PRIORITY"
    }

    fn evaluate(&self, case: &Case, _context: &DispatchContext) -> RuleScore {
        -case.priority.map_or(-1.0, |p| f64::from(p.rank()))
    }

    fn description(&self) -> &'static str {
        "Highest Priority First"
    }
}

// ======================== Arrival rules ========================

/// First In, First Out.
///
/// Earliest filing date first.
#[derive(Debug, Clone, Copy)]
pub struct Fifo;

impl DispatchingRule for Fifo {
    fn name(&self) -> &'static str {
        "FIFO"
    }

    fn evaluate(&self, case: &Case, _context: &DispatchContext) -> RuleScore {
        f64::from(case.filing_date.num_days_from_ce())
    }

    fn description(&self) -> &'static str {
        "First In First Out"
    }
}

// ======================== Duration rules ========================

/// Shortest estimated hearing first.
///
/// Cases without an estimate go last.
#[derive(Debug, Clone, Copy)]
pub struct Spt;

impl DispatchingRule for Spt {
    fn name(&self) -> &'static str {
        "SPT"
    }

    fn evaluate(&self, case: &Case, _context: &DispatchContext) -> RuleScore {
        case.estimated_duration_minutes.map_or(f64::MAX, f64::from)
    }

    fn description(&self) -> &'static str {
        "Shortest Processing Time"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{CaseType, Priority};
    use chrono::NaiveDate;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn ctx() -> DispatchContext {
        DispatchContext::as_of(date(2024, 6, 1))
    }

    fn case(id: &str) -> Case {
        Case::new(id, CaseType::Civil, date(2024, 1, 1))
    }

    #[test]
    fn test_priority() {
        let urgent = case("U").with_priority(Priority::Urgent);
        let low = case("L").with_priority(Priority::Low);
        let none = case("N");
        assert!(HighestPriority.evaluate(&urgent, &ctx()) < HighestPriority.evaluate(&low, &ctx()));
        assert!(HighestPriority.evaluate(&low, &ctx()) < HighestPriority.evaluate(&none, &ctx()));
        assert!((HighestPriority.evaluate(&urgent, &ctx()) + 3.0).abs() < 1e-10);
    }

    #[test]
    fn test_fifo() {
        let early = Case::new("E", CaseType::Civil, date(2024, 1, 1));
        let late = Case::new("L", CaseType::Civil, date(2024, 3, 1));
        assert!(Fifo.evaluate(&early, &ctx()) < Fifo.evaluate(&late, &ctx()));
    }

    #[test]
    fn test_spt() {
        let short = case("S").with_duration(30);
        let long = case("L").with_duration(300);
        let unknown = case("U");
        assert!(Spt.evaluate(&short, &ctx()) < Spt.evaluate(&long, &ctx()));
        assert!(Spt.evaluate(&long, &ctx()) < Spt.evaluate(&unknown, &ctx()));
    }

    #[test]
    fn test_names() {
        assert_eq!(HighestPriority.name(), "PRIORITY");
        assert_eq!(Fifo.description(), "First In First Out");
        assert_eq!(Spt.name(), "SPT");
    }
}
