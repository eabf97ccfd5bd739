//! Dispatching rules and rule engine for case ordering.
//!
//! The scheduler offers cases to the calendar one at a time; the order in
//! which it does so is decided here. Rules are small scoring functions
//! composed by a [`RuleEngine`].
//!
//! # Usage
//!
//! ```
//! use chrono::NaiveDate;
//! use dcm_schedule::dispatching::{DispatchContext, RuleEngine, TieBreaker};
//! use dcm_schedule::dispatching::rules;
//!
//! let engine = RuleEngine::new()
//!     .with_rule(rules::HighestPriority)
//!     .with_tie_breaker(rules::Fifo)
//!     .with_final_tie_breaker(TieBreaker::ById);
//!
//! let context = DispatchContext::as_of(NaiveDate::from_ymd_opt(2024, 2, 5).unwrap());
//! assert!(engine.sort_indices(&[], &context).is_empty());
//! ```
//!
//! # References
//!
//! - Pinedo (2016), "Scheduling: Theory, Algorithms, and Systems", Ch. 4
//! - Haupt (1989), "A Survey of Priority Rule-Based Scheduling"

mod context;
mod engine;
pub mod rules;

pub use context::DispatchContext;
pub use engine::{RuleEngine, TieBreaker};

use crate::models::Case;
use std::fmt::Debug;

/// Score returned by a dispatching rule.
///
/// Lower scores = higher priority (offered to the calendar first).
pub type RuleScore = f64;

/// A dispatching rule that scores a case.
///
/// # Score Convention
/// **Lower score = higher priority.**
pub trait DispatchingRule: Send + Sync + Debug {
    /// Rule name (e.g., "PRIORITY", "FIFO").
    fn name(&self) -> &'static str;

    /// Scores `case`; lower is offered first.
    fn evaluate(&self, case: &Case, context: &DispatchContext) -> RuleScore;

    /// Rule description.
    fn description(&self) -> &'static str {
        self.name()
    }
}
