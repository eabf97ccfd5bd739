//! Case-to-hearing allocation for court case management.
//!
//! Classifies incoming cases into differentiated case management (DCM)
//! tracks and allocates them to bench hearing slots over a horizon of
//! working days.
//!
//! # Modules
//!
//! - **`models`**: Domain types: `Case`, `Bench`, `Hearing`,
//!   `WorkingCalendar`, `AllocationResult`
//! - **`classifier`**: Rule-table track classifier and priority derivation
//! - **`dispatching`**: Rule engine deciding the order cases are offered
//! - **`scheduler`**: Greedy multi-bench allocator, slot store, lifecycle,
//!   conflict audit and KPIs
//! - **`pipeline`**: Classify-then-allocate entry points
//! - **`validation`**: Resource, horizon and per-case checks
//! - **`config`**: Serde-loadable scheduler configuration
//!
//! # Quick start
//!
//! ```
//! use chrono::NaiveDate;
//! use dcm_schedule::{allocate, Bench, Case, CaseType};
//!
//! let monday = NaiveDate::from_ymd_opt(2024, 2, 5).unwrap();
//! let cases = vec![
//!     Case::new("C1", CaseType::Criminal, monday)
//!         .with_synopsis("Bail application for accused")
//!         .with_duration(60),
//! ];
//! let result = allocate(&cases, &[Bench::new("B1", 10)], monday, 5, 0.15).unwrap();
//! assert_eq!(result.statistics.total_scheduled, 1);
//! ```
//!
//! # Determinism
//!
//! No wall clock, randomness or hash-order iteration reaches the output:
//! identical inputs give byte-identical `AllocationResult::canonical_json`.
//!
//! # References
//!
//! - Pinedo (2016), "Scheduling: Theory, Algorithms, and Systems"
//! - Haupt (1989), "A Survey of Priority Rule-Based Scheduling"

pub mod classifier;
pub mod config;
pub mod dispatching;
pub mod error;
pub mod models;
pub mod pipeline;
pub mod scheduler;
pub mod validation;

pub use classifier::{classify, ClassificationResult, Classifier, RuleTable};
pub use config::SchedulerConfig;
pub use error::{ConfigurationError, LifecycleError, RulesError};
pub use models::{
    AllocationResult, Bench, Case, CaseStatus, CaseType, Hearing, HearingStatus, Priority, Track,
    UnplacedReason,
};
pub use pipeline::{allocate, AllocationPipeline};
pub use scheduler::{GreedyScheduler, InMemorySlotStore, SlotStore};
