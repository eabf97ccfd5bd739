//! Greedy hearing allocation, slot store and KPI evaluation.
//!
//! # Algorithm
//!
//! `GreedyScheduler` offers cases in dispatching order and gives each the
//! earliest free slot across all benches. It is not optimal, but it is
//! fast, explainable and fully deterministic.
//!
//! # Capacity
//!
//! Each bench withholds `slack_percentage` of its nominal daily capacity as
//! a buffer for overruns: `floor(capacity × (1 − slack))` slots remain.
//!
//! # KPI
//!
//! `AllocationKpi` computes placement rate, bench utilization, hearings per
//! day and filing-to-hearing lead time.
//!
//! # References
//!
//! - Pinedo (2016), "Scheduling: Theory, Algorithms, and Systems", Ch. 3-4

mod cancel;
mod conflicts;
mod greedy;
mod kpi;
mod lifecycle;
mod store;

pub use cancel::CancellationFlag;
pub use conflicts::detect_conflicts;
pub use greedy::{AllocationRequest, GreedyScheduler};
pub use kpi::AllocationKpi;
pub use lifecycle::{release_hearing, transition_hearing};
pub use store::{InMemorySlotStore, SlotStore};
