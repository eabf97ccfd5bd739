//! Case management domain models.
//!
//! Provides the core data types consumed and produced by the allocation
//! pipeline. Intake, storage and presentation of these records belong to
//! the surrounding application.
//!
//! # Domain Mappings
//!
//! | dcm-schedule | Generic scheduling |
//! |--------------|--------------------|
//! | Case | Job / Task |
//! | Bench | Parallel resource with daily capacity |
//! | Hearing | Assignment (resource × date × slot) |
//! | AllocationResult | Schedule + rejected jobs |

mod allocation;
mod bench;
mod calendar;
mod case;
mod hearing;

pub use allocation::{
    AllocationResult, AllocationStatistics, Conflict, ConflictKind, ScheduledHearing,
    UnplacedCase, UnplacedReason,
};
pub use bench::Bench;
pub use calendar::{TimeWindow, WorkingCalendar};
pub use case::{Case, CaseStatus, CaseType, Priority, Track};
pub use hearing::{Hearing, HearingStatus};
