//! Hearing model.
//!
//! A hearing binds one case to one bench, date and slot. Hearings are
//! created only by the scheduler; afterwards only lifecycle transitions
//! (start, complete, postpone, cancel, reinstate) change them.

use chrono::{NaiveDate, NaiveTime};
use serde::{Deserialize, Serialize};

use super::TimeWindow;

/// Hearing lifecycle state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HearingStatus {
    Scheduled,
    InProgress,
    Completed,
    Postponed,
    Cancelled,
}

impl HearingStatus {
    /// Whether a hearing in this state holds its bench slot.
    pub fn occupies_slot(self) -> bool {
        matches!(
            self,
            HearingStatus::Scheduled | HearingStatus::InProgress | HearingStatus::Completed
        )
    }

    /// Allowed lifecycle moves.
    ///
    /// | from | to |
    /// |------|----|
    /// | scheduled | in_progress, postponed, cancelled |
    /// | in_progress | completed, postponed |
    /// | postponed | scheduled, cancelled |
    /// | completed, cancelled | (terminal) |
    pub fn can_transition_to(self, next: HearingStatus) -> bool {
        use HearingStatus::*;
        matches!(
            (self, next),
            (Scheduled, InProgress)
                | (Scheduled, Postponed)
                | (Scheduled, Cancelled)
                | (InProgress, Completed)
                | (InProgress, Postponed)
                | (Postponed, Scheduled)
                | (Postponed, Cancelled)
        )
    }

    /// Whether no further transitions are possible.
    pub fn is_terminal(self) -> bool {
        matches!(self, HearingStatus::Completed | HearingStatus::Cancelled)
    }
}

/// A scheduled hearing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Hearing {
    /// Hearing identifier.
    pub id: String,
    pub case_id: String,
    pub bench_id: String,
    pub scheduled_date: NaiveDate,
    pub start_time: NaiveTime,
    /// Slot index on the bench-day (0-based).
    pub slot: u32,
    /// Copied from the case at allocation time.
    pub duration_minutes: u32,
    pub status: HearingStatus,
}

impl Hearing {
    /// Creates a scheduled hearing.
    pub fn new(
        id: impl Into<String>,
        case_id: impl Into<String>,
        bench_id: impl Into<String>,
        scheduled_date: NaiveDate,
        start_time: NaiveTime,
        slot: u32,
        duration_minutes: u32,
    ) -> Self {
        Self {
            id: id.into(),
            case_id: case_id.into(),
            bench_id: bench_id.into(),
            scheduled_date,
            start_time,
            slot,
            duration_minutes,
            status: HearingStatus::Scheduled,
        }
    }

    /// Sets the status.
    pub fn with_status(mut self, status: HearingStatus) -> Self {
        self.status = status;
        self
    }

    /// Interval the hearing's slot occupies, given the bench's slot length.
    ///
    /// A hearing takes one slot whatever its estimated duration.
    pub fn slot_window(&self, slot_minutes: u32) -> TimeWindow {
        TimeWindow::starting_at(self.start_time, slot_minutes)
    }

    /// Whether the hearing currently holds its slot.
    pub fn is_active(&self) -> bool {
        self.status.occupies_slot()
    }
}
