//! Dispatch context for rule evaluation.

use chrono::NaiveDate;

/// Run-level state passed to dispatching rules.
///
/// "Today" is always explicit so that ordering never depends on the wall
/// clock.
#[derive(Debug, Clone, Default)]
pub struct DispatchContext {
    /// Reference date ("today") for rules that depend on it.
    pub as_of: NaiveDate,
}

impl DispatchContext {
    /// Creates a context anchored at `as_of`.
    pub fn as_of(as_of: NaiveDate) -> Self {
        Self { as_of }
    }
}
