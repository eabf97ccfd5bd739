//! Slot occupancy store.
//!
//! The scheduler never trusts its own view of the calendar: it probes the
//! store, then commits. A commit that returns `false` means the slot was
//! taken in between (by another writer) and the caller moves on.

use chrono::NaiveDate;
use std::collections::{BTreeMap, HashMap};

use crate::models::Hearing;

/// Authoritative record of occupied bench slots.
pub trait SlotStore {
    /// Free slots on a bench-day given its effective slot count.
    fn remaining_capacity(&self, bench_id: &str, date: NaiveDate, slots_per_day: u32) -> u32;

    /// Atomically claims `slot` for `case_id`. Returns `false` if the slot
    /// is already taken or the case already holds a slot.
    fn commit(&mut self, case_id: &str, bench_id: &str, date: NaiveDate, slot: u32) -> bool;

    /// Frees a slot. Returns `false` if it was not occupied.
    fn release(&mut self, bench_id: &str, date: NaiveDate, slot: u32) -> bool;

    /// Whether `slot` is currently free.
    fn is_free(&self, bench_id: &str, date: NaiveDate, slot: u32) -> bool;

    /// Whether `case_id` already holds a slot.
    fn holds_case(&self, _case_id: &str) -> bool {
        false
    }
}

type BenchDay = (String, NaiveDate);

/// Single-process store backed by ordered maps.
#[derive(Debug, Clone, Default)]
pub struct InMemorySlotStore {
    slots: BTreeMap<BenchDay, BTreeMap<u32, String>>,
    cases: HashMap<String, (BenchDay, u32)>,
}

impl InMemorySlotStore {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Seeds the store with hearings that currently hold their slot.
    ///
    /// Postponed and cancelled hearings are ignored. When two active
    /// hearings claim the same slot, the first one wins.
    pub fn from_hearings(hearings: &[Hearing]) -> Self {
        let mut store = Self::new();
        for h in hearings.iter().filter(|h| h.is_active()) {
            if !store.commit(&h.case_id, &h.bench_id, h.scheduled_date, h.slot) {
                tracing::warn!(
                    hearing_id = %h.id,
                    bench_id = %h.bench_id,
                    date = %h.scheduled_date,
                    slot = h.slot,
                    "existing hearing collides with an occupied slot"
                );
            }
        }
        store
    }

    /// Number of occupied slots on a bench-day.
    pub fn occupied(&self, bench_id: &str, date: NaiveDate) -> u32 {
        self.slots
            .get(&(bench_id.to_string(), date))
            .map_or(0, |s| u32::try_from(s.len()).unwrap_or(u32::MAX))
    }

    /// Case occupying a slot.
    pub fn occupant(&self, bench_id: &str, date: NaiveDate, slot: u32) -> Option<&str> {
        self.slots
            .get(&(bench_id.to_string(), date))
            .and_then(|s| s.get(&slot))
            .map(String::as_str)
    }

    /// Total occupied slots across all bench-days.
    pub fn len(&self) -> usize {
        self.cases.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cases.is_empty()
    }
}

impl SlotStore for InMemorySlotStore {
    fn remaining_capacity(&self, bench_id: &str, date: NaiveDate, slots_per_day: u32) -> u32 {
        slots_per_day.saturating_sub(self.occupied(bench_id, date))
    }

    fn commit(&mut self, case_id: &str, bench_id: &str, date: NaiveDate, slot: u32) -> bool {
        if self.cases.contains_key(case_id) {
            return false;
        }
        let key = (bench_id.to_string(), date);
        let day = self.slots.entry(key.clone()).or_default();
        if day.contains_key(&slot) {
            return false;
        }
        day.insert(slot, case_id.to_string());
        self.cases.insert(case_id.to_string(), (key, slot));
        true
    }

    fn release(&mut self, bench_id: &str, date: NaiveDate, slot: u32) -> bool {
        let key = (bench_id.to_string(), date);
        let Some(day) = self.slots.get_mut(&key) else {
            return false;
        };
        let Some(case_id) = day.remove(&slot) else {
            return false;
        };
        if day.is_empty() {
            self.slots.remove(&key);
        }
        self.cases.remove(&case_id);
        true
    }

    fn is_free(&self, bench_id: &str, date: NaiveDate, slot: u32) -> bool {
        self.occupant(bench_id, date, slot).is_none()
    }

    fn holds_case(&self, case_id: &str) -> bool {
        self.cases.contains_key(case_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::HearingStatus;
    use chrono::NaiveTime;

    fn day() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 2, 5).unwrap()
    }

    #[test]
    fn test_commit_and_capacity() {
        let mut store = InMemorySlotStore::new();
        assert_eq!(store.remaining_capacity("B1", day(), 8), 8);
        assert!(store.commit("C1", "B1", day(), 0));
        assert!(store.commit("C2", "B1", day(), 1));
        assert_eq!(store.remaining_capacity("B1", day(), 8), 6);
        assert_eq!(store.remaining_capacity("B2", day(), 8), 8);
        assert_eq!(store.occupant("B1", day(), 1), Some("C2"));
        assert_eq!(store.len(), 2);
    }

    #[test]
    fn test_commit_rejects_taken_slot_and_placed_case() {
        let mut store = InMemorySlotStore::new();
        assert!(store.commit("C1", "B1", day(), 0));
        assert!(!store.commit("C2", "B1", day(), 0));
        assert!(!store.commit("C1", "B2", day(), 0));
        assert!(store.holds_case("C1"));
        assert!(!store.holds_case("C2"));
    }

    #[test]
    fn test_release() {
        let mut store = InMemorySlotStore::new();
        store.commit("C1", "B1", day(), 3);
        assert!(!store.is_free("B1", day(), 3));
        assert!(store.release("B1", day(), 3));
        assert!(store.is_free("B1", day(), 3));
        assert!(!store.holds_case("C1"));
        assert!(!store.release("B1", day(), 3));
        assert!(store.is_empty());
    }

    #[test]
    fn test_remaining_capacity_saturates() {
        let mut store = InMemorySlotStore::new();
        for slot in 0..4 {
            store.commit(&format!("C{slot}"), "B1", day(), slot);
        }
        assert_eq!(store.remaining_capacity("B1", day(), 3), 0);
    }

    #[test]
    fn test_from_hearings_ignores_inactive() {
        let t = NaiveTime::from_hms_opt(9, 0, 0).unwrap();
        let hearings = vec![
            Hearing::new("H1", "C1", "B1", day(), t, 0, 30),
            Hearing::new("H2", "C2", "B1", day(), t, 1, 30).with_status(HearingStatus::Postponed),
            Hearing::new("H3", "C3", "B1", day(), t, 2, 30).with_status(HearingStatus::Completed),
        ];
        let store = InMemorySlotStore::from_hearings(&hearings);
        assert_eq!(store.occupied("B1", day()), 2);
        assert!(store.is_free("B1", day(), 1));
        assert!(store.holds_case("C3"));
        assert!(!store.holds_case("C2"));
    }
}
