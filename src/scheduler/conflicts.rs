//! Audit of an existing hearing set.
//!
//! The allocator never produces conflicts on its own; this audit exists for
//! hearings edited by hand or imported from elsewhere. Only hearings that
//! hold their slot are considered.
//!
//! A hearing occupies one slot whatever its estimated duration, so time
//! overlap is judged on slot-length windows: a hearing whose start time
//! was moved off its slot grid can collide with a neighbour.

use chrono::NaiveDate;
use std::collections::{BTreeMap, HashMap};

use crate::config::SchedulerConfig;
use crate::models::{Bench, Conflict, ConflictKind, Hearing, TimeWindow};

/// Reports every conflict among `hearings`, grouped by bench-day.
///
/// Capacity uses `config.slack_percentage`; overlap windows span
/// `config.slot_minutes(bench)` from each start time.
///
/// Output order: bench id, then date, then kind, then hearing ids.
pub fn detect_conflicts(hearings: &[Hearing], benches: &[Bench], config: &SchedulerConfig) -> Vec<Conflict> {
    let bench_by_id: HashMap<&str, &Bench> = benches.iter().map(|b| (b.id.as_str(), b)).collect();

    let mut groups: BTreeMap<(&str, NaiveDate), Vec<&Hearing>> = BTreeMap::new();
    for h in hearings.iter().filter(|h| h.is_active()) {
        groups
            .entry((h.bench_id.as_str(), h.scheduled_date))
            .or_default()
            .push(h);
    }

    let mut conflicts = Vec::new();
    for ((bench_id, date), mut group) in groups {
        group.sort_by(|a, b| (a.start_time, &a.id).cmp(&(b.start_time, &b.id)));
        let ids = || group.iter().map(|h| h.id.clone()).collect::<Vec<_>>();

        let bench = bench_by_id.get(bench_id).filter(|b| b.is_active);
        let Some(bench) = bench else {
            conflicts.push(Conflict {
                kind: ConflictKind::UnknownBench,
                bench_id: bench_id.to_string(),
                date,
                hearing_ids: ids(),
                message: format!("bench {bench_id} is unknown or inactive on {date}"),
            });
            continue;
        };

        let mut by_slot: BTreeMap<u32, Vec<&Hearing>> = BTreeMap::new();
        for h in &group {
            by_slot.entry(h.slot).or_default().push(*h);
        }
        for (slot, shared) in by_slot.iter().filter(|(_, v)| v.len() > 1) {
            conflicts.push(Conflict {
                kind: ConflictKind::DoubleBooking,
                bench_id: bench_id.to_string(),
                date,
                hearing_ids: shared.iter().map(|h| h.id.clone()).collect(),
                message: format!("slot {slot} on bench {bench_id} {date} is booked {} times", shared.len()),
            });
        }

        let limit = bench.effective_slots(config.slack_percentage) as usize;
        if group.len() > limit {
            conflicts.push(Conflict {
                kind: ConflictKind::CapacityExceeded,
                bench_id: bench_id.to_string(),
                date,
                hearing_ids: ids(),
                message: format!(
                    "{} hearings on bench {bench_id} {date} exceed {limit} effective slots",
                    group.len()
                ),
            });
        }

        let slot_minutes = config.slot_minutes(bench);
        let windows: Vec<TimeWindow> = group.iter().map(|h| h.slot_window(slot_minutes)).collect();
        for (i, a) in group.iter().enumerate() {
            for (j, b) in group.iter().enumerate().skip(i + 1) {
                if a.slot != b.slot && windows[i].overlaps(&windows[j]) {
                    conflicts.push(Conflict {
                        kind: ConflictKind::TimeOverlap,
                        bench_id: bench_id.to_string(),
                        date,
                        hearing_ids: vec![a.id.clone(), b.id.clone()],
                        message: format!("hearings {} and {} overlap on bench {bench_id}", a.id, b.id),
                    });
                }
            }
        }
    }

    conflicts
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Case, CaseType, HearingStatus};
    use crate::pipeline::allocate;
    use chrono::NaiveTime;

    fn date() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 2, 5).unwrap()
    }

    fn at(h: u32, m: u32) -> NaiveTime {
        NaiveTime::from_hms_opt(h, m, 0).unwrap()
    }

    fn hearing(id: &str, bench: &str, slot: u32, start: NaiveTime, minutes: u32) -> Hearing {
        Hearing::new(id, format!("case-{id}"), bench, date(), start, slot, minutes)
    }

    #[test]
    fn test_clean_schedule() {
        let hearings = vec![
            hearing("H1", "B1", 0, at(9, 0), 45),
            hearing("H2", "B1", 1, at(9, 48), 45),
            hearing("H3", "B2", 0, at(9, 0), 45),
        ];
        let benches = vec![Bench::new("B1", 10), Bench::new("B2", 10)];
        assert!(detect_conflicts(&hearings, &benches, &SchedulerConfig::default()).is_empty());
    }

    #[test]
    fn test_double_booking() {
        let hearings = vec![
            hearing("H1", "B1", 0, at(9, 0), 30),
            hearing("H2", "B1", 0, at(9, 0), 30),
        ];
        let conflicts = detect_conflicts(&hearings, &[Bench::new("B1", 10)], &SchedulerConfig::default());
        assert_eq!(conflicts.len(), 1);
        assert_eq!(conflicts[0].kind, ConflictKind::DoubleBooking);
        assert_eq!(conflicts[0].hearing_ids, vec!["H1", "H2"]);
    }

    #[test]
    fn test_capacity_exceeded() {
        // capacity 2 at 15% slack -> 1 effective slot
        let hearings = vec![
            hearing("H1", "B1", 0, at(9, 0), 30),
            hearing("H2", "B1", 1, at(13, 0), 30),
        ];
        let conflicts = detect_conflicts(&hearings, &[Bench::new("B1", 2)], &SchedulerConfig::default());
        assert_eq!(conflicts.len(), 1);
        assert_eq!(conflicts[0].kind, ConflictKind::CapacityExceeded);
    }

    #[test]
    fn test_time_overlap() {
        // 48-minute slots; H2 was moved off its grid start of 09:48
        let hearings = vec![
            hearing("H1", "B1", 0, at(9, 0), 30),
            hearing("H2", "B1", 1, at(9, 30), 30),
            hearing("H3", "B1", 2, at(10, 0), 30),
        ];
        let conflicts = detect_conflicts(&hearings, &[Bench::new("B1", 10)], &SchedulerConfig::default());
        assert_eq!(conflicts.len(), 2);
        assert!(conflicts.iter().all(|c| c.kind == ConflictKind::TimeOverlap));
        assert_eq!(conflicts[0].hearing_ids, vec!["H1", "H2"]);
        assert_eq!(conflicts[1].hearing_ids, vec!["H2", "H3"]);
    }

    #[test]
    fn test_long_hearings_on_grid_do_not_overlap() {
        let hearings = vec![
            hearing("H1", "B1", 0, at(9, 0), 240),
            hearing("H2", "B1", 1, at(9, 48), 240),
        ];
        assert!(detect_conflicts(&hearings, &[Bench::new("B1", 10)], &SchedulerConfig::default()).is_empty());
    }

    #[test]
    fn test_allocator_output_is_conflict_free() {
        let filed = NaiveDate::from_ymd_opt(2024, 1, 2).unwrap();
        let cases: Vec<Case> = [60, 60, 60, 180, 240, 45]
            .iter()
            .enumerate()
            .map(|(i, minutes)| Case::new(format!("C{i}"), CaseType::Civil, filed).with_duration(*minutes))
            .collect();
        let benches = vec![Bench::new("B1", 10), Bench::new("B2", 4)];
        let result = allocate(&cases, &benches, date(), 5, 0.15).unwrap();
        assert_eq!(result.statistics.total_scheduled, 6);

        let conflicts = detect_conflicts(&result.hearings(), &benches, &SchedulerConfig::default());
        assert!(conflicts.is_empty(), "{conflicts:?}");
    }

    #[test]
    fn test_unknown_bench_and_inactive_hearings() {
        let hearings = vec![
            hearing("H1", "B9", 0, at(9, 0), 30),
            hearing("H2", "B1", 0, at(9, 0), 30),
            hearing("H3", "B1", 0, at(9, 0), 30).with_status(HearingStatus::Cancelled),
        ];
        let conflicts = detect_conflicts(&hearings, &[Bench::new("B1", 10)], &SchedulerConfig::default());
        assert_eq!(conflicts.len(), 1);
        assert_eq!(conflicts[0].kind, ConflictKind::UnknownBench);
        assert_eq!(conflicts[0].bench_id, "B9");
    }
}
