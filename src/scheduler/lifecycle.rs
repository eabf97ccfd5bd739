//! Hearing lifecycle transitions against a slot store.
//!
//! | transition | slot effect |
//! |------------|-------------|
//! | scheduled/in_progress → postponed, cancelled | released |
//! | postponed → scheduled | re-committed (fails if taken meanwhile) |
//! | others | none |

use super::SlotStore;
use crate::error::LifecycleError;
use crate::models::{Hearing, HearingStatus};

/// Moves `hearing` to `next`, keeping `store` consistent.
///
/// On error the hearing and the store are left unchanged.
pub fn transition_hearing<S: SlotStore + ?Sized>(
    hearing: &mut Hearing,
    next: HearingStatus,
    store: &mut S,
) -> Result<(), LifecycleError> {
    let from = hearing.status;
    if !from.can_transition_to(next) {
        return Err(LifecycleError::InvalidTransition {
            hearing_id: hearing.id.clone(),
            from,
            to: next,
        });
    }

    match (from.occupies_slot(), next.occupies_slot()) {
        (true, false) => {
            if !store.release(&hearing.bench_id, hearing.scheduled_date, hearing.slot) {
                tracing::warn!(
                    hearing_id = %hearing.id,
                    bench_id = %hearing.bench_id,
                    date = %hearing.scheduled_date,
                    slot = hearing.slot,
                    "released slot was not held in store"
                );
            }
        }
        (false, true) => {
            if !store.commit(
                &hearing.case_id,
                &hearing.bench_id,
                hearing.scheduled_date,
                hearing.slot,
            ) {
                return Err(LifecycleError::SlotTaken {
                    hearing_id: hearing.id.clone(),
                    bench_id: hearing.bench_id.clone(),
                    date: hearing.scheduled_date,
                    slot: hearing.slot,
                });
            }
        }
        _ => {}
    }

    tracing::debug!(hearing_id = %hearing.id, from = ?from, to = ?next, "hearing transitioned");
    hearing.status = next;
    Ok(())
}

/// Cancels `hearing` and frees its slot for future allocation runs.
pub fn release_hearing<S: SlotStore + ?Sized>(
    hearing: &mut Hearing,
    store: &mut S,
) -> Result<(), LifecycleError> {
    transition_hearing(hearing, HearingStatus::Cancelled, store)
}
