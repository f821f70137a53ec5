//! The fold engine: deterministic reconstruction of [`AppState`] from the
//! ordered event log.

use crate::record::EventRecord;
use crate::reducer;
use crate::state::AppState;
use crate::upcast::upcast;

/// Fold an event sequence over an initial state.
///
/// Records are stable-sorted by timestamp first: commands can be appended in a
/// different order than their logical creation order, and ties must replay in
/// original sequence position for the result to be deterministic. Each record
/// is then upcast to its canonical payload and dispatched to its reducer.
///
/// Pure and total: replaying the same sequence always yields a structurally
/// identical state, and no historical record can make the fold fail.
pub fn fold(initial: AppState, records: &[EventRecord]) -> AppState {
    let mut ordered: Vec<&EventRecord> = records.iter().collect();
    ordered.sort_by(|a, b| a.timestamp().total_cmp(&b.timestamp()));

    let mut state = initial;
    for record in ordered {
        reducer::apply(&mut state, &upcast(record));
    }
    tracing::debug!(
        events = records.len(),
        drugs = state.drug_count(),
        interactions = state.interaction_count(),
        "fold complete"
    );
    state
}

/// Fold from scratch.
pub fn replay(records: &[EventRecord]) -> AppState {
    fold(AppState::default(), records)
}

/// Apply one freshly appended record to the current projection.
///
/// Valid for incremental use because a new record carries the latest
/// timestamp, so appending and applying preserves the sorted replay order.
pub fn apply_record(state: &mut AppState, record: &EventRecord) {
    reducer::apply(state, &upcast(record));
}
