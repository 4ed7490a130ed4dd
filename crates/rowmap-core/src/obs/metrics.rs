use serde::{Deserialize, Serialize};
use std::{cell::RefCell, collections::BTreeMap};

///
/// EventState
/// Ephemeral, in-memory counters and perf totals for session operations.
/// State is per thread; a session reports on the thread it runs on.
///

#[derive(Clone, Debug, Default, Deserialize, Serialize)]
pub(crate) struct EventState {
    pub(crate) ops: EventOps,
    pub(crate) perf: EventPerf,
    pub(crate) tables: BTreeMap<String, TableCounters>,
}

///
/// EventOps
///

#[derive(Clone, Debug, Default, Deserialize, Eq, PartialEq, Serialize)]
pub struct EventOps {
    // Session entrypoints
    pub select_calls: u64,
    pub insert_calls: u64,
    pub update_calls: u64,
    pub delete_calls: u64,
    pub raw_calls: u64,

    // Rows touched
    pub rows_selected: u64,
    pub rows_inserted: u64,
    pub rows_affected: u64,

    // Descriptor cache
    pub cache_hits: u64,
    pub cache_misses: u64,

    pub errors: u64,
}

///
/// TableCounters
///

#[derive(Clone, Debug, Default, Deserialize, Eq, PartialEq, Serialize)]
pub struct TableCounters {
    pub select_calls: u64,
    pub insert_calls: u64,
    pub update_calls: u64,
    pub delete_calls: u64,
    pub rows_selected: u64,
    pub rows_inserted: u64,
    pub rows_affected: u64,
    pub errors: u64,
}

///
/// EventPerf
/// Wall-clock totals per statement kind, in microseconds.
///

#[derive(Clone, Debug, Default, Deserialize, Eq, PartialEq, Serialize)]
pub struct EventPerf {
    pub select_micros_total: u128,
    pub write_micros_total: u128,

    // Maximum observed single-call durations
    pub select_micros_max: u64,
    pub write_micros_max: u64,
}

thread_local! {
    static EVENT_STATE: RefCell<EventState> = RefCell::new(EventState::default());
}

/// Borrow metrics immutably.
pub(crate) fn with_state<R>(f: impl FnOnce(&EventState) -> R) -> R {
    EVENT_STATE.with(|m| f(&m.borrow()))
}

/// Borrow metrics mutably.
pub(crate) fn with_state_mut<R>(f: impl FnOnce(&mut EventState) -> R) -> R {
    EVENT_STATE.with(|m| f(&mut m.borrow_mut()))
}

/// Reset all counters and perf totals.
pub(crate) fn reset_all() {
    with_state_mut(|m| *m = EventState::default());
}

/// Accumulate a duration and track a max.
pub(crate) fn add_micros(total: &mut u128, max: &mut u64, delta: u64) {
    *total = total.saturating_add(u128::from(delta));
    if delta > *max {
        *max = delta;
    }
}

///
/// EventReport
///

#[derive(Clone, Debug, Default, Deserialize, Eq, PartialEq, Serialize)]
pub struct EventReport {
    pub ops: EventOps,
    pub perf: EventPerf,
    /// Per-table counters, sorted by table name.
    pub tables: Vec<(String, TableCounters)>,
}

impl EventReport {
    /// Counters for one table, if it has been touched.
    #[must_use]
    pub fn table(&self, table: &str) -> Option<&TableCounters> {
        self.tables
            .iter()
            .find(|(name, _)| name == table)
            .map(|(_, counters)| counters)
    }
}

/// Build a report by inspecting in-memory counters only.
#[must_use]
pub(crate) fn report() -> EventReport {
    with_state(|snap| EventReport {
        ops: snap.ops.clone(),
        perf: snap.perf.clone(),
        tables: snap
            .tables
            .iter()
            .map(|(name, counters)| (name.clone(), counters.clone()))
            .collect(),
    })
}
