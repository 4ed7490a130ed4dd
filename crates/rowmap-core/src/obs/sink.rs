//! Metrics sink boundary.
//!
//! Sessions emit `MetricsEvent`s into either their own scoped sink or the
//! global per-thread counters. This module is the only bridge between
//! session logic and the metrics state.
use crate::obs::metrics::{self, EventReport, TableCounters};
use std::time::Instant;

///
/// ExecKind
///

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum ExecKind {
    Select,
    Insert,
    Update,
    Delete,
    /// Caller-supplied SQL passed straight through.
    Raw,
}

impl ExecKind {
    const fn is_read(self) -> bool {
        matches!(self, Self::Select | Self::Raw)
    }
}

///
/// MetricsEvent
///

#[derive(Clone, Copy, Debug)]
pub enum MetricsEvent<'a> {
    ExecStart {
        kind: ExecKind,
        table: &'a str,
    },
    ExecFinish {
        kind: ExecKind,
        table: &'a str,
        rows_touched: u64,
        micros: u64,
        ok: bool,
    },
    CacheHit {
        table: &'a str,
    },
    CacheMiss {
        table: &'a str,
    },
}

///
/// MetricsSink
///

pub trait MetricsSink {
    fn record(&self, event: MetricsEvent<'_>);
}

/// GlobalMetricsSink
/// Default sink that writes into the per-thread metrics state.
/// Used whenever a session has no sink of its own.

pub(crate) struct GlobalMetricsSink;

impl GlobalMetricsSink {
    fn table_entry<'m>(
        tables: &'m mut std::collections::BTreeMap<String, TableCounters>,
        table: &str,
    ) -> &'m mut TableCounters {
        tables.entry(table.to_string()).or_default()
    }
}

impl MetricsSink for GlobalMetricsSink {
    fn record(&self, event: MetricsEvent<'_>) {
        match event {
            MetricsEvent::ExecStart { kind, table } => {
                metrics::with_state_mut(|m| {
                    let entry = Self::table_entry(&mut m.tables, table);
                    match kind {
                        ExecKind::Select => {
                            m.ops.select_calls = m.ops.select_calls.saturating_add(1);
                            entry.select_calls = entry.select_calls.saturating_add(1);
                        }
                        ExecKind::Insert => {
                            m.ops.insert_calls = m.ops.insert_calls.saturating_add(1);
                            entry.insert_calls = entry.insert_calls.saturating_add(1);
                        }
                        ExecKind::Update => {
                            m.ops.update_calls = m.ops.update_calls.saturating_add(1);
                            entry.update_calls = entry.update_calls.saturating_add(1);
                        }
                        ExecKind::Delete => {
                            m.ops.delete_calls = m.ops.delete_calls.saturating_add(1);
                            entry.delete_calls = entry.delete_calls.saturating_add(1);
                        }
                        ExecKind::Raw => m.ops.raw_calls = m.ops.raw_calls.saturating_add(1),
                    }
                });
            }

            MetricsEvent::ExecFinish {
                kind,
                table,
                rows_touched,
                micros,
                ok,
            } => {
                metrics::with_state_mut(|m| {
                    if kind.is_read() {
                        metrics::add_micros(
                            &mut m.perf.select_micros_total,
                            &mut m.perf.select_micros_max,
                            micros,
                        );
                    } else {
                        metrics::add_micros(
                            &mut m.perf.write_micros_total,
                            &mut m.perf.write_micros_max,
                            micros,
                        );
                    }

                    let entry = Self::table_entry(&mut m.tables, table);
                    if !ok {
                        m.ops.errors = m.ops.errors.saturating_add(1);
                        entry.errors = entry.errors.saturating_add(1);
                        return;
                    }

                    match kind {
                        ExecKind::Select | ExecKind::Raw => {
                            m.ops.rows_selected = m.ops.rows_selected.saturating_add(rows_touched);
                            entry.rows_selected = entry.rows_selected.saturating_add(rows_touched);
                        }
                        ExecKind::Insert => {
                            m.ops.rows_inserted = m.ops.rows_inserted.saturating_add(rows_touched);
                            entry.rows_inserted = entry.rows_inserted.saturating_add(rows_touched);
                        }
                        ExecKind::Update | ExecKind::Delete => {
                            m.ops.rows_affected = m.ops.rows_affected.saturating_add(rows_touched);
                            entry.rows_affected = entry.rows_affected.saturating_add(rows_touched);
                        }
                    }
                });
            }

            MetricsEvent::CacheHit { .. } => {
                metrics::with_state_mut(|m| {
                    m.ops.cache_hits = m.ops.cache_hits.saturating_add(1);
                });
            }

            MetricsEvent::CacheMiss { .. } => {
                metrics::with_state_mut(|m| {
                    m.ops.cache_misses = m.ops.cache_misses.saturating_add(1);
                });
            }
        }
    }
}

pub(crate) const GLOBAL_METRICS_SINK: GlobalMetricsSink = GlobalMetricsSink;

/// Route an event to `sink`, or to the global counters when unset.
pub(crate) fn record(sink: Option<&dyn MetricsSink>, event: MetricsEvent<'_>) {
    match sink {
        Some(sink) => sink.record(event),
        None => GLOBAL_METRICS_SINK.record(event),
    }
}

/// Snapshot the current thread's metrics state.
#[must_use]
pub fn metrics_report() -> EventReport {
    metrics::report()
}

/// Reset all metrics state (counters + perf) for the current thread.
pub fn metrics_reset_all() {
    metrics::reset_all();
}

/// Span
/// RAII guard that emits start/finish events for one executor call.
/// Finish accounting happens even on early return or unwind; a span that
/// was never marked successful reports a failure.

pub(crate) struct Span<'a> {
    sink: Option<&'a dyn MetricsSink>,
    kind: ExecKind,
    table: &'a str,
    start: Instant,
    rows: u64,
    ok: bool,
}

impl<'a> Span<'a> {
    /// Start a span for one statement against `table`.
    #[must_use]
    pub(crate) fn new(sink: Option<&'a dyn MetricsSink>, kind: ExecKind, table: &'a str) -> Self {
        record(sink, MetricsEvent::ExecStart { kind, table });

        Self {
            sink,
            kind,
            table,
            start: Instant::now(),
            rows: 0,
            ok: false,
        }
    }

    /// Mark the call successful with its row count.
    pub(crate) const fn set_rows(&mut self, rows: u64) {
        self.rows = rows;
        self.ok = true;
    }
}

impl Drop for Span<'_> {
    fn drop(&mut self) {
        let micros =
            u64::try_from(self.start.elapsed().as_micros()).unwrap_or(u64::MAX);

        record(
            self.sink,
            MetricsEvent::ExecFinish {
                kind: self.kind,
                table: self.table,
                rows_touched: self.rows,
                micros,
                ok: self.ok,
            },
        );
    }
}

///
/// TESTS
///
