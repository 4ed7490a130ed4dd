//! Observability: runtime counters and the sink abstraction sessions report
//! through.
//!
//! Engine code never touches `metrics` state directly; every event flows
//! through `MetricsEvent` and a `MetricsSink`.

pub(crate) mod metrics;
pub(crate) mod sink;

// re-exports
pub use metrics::{EventOps, EventPerf, EventReport, TableCounters};
pub use sink::{ExecKind, MetricsEvent, MetricsSink, metrics_report, metrics_reset_all};
