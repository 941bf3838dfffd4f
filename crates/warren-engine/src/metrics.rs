//! Per-tick metrics for the coordinator.
//!
//! [`TickMetrics`] captures timing and participation data for the most
//! recent tick plus cumulative health counters for the whole session.

/// Timing and participation metrics collected during a single tick.
///
/// Durations are in microseconds unless the field name says otherwise.
/// The coordinator overwrites the per-tick fields after every `tick()`;
/// the cumulative fields only grow.
#[derive(Clone, Debug, Default)]
pub struct TickMetrics {
    /// Tick these metrics describe.
    pub tick: u64,
    /// Wall-clock time for the entire tick, in microseconds.
    pub total_us: u64,
    /// Workers signalled this tick.
    pub participants: u32,
    /// Workers whose report arrived before the deadline (faults excluded).
    pub responded: u32,
    /// Workers whose step logic failed this tick.
    pub faulted: u32,
    /// Workers still computing a previous tick's step.
    pub in_flight: u32,
    /// Deadline in force for the next tick, in milliseconds.
    pub deadline_ms: u64,
    /// Cumulative number of ticks that proceeded with partial results.
    pub degraded_ticks: u64,
    /// Cumulative number of ticks in which nobody responded.
    pub stalled_ticks: u64,
    /// Cumulative number of step logic failures.
    pub worker_faults: u64,
    /// Cumulative number of reports applied a tick after they were due.
    pub late_reports: u64,
}
