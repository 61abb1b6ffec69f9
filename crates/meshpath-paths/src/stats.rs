//! Search diagnostics and the stock recorders.

use std::fmt;
use std::time::Duration;

use crate::traits::SearchRecorder;

/// How a search ended.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum SearchOutcome {
    /// The goal was reached.
    Found,
    /// Every vertex reachable from the source was finalized without meeting
    /// the goal.
    #[default]
    Exhausted,
}

/// Counters collected during one search.
#[derive(Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SearchStats {
    /// Vertices in the graph.
    pub vertices: usize,
    /// Vertices taken off the open set.
    pub popped: usize,
    /// Edges examined while relaxing.
    pub relaxed: usize,
    /// Successful decrease-key operations.
    pub decreased: usize,
    pub outcome: SearchOutcome,
    pub elapsed: Duration,
}

impl fmt::Display for SearchStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{:?} after popping {}/{} vertices ({} edges relaxed, {} decrease-keys) in {:.3}ms",
            self.outcome,
            self.popped,
            self.vertices,
            self.relaxed,
            self.decreased,
            self.elapsed.as_secs_f64() * 1000.0
        )
    }
}

/// Discards everything.
#[derive(Copy, Clone, Debug, Default)]
pub struct NoopRecorder;

impl SearchRecorder for NoopRecorder {
    fn record(&mut self, _stats: &SearchStats) {}
}

/// Forwards stats to the `log` facade at debug level.
#[derive(Copy, Clone, Debug, Default)]
pub struct LogRecorder;

impl SearchRecorder for LogRecorder {
    fn record(&mut self, stats: &SearchStats) {
        log::debug!("dijkstra: {stats}");
    }
}
