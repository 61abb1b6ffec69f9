use crate::stats::SearchStats;

/// Sink for per-search diagnostics.
///
/// Recorders observe a search; they never change its result.
pub trait SearchRecorder {
    /// Called once when a search terminates.
    fn record(&mut self, stats: &SearchStats);
}

impl<F: FnMut(&SearchStats)> SearchRecorder for F {
    fn record(&mut self, stats: &SearchStats) {
        self(stats)
    }
}
