// file: src/pipeline/stats.rs
// description: statistics for one clustering run
// reference: row accounting and clustering quality figures

use serde::Serialize;

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct PipelineStats {
    pub rows_read: usize,
    pub rows_kept: usize,
    pub rows_missing: usize,
    pub rows_non_numeric: usize,
    pub iterations: usize,
    pub converged: bool,
    pub inertia: f64,
    pub duration_ms: u64,
}

impl PipelineStats {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn rows_dropped(&self) -> usize {
        self.rows_missing + self.rows_non_numeric
    }

    /// Share of input rows that survived filtering, in percent.
    pub fn retention_rate(&self) -> f64 {
        if self.rows_read == 0 {
            return 0.0;
        }
        (self.rows_kept as f64 / self.rows_read as f64) * 100.0
    }

    pub fn rows_per_second(&self) -> f64 {
        if self.duration_ms == 0 {
            return 0.0;
        }
        self.rows_read as f64 / (self.duration_ms as f64 / 1000.0)
    }
}
