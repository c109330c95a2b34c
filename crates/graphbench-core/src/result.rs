//! Run metrics and the terminal result object.

use crate::RunId;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Metrics produced by the finalize phase of a run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunMetrics {
    /// End-to-end wall-clock time of the run, in milliseconds.
    pub makespan_ms: u64,

    /// Time spent in algorithm processing proper, in milliseconds.
    pub processing_time_ms: u64,

    /// Platform-specific metric values.
    pub extras: HashMap<String, String>,
}

impl RunMetrics {
    /// Create metrics from the two standard timings.
    pub fn new(makespan_ms: u64, processing_time_ms: u64) -> Self {
        Self {
            makespan_ms,
            processing_time_ms,
            extras: HashMap::new(),
        }
    }

    /// Builder method to attach a platform-specific metric.
    pub fn with_extra(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.extras.insert(key.into(), value.into());
        self
    }
}

/// The terminal outcome of a successful run, handed to the executor exactly
/// once. A run produces either a result or a termination, never both.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunResult {
    /// The run this result belongs to.
    pub run_id: RunId,

    /// Metrics gathered during finalization.
    pub metrics: RunMetrics,

    /// When the summary was produced.
    pub completed_at: DateTime<Utc>,
}

impl RunResult {
    /// Create a result stamped with the current time.
    pub fn new(run_id: RunId, metrics: RunMetrics) -> Self {
        Self {
            run_id,
            metrics,
            completed_at: Utc::now(),
        }
    }
}
