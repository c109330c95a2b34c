//! Shared executor state.

use std::collections::HashMap;
use std::sync::Arc;

use tokio::sync::RwLock;

use graphbench_core::{RunId, RunRecord};

/// Shared executor state.
///
/// One record per active run, created before the runner is spawned and
/// retired after a terminal outcome. Records are mutated exclusively here,
/// driven by the incoming message stream and the process monitor.
pub struct AppState {
    /// Active run records indexed by RunId.
    pub runs: RwLock<HashMap<RunId, RunRecord>>,
}

impl AppState {
    /// Create a new AppState wrapped in Arc.
    pub fn new() -> Arc<Self> {
        Arc::new(Self {
            runs: RwLock::new(HashMap::new()),
        })
    }

    /// Remove and return a retired run's record.
    pub async fn retire_run(&self, run_id: &RunId) -> Option<RunRecord> {
        self.runs.write().await.remove(run_id)
    }

    /// Get the number of active runs.
    pub async fn run_count(&self) -> usize {
        self.runs.read().await.len()
    }
}

impl Default for AppState {
    fn default() -> Self {
        Self {
            runs: RwLock::new(HashMap::new()),
        }
    }
}
