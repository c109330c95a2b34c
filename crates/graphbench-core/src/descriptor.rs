//! Run descriptor - the executor-supplied definition of one benchmark run.

use crate::RunId;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Describes a single benchmark run: which platform executes which algorithm
/// against which dataset, with which parameters.
///
/// The descriptor is produced by the executor and consumed by the runner; it
/// is immutable once received by the runner process.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunDescriptor {
    /// Unique run identifier.
    pub id: RunId,

    /// Workload platform that executes the run (e.g. "reference").
    pub platform: String,

    /// Algorithm to execute (e.g. "bfs", "pagerank").
    pub algorithm: String,

    /// Dataset the algorithm runs against.
    pub dataset: String,

    /// Platform-specific run parameters.
    pub parameters: HashMap<String, String>,
}

impl RunDescriptor {
    /// Create a new RunDescriptor.
    pub fn new(
        id: impl Into<RunId>,
        platform: impl Into<String>,
        algorithm: impl Into<String>,
        dataset: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            platform: platform.into(),
            algorithm: algorithm.into(),
            dataset: dataset.into(),
            parameters: HashMap::new(),
        }
    }

    /// Builder method to add a parameter.
    pub fn with_parameter(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.parameters.insert(key.into(), value.into());
        self
    }
}
