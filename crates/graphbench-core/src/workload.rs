//! The pluggable workload capability set.
//!
//! A platform integrates with graphbench by implementing exactly these
//! operations. `Err` from any operation means the workload is in an unknown
//! state and the run must abort; `Ok(false)` from the boolean operations is a
//! reported, survivable negative outcome that still lets later phases gather
//! diagnostics.

use crate::{RunDescriptor, RunMetrics, RunResult};
use async_trait::async_trait;
use thiserror::Error;

/// Errors raised by workload implementations.
#[derive(Debug, Error)]
pub enum WorkloadError {
    /// IO failure while touching datasets or output files.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Underlying platform reported a failure.
    #[error("Platform error: {0}")]
    Platform(String),

    /// Dataset missing or malformed.
    #[error("Dataset error: {0}")]
    Dataset(String),

    /// Descriptor cannot be executed by this workload.
    #[error("Invalid run: {0}")]
    Invalid(String),
}

/// A platform-specific benchmark workload.
///
/// The runner drives one descriptor through `startup`, `run`, `collect`,
/// `validate`, `finalize` and `summarize`, strictly in that order and never
/// concurrently for the same run.
#[async_trait]
pub trait Workload: Send + Sync {
    /// Platform identifier (e.g. "reference", "graphmat").
    fn platform(&self) -> &str;

    /// Prepare the platform for the run: load the dataset, allocate whatever
    /// the algorithm needs.
    async fn startup(&self, run: &RunDescriptor) -> Result<(), WorkloadError>;

    /// Execute the algorithm. `Ok(false)` reports a failed execution that
    /// left the workload usable.
    async fn run(&self, run: &RunDescriptor) -> Result<bool, WorkloadError>;

    /// Collect and count the run's output. `Ok(false)` reports missing or
    /// incomplete output.
    async fn collect(&self, run: &RunDescriptor) -> Result<bool, WorkloadError>;

    /// Validate the output against the expected result. `Ok(false)` reports
    /// incorrect output.
    async fn validate(&self, run: &RunDescriptor) -> Result<bool, WorkloadError>;

    /// Produce the run's metrics.
    async fn finalize(&self, run: &RunDescriptor) -> Result<RunMetrics, WorkloadError>;

    /// Fold the metrics into the terminal result object.
    async fn summarize(
        &self,
        run: &RunDescriptor,
        metrics: RunMetrics,
    ) -> Result<RunResult, WorkloadError>;
}
