//! Graphbench Core Domain Types
//!
//! This crate contains pure domain types with no dependencies on:
//! - Network/gRPC
//! - Process management
//! - Runtime specifics
//!
//! All types here represent the core domain of a benchmark run: its
//! descriptor, its lifecycle state as observed by the executor, the failure
//! taxonomy, and the pluggable workload capability set.

pub mod descriptor;
pub mod error;
pub mod failure;
pub mod ids;
pub mod record;
pub mod result;
pub mod workload;

// Re-export commonly used types
pub use descriptor::RunDescriptor;
pub use error::CoreError;
pub use failure::{Failure, FailureKind};
pub use ids::RunId;
pub use record::{RunRecord, RunState};
pub use result::{RunMetrics, RunResult};
pub use workload::{Workload, WorkloadError};
