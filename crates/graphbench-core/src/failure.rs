//! Failure taxonomy for benchmark runs.

use serde::{Deserialize, Serialize};
use std::fmt;

/// The closed set of failure kinds, one per lifecycle phase that can fail.
///
/// The executor uses the kind for diagnostic bucketing only; a failure never
/// triggers an automatic retry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum FailureKind {
    /// Workload startup failed.
    Init,
    /// Algorithm execution failed.
    Exec,
    /// Output collection failed.
    Collect,
    /// Result validation failed.
    Validate,
    /// Metrics finalization or summarization failed.
    Metrics,
}

impl fmt::Display for FailureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            FailureKind::Init => "INIT",
            FailureKind::Exec => "EXEC",
            FailureKind::Collect => "COLLECT",
            FailureKind::Validate => "VALIDATE",
            FailureKind::Metrics => "METRICS",
        };
        write!(f, "{name}")
    }
}

/// A single recorded failure: the phase it belongs to, optionally paired with
/// a human-readable cause description.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Failure {
    /// Which phase failed.
    pub kind: FailureKind,

    /// Optional cause description.
    pub detail: Option<String>,
}

impl Failure {
    /// Create a failure with no detail.
    pub fn new(kind: FailureKind) -> Self {
        Self { kind, detail: None }
    }

    /// Create a failure carrying a cause description.
    pub fn with_detail(kind: FailureKind, detail: impl Into<String>) -> Self {
        Self {
            kind,
            detail: Some(detail.into()),
        }
    }
}

impl fmt::Display for Failure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.detail {
            Some(detail) => write!(f, "{}: {}", self.kind, detail),
            None => write!(f, "{}", self.kind),
        }
    }
}
