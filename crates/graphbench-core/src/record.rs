//! Per-run state tracking on the executor side.

use crate::{CoreError, Failure, RunDescriptor, RunResult};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Lifecycle state of a run as observed by the executor.
///
/// States advance monotonically one step at a time along
/// `Created -> Prepared -> Initialized -> Executed -> Validated -> Completed`.
/// `Terminated` is reachable from any non-completed state and marks a run
/// that will deliver no further messages. `Completed` and `Terminated` are
/// mutually exclusive terminal outcomes.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RunState {
    /// Record created, nothing observed yet.
    #[default]
    Created,
    /// Executor finished local preparation, before the runner was spawned.
    Prepared,
    /// Registration observed; process id bound.
    Initialized,
    /// Execution (run + collect) confirmed by the runner.
    Executed,
    /// Validation confirmed by the runner.
    Validated,
    /// Terminal: result delivered.
    Completed,
    /// Terminal: runner aborted or its process disappeared.
    Terminated,
}

impl RunState {
    /// Returns true if the run is in a terminal state.
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Completed | Self::Terminated)
    }

    /// Position along the forward progression; terminal-by-abort sits outside
    /// the ordered sequence.
    fn rank(self) -> Option<u8> {
        match self {
            Self::Created => Some(0),
            Self::Prepared => Some(1),
            Self::Initialized => Some(2),
            Self::Executed => Some(3),
            Self::Validated => Some(4),
            Self::Completed => Some(5),
            Self::Terminated => None,
        }
    }
}

impl fmt::Display for RunState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Created => "CREATED",
            Self::Prepared => "PREPARED",
            Self::Initialized => "INITIALIZED",
            Self::Executed => "EXECUTED",
            Self::Validated => "VALIDATED",
            Self::Completed => "COMPLETED",
            Self::Terminated => "TERMINATED",
        };
        write!(f, "{name}")
    }
}

/// Executor-side record of one active run.
///
/// Owned and mutated exclusively by the executor; the runner only ever
/// communicates through notifications. Exactly one record exists per run id,
/// created before spawn and retired after a terminal outcome. The failure
/// sequence is append-only and never reordered; the result is set at most
/// once.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunRecord {
    /// The descriptor this run executes.
    pub descriptor: RunDescriptor,

    /// Current lifecycle state.
    state: RunState,

    /// Accumulated failures, in arrival order.
    failures: Vec<Failure>,

    /// OS process id of the runner, bound at registration.
    process_id: Option<u32>,

    /// Address used to route messages back to this run's runner instance.
    /// Routing only; the record does not own the remote process.
    runner_endpoint: Option<String>,

    /// Terminal result, present only on completed runs.
    result: Option<RunResult>,
}

impl RunRecord {
    /// Create a fresh record for a run about to be prepared.
    pub fn new(descriptor: RunDescriptor) -> Self {
        Self {
            descriptor,
            state: RunState::Created,
            failures: Vec::new(),
            process_id: None,
            runner_endpoint: None,
            result: None,
        }
    }

    /// Current lifecycle state.
    pub fn state(&self) -> RunState {
        self.state
    }

    /// Failures observed so far, in arrival order.
    pub fn failures(&self) -> &[Failure] {
        &self.failures
    }

    /// Runner process id, if registration was observed.
    pub fn process_id(&self) -> Option<u32> {
        self.process_id
    }

    /// Routing address of the runner instance, if known.
    pub fn runner_endpoint(&self) -> Option<&str> {
        self.runner_endpoint.as_deref()
    }

    /// Terminal result, if the run completed.
    pub fn result(&self) -> Option<&RunResult> {
        self.result.as_ref()
    }

    /// Record that local preparation finished.
    pub fn mark_prepared(&mut self) -> Result<(), CoreError> {
        self.advance(RunState::Prepared)
    }

    /// Record the registration notification, binding the runner's process id.
    pub fn mark_initialized(&mut self, process_id: u32) -> Result<(), CoreError> {
        self.advance(RunState::Initialized)?;
        self.process_id = Some(process_id);
        Ok(())
    }

    /// Record the execution notification.
    pub fn mark_executed(&mut self) -> Result<(), CoreError> {
        self.advance(RunState::Executed)
    }

    /// Record the validation notification.
    pub fn mark_validated(&mut self) -> Result<(), CoreError> {
        self.advance(RunState::Validated)
    }

    /// Record the terminal result. Rejected if the run was already marked
    /// terminated: a run produces a result or a termination, never both.
    pub fn set_result(&mut self, result: RunResult) -> Result<(), CoreError> {
        if self.state == RunState::Terminated {
            return Err(CoreError::ResultAfterTermination(
                self.descriptor.id.to_string(),
            ));
        }
        self.advance(RunState::Completed)?;
        self.result = Some(result);
        Ok(())
    }

    /// Record that the runner process is gone without a result. Legal from
    /// any non-completed state; idempotent.
    pub fn mark_terminated(&mut self) -> Result<(), CoreError> {
        match self.state {
            RunState::Terminated => Ok(()),
            RunState::Completed => Err(CoreError::TerminatedAfterCompletion(
                self.descriptor.id.to_string(),
            )),
            _ => {
                self.state = RunState::Terminated;
                Ok(())
            }
        }
    }

    /// Append a failure. Failures are never removed or reordered.
    pub fn add_failure(&mut self, failure: Failure) {
        self.failures.push(failure);
    }

    /// Remember how to route messages back to this run's runner instance.
    pub fn set_runner_endpoint(&mut self, endpoint: impl Into<String>) {
        self.runner_endpoint = Some(endpoint.into());
    }

    fn advance(&mut self, to: RunState) -> Result<(), CoreError> {
        if self.state == to {
            // Observationally a no-op; the flag was already set.
            return Ok(());
        }
        match (self.state.rank(), to.rank()) {
            (Some(from), Some(target)) if target == from + 1 => {
                self.state = to;
                Ok(())
            }
            _ => Err(CoreError::InvalidStateTransition {
                from: self.state.to_string(),
                to: to.to_string(),
            }),
        }
    }
}
