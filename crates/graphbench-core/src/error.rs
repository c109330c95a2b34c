//! Core domain errors.

use thiserror::Error;

/// Core domain errors for graphbench.
#[derive(Debug, Error)]
pub enum CoreError {
    /// Run not found.
    #[error("Run not found: {0}")]
    RunNotFound(String),

    /// Invalid lifecycle state transition.
    #[error("Invalid state transition: {from} -> {to}")]
    InvalidStateTransition { from: String, to: String },

    /// A result arrived for a run already marked terminated.
    #[error("Result delivered for terminated run: {0}")]
    ResultAfterTermination(String),

    /// A termination was recorded for a run that already completed.
    #[error("Termination recorded for completed run: {0}")]
    TerminatedAfterCompletion(String),

    /// Invalid run descriptor.
    #[error("Invalid descriptor: {0}")]
    InvalidDescriptor(String),
}
