//! The run lifecycle driver.
//!
//! Drives one descriptor through `startup -> run -> collect -> validate ->
//! finalize -> summarize`, strictly sequentially. An `Err` from any phase is
//! fatal: the failure is reported, queued messages are drained within a
//! bound, and the run aborts with no further notifications. An `Ok(false)`
//! from `run`, `collect` or `validate` is reported as a failure but the
//! remaining phases still execute so the executor receives best-effort
//! diagnostics.

use std::time::Duration;

use tracing::{error, info, warn};

use graphbench_core::{Failure, FailureKind, RunDescriptor, Workload};
use graphbench_proto::pb;

use crate::reporter::{confirmation, failure, Reporter};

/// Bound on how long a fatal abort waits for queued notifications to drain
/// before the process exits.
pub const ABORT_FLUSH_BOUND: Duration = Duration::from_secs(5);

/// Terminal outcome of driving one run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunOutcome {
    /// Every phase completed; the result was handed to the executor.
    Completed,
    /// A fatal failure aborted the run; no result was produced.
    Terminated,
}

/// Drive `run` through the full phase sequence against `workload`.
///
/// The caller is expected to have sent the REGISTRATION notification before
/// invoking this, and to exit the process when `Terminated` is returned.
pub async fn drive(
    workload: &dyn Workload,
    run: &RunDescriptor,
    reporter: &dyn Reporter,
) -> RunOutcome {
    info!(
        run_id = %run.id,
        platform = workload.platform(),
        algorithm = %run.algorithm,
        dataset = %run.dataset,
        "The runner is executing benchmark run"
    );

    if let Err(e) = workload.startup(run).await {
        error!(run_id = %run.id, error = %e, "Failed to start up benchmark run");
        return abort(reporter, run, FailureKind::Init, e.to_string()).await;
    }

    match workload.run(run).await {
        Ok(true) => {}
        Ok(false) => {
            warn!(run_id = %run.id, "Benchmark execution reported an unsuccessful run");
            reporter
                .send(failure(&run.id, Failure::new(FailureKind::Exec)))
                .await;
        }
        Err(e) => {
            error!(run_id = %run.id, error = %e, "Failed to execute benchmark run");
            return abort(reporter, run, FailureKind::Exec, e.to_string()).await;
        }
    }

    match workload.collect(run).await {
        Ok(true) => {}
        Ok(false) => {
            warn!(run_id = %run.id, "Benchmark output missing or incomplete");
            reporter
                .send(failure(&run.id, Failure::new(FailureKind::Collect)))
                .await;
        }
        Err(e) => {
            error!(run_id = %run.id, error = %e, "Failed to collect benchmark output");
            return abort(reporter, run, FailureKind::Collect, e.to_string()).await;
        }
    }

    reporter
        .send(confirmation(
            &run.id,
            pb::NotificationLabel::Execution,
            "Executed benchmark.",
        ))
        .await;

    match workload.validate(run).await {
        Ok(true) => {}
        Ok(false) => {
            warn!(run_id = %run.id, "Benchmark result failed validation");
            reporter
                .send(failure(&run.id, Failure::new(FailureKind::Validate)))
                .await;
        }
        Err(e) => {
            error!(run_id = %run.id, error = %e, "Failed to validate benchmark run");
            return abort(reporter, run, FailureKind::Validate, e.to_string()).await;
        }
    }

    reporter
        .send(confirmation(
            &run.id,
            pb::NotificationLabel::Validation,
            "Validated benchmark result.",
        ))
        .await;

    let metrics = match workload.finalize(run).await {
        Ok(metrics) => metrics,
        Err(e) => {
            error!(run_id = %run.id, error = %e, "Failed to finalize benchmark");
            return abort(reporter, run, FailureKind::Metrics, e.to_string()).await;
        }
    };

    let result = match workload.summarize(run, metrics).await {
        Ok(result) => result,
        Err(e) => {
            error!(run_id = %run.id, error = %e, "Failed to summarize benchmark");
            return abort(reporter, run, FailureKind::Metrics, e.to_string()).await;
        }
    };

    info!(
        run_id = %run.id,
        makespan_ms = result.metrics.makespan_ms,
        "Reporting benchmark result"
    );
    reporter.report_result(result).await;

    RunOutcome::Completed
}

/// Report a fatal failure, drain the outbound queue within the bound, and
/// abort. Nothing further is sent for this run.
async fn abort(
    reporter: &dyn Reporter,
    run: &RunDescriptor,
    kind: FailureKind,
    detail: String,
) -> RunOutcome {
    reporter
        .send(failure(&run.id, Failure::with_detail(kind, detail)))
        .await;
    if !reporter.flush(ABORT_FLUSH_BOUND).await {
        warn!(run_id = %run.id, "Queued notifications not drained before abort");
    }
    RunOutcome::Terminated
}
