//! Lifecycle driver scenario tests.
//!
//! These drive scripted workloads through the full phase sequence over a
//! recording reporter and assert on the exact message stream.

use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;

use graphbench_core::{
    Failure, FailureKind, RunDescriptor, RunId, RunMetrics, RunResult, Workload, WorkloadError,
};
use graphbench_proto::pb::{self, notification::Payload};
use graphbench_runner::driver::{drive, RunOutcome};
use graphbench_runner::reporter::{registration, Reporter};

/// What a scripted phase does.
#[derive(Clone, Copy)]
enum Phase {
    /// Complete successfully.
    Succeed,
    /// Return `Ok(false)` - a reported, survivable negative outcome.
    Report,
    /// Return `Err` - fatal.
    Abort,
}

struct ScriptedWorkload {
    startup: Phase,
    run: Phase,
    collect: Phase,
    validate: Phase,
    finalize: Phase,
}

impl Default for ScriptedWorkload {
    fn default() -> Self {
        Self {
            startup: Phase::Succeed,
            run: Phase::Succeed,
            collect: Phase::Succeed,
            validate: Phase::Succeed,
            finalize: Phase::Succeed,
        }
    }
}

fn blow_up(phase: &str) -> WorkloadError {
    WorkloadError::Platform(format!("{phase} blew up"))
}

fn boolean_phase(phase: Phase, name: &str) -> Result<bool, WorkloadError> {
    match phase {
        Phase::Succeed => Ok(true),
        Phase::Report => Ok(false),
        Phase::Abort => Err(blow_up(name)),
    }
}

#[async_trait]
impl Workload for ScriptedWorkload {
    fn platform(&self) -> &str {
        "scripted"
    }

    async fn startup(&self, _run: &RunDescriptor) -> Result<(), WorkloadError> {
        match self.startup {
            Phase::Abort => Err(blow_up("startup")),
            _ => Ok(()),
        }
    }

    async fn run(&self, _run: &RunDescriptor) -> Result<bool, WorkloadError> {
        boolean_phase(self.run, "run")
    }

    async fn collect(&self, _run: &RunDescriptor) -> Result<bool, WorkloadError> {
        boolean_phase(self.collect, "collect")
    }

    async fn validate(&self, _run: &RunDescriptor) -> Result<bool, WorkloadError> {
        boolean_phase(self.validate, "validate")
    }

    async fn finalize(&self, _run: &RunDescriptor) -> Result<RunMetrics, WorkloadError> {
        match self.finalize {
            Phase::Abort => Err(blow_up("finalize")),
            _ => Ok(RunMetrics::new(100, 40)),
        }
    }

    async fn summarize(
        &self,
        run: &RunDescriptor,
        metrics: RunMetrics,
    ) -> Result<RunResult, WorkloadError> {
        Ok(RunResult::new(run.id.clone(), metrics))
    }
}

/// One entry per message the driver handed to the reporter, in order.
#[derive(Debug, Clone, PartialEq, Eq)]
enum Sent {
    Registration(u32),
    Execution,
    Validation,
    Failure(FailureKind),
    Result,
    Flush,
}

#[derive(Default)]
struct RecordingReporter {
    sent: Mutex<Vec<Sent>>,
}

impl RecordingReporter {
    fn sent(&self) -> Vec<Sent> {
        self.sent.lock().unwrap().clone()
    }

    fn failure_kinds(&self) -> Vec<FailureKind> {
        self.sent()
            .into_iter()
            .filter_map(|sent| match sent {
                Sent::Failure(kind) => Some(kind),
                _ => None,
            })
            .collect()
    }
}

#[async_trait]
impl Reporter for RecordingReporter {
    async fn send(&self, notification: pb::Notification) {
        let label = pb::NotificationLabel::try_from(notification.label)
            .unwrap_or(pb::NotificationLabel::Unspecified);
        let sent = match (label, notification.payload) {
            (pb::NotificationLabel::Registration, Some(Payload::ProcessId(pid))) => {
                Sent::Registration(pid)
            }
            (pb::NotificationLabel::Execution, _) => Sent::Execution,
            (pb::NotificationLabel::Validation, _) => Sent::Validation,
            (pb::NotificationLabel::Failure, Some(Payload::Failure(f))) => {
                let failure: Failure = f.into();
                Sent::Failure(failure.kind)
            }
            other => panic!("unexpected notification: {other:?}"),
        };
        self.sent.lock().unwrap().push(sent);
    }

    async fn report_result(&self, _result: RunResult) {
        self.sent.lock().unwrap().push(Sent::Result);
    }

    async fn flush(&self, _bound: Duration) -> bool {
        self.sent.lock().unwrap().push(Sent::Flush);
        true
    }
}

fn descriptor() -> RunDescriptor {
    RunDescriptor::new("r1", "scripted", "bfs", "example-directed")
}

/// Run the workload the way the runner binary does: registration first, then
/// the phase sequence.
async fn run_scripted(workload: ScriptedWorkload) -> (RecordingReporter, RunOutcome) {
    let reporter = RecordingReporter::default();
    let run = descriptor();
    reporter.send(registration(&RunId::new("r1"), 77)).await;
    let outcome = drive(&workload, &run, &reporter).await;
    (reporter, outcome)
}

#[tokio::test]
async fn test_clean_run_sends_boundaries_then_result() {
    let (reporter, outcome) = run_scripted(ScriptedWorkload::default()).await;

    assert_eq!(outcome, RunOutcome::Completed);
    assert_eq!(
        reporter.sent(),
        vec![
            Sent::Registration(77),
            Sent::Execution,
            Sent::Validation,
            Sent::Result,
        ]
    );
}

#[tokio::test]
async fn test_failed_collect_still_confirms_execution() {
    let (reporter, outcome) = run_scripted(ScriptedWorkload {
        collect: Phase::Report,
        ..ScriptedWorkload::default()
    })
    .await;

    assert_eq!(outcome, RunOutcome::Completed);
    assert_eq!(
        reporter.sent(),
        vec![
            Sent::Registration(77),
            Sent::Failure(FailureKind::Collect),
            Sent::Execution,
            Sent::Validation,
            Sent::Result,
        ]
    );
}

#[tokio::test]
async fn test_run_panic_aborts_before_execution_confirmation() {
    let (reporter, outcome) = run_scripted(ScriptedWorkload {
        run: Phase::Abort,
        ..ScriptedWorkload::default()
    })
    .await;

    assert_eq!(outcome, RunOutcome::Terminated);
    assert_eq!(
        reporter.sent(),
        vec![
            Sent::Registration(77),
            Sent::Failure(FailureKind::Exec),
            Sent::Flush,
        ]
    );
}

#[tokio::test]
async fn test_finalize_error_aborts_after_validation() {
    let (reporter, outcome) = run_scripted(ScriptedWorkload {
        finalize: Phase::Abort,
        ..ScriptedWorkload::default()
    })
    .await;

    assert_eq!(outcome, RunOutcome::Terminated);
    assert_eq!(
        reporter.sent(),
        vec![
            Sent::Registration(77),
            Sent::Execution,
            Sent::Validation,
            Sent::Failure(FailureKind::Metrics),
            Sent::Flush,
        ]
    );
}

#[tokio::test]
async fn test_startup_error_aborts_everything() {
    let (reporter, outcome) = run_scripted(ScriptedWorkload {
        startup: Phase::Abort,
        ..ScriptedWorkload::default()
    })
    .await;

    assert_eq!(outcome, RunOutcome::Terminated);
    assert_eq!(
        reporter.sent(),
        vec![
            Sent::Registration(77),
            Sent::Failure(FailureKind::Init),
            Sent::Flush,
        ]
    );
}

#[tokio::test]
async fn test_failed_validation_still_confirms_and_completes() {
    let (reporter, outcome) = run_scripted(ScriptedWorkload {
        validate: Phase::Report,
        ..ScriptedWorkload::default()
    })
    .await;

    assert_eq!(outcome, RunOutcome::Completed);
    assert_eq!(
        reporter.sent(),
        vec![
            Sent::Registration(77),
            Sent::Execution,
            Sent::Failure(FailureKind::Validate),
            Sent::Validation,
            Sent::Result,
        ]
    );
}

#[tokio::test]
async fn test_reported_failures_accumulate_in_phase_order() {
    let (reporter, outcome) = run_scripted(ScriptedWorkload {
        collect: Phase::Report,
        validate: Phase::Report,
        ..ScriptedWorkload::default()
    })
    .await;

    assert_eq!(outcome, RunOutcome::Completed);
    assert_eq!(
        reporter.failure_kinds(),
        vec![FailureKind::Collect, FailureKind::Validate]
    );
    // Both boundary confirmations and the result still go out.
    let sent = reporter.sent();
    assert!(sent.contains(&Sent::Execution));
    assert!(sent.contains(&Sent::Validation));
    assert_eq!(sent.last(), Some(&Sent::Result));
}

#[tokio::test]
async fn test_fatal_abort_sends_nothing_further() {
    let (reporter, _) = run_scripted(ScriptedWorkload {
        collect: Phase::Abort,
        ..ScriptedWorkload::default()
    })
    .await;

    let sent = reporter.sent();
    // FAILURE then drain; no boundary confirmation, no result.
    assert_eq!(sent.last(), Some(&Sent::Flush));
    assert!(!sent.contains(&Sent::Execution));
    assert!(!sent.contains(&Sent::Validation));
    assert!(!sent.contains(&Sent::Result));
}

#[tokio::test]
async fn test_registration_always_first() {
    for workload in [
        ScriptedWorkload::default(),
        ScriptedWorkload {
            run: Phase::Abort,
            ..ScriptedWorkload::default()
        },
        ScriptedWorkload {
            validate: Phase::Report,
            ..ScriptedWorkload::default()
        },
    ] {
        let (reporter, _) = run_scripted(workload).await;
        assert_eq!(reporter.sent().first(), Some(&Sent::Registration(77)));
    }
}
