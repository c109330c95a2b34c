//! End-to-end tests: driver plus gRPC reporter against a live executor
//! service on an ephemeral port.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use tokio::net::TcpListener;
use tokio_stream::wrappers::TcpListenerStream;
use tonic::transport::Server;

use graphbench_core::{
    FailureKind, RunDescriptor, RunMetrics, RunRecord, RunResult, RunState, Workload,
    WorkloadError,
};
use graphbench_executor::{AppState, ExecutorServiceImpl};
use graphbench_runner::driver::{drive, RunOutcome};
use graphbench_runner::reporter::{registration, GrpcReporter, Reporter};
use graphbench_runner::workloads;

/// Stand up an executor service with one prepared record and return its
/// state plus the endpoint to report to.
async fn executor_with_run(descriptor: &RunDescriptor) -> (Arc<AppState>, String) {
    let state = AppState::new();

    let mut record = RunRecord::new(descriptor.clone());
    record.mark_prepared().unwrap();
    state
        .runs
        .write()
        .await
        .insert(descriptor.id.clone(), record);

    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let service = ExecutorServiceImpl::new(state.clone()).into_server();
    tokio::spawn(async move {
        Server::builder()
            .add_service(service)
            .serve_with_incoming(TcpListenerStream::new(listener))
            .await
            .unwrap();
    });

    (state, format!("http://{addr}"))
}

#[tokio::test]
async fn test_clean_run_completes_the_record() {
    let descriptor = RunDescriptor::new("e2e-1", "reference", "degree", "synthetic-ring");
    let (state, endpoint) = executor_with_run(&descriptor).await;

    let reporter = GrpcReporter::new(endpoint);
    reporter
        .send(registration(&descriptor.id, std::process::id()))
        .await;

    let workload = workloads::resolve("reference").unwrap();
    let outcome = drive(workload.as_ref(), &descriptor, &reporter).await;
    assert_eq!(outcome, RunOutcome::Completed);

    // Every rpc the forwarder issued has been answered once flush returns,
    // so the record reflects the full stream.
    assert!(reporter.flush(Duration::from_secs(10)).await);

    let runs = state.runs.read().await;
    let record = &runs[&descriptor.id];
    assert_eq!(record.state(), RunState::Completed);
    assert!(record.failures().is_empty());
    let result = record.result().unwrap();
    assert_eq!(result.run_id, descriptor.id);
}

/// Workload whose execution phase fails hard.
struct BrokenWorkload;

#[async_trait]
impl Workload for BrokenWorkload {
    fn platform(&self) -> &str {
        "broken"
    }

    async fn startup(&self, _run: &RunDescriptor) -> Result<(), WorkloadError> {
        Ok(())
    }

    async fn run(&self, _run: &RunDescriptor) -> Result<bool, WorkloadError> {
        Err(WorkloadError::Platform("segfault in kernel".to_string()))
    }

    async fn collect(&self, _run: &RunDescriptor) -> Result<bool, WorkloadError> {
        Ok(true)
    }

    async fn validate(&self, _run: &RunDescriptor) -> Result<bool, WorkloadError> {
        Ok(true)
    }

    async fn finalize(&self, _run: &RunDescriptor) -> Result<RunMetrics, WorkloadError> {
        Ok(RunMetrics::default())
    }

    async fn summarize(
        &self,
        run: &RunDescriptor,
        metrics: RunMetrics,
    ) -> Result<RunResult, WorkloadError> {
        Ok(RunResult::new(run.id.clone(), metrics))
    }
}

#[tokio::test]
async fn test_fatal_run_reports_failure_and_stops() {
    let descriptor = RunDescriptor::new("e2e-2", "broken", "degree", "synthetic-ring");
    let (state, endpoint) = executor_with_run(&descriptor).await;

    let reporter = GrpcReporter::new(endpoint);
    reporter
        .send(registration(&descriptor.id, std::process::id()))
        .await;

    let outcome = drive(&BrokenWorkload, &descriptor, &reporter).await;
    assert_eq!(outcome, RunOutcome::Terminated);

    let runs = state.runs.read().await;
    let record = &runs[&descriptor.id];

    // Registration landed, nothing past it did.
    assert_eq!(record.state(), RunState::Initialized);
    assert!(record.result().is_none());

    let kinds: Vec<_> = record.failures().iter().map(|f| f.kind).collect();
    assert_eq!(kinds, vec![FailureKind::Exec]);
    assert_eq!(
        record.failures()[0].detail.as_deref(),
        Some("segfault in kernel")
    );
}

#[tokio::test]
async fn test_reported_failures_reach_the_record_in_order() {
    let descriptor = RunDescriptor::new("e2e-3", "reference", "degree", "synthetic-ring")
        // Zero vertices: run and collect both report unsuccessful outcomes,
        // validation of the empty output still passes.
        .with_parameter("vertices", "0");
    let (state, endpoint) = executor_with_run(&descriptor).await;

    let reporter = GrpcReporter::new(endpoint);
    reporter
        .send(registration(&descriptor.id, std::process::id()))
        .await;

    let workload = workloads::resolve("reference").unwrap();
    let outcome = drive(workload.as_ref(), &descriptor, &reporter).await;
    assert_eq!(outcome, RunOutcome::Completed);
    assert!(reporter.flush(Duration::from_secs(10)).await);

    let runs = state.runs.read().await;
    let record = &runs[&descriptor.id];
    assert_eq!(record.state(), RunState::Completed);
    let kinds: Vec<_> = record.failures().iter().map(|f| f.kind).collect();
    assert_eq!(kinds, vec![FailureKind::Exec, FailureKind::Collect]);
}
