//! ExecutorService implementation - the receiving end of the run protocol.

use std::sync::Arc;

use tonic::{Request, Response, Status};
use tracing::{info, warn};

use graphbench_core::{Failure, RunDescriptor, RunId, RunResult};
use graphbench_proto::pb::{self, notification::Payload};
use graphbench_proto::RunnerServiceClient;
use graphbench_proto::{ExecutorService, ExecutorServiceServer};

use crate::state::AppState;

/// ExecutorService implementation.
///
/// Dispatches every incoming message by run id into that run's record; one
/// run's message never blocks another's beyond the registry lock.
pub struct ExecutorServiceImpl {
    state: Arc<AppState>,
}

impl ExecutorServiceImpl {
    /// Create a new ExecutorServiceImpl.
    pub fn new(state: Arc<AppState>) -> Self {
        Self { state }
    }

    /// Convert into a tonic server.
    pub fn into_server(self) -> ExecutorServiceServer<Self> {
        ExecutorServiceServer::new(self)
    }
}

#[tonic::async_trait]
impl ExecutorService for ExecutorServiceImpl {
    async fn notify(
        &self,
        request: Request<pb::Notification>,
    ) -> Result<Response<pb::Ack>, Status> {
        handle_notification(&self.state, request.into_inner()).await;
        Ok(Response::new(pb::Ack {}))
    }

    async fn report_result(
        &self,
        request: Request<pb::RunResultReport>,
    ) -> Result<Response<pb::Ack>, Status> {
        handle_result(&self.state, request.into_inner()).await;
        Ok(Response::new(pb::Ack {}))
    }
}

async fn handle_notification(state: &Arc<AppState>, notification: pb::Notification) {
    let run_id = RunId::new(&notification.run_id);
    let label = pb::NotificationLabel::try_from(notification.label)
        .unwrap_or(pb::NotificationLabel::Unspecified);

    match label {
        pb::NotificationLabel::Registration => {
            handle_registration(state, run_id, notification.payload).await;
        }
        pb::NotificationLabel::Execution => {
            handle_execution(state, run_id, notification.payload).await;
        }
        pb::NotificationLabel::Validation => {
            handle_validation(state, run_id, notification.payload).await;
        }
        pb::NotificationLabel::Failure => {
            handle_failure(state, run_id, notification.payload).await;
        }
        pb::NotificationLabel::Unspecified => {
            warn!(run_id = %run_id, "Notification without a label");
        }
    }
}

async fn handle_registration(state: &Arc<AppState>, run_id: RunId, payload: Option<Payload>) {
    let Some(Payload::ProcessId(process_id)) = payload else {
        warn!(run_id = %run_id, "Registration without a process id");
        return;
    };

    let routed = {
        let mut runs = state.runs.write().await;
        let Some(record) = runs.get_mut(&run_id) else {
            warn!(run_id = %run_id, "Registration for unknown run");
            return;
        };
        if let Err(e) = record.mark_initialized(process_id) {
            warn!(run_id = %run_id, error = %e, "Ignored registration");
            return;
        }
        info!(run_id = %run_id, process_id, "Runner registered");
        let endpoint = record.runner_endpoint().map(str::to_owned);
        endpoint.map(|endpoint| (endpoint, record.descriptor.clone()))
    };

    // Answer the registration with the run descriptor. This is the only
    // message pushed into the running process.
    match routed {
        Some((endpoint, descriptor)) => {
            tokio::spawn(send_assignment(endpoint, descriptor));
        }
        None => {
            warn!(run_id = %run_id, "No runner endpoint recorded - descriptor not sent");
        }
    }
}

async fn handle_execution(state: &Arc<AppState>, run_id: RunId, payload: Option<Payload>) {
    let message = confirmation_text(payload);
    let mut runs = state.runs.write().await;
    let Some(record) = runs.get_mut(&run_id) else {
        warn!(run_id = %run_id, "Execution notification for unknown run");
        return;
    };
    match record.mark_executed() {
        Ok(()) => info!(run_id = %run_id, message = %message, "Benchmark executed"),
        Err(e) => warn!(run_id = %run_id, error = %e, "Ignored execution notification"),
    }
}

async fn handle_validation(state: &Arc<AppState>, run_id: RunId, payload: Option<Payload>) {
    let message = confirmation_text(payload);
    let mut runs = state.runs.write().await;
    let Some(record) = runs.get_mut(&run_id) else {
        warn!(run_id = %run_id, "Validation notification for unknown run");
        return;
    };
    match record.mark_validated() {
        Ok(()) => info!(run_id = %run_id, message = %message, "Benchmark validated"),
        Err(e) => warn!(run_id = %run_id, error = %e, "Ignored validation notification"),
    }
}

async fn handle_failure(state: &Arc<AppState>, run_id: RunId, payload: Option<Payload>) {
    let Some(Payload::Failure(proto_failure)) = payload else {
        warn!(run_id = %run_id, "Failure notification without a failure record");
        return;
    };
    let failure: Failure = proto_failure.into();

    let mut runs = state.runs.write().await;
    let Some(record) = runs.get_mut(&run_id) else {
        warn!(run_id = %run_id, "Failure notification for unknown run");
        return;
    };
    // Failures accumulate without touching the lifecycle state.
    warn!(run_id = %run_id, failure = %failure, "Benchmark failure reported");
    record.add_failure(failure);
}

async fn handle_result(state: &Arc<AppState>, report: pb::RunResultReport) {
    let run_id = RunId::new(&report.run_id);
    let result: RunResult = report.into();

    let mut runs = state.runs.write().await;
    let Some(record) = runs.get_mut(&run_id) else {
        warn!(run_id = %run_id, "Result for unknown run");
        return;
    };
    match record.set_result(result) {
        Ok(()) => info!(run_id = %run_id, "Benchmark run completed"),
        Err(e) => warn!(run_id = %run_id, error = %e, "Ignored result"),
    }
}

fn confirmation_text(payload: Option<Payload>) -> String {
    match payload {
        Some(Payload::Message(message)) => message,
        _ => String::new(),
    }
}

async fn send_assignment(endpoint: String, descriptor: RunDescriptor) {
    let assignment = pb::RunAssignment {
        run_id: descriptor.id.into_inner(),
        platform: descriptor.platform,
        algorithm: descriptor.algorithm,
        dataset: descriptor.dataset,
        parameters: descriptor.parameters,
        issued_at_ms: chrono::Utc::now().timestamp_millis(),
    };

    info!(
        run_id = %assignment.run_id,
        addr = %endpoint,
        "Sending run descriptor to runner"
    );

    match RunnerServiceClient::connect(endpoint.clone()).await {
        Ok(mut client) => {
            if let Err(e) = client.assign_run(assignment).await {
                warn!(error = %e, "Failed to send run descriptor");
            }
        }
        Err(e) => {
            warn!(addr = %endpoint, error = %e, "Runner unreachable");
        }
    }
}
