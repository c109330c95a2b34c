//! Run assignment endpoint.
//!
//! The only message the executor pushes into a running process is the single
//! `AssignRun` carrying the run descriptor; everything afterwards is
//! runner-initiated.

use tokio::sync::{oneshot, Mutex};
use tonic::{Request, Response, Status};
use tracing::{info, warn};

use graphbench_core::{RunDescriptor, RunId};
use graphbench_proto::pb;
use graphbench_proto::{RunnerService, RunnerServiceServer};

/// RunnerService implementation: accepts the descriptor for the one run this
/// process was spawned for and hands it to the driver loop.
pub struct RunnerServiceImpl {
    expected_run_id: RunId,
    assignment_tx: Mutex<Option<oneshot::Sender<RunDescriptor>>>,
}

impl RunnerServiceImpl {
    /// Create the service and the receiver the driver loop awaits.
    pub fn new(expected_run_id: RunId) -> (Self, oneshot::Receiver<RunDescriptor>) {
        let (tx, rx) = oneshot::channel();
        (
            Self {
                expected_run_id,
                assignment_tx: Mutex::new(Some(tx)),
            },
            rx,
        )
    }

    /// Convert into a tonic server.
    pub fn into_server(self) -> RunnerServiceServer<Self> {
        RunnerServiceServer::new(self)
    }
}

#[tonic::async_trait]
impl RunnerService for RunnerServiceImpl {
    async fn assign_run(
        &self,
        request: Request<pb::RunAssignment>,
    ) -> Result<Response<pb::Ack>, Status> {
        let assignment = request.into_inner();

        if assignment.run_id != self.expected_run_id.as_str() {
            warn!(
                run_id = %assignment.run_id,
                expected = %self.expected_run_id,
                "Rejected assignment for a different run"
            );
            return Err(Status::invalid_argument(format!(
                "this runner executes run {}",
                self.expected_run_id
            )));
        }

        let tx = self
            .assignment_tx
            .lock()
            .await
            .take()
            .ok_or_else(|| Status::failed_precondition("run already assigned"))?;

        info!(
            run_id = %assignment.run_id,
            platform = %assignment.platform,
            algorithm = %assignment.algorithm,
            "The runner received its benchmark run descriptor"
        );

        let descriptor: RunDescriptor = assignment.into();
        tx.send(descriptor)
            .map_err(|_| Status::unavailable("runner is shutting down"))?;

        Ok(Response::new(pb::Ack {}))
    }
}
