//! Reporting channel from the runner back to the executor.
//!
//! Sends are fire-and-forget from the driver's perspective: notifications are
//! queued to a background forwarder task that resolves the executor address
//! per message and issues the rpc. Ordering is FIFO within the run's stream.
//! `flush` bounds how long a caller waits for the queue to drain before the
//! process goes away.

use std::time::Duration;

use async_trait::async_trait;
use tokio::sync::{mpsc, oneshot};
use tracing::warn;

use graphbench_core::{Failure, RunId, RunResult};
use graphbench_proto::pb::{self, notification::Payload};
use graphbench_proto::ExecutorServiceClient;

/// Build the REGISTRATION notification carrying the runner's process id.
pub fn registration(run_id: &RunId, process_id: u32) -> pb::Notification {
    pb::Notification {
        run_id: run_id.as_str().to_string(),
        label: pb::NotificationLabel::Registration as i32,
        payload: Some(Payload::ProcessId(process_id)),
        timestamp_ms: chrono::Utc::now().timestamp_millis(),
    }
}

/// Build an EXECUTION or VALIDATION confirmation with a free-text message.
pub fn confirmation(
    run_id: &RunId,
    label: pb::NotificationLabel,
    message: impl Into<String>,
) -> pb::Notification {
    pb::Notification {
        run_id: run_id.as_str().to_string(),
        label: label as i32,
        payload: Some(Payload::Message(message.into())),
        timestamp_ms: chrono::Utc::now().timestamp_millis(),
    }
}

/// Build a FAILURE notification carrying a failure record.
pub fn failure(run_id: &RunId, failure: Failure) -> pb::Notification {
    pb::Notification {
        run_id: run_id.as_str().to_string(),
        label: pb::NotificationLabel::Failure as i32,
        payload: Some(Payload::Failure(failure.into())),
        timestamp_ms: chrono::Utc::now().timestamp_millis(),
    }
}

/// The driver's view of the executor link.
#[async_trait]
pub trait Reporter: Send + Sync {
    /// Queue one notification for delivery.
    async fn send(&self, notification: pb::Notification);

    /// Queue the terminal result for delivery.
    async fn report_result(&self, result: RunResult);

    /// Wait until every message queued before this call has been delivered
    /// or dropped, up to `bound`. Returns false if the bound elapsed first.
    async fn flush(&self, bound: Duration) -> bool;
}

enum Outbound {
    Notification(pb::Notification),
    Result(pb::RunResultReport),
    Flush(oneshot::Sender<()>),
}

/// Reporter that delivers over gRPC, resolving the executor address once per
/// message send. No connection is held between sends.
pub struct GrpcReporter {
    tx: mpsc::Sender<Outbound>,
}

impl GrpcReporter {
    /// Create a reporter targeting the given executor endpoint and start its
    /// forwarder task.
    pub fn new(endpoint: impl Into<String>) -> Self {
        let endpoint = endpoint.into();
        let (tx, rx) = mpsc::channel::<Outbound>(32);
        tokio::spawn(forward_loop(endpoint, rx));
        Self { tx }
    }
}

#[async_trait]
impl Reporter for GrpcReporter {
    async fn send(&self, notification: pb::Notification) {
        if self.tx.send(Outbound::Notification(notification)).await.is_err() {
            warn!("Reporter forwarder is gone - notification dropped");
        }
    }

    async fn report_result(&self, result: RunResult) {
        if self.tx.send(Outbound::Result(result.into())).await.is_err() {
            warn!("Reporter forwarder is gone - result dropped");
        }
    }

    async fn flush(&self, bound: Duration) -> bool {
        let (ack_tx, ack_rx) = oneshot::channel();
        if self.tx.send(Outbound::Flush(ack_tx)).await.is_err() {
            return false;
        }
        matches!(tokio::time::timeout(bound, ack_rx).await, Ok(Ok(())))
    }
}

async fn forward_loop(endpoint: String, mut rx: mpsc::Receiver<Outbound>) {
    while let Some(outbound) = rx.recv().await {
        match outbound {
            Outbound::Notification(notification) => {
                deliver_notification(&endpoint, notification).await;
            }
            Outbound::Result(report) => {
                deliver_result(&endpoint, report).await;
            }
            Outbound::Flush(ack) => {
                // Everything queued before the marker has been attempted.
                let _ = ack.send(());
            }
        }
    }
}

async fn deliver_notification(endpoint: &str, notification: pb::Notification) {
    let run_id = notification.run_id.clone();
    match ExecutorServiceClient::connect(endpoint.to_string()).await {
        Ok(mut client) => {
            if let Err(e) = client.notify(notification).await {
                warn!(run_id = %run_id, error = %e, "Failed to deliver notification");
            }
        }
        Err(e) => {
            warn!(run_id = %run_id, addr = %endpoint, error = %e, "Executor unreachable");
        }
    }
}

async fn deliver_result(endpoint: &str, report: pb::RunResultReport) {
    let run_id = report.run_id.clone();
    match ExecutorServiceClient::connect(endpoint.to_string()).await {
        Ok(mut client) => {
            if let Err(e) = client.report_result(report).await {
                warn!(run_id = %run_id, error = %e, "Failed to deliver result");
            }
        }
        Err(e) => {
            warn!(run_id = %run_id, addr = %endpoint, error = %e, "Executor unreachable");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use graphbench_core::FailureKind;

    #[test]
    fn test_notification_constructors() {
        let run_id = RunId::new("r1");

        let n = registration(&run_id, 1234);
        assert_eq!(n.label, pb::NotificationLabel::Registration as i32);
        assert_eq!(n.payload, Some(Payload::ProcessId(1234)));

        let n = confirmation(&run_id, pb::NotificationLabel::Execution, "Executed benchmark.");
        assert_eq!(n.label, pb::NotificationLabel::Execution as i32);

        let n = failure(&run_id, Failure::new(FailureKind::Exec));
        match n.payload {
            Some(Payload::Failure(f)) => {
                assert_eq!(f.kind, pb::FailureKind::Exec as i32);
            }
            other => panic!("Unexpected payload: {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_flush_drains_even_when_executor_unreachable() {
        // Nothing listens on the endpoint; delivery fails but the queue must
        // still drain within the bound.
        let reporter = GrpcReporter::new("http://127.0.0.1:9");
        reporter
            .send(registration(&RunId::new("r1"), 1))
            .await;
        assert!(reporter.flush(Duration::from_secs(10)).await);
    }
}
