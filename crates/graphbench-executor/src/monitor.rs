//! Runner process monitoring.

use std::sync::Arc;

use tokio::process::Child;
use tokio::sync::oneshot;
use tracing::{info, warn};

use graphbench_core::{RunId, RunState};

use crate::state::AppState;

/// Watch a spawned runner until its process exits; a run that is gone without
/// a delivered result is classified as terminated. This process observation
/// is the only path that infers termination rather than reading it from a
/// message. `kill_rx` carries the forced-termination signal for runs the
/// executor judges unresponsive.
pub async fn watch(
    state: Arc<AppState>,
    run_id: RunId,
    mut child: Child,
    mut kill_rx: oneshot::Receiver<()>,
) {
    let status = tokio::select! {
        status = child.wait() => status,
        _ = &mut kill_rx => {
            warn!(run_id = %run_id, "Forcibly terminating runner process");
            if let Err(e) = child.start_kill() {
                warn!(run_id = %run_id, error = %e, "Failed to kill runner process");
            }
            child.wait().await
        }
    };

    match status {
        Ok(status) => {
            info!(run_id = %run_id, code = status.code(), "Runner process exited");
        }
        Err(e) => {
            warn!(run_id = %run_id, error = %e, "Failed waiting on runner process");
        }
    }

    let mut runs = state.runs.write().await;
    if let Some(record) = runs.get_mut(&run_id) {
        if record.state() != RunState::Completed && record.mark_terminated().is_ok() {
            warn!(
                run_id = %run_id,
                failures = record.failures().len(),
                "Run terminated without a result"
            );
        }
    }
}
