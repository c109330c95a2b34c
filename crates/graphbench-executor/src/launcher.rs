//! Runner process launcher.

use std::collections::HashMap;
use std::sync::Arc;

use thiserror::Error;
use tokio::process::Command;
use tokio::sync::{oneshot, Mutex};
use tracing::info;

use graphbench_core::{CoreError, RunDescriptor, RunId, RunRecord};

use crate::config::ExecutorConfig;
use crate::monitor;
use crate::state::AppState;

/// Launcher errors.
#[derive(Debug, Error)]
pub enum LaunchError {
    #[error("Run already exists: {0}")]
    DuplicateRun(String),

    #[error("Failed to spawn runner process: {0}")]
    Spawn(#[from] std::io::Error),

    #[error(transparent)]
    Core(#[from] CoreError),
}

/// Spawns one runner process per run and watches it until exit.
pub struct Launcher {
    state: Arc<AppState>,
    config: ExecutorConfig,
    kill_switches: Mutex<HashMap<RunId, oneshot::Sender<()>>>,
}

impl Launcher {
    /// Create a new Launcher.
    pub fn new(state: Arc<AppState>, config: ExecutorConfig) -> Self {
        Self {
            state,
            config,
            kill_switches: Mutex::new(HashMap::new()),
        }
    }

    /// Prepare a record for `descriptor` and spawn its runner process.
    pub async fn launch(&self, descriptor: RunDescriptor) -> Result<(), LaunchError> {
        let run_id = descriptor.id.clone();

        {
            let mut runs = self.state.runs.write().await;
            if runs.contains_key(&run_id) {
                return Err(LaunchError::DuplicateRun(run_id.to_string()));
            }
            let mut record = RunRecord::new(descriptor);
            record.mark_prepared()?;
            record.set_runner_endpoint(self.config.runner_endpoint());
            runs.insert(run_id.clone(), record);
        }

        let child = match Command::new(&self.config.runner_binary)
            .arg("--run-id")
            .arg(run_id.as_str())
            .spawn()
        {
            Ok(child) => child,
            Err(e) => {
                let mut runs = self.state.runs.write().await;
                if let Some(record) = runs.get_mut(&run_id) {
                    let _ = record.mark_terminated();
                }
                return Err(LaunchError::Spawn(e));
            }
        };

        info!(run_id = %run_id, pid = child.id(), "Spawned runner process");

        let (kill_tx, kill_rx) = oneshot::channel();
        self.kill_switches.lock().await.insert(run_id.clone(), kill_tx);
        tokio::spawn(monitor::watch(self.state.clone(), run_id, child, kill_rx));

        Ok(())
    }

    /// Force-terminate a run the executor judges unresponsive. Returns false
    /// if the run is unknown or its process already exited.
    pub async fn terminate(&self, run_id: &RunId) -> bool {
        match self.kill_switches.lock().await.remove(run_id) {
            Some(kill_tx) => kill_tx.send(()).is_ok(),
            None => false,
        }
    }
}
