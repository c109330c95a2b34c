//! Built-in reference workload.
//!
//! Computes vertex out-degrees over a synthetic edge list, entirely
//! in-process. It exists so the runner binary and the end-to-end tests have a
//! real platform to drive; production setups plug in platform crates instead.

use std::collections::HashMap;
use std::sync::Mutex;
use std::time::{Duration, Instant};

use async_trait::async_trait;

use graphbench_core::{RunDescriptor, RunMetrics, RunResult, Workload, WorkloadError};

/// Platform name this workload registers under.
pub const PLATFORM: &str = "reference";

const DEFAULT_VERTEX_COUNT: u64 = 64;

#[derive(Default)]
struct State {
    edges: Vec<(u64, u64)>,
    degrees: HashMap<u64, u64>,
    started_at: Option<Instant>,
    processing_time: Option<Duration>,
}

/// Reference workload over a synthetic graph.
#[derive(Default)]
pub struct ReferenceWorkload {
    state: Mutex<State>,
}

impl ReferenceWorkload {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl Workload for ReferenceWorkload {
    fn platform(&self) -> &str {
        PLATFORM
    }

    async fn startup(&self, run: &RunDescriptor) -> Result<(), WorkloadError> {
        if run.dataset.is_empty() {
            return Err(WorkloadError::Dataset("no dataset named".to_string()));
        }

        let vertices = match run.parameters.get("vertices") {
            Some(raw) => raw.parse::<u64>().map_err(|_| {
                WorkloadError::Invalid(format!("vertices parameter not a number: {raw}"))
            })?,
            None => DEFAULT_VERTEX_COUNT,
        };

        // Deterministic synthetic graph: a ring plus one chord per vertex.
        let mut edges = Vec::with_capacity((vertices * 2) as usize);
        for v in 0..vertices {
            edges.push((v, (v + 1) % vertices));
            edges.push((v, (v * 7 + 3) % vertices));
        }

        let mut state = self.state.lock().unwrap();
        *state = State {
            edges,
            started_at: Some(Instant::now()),
            ..State::default()
        };
        Ok(())
    }

    async fn run(&self, _run: &RunDescriptor) -> Result<bool, WorkloadError> {
        let mut state = self.state.lock().unwrap();
        let processing_start = Instant::now();

        let mut degrees: HashMap<u64, u64> = HashMap::new();
        for (source, _) in &state.edges {
            *degrees.entry(*source).or_insert(0) += 1;
        }

        state.processing_time = Some(processing_start.elapsed());
        let produced = !degrees.is_empty();
        state.degrees = degrees;
        Ok(produced)
    }

    async fn collect(&self, _run: &RunDescriptor) -> Result<bool, WorkloadError> {
        let state = self.state.lock().unwrap();
        Ok(!state.degrees.is_empty())
    }

    async fn validate(&self, _run: &RunDescriptor) -> Result<bool, WorkloadError> {
        let state = self.state.lock().unwrap();
        let counted: u64 = state.degrees.values().sum();
        Ok(counted == state.edges.len() as u64)
    }

    async fn finalize(&self, _run: &RunDescriptor) -> Result<RunMetrics, WorkloadError> {
        let state = self.state.lock().unwrap();
        let started_at = state
            .started_at
            .ok_or_else(|| WorkloadError::Invalid("finalize before startup".to_string()))?;

        let makespan_ms = started_at.elapsed().as_millis() as u64;
        let processing_time_ms = state
            .processing_time
            .map(|d| d.as_millis() as u64)
            .unwrap_or_default();

        Ok(RunMetrics::new(makespan_ms, processing_time_ms)
            .with_extra("edges", state.edges.len().to_string())
            .with_extra("vertices", state.degrees.len().to_string()))
    }

    async fn summarize(
        &self,
        run: &RunDescriptor,
        metrics: RunMetrics,
    ) -> Result<RunResult, WorkloadError> {
        Ok(RunResult::new(run.id.clone(), metrics))
    }
}
