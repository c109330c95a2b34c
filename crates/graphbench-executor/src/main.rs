//! Graphbench Executor
//!
//! Serves the notification endpoint and optionally launches a single run
//! from the command line, waiting until it reaches a terminal state.

use std::net::SocketAddr;
use std::time::Duration;

use clap::Parser;
use tokio::net::TcpListener;
use tokio_stream::wrappers::TcpListenerStream;
use tonic::transport::Server;
use tracing::{error, info, Level};
use tracing_subscriber::FmtSubscriber;

use graphbench_core::{RunDescriptor, RunId};
use graphbench_executor::{AppState, ExecutorConfig, ExecutorServiceImpl, Launcher};

#[derive(Parser)]
#[command(name = "graphbench-executor", about = "Spawns and tracks benchmark runs")]
struct Args {
    /// Name of the properties file to load.
    #[arg(long, default_value = "graphbench")]
    config: String,

    /// Platform to launch a single run on; without it the executor only
    /// serves.
    #[arg(long)]
    platform: Option<String>,

    /// Algorithm for the launched run.
    #[arg(long, default_value = "degree")]
    algorithm: String,

    /// Dataset for the launched run.
    #[arg(long, default_value = "synthetic-ring")]
    dataset: String,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize tracing
    let subscriber = FmtSubscriber::builder()
        .with_max_level(Level::INFO)
        .with_target(true)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    let args = Args::parse();
    let config = ExecutorConfig::load(&args.config)?;
    let state = AppState::new();

    let addr: SocketAddr = config.bind_addr().parse()?;
    let listener = TcpListener::bind(addr).await?;
    info!(addr = %addr, "Starting graphbench executor");

    let service = ExecutorServiceImpl::new(state.clone()).into_server();
    let server = tokio::spawn(async move {
        if let Err(e) = Server::builder()
            .add_service(service)
            .serve_with_incoming(TcpListenerStream::new(listener))
            .await
        {
            error!(error = %e, "Executor service failed");
        }
    });

    let Some(platform) = args.platform else {
        server.await?;
        return Ok(());
    };

    let launcher = Launcher::new(state.clone(), config);
    let run_id = RunId::generate();
    let descriptor = RunDescriptor::new(
        run_id.clone(),
        platform,
        args.algorithm.clone(),
        args.dataset.clone(),
    );

    info!(
        run_id = %run_id,
        algorithm = %args.algorithm,
        dataset = %args.dataset,
        "Launching benchmark run"
    );
    launcher.launch(descriptor).await?;

    // Wait until the run reaches a terminal state.
    loop {
        tokio::time::sleep(Duration::from_millis(250)).await;

        let runs = state.runs.read().await;
        let Some(record) = runs.get(&run_id) else {
            break;
        };
        if !record.state().is_terminal() {
            continue;
        }

        info!(
            run_id = %run_id,
            state = %record.state(),
            failures = record.failures().len(),
            "Run finished"
        );
        for failure in record.failures() {
            info!(run_id = %run_id, failure = %failure, "Recorded failure");
        }
        if let Some(result) = record.result() {
            info!(
                run_id = %run_id,
                makespan_ms = result.metrics.makespan_ms,
                processing_time_ms = result.metrics.processing_time_ms,
                "Benchmark result"
            );
        }
        break;
    }

    state.retire_run(&run_id).await;
    Ok(())
}
