//! Graphbench Runner Daemon
//!
//! Spawned by the executor with the id of the one run this process executes.

use clap::Parser;
use tokio::net::TcpListener;
use tokio_stream::wrappers::TcpListenerStream;
use tonic::transport::Server;
use tracing::{error, info, Level};
use tracing_subscriber::FmtSubscriber;

use graphbench_core::{Failure, FailureKind, RunId};
use graphbench_runner::driver::{drive, RunOutcome, ABORT_FLUSH_BOUND};
use graphbench_runner::reporter::{failure, registration, GrpcReporter, Reporter};
use graphbench_runner::service::RunnerServiceImpl;
use graphbench_runner::workloads;
use graphbench_runner::RunnerConfig;

#[derive(Parser)]
#[command(name = "graphbench-runner", about = "Executes one benchmark run")]
struct Args {
    /// Identifier of the run this process executes.
    #[arg(long)]
    run_id: String,

    /// Name of the properties file to load.
    #[arg(long, default_value = "graphbench")]
    config: String,
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
    let config = RunnerConfig::load(&args.config)?;
    let run_id = RunId::new(args.run_id);

    info!(
        run_id = %run_id,
        addr = %config.bind_addr(),
        "Benchmark runner service started"
    );

    // Assignment endpoint for the single descriptor push. Bound before
    // registering so the executor's answer cannot beat the listener.
    let (service, assignment_rx) = RunnerServiceImpl::new(run_id.clone());
    let listener = TcpListener::bind(config.bind_addr()).await?;
    tokio::spawn(async move {
        if let Err(e) = Server::builder()
            .add_service(service.into_server())
            .serve_with_incoming(TcpListenerStream::new(listener))
            .await
        {
            error!(error = %e, "Assignment endpoint failed");
        }
    });

    let reporter = GrpcReporter::new(config.executor_endpoint());

    // Register first: the executor binds the process id to the run and
    // answers with the descriptor.
    reporter
        .send(registration(&run_id, std::process::id()))
        .await;
    info!(
        run_id = %run_id,
        executor = %config.executor_endpoint(),
        "Registered with executor"
    );

    let descriptor = assignment_rx.await?;

    let Some(workload) = workloads::resolve(&descriptor.platform) else {
        error!(
            run_id = %run_id,
            platform = %descriptor.platform,
            "Unknown workload platform"
        );
        reporter
            .send(failure(
                &run_id,
                Failure::with_detail(
                    FailureKind::Init,
                    format!("unknown platform: {}", descriptor.platform),
                ),
            ))
            .await;
        reporter.flush(ABORT_FLUSH_BOUND).await;
        std::process::exit(1);
    };

    match drive(workload.as_ref(), &descriptor, &reporter).await {
        RunOutcome::Completed => {
            info!(run_id = %run_id, "Benchmark run completed");
            Ok(())
        }
        RunOutcome::Terminated => {
            error!(run_id = %run_id, "Benchmark run terminated");
            std::process::exit(1);
        }
    }
}
