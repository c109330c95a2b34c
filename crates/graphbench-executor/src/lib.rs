//! Graphbench Executor Library
//!
//! The executor owns the run records: it prepares and spawns one runner
//! process per benchmark run, receives the runner's notifications and result
//! over gRPC, and independently watches the process so a run that dies
//! without a terminal message is still classified as terminated.

pub mod config;
pub mod launcher;
pub mod monitor;
pub mod service;
pub mod state;

pub use config::ExecutorConfig;
pub use launcher::{LaunchError, Launcher};
pub use service::ExecutorServiceImpl;
pub use state::AppState;
