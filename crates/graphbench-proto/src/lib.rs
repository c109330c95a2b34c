//! Generated gRPC code and converters for graphbench.
//!
//! This crate contains:
//! - Generated protobuf message types
//! - Generated gRPC service stubs (client and server)
//! - Converters between proto types and domain types

pub mod convert;

/// Generated protobuf types and services.
pub mod pb {
    // Include the generated code
    // The path matches the proto package: graphbench.v1
    tonic::include_proto!("graphbench.v1");
}

// Re-export commonly used types
pub use pb::executor_service_client::ExecutorServiceClient;
pub use pb::executor_service_server::{ExecutorService, ExecutorServiceServer};
pub use pb::runner_service_client::RunnerServiceClient;
pub use pb::runner_service_server::{RunnerService, RunnerServiceServer};
