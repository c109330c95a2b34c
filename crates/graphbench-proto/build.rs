use std::env;
use std::path::PathBuf;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Get the project root (workspace root)
    let manifest_dir = PathBuf::from(env::var("CARGO_MANIFEST_DIR")?);
    let workspace_root = manifest_dir.parent().unwrap().parent().unwrap();
    let proto_dir = workspace_root.join("proto");

    // Proto files to compile
    let proto_files = [
        proto_dir.join("graphbench/v1/common.proto"),
        proto_dir.join("graphbench/v1/executor_service.proto"),
        proto_dir.join("graphbench/v1/runner_service.proto"),
    ];

    // Tell Cargo to rerun if proto files change
    for proto in &proto_files {
        println!("cargo:rerun-if-changed={}", proto.display());
    }

    // Fall back to a vendored protoc binary when the environment doesn't
    // provide one, so the build doesn't require a system-wide install.
    if env::var_os("PROTOC").is_none() {
        if let Ok(protoc) = protoc_bin_vendored::protoc_bin_path() {
            env::set_var("PROTOC", protoc);
        }
    }

    // Configure and run tonic-build
    tonic_build::configure()
        .build_server(true)
        .build_client(true)
        .compile_protos(&proto_files, &[proto_dir])?;

    Ok(())
}
