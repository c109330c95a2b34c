//! Executor configuration.

use serde::Deserialize;

/// Well-known service name of the executor's receiving endpoint.
pub const SERVICE_NAME: &str = "executor-service";

/// Executor configuration, read from the `graphbench` properties file with
/// `GRAPHBENCH_*` environment overrides.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ExecutorConfig {
    /// Host the executor binds to.
    pub executor_host: String,

    /// Port the executor listens on.
    pub executor_port: u16,

    /// Host runner processes listen on.
    pub runner_host: String,

    /// Port runner processes listen on.
    pub runner_port: u16,

    /// Runner binary to spawn, one process per run.
    pub runner_binary: String,
}

impl Default for ExecutorConfig {
    fn default() -> Self {
        Self {
            executor_host: "127.0.0.1".to_string(),
            executor_port: 8099,
            runner_host: "127.0.0.1".to_string(),
            runner_port: 8011,
            runner_binary: "graphbench-runner".to_string(),
        }
    }
}

impl ExecutorConfig {
    /// Load configuration from the named properties file (extension resolved
    /// by the config loader), layered under environment overrides. A missing
    /// file falls back to defaults.
    pub fn load(name: &str) -> Result<Self, config::ConfigError> {
        config::Config::builder()
            .add_source(config::File::with_name(name).required(false))
            .add_source(config::Environment::with_prefix("GRAPHBENCH"))
            .build()?
            .try_deserialize()
    }

    /// Address the executor service binds to.
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.executor_host, self.executor_port)
    }

    /// Logical address runner processes are reached at.
    pub fn runner_endpoint(&self) -> String {
        format!("http://{}:{}", self.runner_host, self.runner_port)
    }
}
