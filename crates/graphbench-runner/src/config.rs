//! Runner configuration.

use serde::Deserialize;

/// Well-known service name of the runner's assignment endpoint.
pub const SERVICE_NAME: &str = "runner-service";

/// Runner configuration, read from the `graphbench` properties file with
/// `GRAPHBENCH_*` environment overrides.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct RunnerConfig {
    /// Host the assignment endpoint binds to.
    pub runner_host: String,

    /// Port the assignment endpoint listens on.
    pub runner_port: u16,

    /// Executor host.
    pub executor_host: String,

    /// Executor port.
    pub executor_port: u16,
}

impl Default for RunnerConfig {
    fn default() -> Self {
        Self {
            runner_host: "127.0.0.1".to_string(),
            runner_port: 8011,
            executor_host: "127.0.0.1".to_string(),
            executor_port: 8099,
        }
    }
}

impl RunnerConfig {
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

    /// Logical address of the executor service.
    pub fn executor_endpoint(&self) -> String {
        format!("http://{}:{}", self.executor_host, self.executor_port)
    }

    /// Address the assignment endpoint binds to.
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.runner_host, self.runner_port)
    }
}
