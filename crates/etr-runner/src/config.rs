use clap::Parser;
use etr_core::{DEFAULT_ANNOTATION_CONTEXT, DEFAULT_CONTAINER_NAME, Invocation};
use etr_observe::{LoggerConfig, LoggerFormat};

/// Run a one-off ECS task from a stored template and report back to Buildkite.
#[derive(Parser, Debug, Clone)]
#[command(name = "ecs-task-runner", version)]
pub struct Cli {
    /// Parameter Store key holding the task template JSON.
    #[arg(long, env = "BUILDKITE_PLUGIN_ECS_TASK_RUNNER_PARAMETER_NAME")]
    pub parameter_name: String,

    /// Whitespace-separated command replacing the template command.
    #[arg(long, env = "BUILDKITE_PLUGIN_ECS_TASK_RUNNER_COMMAND")]
    pub command: Option<String>,

    /// Seconds to wait for the task to stop.
    #[arg(long, env = "BUILDKITE_PLUGIN_ECS_TASK_RUNNER_TIME_OUT", default_value_t = etr_core::DEFAULT_TIMEOUT_SECS)]
    pub time_out: u64,

    #[arg(long, env = "BUILDKITE_PLUGIN_ECS_TASK_RUNNER_CONTAINER_NAME", default_value = DEFAULT_CONTAINER_NAME)]
    pub container_name: String,

    #[arg(long, env = "BUILDKITE_PLUGIN_ECS_TASK_RUNNER_ANNOTATION_CONTEXT", default_value = DEFAULT_ANNOTATION_CONTEXT)]
    pub annotation_context: String,

    /// `EnvFilter` directive for diagnostics.
    #[arg(long, env = "ECS_TASK_RUNNER_LOG_LEVEL", default_value = "info")]
    pub log_level: String,

    #[arg(long, env = "ECS_TASK_RUNNER_LOG_FORMAT", default_value_t = LoggerFormat::Text)]
    pub log_format: LoggerFormat,
}

impl Cli {
    pub fn invocation(&self) -> Invocation {
        let mut invocation = Invocation::new(&self.parameter_name).with_timeout_secs(self.time_out);
        if let Some(command) = &self.command {
            invocation = invocation.with_command(command);
        }
        invocation.container_name = self.container_name.clone();
        invocation.annotation_context = self.annotation_context.clone();
        invocation
    }

    pub fn logger(&self) -> LoggerConfig {
        LoggerConfig {
            format: self.log_format,
            level: self.log_level.clone(),
            ..Default::default()
        }
    }
}
