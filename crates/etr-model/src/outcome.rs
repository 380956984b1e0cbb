use std::fmt;

use serde::{Deserialize, Serialize};

use crate::TimeoutSecs;

/// Classified verdict for one invocation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "outcome", rename_all = "camelCase", rename_all_fields = "camelCase")]
pub enum Outcome {
    /// The application container exited with code zero.
    Success,
    /// The application container exited non-zero, or never reported an exit code.
    TaskFailure { exit_code: Option<i32> },
    /// Waiting exceeded its deadline; the run may still be executing.
    WaitTimeout,
    /// The platform failed to schedule, track or describe the run.
    InfrastructureFailure { detail: String },
}

impl Outcome {
    pub fn is_success(&self) -> bool {
        matches!(self, Outcome::Success)
    }

    /// Process exit status for this outcome.
    pub fn exit_status(&self) -> i32 {
        if self.is_success() { 0 } else { 1 }
    }

    /// Short symbolic identifier, used in logs.
    pub fn kind(&self) -> &'static str {
        match self {
            Outcome::Success => "success",
            Outcome::TaskFailure { .. } => "task-failure",
            Outcome::WaitTimeout => "wait-timeout",
            Outcome::InfrastructureFailure { .. } => "infrastructure-failure",
        }
    }

    /// Operator-facing text posted for this outcome.
    pub fn annotation(&self, timeout: TimeoutSecs) -> String {
        match self {
            Outcome::Success => "Task completed successfully".to_string(),
            Outcome::TaskFailure {
                exit_code: Some(code),
            } => format!("Task stopped with a non-zero exit code: {code}"),
            Outcome::TaskFailure { exit_code: None } => {
                "Task stopped without reporting an exit code".to_string()
            }
            Outcome::WaitTimeout => format!(
                "Task did not complete successfully within timeout ({timeout} seconds)"
            ),
            Outcome::InfrastructureFailure { detail } => {
                format!("Task did not complete successfully: {detail}")
            }
        }
    }
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Outcome::TaskFailure {
                exit_code: Some(code),
            } => write!(f, "{} (exit code {code})", self.kind()),
            Outcome::InfrastructureFailure { detail } => write!(f, "{}: {detail}", self.kind()),
            _ => f.write_str(self.kind()),
        }
    }
}
