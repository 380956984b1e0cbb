use serde::{Deserialize, Serialize};

/// Index of the only run, and of the only container, that this system inspects.
///
/// One submission creates exactly one run, and the application container is the first
/// container of that run. Sidecars are not supported; supporting them means replacing
/// the lookups that use this constant.
pub const SINGLE_CONTAINER_ASSUMPTION: usize = 0;

/// `lastStatus` reported for a run that reached its terminal state.
pub const STOPPED_STATUS: &str = "STOPPED";

/// State of a run once it has stopped, or the best-known state when waiting ended early.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TerminalSnapshot {
    /// Per-run descriptors; one element for this system's usage.
    #[serde(default)]
    pub tasks: Vec<RunDescriptor>,
    /// Scheduling or infrastructure failures, populated independently of `tasks`.
    #[serde(default)]
    pub failures: Vec<SchedulingFailure>,
}

impl TerminalSnapshot {
    /// The run this invocation submitted.
    pub fn primary_task(&self) -> Option<&RunDescriptor> {
        self.tasks.get(SINGLE_CONTAINER_ASSUMPTION)
    }

    pub fn first_failure(&self) -> Option<&SchedulingFailure> {
        self.failures.first()
    }

    /// Returns `true` when polling can stop.
    ///
    /// Either every described run is stopped, or nothing was described but the service
    /// reported failures for the request (for example a run that is no longer known).
    pub fn is_terminal(&self) -> bool {
        if self.tasks.is_empty() {
            return !self.failures.is_empty();
        }
        self.tasks.iter().all(RunDescriptor::is_stopped)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RunDescriptor {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub arn: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_status: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub task_definition_arn: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stopped_reason: Option<String>,
    #[serde(default)]
    pub containers: Vec<ContainerResult>,
}

impl RunDescriptor {
    pub fn is_stopped(&self) -> bool {
        self.last_status.as_deref() == Some(STOPPED_STATUS)
    }

    /// The application container.
    pub fn primary_container(&self) -> Option<&ContainerResult> {
        self.containers.get(SINGLE_CONTAINER_ASSUMPTION)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContainerResult {
    pub name: String,
    /// Absent while the container has not exited.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub exit_code: Option<i32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SchedulingFailure {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub arn: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub detail: Option<String>,
}

impl SchedulingFailure {
    /// Human-readable description: the detail when present, otherwise the reason.
    pub fn describe(&self) -> String {
        let arn = self.arn.as_deref().unwrap_or("unknown");
        match (self.reason.as_deref(), self.detail.as_deref()) {
            (Some(reason), Some(detail)) => format!("{reason}: {detail} (arn: {arn})"),
            (None, Some(detail)) => format!("{detail} (arn: {arn})"),
            (Some(reason), None) => format!("{reason} (arn: {arn})"),
            (None, None) => format!("unspecified failure (arn: {arn})"),
        }
    }
}
