use serde::{Deserialize, Serialize};

/// Stored specification used to submit a run.
///
/// Loaded once per invocation from the parameter store as camelCase JSON.
/// `subnet_ids` and `security_group_ids` keep the stored order; duplicates are not removed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskTemplate {
    /// Cluster the run is submitted to.
    pub cluster: String,
    /// Command for the application container.
    ///
    /// `None` (or empty) keeps the command baked into the task definition.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub command: Option<Vec<String>>,
    /// Security groups attached to the run's network interface.
    #[serde(default)]
    pub security_group_ids: Vec<String>,
    /// Subnets the run may be placed in.
    #[serde(default)]
    pub subnet_ids: Vec<String>,
    /// Task definition the run is created from.
    pub task_definition_arn: String,
}

impl TaskTemplate {
    /// Replace the command with a whitespace-split override.
    ///
    /// A missing, empty or whitespace-only override leaves the stored command untouched,
    /// so the run is never created with a single empty-string argument.
    /// Returns `true` when the command was replaced.
    pub fn apply_command_override(&mut self, command: Option<&str>) -> bool {
        let Some(command) = command else {
            return false;
        };
        let parts: Vec<String> = command.split_whitespace().map(str::to_string).collect();
        if parts.is_empty() {
            return false;
        }
        self.command = Some(parts);
        true
    }

    /// Command to send with the run, if any.
    pub fn effective_command(&self) -> Option<&[String]> {
        self.command.as_deref().filter(|c| !c.is_empty())
    }
}
