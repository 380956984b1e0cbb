use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::SINGLE_CONTAINER_ASSUMPTION;

/// `awslogs` driver option naming the log group.
pub const LOG_GROUP_OPTION: &str = "awslogs-group";

/// `awslogs` driver option naming the stream prefix.
pub const STREAM_PREFIX_OPTION: &str = "awslogs-stream-prefix";

/// Static definition a run was created from, as far as log discovery needs it.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskDefinition {
    pub arn: String,
    #[serde(default)]
    pub containers: Vec<ContainerDefinition>,
}

impl TaskDefinition {
    /// The application container definition.
    pub fn primary_container(&self) -> Option<&ContainerDefinition> {
        self.containers.get(SINGLE_CONTAINER_ASSUMPTION)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContainerDefinition {
    pub name: String,
    /// Log driver options; empty when logging is not configured.
    #[serde(default)]
    pub log_options: HashMap<String, String>,
}

impl ContainerDefinition {
    /// Value of a log option, treating blank values as absent.
    pub fn log_option(&self, key: &str) -> Option<&str> {
        self.log_options
            .get(key)
            .map(String::as_str)
            .filter(|v| !v.trim().is_empty())
    }
}
