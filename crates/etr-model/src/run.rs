use std::fmt;

use serde::{Deserialize, Serialize};

use crate::ModelError;

/// Identifier of one submitted run (the task ARN).
///
/// Shape: `arn:aws:ecs:<region>:<account>:task/<cluster>/<run-id>`.
/// The cluster is the second-to-last `/` segment and the run id is the last one;
/// both are recovered from the identifier rather than stored.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct RunHandle(String);

impl RunHandle {
    pub fn parse(raw: impl Into<String>) -> Result<Self, ModelError> {
        let raw = raw.into();
        let segments: Vec<&str> = raw.split('/').collect();
        if segments.len() < 3 {
            return Err(ModelError::InvalidRunHandle(raw));
        }
        let cluster = segments[segments.len() - 2];
        let run_id = segments[segments.len() - 1];
        if cluster.is_empty() || run_id.is_empty() {
            return Err(ModelError::InvalidRunHandle(raw));
        }
        Ok(Self(raw))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Cluster the run belongs to.
    pub fn cluster(&self) -> &str {
        self.segment_from_end(1)
    }

    /// Run-local id, also the last component of the log stream name.
    pub fn run_id(&self) -> &str {
        self.segment_from_end(0)
    }

    fn segment_from_end(&self, n: usize) -> &str {
        // parse() guarantees at least three segments.
        self.0.rsplit('/').nth(n).unwrap_or_default()
    }
}

impl fmt::Display for RunHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl TryFrom<String> for RunHandle {
    type Error = ModelError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        RunHandle::parse(value)
    }
}

impl From<RunHandle> for String {
    fn from(value: RunHandle) -> Self {
        value.0
    }
}
