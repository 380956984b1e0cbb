use std::fmt;

use serde::{Deserialize, Serialize};
use time::{OffsetDateTime, format_description::well_known::Rfc3339};

use crate::ModelError;

/// Where a run's console output is stored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LogLocation {
    pub group: String,
    /// `prefix/container-name/run-id`.
    pub stream: String,
}

impl LogLocation {
    pub fn new(group: impl Into<String>, prefix: &str, container: &str, run_id: &str) -> Self {
        Self {
            group: group.into(),
            stream: format!("{prefix}/{container}/{run_id}"),
        }
    }
}

impl fmt::Display for LogLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.group, self.stream)
    }
}

/// One event of a run's console output.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LogLine {
    /// Event time in epoch milliseconds.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<i64>,
    /// Ingestion time in epoch milliseconds.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ingestion_time: Option<i64>,
    pub message: String,
}

impl LogLine {
    /// Event time rendered as RFC 3339 (UTC).
    pub fn iso_timestamp(&self) -> Option<Result<String, ModelError>> {
        self.timestamp.map(render_millis)
    }

    /// Build-log rendering: `-> <timestamp> <message>`.
    ///
    /// Lines without an event time are not displayed.
    pub fn render(&self) -> Option<String> {
        let ts = match self.iso_timestamp()? {
            Ok(ts) => ts,
            Err(_) => return None,
        };
        Some(format!("-> {ts} {}", self.message.trim_end()))
    }
}

/// Whole seconds; sub-second precision is dropped.
fn render_millis(ms: i64) -> Result<String, ModelError> {
    OffsetDateTime::from_unix_timestamp(ms.div_euclid(1000))
        .ok()
        .and_then(|dt| dt.format(&Rfc3339).ok())
        .ok_or(ModelError::TimestampOutOfRange(ms))
}
