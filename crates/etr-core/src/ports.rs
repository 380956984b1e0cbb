//! Capability traits for the external platform.
//!
//! Each trait has one production adapter and a test double; the core never talks to
//! the network directly.

use async_trait::async_trait;
use etr_model::{LogLine, LogLocation, SchedulingFailure, TaskDefinition, TerminalSnapshot};

use crate::error::ServiceError;

/// Key-value store holding task templates as JSON.
#[async_trait]
pub trait TemplateStore: Send + Sync + 'static {
    /// Raw stored value, `None` when the key does not exist.
    async fn get(&self, key: &str) -> Result<Option<String>, ServiceError>;
}

/// Everything needed to create one run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunRequest {
    pub cluster: String,
    pub task_definition: String,
    pub subnets: Vec<String>,
    pub security_groups: Vec<String>,
    pub container_override: ContainerOverride,
}

/// Override for the application container.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContainerOverride {
    pub name: String,
    /// Replaces the container command entirely; `None` sends no command field.
    pub command: Option<Vec<String>>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunTaskResult {
    pub runs: Vec<SubmittedRun>,
    pub failures: Vec<SchedulingFailure>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SubmittedRun {
    pub arn: Option<String>,
}

/// Container orchestration service.
#[async_trait]
pub trait RunService: Send + Sync + 'static {
    /// Create runs. Creates real compute; callers must not retry blindly.
    async fn run_task(&self, request: &RunRequest) -> Result<RunTaskResult, ServiceError>;

    /// Current state of the given runs.
    async fn describe_tasks(
        &self,
        cluster: &str,
        run_ids: &[String],
    ) -> Result<TerminalSnapshot, ServiceError>;

    /// Static definition a run was created from.
    async fn describe_task_definition(&self, arn: &str) -> Result<TaskDefinition, ServiceError>;
}

/// Store of run console output.
#[async_trait]
pub trait LogService: Send + Sync + 'static {
    /// Events of one stream, oldest first when `from_head` is set.
    async fn get_events(
        &self,
        location: &LogLocation,
        from_head: bool,
    ) -> Result<Vec<LogLine>, ServiceError>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AnnotationStyle {
    Success,
    Info,
    Warning,
    Error,
}

impl AnnotationStyle {
    pub fn as_str(&self) -> &'static str {
        match self {
            AnnotationStyle::Success => "success",
            AnnotationStyle::Info => "info",
            AnnotationStyle::Warning => "warning",
            AnnotationStyle::Error => "error",
        }
    }
}

/// Operator-visible status message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Annotation {
    pub message: String,
    pub style: AnnotationStyle,
    /// Annotations sharing a context replace each other.
    pub context: String,
}

/// Channel that shows annotations to the operator.
#[async_trait]
pub trait AnnotationSink: Send + Sync + 'static {
    async fn annotate(&self, annotation: &Annotation) -> Result<(), ServiceError>;
}
