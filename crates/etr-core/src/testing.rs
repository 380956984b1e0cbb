//! Test doubles for the capability traits.

use std::{
    collections::{HashMap, VecDeque},
    sync::Mutex,
};

use async_trait::async_trait;
use etr_model::{
    ContainerDefinition, ContainerResult, LOG_GROUP_OPTION, LogLine, LogLocation, RunDescriptor,
    RunHandle, STREAM_PREFIX_OPTION, TaskDefinition, TaskTemplate, TerminalSnapshot,
};

use crate::{
    error::ServiceError,
    ports::{
        Annotation, AnnotationSink, LogService, RunRequest, RunService, RunTaskResult,
        TemplateStore,
    },
};

pub const RUN_ARN: &str =
    "arn:aws:ecs:us-west-2:123456789012:task/test-cluster/07cc583696bd44e0be450bff7314ddaf";

pub const TEMPLATE_JSON: &str = r#"{
    "cluster": "test-cluster",
    "command": ["echo", "hello"],
    "securityGroupIds": ["sg-123456"],
    "subnetIds": ["subnet-123456"],
    "taskDefinitionArn": "arn:aws:ecs:us-west-2:123456789012:task-definition/test-task-1"
}"#;

const RUN_DEFINITION_ARN: &str = "arn:aws:ecs:us-west-2:123456789012:task-definition/test-task-1:3";

pub fn template() -> TaskTemplate {
    serde_json::from_str(TEMPLATE_JSON).unwrap()
}

pub fn handle() -> RunHandle {
    RunHandle::parse(RUN_ARN).unwrap()
}

fn snapshot(status: &str, exit_code: Option<i32>) -> TerminalSnapshot {
    TerminalSnapshot {
        tasks: vec![RunDescriptor {
            arn: Some(RUN_ARN.to_string()),
            last_status: Some(status.to_string()),
            task_definition_arn: Some(RUN_DEFINITION_ARN.to_string()),
            stopped_reason: None,
            containers: vec![ContainerResult {
                name: "migrations-runner".to_string(),
                exit_code,
                reason: None,
            }],
        }],
        failures: vec![],
    }
}

pub fn running() -> TerminalSnapshot {
    snapshot("RUNNING", None)
}

pub fn stopped(exit_code: Option<i32>) -> TerminalSnapshot {
    snapshot("STOPPED", exit_code)
}

pub fn definition(group: Option<&str>, prefix: Option<&str>) -> TaskDefinition {
    let mut log_options = HashMap::new();
    if let Some(group) = group {
        log_options.insert(LOG_GROUP_OPTION.to_string(), group.to_string());
    }
    if let Some(prefix) = prefix {
        log_options.insert(STREAM_PREFIX_OPTION.to_string(), prefix.to_string());
    }
    TaskDefinition {
        arn: RUN_DEFINITION_ARN.to_string(),
        containers: vec![ContainerDefinition {
            name: "migrations-runner".to_string(),
            log_options,
        }],
    }
}

pub fn line(ts: i64, message: &str) -> LogLine {
    LogLine {
        timestamp: Some(ts),
        ingestion_time: Some(ts),
        message: message.to_string(),
    }
}

#[derive(Default)]
pub struct FakeStore {
    values: HashMap<String, String>,
    failure: Option<ServiceError>,
}

impl FakeStore {
    pub fn with(key: &str, value: &str) -> Self {
        Self {
            values: HashMap::from([(key.to_string(), value.to_string())]),
            failure: None,
        }
    }

    pub fn failing(err: ServiceError) -> Self {
        Self {
            values: HashMap::new(),
            failure: Some(err),
        }
    }
}

#[async_trait]
impl TemplateStore for FakeStore {
    async fn get(&self, key: &str) -> Result<Option<String>, ServiceError> {
        if let Some(err) = &self.failure {
            return Err(err.clone());
        }
        Ok(self.values.get(key).cloned())
    }
}

/// Scripted run service.
///
/// Polls are served in order; the last scripted poll repeats forever.
#[derive(Default)]
pub struct FakeRuns {
    submission: Option<Result<RunTaskResult, ServiceError>>,
    definition: Option<Result<TaskDefinition, ServiceError>>,
    polls: Mutex<VecDeque<Result<TerminalSnapshot, ServiceError>>>,
    submissions: Mutex<Vec<RunRequest>>,
    polled_clusters: Mutex<Vec<String>>,
    described: Mutex<Vec<String>>,
}

impl FakeRuns {
    pub fn with_submission(mut self, result: Result<RunTaskResult, ServiceError>) -> Self {
        self.submission = Some(result);
        self
    }

    pub fn with_polls(self, polls: Vec<Result<TerminalSnapshot, ServiceError>>) -> Self {
        *self.polls.lock().unwrap() = polls.into();
        self
    }

    pub fn with_definition(mut self, result: Result<TaskDefinition, ServiceError>) -> Self {
        self.definition = Some(result);
        self
    }

    pub fn submissions(&self) -> Vec<RunRequest> {
        self.submissions.lock().unwrap().clone()
    }

    pub fn polls(&self) -> usize {
        self.polled_clusters.lock().unwrap().len()
    }

    pub fn polled_clusters(&self) -> Vec<String> {
        self.polled_clusters.lock().unwrap().clone()
    }

    pub fn described_definitions(&self) -> Vec<String> {
        self.described.lock().unwrap().clone()
    }
}

#[async_trait]
impl RunService for FakeRuns {
    async fn run_task(&self, request: &RunRequest) -> Result<RunTaskResult, ServiceError> {
        self.submissions.lock().unwrap().push(request.clone());
        self.submission
            .clone()
            .unwrap_or_else(|| Err(ServiceError::Transport("no submission scripted".into())))
    }

    async fn describe_tasks(
        &self,
        cluster: &str,
        _run_ids: &[String],
    ) -> Result<TerminalSnapshot, ServiceError> {
        self.polled_clusters.lock().unwrap().push(cluster.to_string());
        let mut polls = self.polls.lock().unwrap();
        if polls.len() > 1 {
            return polls.pop_front().unwrap();
        }
        polls
            .front()
            .cloned()
            .unwrap_or_else(|| Err(ServiceError::Transport("no poll scripted".into())))
    }

    async fn describe_task_definition(&self, arn: &str) -> Result<TaskDefinition, ServiceError> {
        self.described.lock().unwrap().push(arn.to_string());
        self.definition
            .clone()
            .unwrap_or_else(|| Err(ServiceError::NotFound(arn.to_string())))
    }
}

pub struct FakeLogs {
    result: Result<Vec<LogLine>, ServiceError>,
    requests: Mutex<Vec<(LogLocation, bool)>>,
}

impl FakeLogs {
    pub fn returning(result: Result<Vec<LogLine>, ServiceError>) -> Self {
        Self {
            result,
            requests: Mutex::new(Vec::new()),
        }
    }

    pub fn requests(&self) -> Vec<(LogLocation, bool)> {
        self.requests.lock().unwrap().clone()
    }
}

#[async_trait]
impl LogService for FakeLogs {
    async fn get_events(
        &self,
        location: &LogLocation,
        from_head: bool,
    ) -> Result<Vec<LogLine>, ServiceError> {
        self.requests
            .lock()
            .unwrap()
            .push((location.clone(), from_head));
        self.result.clone()
    }
}

#[derive(Default)]
pub struct RecordingSink {
    failure: Option<ServiceError>,
    annotations: Mutex<Vec<Annotation>>,
}

impl RecordingSink {
    pub fn failing(err: ServiceError) -> Self {
        Self {
            failure: Some(err),
            annotations: Mutex::new(Vec::new()),
        }
    }

    pub fn annotations(&self) -> Vec<Annotation> {
        self.annotations.lock().unwrap().clone()
    }
}

#[async_trait]
impl AnnotationSink for RecordingSink {
    async fn annotate(&self, annotation: &Annotation) -> Result<(), ServiceError> {
        self.annotations.lock().unwrap().push(annotation.clone());
        match &self.failure {
            Some(err) => Err(err.clone()),
            None => Ok(()),
        }
    }
}
