use std::{sync::Arc, time::Duration};

use etr_model::{LogLine, Outcome, RunHandle, TaskTemplate, TerminalSnapshot, TimeoutSecs};
use tracing::{debug, info, instrument, warn};

use crate::{
    classifier::classify,
    error::CoreError,
    logs::{fetch_logs, locate_logs},
    ports::{Annotation, AnnotationSink, AnnotationStyle, LogService, RunService, TemplateStore},
    resolver::TemplateResolver,
    submitter::TaskSubmitter,
    waiter::{CompletionWaiter, WaitPolicy},
};

pub const DEFAULT_TIMEOUT_SECS: TimeoutSecs = 2700;
pub const DEFAULT_CONTAINER_NAME: &str = "migrations-runner";
pub const DEFAULT_ANNOTATION_CONTEXT: &str = "ecs-task-runner";

/// Parameters of one invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Invocation {
    /// Parameter-store key of the task template.
    pub parameter_key: String,
    /// Whitespace-separated command replacing the template command.
    pub command: Option<String>,
    pub timeout_secs: TimeoutSecs,
    /// Container the command override applies to.
    pub container_name: String,
    pub annotation_context: String,
}

impl Invocation {
    pub fn new(parameter_key: impl Into<String>) -> Self {
        Self {
            parameter_key: parameter_key.into(),
            command: None,
            timeout_secs: DEFAULT_TIMEOUT_SECS,
            container_name: DEFAULT_CONTAINER_NAME.to_string(),
            annotation_context: DEFAULT_ANNOTATION_CONTEXT.to_string(),
        }
    }

    pub fn with_command(mut self, command: impl Into<String>) -> Self {
        self.command = Some(command.into());
        self
    }

    pub fn with_timeout_secs(mut self, timeout_secs: TimeoutSecs) -> Self {
        self.timeout_secs = timeout_secs;
        self
    }
}

/// Lifecycle of one invocation, in order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Configured,
    Submitted,
    Waited,
    Classified,
    LogsAttached,
    LogsSkipped,
    Reported,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LogAttachment {
    Attached(Vec<LogLine>),
    Skipped { reason: String },
}

/// What an invocation produced once the outcome is known.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Report {
    pub handle: RunHandle,
    pub outcome: Outcome,
    pub logs: LogAttachment,
    pub phases: Vec<Phase>,
}

impl Report {
    /// Build-log lines for the attached logs, oldest first.
    pub fn rendered_logs(&self) -> Vec<String> {
        match &self.logs {
            LogAttachment::Attached(lines) => lines.iter().filter_map(LogLine::render).collect(),
            LogAttachment::Skipped { .. } => Vec::new(),
        }
    }

    pub fn exit_status(&self) -> i32 {
        self.outcome.exit_status()
    }
}

/// External collaborators of the orchestrator.
#[derive(Clone)]
pub struct Services {
    pub store: Arc<dyn TemplateStore>,
    pub runs: Arc<dyn RunService>,
    pub logs: Arc<dyn LogService>,
    pub sink: Arc<dyn AnnotationSink>,
}

/// Runs one command to completion and reports its outcome.
///
/// Configuration, submission and annotation errors are returned; log retrieval errors
/// are logged and folded into the report.
pub struct Orchestrator {
    services: Services,
    policy: WaitPolicy,
}

impl Orchestrator {
    pub fn new(services: Services) -> Self {
        Self {
            services,
            policy: WaitPolicy::default(),
        }
    }

    pub fn with_wait_policy(mut self, policy: WaitPolicy) -> Self {
        self.policy = policy;
        self
    }

    #[instrument(level = "info", skip_all, fields(parameter = %invocation.parameter_key))]
    pub async fn run(&self, invocation: &Invocation) -> Result<Report, CoreError> {
        let mut phases = vec![Phase::Configured];

        info!("retrieving task configuration");
        let mut template = TemplateResolver::new(Arc::clone(&self.services.store))
            .resolve(&invocation.parameter_key)
            .await?;
        if template.apply_command_override(invocation.command.as_deref()) {
            debug!(command = ?template.command, "template command overridden");
        }

        let handle = TaskSubmitter::new(
            Arc::clone(&self.services.runs),
            invocation.container_name.clone(),
        )
        .submit(&template)
        .await?;
        phases.push(Phase::Submitted);

        info!(run = %handle, timeout_secs = invocation.timeout_secs, "waiting for task to complete");
        let waited = CompletionWaiter::new(Arc::clone(&self.services.runs), self.policy)
            .wait(&handle, Duration::from_secs(invocation.timeout_secs))
            .await;
        phases.push(Phase::Waited);
        if let Some(err) = &waited.error {
            warn!(run = %handle, error = %err, "wait ended without a stopped task");
        }

        let outcome = classify(&waited.snapshot, waited.error.as_ref());
        phases.push(Phase::Classified);
        info!(run = %handle, outcome = %outcome, "task outcome classified");

        if outcome == Outcome::WaitTimeout {
            self.annotate(invocation, &outcome).await?;
            phases.push(Phase::LogsSkipped);
            phases.push(Phase::Reported);
            return Ok(Report {
                handle,
                outcome,
                logs: LogAttachment::Skipped {
                    reason: "task did not complete within the time limit".to_string(),
                },
                phases,
            });
        }

        let logs = match self.attach_logs(&template, &handle, &waited.snapshot).await {
            Ok(lines) => {
                phases.push(Phase::LogsAttached);
                LogAttachment::Attached(lines)
            }
            Err(e) => {
                warn!(run = %handle, error = %e, "failed to retrieve logs for task, continuing");
                phases.push(Phase::LogsSkipped);
                LogAttachment::Skipped {
                    reason: e.to_string(),
                }
            }
        };

        if !outcome.is_success() {
            self.annotate(invocation, &outcome).await?;
        }
        phases.push(Phase::Reported);

        Ok(Report {
            handle,
            outcome,
            logs,
            phases,
        })
    }

    async fn attach_logs(
        &self,
        template: &TaskTemplate,
        handle: &RunHandle,
        snapshot: &TerminalSnapshot,
    ) -> Result<Vec<LogLine>, CoreError> {
        let definition_arn = snapshot
            .primary_task()
            .and_then(|task| task.task_definition_arn.as_deref())
            .unwrap_or(template.task_definition_arn.as_str());

        let definition = self
            .services
            .runs
            .describe_task_definition(definition_arn)
            .await
            .map_err(CoreError::LogRetrieval)?;
        let location = locate_logs(&definition, handle)?;
        fetch_logs(self.services.logs.as_ref(), &location).await
    }

    async fn annotate(&self, invocation: &Invocation, outcome: &Outcome) -> Result<(), CoreError> {
        let annotation = Annotation {
            message: outcome.annotation(invocation.timeout_secs),
            style: AnnotationStyle::Error,
            context: invocation.annotation_context.clone(),
        };
        self.services
            .sink
            .annotate(&annotation)
            .await
            .map_err(|source| CoreError::Annotation { source })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        error::ServiceError,
        ports::{RunTaskResult, SubmittedRun},
        testing::{
            FakeLogs, FakeRuns, FakeStore, RUN_ARN, RecordingSink, TEMPLATE_JSON, definition,
            line, running, stopped,
        },
    };
    use etr_model::SchedulingFailure;

    struct Harness {
        runs: Arc<FakeRuns>,
        logs: Arc<FakeLogs>,
        sink: Arc<RecordingSink>,
        orchestrator: Orchestrator,
    }

    fn harness(runs: FakeRuns, logs: FakeLogs, sink: RecordingSink) -> Harness {
        let runs = Arc::new(runs);
        let logs = Arc::new(logs);
        let sink = Arc::new(sink);
        let orchestrator = Orchestrator::new(Services {
            store: Arc::new(FakeStore::with("task-config", TEMPLATE_JSON)),
            runs: runs.clone(),
            logs: logs.clone(),
            sink: sink.clone(),
        });
        Harness {
            runs,
            logs,
            sink,
            orchestrator,
        }
    }

    fn submitted() -> FakeRuns {
        FakeRuns::default()
            .with_submission(Ok(RunTaskResult {
                runs: vec![SubmittedRun {
                    arn: Some(RUN_ARN.to_string()),
                }],
                failures: vec![],
            }))
            .with_definition(Ok(definition(Some("/ecs/app"), Some("ecs"))))
    }

    fn invocation() -> Invocation {
        Invocation::new("task-config").with_timeout_secs(15)
    }

    #[tokio::test(start_paused = true)]
    async fn success_attaches_logs_in_order() {
        let h = harness(
            submitted().with_polls(vec![Ok(running()), Ok(stopped(Some(0)))]),
            FakeLogs::returning(Ok(vec![
                line(1_700_000_000_000, "starting"),
                line(1_700_000_001_000, "done"),
            ])),
            RecordingSink::default(),
        );

        let report = h.orchestrator.run(&invocation()).await.unwrap();

        assert_eq!(report.outcome, Outcome::Success);
        assert_eq!(report.exit_status(), 0);
        assert_eq!(
            report.rendered_logs(),
            vec![
                "-> 2023-11-14T22:13:20Z starting".to_string(),
                "-> 2023-11-14T22:13:21Z done".to_string(),
            ]
        );
        assert_eq!(
            report.phases,
            vec![
                Phase::Configured,
                Phase::Submitted,
                Phase::Waited,
                Phase::Classified,
                Phase::LogsAttached,
                Phase::Reported,
            ]
        );
        assert!(h.sink.annotations().is_empty());

        let (location, from_head) = h.logs.requests().remove(0);
        assert!(from_head);
        assert_eq!(location.stream, "ecs/migrations-runner/07cc583696bd44e0be450bff7314ddaf");
        assert_eq!(
            h.runs.described_definitions(),
            vec!["arn:aws:ecs:us-west-2:123456789012:task-definition/test-task-1:3".to_string()]
        );
    }

    #[tokio::test(start_paused = true)]
    async fn timeout_skips_logs_and_annotates() {
        let h = harness(
            submitted().with_polls(vec![Ok(running())]),
            FakeLogs::returning(Ok(vec![line(1, "never")])),
            RecordingSink::default(),
        );

        let report = h.orchestrator.run(&invocation()).await.unwrap();

        assert_eq!(report.outcome, Outcome::WaitTimeout);
        assert_ne!(report.exit_status(), 0);
        assert!(matches!(report.logs, LogAttachment::Skipped { .. }));
        assert!(h.logs.requests().is_empty());
        assert!(h.runs.described_definitions().is_empty());

        let annotations = h.sink.annotations();
        assert_eq!(annotations.len(), 1);
        assert_eq!(
            annotations[0].message,
            "Task did not complete successfully within timeout (15 seconds)"
        );
        assert_eq!(annotations[0].style, AnnotationStyle::Error);
        assert_eq!(annotations[0].context, "ecs-task-runner");
    }

    #[tokio::test(start_paused = true)]
    async fn task_failure_still_shows_logs_and_annotates_once() {
        let h = harness(
            submitted().with_polls(vec![Ok(stopped(Some(1)))]),
            FakeLogs::returning(Ok(vec![line(1_700_000_000_000, "boom")])),
            RecordingSink::default(),
        );

        let report = h.orchestrator.run(&invocation()).await.unwrap();

        assert_eq!(report.outcome, Outcome::TaskFailure { exit_code: Some(1) });
        assert_eq!(report.rendered_logs().len(), 1);
        let annotations = h.sink.annotations();
        assert_eq!(annotations.len(), 1);
        assert!(annotations[0].message.contains("exit code: 1"));
    }

    #[tokio::test(start_paused = true)]
    async fn log_failure_does_not_mask_success() {
        let h = harness(
            submitted().with_polls(vec![Ok(stopped(Some(0)))]),
            FakeLogs::returning(Err(ServiceError::NotFound("log stream".into()))),
            RecordingSink::default(),
        );

        let report = h.orchestrator.run(&invocation()).await.unwrap();

        assert_eq!(report.outcome, Outcome::Success);
        assert!(matches!(report.logs, LogAttachment::Skipped { .. }));
        assert!(report.phases.contains(&Phase::LogsSkipped));
        assert!(h.sink.annotations().is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn unconfigured_logging_is_skipped() {
        let h = harness(
            submitted()
                .with_polls(vec![Ok(stopped(Some(0)))])
                .with_definition(Ok(definition(None, Some("ecs")))),
            FakeLogs::returning(Ok(vec![])),
            RecordingSink::default(),
        );

        let report = h.orchestrator.run(&invocation()).await.unwrap();

        assert_eq!(report.outcome, Outcome::Success);
        assert!(matches!(&report.logs, LogAttachment::Skipped { reason } if reason.contains("not configured")));
        assert!(h.logs.requests().is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn scheduling_failure_falls_back_to_template_definition() {
        let failed = TerminalSnapshot {
            tasks: vec![],
            failures: vec![SchedulingFailure {
                arn: Some(RUN_ARN.into()),
                reason: Some("MISSING".into()),
                detail: None,
            }],
        };
        let h = harness(
            submitted().with_polls(vec![Ok(failed)]),
            FakeLogs::returning(Ok(vec![])),
            RecordingSink::default(),
        );

        let report = h.orchestrator.run(&invocation()).await.unwrap();

        assert!(matches!(report.outcome, Outcome::InfrastructureFailure { .. }));
        assert_eq!(
            h.runs.described_definitions(),
            vec!["arn:aws:ecs:us-west-2:123456789012:task-definition/test-task-1".to_string()]
        );
        assert_eq!(h.sink.annotations().len(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn command_override_reaches_submission() {
        let h = harness(
            submitted().with_polls(vec![Ok(stopped(Some(0)))]),
            FakeLogs::returning(Ok(vec![])),
            RecordingSink::default(),
        );

        h.orchestrator
            .run(&invocation().with_command("bin/rake db:migrate"))
            .await
            .unwrap();

        let request = h.runs.submissions().remove(0);
        assert_eq!(
            request.container_override.command,
            Some(vec!["bin/rake".to_string(), "db:migrate".to_string()])
        );
    }

    #[tokio::test(start_paused = true)]
    async fn submission_error_stops_before_waiting() {
        let h = harness(
            FakeRuns::default().with_submission(Err(ServiceError::Transport("denied".into()))),
            FakeLogs::returning(Ok(vec![])),
            RecordingSink::default(),
        );

        let err = h.orchestrator.run(&invocation()).await.unwrap_err();

        assert!(matches!(err, CoreError::Submission(_)));
        assert_eq!(h.runs.polls(), 0);
        assert!(h.sink.annotations().is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn missing_configuration_is_fatal() {
        let h = harness(
            submitted(),
            FakeLogs::returning(Ok(vec![])),
            RecordingSink::default(),
        );

        let err = h
            .orchestrator
            .run(&Invocation::new("unknown"))
            .await
            .unwrap_err();

        assert!(matches!(err, CoreError::ConfigNotFound(_)));
        assert!(h.runs.submissions().is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn annotation_failure_is_fatal() {
        let h = harness(
            submitted().with_polls(vec![Ok(stopped(Some(2)))]),
            FakeLogs::returning(Ok(vec![])),
            RecordingSink::failing(ServiceError::Transport("agent exited 1".into())),
        );

        let err = h.orchestrator.run(&invocation()).await.unwrap_err();
        assert!(matches!(err, CoreError::Annotation { .. }));
    }
}
