pub mod error;
pub use error::{CoreError, ServiceError, WaitError};

pub mod ports;
pub use ports::{
    Annotation, AnnotationSink, AnnotationStyle, ContainerOverride, LogService, RunRequest,
    RunService, RunTaskResult, SubmittedRun, TemplateStore,
};

pub mod resolver;
pub use resolver::TemplateResolver;

pub mod submitter;
pub use submitter::TaskSubmitter;

pub mod waiter;
pub use waiter::{CompletionWaiter, WaitOutput, WaitPolicy};

pub mod classifier;
pub use classifier::classify;

pub mod logs;
pub use logs::{fetch_logs, locate_logs};

pub mod orchestrator;
pub use orchestrator::{
    DEFAULT_ANNOTATION_CONTEXT, DEFAULT_CONTAINER_NAME, DEFAULT_TIMEOUT_SECS, Invocation,
    LogAttachment, Orchestrator, Phase, Report, Services,
};

#[cfg(test)]
pub(crate) mod testing;
