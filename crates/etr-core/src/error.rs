use thiserror::Error;

/// Message fragment the platform's waiter uses when it gives up.
pub const MAX_WAIT_EXCEEDED: &str = "exceeded max wait time";

/// Failure reported by an external collaborator (store, run service, log service, sink).
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ServiceError {
    #[error("not found: {0}")]
    NotFound(String),
    #[error("transport error: {0}")]
    Transport(String),
}

/// Failure of the completion waiter.
///
/// Both variants are returned next to the best-available snapshot.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum WaitError {
    #[error("exceeded max wait time for TasksStopped waiter (timeout {timeout_secs}s)")]
    TimedOut { timeout_secs: u64 },
    #[error("failed to describe task: {0}")]
    Transport(String),
}

impl WaitError {
    /// Returns `true` if the wait ended because its deadline passed.
    ///
    /// Transport errors are matched on the waiter's message as well, since some
    /// clients surface the timeout only as wrapped text.
    pub fn is_timeout(&self) -> bool {
        match self {
            WaitError::TimedOut { .. } => true,
            WaitError::Transport(msg) => msg.contains(MAX_WAIT_EXCEEDED),
        }
    }
}

#[derive(Debug, Error)]
pub enum CoreError {
    #[error("task configuration not found: {0}")]
    ConfigNotFound(String),

    #[error("task configuration {key} is malformed: {reason}")]
    ConfigMalformed { key: String, reason: String },

    #[error("failed to retrieve task configuration {key}: {source}")]
    ConfigFetch {
        key: String,
        #[source]
        source: ServiceError,
    },

    #[error("failed to submit task: {0}")]
    Submission(#[source] ServiceError),

    #[error("task submission incomplete: {0}")]
    SubmissionIncomplete(String),

    #[error("cannot trace task output: container logging is not configured on task definition {0}")]
    LoggingNotConfigured(String),

    #[error("failed to retrieve task logs: {0}")]
    LogRetrieval(#[source] ServiceError),

    #[error("failed to annotate build: {source}")]
    Annotation {
        #[source]
        source: ServiceError,
    },
}

impl CoreError {
    /// Returns `true` if the error must end the invocation.
    ///
    /// Log-path errors never mask a determined pass/fail outcome.
    pub fn is_fatal(&self) -> bool {
        !matches!(
            self,
            CoreError::LoggingNotConfigured(_) | CoreError::LogRetrieval(_)
        )
    }
}
