mod error;
pub use error::ModelError;

mod template;
pub use template::TaskTemplate;

mod run;
pub use run::RunHandle;

mod snapshot;
pub use snapshot::{
    ContainerResult, RunDescriptor, SINGLE_CONTAINER_ASSUMPTION, STOPPED_STATUS,
    SchedulingFailure, TerminalSnapshot,
};

mod definition;
pub use definition::{ContainerDefinition, LOG_GROUP_OPTION, STREAM_PREFIX_OPTION, TaskDefinition};

mod logs;
pub use logs::{LogLine, LogLocation};

mod outcome;
pub use outcome::Outcome;

/// Timeout value in seconds.
///
/// Used by the invocation surface and the completion waiter.
pub type TimeoutSecs = u64;
