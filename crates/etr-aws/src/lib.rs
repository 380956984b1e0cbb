mod config;
pub use config::AwsClients;

mod errors;
pub use errors::AwsError;

mod convert;

mod ssm;
pub use ssm::SsmTemplateStore;

mod ecs;
pub use ecs::{EcsRunService, LAUNCH_TYPE};

mod cloudwatch;
pub use cloudwatch::CloudWatchLogService;
