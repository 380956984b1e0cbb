mod error;
pub use error::{ExecError, ExecResult};

pub mod proc;
pub use proc::{ProcConfig, run_to_completion};

mod signals;
mod util;

mod buildkite;
pub use buildkite::{AGENT_PROGRAM, BuildkiteAgent};
