use std::{sync::Arc, time::Duration};

use etr_model::{RunHandle, TerminalSnapshot};
use tokio::time::{Instant, sleep};
use tracing::{debug, instrument, trace};

use crate::{error::WaitError, ports::RunService};

/// Backoff bounds for status polling.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WaitPolicy {
    pub min_delay: Duration,
    pub max_delay: Duration,
}

impl Default for WaitPolicy {
    fn default() -> Self {
        Self {
            min_delay: Duration::from_secs(1),
            max_delay: Duration::from_secs(10),
        }
    }
}

impl WaitPolicy {
    /// Delay after the `attempt`-th poll (zero-based): doubles from `min_delay`, capped at `max_delay`.
    pub fn next_delay(&self, attempt: u32) -> Duration {
        let factor = 1u32.checked_shl(attempt).unwrap_or(u32::MAX);
        self.min_delay.saturating_mul(factor).min(self.max_delay)
    }
}

/// Result of waiting: the last snapshot observed and, possibly, why waiting ended early.
///
/// The snapshot is kept on error; it may carry failure details worth reporting.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WaitOutput {
    pub snapshot: TerminalSnapshot,
    pub error: Option<WaitError>,
}

/// Polls a run until it stops or the timeout elapses.
pub struct CompletionWaiter {
    runs: Arc<dyn RunService>,
    policy: WaitPolicy,
}

impl CompletionWaiter {
    pub fn new(runs: Arc<dyn RunService>, policy: WaitPolicy) -> Self {
        Self { runs, policy }
    }

    #[instrument(level = "debug", skip(self), fields(run = %handle))]
    pub async fn wait(&self, handle: &RunHandle, timeout: Duration) -> WaitOutput {
        // Timeouts past the clock's range never expire.
        let deadline = Instant::now().checked_add(timeout);
        let cluster = handle.cluster();
        let run_ids = vec![handle.as_str().to_string()];
        let mut snapshot = TerminalSnapshot::default();
        let mut attempt: u32 = 0;

        loop {
            match self.runs.describe_tasks(cluster, &run_ids).await {
                Ok(current) => {
                    snapshot = current;
                    if snapshot.is_terminal() {
                        debug!(attempt, "run reached terminal state");
                        return WaitOutput {
                            snapshot,
                            error: None,
                        };
                    }
                }
                Err(e) => {
                    return WaitOutput {
                        snapshot,
                        error: Some(WaitError::Transport(e.to_string())),
                    };
                }
            }

            let mut delay = self.policy.next_delay(attempt);
            if let Some(deadline) = deadline {
                let now = Instant::now();
                if now >= deadline {
                    return WaitOutput {
                        snapshot,
                        error: Some(WaitError::TimedOut {
                            timeout_secs: timeout.as_secs(),
                        }),
                    };
                }
                delay = delay.min(deadline - now);
            }
            trace!(attempt, delay_ms = delay.as_millis() as u64, "run not stopped yet");
            sleep(delay).await;
            attempt = attempt.saturating_add(1);
        }
    }
}
