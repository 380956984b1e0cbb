use etr_model::{Outcome, TerminalSnapshot};

use crate::error::WaitError;

/// Map a wait result to its outcome. Pure and total.
///
/// Order matters:
/// 1. a timed-out wait is `WaitTimeout` whatever the snapshot says (the run may still be going);
/// 2. any other wait error is an infrastructure failure;
/// 3. scheduling failures come before exit codes, containers that never ran have none;
/// 4. the application container's exit code decides between success and task failure.
pub fn classify(snapshot: &TerminalSnapshot, wait_error: Option<&WaitError>) -> Outcome {
    if let Some(err) = wait_error {
        if err.is_timeout() {
            return Outcome::WaitTimeout;
        }
        return Outcome::InfrastructureFailure {
            detail: err.to_string(),
        };
    }

    if let Some(failure) = snapshot.first_failure() {
        return Outcome::InfrastructureFailure {
            detail: failure.describe(),
        };
    }

    let exit_code = snapshot
        .primary_task()
        .and_then(|task| task.primary_container())
        .and_then(|container| container.exit_code);

    match exit_code {
        Some(0) => Outcome::Success,
        code => Outcome::TaskFailure { exit_code: code },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{running, stopped};
    use etr_model::{ContainerResult, RunDescriptor, SchedulingFailure};

    fn with_failure(mut snapshot: TerminalSnapshot) -> TerminalSnapshot {
        snapshot.failures.push(SchedulingFailure {
            arn: Some("test-task-arn".into()),
            reason: Some("Panicked".into()),
            detail: Some("Container gateway panicked with non-zero exit code 1".into()),
        });
        snapshot
    }

    #[test]
    fn zero_exit_is_success() {
        assert_eq!(classify(&stopped(Some(0)), None), Outcome::Success);
    }

    #[test]
    fn non_zero_exit_is_task_failure() {
        let outcome = classify(&stopped(Some(1)), None);
        assert_eq!(outcome, Outcome::TaskFailure { exit_code: Some(1) });
        assert!(outcome.annotation(15).contains('1'));
    }

    #[test]
    fn absent_exit_code_is_task_failure() {
        assert_eq!(
            classify(&stopped(None), None),
            Outcome::TaskFailure { exit_code: None }
        );
    }

    #[test]
    fn no_task_or_container_is_task_failure() {
        assert_eq!(
            classify(&TerminalSnapshot::default(), None),
            Outcome::TaskFailure { exit_code: None }
        );
        let no_containers = TerminalSnapshot {
            tasks: vec![RunDescriptor::default()],
            failures: vec![],
        };
        assert_eq!(
            classify(&no_containers, None),
            Outcome::TaskFailure { exit_code: None }
        );
    }

    #[test]
    fn timeout_wins_regardless_of_snapshot() {
        let err = WaitError::Transport("exceeded max wait time for TasksStopped waiter".into());
        for snapshot in [stopped(Some(0)), with_failure(stopped(Some(1))), running()] {
            assert_eq!(classify(&snapshot, Some(&err)), Outcome::WaitTimeout);
        }
        assert_eq!(
            classify(&running(), Some(&WaitError::TimedOut { timeout_secs: 15 })),
            Outcome::WaitTimeout
        );
    }

    #[test]
    fn other_wait_errors_are_infrastructure_failures() {
        let err = WaitError::Transport("AccessDeniedException".into());
        assert!(matches!(
            classify(&stopped(Some(0)), Some(&err)),
            Outcome::InfrastructureFailure { detail } if detail.contains("AccessDeniedException")
        ));
    }

    #[test]
    fn failures_beat_exit_codes() {
        let outcome = classify(&with_failure(stopped(Some(0))), None);
        assert!(matches!(
            outcome,
            Outcome::InfrastructureFailure { detail } if detail.contains("Container gateway panicked")
        ));
    }

    #[test]
    fn first_failure_is_reported() {
        let mut snapshot = with_failure(TerminalSnapshot::default());
        snapshot.failures.push(SchedulingFailure {
            detail: Some("second".into()),
            ..Default::default()
        });
        assert!(matches!(
            classify(&snapshot, None),
            Outcome::InfrastructureFailure { detail } if !detail.contains("second")
        ));
    }

    #[test]
    fn only_first_container_is_consulted() {
        let snapshot = TerminalSnapshot {
            tasks: vec![RunDescriptor {
                last_status: Some("STOPPED".into()),
                containers: vec![
                    ContainerResult {
                        name: "app".into(),
                        exit_code: Some(0),
                        reason: None,
                    },
                    ContainerResult {
                        name: "sidecar".into(),
                        exit_code: Some(137),
                        reason: None,
                    },
                ],
                ..Default::default()
            }],
            failures: vec![],
        };
        assert_eq!(classify(&snapshot, None), Outcome::Success);
    }

    #[test]
    fn deterministic() {
        let snapshot = with_failure(stopped(Some(3)));
        let err = WaitError::Transport("boom".into());
        assert_eq!(classify(&snapshot, Some(&err)), classify(&snapshot, Some(&err)));
        assert_eq!(classify(&snapshot, None), classify(&snapshot, None));
    }
}
