use std::process::Stdio;

use tokio::{
    io::AsyncWriteExt,
    process::{Child, ChildStdin},
};
use tokio_util::sync::CancellationToken;
use tracing::{debug, trace};

use crate::{
    error::{ExecError, ExecResult},
    signals,
    util::{cmd_program, kill_graceful},
};

/// Process to run to completion. A non-zero exit is an error.
#[derive(Clone, Debug, Default)]
pub struct ProcConfig {
    pub program: String,
    pub args: Vec<String>,
    /// Written to the child's stdin, which is then closed.
    pub stdin: Option<String>,
}

/// Spawn the process, feed its stdin and wait for it.
///
/// stdout/stderr are inherited so the output lands in the build log. Termination
/// signals received while the child runs are relayed to it.
pub async fn run_to_completion(cfg: &ProcConfig) -> ExecResult<()> {
    if cfg.program.is_empty() {
        return Err(ExecError::MissingProgram);
    }
    trace!(target: "etr.exec.proc", program = %cfg.program, args = ?cfg.args, "spawn");

    let mut cmd = cmd_program(&cfg.program, &cfg.args);
    cmd.stdin(if cfg.stdin.is_some() {
        Stdio::piped()
    } else {
        Stdio::null()
    });
    cmd.stdout(Stdio::inherit());
    cmd.stderr(Stdio::inherit());

    let mut child = cmd.spawn().map_err(|e| ExecError::Spawn(e.to_string()))?;

    let stop_relay = CancellationToken::new();
    let relay = child
        .id()
        .map(|pid| tokio::spawn(signals::relay(pid, stop_relay.clone())));

    let waited = drive(&mut child, cfg.stdin.as_deref()).await;

    stop_relay.cancel();
    if let Some(relay) = relay {
        let _ = relay.await;
    }

    let status = match waited {
        Ok(status) => status,
        Err(e) => {
            debug!(target: "etr.exec.proc", error = %e, "wait failed; killing child");
            let _ = kill_graceful(&mut child).await;
            return Err(e);
        }
    };

    if status.success() {
        debug!(target: "etr.exec.proc", code = ?status.code(), "exit");
        return Ok(());
    }
    match status.code() {
        Some(code) => {
            debug!(target: "etr.exec.proc", code, "exit non-zero");
            Err(ExecError::NonZeroExit { code })
        }
        None => Err(ExecError::KilledBySignal),
    }
}

async fn drive(child: &mut Child, input: Option<&str>) -> ExecResult<std::process::ExitStatus> {
    if let Some(input) = input
        && let Some(stdin) = child.stdin.take()
    {
        // A child that exits without reading its input is judged by its exit status.
        if let Err(e) = feed(stdin, input).await
            && e.kind() != std::io::ErrorKind::BrokenPipe
        {
            return Err(e.into());
        }
    }
    child
        .wait()
        .await
        .map_err(|e| ExecError::Wait(e.to_string()))
}

async fn feed(mut stdin: ChildStdin, input: &str) -> std::io::Result<()> {
    stdin.write_all(input.as_bytes()).await?;
    stdin.shutdown().await
}
