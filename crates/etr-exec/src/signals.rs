use tokio_util::sync::CancellationToken;

/// Forward termination signals received by this process to `pid` until `stop` fires.
#[cfg(unix)]
pub async fn relay(pid: u32, stop: CancellationToken) {
    use tokio::signal::unix::{SignalKind, signal};
    use tracing::warn;

    let streams = (
        signal(SignalKind::interrupt()),
        signal(SignalKind::terminate()),
        signal(SignalKind::hangup()),
        signal(SignalKind::quit()),
    );
    let (mut int, mut term, mut hup, mut quit) = match streams {
        (Ok(a), Ok(b), Ok(c), Ok(d)) => (a, b, c, d),
        _ => {
            warn!(target: "etr.exec.signals", pid, "cannot install signal handlers; signals will not be relayed");
            stop.cancelled().await;
            return;
        }
    };

    loop {
        let raw = tokio::select! {
            _ = stop.cancelled() => return,
            Some(()) = int.recv() => libc::SIGINT,
            Some(()) = term.recv() => libc::SIGTERM,
            Some(()) = hup.recv() => libc::SIGHUP,
            Some(()) = quit.recv() => libc::SIGQUIT,
        };
        forward(pid, raw);
    }
}

#[cfg(unix)]
fn forward(pid: u32, raw: libc::c_int) {
    use tracing::{debug, warn};

    let rc = unsafe { libc::kill(pid as libc::pid_t, raw) };
    if rc != 0 {
        warn!(target: "etr.exec.signals", pid, signal = raw, error = %std::io::Error::last_os_error(), "failed to relay signal");
    } else {
        debug!(target: "etr.exec.signals", pid, signal = raw, "signal relayed");
    }
}

#[cfg(not(unix))]
pub async fn relay(_pid: u32, stop: CancellationToken) {
    stop.cancelled().await;
}
