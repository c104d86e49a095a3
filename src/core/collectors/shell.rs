//! Running external tools with a bounded wait.

use std::io::Read;
use std::process::{Command, Stdio};
use std::thread;
use std::time::{Duration, Instant};

use crate::core::telemetry::FieldError;

const POLL_STEP: Duration = Duration::from_millis(25);

/// Run `program` and return its stdout.
///
/// A missing program maps to [`FieldError::Unavailable`]; a non-zero exit,
/// spawn failure or a run longer than `timeout` (the child is killed) maps
/// to [`FieldError::Failed`].
pub fn run(program: &str, args: &[&str], timeout: Duration) -> Result<String, FieldError> {
    if which::which(program).is_err() {
        log::warn!("{} not found in PATH", program);
        return Err(FieldError::Unavailable);
    }

    let mut child = Command::new(program)
        .args(args)
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::null())
        .spawn()
        .map_err(|e| {
            log::warn!("Failed to spawn {}: {}", program, e);
            FieldError::Failed
        })?;

    // Drain stdout on a helper thread so a chatty tool cannot block on a
    // full pipe while we poll for exit.
    let reader = child.stdout.take().map(|mut stdout| {
        thread::spawn(move || {
            let mut buf = Vec::new();
            let _ = stdout.read_to_end(&mut buf);
            buf
        })
    });

    let deadline = Instant::now() + timeout;
    let status = loop {
        match child.try_wait() {
            Ok(Some(status)) => break status,
            Ok(None) if Instant::now() >= deadline => {
                log::warn!("{} timed out after {:?}", program, timeout);
                let _ = child.kill();
                let _ = child.wait();
                return Err(FieldError::Failed);
            }
            Ok(None) => thread::sleep(POLL_STEP),
            Err(e) => {
                log::warn!("Failed waiting for {}: {}", program, e);
                return Err(FieldError::Failed);
            }
        }
    };

    let output = reader
        .and_then(|handle| handle.join().ok())
        .unwrap_or_default();

    if !status.success() {
        log::warn!("{} exited with {}", program, status);
        return Err(FieldError::Failed);
    }

    Ok(String::from_utf8_lossy(&output).into_owned())
}
