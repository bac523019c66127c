//! Case runner: spawns the target, feeds its stdin, captures its output
//!
//! Every child spawned here is waited on before the function returns, on
//! the timeout path too. stdin writing and stdout/stderr draining run as
//! separate tasks so a child that fills one pipe while we block on another
//! cannot deadlock.

use std::io;
use std::path::Path;
use std::process::{ExitStatus, Stdio};
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::{Duration, Instant};

use tokio::io::{AsyncRead, AsyncReadExt, AsyncWriteExt};
use tokio::process::Command;
use tokio::task::JoinHandle;
use tokio::time::timeout;

use crate::common::{Error, Result};

use super::suite::TestCase;

/// How long to keep draining a pipe after the child is gone. A grandchild
/// that inherited the pipe can hold it open indefinitely.
const DRAIN_GRACE: Duration = Duration::from_millis(500);

/// What a single invocation of a program produced
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExecutionResult {
    /// Exit code; a child killed by a signal reports the negated signal number
    pub exit_code: i32,
    pub stdout: String,
    pub stderr: String,
    /// The child was killed because it outlived its timeout
    pub timed_out: bool,
}

/// Run the target executable with the case's input on stdin
pub async fn run_case(executable: &Path, case: &TestCase, limit: Duration) -> Result<ExecutionResult> {
    let command = Command::new(executable);
    run_process(command, Some(case.input.as_bytes().to_vec()), limit).await
}

/// Spawn `command`, write `input` to its stdin (or give it a null stdin),
/// and collect its output
///
/// A timeout is not an error here: the child is killed and reaped and the
/// result comes back with `timed_out` set. Spawn and pipe failures are
/// `Error::Invocation`.
pub async fn run_process(
    mut command: Command,
    input: Option<Vec<u8>>,
    limit: Duration,
) -> Result<ExecutionResult> {
    command
        .stdin(if input.is_some() {
            Stdio::piped()
        } else {
            Stdio::null()
        })
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .kill_on_drop(true);

    let started = Instant::now();
    let mut child = command
        .spawn()
        .map_err(|e| Error::Invocation(format!("Failed to spawn process: {}", e)))?;
    tracing::debug!(pid = ?child.id(), "Spawned child process");

    let writer = match (child.stdin.take(), input) {
        (Some(mut stdin), Some(input)) => Some(tokio::spawn(async move {
            let result = stdin.write_all(&input).await;
            // Dropping the handle closes the pipe, signalling EOF
            drop(stdin);
            result
        })),
        _ => None,
    };

    let stdout = child
        .stdout
        .take()
        .ok_or_else(|| Error::Invocation("Failed to capture stdout".to_string()))?;
    let stderr = child
        .stderr
        .take()
        .ok_or_else(|| Error::Invocation("Failed to capture stderr".to_string()))?;
    let stdout_capture = Captured::default();
    let stderr_capture = Captured::default();
    let stdout_task = tokio::spawn(read_into(stdout, stdout_capture.clone()));
    let stderr_task = tokio::spawn(read_into(stderr, stderr_capture.clone()));

    let (status, timed_out) = match timeout(limit, child.wait()).await {
        Ok(status) => (
            status.map_err(|e| Error::Invocation(format!("Failed to wait for process: {}", e)))?,
            false,
        ),
        Err(_) => {
            tracing::warn!(
                pid = ?child.id(),
                timeout_secs = limit.as_secs_f64(),
                "Process timed out, killing it"
            );
            child
                .kill()
                .await
                .map_err(|e| Error::Invocation(format!("Failed to kill process: {}", e)))?;
            let status = child
                .wait()
                .await
                .map_err(|e| Error::Invocation(format!("Failed to reap process: {}", e)))?;
            (status, true)
        }
    };

    if let Some(mut writer) = writer {
        // A grandchild that inherited stdin can keep the write blocked
        match timeout(DRAIN_GRACE, &mut writer).await {
            Ok(Ok(Ok(()))) => {}
            // The child exited (or was killed) without reading all its input
            Ok(Ok(Err(e))) if e.kind() == io::ErrorKind::BrokenPipe || timed_out => {
                tracing::debug!("stdin not fully consumed: {}", e);
            }
            Ok(Ok(Err(e))) => {
                return Err(Error::Invocation(format!("Failed to write stdin: {}", e)));
            }
            Ok(Err(e)) => {
                return Err(Error::Invocation(format!("stdin writer failed: {}", e)));
            }
            Err(_) => {
                writer.abort();
                tracing::warn!("stdin still blocked after the process ended, input abandoned");
            }
        }
    }

    let stdout = drain(stdout_task, &stdout_capture, "stdout").await?;
    let stderr = drain(stderr_task, &stderr_capture, "stderr").await?;

    tracing::debug!(
        elapsed_ms = started.elapsed().as_millis() as u64,
        ?status,
        timed_out,
        "Child process finished"
    );

    Ok(ExecutionResult {
        exit_code: exit_code(status),
        stdout,
        stderr,
        timed_out,
    })
}

/// Bytes read from one pipe so far, shared with its reader task so an
/// aborted reader still leaves its partial output behind
type Captured = Arc<Mutex<Vec<u8>>>;

fn lock(captured: &Captured) -> MutexGuard<'_, Vec<u8>> {
    captured.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

async fn read_into<R: AsyncRead + Unpin>(mut reader: R, captured: Captured) -> io::Result<()> {
    let mut chunk = [0u8; 8192];
    loop {
        let n = reader.read(&mut chunk).await?;
        if n == 0 {
            return Ok(());
        }
        lock(&captured).extend_from_slice(&chunk[..n]);
    }
}

async fn drain(
    mut task: JoinHandle<io::Result<()>>,
    captured: &Captured,
    stream: &str,
) -> Result<String> {
    match timeout(DRAIN_GRACE, &mut task).await {
        Ok(Ok(Ok(()))) => {}
        Ok(Ok(Err(e))) => {
            return Err(Error::Invocation(format!("Failed to read {}: {}", stream, e)));
        }
        Ok(Err(e)) => {
            return Err(Error::Invocation(format!("{} reader failed: {}", stream, e)));
        }
        Err(_) => {
            task.abort();
            tracing::warn!("{} still open after the process ended, keeping partial output", stream);
        }
    }
    Ok(String::from_utf8_lossy(&lock(captured)).into_owned())
}

fn exit_code(status: ExitStatus) -> i32 {
    if let Some(code) = status.code() {
        return code;
    }
    #[cfg(unix)]
    {
        use std::os::unix::process::ExitStatusExt;
        if let Some(signal) = status.signal() {
            return -signal;
        }
    }
    -1
}
