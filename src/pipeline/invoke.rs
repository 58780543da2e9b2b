//! Converter invocation: run the external program and capture its output.
//!
//! ## Timeouts and partial output
//!
//! stdout and stderr are drained by their own tasks while the main future
//! waits on the child. Only the wait is bounded by [`tokio::time::timeout`];
//! when it fires the child is killed and the readers are still joined, so
//! whatever the converter printed before hanging reaches the log. The child
//! is also spawned with `kill_on_drop(true)` so a cancelled request never
//! leaves it running.
//!
//! Nothing here decides success. Exit status and output are recorded for
//! the log; the verdict belongs to [`crate::pipeline::report`].

use crate::pipeline::command::ConverterCommand;
use serde::{Deserialize, Serialize};
use std::process::Stdio;
use std::time::{Duration, Instant};
use tokio::io::{AsyncRead, AsyncReadExt};
use tokio::process::Command;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

/// How long the pipes may stay open after the child exited or was killed.
///
/// A grandchild that inherited them can keep them open indefinitely; past
/// this grace the stream is abandoned.
const PIPE_DRAIN_GRACE: Duration = Duration::from_secs(2);

/// What the converter did, as far as we can observe it.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConverterOutput {
    /// Exit code, `None` when the child was killed, timed out or never started.
    pub exit_code: Option<i32>,
    pub stdout: String,
    pub stderr: String,
    /// The timeout fired and the child was killed.
    pub timed_out: bool,
    pub elapsed_ms: u64,
}

impl ConverterOutput {
    /// stdout and stderr joined by a newline, as shown to the user.
    pub fn combined_log(&self) -> String {
        let mut log = format!("{}\n{}", self.stdout, self.stderr);
        if self.timed_out {
            if !log.ends_with('\n') {
                log.push('\n');
            }
            log.push_str(&format!(
                "[converter killed after {:.1}s timeout]\n",
                self.elapsed_ms as f64 / 1000.0
            ));
        }
        log
    }
}

/// Run `command` to completion (or until `timeout`) and capture its output.
///
/// Never fails: a program that cannot be started is reported through
/// `stderr` with no exit code, the same channel a failing converter uses.
/// Output written before a timeout is kept.
pub async fn run_converter(command: &ConverterCommand, timeout: Option<Duration>) -> ConverterOutput {
    let start = Instant::now();
    debug!(argv = ?command.argv(), "spawning converter");

    let child = Command::new(&command.program)
        .args(&command.args)
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .kill_on_drop(true)
        .spawn();

    let mut child = match child {
        Ok(c) => c,
        Err(e) => {
            warn!(program = %command.program, error = %e, "failed to start converter");
            return ConverterOutput {
                stderr: format!("failed to start '{}': {}", command.program, e),
                elapsed_ms: start.elapsed().as_millis() as u64,
                ..ConverterOutput::default()
            };
        }
    };

    let stdout_reader = tokio::spawn(drain(child.stdout.take()));
    let stderr_reader = tokio::spawn(drain(child.stderr.take()));

    let waited = match timeout {
        Some(limit) => tokio::time::timeout(limit, child.wait()).await,
        None => Ok(child.wait().await),
    };

    let mut wait_error = None;
    let (exit_code, timed_out) = match waited {
        Ok(Ok(status)) => (status.code(), false),
        Ok(Err(e)) => {
            warn!(program = %command.program, error = %e, "waiting for converter failed");
            wait_error = Some(e);
            (None, false)
        }
        Err(_) => {
            if let Err(e) = child.kill().await {
                warn!(program = %command.program, error = %e, "failed to kill converter");
            }
            (None, true)
        }
    };
    let elapsed_ms = start.elapsed().as_millis() as u64;

    let stdout = collect(stdout_reader, "stdout").await;
    let mut stderr = collect(stderr_reader, "stderr").await;
    if let Some(e) = wait_error {
        stderr.push_str(&format!(
            "failed to collect output of '{}': {}",
            command.program, e
        ));
    }

    if timed_out {
        warn!(program = %command.program, elapsed_ms, "converter timed out and was killed");
    } else {
        info!(program = %command.program, exit_code = ?exit_code, elapsed_ms, "converter finished");
    }

    ConverterOutput {
        exit_code,
        stdout,
        stderr,
        timed_out,
        elapsed_ms,
    }
}

/// Read a pipe to EOF. On a read error the bytes read so far are kept.
async fn drain<R: AsyncRead + Unpin>(pipe: Option<R>) -> Vec<u8> {
    let mut buf = Vec::new();
    if let Some(mut pipe) = pipe {
        if let Err(e) = pipe.read_to_end(&mut buf).await {
            debug!(error = %e, "converter pipe read failed");
        }
    }
    buf
}

async fn collect(mut reader: JoinHandle<Vec<u8>>, stream: &'static str) -> String {
    match tokio::time::timeout(PIPE_DRAIN_GRACE, &mut reader).await {
        Ok(Ok(bytes)) => String::from_utf8_lossy(&bytes).into_owned(),
        Ok(Err(e)) => {
            warn!(stream, error = %e, "converter pipe reader failed");
            String::new()
        }
        Err(_) => {
            reader.abort();
            warn!(stream, "converter pipe still open after exit; output dropped");
            String::new()
        }
    }
}

#[cfg(all(test, unix))]
mod tests {
    use super::*;

    fn sh(script: &str) -> ConverterCommand {
        ConverterCommand::new("sh").args(["-c", script])
    }

    #[tokio::test]
    async fn captures_both_streams_and_exit_code() {
        let out = run_converter(&sh("echo out; echo err >&2; exit 3"), None).await;
        assert_eq!(out.exit_code, Some(3));
        assert_eq!(out.stdout, "out\n");
        assert_eq!(out.stderr, "err\n");
        assert!(!out.timed_out);
        assert_eq!(out.combined_log(), "out\n\nerr\n");
    }

    #[tokio::test]
    async fn missing_program_is_reported_in_log() {
        let cmd = ConverterCommand::new("tex2word-no-such-converter");
        let out = run_converter(&cmd, None).await;
        assert_eq!(out.exit_code, None);
        assert!(out.stderr.contains("failed to start"), "got: {}", out.stderr);
    }

    #[tokio::test]
    async fn hung_converter_is_killed() {
        let out = run_converter(&sh("sleep 10"), Some(Duration::from_millis(200))).await;
        assert!(out.timed_out);
        assert_eq!(out.exit_code, None);
        assert!(out.elapsed_ms < 5_000);
        assert!(out.combined_log().contains("timeout"));
    }

    #[tokio::test]
    async fn timed_out_run_keeps_output_written_before_the_kill() {
        let out = run_converter(
            &sh("echo 'pandoc: warning before hang' >&2; echo partial; exec sleep 10"),
            Some(Duration::from_millis(500)),
        )
        .await;
        assert!(out.timed_out);
        assert_eq!(out.stdout, "partial\n");
        assert!(out.stderr.contains("warning before hang"), "got: {:?}", out.stderr);

        let log = out.combined_log();
        assert!(log.starts_with("partial\n\npandoc: warning before hang\n"), "got: {log:?}");
        assert!(log.ends_with("timeout]\n"));
    }
}
