//! Bounded subprocess execution.
//!
//! Every run gets a timeout, an output byte cap, and a cancellation
//! token. Output past the cap is discarded while the pipe keeps being
//! drained, so a runaway tool can neither exhaust memory nor deadlock
//! on a full pipe.

use std::{path::PathBuf, process::Stdio, time::Duration};

use {
    tokio::{
        io::{AsyncRead, AsyncReadExt},
        process::{Child, Command},
        time::timeout,
    },
    tokio_util::sync::CancellationToken,
    tracing::{debug, warn},
};

use crate::error::{Error, Result};

/// Marker appended when output was cut at the byte cap.
pub const TRUNCATION_MARKER: &str = "\n... [output truncated]";

/// Options for one subprocess run.
#[derive(Debug, Clone)]
pub struct RunOpts {
    pub timeout: Duration,
    pub max_output_bytes: usize,
    pub working_dir: Option<PathBuf>,
    /// Extra environment on top of the inherited one.
    pub env: Vec<(String, String)>,
}

/// Captured output of a completed subprocess.
#[derive(Debug)]
pub struct RawOutput {
    pub stdout: String,
    pub stderr: String,
    pub exit_code: i32,
}

enum WaitOutcome {
    Finished(std::io::Result<(String, String, std::process::ExitStatus)>),
    TimedOut,
    Cancelled,
}

/// Run `command` under `sh -c`. The child never inherits stdin. On
/// timeout or cancellation the child is killed and reaped before the
/// error is returned.
pub async fn run_shell(
    command: &str,
    opts: &RunOpts,
    cancel: &CancellationToken,
) -> Result<RawOutput> {
    debug!(timeout_secs = opts.timeout.as_secs(), "spawning tool process");

    let mut cmd = Command::new("sh");
    cmd.arg("-c").arg(command);
    if let Some(ref dir) = opts.working_dir {
        cmd.current_dir(dir);
    }
    for (k, v) in &opts.env {
        cmd.env(k, v);
    }
    cmd.stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .kill_on_drop(true);

    let mut child = cmd.spawn().map_err(Error::Spawn)?;
    let stdout = child.stdout.take();
    let stderr = child.stderr.take();
    let cap = opts.max_output_bytes;

    let outcome = {
        let wait_io = async {
            let (out, err) = tokio::join!(read_capped(stdout, cap), read_capped(stderr, cap));
            let status = child.wait().await?;
            Ok::<_, std::io::Error>((out?, err?, status))
        };
        tokio::pin!(wait_io);
        tokio::select! {
            res = timeout(opts.timeout, &mut wait_io) => match res {
                Ok(io) => WaitOutcome::Finished(io),
                Err(_) => WaitOutcome::TimedOut,
            },
            () = cancel.cancelled() => WaitOutcome::Cancelled,
        }
    };

    match outcome {
        WaitOutcome::Finished(Ok((stdout, stderr, status))) => {
            let exit_code = status.code().unwrap_or(-1);
            debug!(
                exit_code,
                stdout_len = stdout.len(),
                stderr_len = stderr.len(),
                "tool process finished"
            );
            Ok(RawOutput {
                stdout,
                stderr,
                exit_code,
            })
        },
        WaitOutcome::Finished(Err(e)) => Err(Error::Io(e)),
        WaitOutcome::TimedOut => {
            warn!(
                timeout_secs = opts.timeout.as_secs(),
                "tool process timed out, killing"
            );
            reap(&mut child).await;
            Err(Error::Timeout(opts.timeout))
        },
        WaitOutcome::Cancelled => {
            warn!("tool process cancelled, killing");
            reap(&mut child).await;
            Err(Error::Cancelled)
        },
    }
}

async fn reap(child: &mut Child) {
    let _ = child.start_kill();
    let _ = child.wait().await;
}

/// Read a pipe to EOF, keeping at most `cap` bytes. Draining continues
/// past the cap so the child is never blocked on a full pipe.
async fn read_capped<R>(reader: Option<R>, cap: usize) -> std::io::Result<String>
where
    R: AsyncRead + Unpin,
{
    let Some(mut reader) = reader else {
        return Ok(String::new());
    };

    let mut buf: Vec<u8> = Vec::new();
    let mut chunk = [0u8; 8192];
    let mut truncated = false;
    loop {
        let n = reader.read(&mut chunk).await?;
        if n == 0 {
            break;
        }
        if buf.len() < cap {
            let take = n.min(cap - buf.len());
            buf.extend_from_slice(&chunk[..take]);
            truncated |= take < n;
        } else {
            truncated = true;
        }
    }

    let mut text = String::from_utf8_lossy(&buf).into_owned();
    if truncated {
        text.push_str(TRUNCATION_MARKER);
    }
    Ok(text)
}
