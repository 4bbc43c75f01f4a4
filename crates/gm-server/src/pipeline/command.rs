//! Runs the `gm` executable with an optional time budget.

use std::ffi::OsString;
use std::process::Stdio;
use std::time::Duration;

use tokio::io::AsyncReadExt;
use tokio::process::Command;
use tokio::task::JoinHandle;
use tokio::time::Instant;

use crate::error::ProcessError;

/// Launches `gm` and supervises it until it exits, fails, or runs out of time.
#[derive(Debug, Clone)]
pub struct CommandRunner {
    executable: String,
    timeout: Option<Duration>,
}

impl CommandRunner {
    pub fn new(executable: impl Into<String>, timeout: Option<Duration>) -> Self {
        Self {
            executable: executable.into(),
            timeout,
        }
    }

    /// Run the executable with `args` and wait for it to finish.
    ///
    /// With a timeout the whole call, including collecting stderr after a
    /// failure, fits in the budget. If the process is still running when the
    /// timer fires it is killed and reaped before [`ProcessError::Timeout`]
    /// is returned.
    pub async fn run(&self, args: &[OsString]) -> Result<(), ProcessError> {
        tracing::trace!("Running {} {:?}", self.executable, args);
        let budget = self.timeout.map(|limit| (limit, Instant::now() + limit));

        let mut child = Command::new(&self.executable)
            .args(args)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .spawn()
            .map_err(|source| ProcessError::Spawn {
                executable: self.executable.clone(),
                source,
            })?;

        // Drain stderr concurrently so a chatty tool can't block on a full pipe
        let stderr_task = child.stderr.take().map(|mut stderr| {
            tokio::spawn(async move {
                let mut buf = Vec::new();
                let _ = stderr.read_to_end(&mut buf).await;
                buf
            })
        });

        let status = match budget {
            Some((limit, deadline)) => {
                match tokio::time::timeout_at(deadline, child.wait()).await {
                    Ok(status) => status.map_err(ProcessError::Wait)?,
                    Err(_) => {
                        tracing::warn!(
                            "{} still running after {:?}, killing it",
                            self.executable,
                            limit
                        );
                        if let Err(e) = child.kill().await {
                            tracing::warn!("Failed to kill {}: {}", self.executable, e);
                        }
                        if let Some(task) = stderr_task {
                            task.abort();
                        }
                        return Err(ProcessError::Timeout { limit });
                    }
                }
            }
            None => child.wait().await.map_err(ProcessError::Wait)?,
        };

        if status.success() {
            return Ok(());
        }

        let stderr = match stderr_task {
            Some(task) => collect_stderr(task, budget.map(|(_, deadline)| deadline)).await,
            None => Vec::new(),
        };
        let stderr = String::from_utf8_lossy(&stderr).trim().to_string();
        tracing::warn!("{} exited with {}: {}", self.executable, status, stderr);
        Err(ProcessError::Failed { status, stderr })
    }
}

/// Wait for the stderr reader, but never past `deadline`.
///
/// A descendant of the tool can keep the pipe open after the tool itself has
/// exited; in that case the reader is abandoned and stderr reported empty.
async fn collect_stderr(mut task: JoinHandle<Vec<u8>>, deadline: Option<Instant>) -> Vec<u8> {
    let Some(deadline) = deadline else {
        return task.await.unwrap_or_default();
    };
    match tokio::time::timeout_at(deadline, &mut task).await {
        Ok(joined) => joined.unwrap_or_default(),
        Err(_) => {
            tracing::debug!("stderr still open at the deadline, dropping it");
            task.abort();
            Vec::new()
        }
    }
}
