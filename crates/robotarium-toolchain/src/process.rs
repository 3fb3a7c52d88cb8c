//! Toolchain process execution
//!
//! Every toolchain call spawns exactly one child process, waits for it, and
//! returns its merged output and raw exit code. A non-zero exit is a normal
//! [`CommandResult`]; only failing to start the process (or a timeout or
//! cancellation) is an [`Error`].

use std::future::Future;
use std::io::PipeReader;
use std::process::{ExitStatus, Stdio};
use std::time::Duration;

use tokio::process::Command;
use tokio::sync::watch;

use super::commands::Invocation;
use robotarium_core::prelude::*;
use robotarium_core::CommandResult;

/// Runs toolchain invocations.
///
/// Implemented by [`CliRunner`] for real processes and by the scripted fake
/// in `test_utils` for tests.
#[trait_variant::make(ProcessRunner: Send)]
pub trait LocalProcessRunner {
    /// Run one invocation to completion.
    async fn run(&self, invocation: &Invocation) -> Result<CommandResult>;
}

/// Per-command execution limits.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RunOptions {
    /// Kill the child and fail with [`Error::Timeout`] after this long
    pub timeout: Option<Duration>,
}

/// Runs invocations as real child processes via `tokio::process`.
///
/// stdout and stderr share one pipe, so the output keeps the order the tool
/// wrote it in.
#[derive(Debug, Clone, Default)]
pub struct CliRunner {
    options: RunOptions,
    cancel_rx: Option<watch::Receiver<bool>>,
}

impl CliRunner {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_options(options: RunOptions) -> Self {
        Self {
            options,
            cancel_rx: None,
        }
    }

    /// Abort in-flight commands once `true` is sent on the paired sender.
    pub fn with_cancellation(mut self, cancel_rx: watch::Receiver<bool>) -> Self {
        self.cancel_rx = Some(cancel_rx);
        self
    }

    pub fn options(&self) -> RunOptions {
        self.options
    }

    /// Race `work` against the timeout and the cancellation signal.
    async fn supervise<F, T>(&self, work: F, command: &str) -> Result<T>
    where
        F: Future<Output = std::io::Result<T>>,
    {
        let timeout = self.options.timeout;
        let deadline = async move {
            match timeout {
                Some(after) => tokio::time::sleep(after).await,
                None => std::future::pending::<()>().await,
            }
        };

        let cancel_rx = self.cancel_rx.clone();
        let cancelled = async move {
            match cancel_rx {
                Some(mut rx) => {
                    // Sender dropped without cancelling: never fire
                    if rx.wait_for(|cancel| *cancel).await.is_err() {
                        std::future::pending::<()>().await;
                    }
                }
                None => std::future::pending::<()>().await,
            }
        };

        tokio::select! {
            result = work => Ok(result?),
            _ = deadline => Err(Error::Timeout {
                command: command.to_string(),
                after: timeout.unwrap_or_default(),
            }),
            _ = cancelled => Err(Error::Cancelled {
                command: command.to_string(),
            }),
        }
    }
}

impl ProcessRunner for CliRunner {
    async fn run(&self, invocation: &Invocation) -> Result<CommandResult> {
        let command_line = invocation.to_string();
        info!("Running: {}", command_line);

        let (reader, writer) = std::io::pipe()
            .map_err(|e| Error::spawn(format!("{}: output pipe: {}", command_line, e)))?;
        let stderr = writer
            .try_clone()
            .map_err(|e| Error::spawn(format!("{}: output pipe: {}", command_line, e)))?;

        let mut command = Command::new(&invocation.program);
        command
            .args(&invocation.args)
            .stdin(Stdio::null())
            .stdout(writer)
            .stderr(stderr)
            .kill_on_drop(true);
        let spawned = command.spawn();
        // The write ends must close here or the reader never sees EOF
        drop(command);

        let mut child = spawned.map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                Error::ToolchainNotFound {
                    program: invocation.program.to_string_lossy().into_owned(),
                }
            } else {
                Error::spawn(format!("{}: {}", command_line, e))
            }
        })?;

        let work = async {
            let merged = read_merged(reader).await?;
            let status = child.wait().await?;
            Ok((merged, status))
        };

        let outcome = self.supervise(work, &command_line).await;
        let (merged, status) = match outcome {
            Ok(done) => done,
            Err(e) => {
                warn!("{}", e);
                if let Err(kill_err) = child.start_kill() {
                    debug!("Failed to kill child: {}", kill_err);
                }
                return Err(e);
            }
        };

        let exit_code = exit_code(status);
        debug!("`{}` exited with code {}", command_line, exit_code);

        Ok(CommandResult::from_raw(
            &String::from_utf8_lossy(&merged),
            exit_code,
        ))
    }
}

/// Read the shared output pipe until every writer has closed it.
#[cfg(unix)]
async fn read_merged(reader: PipeReader) -> std::io::Result<Vec<u8>> {
    use tokio::io::AsyncReadExt;

    let mut receiver =
        tokio::net::unix::pipe::Receiver::from_owned_fd(std::os::fd::OwnedFd::from(reader))?;
    let mut merged = Vec::new();
    receiver.read_to_end(&mut merged).await?;
    Ok(merged)
}

#[cfg(not(unix))]
async fn read_merged(mut reader: PipeReader) -> std::io::Result<Vec<u8>> {
    use std::io::Read;

    tokio::task::spawn_blocking(move || {
        let mut merged = Vec::new();
        reader.read_to_end(&mut merged)?;
        Ok(merged)
    })
    .await
    .map_err(std::io::Error::other)?
}

/// Raw exit code; signal-terminated children report `-<signal>` on unix.
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
