//! Bounded execution of external commands.
//!
//! Every git invocation goes through [`CommandRunner`], which owns the
//! working-directory, output-capture and timeout policy:
//!
//! - stdin is closed, stdout and stderr are captured in full
//! - the command gets a hard wall-clock budget
//! - on unix the child is placed in its own process group so that a timeout
//!   kills the command together with anything it spawned
//! - children are `kill_on_drop`, so dropping the future also ends the process

use crate::{Error, Result};
use std::ffi::{OsStr, OsString};
use std::path::{Path, PathBuf};
use std::process::{ExitStatus, Stdio};
use std::time::{Duration, Instant};
use tokio::io::{AsyncRead, AsyncReadExt};
use tokio::process::{Child, Command};
use tokio::task::JoinHandle;
use tracing::{debug, warn};

const DRAIN_AFTER_KILL: Duration = Duration::from_secs(2);

/// Captured result of a finished command
#[derive(Debug, Clone)]
pub struct CommandOutput {
    /// Exit status of the process
    pub status: ExitStatus,
    /// Standard output, lossily decoded
    pub stdout: String,
    /// Standard error, lossily decoded
    pub stderr: String,
}

/// Runs one external program with a fixed timeout
#[derive(Debug, Clone)]
pub struct CommandRunner {
    program: OsString,
    timeout: Duration,
}

impl CommandRunner {
    /// Create a runner for `program` with the given per-invocation timeout
    pub fn new(program: impl Into<OsString>, timeout: Duration) -> Self {
        Self {
            program: program.into(),
            timeout,
        }
    }

    /// The program this runner executes
    #[must_use]
    pub fn program(&self) -> &OsStr {
        &self.program
    }

    /// The per-invocation timeout
    #[must_use]
    pub const fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Run the command and return its trimmed stdout.
    ///
    /// A non-zero exit is an [`Error::ExternalTool`] carrying both captured
    /// streams; an elapsed timeout is an [`Error::ExternalToolTimeout`].
    pub async fn run<S: AsRef<OsStr>>(&self, args: &[S], working_dir: &Path) -> Result<String> {
        let command = self.command_line(args);
        let output = self.output(args, working_dir).await?;

        if !output.status.success() {
            warn!(
                command = %command,
                cwd = %working_dir.display(),
                code = ?output.status.code(),
                "External command failed"
            );
            return Err(Error::ExternalTool {
                command,
                working_dir: working_dir.to_path_buf(),
                exit_code: output.status.code(),
                reason: format!("exited with {}", output.status),
                stdout: output.stdout,
                stderr: output.stderr,
                source: None,
            });
        }

        Ok(output.stdout.trim().to_string())
    }

    /// Run the command and return its output regardless of exit status.
    ///
    /// Only spawn failures and timeouts are errors here.
    pub async fn output<S: AsRef<OsStr>>(
        &self,
        args: &[S],
        working_dir: &Path,
    ) -> Result<CommandOutput> {
        let command = self.command_line(args);
        let start = Instant::now();
        debug!(command = %command, cwd = %working_dir.display(), "Running external command");

        let mut cmd = Command::new(&self.program);
        cmd.args(args)
            .current_dir(working_dir)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true);

        #[cfg(unix)]
        cmd.process_group(0);

        let mut child = cmd
            .spawn()
            .map_err(|e| Error::spawn(command.clone(), working_dir, e))?;

        // Recorded before waiting: a reaped child no longer reports its pid,
        // but its process group can outlive it.
        let group = child.id();
        let mut stdout = child.stdout.take().map(|pipe| tokio::spawn(read_stream(pipe)));
        let mut stderr = child.stderr.take().map(|pipe| tokio::spawn(read_stream(pipe)));

        let finished = tokio::time::timeout(self.timeout, async {
            let status = child.wait().await?;
            let stdout = collect_stream(&mut stdout).await;
            let stderr = collect_stream(&mut stderr).await;
            Ok::<_, std::io::Error>(CommandOutput {
                status,
                stdout,
                stderr,
            })
        })
        .await;

        match finished {
            Ok(Ok(output)) => {
                debug!(
                    command = %command,
                    code = ?output.status.code(),
                    duration_ms = start.elapsed().as_millis(),
                    "External command finished"
                );
                Ok(output)
            }
            Ok(Err(e)) => {
                terminate(&mut child, group).await;
                Err(Error::spawn(command, working_dir, e))
            }
            Err(_elapsed) => {
                warn!(
                    command = %command,
                    timeout_secs = self.timeout.as_secs(),
                    "External command timed out, killing process group"
                );
                terminate(&mut child, group).await;
                Err(Error::ExternalToolTimeout {
                    command,
                    working_dir: working_dir.to_path_buf(),
                    seconds: self.timeout.as_secs(),
                    stdout: collect_stream_after_kill(&mut stdout).await,
                    stderr: collect_stream_after_kill(&mut stderr).await,
                })
            }
        }
    }

    /// Human-readable command line used in logs and errors
    fn command_line<S: AsRef<OsStr>>(&self, args: &[S]) -> String {
        let program = PathBuf::from(&self.program);
        let name = program
            .file_name()
            .map_or_else(|| self.program.to_string_lossy(), |n| n.to_string_lossy());
        let mut line = name.into_owned();
        for arg in args {
            line.push(' ');
            line.push_str(&arg.as_ref().to_string_lossy());
        }
        line
    }
}

async fn read_stream<R: AsyncRead + Unpin>(mut pipe: R) -> Vec<u8> {
    let mut buf = Vec::new();
    if let Err(e) = pipe.read_to_end(&mut buf).await {
        debug!(error = %e, "Stopped reading command output");
    }
    buf
}

/// Wait for a reader task and take its output.
///
/// The slot is cleared only once the task has finished, so a wait cancelled
/// by the timeout can be resumed afterwards.
async fn collect_stream(slot: &mut Option<JoinHandle<Vec<u8>>>) -> String {
    let Some(handle) = slot.as_mut() else {
        return String::new();
    };
    let bytes = handle.await.unwrap_or_default();
    *slot = None;
    String::from_utf8_lossy(&bytes).into_owned()
}

/// Output readers can hang if a grandchild escaped the process group and
/// still holds the pipe, so only wait briefly once the child was killed.
async fn collect_stream_after_kill(slot: &mut Option<JoinHandle<Vec<u8>>>) -> String {
    match tokio::time::timeout(DRAIN_AFTER_KILL, collect_stream(slot)).await {
        Ok(output) => output,
        Err(_elapsed) => {
            if let Some(handle) = slot.take() {
                handle.abort();
            }
            String::new()
        }
    }
}

/// Kill the child and everything in its process group, then reap it.
///
/// `group` is the child's pid captured at spawn time; the group is signalled
/// even when the child itself has already exited and left members behind.
async fn terminate(child: &mut Child, group: Option<u32>) {
    #[cfg(unix)]
    if let Some(pgid) = group.and_then(|pid| i32::try_from(pid).ok()) {
        // SAFETY: the child was spawned with `process_group(0)`, so its pid is
        // also its process group id. A negative pid addresses the whole group.
        #[expect(unsafe_code, reason = "Required for POSIX process group signalling")]
        unsafe {
            libc::kill(-pgid, libc::SIGKILL);
        }
    }
    #[cfg(not(unix))]
    let _ = group;

    if let Err(e) = child.kill().await {
        debug!(error = %e, "Child already gone");
    }
}

#[cfg(all(test, unix))]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn shell(timeout: Duration) -> CommandRunner {
        CommandRunner::new("sh", timeout)
    }

    #[tokio::test]
    async fn test_run_returns_trimmed_stdout() {
        let dir = TempDir::new().unwrap();
        let runner = shell(Duration::from_secs(10));

        let out = runner
            .run(&["-c", "echo '  hello  '"], dir.path())
            .await
            .unwrap();
        assert_eq!(out, "hello");
    }

    #[tokio::test]
    async fn test_run_uses_working_directory() {
        let dir = TempDir::new().unwrap();
        std::fs::write(dir.path().join("marker.txt"), "x").unwrap();
        let runner = shell(Duration::from_secs(10));

        let out = runner.run(&["-c", "ls"], dir.path()).await.unwrap();
        assert!(out.contains("marker.txt"));
    }

    #[tokio::test]
    async fn test_non_zero_exit_captures_both_streams() {
        let dir = TempDir::new().unwrap();
        let runner = shell(Duration::from_secs(10));

        let error = runner
            .run(&["-c", "echo out; echo err >&2; exit 3"], dir.path())
            .await
            .unwrap_err();

        match error {
            Error::ExternalTool {
                command,
                working_dir,
                exit_code,
                stdout,
                stderr,
                ..
            } => {
                assert!(command.starts_with("sh -c"));
                assert_eq!(working_dir, dir.path());
                assert_eq!(exit_code, Some(3));
                assert_eq!(stdout.trim(), "out");
                assert_eq!(stderr.trim(), "err");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_missing_program_is_external_tool_error() {
        let dir = TempDir::new().unwrap();
        let runner = CommandRunner::new("gitbench-no-such-program", Duration::from_secs(5));

        let error = runner.run(&["--version"], dir.path()).await.unwrap_err();
        assert!(matches!(
            error,
            Error::ExternalTool {
                exit_code: None,
                source: Some(_),
                ..
            }
        ));
    }

    #[tokio::test]
    async fn test_output_does_not_fail_on_exit_code() {
        let dir = TempDir::new().unwrap();
        let runner = shell(Duration::from_secs(10));

        let output = runner.output(&["-c", "exit 1"], dir.path()).await.unwrap();
        assert!(!output.status.success());
    }

    #[tokio::test]
    async fn test_command_line_uses_program_file_name() {
        let runner = CommandRunner::new("/usr/bin/git", Duration::from_secs(1));
        assert_eq!(
            runner.command_line(&["rev-parse", "HEAD"]),
            "git rev-parse HEAD"
        );
    }
}
