//! Generator subprocess execution.
//!
//! Arguments are handed to the operating system as an argv array, never
//! through a shell, so text like `"; rm -rf /"` reaches the generator as a
//! single opaque argument.

use std::ffi::{OsStr, OsString};
use std::io::Read;
use std::path::{Path, PathBuf};
use std::process::{Child, Command, ExitStatus, Stdio};
use std::thread::JoinHandle;
use std::time::{Duration, Instant};

use crate::error::{CodegenError, CodegenResult};

/// Polling interval while waiting on a child under a deadline.
const POLL_INTERVAL: Duration = Duration::from_millis(50);

/// Options applied to a single command invocation.
#[derive(Debug, Clone, Default)]
pub struct RunOptions {
    /// Working directory for the child process.
    pub working_dir: Option<PathBuf>,
    /// Additional environment variables.
    pub env: Vec<(OsString, OsString)>,
    /// Kill the child and fail if it runs longer than this. `None` blocks
    /// until the child exits.
    pub timeout: Option<Duration>,
}

impl RunOptions {
    /// Sets the working directory.
    pub fn working_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.working_dir = Some(dir.into());
        self
    }

    /// Adds an environment variable.
    pub fn env(mut self, key: impl Into<OsString>, value: impl Into<OsString>) -> Self {
        self.env.push((key.into(), value.into()));
        self
    }

    /// Sets the deadline.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }
}

/// Exit code and output lines of a finished command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunOutput {
    /// Process exit code; `-1` when the process was terminated by a signal.
    pub exit_code: i32,
    /// Trimmed stdout split into lines, followed by trimmed stderr as one
    /// final entry when the command failed.
    pub lines: Vec<String>,
}

impl RunOutput {
    /// Returns true if the command exited with code 0.
    pub fn success(&self) -> bool {
        self.exit_code == 0
    }

    /// All output lines joined with `\n`.
    pub fn combined(&self) -> String {
        self.lines.join("\n")
    }
}

/// Executes generator binaries.
///
/// The production implementation is [`ProcessRunner`]; tests substitute a
/// recording runner so engine behavior can be checked without spawning.
pub trait CommandRunner: Send + Sync {
    /// Runs `program` with `args` and waits for it to finish.
    fn run(
        &self,
        program: &Path,
        args: &[OsString],
        options: &RunOptions,
    ) -> CodegenResult<RunOutput>;
}

/// Runs commands with [`std::process::Command`].
#[derive(Debug, Clone, Copy, Default)]
pub struct ProcessRunner;

impl ProcessRunner {
    /// Creates a new process runner.
    pub fn new() -> Self {
        Self
    }
}

impl CommandRunner for ProcessRunner {
    fn run(
        &self,
        program: &Path,
        args: &[OsString],
        options: &RunOptions,
    ) -> CodegenResult<RunOutput> {
        let mut cmd = Command::new(program);
        cmd.args(args);

        for (key, value) in &options.env {
            cmd.env(key, value);
        }
        if let Some(ref cwd) = options.working_dir {
            cmd.current_dir(cwd);
        }

        cmd.stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped());

        let mut child = cmd
            .spawn()
            .map_err(|e| CodegenError::spawn_failed(program, e))?;

        // Drain both pipes concurrently so a chatty child can't block on a full pipe.
        let stdout_reader = spawn_reader(child.stdout.take());
        let stderr_reader = spawn_reader(child.stderr.take());

        let status = wait_with_timeout(&mut child, options.timeout)?;

        let stdout = join_reader(stdout_reader)?;
        let stderr = join_reader(stderr_reader)?;

        let exit_code = status.code().unwrap_or(-1);
        let mut lines = split_output_lines(&String::from_utf8_lossy(&stdout));

        if exit_code != 0 {
            let stderr = String::from_utf8_lossy(&stderr);
            let stderr = stderr.trim();
            if !stderr.is_empty() {
                lines.push(stderr.to_string());
            }
        }

        Ok(RunOutput { exit_code, lines })
    }
}

/// Splits trimmed output on `\r\n`, `\n` or `\r`. Blank output has no lines.
pub fn split_output_lines(output: &str) -> Vec<String> {
    let trimmed = output.trim();
    if trimmed.is_empty() {
        return Vec::new();
    }

    trimmed
        .replace("\r\n", "\n")
        .split(['\n', '\r'])
        .map(str::to_string)
        .collect()
}

/// Renders a command line for logs. Not for execution.
pub fn display_command(program: &Path, args: &[OsString]) -> String {
    std::iter::once(program.as_os_str())
        .chain(args.iter().map(OsString::as_os_str))
        .map(OsStr::to_string_lossy)
        .collect::<Vec<_>>()
        .join(" ")
}

fn spawn_reader<R>(stream: Option<R>) -> Option<JoinHandle<std::io::Result<Vec<u8>>>>
where
    R: Read + Send + 'static,
{
    stream.map(|mut stream| {
        std::thread::spawn(move || {
            let mut buf = Vec::new();
            stream.read_to_end(&mut buf)?;
            Ok(buf)
        })
    })
}

fn join_reader(handle: Option<JoinHandle<std::io::Result<Vec<u8>>>>) -> CodegenResult<Vec<u8>> {
    match handle {
        Some(handle) => {
            let joined = handle.join().map_err(|_| {
                CodegenError::WaitFailed(std::io::Error::other("output reader panicked"))
            })?;
            joined.map_err(CodegenError::WaitFailed)
        }
        None => Ok(Vec::new()),
    }
}

/// Waits for a child process, killing it once `timeout` elapses.
fn wait_with_timeout(child: &mut Child, timeout: Option<Duration>) -> CodegenResult<ExitStatus> {
    let Some(timeout) = timeout else {
        return child.wait().map_err(CodegenError::WaitFailed);
    };

    let start = Instant::now();

    loop {
        match child.try_wait() {
            Ok(Some(status)) => return Ok(status),
            Ok(None) => {
                if start.elapsed() > timeout {
                    let _ = child.kill();
                    let _ = child.wait();
                    return Err(CodegenError::Timeout { timeout });
                }
                std::thread::sleep(POLL_INTERVAL);
            }
            Err(e) => return Err(CodegenError::WaitFailed(e)),
        }
    }
}
