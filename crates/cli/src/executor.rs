// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Notebook execution engine.
//!
//! Execution is delegated to an external program that runs every cell of a
//! notebook against a named kernel. The default engine is
//! `jupyter nbconvert --execute`, fed the parsed document on stdin and
//! returning the executed document on stdout, so nothing is written to disk.

use std::io::{self, Read, Write};
use std::process::{Child, Command, ExitStatus, Output, Stdio};
use std::thread::JoinHandle;
use std::time::{Duration, Instant};

use crate::notebook::{Notebook, NotebookError};

/// Kernel used when none is configured.
pub const DEFAULT_KERNEL: &str = "python3";

/// Wall-clock limit used when none is configured.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(600);

/// Engine command used when none is configured.
pub const DEFAULT_COMMAND: &[&str] = &["jupyter", "nbconvert"];

/// Number of trailing stderr lines kept for diagnostics.
const STDERR_EXCERPT_LINES: usize = 20;

const POLL_INTERVAL: Duration = Duration::from_millis(50);

/// Options handed to the execution engine for every notebook.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExecuteOptions {
    /// Name of the kernel that runs the cells.
    pub kernel: String,
    /// Wall-clock limit for one notebook.
    pub timeout: Duration,
}

impl Default for ExecuteOptions {
    fn default() -> Self {
        Self {
            kernel: DEFAULT_KERNEL.to_string(),
            timeout: DEFAULT_TIMEOUT,
        }
    }
}

/// Errors raised while executing a notebook.
#[derive(Debug, thiserror::Error)]
pub enum ExecuteError {
    /// The document could not be serialized for the engine.
    #[error("cannot encode notebook: {0}")]
    Encode(#[source] NotebookError),

    /// The engine process could not be started.
    #[error("failed to spawn {program}: {source}")]
    Spawn {
        program: String,
        #[source]
        source: io::Error,
    },

    /// Communication with the engine failed.
    #[error("failed to run execution engine: {0}")]
    Io(#[source] io::Error),

    /// The notebook did not finish within the time limit.
    #[error("{}", timeout_message(.timeout))]
    TimedOut { timeout: Duration },

    /// The engine reported an error (a cell raised, the kernel died, ...).
    #[error("execution engine exited with {status}{}", excerpt_suffix(.stderr))]
    Failed { status: ExitStatus, stderr: String },

    /// The engine succeeded but its output is not a notebook document.
    #[error("execution engine returned an invalid notebook: {0}")]
    InvalidOutput(#[source] NotebookError),
}

fn timeout_message(timeout: &Duration) -> String {
    format_timeout_error(*timeout)
}

fn excerpt_suffix(stderr: &str) -> String {
    if stderr.is_empty() {
        String::new()
    } else {
        format!("\n{stderr}")
    }
}

/// Trait for pluggable execution engines.
pub trait Executor: Send + Sync {
    /// Engine name used in diagnostics.
    fn name(&self) -> &str;

    /// Check if the engine can be launched at all.
    fn available(&self) -> bool;

    /// Run every cell of `notebook` in order.
    ///
    /// Returns the executed document, or `None` when the engine produced
    /// no document at all.
    fn execute(
        &self,
        notebook: Notebook,
        opts: &ExecuteOptions,
    ) -> Result<Option<Notebook>, ExecuteError>;
}

/// Engine driven through `jupyter nbconvert` (or a compatible command).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NbconvertExecutor {
    program: String,
    args: Vec<String>,
}

impl Default for NbconvertExecutor {
    fn default() -> Self {
        Self {
            program: DEFAULT_COMMAND[0].to_string(),
            args: DEFAULT_COMMAND[1..].iter().map(|s| s.to_string()).collect(),
        }
    }
}

impl NbconvertExecutor {
    /// Build an engine from a command line. Returns `None` if it is empty.
    pub fn from_command(command: &[String]) -> Option<Self> {
        let (program, args) = command.split_first()?;
        Some(Self {
            program: program.clone(),
            args: args.to_vec(),
        })
    }

    /// Program launched for each notebook.
    pub fn program(&self) -> &str {
        &self.program
    }

    /// Arguments appended after the configured command.
    pub fn execute_args(opts: &ExecuteOptions) -> Vec<String> {
        vec![
            "--to".to_string(),
            "notebook".to_string(),
            "--execute".to_string(),
            "--stdin".to_string(),
            "--stdout".to_string(),
            format!(
                "--ExecutePreprocessor.timeout={}",
                opts.timeout.as_secs().max(1)
            ),
            format!("--ExecutePreprocessor.kernel_name={}", opts.kernel),
        ]
    }
}

impl Executor for NbconvertExecutor {
    fn name(&self) -> &str {
        &self.program
    }

    fn available(&self) -> bool {
        Command::new(&self.program)
            .args(&self.args)
            .arg("--version")
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .status()
            .is_ok_and(|s| s.success())
    }

    fn execute(
        &self,
        notebook: Notebook,
        opts: &ExecuteOptions,
    ) -> Result<Option<Notebook>, ExecuteError> {
        let input = notebook.to_vec().map_err(ExecuteError::Encode)?;

        let mut cmd = Command::new(&self.program);
        cmd.args(&self.args)
            .args(Self::execute_args(opts))
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped());

        // Kernels started by the engine share its group, so a timeout can reap them too
        #[cfg(unix)]
        {
            use std::os::unix::process::CommandExt;
            cmd.process_group(0);
        }

        tracing::trace!("spawning {:?}", cmd);
        let child = cmd.spawn().map_err(|source| ExecuteError::Spawn {
            program: self.program.clone(),
            source,
        })?;

        let output = match run_with_timeout(child, input, Some(opts.timeout)) {
            Ok(out) => out,
            Err(e) if e.kind() == io::ErrorKind::TimedOut => {
                return Err(ExecuteError::TimedOut {
                    timeout: opts.timeout,
                });
            }
            Err(e) => return Err(ExecuteError::Io(e)),
        };

        if !output.status.success() {
            return Err(ExecuteError::Failed {
                status: output.status,
                stderr: stderr_excerpt(&output.stderr),
            });
        }

        if output.stdout.iter().all(u8::is_ascii_whitespace) {
            return Ok(None);
        }

        Notebook::from_slice(&output.stdout)
            .map(Some)
            .map_err(ExecuteError::InvalidOutput)
    }
}

/// Format a timeout error message with advice.
pub fn format_timeout_error(timeout: Duration) -> String {
    format!(
        "timed out after {:?} - check for long-running cells or a kernel that failed to start",
        timeout
    )
}

/// Keep the trailing lines of engine stderr, where tracebacks end up.
pub fn stderr_excerpt(stderr: &[u8]) -> String {
    let text = String::from_utf8_lossy(stderr);
    let lines: Vec<&str> = text.trim_end().lines().collect();
    let start = lines.len().saturating_sub(STDERR_EXCERPT_LINES);
    lines[start..].join("\n")
}

fn drain<R: Read + Send + 'static>(pipe: Option<R>) -> JoinHandle<Vec<u8>> {
    std::thread::spawn(move || {
        let mut buf = Vec::new();
        if let Some(mut pipe) = pipe {
            pipe.read_to_end(&mut buf).ok();
        }
        buf
    })
}

/// Kill the child and, on unix, every process in the group it leads.
///
/// A child that does not lead its own group is killed alone.
fn kill_process_group(child: &mut Child) {
    #[cfg(unix)]
    {
        use nix::sys::signal::{Signal, killpg};
        use nix::unistd::Pid;

        if let Ok(pid) = i32::try_from(child.id())
            && let Err(err) = killpg(Pid::from_raw(pid), Signal::SIGKILL)
        {
            tracing::debug!("killpg({}) failed: {}", pid, err);
        }
    }
    child.kill().ok();
}

/// Run a child process with stdin input and an optional timeout.
///
/// Stdin is written and stdout/stderr are drained on helper threads so a
/// chatty child never blocks on a full pipe. If timeout is None, waits
/// indefinitely. If the timeout expires, kills the process (and its process
/// group, when it leads one) and returns a TimedOut error.
pub fn run_with_timeout(
    mut child: Child,
    input: Vec<u8>,
    timeout: Option<Duration>,
) -> io::Result<Output> {
    let stdin = child.stdin.take();
    let writer = std::thread::spawn(move || -> io::Result<()> {
        if let Some(mut stdin) = stdin {
            stdin.write_all(&input)?;
        }
        Ok(())
    });
    let stdout = drain(child.stdout.take());
    let stderr = drain(child.stderr.take());

    let start = Instant::now();
    let status = loop {
        if let Some(status) = child.try_wait()? {
            break status;
        }
        if let Some(t) = timeout
            && start.elapsed() > t
        {
            kill_process_group(&mut child);
            child.wait().ok();
            return Err(io::Error::new(
                io::ErrorKind::TimedOut,
                format!("command timed out after {:?}", t),
            ));
        }
        std::thread::sleep(POLL_INTERVAL);
    };

    // Broken pipe is expected when the child exits without reading stdin
    if let Ok(Err(e)) = writer.join() {
        tracing::debug!("stdin not fully consumed: {}", e);
    }

    Ok(Output {
        status,
        stdout: stdout.join().unwrap_or_default(),
        stderr: stderr.join().unwrap_or_default(),
    })
}

#[cfg(test)]
#[path = "executor_tests.rs"]
mod tests;
