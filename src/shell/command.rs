//! Shell command execution.

use crate::error::{RequisiteError, Result};
use std::collections::HashMap;
use std::io::{BufRead, BufReader, Read};
use std::path::PathBuf;
use std::process::{Child, Command, Stdio};
use std::sync::mpsc::{self, RecvTimeoutError};
use std::thread;
use std::time::{Duration, Instant};

/// How often a running command is polled for its timeout.
const POLL_INTERVAL: Duration = Duration::from_millis(25);

/// Result of executing a shell command.
#[derive(Debug, Clone)]
pub struct CommandResult {
    /// Exit code (None if killed by signal).
    pub exit_code: Option<i32>,

    /// Standard output.
    pub stdout: String,

    /// Standard error.
    pub stderr: String,

    /// Execution duration.
    pub duration: Duration,

    /// Whether command succeeded (exit code 0).
    pub success: bool,
}

impl CommandResult {
    /// The last `n` non-empty lines of stderr, joined with newlines.
    pub fn stderr_tail(&self, n: usize) -> String {
        let lines: Vec<&str> = self
            .stderr
            .lines()
            .filter(|l| !l.trim().is_empty())
            .collect();
        let start = lines.len().saturating_sub(n);
        lines[start..].join("\n")
    }
}

/// Options for command execution.
#[derive(Debug, Clone, Default)]
pub struct CommandOptions {
    /// Working directory.
    pub cwd: Option<PathBuf>,

    /// Environment variables (merged with system env).
    pub env: HashMap<String, String>,

    /// Timeout in seconds (None = no timeout).
    pub timeout: Option<u64>,
}

/// Output line from command execution.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OutputLine {
    Stdout(String),
    Stderr(String),
}

impl OutputLine {
    /// The line text, regardless of stream.
    pub fn text(&self) -> &str {
        match self {
            OutputLine::Stdout(s) | OutputLine::Stderr(s) => s,
        }
    }
}

/// Execute a shell command, capturing its output.
pub fn execute(command: &str, options: &CommandOptions) -> Result<CommandResult> {
    execute_streaming(command, options, &mut |_| {})
}

/// Execute a command, handing each output line to `on_line` as it arrives.
///
/// `on_line` runs on the calling thread. When `options.timeout` elapses
/// the child is killed and `CommandTimedOut` is returned.
pub fn execute_streaming(
    command: &str,
    options: &CommandOptions,
    on_line: &mut dyn FnMut(OutputLine),
) -> Result<CommandResult> {
    let start = Instant::now();

    let mut cmd = shell_command(command);

    if let Some(cwd) = &options.cwd {
        cmd.current_dir(cwd);
    }

    for (key, value) in &options.env {
        cmd.env(key, value);
    }

    cmd.stdin(Stdio::null());
    cmd.stdout(Stdio::piped());
    cmd.stderr(Stdio::piped());

    let mut child = cmd
        .spawn()
        .map_err(|source| RequisiteError::CommandFailed {
            command: command.to_string(),
            source,
        })?;

    let (tx, rx) = mpsc::channel();
    let stdout_handle = child.stdout.take().map(|out| {
        let tx = tx.clone();
        thread::spawn(move || read_lines(out, |line| tx.send(OutputLine::Stdout(line))))
    });
    let stderr_handle = child.stderr.take().map(|err| {
        let tx = tx.clone();
        thread::spawn(move || read_lines(err, |line| tx.send(OutputLine::Stderr(line))))
    });
    drop(tx);

    let deadline = options.timeout.map(|secs| start + Duration::from_secs(secs));

    loop {
        match rx.recv_timeout(POLL_INTERVAL) {
            Ok(line) => on_line(line),
            Err(RecvTimeoutError::Disconnected) => break,
            Err(RecvTimeoutError::Timeout) => {}
        }
        check_deadline(command, options.timeout, deadline, &mut child)?;
    }

    // Both pipes are closed but the child may still be running.
    let status = loop {
        let exited = child
            .try_wait()
            .map_err(|source| RequisiteError::CommandFailed {
                command: command.to_string(),
                source,
            })?;
        if let Some(status) = exited {
            break status;
        }
        check_deadline(command, options.timeout, deadline, &mut child)?;
        thread::sleep(POLL_INTERVAL);
    };

    let stdout = stdout_handle
        .and_then(|h| h.join().ok())
        .unwrap_or_default();
    let stderr = stderr_handle
        .and_then(|h| h.join().ok())
        .unwrap_or_default();

    Ok(CommandResult {
        exit_code: status.code(),
        stdout,
        stderr,
        duration: start.elapsed(),
        success: status.success(),
    })
}

fn read_lines<R, F, E>(stream: R, mut send: F) -> String
where
    R: Read,
    F: FnMut(String) -> std::result::Result<(), E>,
{
    let reader = BufReader::new(stream);
    let mut output = String::new();
    for line in reader.lines().map_while(std::result::Result::ok) {
        output.push_str(&line);
        output.push('\n');
        let _ = send(line);
    }
    output
}

/// Kill the child and fail with `CommandTimedOut` once `deadline` has passed.
fn check_deadline(
    command: &str,
    timeout: Option<u64>,
    deadline: Option<Instant>,
    child: &mut Child,
) -> Result<()> {
    if let (Some(deadline), Some(seconds)) = (deadline, timeout) {
        if Instant::now() >= deadline {
            kill(child);
            tracing::debug!(command, seconds, "Command timed out");
            return Err(RequisiteError::CommandTimedOut {
                command: command.to_string(),
                seconds,
            });
        }
    }
    Ok(())
}

fn kill(child: &mut Child) {
    let _ = child.kill();
    let _ = child.wait();
}

/// Build the platform shell invocation for `command`.
fn shell_command(command: &str) -> Command {
    if cfg!(target_os = "windows") {
        let mut cmd = Command::new("cmd");
        cmd.arg("/C").arg(command);
        cmd
    } else {
        let mut cmd = Command::new("sh");
        cmd.arg("-c").arg(command);
        cmd
    }
}
