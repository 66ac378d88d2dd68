// ABOUTME: Process-backed command runner built on tokio::process.
// ABOUTME: Streams stdout line by line to a callback while collecting stderr.

use std::fmt;
use std::path::{Path, PathBuf};
use std::process::Stdio;

use async_trait::async_trait;
use tokio::io::{AsyncBufReadExt, AsyncReadExt, BufReader};
use tokio::process::Command;

/// A program and its arguments.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandLine {
    pub program: PathBuf,
    pub args: Vec<String>,
}

impl CommandLine {
    pub fn new(program: impl Into<PathBuf>, args: impl IntoIterator<Item = impl Into<String>>) -> Self {
        Self {
            program: program.into(),
            args: args.into_iter().map(Into::into).collect(),
        }
    }
}

impl fmt::Display for CommandLine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "\"{}\"", self.program.display())?;
        for arg in &self.args {
            write!(f, " {arg}")?;
        }
        Ok(())
    }
}

/// `(succeeded, explanation)` for a finished command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandOutcome {
    pub succeeded: bool,
    pub explanation: Option<String>,
}

impl CommandOutcome {
    pub fn success() -> Self {
        Self {
            succeeded: true,
            explanation: None,
        }
    }

    pub fn failure(explanation: impl Into<String>) -> Self {
        Self {
            succeeded: false,
            explanation: Some(explanation.into()),
        }
    }
}

/// Full output of a command run to completion.
#[derive(Debug, Clone, Default)]
pub struct CapturedOutput {
    pub success: bool,
    pub stdout: String,
    pub stderr: String,
}

/// Runs external commands.
#[async_trait]
pub trait CommandRunner: Send + Sync {
    /// Run to completion, passing each stdout line to `on_stdout_line`.
    /// Success means the process exited with a success status.
    async fn run(
        &self,
        command: &CommandLine,
        working_dir: Option<&Path>,
        on_stdout_line: &mut (dyn for<'l> FnMut(&'l str) + Send),
    ) -> CommandOutcome;

    /// Run to completion and return everything it printed.
    async fn capture(&self, command: &CommandLine, working_dir: Option<&Path>) -> CapturedOutput;
}

/// Runs commands as child processes with no console window or stdin.
#[derive(Debug, Clone, Copy, Default)]
pub struct ProcessRunner;

impl ProcessRunner {
    fn command(command: &CommandLine, working_dir: Option<&Path>) -> Command {
        let mut cmd = Command::new(&command.program);
        cmd.args(&command.args)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true);
        if let Some(dir) = working_dir {
            cmd.current_dir(dir);
        }
        cmd
    }
}

#[async_trait]
impl CommandRunner for ProcessRunner {
    async fn run(
        &self,
        command: &CommandLine,
        working_dir: Option<&Path>,
        on_stdout_line: &mut (dyn for<'l> FnMut(&'l str) + Send),
    ) -> CommandOutcome {
        tracing::info!(%command, "running command");

        let mut child = match Self::command(command, working_dir).spawn() {
            Ok(child) => child,
            Err(e) => {
                tracing::error!(%command, error = %e, "failed to spawn command");
                return CommandOutcome::failure(e.to_string());
            }
        };

        let stderr_task = child.stderr.take().map(|mut stderr| {
            tokio::spawn(async move {
                let mut buf = String::new();
                let _ = stderr.read_to_string(&mut buf).await;
                buf
            })
        });

        if let Some(stdout) = child.stdout.take() {
            let mut lines = BufReader::new(stdout).lines();
            while let Ok(Some(line)) = lines.next_line().await {
                on_stdout_line(&line);
            }
        }

        let status = match child.wait().await {
            Ok(status) => status,
            Err(e) => return CommandOutcome::failure(e.to_string()),
        };

        let stderr = match stderr_task {
            Some(task) => task.await.unwrap_or_default(),
            None => String::new(),
        };

        if status.success() {
            tracing::info!(%command, "command completed successfully");
            return CommandOutcome::success();
        }

        tracing::warn!(%command, exit_code = ?status.code(), "command failed");
        let stderr = stderr.trim();
        if stderr.is_empty() {
            CommandOutcome::failure(format!("exited with status {status}"))
        } else {
            CommandOutcome::failure(stderr.to_string())
        }
    }

    async fn capture(&self, command: &CommandLine, working_dir: Option<&Path>) -> CapturedOutput {
        match Self::command(command, working_dir).output().await {
            Ok(output) => CapturedOutput {
                success: output.status.success(),
                stdout: String::from_utf8_lossy(&output.stdout).to_string(),
                stderr: String::from_utf8_lossy(&output.stderr).to_string(),
            },
            Err(e) => {
                tracing::error!(%command, error = %e, "failed to execute command");
                CapturedOutput {
                    success: false,
                    stdout: String::new(),
                    stderr: e.to_string(),
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn command_line_display_quotes_program() {
        let line = CommandLine::new("/usr/local/bin/cf", ["target", "-o", "acme"]);
        assert_eq!(line.to_string(), "\"/usr/local/bin/cf\" target -o acme");
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn stdout_lines_reach_callback() {
        let line = CommandLine::new("sh", ["-c", "echo one; echo two"]);
        let mut seen = Vec::new();
        let outcome = ProcessRunner
            .run(&line, None, &mut |l: &str| seen.push(l.to_string()))
            .await;

        assert!(outcome.succeeded);
        assert_eq!(seen, ["one", "two"]);
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn nonzero_exit_reports_stderr() {
        let line = CommandLine::new("sh", ["-c", "echo broken >&2; exit 3"]);
        let outcome = ProcessRunner.run(&line, None, &mut |_: &str| {}).await;

        assert!(!outcome.succeeded);
        assert_eq!(outcome.explanation.as_deref(), Some("broken"));
    }

    #[tokio::test]
    async fn missing_program_is_a_failure() {
        let line = CommandLine::new("/definitely/not/a/real/program", Vec::<String>::new());
        let outcome = ProcessRunner.run(&line, None, &mut |_: &str| {}).await;
        assert!(!outcome.succeeded);
        assert!(outcome.explanation.is_some());
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn capture_collects_both_streams() {
        let line = CommandLine::new("sh", ["-c", "echo out; echo err >&2"]);
        let output = ProcessRunner.capture(&line, None).await;
        assert!(output.success);
        assert_eq!(output.stdout.trim(), "out");
        assert_eq!(output.stderr.trim(), "err");
    }
}
