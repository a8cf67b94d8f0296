//! Child process execution using tokio::process.
//!
//! Every external command goes through a [`CommandRunner`], so the installer
//! and checker can be driven by a fake runner in tests.

use std::path::PathBuf;
use std::process::Stdio;
use std::time::Duration;

use async_trait::async_trait;
use grumgen_core::{GrumgenError, Result};
use serde::Serialize;
use tokio::process::Command;
use tokio::time::timeout;
use tracing::{debug, instrument, warn};

/// A fully described external command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandSpec {
    pub program: PathBuf,
    pub args: Vec<String>,
    pub working_dir: Option<PathBuf>,
    pub timeout: Duration,
}

impl CommandSpec {
    pub fn new(program: impl Into<PathBuf>, timeout: Duration) -> Self {
        Self {
            program: program.into(),
            args: Vec::new(),
            working_dir: None,
            timeout,
        }
    }

    pub fn arg(mut self, arg: impl Into<String>) -> Self {
        self.args.push(arg.into());
        self
    }

    pub fn args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.args.extend(args.into_iter().map(Into::into));
        self
    }

    pub fn current_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.working_dir = Some(dir.into());
        self
    }

    /// Name used in logs and errors.
    pub fn tool_name(&self) -> String {
        self.program
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| self.program.display().to_string())
    }

    /// Shell-like rendering for logs.
    pub fn display(&self) -> String {
        let mut rendered = self.program.display().to_string();
        for arg in &self.args {
            rendered.push(' ');
            rendered.push_str(arg);
        }
        rendered
    }
}

/// How a process ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ProcessStatus {
    Success,
    Failed,
    TimedOut,
}

/// Captured result of one process invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProcessResult {
    /// `None` when the process timed out or was killed by a signal.
    pub exit_code: Option<i32>,
    pub stdout: String,
    pub stderr: String,
    pub status: ProcessStatus,
}

impl ProcessResult {
    pub fn success(stdout: impl Into<String>) -> Self {
        Self {
            exit_code: Some(0),
            stdout: stdout.into(),
            stderr: String::new(),
            status: ProcessStatus::Success,
        }
    }

    pub fn failed(exit_code: i32, stderr: impl Into<String>) -> Self {
        Self {
            exit_code: Some(exit_code),
            stdout: String::new(),
            stderr: stderr.into(),
            status: ProcessStatus::Failed,
        }
    }

    pub fn timed_out() -> Self {
        Self {
            exit_code: None,
            stdout: String::new(),
            stderr: String::new(),
            status: ProcessStatus::TimedOut,
        }
    }

    pub fn is_success(&self) -> bool {
        self.status == ProcessStatus::Success
    }

    /// Stdout followed by stderr.
    pub fn combined_output(&self) -> String {
        let mut combined = self.stdout.clone();
        if !self.stderr.is_empty() {
            if !combined.is_empty() && !combined.ends_with('\n') {
                combined.push('\n');
            }
            combined.push_str(&self.stderr);
        }
        combined
    }

    /// One-line failure description for reports.
    pub fn failure_summary(&self) -> String {
        match self.status {
            ProcessStatus::Success => "succeeded".to_string(),
            ProcessStatus::TimedOut => "timed out".to_string(),
            ProcessStatus::Failed => {
                let code = self
                    .exit_code
                    .map_or_else(|| "signal".to_string(), |c| c.to_string());
                let detail = self.stderr.trim().lines().last().unwrap_or_default();
                if detail.is_empty() {
                    format!("exit code {code}")
                } else {
                    format!("exit code {code}: {detail}")
                }
            }
        }
    }
}

/// Runs external commands.
///
/// A non-zero exit or a timeout is a normal [`ProcessResult`]; only failing to
/// start the process is an error.
#[async_trait]
pub trait CommandRunner: Send + Sync {
    async fn run(&self, spec: &CommandSpec) -> Result<ProcessResult>;
}

/// [`CommandRunner`] backed by `tokio::process`.
#[derive(Debug, Clone, Copy, Default)]
pub struct TokioRunner;

impl TokioRunner {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl CommandRunner for TokioRunner {
    #[instrument(level = "debug", skip_all, fields(command = %spec.display()))]
    async fn run(&self, spec: &CommandSpec) -> Result<ProcessResult> {
        let mut cmd = Command::new(&spec.program);
        cmd.args(&spec.args)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true);
        if let Some(dir) = &spec.working_dir {
            cmd.current_dir(dir);
        }

        match timeout(spec.timeout, cmd.output()).await {
            Ok(Ok(output)) => {
                let result = ProcessResult {
                    exit_code: output.status.code(),
                    stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
                    stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
                    status: if output.status.success() {
                        ProcessStatus::Success
                    } else {
                        ProcessStatus::Failed
                    },
                };
                debug!(exit_code = ?result.exit_code, "process finished");
                Ok(result)
            }
            Ok(Err(e)) => Err(GrumgenError::tool_failure(
                spec.tool_name(),
                format!("failed to execute: {e}"),
            )),
            Err(_) => {
                warn!(timeout_secs = spec.timeout.as_secs(), "process timed out, killed");
                Ok(ProcessResult::timed_out())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_spec_display_and_tool_name() {
        let spec = CommandSpec::new("/usr/local/bin/composer", Duration::from_secs(5))
            .args(["show", "phpro/grumphp"])
            .arg("--no-interaction");
        assert_eq!(spec.tool_name(), "composer");
        assert_eq!(
            spec.display(),
            "/usr/local/bin/composer show phpro/grumphp --no-interaction"
        );
    }

    #[test]
    fn test_combined_output_is_stdout_then_stderr() {
        let result = ProcessResult {
            exit_code: Some(1),
            stdout: "phpcs ok".into(),
            stderr: "phplint failed\n".into(),
            status: ProcessStatus::Failed,
        };
        assert_eq!(result.combined_output(), "phpcs ok\nphplint failed\n");
        assert_eq!(result.failure_summary(), "exit code 1: phplint failed");
    }

    #[test]
    fn test_timed_out_summary() {
        let result = ProcessResult::timed_out();
        assert!(!result.is_success());
        assert_eq!(result.exit_code, None);
        assert_eq!(result.failure_summary(), "timed out");
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_tokio_runner_captures_output() {
        let spec = CommandSpec::new("sh", Duration::from_secs(10))
            .args(["-c", "echo out; echo err >&2; exit 3"]);
        let result = TokioRunner::new().run(&spec).await.unwrap();

        assert_eq!(result.status, ProcessStatus::Failed);
        assert_eq!(result.exit_code, Some(3));
        assert_eq!(result.stdout.trim(), "out");
        assert_eq!(result.stderr.trim(), "err");
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_tokio_runner_times_out() {
        let spec = CommandSpec::new("sleep", Duration::from_millis(100)).arg("5");
        let result = TokioRunner::new().run(&spec).await.unwrap();
        assert_eq!(result.status, ProcessStatus::TimedOut);
    }

    #[tokio::test]
    async fn test_missing_program_is_an_error() {
        let spec = CommandSpec::new("/nonexistent/grumgen-test-binary", Duration::from_secs(1));
        let err = TokioRunner::new().run(&spec).await.unwrap_err();
        assert!(matches!(err, GrumgenError::ExternalToolFailure { .. }));
    }
}
