//! Toolchain subprocess execution.

use std::path::Path;
use std::process::Stdio;
use std::time::{Duration, Instant};

use lec_config::ToolchainConfig;
use tokio::process::Command;
use tokio::time::timeout;

use crate::error::ToolchainError;

/// Captured result of one toolchain run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Invocation {
    /// `None` when the process was ended by a signal.
    pub exit_code: Option<i32>,
    pub stdout: String,
    pub stderr: String,
    pub duration: Duration,
}

impl Invocation {
    #[must_use]
    pub const fn succeeded(&self) -> bool {
        matches!(self.exit_code, Some(0))
    }

    /// First non-empty stderr line, falling back to stdout.
    #[must_use]
    pub fn first_output_line(&self) -> Option<&str> {
        first_line(&self.stderr).or_else(|| first_line(&self.stdout))
    }
}

fn first_line(text: &str) -> Option<&str> {
    text.lines().map(str::trim).find(|line| !line.is_empty())
}

/// Run `binary args…` in `cwd`, capturing both streams.
///
/// stdin is closed. stdout and stderr are drained together, so a chatty
/// compiler cannot block on a full pipe. When `limit` elapses the child is
/// killed and `Timeout` is returned. There are no retries.
///
/// # Errors
///
/// `Spawn` if the process cannot be started, `Timeout` if it outlives `limit`.
pub async fn invoke(
    binary: &str,
    cwd: &Path,
    args: &[String],
    limit: Duration,
) -> Result<Invocation, ToolchainError> {
    tracing::debug!(binary, ?args, cwd = %cwd.display(), "invoking toolchain");
    let started = Instant::now();

    let output = Command::new(binary)
        .args(args)
        .current_dir(cwd)
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .kill_on_drop(true)
        .output();

    let output = timeout(limit, output)
        .await
        .map_err(|_| {
            tracing::warn!(binary, timeout_secs = limit.as_secs(), "toolchain timed out, killed");
            ToolchainError::Timeout {
                binary: binary.to_string(),
                after: limit,
            }
        })?
        .map_err(|source| ToolchainError::Spawn {
            binary: binary.to_string(),
            source,
        })?;

    let invocation = Invocation {
        exit_code: output.status.code(),
        stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
        stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
        duration: started.elapsed(),
    };
    tracing::debug!(
        exit_code = ?invocation.exit_code,
        elapsed_ms = invocation.duration.as_millis(),
        "toolchain finished"
    );
    Ok(invocation)
}

/// `build --json [--force]`.
#[must_use]
pub fn build_args(force: bool) -> Vec<String> {
    let mut args = vec!["build".to_string(), "--json".to_string()];
    if force {
        args.push("--force".to_string());
    }
    args
}

/// `test --json [--force] --match-path <test_path>`.
#[must_use]
pub fn test_args(test_path: &str, force: bool) -> Vec<String> {
    let mut args = vec!["test".to_string(), "--json".to_string()];
    if force {
        args.push("--force".to_string());
    }
    args.push("--match-path".to_string());
    args.push(test_path.to_string());
    args
}

/// Configured toolchain: binary, timeouts, and rebuild policy.
#[derive(Debug, Clone)]
pub struct Toolchain {
    config: ToolchainConfig,
}

impl Toolchain {
    #[must_use]
    pub const fn new(config: ToolchainConfig) -> Self {
        Self { config }
    }

    #[must_use]
    pub fn binary(&self) -> &str {
        &self.config.binary
    }

    /// Compile the project rooted at `cwd`.
    ///
    /// # Errors
    ///
    /// See [`invoke`].
    pub async fn build(&self, cwd: &Path) -> Result<Invocation, ToolchainError> {
        invoke(
            &self.config.binary,
            cwd,
            &build_args(self.config.force_rebuild),
            self.config.compile_timeout(),
        )
        .await
    }

    /// Run the tests in one workspace-relative file.
    ///
    /// # Errors
    ///
    /// See [`invoke`].
    pub async fn test(&self, cwd: &Path, test_path: &str) -> Result<Invocation, ToolchainError> {
        invoke(
            &self.config.binary,
            cwd,
            &test_args(test_path, self.config.force_rebuild),
            self.config.test_timeout(),
        )
        .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn builds_argument_lists() {
        assert_eq!(build_args(true), ["build", "--json", "--force"]);
        assert_eq!(build_args(false), ["build", "--json"]);
        assert_eq!(
            test_args("test/Eval.t.sol", true),
            ["test", "--json", "--force", "--match-path", "test/Eval.t.sol"]
        );
    }

    #[test]
    fn first_output_line_prefers_stderr() {
        let inv = Invocation {
            exit_code: Some(1),
            stdout: "out line\n".into(),
            stderr: "\n  Error: boom \n".into(),
            duration: Duration::ZERO,
        };
        assert_eq!(inv.first_output_line(), Some("Error: boom"));
        assert!(!inv.succeeded());
    }

    #[tokio::test]
    async fn missing_binary_is_spawn_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = invoke(
            "lectern-definitely-not-installed",
            dir.path(),
            &[],
            Duration::from_secs(5),
        )
        .await
        .unwrap_err();
        assert!(matches!(err, ToolchainError::Spawn { .. }));
    }
}
