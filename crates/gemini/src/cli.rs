//! gemini-cli process bridge.
//!
//! Runs the `gemini` executable once per prompt and captures what it
//! writes. The prompt is passed as its own argv entry, never through a
//! shell, so metacharacters in it have no effect.

use std::path::PathBuf;
use std::process::{ExitStatus, Stdio};

use serde::Serialize;
use tokio::process::Command;

use crate::{Error, Result};

pub const DEFAULT_COMMAND: &str = "gemini";
pub const DEFAULT_MODEL: &str = "gemini-2.5-flash";

/// What the tool hands back to the caller.
///
/// A failing run is still a normal tool result; only a failure to start
/// the process is reported as an error.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum InvokeOutput {
    Success { result: String },
    Failure { error: String },
}

/// Everything captured from one finished run.
#[derive(Debug)]
pub struct CapturedRun {
    pub status: ExitStatus,
    pub stdout: String,
    pub stderr: String,
}

impl CapturedRun {
    /// Map the exit status onto the tool payload.
    ///
    /// Exit 0 yields stdout, or stderr when stdout is empty. Any other
    /// outcome, including death by signal, yields stderr as the error.
    pub fn into_output(self) -> InvokeOutput {
        if self.status.success() {
            let result = if self.stdout.is_empty() {
                self.stderr
            } else {
                self.stdout
            };
            InvokeOutput::Success { result }
        } else {
            InvokeOutput::Failure { error: self.stderr }
        }
    }
}

/// Launches the gemini CLI in unattended mode.
#[derive(Debug, Clone)]
pub struct GeminiCli {
    command: String,
    model: String,
    working_dir: Option<PathBuf>,
}

impl Default for GeminiCli {
    fn default() -> Self {
        Self::new(DEFAULT_MODEL)
    }
}

impl GeminiCli {
    /// Create a bridge using the given model.
    pub fn new(model: impl Into<String>) -> Self {
        Self {
            command: DEFAULT_COMMAND.to_string(),
            model: model.into(),
            working_dir: None,
        }
    }

    /// Use a custom executable path.
    pub fn with_command(mut self, command: impl Into<String>) -> Self {
        self.command = command.into();
        self
    }

    /// Run the executable from this directory instead of ours.
    pub fn with_working_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.working_dir = Some(dir.into());
        self
    }

    pub fn command(&self) -> &str {
        &self.command
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    /// The argument vector passed after the executable name.
    pub fn args<'a>(&'a self, prompt: &'a str) -> [&'a str; 5] {
        ["-m", &self.model, "--yolo", "-p", prompt]
    }

    /// Human-readable command line, for logs only.
    pub fn command_line(&self, prompt: &str) -> String {
        format!("{} -m '{}' --yolo -p {prompt:?}", self.command, self.model)
    }

    /// Run once and wait for the process to exit.
    ///
    /// There is no timeout: a process that never exits keeps this future
    /// pending.
    pub async fn run(&self, prompt: &str) -> Result<CapturedRun> {
        let mut cmd = Command::new(&self.command);
        cmd.args(self.args(prompt))
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped());
        if let Some(dir) = &self.working_dir {
            cmd.current_dir(dir);
        }

        let child = cmd.spawn().map_err(|source| Error::Spawn {
            command: self.command.clone(),
            source,
        })?;

        // Drains both pipes concurrently, then reaps the child.
        let output = child.wait_with_output().await?;

        Ok(CapturedRun {
            status: output.status,
            stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
            stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
        })
    }

    /// Run the prompt and produce the tool payload, logging along the way.
    pub async fn invoke(&self, prompt: &str) -> Result<InvokeOutput> {
        tracing::info!(prompt, "invoking gemini-cli");
        tracing::info!(command = %self.command_line(prompt), "full command");

        let run = match self.run(prompt).await {
            Ok(run) => run,
            Err(e) => {
                tracing::error!(error = %e, "failed to start subprocess");
                return Err(e);
            }
        };

        if !run.status.success() {
            tracing::error!(status = %run.status, "gemini process exited with non-zero status");
        }

        let output = run.into_output();
        tracing::info!(?output, "gemini-cli finished");
        Ok(output)
    }
}

#[cfg(all(test, unix))]
mod tests {
    use super::*;
    use std::os::unix::fs::PermissionsExt;
    use std::path::Path;
    use tempfile::TempDir;

    /// Write an executable shell script standing in for gemini.
    fn fake_gemini(dir: &Path, body: &str) -> GeminiCli {
        let path = dir.join("gemini");
        std::fs::write(&path, format!("#!/bin/sh\n{body}\n")).unwrap();
        let mut perms = std::fs::metadata(&path).unwrap().permissions();
        perms.set_mode(0o755);
        std::fs::set_permissions(&path, perms).unwrap();
        GeminiCli::default().with_command(path.to_string_lossy())
    }

    #[test]
    fn argv_layout() {
        let cli = GeminiCli::new("some-model");
        assert_eq!(
            cli.args("hello"),
            ["-m", "some-model", "--yolo", "-p", "hello"]
        );
    }

    #[tokio::test]
    async fn prompt_is_a_single_inert_argument() {
        let dir = TempDir::new().unwrap();
        let cli = fake_gemini(dir.path(), r#"printf '%s\n' "$@""#);

        let prompt = "it's $HOME; echo pwned | cat `id` \"quoted\"";
        let output = cli.invoke(prompt).await.unwrap();

        assert_eq!(
            output,
            InvokeOutput::Success {
                result: format!("-m\ngemini-2.5-flash\n--yolo\n-p\n{prompt}\n"),
            }
        );
    }

    #[tokio::test]
    async fn stdout_wins_over_stderr() {
        let dir = TempDir::new().unwrap();
        let cli = fake_gemini(dir.path(), "echo out\necho noise >&2");

        let output = cli.invoke("x").await.unwrap();
        assert_eq!(
            output,
            InvokeOutput::Success {
                result: "out\n".into()
            }
        );
    }

    #[tokio::test]
    async fn falls_back_to_stderr_when_stdout_empty() {
        let dir = TempDir::new().unwrap();
        let cli = fake_gemini(dir.path(), "echo only-err >&2");

        let output = cli.invoke("x").await.unwrap();
        assert_eq!(
            output,
            InvokeOutput::Success {
                result: "only-err\n".into()
            }
        );
    }

    #[tokio::test]
    async fn nonzero_exit_reports_stderr() {
        let dir = TempDir::new().unwrap();
        let cli = fake_gemini(dir.path(), "echo partial\necho failed >&2\nexit 7");

        let output = cli.invoke("x").await.unwrap();
        assert_eq!(
            output,
            InvokeOutput::Failure {
                error: "failed\n".into()
            }
        );
    }

    #[tokio::test]
    async fn any_exit_code_is_a_failure() {
        let dir = TempDir::new().unwrap();
        let cli = fake_gemini(dir.path(), "echo out\nexit 1");

        let output = cli.invoke("x").await.unwrap();
        assert_eq!(output, InvokeOutput::Failure { error: String::new() });
    }

    #[tokio::test]
    async fn killed_by_signal_is_a_failure() {
        let dir = TempDir::new().unwrap();
        let cli = fake_gemini(dir.path(), "echo dying >&2\nkill -KILL $$");

        let output = cli.invoke("x").await.unwrap();
        assert_eq!(
            output,
            InvokeOutput::Failure {
                error: "dying\n".into()
            }
        );
    }

    #[tokio::test]
    async fn missing_executable_is_an_error() {
        let dir = TempDir::new().unwrap();
        let cli = GeminiCli::default().with_command(dir.path().join("absent").to_string_lossy());

        let err = cli.invoke("x").await.unwrap_err();
        assert!(matches!(err, Error::Spawn { .. }));
    }

    #[tokio::test]
    async fn runs_in_working_dir() {
        let dir = TempDir::new().unwrap();
        let work = TempDir::new().unwrap();
        let cli = fake_gemini(dir.path(), "pwd -P").with_working_dir(work.path());

        let run = cli.run("x").await.unwrap();
        let expected = std::fs::canonicalize(work.path()).unwrap();
        assert_eq!(run.stdout.trim_end(), expected.to_string_lossy());
    }

    #[tokio::test]
    async fn concurrent_runs_keep_separate_buffers() {
        let dir = TempDir::new().unwrap();
        // $5 is the prompt; the sleep keeps both children alive together.
        let cli = fake_gemini(dir.path(), "sleep 0.2\nprintf '%s' \"$5\"\nprintf 'err-%s' \"$5\" >&2");

        let (a, b) = tokio::join!(cli.run("first"), cli.run("second"));
        let (a, b) = (a.unwrap(), b.unwrap());
        assert_eq!((a.stdout.as_str(), a.stderr.as_str()), ("first", "err-first"));
        assert_eq!((b.stdout.as_str(), b.stderr.as_str()), ("second", "err-second"));
    }
}
