//! Shell runner — execute command directives.
//!
//! Commands go through the platform shell with the inherited environment.
//! There is no allowlist and no sandbox: the model's commands run with the
//! privileges of this process.

use shellwright_core::error::ExecutionError;
use std::path::PathBuf;
use std::process::Output;
use tokio::process::Command;
use tracing::{debug, warn};

/// Captured result of one command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandOutput {
    pub stdout: String,
    pub stderr: String,
    /// `None` if the process was killed by a signal.
    pub exit_code: Option<i32>,
}

impl CommandOutput {
    pub fn success(&self) -> bool {
        self.exit_code == Some(0)
    }

    fn from_output(output: Output) -> Self {
        Self {
            stdout: String::from_utf8_lossy(&output.stdout).to_string(),
            stderr: String::from_utf8_lossy(&output.stderr).to_string(),
            exit_code: output.status.code(),
        }
    }
}

/// Runs shell command lines, optionally in a fixed working directory.
#[derive(Debug, Clone, Default)]
pub struct ShellRunner {
    working_dir: Option<PathBuf>,
}

impl ShellRunner {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_working_dir(working_dir: impl Into<PathBuf>) -> Self {
        Self {
            working_dir: Some(working_dir.into()),
        }
    }

    fn command(&self, command_line: &str) -> Command {
        let mut cmd = if cfg!(target_os = "windows") {
            let mut cmd = Command::new("cmd");
            cmd.args(["/C", command_line]);
            cmd
        } else {
            let mut cmd = Command::new("sh");
            cmd.args(["-c", command_line]);
            cmd
        };
        if let Some(dir) = &self.working_dir {
            cmd.current_dir(dir);
        }
        cmd
    }

    /// Run `command_line` to completion and capture its output.
    ///
    /// Only a failure to start the shell is an error here; a non-zero exit
    /// is reported through [`CommandOutput::exit_code`].
    pub async fn run(&self, command_line: &str) -> Result<CommandOutput, ExecutionError> {
        debug!(command = %command_line, "Executing shell command");

        let output = self
            .command(command_line)
            .output()
            .await
            .map_err(|source| ExecutionError::CommandSpawn {
                command: command_line.to_string(),
                source,
            })?;

        let output = CommandOutput::from_output(output);
        if !output.success() {
            warn!(command = %command_line, exit_code = ?output.exit_code, "Command failed");
        }
        Ok(output)
    }
}
