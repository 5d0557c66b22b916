//! Applies parsed directives: all file writes first, then commands in order.
//!
//! The first failure stops everything after it. Earlier writes are not
//! rolled back; output gathered before the failure stays in the log.

use crate::directive::Directives;
use shellwright_core::error::ExecutionError;
use shellwright_tools::{FileWriter, ShellRunner};
use std::path::PathBuf;
use tracing::{debug, info};

/// Outcome of executing one reply's directives.
///
/// `error` is present exactly when `success` is false.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExecutionResult {
    success: bool,
    output_log: Vec<String>,
    error: Option<String>,
}

impl ExecutionResult {
    pub fn succeeded(output_log: Vec<String>) -> Self {
        Self {
            success: true,
            output_log,
            error: None,
        }
    }

    pub fn failed(output_log: Vec<String>, error: impl Into<String>) -> Self {
        Self {
            success: false,
            output_log,
            error: Some(error.into()),
        }
    }

    pub fn success(&self) -> bool {
        self.success
    }

    pub fn output_log(&self) -> &[String] {
        &self.output_log
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    /// Log lines joined with newlines, or `None` when nothing was logged.
    pub fn joined_output(&self) -> Option<String> {
        if self.output_log.is_empty() {
            None
        } else {
            Some(self.output_log.join("\n"))
        }
    }
}

/// Runs directives against the filesystem and the shell.
#[derive(Debug, Clone, Default)]
pub struct Executor {
    files: FileWriter,
    shell: ShellRunner,
}

impl Executor {
    /// Executor rooted at the process working directory.
    pub fn new() -> Self {
        Self::default()
    }

    /// Executor whose writes and commands are relative to `dir`.
    pub fn with_working_dir(dir: impl Into<PathBuf>) -> Self {
        let dir = dir.into();
        Self {
            files: FileWriter::with_base_dir(dir.clone()),
            shell: ShellRunner::with_working_dir(dir),
        }
    }

    pub async fn execute(&self, directives: &Directives) -> ExecutionResult {
        let mut log = Vec::new();
        match self.apply(directives, &mut log).await {
            Ok(()) => {
                debug!(lines = log.len(), "Directives executed");
                ExecutionResult::succeeded(log)
            }
            Err(err) => {
                info!(error = %err, "Directive execution stopped");
                ExecutionResult::failed(log, err.to_string())
            }
        }
    }

    async fn apply(
        &self,
        directives: &Directives,
        log: &mut Vec<String>,
    ) -> Result<(), ExecutionError> {
        for file in directives.files() {
            let bytes = self.files.write(file.name, file.content).await?;
            log.push(format!("Wrote {bytes} bytes to {}", file.name));
        }

        for command in directives.commands() {
            let output = self.shell.run(command).await?;

            if !output.stdout.is_empty() {
                log.push(output.stdout.trim_end_matches(['\r', '\n']).to_string());
            }

            if !output.success() {
                return Err(ExecutionError::CommandFailed {
                    command: command.clone(),
                    exit_code: output.exit_code,
                    stderr: output.stderr.trim_end().to_string(),
                });
            }
        }

        Ok(())
    }
}
