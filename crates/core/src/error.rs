//! Error types for the shellwright domain.
//!
//! Uses `thiserror` for ergonomic error definitions.
//! [`Error`] is what a turn propagates to its host; [`ExecutionError`] is
//! captured into an execution result and travels as data instead.

use std::path::PathBuf;
use thiserror::Error;

/// The top-level error type for all shellwright operations.
#[derive(Debug, Error)]
pub enum Error {
    /// No usable API key; a session cannot start without one.
    #[error("No API key configured (set SHELLWRIGHT_API_KEY or OPENROUTER_API_KEY, or run `shellwright onboard`)")]
    CredentialMissing,

    // --- Transport errors ---
    #[error("Provider error: {0}")]
    Provider(#[from] ProviderError),

    // --- Configuration errors ---
    #[error("Configuration error: {message}")]
    Config { message: String },
}

/// Result type alias using our Error.
pub type Result<T> = std::result::Result<T, Error>;

// --- Bounded context errors ---

/// Failure of the chat-completion call.
#[derive(Debug, Clone, Error)]
pub enum ProviderError {
    #[error("API request failed: {message} (status: {status_code})")]
    ApiError { status_code: u16, message: String },

    #[error("Rate limited by provider, retry after {retry_after_secs}s")]
    RateLimited { retry_after_secs: u64 },

    #[error("Authentication failed: {0}")]
    AuthenticationFailed(String),

    #[error("Malformed response: {0}")]
    MalformedResponse(String),

    #[error("Request timed out: {0}")]
    Timeout(String),

    #[error("Network error: {0}")]
    Network(String),
}

/// Failure while applying directives. Aborts the rest of the turn's
/// execution but never the turn itself.
#[derive(Debug, Error)]
pub enum ExecutionError {
    #[error("Failed to write {}: {source}", .path.display())]
    FileWrite {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to run {command}: {source}")]
    CommandSpawn {
        command: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Command failed: {command} ({})\n{stderr}", describe_exit(.exit_code))]
    CommandFailed {
        command: String,
        /// `None` when the process was terminated by a signal.
        exit_code: Option<i32>,
        stderr: String,
    },
}

fn describe_exit(code: &Option<i32>) -> String {
    match code {
        Some(code) => format!("exit code {code}"),
        None => "terminated by signal".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn provider_error_displays_correctly() {
        let err = Error::Provider(ProviderError::ApiError {
            status_code: 429,
            message: "Too many requests".into(),
        });
        assert!(err.to_string().contains("429"));
        assert!(err.to_string().contains("Too many requests"));
    }

    #[test]
    fn command_failure_names_command_and_stderr() {
        let err = ExecutionError::CommandFailed {
            command: "make build".into(),
            exit_code: Some(2),
            stderr: "no rule to make target".into(),
        };
        let text = err.to_string();
        assert!(text.starts_with("Command failed: make build (exit code 2)"));
        assert!(text.ends_with("no rule to make target"));
    }

    #[test]
    fn signal_exit_is_described() {
        let err = ExecutionError::CommandFailed {
            command: "sleep 100".into(),
            exit_code: None,
            stderr: String::new(),
        };
        assert!(err.to_string().contains("terminated by signal"));
    }

    #[test]
    fn file_write_error_names_path() {
        let err = ExecutionError::FileWrite {
            path: PathBuf::from("out/main.py"),
            source: std::io::Error::new(std::io::ErrorKind::NotFound, "missing"),
        };
        assert!(err.to_string().contains("out/main.py"));
        assert!(err.to_string().contains("missing"));
    }
}
