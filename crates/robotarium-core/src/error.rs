//! Application error types with rich context

use std::path::PathBuf;
use std::time::Duration;
use thiserror::Error;

/// Result type alias using our Error type
pub type Result<T> = std::result::Result<T, Error>;

/// Application error types organized by layer/domain
///
/// A toolchain command that runs and exits non-zero is *not* an error: it is a
/// [`CommandResult`](crate::CommandResult) with a non-zero `exit_code`. Only
/// environment faults (the process could not be started, timed out, or was
/// cancelled) are represented here.
#[derive(Debug, Error)]
pub enum Error {
    // ─────────────────────────────────────────────────────────────
    // Common/Infrastructure Errors
    // ─────────────────────────────────────────────────────────────
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON parsing error: {0}")]
    Json(#[from] serde_json::Error),

    // ─────────────────────────────────────────────────────────────
    // Process Errors
    // ─────────────────────────────────────────────────────────────
    #[error("Toolchain executable not found: '{program}'. Ensure it is in your PATH.")]
    ToolchainNotFound { program: String },

    #[error("Failed to spawn toolchain process: {reason}")]
    ProcessSpawn { reason: String },

    #[error("Command `{command}` timed out after {after:?}")]
    Timeout { command: String, after: Duration },

    #[error("Command `{command}` was cancelled")]
    Cancelled { command: String },

    // ─────────────────────────────────────────────────────────────
    // Project Errors
    // ─────────────────────────────────────────────────────────────
    #[error("No sketch project found in: {path}")]
    NoProject { path: PathBuf },

    #[error("Sketch file not found: {path}")]
    MissingSketch { path: PathBuf },

    // ─────────────────────────────────────────────────────────────
    // Configuration Errors
    // ─────────────────────────────────────────────────────────────
    #[error("Configuration error: {message}")]
    Config { message: String },

    #[error("Unknown setting: '{key}'")]
    UnknownSetting { key: String },

    // ─────────────────────────────────────────────────────────────
    // Execution Errors
    // ─────────────────────────────────────────────────────────────
    #[error("A build or initialization is already running")]
    PipelineBusy,

    #[error("Channel send error: {message}")]
    ChannelSend { message: String },

    #[error("Background task failed: {reason}")]
    TaskFailed { reason: String },
}

// ─────────────────────────────────────────────────────────────────
// Convenience Constructors
// ─────────────────────────────────────────────────────────────────

impl Error {
    pub fn spawn(reason: impl Into<String>) -> Self {
        Self::ProcessSpawn {
            reason: reason.into(),
        }
    }

    pub fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    pub fn unknown_setting(key: impl Into<String>) -> Self {
        Self::UnknownSetting { key: key.into() }
    }

    pub fn channel_send(message: impl Into<String>) -> Self {
        Self::ChannelSend {
            message: message.into(),
        }
    }

    pub fn task_failed(reason: impl Into<String>) -> Self {
        Self::TaskFailed {
            reason: reason.into(),
        }
    }

    pub fn no_project(path: impl Into<PathBuf>) -> Self {
        Self::NoProject { path: path.into() }
    }

    pub fn missing_sketch(path: impl Into<PathBuf>) -> Self {
        Self::MissingSketch { path: path.into() }
    }

    /// True for the "shell/process could not be started at all" family.
    pub fn is_spawn_error(&self) -> bool {
        matches!(
            self,
            Error::ToolchainNotFound { .. } | Error::ProcessSpawn { .. }
        )
    }

    /// Check if this is a recoverable error
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            Error::PipelineBusy
                | Error::Cancelled { .. }
                | Error::Timeout { .. }
                | Error::ChannelSend { .. }
                | Error::UnknownSetting { .. }
        )
    }

    /// Check if this error should abort the current command
    pub fn is_fatal(&self) -> bool {
        matches!(
            self,
            Error::ToolchainNotFound { .. }
                | Error::ProcessSpawn { .. }
                | Error::NoProject { .. }
                | Error::MissingSketch { .. }
        )
    }
}

// ─────────────────────────────────────────────────────────────────
// Error Context Extensions (for use with color-eyre)
// ─────────────────────────────────────────────────────────────────

/// Extension trait for adding context to Results
pub trait ResultExt<T> {
    /// Add context to an error
    fn context(self, context: impl Into<String>) -> Result<T>;

    /// Add context with a closure (lazy evaluation)
    fn with_context<F>(self, f: F) -> Result<T>
    where
        F: FnOnce() -> String;
}

impl<T, E: Into<Error>> ResultExt<T> for std::result::Result<T, E> {
    fn context(self, context: impl Into<String>) -> Result<T> {
        self.map_err(|e| {
            let err = e.into();
            tracing::error!("{}: {:?}", context.into(), err);
            err
        })
    }

    fn with_context<F>(self, f: F) -> Result<T>
    where
        F: FnOnce() -> String,
    {
        self.map_err(|e| {
            let err = e.into();
            tracing::error!("{}: {:?}", f(), err);
            err
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display_messages() {
        let err = Error::ToolchainNotFound {
            program: "arduino-cli".to_string(),
        };
        assert!(err.to_string().contains("'arduino-cli'"));

        let err = Error::Timeout {
            command: "arduino-cli compile".to_string(),
            after: Duration::from_secs(5),
        };
        assert_eq!(
            err.to_string(),
            "Command `arduino-cli compile` timed out after 5s"
        );
    }

    #[test]
    fn test_error_from_io() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let err: Error = io_err.into();
        assert!(matches!(err, Error::Io(_)));
    }

    #[test]
    fn test_spawn_errors_are_fatal() {
        let not_found = Error::ToolchainNotFound {
            program: "arduino-cli".to_string(),
        };
        assert!(not_found.is_spawn_error());
        assert!(not_found.is_fatal());

        let spawn = Error::spawn("permission denied");
        assert!(spawn.is_spawn_error());
        assert!(spawn.is_fatal());
        assert!(!spawn.is_recoverable());
    }

    #[test]
    fn test_project_errors_are_fatal_but_not_spawn() {
        let err = Error::missing_sketch("/tmp/Blink/Blink.ino");
        assert!(err.is_fatal());
        assert!(!err.is_spawn_error());
        assert!(err.to_string().contains("Blink.ino"));

        let err = Error::no_project("/tmp/nowhere");
        assert!(err.is_fatal());
    }

    #[test]
    fn test_error_is_recoverable() {
        assert!(Error::PipelineBusy.is_recoverable());
        assert!(Error::channel_send("fragment").is_recoverable());
        assert!(Error::unknown_setting("colour").is_recoverable());
        assert!(Error::Cancelled {
            command: "arduino-cli upload".to_string()
        }
        .is_recoverable());
        assert!(!Error::config("bad").is_recoverable());
    }

    #[test]
    fn test_context_preserves_error() {
        let res: std::result::Result<(), std::io::Error> = Err(std::io::Error::new(
            std::io::ErrorKind::PermissionDenied,
            "denied",
        ));
        let err = res.context("reading sketch").unwrap_err();
        assert!(matches!(err, Error::Io(_)));
    }
}
