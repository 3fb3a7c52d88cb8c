//! Core domain types for toolchain runs

use serde::{Deserialize, Serialize};

use crate::ansi::strip_ansi_codes;

/// Outcome of one toolchain invocation.
///
/// `exit_code` is the raw process exit code, passed through unmodified.
/// `0` is success; every other value is failure.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommandResult {
    /// Combined stdout/stderr with ANSI color sequences removed
    pub output: String,
    pub exit_code: i32,
}

impl CommandResult {
    /// Build from already-cleaned output.
    pub fn new(output: impl Into<String>, exit_code: i32) -> Self {
        Self {
            output: output.into(),
            exit_code,
        }
    }

    /// Build from raw captured output, stripping ANSI color sequences.
    pub fn from_raw(raw: &str, exit_code: i32) -> Self {
        Self::new(strip_ansi_codes(raw), exit_code)
    }

    pub fn success(&self) -> bool {
        self.exit_code == 0
    }
}

/// A board reachable over a serial connection.
///
/// Recomputed for every upload attempt; never cached.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Device {
    /// Port path such as `/dev/ttyACM0` or `COM3`
    pub identifier: String,

    /// Remainder of the board-list line, for display only
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub detail: String,
}

impl Device {
    pub fn new(identifier: impl Into<String>) -> Self {
        Self {
            identifier: identifier.into(),
            detail: String::new(),
        }
    }

    pub fn with_detail(mut self, detail: impl Into<String>) -> Self {
        self.detail = detail.into();
        self
    }
}

impl std::fmt::Display for Device {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.identifier)
    }
}

/// Phases of a build-and-upload run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PipelinePhase {
    Compiling,
    LocatingDevice,
    Uploading,
    Done,
}

/// How a build-and-upload run ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BuildOutcome {
    CompileFailed,
    /// Compile succeeded but no serial board was attached. Not an error.
    DeviceNotFound,
    UploadFailed,
    Uploaded,
}

/// Structured result of one end-to-end run.
///
/// Only the three shapes produced by the constructors are valid:
/// compile only, compile + absent device, or all three populated.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BuildReport {
    pub compile: CommandResult,
    pub device: Option<Device>,
    pub upload: Option<CommandResult>,
}

impl BuildReport {
    pub fn compile_failed(compile: CommandResult) -> Self {
        Self {
            compile,
            device: None,
            upload: None,
        }
    }

    pub fn device_not_found(compile: CommandResult) -> Self {
        Self {
            compile,
            device: None,
            upload: None,
        }
    }

    pub fn uploaded(compile: CommandResult, device: Device, upload: CommandResult) -> Self {
        Self {
            compile,
            device: Some(device),
            upload: Some(upload),
        }
    }

    pub fn outcome(&self) -> BuildOutcome {
        if !self.compile.success() {
            return BuildOutcome::CompileFailed;
        }
        match &self.upload {
            None => BuildOutcome::DeviceNotFound,
            Some(upload) if upload.success() => BuildOutcome::Uploaded,
            Some(_) => BuildOutcome::UploadFailed,
        }
    }

    /// True only when the sketch reached the board.
    pub fn succeeded(&self) -> bool {
        self.outcome() == BuildOutcome::Uploaded
    }
}
