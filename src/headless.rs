//! Headless mode - NDJSON event output
//!
//! With `--headless`, nothing human-oriented is printed. Every fragment and
//! every final result becomes one JSON object on its own line, so scripts
//! and editor integrations can follow a build without parsing colors.
//!
//! # Example Output
//!
//! ```json
//! {"event":"started","command":"run","font":"RobotoMono","font_size":14.0,"timestamp":1704700001000}
//! {"event":"fragment","tag":"info","text":"[2024/01/08 09:00:01] COMPILING AND RUNNING","timestamp":1704700001001}
//! {"event":"build_finished","outcome":"uploaded","device":"/dev/ttyACM0","compile_exit_code":0,"upload_exit_code":0,"timestamp":1704700009000}
//! ```

use std::io::{self, Write};

use chrono::Utc;
use serde::Serialize;
use tracing::error;

use robotarium_app::DisplayPreference;
use robotarium_core::{BuildOutcome, BuildReport, CommandResult, Device, Error, Fragment, ReportTag};
use robotarium_toolchain::{InitStep, StepOutcome, ToolAvailability};

/// Events emitted in headless mode
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum HeadlessEvent {
    /// A command began; carries the display preference for whoever renders
    Started {
        command: String,
        font: String,
        font_size: f32,
        timestamp: i64,
    },

    /// One progress fragment
    Fragment {
        tag: ReportTag,
        text: String,
        timestamp: i64,
    },

    StepFinished {
        step: InitStep,
        exit_code: i32,
        timestamp: i64,
    },

    CompileFinished { exit_code: i32, timestamp: i64 },

    BuildFinished {
        outcome: BuildOutcome,
        device: Option<String>,
        compile_exit_code: i32,
        upload_exit_code: Option<i32>,
        timestamp: i64,
    },

    DeviceDetected {
        identifier: String,
        detail: String,
        timestamp: i64,
    },

    ToolchainChecked {
        executable: String,
        available: bool,
        path: Option<String>,
        timestamp: i64,
    },

    SettingUpdated {
        key: String,
        value: serde_json::Value,
        timestamp: i64,
    },

    Error {
        message: String,
        fatal: bool,
        timestamp: i64,
    },
}

impl HeadlessEvent {
    /// Emit this event to stdout as one NDJSON line
    pub fn emit(&self) {
        let mut stdout = io::stdout().lock();
        if let Err(e) = self.write_to(&mut stdout) {
            error!("Failed to write headless event to stdout: {}", e);
        }
    }

    pub fn write_to<W: Write>(&self, out: &mut W) -> io::Result<()> {
        let json = serde_json::to_string(self)?;
        writeln!(out, "{}", json)?;
        out.flush()
    }

    /// Get current timestamp in milliseconds
    fn now() -> i64 {
        Utc::now().timestamp_millis()
    }

    // ─────────────────────────────────────────────────────────
    // Convenience constructors
    // ─────────────────────────────────────────────────────────

    pub fn started(command: &str, preference: &DisplayPreference) -> Self {
        Self::Started {
            command: command.to_string(),
            font: preference.font.clone(),
            font_size: preference.font_size,
            timestamp: Self::now(),
        }
    }

    pub fn fragment(fragment: Fragment) -> Self {
        Self::Fragment {
            tag: fragment.tag,
            text: fragment.text,
            timestamp: Self::now(),
        }
    }

    pub fn step_finished(outcome: &StepOutcome) -> Self {
        Self::StepFinished {
            step: outcome.step,
            exit_code: outcome.result.exit_code,
            timestamp: Self::now(),
        }
    }

    pub fn compile_finished(result: &CommandResult) -> Self {
        Self::CompileFinished {
            exit_code: result.exit_code,
            timestamp: Self::now(),
        }
    }

    pub fn build_finished(report: &BuildReport) -> Self {
        Self::BuildFinished {
            outcome: report.outcome(),
            device: report.device.as_ref().map(|d| d.identifier.clone()),
            compile_exit_code: report.compile.exit_code,
            upload_exit_code: report.upload.as_ref().map(|u| u.exit_code),
            timestamp: Self::now(),
        }
    }

    pub fn device_detected(device: &Device) -> Self {
        Self::DeviceDetected {
            identifier: device.identifier.clone(),
            detail: device.detail.clone(),
            timestamp: Self::now(),
        }
    }

    pub fn toolchain_checked(availability: &ToolAvailability) -> Self {
        Self::ToolchainChecked {
            executable: availability.executable.clone(),
            available: availability.available,
            path: availability
                .path
                .as_ref()
                .map(|p| p.to_string_lossy().into_owned()),
            timestamp: Self::now(),
        }
    }

    pub fn setting_updated(key: &str, value: &serde_json::Value) -> Self {
        Self::SettingUpdated {
            key: key.to_string(),
            value: value.clone(),
            timestamp: Self::now(),
        }
    }

    pub fn error(err: &Error) -> Self {
        Self::Error {
            message: err.to_string(),
            fatal: err.is_fatal(),
            timestamp: Self::now(),
        }
    }
}
