//! Configuration types for Robotarium
//!
//! Defines:
//! - `Settings` - The flat settings object persisted as `settings.json`
//! - `DisplayPreference` - Font settings handed to the presentation layer

use std::path::PathBuf;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use robotarium_core::prelude::*;
use robotarium_toolchain::{
    RunOptions, Toolchain, DEFAULT_EXECUTABLE, DEFAULT_FQBN, DEFAULT_PLATFORM,
};

/// Every key `settings.json` may contain. Anything else is ignored on load
/// and rejected by [`Settings::set`].
pub const KNOWN_KEYS: &[&str] = &[
    "font",
    "font_size",
    "theme",
    "executable",
    "fqbn",
    "platform",
    "global_args",
    "command_timeout_secs",
    "project",
];

/// Global application settings
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct Settings {
    /// Font used to render toolchain output
    pub font: String,

    pub font_size: f32,

    /// Syntax theme name (stored for the editor, not interpreted here)
    pub theme: String,

    /// Toolchain executable name or path
    pub executable: String,

    /// Fully qualified board name
    pub fqbn: String,

    /// Core package installed by `init`
    pub platform: String,

    /// Extra toolchain arguments placed before every subcommand
    pub global_args: Vec<String>,

    /// Kill any single toolchain command running longer than this
    pub command_timeout_secs: Option<u64>,

    /// Last opened sketch directory
    pub project: Option<PathBuf>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            font: "RobotoMono".to_string(),
            font_size: 14.0,
            theme: "catppuccin-mocha".to_string(),
            executable: DEFAULT_EXECUTABLE.to_string(),
            fqbn: DEFAULT_FQBN.to_string(),
            platform: DEFAULT_PLATFORM.to_string(),
            global_args: Vec::new(),
            command_timeout_secs: None,
            project: None,
        }
    }
}

/// Font preference passed to whatever renders report fragments
#[derive(Debug, Clone, PartialEq)]
pub struct DisplayPreference {
    pub font: String,
    pub font_size: f32,
}

impl Settings {
    pub fn toolchain(&self) -> Toolchain {
        Toolchain::new(&self.executable)
            .with_fqbn(&self.fqbn)
            .with_platform(&self.platform)
            .with_global_args(&self.global_args)
    }

    pub fn run_options(&self) -> RunOptions {
        RunOptions {
            timeout: self.command_timeout_secs.map(Duration::from_secs),
        }
    }

    pub fn display(&self) -> DisplayPreference {
        DisplayPreference {
            font: self.font.clone(),
            font_size: self.font_size,
        }
    }

    /// Set one known key from a JSON value.
    ///
    /// Unknown keys fail with [`Error::UnknownSetting`]; a value of the wrong
    /// type fails with [`Error::Json`] and leaves `self` unchanged.
    pub fn set(&mut self, key: &str, value: serde_json::Value) -> Result<()> {
        if !KNOWN_KEYS.contains(&key) {
            return Err(Error::unknown_setting(key));
        }

        let mut object = serde_json::to_value(&*self)?;
        object[key] = value;
        *self = serde_json::from_value(object)?;
        Ok(())
    }
}
