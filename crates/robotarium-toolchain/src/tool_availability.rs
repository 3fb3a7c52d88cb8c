//! Toolchain availability checking
//!
//! Resolves the toolchain executable before any command is attempted, so a
//! missing `arduino-cli` can be explained up front instead of surfacing as a
//! spawn failure halfway through a build.

use std::ffi::OsStr;
use std::path::PathBuf;

/// Where (and whether) the toolchain executable was found
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ToolAvailability {
    /// Name or path that was looked up
    pub executable: String,

    /// Whether the executable resolved to a file
    pub available: bool,

    /// Resolved absolute path
    pub path: Option<PathBuf>,
}

impl ToolAvailability {
    /// Resolve `executable` against `PATH` (or as a path, if it contains a separator).
    pub fn check(executable: &OsStr) -> Self {
        let name = executable.to_string_lossy().into_owned();
        match which::which(executable) {
            Ok(path) => {
                tracing::debug!("Resolved {} to {:?}", name, path);
                Self {
                    executable: name,
                    available: true,
                    path: Some(path),
                }
            }
            Err(e) => {
                tracing::debug!("Toolchain check failed for {}: {}", name, e);
                Self {
                    executable: name,
                    available: false,
                    path: None,
                }
            }
        }
    }

    /// User-facing message when the toolchain is missing
    pub fn unavailable_message(&self) -> Option<String> {
        if self.available {
            None
        } else {
            Some(format!(
                "'{}' not found. Install arduino-cli or set \"executable\" in settings.json.",
                self.executable
            ))
        }
    }
}
