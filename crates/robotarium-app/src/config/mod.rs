//! Configuration module for Robotarium
//!
//! Handles `settings.json`:
//! - Display preferences (font, size, theme)
//! - Toolchain executable, board and platform
//! - Per-command timeout and last opened project

pub mod settings;
pub mod types;

pub use settings::{
    default_settings_path, load_settings, load_settings_with_status, save_settings, update_setting,
    LoadStatus, SETTINGS_FILENAME,
};
pub use types::{DisplayPreference, Settings, KNOWN_KEYS};
