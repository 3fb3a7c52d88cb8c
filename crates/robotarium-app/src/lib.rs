//! # robotarium-app - Settings and Background Execution
//!
//! Sits between the toolchain crate and whatever drives it (the CLI today).
//!
//! ## Public API
//!
//! ### Configuration (`config`)
//! - [`Settings`] - Flat `settings.json` object with defaults for every key
//! - [`load_settings()`], [`save_settings()`], [`update_setting()`]
//! - [`LoadStatus`] - Whether a loaded file may be written back
//!
//! ### Execution (`engine`)
//! - [`Engine`] - Runs build, compile and setup jobs on background tasks,
//!   one at a time, with cancellation
//! - [`EngineRun`] - Fragment stream plus join handle of one job
//!
//! ### Upload Lock (`upload_lock`)
//! - [`UploadLock`] - Keeps a second Robotarium process from flashing the
//!   board concurrently

pub mod config;
pub mod engine;
pub mod upload_lock;

pub use config::{
    default_settings_path, load_settings, load_settings_with_status, save_settings,
    update_setting, DisplayPreference, LoadStatus, Settings,
};
pub use engine::{Engine, EngineRun};
pub use upload_lock::UploadLock;
