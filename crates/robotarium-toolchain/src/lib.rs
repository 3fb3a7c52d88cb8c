//! # robotarium-toolchain - Toolchain Orchestration
//!
//! Drives `arduino-cli` as a subprocess: one-time setup, compile, board
//! discovery over the serial bus, and upload.
//!
//! Depends on [`robotarium_core`] for domain types and error handling.
//!
//! ## Public API
//!
//! ### Process Execution
//! - [`ProcessRunner`] - Async seam for running one invocation
//! - [`CliRunner`] - Real child processes with merged output, timeout and cancellation
//! - [`Invocation`], [`Toolchain`] - Argument-vector command shapes
//!
//! ### Setup
//! - [`ToolchainInitializer`] - `config init` → `core update-index` → `core install`
//! - [`InitSequence`] - Caller-driven cursor over the setup steps
//!
//! ### Device Discovery
//! - [`DeviceLocator`] - Find the serial board via `board list`
//! - [`select_device()`], [`parse_board_list()`] - Pure parsing of the listing
//!
//! ### Build & Upload
//! - [`BuildUploadPipeline`] - Compile → locate → upload with early exit
//!
//! ### Platform Utilities
//! - [`ToolAvailability`] - Check whether the toolchain executable resolves

pub mod commands;
pub mod devices;
pub mod init;
pub mod pipeline;
pub mod process;
#[cfg(any(test, feature = "test-helpers"))]
pub mod test_utils;
pub mod tool_availability;

// Public API re-exports
pub use commands::{
    Invocation, Toolchain, ToolchainCommand, DEFAULT_EXECUTABLE, DEFAULT_FQBN, DEFAULT_PLATFORM,
};
pub use devices::{
    parse_board_list, select_device, DeviceLocator, DeviceSelection, NO_BOARDS_SENTINEL,
    SERIAL_MARKER,
};
pub use init::{InitSequence, InitStep, StepOutcome, ToolchainInitializer};
pub use pipeline::BuildUploadPipeline;
pub use process::{CliRunner, ProcessRunner, RunOptions};
pub use tool_availability::ToolAvailability;
