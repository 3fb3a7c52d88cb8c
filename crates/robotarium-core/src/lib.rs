//! # robotarium-core - Core Domain Types
//!
//! Foundation crate for Robotarium. Provides domain types, error handling,
//! ANSI stripping, sketch project validation and the progress reporting
//! contract.
//!
//! This crate has **zero internal dependencies**.
//!
//! ## Public API
//!
//! ### Domain Types (`types`)
//! - [`CommandResult`] - Cleaned output and raw exit code of one toolchain call
//! - [`Device`] - Serial-attached board found by `board list`
//! - [`BuildReport`] - Compile / device / upload results of one pipeline run
//! - [`BuildOutcome`], [`PipelinePhase`]
//!
//! ### Projects (`project`)
//! - [`ProjectPath`] - A directory containing `<name>/<name>.ino`
//!
//! ### Reporting (`report`)
//! - [`ReportSink`] - Receives tagged, display-ready [`Fragment`]s
//!
//! ### Error Handling (`error`)
//! - [`Error`] - Custom error enum with `fatal` vs `recoverable` classification
//! - [`Result`] - Type alias for `std::result::Result<T, Error>`
//! - [`ResultExt`] - Extension trait for adding error context
//!
//! ## Prelude
//!
//! Import commonly used types with:
//! ```rust
//! use robotarium_core::prelude::*;
//! ```

pub mod ansi;
pub mod error;
pub mod logging;
pub mod project;
pub mod report;
pub mod types;

/// Prelude for common imports used throughout all Robotarium crates
pub mod prelude {
    pub use super::error::{Error, Result, ResultExt};
    pub use tracing::{debug, error, info, instrument, trace, warn};
}

// Re-export commonly used types at crate root for convenience
pub use ansi::strip_ansi_codes;
pub use error::{Error, Result, ResultExt};
pub use project::{ProjectPath, SKETCH_EXTENSION};
pub use report::{Fragment, NullSink, ReportSink, ReportTag};
pub use types::{BuildOutcome, BuildReport, CommandResult, Device, PipelinePhase};
