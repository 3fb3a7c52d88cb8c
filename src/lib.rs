//! Robotarium Library
//!
//! Command-line front end for compiling Arduino sketches and flashing them
//! onto a serial-attached board.

pub mod cli;
pub mod headless;
pub mod output;
pub mod runner;
pub mod terminal;

// Re-export main entry points
pub use cli::{Args, Command};
pub use runner::run;
