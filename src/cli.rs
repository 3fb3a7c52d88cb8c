//! Command-line arguments

use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// Robotarium - compile and flash Arduino sketches from the terminal
#[derive(Parser, Debug)]
#[command(name = "robotarium", version)]
#[command(about = "Compile and flash Arduino sketches from the terminal", long_about = None)]
pub struct Args {
    /// Settings file (defaults to <config dir>/robotarium/settings.json)
    #[arg(long, value_name = "FILE", global = true)]
    pub settings: Option<PathBuf>,

    /// Emit NDJSON events instead of colored text
    #[arg(long, global = true)]
    pub headless: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Set up the toolchain: config file, package index, board core
    Init,

    /// Compile a sketch without uploading
    Compile {
        /// Sketch directory (defaults to the last project, then the current directory)
        #[arg(value_name = "PATH")]
        path: Option<PathBuf>,
    },

    /// Compile a sketch and upload it to the attached board
    Run {
        /// Sketch directory (defaults to the last project, then the current directory)
        #[arg(value_name = "PATH")]
        path: Option<PathBuf>,

        /// Upload to this port instead of the first serial board
        #[arg(long, value_name = "PORT")]
        port: Option<String>,
    },

    /// List serial-attached boards
    Devices,

    /// Check that the toolchain executable can be found
    Check,

    /// Change one setting and save it
    Set {
        key: String,

        /// JSON value; anything that is not valid JSON is taken as a string
        value: String,
    },
}

impl Command {
    pub fn name(&self) -> &'static str {
        match self {
            Command::Init => "init",
            Command::Compile { .. } => "compile",
            Command::Run { .. } => "run",
            Command::Devices => "devices",
            Command::Check => "check",
            Command::Set { .. } => "set",
        }
    }
}
