//! Robotarium - compile and flash Arduino sketches from the terminal
//!
//! This is the binary entry point. All logic lives in the library.

use clap::Parser;
use robotarium::Args;

#[tokio::main]
async fn main() -> color_eyre::Result<()> {
    color_eyre::install()?;
    let args = Args::parse();

    if let Err(e) = robotarium_core::logging::init() {
        eprintln!("Failed to initialize logging: {}", e);
    }

    if !robotarium::run(args).await? {
        std::process::exit(1);
    }
    Ok(())
}
