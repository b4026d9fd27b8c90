//! LaunchKit CLI: turn a one-line startup idea into a launch kit.
//!
//! Runs the stage pipeline and prints the result document, optionally
//! writing the static site and the approved export bundle to disk.

mod commands;

use clap::Parser;
use color_eyre::eyre::Result;

use commands::Cli;

#[tokio::main]
async fn main() -> Result<()> {
    color_eyre::install()?;
    let cli = Cli::parse();
    commands::init_tracing(&cli);
    commands::run(cli).await
}
