//! Binary crate for the `weather` command-line tool.
//!
//! This crate focuses on:
//! - Parsing CLI arguments
//! - Reading the city from the console
//! - Human-friendly output formatting

use clap::Parser;

mod cli;
mod logging;
mod render;

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    let cmd = cli::Cli::parse();
    logging::init(cmd.verbose)?;
    cmd.run().await
}
