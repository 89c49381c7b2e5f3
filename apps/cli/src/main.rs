//! inkpage CLI — inspect and check note space configuration.
//!
//! Prints the built-in defaults and schema, and validates configuration
//! files the same way the application loads them.

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
