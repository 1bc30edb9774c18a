//! allweneed CLI: static directory site generator.
//!
//! Turns a folder of markdown project descriptions into a searchable
//! directory website with contributor enrichment and a leaderboard.

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
