//! datacat CLI — dataset catalog documentation generator.
//!
//! Renders a registry snapshot of dataset descriptors into a catalog:
//! one overview page plus one document per dataset, grouped by
//! category.

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
