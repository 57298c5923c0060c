//! docweave - assemble a documentation set from layered content roots.

use anyhow::Result;
use clap::{ColorChoice, Parser};
use docweave::cli::{Cli, Commands, build::build_docs, list::list_inputs};
use docweave::config::DocConfig;

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Set global color override based on CLI option
    match cli.color {
        ColorChoice::Always => owo_colors::set_override(true),
        ColorChoice::Never => owo_colors::set_override(false),
        ColorChoice::Auto => {} // owo-colors auto-detects TTY
    }

    let config = DocConfig::load(&cli)?;

    match &cli.command {
        Commands::Build { .. } => build_docs(&config).map(|_| ()),
        Commands::List { physical } => list_inputs(&config, *physical),
    }
}
