//! Command-line interface definitions.

use clap::{ColorChoice, Parser, Subcommand};
use std::path::PathBuf;

/// docweave documentation assembler CLI
#[derive(Parser, Debug, Clone)]
#[command(version, about, long_about = None, arg_required_else_help = true)]
pub struct Cli {
    /// Control colored output (auto, always, never)
    #[arg(long, global = true, default_value = "auto")]
    pub color: ColorChoice,

    /// Config file path (default: docweave.toml)
    #[arg(short = 'C', long, default_value = "docweave.toml", value_hint = clap::ValueHint::FilePath)]
    pub config: PathBuf,

    /// subcommands
    #[command(subcommand)]
    pub command: Commands,
}

/// Available subcommands
#[derive(Subcommand, Debug, Clone)]
pub enum Commands {
    /// Assemble the docset: post-process HTML, copy everything else
    #[command(visible_alias = "b")]
    Build {
        #[command(flatten)]
        build_args: BuildArgs,
    },

    /// List logical documents and the content root supplying each
    #[command(visible_alias = "ls")]
    List {
        /// Print physical source paths instead of content roots
        #[arg(short, long)]
        physical: bool,
    },
}

/// Build command arguments. Flags override `docweave.toml`.
#[derive(clap::Args, Debug, Clone, Default)]
pub struct BuildArgs {
    /// Target locale inserted into site-absolute links (e.g. zh-cn)
    #[arg(short, long)]
    pub locale: Option<String>,

    /// Output directory (relative to the current directory)
    #[arg(short, long, value_hint = clap::ValueHint::DirPath)]
    pub output: Option<PathBuf>,

    /// Remove the output directory before building
    #[arg(short, long)]
    pub clean: bool,

    /// Tag links with `data-linktype` and localize absolute links
    #[arg(long = "link-type", action = clap::ArgAction::Set, num_args = 0..=1, default_missing_value = "true", require_equals = false)]
    pub link_type: Option<bool>,

    /// Strip `<style>`, `<link>`, `<script>` and inline styles
    #[arg(short = 'S', long = "strip-tags", action = clap::ArgAction::Set, num_args = 0..=1, default_missing_value = "true", require_equals = false)]
    pub strip_tags: Option<bool>,

    /// Enable verbose output for debugging
    #[arg(short = 'V', long)]
    pub verbose: bool,
}

impl Cli {
    /// Build arguments, if the command takes them.
    pub fn build_args(&self) -> Option<&BuildArgs> {
        match &self.command {
            Commands::Build { build_args } => Some(build_args),
            Commands::List { .. } => None,
        }
    }
}
