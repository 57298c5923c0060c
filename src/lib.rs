//! docweave - document assembly for multi-source documentation builds.
//!
//! - [`vfs`]: layered content roots behind a single file layer
//! - [`core`]: link classification and locale handling
//! - [`html`]: link rewriting, sanitization and metadata extraction
//! - [`config`] / [`cli`]: `docweave.toml` and the command-line driver

pub mod logger;

pub mod cli;
pub mod config;
pub mod core;
pub mod html;
pub mod vfs;
