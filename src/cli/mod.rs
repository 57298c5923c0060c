//! Command-line interface module.

mod args;
pub mod build;
pub mod list;

pub use args::{BuildArgs, Cli, Commands};
