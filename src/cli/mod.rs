//! Command line interface for cleaning archived posts.

pub mod commands;

pub use commands::{Cli, Format, run};
