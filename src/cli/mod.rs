//! Command-line interface
//!
//! - `browse` - Page through a JSON records file, one JSON line per page
//! - `validate` - Check a paginator configuration file

mod commands;
mod runner;

pub use commands::{Cli, Commands};
pub use runner::{BrowseCommand, Runner};
