//! CLI commands and argument parsing

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// anchor-pager CLI
#[derive(Parser, Debug)]
#[command(name = "anchor-pager")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Paginator configuration file (YAML or JSON)
    #[arg(short = 'C', long, global = true)]
    pub config: Option<PathBuf>,

    /// Verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

/// CLI subcommands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Page through a JSON array of records
    Browse {
        /// Records file (JSON array of objects)
        #[arg(short, long)]
        records: PathBuf,

        /// Field holding each record's id
        #[arg(long, default_value = "id")]
        id_field: String,

        /// Page size (overrides the config file)
        #[arg(short, long)]
        page_size: Option<usize>,

        /// Navigation actions to run (comma-separated); read from stdin when absent
        #[arg(short, long)]
        actions: Option<String>,
    },

    /// Validate a paginator configuration file
    Validate,
}
