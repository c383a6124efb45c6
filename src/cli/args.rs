//! CLI argument definitions using clap
//!
//! Commands:
//! - rosterdb serve --config <path>
//! - rosterdb check --config <path>
//! - rosterdb seed --config <path> --count <n>

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// rosterdb - a user-record CRUD service backed by a document-search store
#[derive(Parser, Debug)]
#[command(name = "rosterdb")]
#[command(version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Start the HTTP server
    Serve {
        /// Path to configuration file
        #[arg(long, default_value = "./rosterdb.json")]
        config: PathBuf,
    },

    /// Probe store readiness and exit
    Check {
        /// Path to configuration file
        #[arg(long, default_value = "./rosterdb.json")]
        config: PathBuf,
    },

    /// Batch-create sample records
    Seed {
        /// Path to configuration file
        #[arg(long, default_value = "./rosterdb.json")]
        config: PathBuf,

        /// Number of records to create
        #[arg(long, default_value_t = 10)]
        count: usize,
    },
}

impl Cli {
    /// Parse command line arguments
    pub fn parse_args() -> Self {
        Cli::parse()
    }
}
