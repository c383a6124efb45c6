//! CLI module for rosterdb
//!
//! Commands:
//! - serve: boot the HTTP server against the configured store
//! - check: probe store readiness and exit
//! - seed: batch-create sample records

mod args;
mod commands;
mod errors;

pub use args::{Cli, Command};
pub use commands::run_command;
pub use errors::{CliError, CliResult};

/// Parse arguments and dispatch to the selected command.
pub fn run() -> CliResult<()> {
    let cli = Cli::parse_args();
    run_command(cli)
}
