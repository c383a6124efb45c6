//! CLI command implementations
//!
//! Each command loads and validates configuration, builds a runtime, and
//! runs one async entry function. Startup failures are the only
//! process-fatal errors in the system; once `serve` is accepting traffic,
//! errors flow back to clients as status codes instead.

use std::path::Path;
use std::sync::Arc;

use chrono::Utc;

use crate::config::Config;
use crate::context::OpContext;
use crate::model::User;
use crate::repo::{SearchUserRepo, UserRepo};
use crate::rest_api::RestServer;
use crate::store::StoreGateway;

use super::args::{Cli, Command};
use super::errors::{CliError, CliResult};

/// Dispatch to the selected command
pub fn run_command(cli: Cli) -> CliResult<()> {
    match cli.command {
        Command::Serve { config } => serve(&config),
        Command::Check { config } => check(&config),
        Command::Seed { config, count } => seed(&config, count),
    }
}

/// Boot the HTTP server and serve until the process exits.
pub fn serve(config_path: &Path) -> CliResult<()> {
    init_tracing();
    let config = Config::load(config_path)?;
    let addr = config.parsed_bind_addr()?;

    runtime()?.block_on(async {
        let repo = connect_repo(&config).await?;
        let server = RestServer::new(repo, config.request_timeout());
        server
            .serve(addr)
            .await
            .map_err(|e| CliError::boot_failed(format!("server failed: {}", e)))
    })
}

/// Probe store readiness; exit non-zero when the store cannot serve.
pub fn check(config_path: &Path) -> CliResult<()> {
    init_tracing();
    let config = Config::load(config_path)?;

    runtime()?.block_on(async {
        let repo = connect_repo(&config).await?;
        if repo.is_ready(&OpContext::background()).await {
            println!("store ready: collection '{}'", config.collection);
            Ok(())
        } else {
            Err(CliError::store_unavailable(format!(
                "collection '{}' is not ready",
                config.collection
            )))
        }
    })
}

/// Batch-create `count` sample records and report the outcome.
pub fn seed(config_path: &Path, count: usize) -> CliResult<()> {
    init_tracing();
    let config = Config::load(config_path)?;

    runtime()?.block_on(async {
        let repo = connect_repo(&config).await?;
        let ctx = OpContext::with_timeout(config.request_timeout());

        let outcome = repo
            .batch_create(&ctx, sample_users(count))
            .await
            .map_err(|e| CliError::store_unavailable(e.to_string()))?;

        println!("created {} of {} records", outcome.succeeded(), count);
        if outcome.is_complete_success() {
            Ok(())
        } else {
            Err(CliError::seed_failed(format!(
                "{} of {} records failed",
                outcome.failed(),
                count
            )))
        }
    })
}

async fn connect_repo(config: &Config) -> CliResult<SearchUserRepo> {
    let gateway = StoreGateway::connect(&config.store_endpoint, &config.collection)
        .await
        .map_err(|e| CliError::store_unavailable(e.to_string()))?;
    Ok(SearchUserRepo::new(
        Arc::new(gateway),
        config.id_strategy.build(),
    ))
}

fn runtime() -> CliResult<tokio::runtime::Runtime> {
    tokio::runtime::Runtime::new()
        .map_err(|e| CliError::boot_failed(format!("failed to start runtime: {}", e)))
}

fn init_tracing() {
    use tracing_subscriber::EnvFilter;

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    // try_init so repeated calls (tests) are harmless
    let _ = tracing_subscriber::fmt().with_env_filter(filter).try_init();
}

fn sample_users(count: usize) -> Vec<User> {
    let now = Utc::now().timestamp();
    (0..count)
        .map(|i| User {
            id: String::new(),
            name: format!("sample user {}", i),
            dob: now - 60 * 60 * 24 * 365,
            address: format!("sample address {}", i),
            description: "seeded record".to_string(),
            ctime: now,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sample_users_pass_validation() {
        for user in sample_users(5) {
            assert_eq!(user.validate_new(), Ok(()));
        }
    }

    #[test]
    fn seed_with_missing_config_fails_fast() {
        let err = seed(Path::new("/nonexistent/rosterdb.json"), 1).expect_err("no config");
        assert!(err.to_string().contains("ROSTER_CLI_CONFIG_ERROR"));
    }
}
