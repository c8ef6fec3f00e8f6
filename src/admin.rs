//! Administrative command handlers.
//!
//! Deactivation is deliberately an operator action: no HTTP endpoint
//! touches the soft-delete flag, only these CLI commands do.

use crate::config::Config;
use crate::db::Repository;
use crate::error::{AppError, AppResult};
use clap::Subcommand;
use tracing::info;

/// Administrative commands available via CLI.
#[derive(Subcommand, Debug)]
pub enum AdminCommands {
    /// Run database migrations
    Migrate,

    /// Show aggregate statistics
    Stats,

    /// Soft-delete a short URL (hidden from redirects and listings)
    Deactivate {
        /// The short id to deactivate
        short_id: String,
    },

    /// Reactivate a previously deactivated short URL
    Activate {
        /// The short id to reactivate
        short_id: String,
    },
}

/// Run an administrative command with the given configuration.
pub async fn run(config: Config, admin_command: AdminCommands) -> AppResult<()> {
    let repository = connect(&config).await?;

    match admin_command {
        AdminCommands::Migrate => migrate(&repository).await,
        AdminCommands::Stats => stats(&repository).await,
        AdminCommands::Deactivate { short_id } => set_active(&repository, &short_id, false).await,
        AdminCommands::Activate { short_id } => set_active(&repository, &short_id, true).await,
    }
}

async fn connect(config: &Config) -> AppResult<Repository> {
    Repository::new(
        &config.database.url,
        config.database.max_connections,
        config.database.min_connections,
        config.database.acquire_timeout_seconds,
    )
    .await
}

async fn migrate(repository: &Repository) -> AppResult<()> {
    info!("Running database migrations...");
    repository.run_migrations().await?;
    info!("Migrations completed successfully");
    Ok(())
}

async fn stats(repository: &Repository) -> AppResult<()> {
    let stats = repository.get_stats().await?;

    println!("\n=== smartlink Statistics ===");
    println!("Total URLs:      {}", stats.total_urls);
    println!("Active URLs:     {}", stats.active_urls);
    println!("Total Clicks:    {}", stats.total_clicks);
    println!();

    Ok(())
}

async fn set_active(repository: &Repository, short_id: &str, active: bool) -> AppResult<()> {
    let updated = repository.set_active(short_id, active).await?;

    if !updated {
        return Err(AppError::NotFound(short_id.to_string()));
    }

    info!(
        short_id,
        active, "Short URL active flag updated"
    );
    Ok(())
}
