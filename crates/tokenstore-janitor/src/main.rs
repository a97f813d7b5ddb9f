mod cli;
mod config;
mod observability;

use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use tokenstore_core::{CleanupScheduler, expiry_cutoff, get_millis};
use tokenstore_postgres::{PostgresTokenStore, migrations, pool};
use tokio::sync::watch;
use tracing::info;

use crate::cli::{Cli, Commands};
use crate::config::AppConfig;

#[tokio::main]
async fn main() {
    if let Err(e) = run().await {
        eprintln!("error: {e:#}");
        std::process::exit(1);
    }
}

async fn run() -> Result<()> {
    let cli = Cli::parse();
    let config = crate::config::loader::load_config(cli.config.as_deref())?;

    let level = cli.log_level.as_deref().unwrap_or(&config.logging.level);
    observability::init_tracing_with_level(level);

    match cli.command {
        Commands::Migrate => {
            let pool = pool::create_pool(&config.postgres, &config.postgres.url)
                .await
                .context("connect to primary database")?;
            migrations::run(&pool).await?;
        }
        Commands::Cleanup => {
            let store = connect_store(&config).await?;
            let cutoff = expiry_cutoff(get_millis(), config.cleanup.retention_ms);
            let deleted = store
                .remove_expired(cutoff)
                .await
                .context("clean up expired tokens")?;
            info!(deleted, cutoff, "Expired tokens removed");
        }
        Commands::Run => {
            let store = connect_store(&config).await?;
            pool::test_connection(store.primary())
                .await
                .context("check primary database")?;
            pool::test_connection(store.replica())
                .await
                .context("check replica database")?;

            let (shutdown_tx, shutdown_rx) = watch::channel(false);
            let scheduler = CleanupScheduler::new(Arc::new(store), config.cleanup.interval());
            let handle = scheduler.spawn(shutdown_rx);

            tokio::signal::ctrl_c()
                .await
                .context("listen for shutdown signal")?;
            info!("Shutdown requested");

            let _ = shutdown_tx.send(true);
            handle.await.context("cleanup scheduler task")?;
        }
    }

    Ok(())
}

async fn connect_store(config: &AppConfig) -> Result<PostgresTokenStore> {
    let store = PostgresTokenStore::connect(&config.postgres)
        .await
        .context("connect to database")?
        .with_retention_ms(config.cleanup.retention_ms);
    Ok(store)
}
