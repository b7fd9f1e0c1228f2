//! Monedero ledger daemon.
//!
//! Runs pending migrations, then keeps the two reclamation sweeps alive
//! until Ctrl+C.

use anyhow::Context;
use sea_orm_migration::MigratorTrait;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use monedero_db::migration::Migrator;
use monedero_db::{ReclamationScheduler, connect};
use monedero_shared::AppConfig;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables from .env file
    dotenvy::dotenv().ok();

    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "monedero=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = AppConfig::load().context("Failed to load configuration")?;

    let db = connect(&config.database.url).await?;
    info!("Connected to database");

    Migrator::up(&db, None).await?;
    info!("Migrations applied");

    let scheduler = ReclamationScheduler::start(db, &config.reclamation);
    info!(
        guest_interval_secs = config.reclamation.guest_sweep_interval_secs,
        retention_enabled = config.reclamation.retention_enabled,
        "Reclamation sweeps running"
    );

    tokio::signal::ctrl_c().await?;
    info!("Shutting down");
    scheduler.shutdown();

    Ok(())
}
