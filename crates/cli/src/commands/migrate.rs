//! Database migration command.
//!
//! # Environment Variables
//!
//! - `SHOP_DATABASE_URL` (or `DATABASE_URL`) - `PostgreSQL` connection string
//!
//! Migration files live in `crates/shop/migrations/` and are embedded into
//! the binary via `sqlx::migrate!`.

use tracing::info;

use sugar_maple_shop::config::{ConfigError, ShopConfig};
use sugar_maple_shop::db;

/// Errors that can occur while migrating.
#[derive(Debug, thiserror::Error)]
pub enum MigrateError {
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("migration error: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),
}

/// Run shop database migrations.
///
/// # Errors
///
/// Returns an error if configuration is missing, the database is
/// unreachable, or a migration fails to apply.
pub async fn run() -> Result<(), MigrateError> {
    let config = ShopConfig::from_env()?;

    info!("Connecting to shop database...");
    let pool = db::create_pool(&config.database_url, config.max_db_connections).await?;

    info!("Running shop migrations...");
    db::MIGRATOR.run(&pool).await?;

    info!("Shop migrations complete!");
    Ok(())
}
