//! Seed the database with sample users and orders.
//!
//! This command connects to the configured database and runs the shared
//! fixture: N users plus M orders placed by the first user. Intended for
//! development databases; seeded emails are fixed, so running it twice
//! against the same database fails on the unique email constraint.

use tracing::info;

use sugar_maple_shop::config::ShopConfig;
use sugar_maple_shop::db::{self, PgStore};
use sugar_maple_shop::fixtures;

/// Seed sample data.
///
/// # Errors
///
/// Returns an error if configuration is missing, the database is
/// unreachable, or seeding conflicts with existing data.
pub async fn run(users: usize, orders: usize) -> Result<(), Box<dyn std::error::Error>> {
    let config = ShopConfig::from_env()?;

    let pool = db::create_pool(&config.database_url, config.max_db_connections).await?;
    info!("Connected to database");

    let store = PgStore::new(pool);
    let data = fixtures::seed_sample(&store.users(), &store.orders(), users, orders).await?;

    info!("Seeding complete!");
    info!("  Users created: {}", data.users.len());
    info!("  Orders created: {}", data.orders.len());

    Ok(())
}
