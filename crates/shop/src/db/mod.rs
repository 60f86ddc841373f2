//! Database access for the shop backend.
//!
//! # Tables
//!
//! - `users` - Account holders
//! - `orders` - Purchase records (owned by a user)
//! - `carts` - Shopping carts (owned by a user, identified externally by a
//!   UUID public id)
//! - `cart_orders` - Cart/order association rows (cascade-deleted with the
//!   cart)
//!
//! # Repositories
//!
//! Each entity has a repository trait with a uniform CRUD shape
//! ([`UserRepository`], [`OrderRepository`], [`CartRepository`]). Two store
//! implementations are provided: [`PgStore`] (PostgreSQL via sqlx) and
//! [`MemoryStore`] (in-memory, for tests and local development). Application
//! code should depend on the traits so the store can be swapped or faked.
//!
//! # Migrations
//!
//! Migrations are stored in `crates/shop/migrations/` and run via:
//! ```bash
//! cargo run -p sugar-maple-cli -- migrate
//! ```

pub mod carts;
pub mod memory;
pub mod orders;
pub mod users;

use std::time::Duration;

use secrecy::ExposeSecret;
use sqlx::PgPool;
use sqlx::postgres::PgPoolOptions;
use thiserror::Error;

pub use carts::{CartFilter, CartRepository, PgCartRepository};
pub use memory::MemoryStore;
pub use orders::{OrderFilter, OrderRepository, PgOrderRepository};
pub use users::{PgUserRepository, UserRepository};

/// Embedded sqlx migrations for the shop schema.
pub static MIGRATOR: sqlx::migrate::Migrator = sqlx::migrate!();

/// Errors that can occur during repository operations.
#[derive(Debug, Error)]
pub enum RepositoryError {
    /// Database error from sqlx.
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Data in the database is corrupted or invalid.
    #[error("data corruption: {0}")]
    DataCorruption(String),

    /// Requested entity was not found.
    #[error("not found")]
    NotFound,

    /// Constraint violation (e.g., unique email, dangling foreign key).
    #[error("constraint violation: {0}")]
    Conflict(String),
}

/// Map unique and foreign-key violations to [`RepositoryError::Conflict`],
/// everything else to [`RepositoryError::Database`].
pub(crate) fn conflict_on_violation(e: sqlx::Error, message: &str) -> RepositoryError {
    if let sqlx::Error::Database(ref db_err) = e
        && (db_err.is_unique_violation() || db_err.is_foreign_key_violation())
    {
        return RepositoryError::Conflict(message.to_owned());
    }
    RepositoryError::Database(e)
}

/// Create a `PostgreSQL` connection pool with sensible defaults.
///
/// # Arguments
///
/// * `database_url` - `PostgreSQL` connection string (wrapped in `SecretString`)
/// * `max_connections` - Pool size (see `ShopConfig::max_db_connections`)
///
/// # Errors
///
/// Returns `sqlx::Error` if the connection cannot be established.
pub async fn create_pool(
    database_url: &secrecy::SecretString,
    max_connections: u32,
) -> Result<PgPool, sqlx::Error> {
    PgPoolOptions::new()
        .max_connections(max_connections)
        .min_connections(2)
        .acquire_timeout(Duration::from_secs(10))
        .connect(database_url.expose_secret())
        .await
}

/// PostgreSQL-backed store.
///
/// Hands out per-entity repositories borrowing the shared pool. The pool is
/// passed explicitly rather than held in module-level state so callers
/// control connection lifetime and tests can run against isolated databases.
#[derive(Debug, Clone)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    /// Create a new store over an established connection pool.
    #[must_use]
    pub const fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// The underlying connection pool.
    #[must_use]
    pub const fn pool(&self) -> &PgPool {
        &self.pool
    }

    /// Repository for user operations.
    #[must_use]
    pub const fn users(&self) -> PgUserRepository<'_> {
        PgUserRepository::new(&self.pool)
    }

    /// Repository for order operations.
    #[must_use]
    pub const fn orders(&self) -> PgOrderRepository<'_> {
        PgOrderRepository::new(&self.pool)
    }

    /// Repository for cart operations.
    #[must_use]
    pub const fn carts(&self) -> PgCartRepository<'_> {
        PgCartRepository::new(&self.pool)
    }
}
