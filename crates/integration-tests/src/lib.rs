//! Integration tests for Sugar Maple.
//!
//! # Running Tests
//!
//! The repository contract suite runs against the in-memory store by
//! default:
//!
//! ```bash
//! cargo test -p sugar-maple-integration-tests
//! ```
//!
//! The same checks run against PostgreSQL when a database is available:
//!
//! ```bash
//! DATABASE_URL=postgres://localhost/sugar_maple_test \
//!     cargo test -p sugar-maple-integration-tests -- --ignored --test-threads=1
//! ```
//!
//! PostgreSQL-backed tests truncate all shop tables before each test, so
//! point `DATABASE_URL` at a dedicated test database and run them serially.

#![cfg_attr(not(test), forbid(unsafe_code))]

use secrecy::SecretString;

use sugar_maple_shop::db::{self, PgStore};

/// Connect to the test database, apply migrations, and reset all tables.
///
/// # Panics
///
/// Panics if `DATABASE_URL` is unset or the database is unreachable; the
/// callers are `#[ignore]`d tests that require a running `PostgreSQL`.
pub async fn pg_store() -> PgStore {
    dotenvy::dotenv().ok();

    let url = std::env::var("DATABASE_URL")
        .map(SecretString::from)
        .expect("DATABASE_URL must be set for PostgreSQL-backed tests");

    let pool = db::create_pool(&url, 5)
        .await
        .expect("failed to connect to test database");

    db::MIGRATOR
        .run(&pool)
        .await
        .expect("failed to run migrations");

    sqlx::query("TRUNCATE TABLE cart_orders, carts, orders, users RESTART IDENTITY CASCADE")
        .execute(&pool)
        .await
        .expect("failed to reset shop tables");

    PgStore::new(pool)
}
