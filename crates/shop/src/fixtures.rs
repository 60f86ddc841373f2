//! Sample-data seeding for tests and the CLI `seed` command.
//!
//! Not part of production logic. The shape mirrors the canonical test
//! scenario: a handful of users and a few orders placed by the first one.

use rust_decimal::Decimal;

use sugar_maple_core::Email;

use crate::db::{OrderRepository, RepositoryError, UserRepository};
use crate::models::{Order, User};

/// Entities created by [`seed_sample`].
#[derive(Debug)]
pub struct SampleData {
    pub users: Vec<User>,
    pub orders: Vec<Order>,
}

/// Seed `user_count` users (`user1@example.com`, `user2@example.com`, ...)
/// and `order_count` orders placed by the first user.
///
/// # Errors
///
/// Returns `RepositoryError::Conflict` if a seeded email already exists, or
/// any store error from the underlying repositories.
pub async fn seed_sample<U, O>(
    users: &U,
    orders: &O,
    user_count: usize,
    order_count: usize,
) -> Result<SampleData, RepositoryError>
where
    U: UserRepository,
    O: OrderRepository,
{
    let mut created_users = Vec::with_capacity(user_count);
    for n in 1..=user_count {
        let email = Email::parse(&format!("user{n}@example.com"))
            .map_err(|e| RepositoryError::DataCorruption(format!("invalid seed email: {e}")))?;
        created_users.push(users.create(&email).await?);
    }

    let mut created_orders = Vec::with_capacity(order_count);
    if let Some(first) = created_users.first() {
        for n in 0..order_count {
            let total = Decimal::new(1999, 2) + Decimal::from(n) * Decimal::new(500, 2);
            created_orders.push(orders.create(first.id, total).await?);
        }
    }

    Ok(SampleData {
        users: created_users,
        orders: created_orders,
    })
}
