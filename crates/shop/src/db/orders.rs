//! Order repository: trait contract and PostgreSQL implementation.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sqlx::{PgPool, Postgres, QueryBuilder};

use sugar_maple_core::{OrderId, UserId};

use super::{RepositoryError, conflict_on_violation};
use crate::models::Order;

/// Equality criteria for order lookups.
///
/// Unset fields match everything; an empty filter matches every order.
#[derive(Debug, Clone, Copy, Default)]
pub struct OrderFilter {
    user_id: Option<UserId>,
}

impl OrderFilter {
    /// An empty filter (matches all orders).
    #[must_use]
    pub const fn new() -> Self {
        Self { user_id: None }
    }

    /// Restrict to orders placed by the given user.
    #[must_use]
    pub const fn user_id(mut self, user_id: UserId) -> Self {
        self.user_id = Some(user_id);
        self
    }

    pub(crate) const fn matches(&self, order: &Order) -> bool {
        match self.user_id {
            Some(user_id) => order.user_id.as_i32() == user_id.as_i32(),
            None => true,
        }
    }
}

/// Repository contract for order operations.
///
/// Orders are read-only collaborators of the cart layer; creation belongs to
/// order placement.
#[async_trait]
pub trait OrderRepository: Send + Sync {
    /// Create a new order for a user.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Conflict` if the user does not exist.
    async fn create(&self, user_id: UserId, total: Decimal) -> Result<Order, RepositoryError>;

    /// Get all orders, ordered by ID.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    async fn get_all(&self) -> Result<Vec<Order>, RepositoryError>;

    /// Get all orders matching the filter, ordered by ID.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    async fn filter_all(&self, filter: &OrderFilter) -> Result<Vec<Order>, RepositoryError>;
}

/// Internal row type for `PostgreSQL` order queries.
///
/// Shared with the cart repository, which loads a cart's associated orders
/// through the `cart_orders` join table.
#[derive(Debug, sqlx::FromRow)]
pub(crate) struct OrderRow {
    id: i32,
    user_id: i32,
    total: Decimal,
    created_at: DateTime<Utc>,
}

impl From<OrderRow> for Order {
    fn from(row: OrderRow) -> Self {
        Self {
            id: OrderId::new(row.id),
            user_id: UserId::new(row.user_id),
            total: row.total,
            created_at: row.created_at,
        }
    }
}

/// PostgreSQL-backed order repository.
pub struct PgOrderRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> PgOrderRepository<'a> {
    /// Create a new order repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl OrderRepository for PgOrderRepository<'_> {
    async fn create(&self, user_id: UserId, total: Decimal) -> Result<Order, RepositoryError> {
        let row: OrderRow = sqlx::query_as(
            r"
            INSERT INTO orders (user_id, total)
            VALUES ($1, $2)
            RETURNING id, user_id, total, created_at
            ",
        )
        .bind(user_id)
        .bind(total)
        .fetch_one(self.pool)
        .await
        .map_err(|e| conflict_on_violation(e, "order references a missing user"))?;

        Ok(row.into())
    }

    async fn get_all(&self) -> Result<Vec<Order>, RepositoryError> {
        let rows: Vec<OrderRow> = sqlx::query_as(
            r"
            SELECT id, user_id, total, created_at
            FROM orders
            ORDER BY id ASC
            ",
        )
        .fetch_all(self.pool)
        .await?;

        Ok(rows.into_iter().map(Into::into).collect())
    }

    async fn filter_all(&self, filter: &OrderFilter) -> Result<Vec<Order>, RepositoryError> {
        let mut query: QueryBuilder<'_, Postgres> =
            QueryBuilder::new("SELECT id, user_id, total, created_at FROM orders WHERE TRUE");
        if let Some(user_id) = filter.user_id {
            query.push(" AND user_id = ").push_bind(user_id);
        }
        query.push(" ORDER BY id ASC");

        let rows: Vec<OrderRow> = query.build_query_as().fetch_all(self.pool).await?;

        Ok(rows.into_iter().map(Into::into).collect())
    }
}
