//! Cart repository: trait contract and PostgreSQL implementation.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{PgPool, Postgres, QueryBuilder};
use uuid::Uuid;

use sugar_maple_core::{CartId, PublicId, UserId};

use super::orders::OrderRow;
use super::{RepositoryError, conflict_on_violation};
use crate::models::{Cart, Order};

/// Equality criteria for cart lookups.
///
/// Unset fields match everything; an empty filter matches every cart.
#[derive(Debug, Clone, Copy, Default)]
pub struct CartFilter {
    user_id: Option<UserId>,
    public_id: Option<PublicId>,
}

impl CartFilter {
    /// An empty filter (matches all carts).
    #[must_use]
    pub const fn new() -> Self {
        Self {
            user_id: None,
            public_id: None,
        }
    }

    /// Restrict to carts owned by the given user.
    #[must_use]
    pub const fn user_id(mut self, user_id: UserId) -> Self {
        self.user_id = Some(user_id);
        self
    }

    /// Restrict to the cart with the given public id.
    #[must_use]
    pub const fn public_id(mut self, public_id: PublicId) -> Self {
        self.public_id = Some(public_id);
        self
    }

    /// Whether any criterion is set.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.user_id.is_none() && self.public_id.is_none()
    }

    pub(crate) fn matches(&self, cart: &Cart) -> bool {
        self.user_id.is_none_or(|user_id| cart.user_id == user_id)
            && self.public_id.is_none_or(|public_id| cart.public_id == public_id)
    }
}

/// Repository contract for cart operations.
///
/// Carts are created with a fixed order set and deleted whole; there is no
/// update operation. Absence is always `Ok(None)`, never an error.
#[async_trait]
pub trait CartRepository: Send + Sync {
    /// Create a new cart for a user, associating the given orders.
    ///
    /// The store assigns a fresh internal id and a random public id. The
    /// returned cart's `orders` equal the input set.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Conflict` if the user or any order does not
    /// exist.
    async fn create(&self, user_id: UserId, orders: &[Order]) -> Result<Cart, RepositoryError>;

    /// Get all carts, ordered by ID.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    async fn get_all(&self) -> Result<Vec<Cart>, RepositoryError>;

    /// Get a cart by its internal ID, or `None` if absent.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    async fn get_by_id(&self, id: CartId) -> Result<Option<Cart>, RepositoryError>;

    /// Get a cart by its public ID, or `None` if absent.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    async fn get_by_public_id(
        &self,
        public_id: &PublicId,
    ) -> Result<Option<Cart>, RepositoryError>;

    /// Get a single cart matching all criteria, or `None` if nothing matches.
    ///
    /// When several carts match, the one with the lowest id is returned.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    async fn filter(&self, filter: &CartFilter) -> Result<Option<Cart>, RepositoryError>;

    /// Get all carts matching all criteria, ordered by ID.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    async fn filter_all(&self, filter: &CartFilter) -> Result<Vec<Cart>, RepositoryError>;

    /// Get the user's cart, creating an empty one if none exists.
    ///
    /// Returns the cart and whether it was created by this call. The lookup
    /// and the insert are separate statements: two concurrent callers for the
    /// same user can both observe a miss and both create a cart. One cart per
    /// user is an application-level policy, not a store guarantee; callers
    /// needing a hard guarantee must serialize externally.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Conflict` if the user does not exist.
    async fn get_or_create(&self, user_id: UserId) -> Result<(Cart, bool), RepositoryError>;

    /// Delete a cart and its order associations.
    ///
    /// Idempotent: deleting an already-absent cart succeeds, since the
    /// post-condition (absence) already holds.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    async fn delete(&self, cart: &Cart) -> Result<(), RepositoryError>;
}

/// Internal row type for `PostgreSQL` cart queries (without orders).
#[derive(Debug, sqlx::FromRow)]
struct CartRow {
    id: i32,
    public_id: Uuid,
    user_id: i32,
    created_at: DateTime<Utc>,
}

impl CartRow {
    fn into_cart(self, orders: Vec<Order>) -> Cart {
        Cart {
            id: CartId::new(self.id),
            public_id: PublicId::from(self.public_id),
            user_id: UserId::new(self.user_id),
            orders,
            created_at: self.created_at,
        }
    }
}

/// PostgreSQL-backed cart repository.
pub struct PgCartRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> PgCartRepository<'a> {
    /// Create a new cart repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Load the orders associated with a cart, ordered by order ID.
    async fn orders_for(&self, cart_id: CartId) -> Result<Vec<Order>, RepositoryError> {
        let rows: Vec<OrderRow> = sqlx::query_as(
            r"
            SELECT o.id, o.user_id, o.total, o.created_at
            FROM orders o
            JOIN cart_orders co ON co.order_id = o.id
            WHERE co.cart_id = $1
            ORDER BY o.id ASC
            ",
        )
        .bind(cart_id)
        .fetch_all(self.pool)
        .await?;

        Ok(rows.into_iter().map(Into::into).collect())
    }

    /// Attach each cart's associated orders.
    async fn hydrate(&self, rows: Vec<CartRow>) -> Result<Vec<Cart>, RepositoryError> {
        let mut carts = Vec::with_capacity(rows.len());
        for row in rows {
            let orders = self.orders_for(CartId::new(row.id)).await?;
            carts.push(row.into_cart(orders));
        }
        Ok(carts)
    }

    fn select(filter: &CartFilter) -> QueryBuilder<'_, Postgres> {
        let mut query: QueryBuilder<'_, Postgres> =
            QueryBuilder::new("SELECT id, public_id, user_id, created_at FROM carts WHERE TRUE");
        if let Some(user_id) = filter.user_id {
            query.push(" AND user_id = ").push_bind(user_id);
        }
        if let Some(public_id) = filter.public_id {
            query.push(" AND public_id = ").push_bind(public_id);
        }
        query
    }
}

#[async_trait]
impl CartRepository for PgCartRepository<'_> {
    async fn create(&self, user_id: UserId, orders: &[Order]) -> Result<Cart, RepositoryError> {
        let mut tx = self.pool.begin().await?;

        let row: CartRow = sqlx::query_as(
            r"
            INSERT INTO carts (public_id, user_id)
            VALUES ($1, $2)
            RETURNING id, public_id, user_id, created_at
            ",
        )
        .bind(PublicId::random())
        .bind(user_id)
        .fetch_one(&mut *tx)
        .await
        .map_err(|e| conflict_on_violation(e, "cart references a missing user"))?;

        for order in orders {
            sqlx::query(
                r"
                INSERT INTO cart_orders (cart_id, order_id)
                VALUES ($1, $2)
                ",
            )
            .bind(row.id)
            .bind(order.id)
            .execute(&mut *tx)
            .await
            .map_err(|e| conflict_on_violation(e, "cart references a missing order"))?;
        }

        tx.commit().await?;

        Ok(row.into_cart(orders.to_vec()))
    }

    async fn get_all(&self) -> Result<Vec<Cart>, RepositoryError> {
        let rows: Vec<CartRow> = sqlx::query_as(
            r"
            SELECT id, public_id, user_id, created_at
            FROM carts
            ORDER BY id ASC
            ",
        )
        .fetch_all(self.pool)
        .await?;

        self.hydrate(rows).await
    }

    async fn get_by_id(&self, id: CartId) -> Result<Option<Cart>, RepositoryError> {
        let row: Option<CartRow> = sqlx::query_as(
            r"
            SELECT id, public_id, user_id, created_at
            FROM carts
            WHERE id = $1
            ",
        )
        .bind(id)
        .fetch_optional(self.pool)
        .await?;

        match row {
            Some(row) => {
                let orders = self.orders_for(CartId::new(row.id)).await?;
                Ok(Some(row.into_cart(orders)))
            }
            None => Ok(None),
        }
    }

    async fn get_by_public_id(
        &self,
        public_id: &PublicId,
    ) -> Result<Option<Cart>, RepositoryError> {
        self.filter(&CartFilter::new().public_id(*public_id)).await
    }

    async fn filter(&self, filter: &CartFilter) -> Result<Option<Cart>, RepositoryError> {
        let mut query = Self::select(filter);
        query.push(" ORDER BY id ASC LIMIT 1");

        let row: Option<CartRow> = query.build_query_as().fetch_optional(self.pool).await?;

        match row {
            Some(row) => {
                let orders = self.orders_for(CartId::new(row.id)).await?;
                Ok(Some(row.into_cart(orders)))
            }
            None => Ok(None),
        }
    }

    async fn filter_all(&self, filter: &CartFilter) -> Result<Vec<Cart>, RepositoryError> {
        let mut query = Self::select(filter);
        query.push(" ORDER BY id ASC");

        let rows: Vec<CartRow> = query.build_query_as().fetch_all(self.pool).await?;

        self.hydrate(rows).await
    }

    async fn get_or_create(&self, user_id: UserId) -> Result<(Cart, bool), RepositoryError> {
        if let Some(cart) = self.filter(&CartFilter::new().user_id(user_id)).await? {
            return Ok((cart, false));
        }

        let cart = self.create(user_id, &[]).await?;
        Ok((cart, true))
    }

    async fn delete(&self, cart: &Cart) -> Result<(), RepositoryError> {
        // Association rows go with the cart (ON DELETE CASCADE).
        let result = sqlx::query(
            r"
            DELETE FROM carts
            WHERE id = $1
            ",
        )
        .bind(cart.id)
        .execute(self.pool)
        .await?;

        if result.rows_affected() == 0 {
            tracing::debug!(cart_id = %cart.id, "delete: cart already absent");
        }

        Ok(())
    }
}
