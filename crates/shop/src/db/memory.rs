//! In-memory store implementing the repository traits.
//!
//! Suitable for tests and local development. Not for production use: nothing
//! is durable and ids restart at 1 for every store.

use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use async_trait::async_trait;
use chrono::Utc;
use rust_decimal::Decimal;

use sugar_maple_core::{CartId, Email, OrderId, PublicId, UserId};

use super::{
    CartFilter, CartRepository, OrderFilter, OrderRepository, RepositoryError, UserRepository,
};
use crate::models::{Cart, Order, User};

#[derive(Debug)]
struct Inner {
    users: Vec<User>,
    orders: Vec<Order>,
    carts: Vec<Cart>,
    next_user_id: i32,
    next_order_id: i32,
    next_cart_id: i32,
}

impl Default for Inner {
    fn default() -> Self {
        Self {
            users: Vec::new(),
            orders: Vec::new(),
            carts: Vec::new(),
            next_user_id: 1,
            next_order_id: 1,
            next_cart_id: 1,
        }
    }
}

fn read(inner: &RwLock<Inner>) -> RwLockReadGuard<'_, Inner> {
    inner.read().unwrap_or_else(PoisonError::into_inner)
}

fn write(inner: &RwLock<Inner>) -> RwLockWriteGuard<'_, Inner> {
    inner.write().unwrap_or_else(PoisonError::into_inner)
}

fn create_cart_locked(
    inner: &mut Inner,
    user_id: UserId,
    orders: &[Order],
) -> Result<Cart, RepositoryError> {
    if !inner.users.iter().any(|u| u.id == user_id) {
        return Err(RepositoryError::Conflict(
            "cart references a missing user".to_owned(),
        ));
    }
    for order in orders {
        if !inner.orders.iter().any(|o| o.id == order.id) {
            return Err(RepositoryError::Conflict(
                "cart references a missing order".to_owned(),
            ));
        }
    }

    let cart = Cart {
        id: CartId::new(inner.next_cart_id),
        public_id: PublicId::random(),
        user_id,
        orders: orders.to_vec(),
        created_at: Utc::now(),
    };
    inner.next_cart_id += 1;
    inner.carts.push(cart.clone());
    Ok(cart)
}

/// In-memory store.
///
/// Hands out per-entity repositories sharing the same state, mirroring
/// [`super::PgStore`]. Cheap to clone; clones share state.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    inner: Arc<RwLock<Inner>>,
}

impl MemoryStore {
    /// Create a new empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Repository for user operations.
    #[must_use]
    pub fn users(&self) -> MemoryUserRepository {
        MemoryUserRepository {
            inner: Arc::clone(&self.inner),
        }
    }

    /// Repository for order operations.
    #[must_use]
    pub fn orders(&self) -> MemoryOrderRepository {
        MemoryOrderRepository {
            inner: Arc::clone(&self.inner),
        }
    }

    /// Repository for cart operations.
    #[must_use]
    pub fn carts(&self) -> MemoryCartRepository {
        MemoryCartRepository {
            inner: Arc::clone(&self.inner),
        }
    }

    /// Remove all stored entities and reset id assignment.
    pub fn clear(&self) {
        *write(&self.inner) = Inner::default();
    }
}

/// In-memory implementation of [`UserRepository`].
#[derive(Debug, Clone)]
pub struct MemoryUserRepository {
    inner: Arc<RwLock<Inner>>,
}

#[async_trait]
impl UserRepository for MemoryUserRepository {
    async fn create(&self, email: &Email) -> Result<User, RepositoryError> {
        let mut inner = write(&self.inner);

        if inner.users.iter().any(|u| u.email == *email) {
            return Err(RepositoryError::Conflict("email already exists".to_owned()));
        }

        let now = Utc::now();
        let user = User {
            id: UserId::new(inner.next_user_id),
            email: email.clone(),
            created_at: now,
            updated_at: now,
        };
        inner.next_user_id += 1;
        inner.users.push(user.clone());
        Ok(user)
    }

    async fn get_by_id(&self, id: UserId) -> Result<Option<User>, RepositoryError> {
        Ok(read(&self.inner).users.iter().find(|u| u.id == id).cloned())
    }

    async fn get_all(&self) -> Result<Vec<User>, RepositoryError> {
        Ok(read(&self.inner).users.clone())
    }
}

/// In-memory implementation of [`OrderRepository`].
#[derive(Debug, Clone)]
pub struct MemoryOrderRepository {
    inner: Arc<RwLock<Inner>>,
}

#[async_trait]
impl OrderRepository for MemoryOrderRepository {
    async fn create(&self, user_id: UserId, total: Decimal) -> Result<Order, RepositoryError> {
        let mut inner = write(&self.inner);

        if !inner.users.iter().any(|u| u.id == user_id) {
            return Err(RepositoryError::Conflict(
                "order references a missing user".to_owned(),
            ));
        }

        let order = Order {
            id: OrderId::new(inner.next_order_id),
            user_id,
            total,
            created_at: Utc::now(),
        };
        inner.next_order_id += 1;
        inner.orders.push(order.clone());
        Ok(order)
    }

    async fn get_all(&self) -> Result<Vec<Order>, RepositoryError> {
        Ok(read(&self.inner).orders.clone())
    }

    async fn filter_all(&self, filter: &OrderFilter) -> Result<Vec<Order>, RepositoryError> {
        Ok(read(&self.inner)
            .orders
            .iter()
            .filter(|o| filter.matches(o))
            .cloned()
            .collect())
    }
}

/// In-memory implementation of [`CartRepository`].
#[derive(Debug, Clone)]
pub struct MemoryCartRepository {
    inner: Arc<RwLock<Inner>>,
}

#[async_trait]
impl CartRepository for MemoryCartRepository {
    async fn create(&self, user_id: UserId, orders: &[Order]) -> Result<Cart, RepositoryError> {
        create_cart_locked(&mut write(&self.inner), user_id, orders)
    }

    async fn get_all(&self) -> Result<Vec<Cart>, RepositoryError> {
        Ok(read(&self.inner).carts.clone())
    }

    async fn get_by_id(&self, id: CartId) -> Result<Option<Cart>, RepositoryError> {
        Ok(read(&self.inner).carts.iter().find(|c| c.id == id).cloned())
    }

    async fn get_by_public_id(
        &self,
        public_id: &PublicId,
    ) -> Result<Option<Cart>, RepositoryError> {
        Ok(read(&self.inner)
            .carts
            .iter()
            .find(|c| c.public_id == *public_id)
            .cloned())
    }

    async fn filter(&self, filter: &CartFilter) -> Result<Option<Cart>, RepositoryError> {
        // Lowest id wins, matching the PostgreSQL tie-break.
        Ok(read(&self.inner)
            .carts
            .iter()
            .filter(|c| filter.matches(c))
            .min_by_key(|c| c.id)
            .cloned())
    }

    async fn filter_all(&self, filter: &CartFilter) -> Result<Vec<Cart>, RepositoryError> {
        Ok(read(&self.inner)
            .carts
            .iter()
            .filter(|c| filter.matches(c))
            .cloned()
            .collect())
    }

    async fn get_or_create(&self, user_id: UserId) -> Result<(Cart, bool), RepositoryError> {
        let mut inner = write(&self.inner);

        let existing = inner
            .carts
            .iter()
            .filter(|c| c.user_id == user_id)
            .min_by_key(|c| c.id)
            .cloned();
        if let Some(cart) = existing {
            return Ok((cart, false));
        }

        let cart = create_cart_locked(&mut inner, user_id, &[])?;
        Ok((cart, true))
    }

    async fn delete(&self, cart: &Cart) -> Result<(), RepositoryError> {
        write(&self.inner).carts.retain(|c| c.id != cart.id);
        Ok(())
    }
}
