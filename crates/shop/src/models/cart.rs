//! Cart domain types.

use chrono::{DateTime, Utc};
use serde::Serialize;

use sugar_maple_core::{CartId, PublicId, UserId};

use super::Order;

/// A user's shopping cart (domain type).
///
/// The `orders` collection reflects exactly the order set associated at
/// creation time; the cart itself is never mutated after creation, only
/// deleted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Cart {
    /// Unique cart ID (internal, store-assigned).
    pub id: CartId,
    /// Externally shareable cart identifier.
    pub public_id: PublicId,
    /// User who owns the cart.
    pub user_id: UserId,
    /// Orders associated with the cart at creation time.
    pub orders: Vec<Order>,
    /// When the cart was created.
    pub created_at: DateTime<Utc>,
}
