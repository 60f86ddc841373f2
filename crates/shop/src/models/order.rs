//! Order domain types.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::Serialize;

use sugar_maple_core::{OrderId, UserId};

/// A purchase record (domain type).
///
/// Orders are created by order-placement logic and are read-only from the
/// cart repository's perspective.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Order {
    /// Unique order ID.
    pub id: OrderId,
    /// User who placed the order.
    pub user_id: UserId,
    /// Order total.
    pub total: Decimal,
    /// When the order was placed.
    pub created_at: DateTime<Utc>,
}
