//! User domain types.

use chrono::{DateTime, Utc};
use serde::Serialize;

use sugar_maple_core::{Email, UserId};

/// An account holder (domain type).
///
/// Users are created by account management and only referenced, never
/// mutated, by the order and cart repositories.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct User {
    /// Unique user ID.
    pub id: UserId,
    /// User's email address.
    pub email: Email,
    /// When the user was created.
    pub created_at: DateTime<Utc>,
    /// When the user was last updated.
    pub updated_at: DateTime<Utc>,
}
