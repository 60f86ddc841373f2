//! Domain types for the shop backend.
//!
//! These types represent validated domain objects separate from database row
//! types.

pub mod cart;
pub mod order;
pub mod user;

pub use cart::Cart;
pub use order::Order;
pub use user::User;
