//! Sugar Maple Core - Shared types library.
//!
//! This crate provides common types used across all Sugar Maple components:
//! - `shop` - Persistence layer for users, orders, and carts
//! - `cli` - Command-line tools for migrations and seeding
//!
//! # Architecture
//!
//! The core crate contains only types - no I/O, no database access. This
//! keeps it lightweight and allows it to be used anywhere.
//!
//! # Modules
//!
//! - [`types`] - Newtype wrappers for type-safe IDs, public identifiers, and emails

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod types;

pub use types::*;
