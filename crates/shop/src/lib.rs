//! Sugar Maple Shop - persistence layer for users, orders, and carts.
//!
//! This crate is the data-access layer of the Sugar Maple backend. It exposes
//! one repository per entity, each a trait with a uniform CRUD shape, backed
//! by either PostgreSQL ([`db::PgStore`]) or an in-memory store
//! ([`db::MemoryStore`]) for tests and local development.
//!
//! # Modules
//!
//! - [`config`] - Environment-driven configuration
//! - [`models`] - Domain types (`User`, `Order`, `Cart`)
//! - [`db`] - Repository traits and store implementations
//! - [`fixtures`] - Sample-data seeding for tests and the CLI

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod config;
pub mod db;
pub mod fixtures;
pub mod models;
