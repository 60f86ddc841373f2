//! Core types for Sugar Maple.
//!
//! This module provides type-safe wrappers for common domain concepts.

pub mod email;
pub mod id;
pub mod public_id;

pub use email::{Email, EmailError};
pub use id::*;
pub use public_id::{PublicId, PublicIdError};
