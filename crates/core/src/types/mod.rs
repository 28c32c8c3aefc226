//! Core types for the Farmaweb storefront.
//!
//! This module provides type-safe wrappers for the client-side domain.

pub mod cart;
pub mod id;
pub mod identity;
pub mod role;

pub use cart::{Cart, LineItem, QuantityChange};
pub use id::*;
pub use identity::{SessionIdentity, UserKey};
pub use role::{UiRole, classify};
