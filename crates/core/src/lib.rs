//! Farmaweb Core - Shared types library.
//!
//! This crate provides the pure domain types used by every Farmaweb component:
//! - `storefront` - Client-state coordinator (store, cart, dispatcher)
//! - `cli` - Headless driver for the coordinator
//!
//! # Architecture
//!
//! The core crate contains only types and pure functions - no I/O, no
//! storage, no presentation. This keeps the cart invariants and the role
//! policy testable in isolation.
//!
//! # Modules
//!
//! - [`types`] - Newtype ids, the cart, the session identity and UI roles

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod types;

pub use types::*;
