//! Farmaweb storefront client-state coordinator.
//!
//! Reconciles the signed-in user, the cart and the displayed page against a
//! persistent key/value store, and routes every click and form submission
//! that reaches the page root to the right domain operation.
//!
//! # Architecture
//!
//! - [`store`] - Key/value store that announces session-key writes
//! - [`cart`] - Cart state machine with persistence and badge rendering
//! - [`visibility`] - Applies the role policy to the cart button
//! - [`dispatch`] - Delegated click and submit dispatcher
//! - [`coordinator`] - Start-up sequence and the ordered event loop
//! - [`services`] - Traits for the navigator, auth and view collaborators
//!
//! # Security
//!
//! Hiding the cart from administrators is presentation only. It does not
//! prevent an administrator session from submitting the payment form; that
//! restriction belongs to the order backend.

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod cart;
pub mod config;
pub mod coordinator;
pub mod dispatch;
pub mod error;
pub mod services;
pub mod state;
pub mod store;
pub mod visibility;

pub use coordinator::{Coordinator, Outcome, UiEvent};
