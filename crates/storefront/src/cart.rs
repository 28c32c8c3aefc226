//! Cart state machine.
//!
//! Owns the in-memory [`Cart`] and keeps the stored copy and the badge in
//! step with it. Every change writes the full line list under the cart key;
//! there is no delta persistence.

use std::sync::{Arc, PoisonError, RwLock};

use farmaweb_core::{Cart, LineItem, ProductId, QuantityChange};

use crate::error::report;
use crate::services::View;
use crate::store::PersistentStore;

/// The shopper's cart, shared by reference with the dispatcher.
pub struct CartState {
    cart: RwLock<Cart>,
    store: Arc<PersistentStore>,
    key: String,
    view: Arc<dyn View>,
}

impl std::fmt::Debug for CartState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CartState")
            .field("key", &self.key)
            .field("cart", &self.snapshot())
            .finish_non_exhaustive()
    }
}

impl CartState {
    /// Load the cart stored under `key`.
    ///
    /// A missing value is an empty cart. An unreadable value is logged and
    /// also treated as an empty cart; it is overwritten by the next change.
    #[must_use]
    pub fn load(store: Arc<PersistentStore>, key: impl Into<String>, view: Arc<dyn View>) -> Self {
        let key = key.into();
        let cart = match store.get_json::<Cart>(&key) {
            Ok(cart) => cart.unwrap_or_default(),
            Err(e) => {
                tracing::warn!(error = %e, key = %key, "Stored cart is unreadable; starting empty");
                Cart::new()
            }
        };

        tracing::debug!(lines = cart.len(), badge = cart.badge_count(), "Cart loaded");

        Self {
            cart: RwLock::new(cart),
            store,
            key,
            view,
        }
    }

    /// Add one unit of `product_id`, appending a new line if needed.
    pub fn add_to_cart(&self, product_id: &ProductId) {
        let (quantity, snapshot) = self.mutate(|cart| cart.add(product_id));
        tracing::info!(product_id = %product_id, quantity, "Added to cart");
        self.commit(&snapshot);
    }

    /// Set the quantity of `product_id`. Zero or below removes the line; an
    /// absent product is ignored.
    pub fn update_quantity(&self, product_id: &ProductId, quantity: i64) {
        let (change, snapshot) = self.mutate(|cart| cart.set_quantity(product_id, quantity));
        match change {
            QuantityChange::Updated(quantity) => {
                tracing::info!(product_id = %product_id, quantity, "Cart quantity updated");
            }
            QuantityChange::Removed => {
                tracing::info!(product_id = %product_id, "Cart line removed by quantity");
            }
            QuantityChange::Missing => {
                tracing::debug!(product_id = %product_id, "Quantity update for product not in cart");
                return;
            }
        }
        self.commit(&snapshot);
    }

    /// Remove the line for `product_id`, if any.
    pub fn remove_from_cart(&self, product_id: &ProductId) {
        let (removed, snapshot) = self.mutate(|cart| cart.remove(product_id));
        if !removed {
            tracing::debug!(product_id = %product_id, "Remove for product not in cart");
            return;
        }
        tracing::info!(product_id = %product_id, "Removed from cart");
        self.commit(&snapshot);
    }

    /// Empty the cart (after checkout).
    pub fn clear_cart(&self) {
        let (_, snapshot) = self.mutate(Cart::clear);
        tracing::info!("Cart cleared");
        self.commit(&snapshot);
    }

    /// Total units across all lines.
    #[must_use]
    pub fn badge_count(&self) -> u32 {
        self.read().badge_count()
    }

    /// The current line for `product_id`.
    #[must_use]
    pub fn line(&self, product_id: &ProductId) -> Option<LineItem> {
        self.read().get(product_id).cloned()
    }

    /// A copy of the current cart.
    #[must_use]
    pub fn snapshot(&self) -> Cart {
        self.read().clone()
    }

    /// Push the current badge count to the view.
    pub fn render_badge(&self) {
        report(self.view.render_cart_badge(self.badge_count()), "render_cart_badge");
    }

    fn read(&self) -> std::sync::RwLockReadGuard<'_, Cart> {
        self.cart.read().unwrap_or_else(PoisonError::into_inner)
    }

    /// Apply `f` under the write lock and return its result with a snapshot
    /// taken before the lock is released.
    fn mutate<T>(&self, f: impl FnOnce(&mut Cart) -> T) -> (T, Cart) {
        let mut cart = self.cart.write().unwrap_or_else(PoisonError::into_inner);
        let out = f(&mut cart);
        (out, cart.clone())
    }

    fn commit(&self, snapshot: &Cart) {
        report(self.store.set_json(&self.key, snapshot), "persist_cart");
        report(
            self.view.render_cart_badge(snapshot.badge_count()),
            "render_cart_badge",
        );
    }
}
