//! Cart-button visibility reconciliation.
//!
//! Subscribed to the persistent store at start-up, so any write of the
//! session key re-applies [`classify`] to the cart button in the same turn.
//! This is a presentation rule only; it does not stop an administrator
//! session from checking out.

use std::sync::Arc;

use farmaweb_core::{SessionIdentity, UiRole, classify};

use crate::error::report;
use crate::services::View;
use crate::store::SessionObserver;

/// Applies the visibility policy to the cart button.
pub struct CartVisibility {
    view: Arc<dyn View>,
}

impl CartVisibility {
    /// Create a reconciler driving `view`.
    #[must_use]
    pub fn new(view: Arc<dyn View>) -> Self {
        Self { view }
    }

    /// Classify `identity` and show or hide the cart button accordingly.
    ///
    /// A missing cart button is logged; the role is returned either way.
    pub fn apply(&self, identity: Option<&SessionIdentity>) -> UiRole {
        let role = classify(identity);
        let visible = role.shows_cart();
        tracing::debug!(role = %role, visible, "Applying cart visibility");
        report(self.view.set_cart_visible(visible), "cart_visibility");
        role
    }
}

impl SessionObserver for CartVisibility {
    fn session_changed(&self, identity: Option<&SessionIdentity>) {
        let role = self.apply(identity);
        tracing::info!(role = %role, "Cart visibility reconciled");
    }
}
