//! Application state shared by the dispatcher and the collaborators.

use std::sync::Arc;

use farmaweb_core::{CategoryId, SessionIdentity};

use crate::cart::CartState;
use crate::config::CoordinatorConfig;
use crate::services::{AuthService, Navigator, View};
use crate::store::PersistentStore;

/// The external collaborators the coordinator drives.
#[derive(Clone)]
pub struct Collaborators {
    /// Page loading and mobile menu
    pub navigator: Arc<dyn Navigator>,
    /// Login and logout
    pub auth: Arc<dyn AuthService>,
    /// Presentation
    pub view: Arc<dyn View>,
}

/// Application state shared across all handlers.
///
/// This struct is cheaply cloneable via `Arc`. The store and the cart each
/// have a single owner here; everything else holds references to them,
/// never copies.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

impl std::fmt::Debug for AppState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppState")
            .field("config", self.config())
            .field("store", self.store())
            .field("cart", self.cart())
            .finish_non_exhaustive()
    }
}

struct AppStateInner {
    config: CoordinatorConfig,
    store: Arc<PersistentStore>,
    cart: CartState,
    collaborators: Collaborators,
}

impl AppState {
    /// Create a new application state, loading the stored cart.
    #[must_use]
    pub fn new(
        config: CoordinatorConfig,
        store: Arc<PersistentStore>,
        collaborators: Collaborators,
    ) -> Self {
        let cart = CartState::load(
            store.clone(),
            config.keys.cart.clone(),
            collaborators.view.clone(),
        );

        Self {
            inner: Arc::new(AppStateInner {
                config,
                store,
                cart,
                collaborators,
            }),
        }
    }

    /// Get a reference to the coordinator configuration.
    #[must_use]
    pub fn config(&self) -> &CoordinatorConfig {
        &self.inner.config
    }

    /// Get a reference to the persistent store.
    #[must_use]
    pub fn store(&self) -> &Arc<PersistentStore> {
        &self.inner.store
    }

    /// Get a reference to the cart.
    #[must_use]
    pub fn cart(&self) -> &CartState {
        &self.inner.cart
    }

    /// Get a reference to the navigator.
    #[must_use]
    pub fn navigator(&self) -> &dyn Navigator {
        self.inner.collaborators.navigator.as_ref()
    }

    /// Get a reference to the auth service.
    #[must_use]
    pub fn auth(&self) -> &dyn AuthService {
        self.inner.collaborators.auth.as_ref()
    }

    /// Get a reference to the view.
    #[must_use]
    pub fn view(&self) -> &Arc<dyn View> {
        &self.inner.collaborators.view
    }

    /// The current session identity.
    #[must_use]
    pub fn session(&self) -> Option<SessionIdentity> {
        self.inner.store.session()
    }

    /// The catalog filter left by the last category link, if any.
    #[must_use]
    pub fn pending_category(&self) -> Option<CategoryId> {
        match self.inner.store.get(&self.inner.config.keys.pending_category) {
            Ok(value) => value.map(CategoryId::from),
            Err(e) => {
                tracing::warn!(error = %e, "Pending category unreadable");
                None
            }
        }
    }
}
