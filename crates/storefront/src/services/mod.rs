//! Collaborators the coordinator drives but does not implement.
//!
//! # Services
//!
//! - [`Navigator`] - page-fragment loading, catalog search and the mobile menu
//! - [`AuthService`] - login and logout against the account backend
//! - [`View`] - presentational updates (cart button, badge, dialogs)
//!
//! Calls into these traits are fire-and-forget: they return before any
//! network or rendering work they start has finished, and the dispatcher
//! keeps handling input in the meantime.

use farmaweb_core::{PageId, SessionIdentity};

use crate::dispatch::SubmitEvent;
use crate::error::{ViewError, report};
use crate::store::PersistentStore;

/// Page navigation.
pub trait Navigator: Send + Sync {
    /// Load the page fragment for `page` into the main area.
    fn load_page(&self, page: &PageId);

    /// Flip the mobile menu between open and closed.
    fn toggle_mobile_menu(&self);

    /// Close the mobile menu. Closing a closed menu does nothing.
    fn close_mobile_menu(&self);

    /// Filter the catalog by the text typed in a header search box.
    fn search(&self, query: &str);
}

/// Account backend.
pub trait AuthService: Send + Sync {
    /// Handle a submitted login form.
    ///
    /// On success the implementation writes the new identity through
    /// [`PersistentStore::set_session`], which reconciles the page.
    fn login(&self, submission: &SubmitEvent, store: &PersistentStore);

    /// End the current session by removing the session key.
    fn logout(&self, store: &PersistentStore) {
        report(store.clear_session(), "logout");
    }
}

/// Presentation surface.
pub trait View: Send + Sync {
    /// Whether the page root that receives delegated events is rendered.
    fn has_root(&self) -> bool;

    /// Show or hide the cart button.
    ///
    /// # Errors
    ///
    /// Returns [`ViewError::MissingElement`] if the cart button is not rendered.
    fn set_cart_visible(&self, visible: bool) -> Result<(), ViewError>;

    /// Render the cart badge.
    ///
    /// # Errors
    ///
    /// Returns [`ViewError::MissingElement`] if the badge is not rendered.
    fn render_cart_badge(&self, count: u32) -> Result<(), ViewError>;

    /// Render the login button for the current session.
    ///
    /// # Errors
    ///
    /// Returns [`ViewError::MissingElement`] if the button is not rendered.
    fn render_login_button(&self, identity: Option<&SessionIdentity>) -> Result<(), ViewError>;

    /// Show a confirmation dialog.
    fn show_confirmation(&self, message: &str);

    /// Reset the fields of the form with id `form_id`.
    ///
    /// # Errors
    ///
    /// Returns [`ViewError::MissingElement`] if the form is not rendered.
    fn reset_form(&self, form_id: &str) -> Result<(), ViewError>;
}
