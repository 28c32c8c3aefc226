//! Collaborators for running the coordinator without a browser.
//!
//! Page loads, menu changes and view updates are logged instead of rendered.
//! Login accepts any non-empty username and password.

use std::sync::Arc;

use farmaweb_core::{PageId, SessionIdentity};
use farmaweb_storefront::dispatch::SubmitEvent;
use farmaweb_storefront::error::{ViewError, report};
use farmaweb_storefront::services::{AuthService, Navigator, View};
use farmaweb_storefront::state::Collaborators;
use farmaweb_storefront::store::PersistentStore;

/// Input id of the login form's username field.
pub const USERNAME_FIELD: &str = "login-username";

/// Input id of the login form's password field.
pub const PASSWORD_FIELD: &str = "login-password";

/// Logs navigation.
#[derive(Debug, Default)]
pub struct ConsoleNavigator;

impl Navigator for ConsoleNavigator {
    fn load_page(&self, page: &PageId) {
        tracing::info!(page = %page, "Page loaded");
    }

    fn toggle_mobile_menu(&self) {
        tracing::info!("Mobile menu toggled");
    }

    fn close_mobile_menu(&self) {
        tracing::debug!("Mobile menu closed");
    }

    fn search(&self, query: &str) {
        tracing::info!(query, "Catalog search");
    }
}

/// Logs view updates.
#[derive(Debug, Default)]
pub struct ConsoleView;

impl View for ConsoleView {
    fn has_root(&self) -> bool {
        true
    }

    fn set_cart_visible(&self, visible: bool) -> Result<(), ViewError> {
        tracing::info!(visible, "Cart button");
        Ok(())
    }

    fn render_cart_badge(&self, count: u32) -> Result<(), ViewError> {
        tracing::info!(count, "Cart badge");
        Ok(())
    }

    fn render_login_button(&self, identity: Option<&SessionIdentity>) -> Result<(), ViewError> {
        match identity.and_then(SessionIdentity::display_name) {
            Some(name) => tracing::info!(name, "Login button shows user"),
            None => tracing::info!("Login button shows sign-in"),
        }
        Ok(())
    }

    fn show_confirmation(&self, message: &str) {
        tracing::info!(text = message, "Confirmation");
    }

    fn reset_form(&self, form_id: &str) -> Result<(), ViewError> {
        tracing::debug!(form_id, "Form reset");
        Ok(())
    }
}

/// Accepts any login with a non-empty username and password.
#[derive(Debug, Default)]
pub struct LocalAuth;

impl AuthService for LocalAuth {
    fn login(&self, submission: &SubmitEvent, store: &PersistentStore) {
        let username = submission.field(USERNAME_FIELD).unwrap_or_default().trim();
        let password = submission.field(PASSWORD_FIELD).unwrap_or_default();

        if username.is_empty() || password.is_empty() {
            tracing::warn!("Login rejected: username and password are required");
            return;
        }

        report(store.set_session(&SessionIdentity::new(username)), "login");
        tracing::info!(username, "Logged in");
    }
}

/// Console collaborators bundled for [`Coordinator::start`](farmaweb_storefront::Coordinator::start).
#[must_use]
pub fn collaborators() -> Collaborators {
    Collaborators {
        navigator: Arc::new(ConsoleNavigator),
        auth: Arc::new(LocalAuth),
        view: Arc::new(ConsoleView),
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use farmaweb_storefront::store::MemoryBackend;

    use super::*;

    fn store() -> PersistentStore {
        PersistentStore::new(Box::new(MemoryBackend::new()), "currentUser")
    }

    #[test]
    fn test_login_writes_session() {
        let store = store();
        let submission = SubmitEvent::new("login-form")
            .with_field(USERNAME_FIELD, " ana ")
            .with_field(PASSWORD_FIELD, "secret");

        LocalAuth.login(&submission, &store);

        assert_eq!(store.session().unwrap().username.as_deref(), Some("ana"));
    }

    #[test]
    fn test_login_requires_both_fields() {
        let store = store();
        LocalAuth.login(
            &SubmitEvent::new("login-form").with_field(USERNAME_FIELD, "ana"),
            &store,
        );
        assert!(store.session().is_none());
    }

    #[derive(Clone, Default)]
    struct Captured(Arc<std::sync::Mutex<Vec<u8>>>);

    impl std::io::Write for Captured {
        fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> std::io::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn test_confirmation_log_keeps_event_message() {
        let captured = Captured::default();
        let writer = captured.clone();
        let subscriber = tracing_subscriber::fmt()
            .with_writer(move || writer.clone())
            .with_ansi(false)
            .finish();

        tracing::subscriber::with_default(subscriber, || {
            ConsoleView.show_confirmation("Mensaje enviado con éxito.");
        });

        let out = String::from_utf8(captured.0.lock().unwrap().clone()).unwrap();
        assert!(out.contains("Confirmation"));
        assert!(out.contains("text=\"Mensaje enviado con éxito.\""));
    }

    #[test]
    fn test_default_logout_clears_session() {
        let store = store();
        store.set_session(&SessionIdentity::new("ana")).unwrap();

        LocalAuth.logout(&store);

        assert!(store.session().is_none());
    }
}
