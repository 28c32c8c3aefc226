//! Start-up and the event loop.
//!
//! [`Coordinator::start`] is the single place where the session observers
//! are subscribed and the dispatchers attached. After that, events are fed
//! one at a time, in delivery order, through [`Coordinator::dispatch`] or
//! [`Coordinator::run`].

use std::sync::Arc;

use farmaweb_core::classify;
use serde::{Deserialize, Serialize};
use tokio::sync::mpsc;

use crate::config::CoordinatorConfig;
use crate::dispatch::{
    ClickEvent, ClickOutcome, Dispatcher, InputEvent, InputOutcome, SubmitEvent, SubmitOutcome,
};
use crate::error::{AppError, SentryUserContext, report};
use crate::state::{AppState, Collaborators};
use crate::store::{KeyValueBackend, PersistentStore};
use crate::visibility::CartVisibility;

/// A user interaction delivered to the page root.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum UiEvent {
    /// A click.
    Click(ClickEvent),
    /// A form submission.
    Submit(SubmitEvent),
    /// Text typed into an input.
    Input(InputEvent),
}

/// What dispatching a [`UiEvent`] did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// Result of a click.
    Click(ClickOutcome),
    /// Result of a submission.
    Submit(SubmitOutcome),
    /// Result of an input event.
    Input(InputOutcome),
}

impl Outcome {
    /// Whether the default browser action was suppressed.
    #[must_use]
    pub const fn default_prevented(&self) -> bool {
        match self {
            Self::Click(outcome) => outcome.default_prevented,
            Self::Submit(outcome) => outcome.default_prevented,
            Self::Input(_) => false,
        }
    }
}

/// The running client-state coordinator.
#[derive(Debug)]
pub struct Coordinator {
    state: AppState,
    dispatcher: Dispatcher,
}

impl Coordinator {
    /// Start the coordinator over `backend`.
    ///
    /// Checks the page root, subscribes the cart-visibility and Sentry
    /// observers to the session key, loads the stored cart, renders the
    /// badge and login button, replays the stored session to the observers,
    /// and loads the home page.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::MissingRoot`] if the view has no page root; nothing
    /// is attached in that case.
    pub fn start(
        config: CoordinatorConfig,
        backend: Box<dyn KeyValueBackend>,
        collaborators: Collaborators,
    ) -> Result<Self, AppError> {
        if !collaborators.view.has_root() {
            let err = AppError::MissingRoot;
            err.report("start");
            return Err(err);
        }

        let store = Arc::new(PersistentStore::new(backend, config.keys.session.clone()));
        store.subscribe(Arc::new(CartVisibility::new(collaborators.view.clone())));
        store.subscribe(Arc::new(SentryUserContext));

        let state = AppState::new(config, store, collaborators);

        let session = state.session();
        state.cart().render_badge();
        report(
            state.view().render_login_button(session.as_ref()),
            "render_login_button",
        );
        // Cart visibility and the Sentry user for a session stored before start
        state.store().refresh();
        let role = classify(session.as_ref());
        state.navigator().load_page(&state.config().pages.home);

        tracing::info!(
            role = %role,
            cart_units = state.cart().badge_count(),
            "Coordinator started"
        );

        Ok(Self {
            dispatcher: Dispatcher::new(state.clone()),
            state,
        })
    }

    /// Shared state: store, cart, configuration and collaborators.
    #[must_use]
    pub const fn state(&self) -> &AppState {
        &self.state
    }

    /// The click/submit dispatcher.
    #[must_use]
    pub const fn dispatcher(&self) -> &Dispatcher {
        &self.dispatcher
    }

    /// Dispatch one event to completion.
    pub fn dispatch(&self, event: &UiEvent) -> Outcome {
        match event {
            UiEvent::Click(click) => Outcome::Click(self.dispatcher.handle_click(click)),
            UiEvent::Submit(submit) => Outcome::Submit(self.dispatcher.handle_submit(submit)),
            UiEvent::Input(input) => Outcome::Input(self.dispatcher.handle_input(input)),
        }
    }

    /// Drain `events` in order until every sender is dropped.
    ///
    /// Each event runs to completion before the next is taken. Returns the
    /// number of events handled.
    pub async fn run(&self, mut events: mpsc::Receiver<UiEvent>) -> usize {
        let mut handled = 0;
        while let Some(event) = events.recv().await {
            let outcome = self.dispatch(&event);
            tracing::trace!(?outcome, "Event handled");
            handled += 1;
        }
        tracing::debug!(handled, "Event loop finished");
        handled
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::sync::Mutex;

    use farmaweb_core::{PageId, SessionIdentity};

    use super::*;
    use crate::dispatch::{Element, SubmitEvent};
    use crate::error::ViewError;
    use crate::services::{AuthService, Navigator, View};
    use crate::store::MemoryBackend;

    #[derive(Default)]
    struct Pages(Mutex<Vec<String>>);

    impl Navigator for Pages {
        fn load_page(&self, page: &PageId) {
            self.0.lock().unwrap().push(page.to_string());
        }
        fn toggle_mobile_menu(&self) {}
        fn close_mobile_menu(&self) {}
        fn search(&self, _query: &str) {}
    }

    struct NoAuth;

    impl AuthService for NoAuth {
        fn login(&self, _submission: &SubmitEvent, _store: &PersistentStore) {}
    }

    struct Page {
        root: bool,
        cart_visible: Mutex<Vec<bool>>,
    }

    impl View for Page {
        fn has_root(&self) -> bool {
            self.root
        }
        fn set_cart_visible(&self, visible: bool) -> Result<(), ViewError> {
            self.cart_visible.lock().unwrap().push(visible);
            Ok(())
        }
        fn render_cart_badge(&self, _count: u32) -> Result<(), ViewError> {
            Ok(())
        }
        fn render_login_button(&self, _identity: Option<&SessionIdentity>) -> Result<(), ViewError> {
            Ok(())
        }
        fn show_confirmation(&self, _message: &str) {}
        fn reset_form(&self, _form_id: &str) -> Result<(), ViewError> {
            Ok(())
        }
    }

    fn collaborators(root: bool) -> (Collaborators, Arc<Pages>) {
        let (collaborators, pages, _) = collaborators_with_view(root);
        (collaborators, pages)
    }

    fn collaborators_with_view(root: bool) -> (Collaborators, Arc<Pages>, Arc<Page>) {
        let pages = Arc::new(Pages::default());
        let view = Arc::new(Page {
            root,
            cart_visible: Mutex::new(Vec::new()),
        });
        let collaborators = Collaborators {
            navigator: pages.clone(),
            auth: Arc::new(NoAuth),
            view: view.clone(),
        };
        (collaborators, pages, view)
    }

    fn add(product: &str) -> UiEvent {
        UiEvent::Click(ClickEvent::new(vec![
            Element::new("button")
                .with_class("add-to-cart-btn")
                .with_data("product-id", product),
        ]))
    }

    #[test]
    fn test_start_without_root_fails() {
        let (collaborators, pages) = collaborators(false);
        let result = Coordinator::start(
            CoordinatorConfig::default(),
            Box::new(MemoryBackend::new()),
            collaborators,
        );

        assert!(matches!(result, Err(AppError::MissingRoot)));
        assert!(pages.0.lock().unwrap().is_empty());
    }

    #[test]
    fn test_start_loads_home_and_subscribes_once() {
        let (collaborators, pages) = collaborators(true);
        let coordinator = Coordinator::start(
            CoordinatorConfig::default(),
            Box::new(MemoryBackend::new()),
            collaborators,
        )
        .unwrap();

        assert_eq!(*pages.0.lock().unwrap(), vec!["inicio".to_string()]);
        assert_eq!(coordinator.state().store().observer_count(), 2);
    }

    #[test]
    fn test_start_replays_stored_session_to_observers() {
        let (collaborators, _, view) = collaborators_with_view(true);
        let backend = MemoryBackend::with_entries([("currentUser", r#"{"rol":"admin"}"#)]);

        let coordinator =
            Coordinator::start(CoordinatorConfig::default(), Box::new(backend), collaborators)
                .unwrap();

        // One reconciliation pass, reaching the visibility observer once
        assert_eq!(*view.cart_visible.lock().unwrap(), vec![false]);
        assert_eq!(coordinator.state().store().observer_count(), 2);
    }

    #[tokio::test]
    async fn test_run_handles_events_in_order() {
        let (collaborators, _) = collaborators(true);
        let coordinator = Coordinator::start(
            CoordinatorConfig::default(),
            Box::new(MemoryBackend::new()),
            collaborators,
        )
        .unwrap();

        let (tx, rx) = mpsc::channel(8);
        for product in ["b", "a", "b"] {
            tx.send(add(product)).await.unwrap();
        }
        drop(tx);

        assert_eq!(coordinator.run(rx).await, 3);

        let cart = coordinator.state().cart().snapshot();
        let order: Vec<&str> = cart.items().iter().map(|i| i.product_id().as_str()).collect();
        assert_eq!(order, vec!["b", "a"]);
        assert_eq!(cart.badge_count(), 3);
    }

    #[test]
    fn test_ui_event_json() {
        let event: UiEvent = serde_json::from_str(
            r#"{"type":"submit","form_id":"payment-form","fields":{}}"#,
        )
        .unwrap();
        assert_eq!(event, UiEvent::Submit(SubmitEvent::new("payment-form")));

        let event: UiEvent = serde_json::from_str(
            r#"{"type":"input","input_id":"mobile-search-input","value":"jarabe"}"#,
        )
        .unwrap();
        assert_eq!(
            event,
            UiEvent::Input(InputEvent::new("mobile-search-input", "jarabe"))
        );
    }
}
