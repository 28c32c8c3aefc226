//! Integration tests for the Farmaweb storefront coordinator.
//!
//! # Running Tests
//!
//! ```bash
//! cargo test -p farmaweb-integration-tests
//! ```
//!
//! # Harness
//!
//! [`TestContext`] starts a real [`Coordinator`] over an in-memory store with
//! recording collaborators, so tests can drive clicks and submissions and
//! then assert on what was navigated, rendered and persisted.
//!
//! ```rust,ignore
//! let ctx = TestContext::builder().build();
//! ctx.click(events::add_to_cart("ibuprofeno"));
//! assert_eq!(ctx.view.last_badge(), Some(1));
//! ```

#![allow(clippy::unwrap_used, clippy::missing_panics_doc)]

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, PoisonError};

use farmaweb_core::{PageId, SessionIdentity};
use farmaweb_storefront::config::CoordinatorConfig;
use farmaweb_storefront::dispatch::{
    ClickEvent, ClickOutcome, InputEvent, InputOutcome, SubmitEvent, SubmitOutcome,
};
use farmaweb_storefront::error::ViewError;
use farmaweb_storefront::services::{AuthService, Navigator, View};
use farmaweb_storefront::state::Collaborators;
use farmaweb_storefront::store::{MemoryBackend, PersistentStore};
use farmaweb_storefront::Coordinator;

fn lock<T>(mutex: &Mutex<T>) -> std::sync::MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

// =============================================================================
// Recording collaborators
// =============================================================================

/// Records every page load and menu call.
#[derive(Debug, Default)]
pub struct RecordingNavigator {
    pages: Mutex<Vec<String>>,
    searches: Mutex<Vec<String>>,
    toggles: AtomicUsize,
    closes: AtomicUsize,
}

impl RecordingNavigator {
    /// Pages loaded so far, in order.
    pub fn pages(&self) -> Vec<String> {
        lock(&self.pages).clone()
    }

    /// How many times `page` was loaded.
    pub fn loads_of(&self, page: &str) -> usize {
        lock(&self.pages).iter().filter(|p| *p == page).count()
    }

    /// Catalog search queries, in order.
    pub fn searches(&self) -> Vec<String> {
        lock(&self.searches).clone()
    }

    pub fn toggles(&self) -> usize {
        self.toggles.load(Ordering::SeqCst)
    }

    pub fn closes(&self) -> usize {
        self.closes.load(Ordering::SeqCst)
    }
}

impl Navigator for RecordingNavigator {
    fn load_page(&self, page: &PageId) {
        lock(&self.pages).push(page.to_string());
    }

    fn toggle_mobile_menu(&self) {
        self.toggles.fetch_add(1, Ordering::SeqCst);
    }

    fn close_mobile_menu(&self) {
        self.closes.fetch_add(1, Ordering::SeqCst);
    }

    fn search(&self, query: &str) {
        lock(&self.searches).push(query.to_string());
    }
}

/// Records every presentational update.
#[derive(Debug)]
pub struct RecordingView {
    cart_button: bool,
    cart_visible: Mutex<Option<bool>>,
    badges: Mutex<Vec<u32>>,
    login_buttons: Mutex<Vec<Option<String>>>,
    confirmations: Mutex<Vec<String>>,
    resets: Mutex<Vec<String>>,
}

impl RecordingView {
    fn new(cart_button: bool) -> Self {
        Self {
            cart_button,
            cart_visible: Mutex::new(None),
            badges: Mutex::new(Vec::new()),
            login_buttons: Mutex::new(Vec::new()),
            confirmations: Mutex::new(Vec::new()),
            resets: Mutex::new(Vec::new()),
        }
    }

    /// Current cart-button visibility; `None` if never set or not rendered.
    pub fn cart_visible(&self) -> Option<bool> {
        *lock(&self.cart_visible)
    }

    pub fn badges(&self) -> Vec<u32> {
        lock(&self.badges).clone()
    }

    pub fn last_badge(&self) -> Option<u32> {
        lock(&self.badges).last().copied()
    }

    /// Display names passed to the login button, `None` for signed out.
    pub fn login_buttons(&self) -> Vec<Option<String>> {
        lock(&self.login_buttons).clone()
    }

    pub fn confirmations(&self) -> Vec<String> {
        lock(&self.confirmations).clone()
    }

    pub fn resets(&self) -> Vec<String> {
        lock(&self.resets).clone()
    }
}

impl View for RecordingView {
    fn has_root(&self) -> bool {
        true
    }

    fn set_cart_visible(&self, visible: bool) -> Result<(), ViewError> {
        if !self.cart_button {
            return Err(ViewError::MissingElement("cart-button".to_string()));
        }
        *lock(&self.cart_visible) = Some(visible);
        Ok(())
    }

    fn render_cart_badge(&self, count: u32) -> Result<(), ViewError> {
        lock(&self.badges).push(count);
        Ok(())
    }

    fn render_login_button(&self, identity: Option<&SessionIdentity>) -> Result<(), ViewError> {
        let name = identity.and_then(SessionIdentity::display_name).map(str::to_string);
        lock(&self.login_buttons).push(name);
        Ok(())
    }

    fn show_confirmation(&self, message: &str) {
        lock(&self.confirmations).push(message.to_string());
    }

    fn reset_form(&self, form_id: &str) -> Result<(), ViewError> {
        lock(&self.resets).push(form_id.to_string());
        Ok(())
    }
}

/// Logs in whoever is named in the `username` field.
#[derive(Debug, Default)]
pub struct RecordingAuth {
    logins: AtomicUsize,
}

impl RecordingAuth {
    pub fn logins(&self) -> usize {
        self.logins.load(Ordering::SeqCst)
    }
}

impl AuthService for RecordingAuth {
    fn login(&self, submission: &SubmitEvent, store: &PersistentStore) {
        self.logins.fetch_add(1, Ordering::SeqCst);
        if let Some(username) = submission.field("username") {
            store.set_session(&SessionIdentity::new(username)).unwrap();
        }
    }
}

// =============================================================================
// Test context
// =============================================================================

/// A started coordinator with its recording collaborators.
pub struct TestContext {
    pub coordinator: Coordinator,
    pub navigator: Arc<RecordingNavigator>,
    pub view: Arc<RecordingView>,
    pub auth: Arc<RecordingAuth>,
}

impl TestContext {
    pub fn builder() -> TestContextBuilder {
        TestContextBuilder::default()
    }

    /// Dispatch a click.
    pub fn click(&self, event: &ClickEvent) -> ClickOutcome {
        self.coordinator.dispatcher().handle_click(event)
    }

    /// Dispatch an input event.
    pub fn input(&self, event: &InputEvent) -> InputOutcome {
        self.coordinator.dispatcher().handle_input(event)
    }

    /// Dispatch a form submission.
    pub fn submit(&self, event: &SubmitEvent) -> SubmitOutcome {
        self.coordinator.dispatcher().handle_submit(event)
    }

    pub fn store(&self) -> &Arc<PersistentStore> {
        self.coordinator.state().store()
    }

    pub fn config(&self) -> &CoordinatorConfig {
        self.coordinator.state().config()
    }

    /// The raw cart value in the store, parsed as JSON.
    pub fn stored_cart(&self) -> Option<serde_json::Value> {
        self.store()
            .get(&self.config().keys.cart)
            .unwrap()
            .map(|raw| serde_json::from_str(&raw).unwrap())
    }

    /// Quantity of `product` in the in-memory cart.
    pub fn quantity(&self, product: &str) -> Option<u32> {
        self.coordinator
            .state()
            .cart()
            .line(&product.into())
            .map(|line| line.quantity())
    }
}

/// Builder for [`TestContext`].
#[derive(Debug)]
pub struct TestContextBuilder {
    config: CoordinatorConfig,
    entries: Vec<(String, String)>,
    cart_button: bool,
}

impl Default for TestContextBuilder {
    fn default() -> Self {
        Self {
            config: CoordinatorConfig::default(),
            entries: Vec::new(),
            cart_button: true,
        }
    }
}

impl TestContextBuilder {
    /// Seed a raw value in the store before start-up.
    #[must_use]
    pub fn with_entry(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.entries.push((key.into(), value.into()));
        self
    }

    /// Seed a session identity, given as JSON, before start-up.
    #[must_use]
    pub fn with_session(self, identity: &serde_json::Value) -> Self {
        let key = self.config.keys.session.clone();
        self.with_entry(key, identity.to_string())
    }

    /// Render the page without a cart button.
    #[must_use]
    pub const fn without_cart_button(mut self) -> Self {
        self.cart_button = false;
        self
    }

    pub fn build(self) -> TestContext {
        let navigator = Arc::new(RecordingNavigator::default());
        let view = Arc::new(RecordingView::new(self.cart_button));
        let auth = Arc::new(RecordingAuth::default());

        let collaborators = Collaborators {
            navigator: navigator.clone(),
            auth: auth.clone(),
            view: view.clone(),
        };
        let backend = MemoryBackend::with_entries(self.entries);
        let coordinator = Coordinator::start(self.config, Box::new(backend), collaborators).unwrap();

        TestContext {
            coordinator,
            navigator,
            view,
            auth,
        }
    }
}

// =============================================================================
// Event builders
// =============================================================================

/// Clicks and submissions shaped like the storefront markup.
pub mod events {
    use farmaweb_storefront::dispatch::{ClickEvent, Element, InputEvent, SubmitEvent};

    fn body() -> Element {
        Element::new("body").with_id("app")
    }

    /// A click on an element with no behavior attached.
    pub fn plain() -> ClickEvent {
        ClickEvent::new(vec![Element::new("p"), body()])
    }

    pub fn add_to_cart(product: &str) -> ClickEvent {
        ClickEvent::new(vec![
            Element::new("i"),
            Element::new("button")
                .with_class("add-to-cart-btn")
                .with_data("product-id", product),
            body(),
        ])
    }

    /// A quantity or remove button in the cart listing.
    pub fn cart_control(product: &str, action: &str) -> ClickEvent {
        let class = if action == "remove" {
            "remove-item-btn"
        } else {
            "quantity-btn"
        };
        ClickEvent::new(vec![
            Element::new("button")
                .with_class(class)
                .with_data("product-id", product)
                .with_data("action", action),
            body(),
        ])
    }

    pub fn page_link(page: &str, category: Option<&str>) -> ClickEvent {
        let mut link = Element::new("a").with_data("page", page);
        if let Some(category) = category {
            link = link.with_data("category", category);
        }
        ClickEvent::new(vec![Element::new("span"), link, body()])
    }

    /// A page link inside the open mobile menu.
    pub fn menu_link(page: &str) -> ClickEvent {
        ClickEvent::new(vec![
            Element::new("a").with_data("page", page),
            Element::new("nav").with_class("mobile-menu"),
            body(),
        ])
    }

    pub fn menu_toggle() -> ClickEvent {
        ClickEvent::new(vec![
            Element::new("svg"),
            Element::new("button").with_class("mobile-menu-button"),
            body(),
        ])
    }

    pub fn logout() -> ClickEvent {
        ClickEvent::new(vec![
            Element::new("button").with_class("logout-button"),
            body(),
        ])
    }

    pub fn form(form_id: &str) -> SubmitEvent {
        SubmitEvent::new(form_id)
    }

    /// Typing into the input with id `input_id`.
    pub fn typed(input_id: &str, value: &str) -> InputEvent {
        InputEvent::new(input_id, value)
    }
}
