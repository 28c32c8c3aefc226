//! Delegated click and submit dispatch.
//!
//! One [`Dispatcher`] receives every click and every form submission that
//! bubbles to the page root, classifies it, and routes it to the cart, the
//! session store, or a collaborator. Unrecognised clicks and forms run no
//! handler and keep their default browser behavior. Typing in the header
//! search boxes is routed to the navigator's catalog search.

pub mod click;
pub mod menu;
pub mod submit;
pub mod target;

use std::sync::{Mutex, PoisonError};

use farmaweb_core::{PageId, ProductId};
use tracing::instrument;

pub use click::{CartAction, ClickIntent};
pub use menu::MobileMenu;
pub use submit::{FormKind, OrderConfirmation};
pub use target::{ClickEvent, Element, InputEvent, Selector, SubmitEvent, markers};

use crate::error::{add_breadcrumb, report};
use crate::state::AppState;

/// What a click did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClickOutcome {
    /// The handled intent, if any rule matched.
    pub intent: Option<ClickIntent>,
    /// Whether the default browser action was suppressed.
    pub default_prevented: bool,
    /// Whether an open mobile menu was closed by this click.
    pub closed_menu: bool,
}

/// What a form submission did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubmitOutcome {
    /// The recognised form, if any.
    pub form: Option<FormKind>,
    /// Whether the default browser submission was suppressed.
    pub default_prevented: bool,
    /// The order placed by a payment form.
    pub order: Option<OrderConfirmation>,
}

/// What an input event did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InputOutcome {
    /// The query handed to the catalog search, if the input was a search box.
    pub query: Option<String>,
}

/// The delegated click, submit and search-input handlers.
pub struct Dispatcher {
    state: AppState,
    menu: Mutex<MobileMenu>,
}

impl std::fmt::Debug for Dispatcher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Dispatcher")
            .field("menu_open", &self.menu_open())
            .finish_non_exhaustive()
    }
}

impl Dispatcher {
    /// Create a dispatcher over `state` with the mobile menu closed.
    #[must_use]
    pub fn new(state: AppState) -> Self {
        Self {
            state,
            menu: Mutex::new(MobileMenu::default()),
        }
    }

    /// Whether the mobile menu is open.
    #[must_use]
    pub fn menu_open(&self) -> bool {
        self.menu().is_open()
    }

    /// Handle a click that reached the page root.
    #[instrument(skip_all)]
    pub fn handle_click(&self, event: &ClickEvent) -> ClickOutcome {
        if click::is_menu_toggle(event) {
            self.run_click(&ClickIntent::ToggleMenu);
            return ClickOutcome {
                intent: Some(ClickIntent::ToggleMenu),
                default_prevented: false,
                closed_menu: false,
            };
        }

        let closed_menu = click::is_outside_menu(event) && self.close_menu();

        let Some(intent) = click::classify(event) else {
            tracing::trace!("Click not handled");
            return ClickOutcome {
                intent: None,
                default_prevented: false,
                closed_menu,
            };
        };

        self.run_click(&intent);
        ClickOutcome {
            intent: Some(intent),
            default_prevented: true,
            closed_menu,
        }
    }

    /// Handle a form submission that reached the page root.
    #[instrument(skip_all, fields(form_id = ?event.form_id))]
    pub fn handle_submit(&self, event: &SubmitEvent) -> SubmitOutcome {
        let Some(form) = FormKind::classify(event) else {
            tracing::trace!("Submit not handled");
            return SubmitOutcome {
                form: None,
                default_prevented: false,
                order: None,
            };
        };

        add_breadcrumb("submit", form.form_id(), None);

        let order = match form {
            FormKind::Login => {
                self.state.auth().login(event, self.state.store());
                None
            }
            FormKind::Contact => {
                self.state.view().show_confirmation(submit::CONTACT_SENT);
                report(self.state.view().reset_form(form.form_id()), "reset_form");
                None
            }
            FormKind::PersonalInfo => {
                self.update_personal_info(event);
                None
            }
            FormKind::Payment => Some(self.checkout()),
        };

        SubmitOutcome {
            form: Some(form),
            default_prevented: true,
            order,
        }
    }

    /// Handle an `input` event from one of the header search boxes.
    ///
    /// Other inputs are ignored.
    #[instrument(skip_all, fields(input_id = ?event.input_id))]
    pub fn handle_input(&self, event: &InputEvent) -> InputOutcome {
        if !event.is_search() {
            tracing::trace!("Input not handled");
            return InputOutcome { query: None };
        }

        tracing::debug!(query = %event.value, "Catalog search");
        self.state.navigator().search(&event.value);
        InputOutcome {
            query: Some(event.value.clone()),
        }
    }

    fn run_click(&self, intent: &ClickIntent) {
        tracing::debug!(intent = intent.name(), "Dispatching click");

        match intent {
            ClickIntent::ToggleMenu => {
                let open = self.menu().toggle();
                self.state.navigator().toggle_mobile_menu();
                tracing::debug!(open, "Mobile menu toggled");
            }
            ClickIntent::Navigate { page, category } => {
                let keys = &self.state.config().keys;
                let store = self.state.store();
                match category {
                    Some(category) => {
                        report(
                            store.set(&keys.pending_category, category.as_str()),
                            "pending_category",
                        );
                    }
                    None if *page == self.state.config().pages.catalog => {
                        report(store.remove(&keys.pending_category), "pending_category");
                    }
                    None => {}
                }
                self.navigate(page);
                self.close_menu();
            }
            ClickIntent::AddToCart { product } => match product {
                Some(product) => {
                    add_breadcrumb("cart", "add_to_cart", Some(&[("product_id", product.as_str())]));
                    self.state.cart().add_to_cart(product);
                }
                None => tracing::warn!("Add-to-cart control has no product id"),
            },
            ClickIntent::CartControl { product, action } => {
                if let Some(product) = product {
                    self.cart_control(product, *action);
                }
            }
            ClickIntent::Logout => {
                add_breadcrumb("auth", "logout", None);
                self.state.auth().logout(self.state.store());
            }
        }
    }

    fn cart_control(&self, product: &ProductId, action: Option<CartAction>) {
        let cart = self.state.cart();
        let Some(line) = cart.line(product) else {
            tracing::debug!(product_id = %product, "Cart control for product not in cart");
            return;
        };
        let quantity = i64::from(line.quantity());

        add_breadcrumb("cart", "cart_control", Some(&[("product_id", product.as_str())]));

        match action {
            Some(CartAction::Increase) => cart.update_quantity(product, quantity + 1),
            Some(CartAction::Decrease) => cart.update_quantity(product, quantity - 1),
            Some(CartAction::Remove) => cart.remove_from_cart(product),
            None => tracing::debug!(product_id = %product, "Cart control without a known action"),
        }
    }

    fn update_personal_info(&self, event: &SubmitEvent) {
        let Some(name) = event.field(submit::NAME_FIELD) else {
            tracing::debug!("Personal-info form without a name field");
            return;
        };
        let Some(mut identity) = self.state.session() else {
            tracing::debug!("Personal-info form submitted without a session");
            return;
        };

        identity.name = Some(name.to_string());
        report(self.state.store().set_session(&identity), "update_profile");
        tracing::info!("Profile name updated");

        let view = self.state.view();
        view.show_confirmation(submit::PROFILE_UPDATED);
        report(view.render_login_button(Some(&identity)), "render_login_button");
        self.navigate(&self.state.config().pages.account);
    }

    fn checkout(&self) -> OrderConfirmation {
        let cart = self.state.cart();
        let order = OrderConfirmation::new(cart.badge_count());

        tracing::info!(
            reference = %order.reference,
            units = order.units,
            "Order placed"
        );
        let reference = order.reference.to_string();
        add_breadcrumb("checkout", "order_placed", Some(&[("reference", reference.as_str())]));

        self.state.view().show_confirmation(&order.message());
        cart.clear_cart();
        self.navigate(&self.state.config().pages.order_complete);
        order
    }

    fn navigate(&self, page: &PageId) {
        add_breadcrumb("navigation", page.as_str(), None);
        tracing::debug!(page = %page, "Loading page");
        self.state.navigator().load_page(page);
    }

    /// Close the mobile menu. Returns `true` if it was open.
    fn close_menu(&self) -> bool {
        let was_open = self.menu().close();
        self.state.navigator().close_mobile_menu();
        was_open
    }

    fn menu(&self) -> std::sync::MutexGuard<'_, MobileMenu> {
        self.menu.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
