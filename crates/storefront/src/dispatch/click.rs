//! Click classification.
//!
//! The mobile-menu toggle is checked first and ends dispatch. Otherwise an
//! outside-the-menu click closes the menu, and then [`CLICK_RULES`] are tried
//! in order; the first rule that recognises the click produces the
//! [`ClickIntent`] that gets handled.

use core::str::FromStr;

use farmaweb_core::{CategoryId, PageId, ProductId};

use super::target::{ClickEvent, Element, markers};

/// What a cart control asks for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CartAction {
    /// Quantity + 1.
    Increase,
    /// Quantity - 1 (removes the line at zero).
    Decrease,
    /// Drop the line.
    Remove,
}

impl FromStr for CartAction {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "increase" => Ok(Self::Increase),
            "decrease" => Ok(Self::Decrease),
            "remove" => Ok(Self::Remove),
            _ => Err(format!("unknown cart action: {s}")),
        }
    }
}

/// A classified click.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ClickIntent {
    /// Open or close the mobile menu.
    ToggleMenu,
    /// Load `page`, optionally filtered to `category`.
    Navigate {
        /// Destination page.
        page: PageId,
        /// Category filter to hand to the catalog page.
        category: Option<CategoryId>,
    },
    /// Add one unit of a product. `None` if the button carries no id.
    AddToCart {
        /// Product to add.
        product: Option<ProductId>,
    },
    /// A quantity or remove button inside the cart.
    CartControl {
        /// Product the control belongs to.
        product: Option<ProductId>,
        /// Requested action; `None` if missing or unknown.
        action: Option<CartAction>,
    },
    /// End the session.
    Logout,
}

impl ClickIntent {
    /// Short name for logs and breadcrumbs.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::ToggleMenu => "toggle_menu",
            Self::Navigate { .. } => "navigate",
            Self::AddToCart { .. } => "add_to_cart",
            Self::CartControl { .. } => "cart_control",
            Self::Logout => "logout",
        }
    }
}

type Classifier = fn(&ClickEvent) -> Option<ClickIntent>;

/// Exclusive click rules, in priority order.
pub const CLICK_RULES: &[(&str, Classifier)] = &[
    ("page-link", page_link),
    ("add-to-cart", add_to_cart),
    ("cart-control", cart_control),
    ("logout", logout),
];

/// Whether the click landed on (or inside) the mobile-menu toggle.
#[must_use]
pub fn is_menu_toggle(event: &ClickEvent) -> bool {
    event.closest(markers::MOBILE_MENU_TOGGLE).is_some()
}

/// Whether the click landed outside both the mobile menu and its toggle.
#[must_use]
pub fn is_outside_menu(event: &ClickEvent) -> bool {
    event.closest(markers::MOBILE_MENU).is_none()
        && event.closest(markers::MOBILE_MENU_TOGGLE).is_none()
}

/// Run [`CLICK_RULES`] and return the first match.
#[must_use]
pub fn classify(event: &ClickEvent) -> Option<ClickIntent> {
    CLICK_RULES.iter().find_map(|(name, rule)| {
        let intent = rule(event)?;
        tracing::trace!(rule = *name, "Click rule matched");
        Some(intent)
    })
}

fn page_link(event: &ClickEvent) -> Option<ClickIntent> {
    let link = event.closest(markers::PAGE_LINK)?;
    let page = PageId::new(link.data(markers::attr::PAGE).unwrap_or_default());
    let category = non_empty(link, markers::attr::CATEGORY).map(CategoryId::new);
    Some(ClickIntent::Navigate { page, category })
}

fn add_to_cart(event: &ClickEvent) -> Option<ClickIntent> {
    let button = event.closest(markers::ADD_TO_CART)?;
    Some(ClickIntent::AddToCart {
        product: product_id(button),
    })
}

fn cart_control(event: &ClickEvent) -> Option<ClickIntent> {
    let control = event.closest(markers::CART_CONTROL)?;
    let action = control
        .data(markers::attr::ACTION)
        .and_then(|raw| raw.parse().ok());
    Some(ClickIntent::CartControl {
        product: product_id(control),
        action,
    })
}

fn logout(event: &ClickEvent) -> Option<ClickIntent> {
    event
        .closest(markers::LOGOUT)
        .map(|_| ClickIntent::Logout)
}

fn product_id(element: &Element) -> Option<ProductId> {
    non_empty(element, markers::attr::PRODUCT_ID).map(ProductId::new)
}

fn non_empty<'a>(element: &'a Element, attr: &str) -> Option<&'a str> {
    element.data(attr).filter(|value| !value.is_empty())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn body() -> Element {
        Element::new("body")
    }

    #[test]
    fn test_cart_action_parse() {
        assert_eq!("increase".parse::<CartAction>(), Ok(CartAction::Increase));
        assert_eq!("decrease".parse::<CartAction>(), Ok(CartAction::Decrease));
        assert_eq!("remove".parse::<CartAction>(), Ok(CartAction::Remove));
        assert!("explode".parse::<CartAction>().is_err());
    }

    #[test]
    fn test_toggle_is_not_outside_menu() {
        let click = ClickEvent::new(vec![
            Element::new("svg"),
            Element::new("button").with_class("mobile-menu-button"),
            body(),
        ]);
        assert!(is_menu_toggle(&click));
        assert!(!is_outside_menu(&click));
    }

    #[test]
    fn test_inside_menu_is_not_outside() {
        let click = ClickEvent::new(vec![
            Element::new("a").with_data("page", "inicio"),
            Element::new("div").with_class("mobile-menu"),
            body(),
        ]);
        assert!(!is_outside_menu(&click));
    }

    #[test]
    fn test_page_link_with_category() {
        let click = ClickEvent::new(vec![
            Element::new("a")
                .with_data("page", "catalogo")
                .with_data("category", "vitaminas"),
            body(),
        ]);
        assert_eq!(
            classify(&click),
            Some(ClickIntent::Navigate {
                page: PageId::new("catalogo"),
                category: Some(CategoryId::new("vitaminas")),
            })
        );
    }

    #[test]
    fn test_empty_category_is_no_category() {
        let click = ClickEvent::new(vec![
            Element::new("a")
                .with_data("page", "catalogo")
                .with_data("category", ""),
        ]);
        assert!(matches!(
            classify(&click),
            Some(ClickIntent::Navigate { category: None, .. })
        ));
    }

    #[test]
    fn test_page_link_wins_over_add_to_cart() {
        // A product card link wrapping an add-to-cart button: navigation is
        // tested first.
        let click = ClickEvent::new(vec![
            Element::new("button")
                .with_class("add-to-cart-btn")
                .with_data("product-id", "p1"),
            Element::new("a").with_data("page", "producto"),
        ]);
        assert_eq!(classify(&click).unwrap().name(), "navigate");
    }

    #[test]
    fn test_cart_control_parsing() {
        let click = ClickEvent::new(vec![
            Element::new("button")
                .with_class("quantity-btn")
                .with_data("product-id", "p1")
                .with_data("action", "decrease"),
        ]);
        assert_eq!(
            classify(&click),
            Some(ClickIntent::CartControl {
                product: Some(ProductId::new("p1")),
                action: Some(CartAction::Decrease),
            })
        );
    }

    #[test]
    fn test_add_to_cart_without_id() {
        let click = ClickEvent::new(vec![Element::new("button").with_class("add-to-cart-btn")]);
        assert_eq!(classify(&click), Some(ClickIntent::AddToCart { product: None }));
    }

    #[test]
    fn test_logout_and_unmatched() {
        let logout = ClickEvent::new(vec![Element::new("a").with_class("logout-button")]);
        assert_eq!(classify(&logout), Some(ClickIntent::Logout));

        let plain = ClickEvent::new(vec![Element::new("p"), body()]);
        assert_eq!(classify(&plain), None);
    }
}
