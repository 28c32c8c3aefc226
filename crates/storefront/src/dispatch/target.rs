//! Structured description of what the user interacted with.
//!
//! A click is described by its ancestor path: the clicked element first, the
//! document root last. Markers are matched with closest-ancestor semantics,
//! the same way a delegated listener inspects a bubbled event.

use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};

/// One element on the path from the event target to the root.
///
/// `data` holds `data-*` attributes without the prefix, so
/// `data-product-id="x"` is `data["product-id"] = "x"`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Element {
    /// Tag name, for logging only.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tag: Option<String>,
    /// Element id.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    /// Class list.
    #[serde(default, skip_serializing_if = "BTreeSet::is_empty")]
    pub classes: BTreeSet<String>,
    /// `data-*` attributes.
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub data: BTreeMap<String, String>,
}

impl Element {
    /// Create an element with the given tag.
    #[must_use]
    pub fn new(tag: impl Into<String>) -> Self {
        Self {
            tag: Some(tag.into()),
            ..Self::default()
        }
    }

    /// Set the element id.
    #[must_use]
    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }

    /// Add a class.
    #[must_use]
    pub fn with_class(mut self, class: impl Into<String>) -> Self {
        self.classes.insert(class.into());
        self
    }

    /// Add a `data-*` attribute (name without the `data-` prefix).
    #[must_use]
    pub fn with_data(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.data.insert(name.into(), value.into());
        self
    }

    /// Whether the element has `class`.
    #[must_use]
    pub fn has_class(&self, class: &str) -> bool {
        self.classes.contains(class)
    }

    /// The value of `data-<name>`, if present.
    #[must_use]
    pub fn data(&self, name: &str) -> Option<&str> {
        self.data.get(name).map(String::as_str)
    }
}

/// A marker an element can carry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Selector {
    /// Has this class.
    Class(&'static str),
    /// Has any of these classes.
    AnyClass(&'static [&'static str]),
    /// Carries this `data-*` attribute (any value, including empty).
    Data(&'static str),
}

impl Selector {
    /// Whether `element` matches.
    #[must_use]
    pub fn matches(self, element: &Element) -> bool {
        match self {
            Self::Class(class) => element.has_class(class),
            Self::AnyClass(classes) => classes.iter().any(|c| element.has_class(c)),
            Self::Data(name) => element.data.contains_key(name),
        }
    }
}

/// Markers of the page markup contract.
pub mod markers {
    use super::Selector;

    /// Hamburger button that opens and closes the mobile menu.
    pub const MOBILE_MENU_TOGGLE: Selector = Selector::Class("mobile-menu-button");
    /// The mobile menu panel.
    pub const MOBILE_MENU: Selector = Selector::Class("mobile-menu");
    /// In-page navigation link (`data-page`, optional `data-category`).
    pub const PAGE_LINK: Selector = Selector::Data("page");
    /// Add-to-cart button (`data-product-id`).
    pub const ADD_TO_CART: Selector = Selector::Class("add-to-cart-btn");
    /// Quantity and remove buttons inside the cart (`data-product-id`,
    /// `data-action`).
    pub const CART_CONTROL: Selector = Selector::AnyClass(&["quantity-btn", "remove-item-btn"]);
    /// Logout button.
    pub const LOGOUT: Selector = Selector::Class("logout-button");
    /// Header search boxes whose input drives the catalog search.
    pub const SEARCH_INPUTS: &[&str] = &["desktop-search-input", "mobile-search-input"];

    /// `data-*` attribute names.
    pub mod attr {
        /// Destination page id.
        pub const PAGE: &str = "page";
        /// Catalog category filter.
        pub const CATEGORY: &str = "category";
        /// Product id.
        pub const PRODUCT_ID: &str = "product-id";
        /// Cart control action.
        pub const ACTION: &str = "action";
    }
}

/// A click, described by its ancestor path.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClickEvent {
    /// Clicked element first, root last.
    #[serde(default)]
    pub path: Vec<Element>,
}

impl ClickEvent {
    /// Create a click from its ancestor path (target first).
    #[must_use]
    pub const fn new(path: Vec<Element>) -> Self {
        Self { path }
    }

    /// The nearest element on the path, starting at the target, that matches
    /// `selector`.
    #[must_use]
    pub fn closest(&self, selector: Selector) -> Option<&Element> {
        self.path.iter().find(|element| selector.matches(element))
    }
}

/// A form submission.
///
/// `fields` maps input ids to their current values.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubmitEvent {
    /// The form's id attribute.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub form_id: Option<String>,
    /// Input values keyed by input id.
    #[serde(default)]
    pub fields: BTreeMap<String, String>,
}

impl SubmitEvent {
    /// Create a submission of the form with id `form_id`.
    #[must_use]
    pub fn new(form_id: impl Into<String>) -> Self {
        Self {
            form_id: Some(form_id.into()),
            fields: BTreeMap::new(),
        }
    }

    /// Set an input value.
    #[must_use]
    pub fn with_field(mut self, input_id: impl Into<String>, value: impl Into<String>) -> Self {
        self.fields.insert(input_id.into(), value.into());
        self
    }

    /// The value of the input with id `input_id`.
    #[must_use]
    pub fn field(&self, input_id: &str) -> Option<&str> {
        self.fields.get(input_id).map(String::as_str)
    }
}

/// An `input` event on a text box.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct InputEvent {
    /// The input's id attribute.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub input_id: Option<String>,
    /// The input's value after the keystroke.
    #[serde(default)]
    pub value: String,
}

impl InputEvent {
    #[must_use]
    pub fn new(input_id: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            input_id: Some(input_id.into()),
            value: value.into(),
        }
    }

    /// Whether the event came from one of the header search boxes.
    #[must_use]
    pub fn is_search(&self) -> bool {
        self.input_id
            .as_deref()
            .is_some_and(|id| markers::SEARCH_INPUTS.contains(&id))
    }
}
