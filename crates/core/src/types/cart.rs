//! Shopping cart value types.
//!
//! The [`Cart`] is an ordered list of [`LineItem`]s. Insertion order is
//! display order, each product appears at most once, and a stored quantity is
//! always positive: driving a quantity to zero or below removes the line.

use serde::{Deserialize, Serialize};

use super::id::ProductId;

/// One product/quantity pair within the cart.
///
/// Serialized as `{"id": "<product id>", "quantity": <n>}`, which is the shape
/// the page templates read from storage.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LineItem {
    #[serde(rename = "id")]
    product_id: ProductId,
    quantity: u32,
}

impl LineItem {
    /// Create a line item.
    ///
    /// Returns `None` for a zero quantity, which is never a valid stored state.
    #[must_use]
    pub fn new(product_id: ProductId, quantity: u32) -> Option<Self> {
        if quantity == 0 {
            return None;
        }
        Some(Self {
            product_id,
            quantity,
        })
    }

    /// The product this line refers to.
    #[must_use]
    pub const fn product_id(&self) -> &ProductId {
        &self.product_id
    }

    /// The (always positive) quantity.
    #[must_use]
    pub const fn quantity(&self) -> u32 {
        self.quantity
    }
}

/// Result of [`Cart::set_quantity`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QuantityChange {
    /// The line now holds the given quantity.
    Updated(u32),
    /// The requested quantity was zero or negative, so the line was removed.
    Removed,
    /// No line exists for the product; nothing changed.
    Missing,
}

impl QuantityChange {
    /// Whether the cart contents changed.
    #[must_use]
    pub const fn is_change(self) -> bool {
        !matches!(self, Self::Missing)
    }
}

/// Ordered collection of line items.
///
/// Deserializing goes through [`Cart::from_items`], so data written by older
/// code (duplicate ids, zero quantities) is normalized on load.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "Vec<LineItem>", into = "Vec<LineItem>")]
pub struct Cart {
    items: Vec<LineItem>,
}

impl Cart {
    /// Create an empty cart.
    #[must_use]
    pub const fn new() -> Self {
        Self { items: Vec::new() }
    }

    /// Build a cart from raw items, merging duplicates into the first
    /// occurrence and dropping zero quantities.
    #[must_use]
    pub fn from_items(raw: impl IntoIterator<Item = LineItem>) -> Self {
        let mut cart = Self::new();
        for item in raw {
            if item.quantity == 0 {
                continue;
            }
            match cart.position(&item.product_id) {
                Some(idx) => {
                    if let Some(existing) = cart.items.get_mut(idx) {
                        existing.quantity = existing.quantity.saturating_add(item.quantity);
                    }
                }
                None => cart.items.push(item),
            }
        }
        cart
    }

    /// Add one unit of `product_id`.
    ///
    /// Increments the existing line or appends a new line with quantity 1.
    /// Returns the resulting quantity.
    pub fn add(&mut self, product_id: &ProductId) -> u32 {
        if let Some(item) = self.get_mut(product_id) {
            item.quantity = item.quantity.saturating_add(1);
            return item.quantity;
        }
        self.items.push(LineItem {
            product_id: product_id.clone(),
            quantity: 1,
        });
        1
    }

    /// Set the quantity of an existing line.
    ///
    /// Zero or negative quantities remove the line. Absent products are left
    /// alone. There is no upper bound at this layer.
    pub fn set_quantity(&mut self, product_id: &ProductId, quantity: i64) -> QuantityChange {
        let Some(idx) = self.position(product_id) else {
            return QuantityChange::Missing;
        };

        if quantity <= 0 {
            self.items.remove(idx);
            return QuantityChange::Removed;
        }

        let quantity = u32::try_from(quantity).unwrap_or(u32::MAX);
        match self.items.get_mut(idx) {
            Some(item) => {
                item.quantity = quantity;
                QuantityChange::Updated(quantity)
            }
            None => QuantityChange::Missing,
        }
    }

    /// Remove the line for `product_id`. Returns `true` if a line was removed.
    pub fn remove(&mut self, product_id: &ProductId) -> bool {
        match self.position(product_id) {
            Some(idx) => {
                self.items.remove(idx);
                true
            }
            None => false,
        }
    }

    /// Remove every line. Returns `true` if the cart was not already empty.
    pub fn clear(&mut self) -> bool {
        let had_items = !self.items.is_empty();
        self.items.clear();
        had_items
    }

    /// Look up the line for `product_id`.
    #[must_use]
    pub fn get(&self, product_id: &ProductId) -> Option<&LineItem> {
        self.items.iter().find(|item| &item.product_id == product_id)
    }

    /// Lines in display order.
    #[must_use]
    pub fn items(&self) -> &[LineItem] {
        &self.items
    }

    /// Total number of units across all lines (the cart badge value).
    #[must_use]
    pub fn badge_count(&self) -> u32 {
        self.items
            .iter()
            .fold(0u32, |total, item| total.saturating_add(item.quantity))
    }

    /// Number of distinct products.
    #[must_use]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Whether the cart has no lines.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    fn position(&self, product_id: &ProductId) -> Option<usize> {
        self.items
            .iter()
            .position(|item| &item.product_id == product_id)
    }

    fn get_mut(&mut self, product_id: &ProductId) -> Option<&mut LineItem> {
        self.items
            .iter_mut()
            .find(|item| &item.product_id == product_id)
    }
}

impl From<Vec<LineItem>> for Cart {
    fn from(items: Vec<LineItem>) -> Self {
        Self::from_items(items)
    }
}

impl From<Cart> for Vec<LineItem> {
    fn from(cart: Cart) -> Self {
        cart.items
    }
}
