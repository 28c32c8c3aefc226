//! Form classification and order confirmation.

use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

use super::target::SubmitEvent;

/// Input id of the display-name field on the personal-info form.
pub const NAME_FIELD: &str = "acc-name";

/// Confirmation shown after the contact form is sent.
pub const CONTACT_SENT: &str = "Mensaje enviado con éxito.";

/// Confirmation shown after the personal-info form is saved.
pub const PROFILE_UPDATED: &str = "Información actualizada con éxito.";

/// Forms the submit dispatcher handles.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FormKind {
    /// Login form, handed to the auth service.
    Login,
    /// Contact form (simulated send).
    Contact,
    /// Account personal-info form.
    PersonalInfo,
    /// Checkout payment form (simulated payment).
    Payment,
}

/// Form ids, in priority order.
pub const FORM_RULES: &[(&str, FormKind)] = &[
    ("login-form", FormKind::Login),
    ("contact-form", FormKind::Contact),
    ("personal-info-form", FormKind::PersonalInfo),
    ("payment-form", FormKind::Payment),
];

impl FormKind {
    /// Classify a submission by its form id.
    #[must_use]
    pub fn classify(event: &SubmitEvent) -> Option<Self> {
        let form_id = event.form_id.as_deref()?;
        FORM_RULES
            .iter()
            .find(|(id, _)| *id == form_id)
            .map(|(_, kind)| *kind)
    }

    /// The form id this kind answers to.
    #[must_use]
    pub const fn form_id(self) -> &'static str {
        match self {
            Self::Login => "login-form",
            Self::Contact => "contact-form",
            Self::PersonalInfo => "personal-info-form",
            Self::Payment => "payment-form",
        }
    }
}

/// A placed order, as confirmed to the shopper.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OrderConfirmation {
    /// Order reference shown in the confirmation.
    pub reference: Uuid,
    /// When the order was placed.
    pub placed_at: DateTime<Utc>,
    /// Units in the cart at checkout.
    pub units: u32,
}

impl OrderConfirmation {
    /// Confirm an order of `units` units placed now.
    #[must_use]
    pub fn new(units: u32) -> Self {
        Self {
            reference: Uuid::new_v4(),
            placed_at: Utc::now(),
            units,
        }
    }

    /// Text of the confirmation dialog.
    #[must_use]
    pub fn message(&self) -> String {
        format!(
            "¡Pedido realizado con éxito! Referencia: {}",
            self.reference
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classify_known_forms() {
        for (id, kind) in FORM_RULES {
            assert_eq!(FormKind::classify(&SubmitEvent::new(*id)), Some(*kind));
            assert_eq!(kind.form_id(), *id);
        }
    }

    #[test]
    fn test_classify_unknown_or_anonymous_form() {
        assert_eq!(FormKind::classify(&SubmitEvent::new("newsletter-form")), None);
        assert_eq!(FormKind::classify(&SubmitEvent::default()), None);
    }

    #[test]
    fn test_order_confirmation_message_carries_reference() {
        let order = OrderConfirmation::new(3);
        assert_eq!(order.units, 3);
        assert!(order.message().contains(&order.reference.to_string()));
    }

    #[test]
    fn test_order_references_are_unique() {
        assert_ne!(
            OrderConfirmation::new(1).reference,
            OrderConfirmation::new(1).reference
        );
    }
}
