//! Integration tests for delegated form submission.

use farmaweb_integration_tests::{TestContext, events};
use farmaweb_storefront::dispatch::FormKind;
use serde_json::json;

// =============================================================================
// Checkout
// =============================================================================

#[test]
fn test_payment_clears_cart_and_completes_order_once() {
    let ctx = TestContext::builder()
        .with_entry("cart", r#"[{"id":"p1","quantity":2},{"id":"p2","quantity":1}]"#)
        .build();

    let outcome = ctx.submit(&events::form("payment-form"));

    assert_eq!(outcome.form, Some(FormKind::Payment));
    assert!(outcome.default_prevented);
    let order = outcome.order.unwrap();
    assert_eq!(order.units, 3);

    assert_eq!(ctx.stored_cart(), Some(json!([])));
    assert_eq!(ctx.view.last_badge(), Some(0));
    assert_eq!(ctx.navigator.loads_of("orden-completa"), 1);
    assert_eq!(ctx.view.confirmations(), vec![order.message()]);
}

#[test]
fn test_each_order_gets_its_own_reference() {
    let ctx = TestContext::builder().build();

    let first = ctx.submit(&events::form("payment-form")).order.unwrap();
    let second = ctx.submit(&events::form("payment-form")).order.unwrap();

    assert_ne!(first.reference, second.reference);
}

// =============================================================================
// Contact
// =============================================================================

#[test]
fn test_contact_form_confirms_and_resets() {
    let ctx = TestContext::builder().build();

    let outcome = ctx.submit(&events::form("contact-form").with_field("message", "hola"));

    assert!(outcome.default_prevented);
    assert_eq!(ctx.view.confirmations(), vec!["Mensaje enviado con éxito."]);
    assert_eq!(ctx.view.resets(), vec!["contact-form"]);
}

// =============================================================================
// Personal Info
// =============================================================================

#[test]
fn test_personal_info_updates_session_name() {
    let ctx = TestContext::builder()
        .with_session(&json!({"id": 7, "username": "maria", "name": "María", "telefono": "555"}))
        .build();

    ctx.submit(&events::form("personal-info-form").with_field("acc-name", "María José"));

    let stored: serde_json::Value =
        serde_json::from_str(&ctx.store().get("currentUser").unwrap().unwrap()).unwrap();
    assert_eq!(stored["name"], "María José");
    assert_eq!(stored["telefono"], "555");
    assert_eq!(stored["id"], 7);

    assert_eq!(ctx.view.confirmations(), vec!["Información actualizada con éxito."]);
    assert_eq!(
        ctx.view.login_buttons().last().cloned().flatten().as_deref(),
        Some("María José")
    );
    assert_eq!(ctx.navigator.pages().last().map(String::as_str), Some("cuenta"));
}

#[test]
fn test_personal_info_without_session_does_nothing() {
    let ctx = TestContext::builder().build();

    let outcome = ctx.submit(&events::form("personal-info-form").with_field("acc-name", "Nadie"));

    assert!(outcome.default_prevented);
    assert!(ctx.store().get("currentUser").unwrap().is_none());
    assert!(ctx.view.confirmations().is_empty());
    assert_eq!(ctx.navigator.pages(), vec!["inicio"]);
}

// =============================================================================
// Unrecognised Forms
// =============================================================================

#[test]
fn test_unrecognised_form_keeps_default() {
    let ctx = TestContext::builder().build();

    let outcome = ctx.submit(&events::form("newsletter-form"));

    assert_eq!(outcome.form, None);
    assert!(!outcome.default_prevented);
    assert!(ctx.view.confirmations().is_empty());
}
