//! Integration tests for the header search boxes.

use farmaweb_integration_tests::{TestContext, events};
use farmaweb_storefront::{Outcome, UiEvent};

#[test]
fn test_desktop_and_mobile_search_reach_catalog() {
    let ctx = TestContext::builder().build();

    let desktop = ctx.input(&events::typed("desktop-search-input", "ibupro"));
    let mobile = ctx.input(&events::typed("mobile-search-input", "jarabe"));

    assert_eq!(desktop.query.as_deref(), Some("ibupro"));
    assert_eq!(mobile.query.as_deref(), Some("jarabe"));
    assert_eq!(ctx.navigator.searches(), vec!["ibupro", "jarabe"]);
}

#[test]
fn test_every_keystroke_is_forwarded() {
    let ctx = TestContext::builder().build();

    for value in ["p", "pa", "par", ""] {
        ctx.input(&events::typed("desktop-search-input", value));
    }

    assert_eq!(ctx.navigator.searches(), vec!["p", "pa", "par", ""]);
}

#[test]
fn test_other_inputs_are_ignored() {
    let ctx = TestContext::builder().build();

    let outcome = ctx.input(&events::typed("acc-name", "Ana"));

    assert!(outcome.query.is_none());
    assert!(ctx.navigator.searches().is_empty());
    assert_eq!(ctx.navigator.pages(), vec!["inicio"]);
}

#[test]
fn test_search_does_not_touch_menu_or_cart() {
    let ctx = TestContext::builder().build();
    ctx.click(&events::menu_toggle());

    let outcome = ctx
        .coordinator
        .dispatch(&UiEvent::Input(events::typed("mobile-search-input", "vit")));

    assert!(matches!(outcome, Outcome::Input(_)));
    assert!(!outcome.default_prevented());
    assert!(ctx.coordinator.dispatcher().menu_open());
    assert_eq!(ctx.stored_cart(), None);
}
