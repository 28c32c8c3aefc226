//! Integration tests for delegated click handling: navigation and the
//! mobile menu.

use farmaweb_integration_tests::{TestContext, events};

// =============================================================================
// Mobile Menu
// =============================================================================

#[test]
fn test_toggle_opens_and_closes_menu() {
    let ctx = TestContext::builder().build();

    let outcome = ctx.click(&events::menu_toggle());
    assert!(!outcome.default_prevented);
    assert!(ctx.coordinator.dispatcher().menu_open());

    ctx.click(&events::menu_toggle());
    assert!(!ctx.coordinator.dispatcher().menu_open());
    assert_eq!(ctx.navigator.toggles(), 2);
    assert_eq!(ctx.navigator.closes(), 0);
}

#[test]
fn test_outside_click_closes_open_menu() {
    let ctx = TestContext::builder().build();
    ctx.click(&events::menu_toggle());

    let outcome = ctx.click(&events::plain());

    assert!(outcome.closed_menu);
    assert!(outcome.intent.is_none());
    assert!(!outcome.default_prevented);
    assert!(!ctx.coordinator.dispatcher().menu_open());
}

#[test]
fn test_outside_click_also_runs_its_own_handler() {
    let ctx = TestContext::builder().build();
    ctx.click(&events::menu_toggle());

    let outcome = ctx.click(&events::add_to_cart("p1"));

    assert!(outcome.closed_menu);
    assert!(outcome.default_prevented);
    assert_eq!(ctx.quantity("p1"), Some(1));
}

#[test]
fn test_click_inside_menu_does_not_close_it_early() {
    let ctx = TestContext::builder().build();
    ctx.click(&events::menu_toggle());

    let outcome = ctx.click(&events::menu_link("contacto"));

    // Not an outside click; the link itself closes the menu after navigating
    assert!(!outcome.closed_menu);
    assert!(!ctx.coordinator.dispatcher().menu_open());
    assert_eq!(ctx.navigator.pages().last().map(String::as_str), Some("contacto"));
}

// =============================================================================
// Navigation
// =============================================================================

#[test]
fn test_page_link_navigates_and_closes_menu() {
    let ctx = TestContext::builder().build();
    let closes_before = ctx.navigator.closes();

    let outcome = ctx.click(&events::page_link("nosotros", None));

    assert!(outcome.default_prevented);
    assert_eq!(ctx.navigator.pages(), vec!["inicio", "nosotros"]);
    assert!(ctx.navigator.closes() > closes_before);
}

#[test]
fn test_category_link_sets_pending_category() {
    let ctx = TestContext::builder().build();

    ctx.click(&events::page_link("catalogo", Some("vitaminas")));

    assert_eq!(
        ctx.coordinator.state().pending_category().map(|c| c.to_string()),
        Some("vitaminas".to_string())
    );
    assert_eq!(ctx.navigator.loads_of("catalogo"), 1);
}

#[test]
fn test_plain_catalog_link_clears_pending_category() {
    let ctx = TestContext::builder()
        .with_entry("pending_category", "analgesicos")
        .build();

    ctx.click(&events::page_link("catalogo", None));

    assert!(ctx.coordinator.state().pending_category().is_none());
}

#[test]
fn test_other_page_link_keeps_pending_category() {
    let ctx = TestContext::builder()
        .with_entry("pending_category", "analgesicos")
        .build();

    ctx.click(&events::page_link("nosotros", None));

    assert!(ctx.coordinator.state().pending_category().is_some());
}

#[test]
fn test_unrecognised_click_keeps_default() {
    let ctx = TestContext::builder().build();

    let outcome = ctx.click(&events::plain());

    assert!(outcome.intent.is_none());
    assert!(!outcome.default_prevented);
    assert_eq!(ctx.navigator.pages(), vec!["inicio"]);
}
