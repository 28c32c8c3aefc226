//! Print stored state.

use farmaweb_core::{Cart, SessionIdentity, UiRole, classify};
use farmaweb_storefront::config::CoordinatorConfig;

use super::{CommandError, open_store};

/// Print the stored cart, one line per item, followed by the badge count.
#[allow(clippy::print_stdout)]
pub fn cart(config: CoordinatorConfig) -> Result<(), CommandError> {
    let store = open_store(&config)?;
    let cart = match store.get_json::<Cart>(&config.keys.cart) {
        Ok(cart) => cart.unwrap_or_default(),
        Err(e) => {
            tracing::warn!("Stored cart is unreadable: {e}");
            Cart::new()
        }
    };
    println!("{}", format_cart(&cart));
    Ok(())
}

/// Print the stored session identity and the role it maps to.
#[allow(clippy::print_stdout)]
pub fn session(config: CoordinatorConfig) -> Result<(), CommandError> {
    let store = open_store(&config)?;
    let identity = store.session();
    println!("{}", format_session(identity.as_ref()));
    Ok(())
}

fn format_cart(cart: &Cart) -> String {
    if cart.is_empty() {
        return "Cart is empty".to_string();
    }
    let mut out: Vec<String> = cart
        .items()
        .iter()
        .map(|item| format!("{:>4} x {}", item.quantity(), item.product_id()))
        .collect();
    out.push(format!("Badge: {}", cart.badge_count()));
    out.join("\n")
}

fn format_session(identity: Option<&SessionIdentity>) -> String {
    let role = classify(identity);
    match identity {
        None => format!("No session ({role})"),
        Some(identity) => {
            let who = identity
                .display_name()
                .unwrap_or("unnamed user");
            let cart = if role == UiRole::Administrator {
                "cart hidden"
            } else {
                "cart shown"
            };
            format!("{who} ({role}, {cart})")
        }
    }
}
