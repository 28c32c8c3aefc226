//! UI role classification.
//!
//! The role decides presentation only (whether the cart affordance is shown).
//! It is NOT an access control: hiding the cart from administrators does not
//! stop an administrator session from checking out. Purchase restrictions
//! must be enforced by the order backend.

use serde::{Deserialize, Serialize};

use super::identity::SessionIdentity;

/// Value of `role` / `rol` that marks an administrator.
const ADMIN_ROLE: &str = "admin";

/// Values of `tipo` that mark an administrator.
const ADMIN_TYPES: &[&str] = &["administrador", "administrator"];

/// Substring of a (lowercased) username that marks an administrator.
const ADMIN_USERNAME_MARKER: &str = "admin";

/// Presentation role derived from the session identity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UiRole {
    /// No session.
    Anonymous,
    /// Logged-in shopper.
    Customer,
    /// Logged-in store administrator.
    Administrator,
}

impl UiRole {
    /// Whether the cart affordance is visible for this role.
    #[must_use]
    pub const fn shows_cart(self) -> bool {
        matches!(self, Self::Anonymous | Self::Customer)
    }

    /// Get the role name.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Anonymous => "anonymous",
            Self::Customer => "customer",
            Self::Administrator => "administrator",
        }
    }
}

impl core::fmt::Display for UiRole {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Classify a session identity. First match wins:
///
/// 1. no identity → [`UiRole::Anonymous`]
/// 2. any administrator marker → [`UiRole::Administrator`]
/// 3. otherwise → [`UiRole::Customer`]
///
/// # Examples
///
/// ```
/// use farmaweb_core::{SessionIdentity, UiRole, classify};
///
/// assert_eq!(classify(None), UiRole::Anonymous);
/// assert_eq!(classify(Some(&SessionIdentity::new("bob"))), UiRole::Customer);
/// assert_eq!(
///     classify(Some(&SessionIdentity::new("administrator_jane"))),
///     UiRole::Administrator
/// );
/// ```
#[must_use]
pub fn classify(identity: Option<&SessionIdentity>) -> UiRole {
    match identity {
        None => UiRole::Anonymous,
        Some(identity) if is_administrator(identity) => UiRole::Administrator,
        Some(_) => UiRole::Customer,
    }
}

fn is_administrator(identity: &SessionIdentity) -> bool {
    identity.rol.as_deref() == Some(ADMIN_ROLE)
        || identity.role.as_deref() == Some(ADMIN_ROLE)
        || identity
            .tipo
            .as_deref()
            .is_some_and(|tipo| ADMIN_TYPES.contains(&tipo))
        || identity.is_admin == Some(true)
        || identity
            .username
            .as_deref()
            .is_some_and(|name| name.to_lowercase().contains(ADMIN_USERNAME_MARKER))
}
