//! Write or remove the session key directly.
//!
//! This bypasses the coordinator; the next `replay` picks the new session up
//! at start-up.

use farmaweb_core::SessionIdentity;
use farmaweb_storefront::config::CoordinatorConfig;

use super::{CommandError, open_store};

/// Store a session identity for `username`.
pub fn login(
    config: CoordinatorConfig,
    username: &str,
    name: Option<String>,
    role: Option<String>,
) -> Result<(), CommandError> {
    let store = open_store(&config)?;

    let mut identity = SessionIdentity::new(username);
    identity.name = name;
    identity.role = role;
    store.set_session(&identity)?;

    tracing::info!(username, role = %farmaweb_core::classify(Some(&identity)), "Session stored");
    Ok(())
}

/// Remove the stored session identity.
pub fn logout(config: CoordinatorConfig) -> Result<(), CommandError> {
    let store = open_store(&config)?;
    store.clear_session()?;
    tracing::info!("Session removed");
    Ok(())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use farmaweb_core::UiRole;

    use super::*;

    fn config(dir: &tempfile::TempDir) -> CoordinatorConfig {
        CoordinatorConfig {
            store_path: dir.path().join("store.json"),
            ..CoordinatorConfig::default()
        }
    }

    #[test]
    fn test_login_then_logout() {
        let dir = tempfile::tempdir().unwrap();

        login(config(&dir), "maria", None, Some("admin".to_string())).unwrap();
        let identity = open_store(&config(&dir)).unwrap().session().unwrap();
        assert_eq!(identity.username.as_deref(), Some("maria"));
        assert_eq!(farmaweb_core::classify(Some(&identity)), UiRole::Administrator);

        logout(config(&dir)).unwrap();
        assert!(open_store(&config(&dir)).unwrap().session().is_none());
    }
}
