//! Coordinator configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! All optional:
//! - `FARMAWEB_SESSION_KEY` - Storage key of the session identity (default: `currentUser`)
//! - `FARMAWEB_CART_KEY` - Storage key of the cart (default: `cart`)
//! - `FARMAWEB_CATEGORY_KEY` - Storage key of the pending catalog filter (default: `pending_category`)
//! - `FARMAWEB_HOME_PAGE` - Page loaded at start-up (default: `inicio`)
//! - `FARMAWEB_CATALOG_PAGE` - Catalog page (default: `catalogo`)
//! - `FARMAWEB_ACCOUNT_PAGE` - Account page (default: `cuenta`)
//! - `FARMAWEB_ORDER_COMPLETE_PAGE` - Page shown after checkout (default: `orden-completa`)
//! - `FARMAWEB_STORE_PATH` - File backing the key/value store (default: `.farmaweb-store.json`)
//! - `SENTRY_DSN` - Sentry error tracking DSN
//! - `SENTRY_ENVIRONMENT` - Sentry environment name

use std::path::PathBuf;

use farmaweb_core::PageId;
use thiserror::Error;

/// Configuration errors that can occur during loading.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
    #[error("Storage key {0:?} is used for more than one purpose")]
    DuplicateKey(String),
}

/// Coordinator configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CoordinatorConfig {
    /// Storage keys
    pub keys: StorageKeys,
    /// Well-known page ids
    pub pages: PageRoutes,
    /// File backing the key/value store
    pub store_path: PathBuf,
    /// Sentry DSN for error tracking
    pub sentry_dsn: Option<String>,
    /// Sentry environment name
    pub sentry_environment: Option<String>,
}

/// Keys under which state is persisted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StorageKeys {
    /// Session identity; writes here trigger reconciliation
    pub session: String,
    /// Cart line items
    pub cart: String,
    /// Category filter handed from a navigation link to the catalog page
    pub pending_category: String,
}

/// Page ids the coordinator navigates to on its own.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageRoutes {
    /// Loaded at start-up
    pub home: PageId,
    /// Catalog; a plain link here clears the pending category
    pub catalog: PageId,
    /// Shown after the personal-info form is saved
    pub account: PageId,
    /// Shown after checkout
    pub order_complete: PageId,
}

impl Default for StorageKeys {
    fn default() -> Self {
        Self {
            session: "currentUser".to_string(),
            cart: "cart".to_string(),
            pending_category: "pending_category".to_string(),
        }
    }
}

impl Default for PageRoutes {
    fn default() -> Self {
        Self {
            home: PageId::new("inicio"),
            catalog: PageId::new("catalogo"),
            account: PageId::new("cuenta"),
            order_complete: PageId::new("orden-completa"),
        }
    }
}

impl Default for CoordinatorConfig {
    fn default() -> Self {
        Self {
            keys: StorageKeys::default(),
            pages: PageRoutes::default(),
            store_path: PathBuf::from(".farmaweb-store.json"),
            sentry_dsn: None,
            sentry_environment: None,
        }
    }
}

impl CoordinatorConfig {
    /// Load configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv()` to load from `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if a variable is set to an empty value or two
    /// storage keys collide.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build configuration from an arbitrary variable lookup.
    ///
    /// # Errors
    ///
    /// See [`CoordinatorConfig::from_env`].
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let defaults = Self::default();
        let var = |key: &str, default: &str| get_non_empty(&lookup, key, default);

        let keys = StorageKeys {
            session: var("FARMAWEB_SESSION_KEY", &defaults.keys.session)?,
            cart: var("FARMAWEB_CART_KEY", &defaults.keys.cart)?,
            pending_category: var("FARMAWEB_CATEGORY_KEY", &defaults.keys.pending_category)?,
        };
        let pages = PageRoutes {
            home: var("FARMAWEB_HOME_PAGE", defaults.pages.home.as_str())?.into(),
            catalog: var("FARMAWEB_CATALOG_PAGE", defaults.pages.catalog.as_str())?.into(),
            account: var("FARMAWEB_ACCOUNT_PAGE", defaults.pages.account.as_str())?.into(),
            order_complete: var(
                "FARMAWEB_ORDER_COMPLETE_PAGE",
                defaults.pages.order_complete.as_str(),
            )?
            .into(),
        };
        let store_path = lookup("FARMAWEB_STORE_PATH").map_or(defaults.store_path, PathBuf::from);

        let config = Self {
            keys,
            pages,
            store_path,
            sentry_dsn: lookup("SENTRY_DSN").filter(|v| !v.is_empty()),
            sentry_environment: lookup("SENTRY_ENVIRONMENT").filter(|v| !v.is_empty()),
        };
        config.validate()?;
        Ok(config)
    }

    /// Check that the storage keys are pairwise distinct.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::DuplicateKey` naming the first repeated key.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let StorageKeys {
            session,
            cart,
            pending_category,
        } = &self.keys;

        if session == cart || session == pending_category {
            return Err(ConfigError::DuplicateKey(session.clone()));
        }
        if cart == pending_category {
            return Err(ConfigError::DuplicateKey(cart.clone()));
        }
        Ok(())
    }
}

// =============================================================================
// Helper Functions
// =============================================================================

/// Get a variable with a default, rejecting explicitly empty values.
fn get_non_empty(
    lookup: &impl Fn(&str) -> Option<String>,
    key: &str,
    default: &str,
) -> Result<String, ConfigError> {
    match lookup(key) {
        Some(value) if value.trim().is_empty() => Err(ConfigError::InvalidEnvVar(
            key.to_string(),
            "must not be empty".to_string(),
        )),
        Some(value) => Ok(value),
        None => Ok(default.to_string()),
    }
}
