//! Unified error handling with Sentry integration.
//!
//! Nothing in the coordinator raises to its caller once it is running: store
//! failures and missing page elements are reported through [`AppError::report`]
//! and the operation returns. Only start-up returns `Result<_, AppError>`.

use farmaweb_core::SessionIdentity;
use thiserror::Error;

use crate::store::{SessionObserver, StoreError};

/// A required element is missing from the rendered page.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ViewError {
    /// The element with this id is not in the document.
    #[error("missing element: {0}")]
    MissingElement(String),
}

/// Application-level error type for the coordinator.
#[derive(Debug, Error)]
pub enum AppError {
    /// Key/value storage failed.
    #[error("Storage error: {0}")]
    Store(#[from] StoreError),

    /// A page element the operation needs is not rendered.
    #[error("View error: {0}")]
    View(#[from] ViewError),

    /// The page root is missing, so no listener can be attached.
    #[error("Root element not found; dispatchers not attached")]
    MissingRoot,
}

impl AppError {
    /// Log the error for `operation` and return.
    ///
    /// Missing elements are presentation glitches and only warn. Everything
    /// else is captured to Sentry.
    pub fn report(&self, operation: &str) {
        match self {
            Self::View(_) => {
                tracing::warn!(error = %self, operation, "Element missing; skipping");
            }
            Self::Store(_) | Self::MissingRoot => {
                let event_id = sentry::capture_error(self);
                tracing::error!(
                    error = %self,
                    operation,
                    sentry_event_id = %event_id,
                    "Operation failed"
                );
            }
        }
    }
}

/// Report `result` under `operation` if it failed.
pub fn report<E: Into<AppError>>(result: Result<(), E>, operation: &str) {
    if let Err(e) = result {
        e.into().report(operation);
    }
}

/// Set the Sentry user context from a session identity.
pub fn set_sentry_user(identity: &SessionIdentity) {
    sentry::configure_scope(|scope| {
        scope.set_user(Some(sentry::User {
            id: identity.id.as_ref().map(ToString::to_string),
            username: identity.username.clone(),
            ..Default::default()
        }));
    });
}

/// Clear the Sentry user context.
pub fn clear_sentry_user() {
    sentry::configure_scope(|scope| {
        scope.set_user(None);
    });
}

/// Add a breadcrumb for user actions.
///
/// Breadcrumbs appear in Sentry error reports to show the trail of user actions
/// leading up to an error.
///
/// # Example
///
/// ```rust,ignore
/// add_breadcrumb("cart", "add_to_cart", Some(&[("product_id", "ibuprofeno-400")]));
/// ```
pub fn add_breadcrumb(category: &str, message: &str, data: Option<&[(&str, &str)]>) {
    let mut breadcrumb = sentry::Breadcrumb {
        category: Some(category.to_string()),
        message: Some(message.to_string()),
        level: sentry::Level::Info,
        ..Default::default()
    };

    if let Some(pairs) = data {
        for (key, value) in pairs {
            breadcrumb.data.insert(
                (*key).to_string(),
                serde_json::Value::String((*value).to_string()),
            );
        }
    }

    sentry::add_breadcrumb(breadcrumb);
}

/// Keeps the Sentry user context in step with the stored session.
#[derive(Debug, Default, Clone, Copy)]
pub struct SentryUserContext;

impl SessionObserver for SentryUserContext {
    fn session_changed(&self, identity: Option<&SessionIdentity>) {
        match identity {
            Some(identity) => set_sentry_user(identity),
            None => clear_sentry_user(),
        }
    }
}
