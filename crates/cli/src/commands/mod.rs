//! CLI command implementations.

pub mod inspect;
pub mod replay;
pub mod session;

use farmaweb_storefront::config::{ConfigError, CoordinatorConfig};
use farmaweb_storefront::error::AppError;
use farmaweb_storefront::store::{FileBackend, PersistentStore, StoreError};
use thiserror::Error;

/// Errors surfaced by CLI commands.
#[derive(Debug, Error)]
pub enum CommandError {
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Store(#[from] StoreError),

    #[error(transparent)]
    App(#[from] AppError),

    #[error("failed to read script: {0}")]
    Io(#[from] std::io::Error),

    #[error("line {line}: {source}")]
    Script {
        line: usize,
        source: serde_json::Error,
    },

    #[error("event loop stopped before the script was delivered")]
    ChannelClosed,
}

/// Open the configured store file without starting the coordinator.
pub fn open_store(config: &CoordinatorConfig) -> Result<PersistentStore, CommandError> {
    let backend = FileBackend::open(&config.store_path)?;
    tracing::debug!(path = %config.store_path.display(), "Store opened");
    Ok(PersistentStore::new(
        Box::new(backend),
        config.keys.session.clone(),
    ))
}
