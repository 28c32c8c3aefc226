//! Replay a recorded interaction script through the coordinator.
//!
//! The script is JSON lines: one [`UiEvent`] per line. Blank lines and lines
//! starting with `#` are skipped.
//!
//! ```text
//! # add two units of ibuprofeno, then pay
//! {"type":"click","path":[{"tag":"button","classes":["add-to-cart-btn"],"data":{"product-id":"ibuprofeno"}}]}
//! {"type":"click","path":[{"tag":"button","classes":["add-to-cart-btn"],"data":{"product-id":"ibuprofeno"}}]}
//! {"type":"submit","form_id":"payment-form","fields":{}}
//! ```

use std::path::Path;

use farmaweb_storefront::config::CoordinatorConfig;
use farmaweb_storefront::store::FileBackend;
use farmaweb_storefront::{Coordinator, UiEvent};
use tokio::sync::mpsc;

use super::CommandError;
use crate::console;

/// Parse a script into events, in file order.
pub fn parse_script(script: &str) -> Result<Vec<UiEvent>, CommandError> {
    script
        .lines()
        .enumerate()
        .filter(|(_, line)| {
            let line = line.trim();
            !line.is_empty() && !line.starts_with('#')
        })
        .map(|(index, line)| {
            serde_json::from_str(line).map_err(|source| CommandError::Script {
                line: index + 1,
                source,
            })
        })
        .collect()
}

/// Start the coordinator over the configured store and feed it the script.
pub async fn run(config: CoordinatorConfig, path: &Path) -> Result<(), CommandError> {
    let script = tokio::fs::read_to_string(path).await?;
    let events = parse_script(&script)?;
    tracing::info!(path = %path.display(), events = events.len(), "Replaying script");

    let backend = FileBackend::open(&config.store_path)?;
    let coordinator = Coordinator::start(config, Box::new(backend), console::collaborators())?;

    let handled = feed(&coordinator, events).await?;

    let cart = coordinator.state().cart();
    tracing::info!(
        handled,
        cart_lines = cart.snapshot().len(),
        cart_units = cart.badge_count(),
        "Replay finished"
    );
    Ok(())
}

/// Send `events` through a channel into the coordinator's event loop.
async fn feed(coordinator: &Coordinator, events: Vec<UiEvent>) -> Result<usize, CommandError> {
    let (tx, rx) = mpsc::channel(events.len().max(1));
    for event in events {
        tx.send(event)
            .await
            .map_err(|_| CommandError::ChannelClosed)?;
    }
    drop(tx);
    Ok(coordinator.run(rx).await)
}
