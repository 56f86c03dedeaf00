//! mediatree - browse media shared by MediaServer2 peers on the session bus
//!
//! Library surface of the root package: the console consumer on top of the
//! retrieval engine. The binary in `main.rs` only parses arguments and
//! delegates here.

pub mod browse;
pub mod config;

use std::sync::Arc;
use std::time::Duration;

use mediatree_bus::SessionBusClient;
use mediatree_core::prelude::*;
use mediatree_engine::RetrievalDispatcher;

use browse::{browse, BrowseOptions};
use config::Settings;

/// Connect to the session bus, browse every advertised media server to
/// the configured depth, print the tree, and shut the engine down.
pub async fn run(settings: Settings) -> Result<()> {
    // zbus's blocking API must not be driven from the async context;
    // connect on a blocking task (the engine's own threads are plain
    // OS threads and need no such care)
    let bus = tokio::task::spawn_blocking(SessionBusClient::new)
        .await
        .map_err(|e| Error::bus_connection(format!("bus setup task failed: {e}")))??;
    let bus = Arc::new(bus);
    let (mut dispatcher, mut events) =
        RetrievalDispatcher::spawn(bus, settings.max_children)?;

    let opts = BrowseOptions {
        depth: settings.depth,
        wait: Duration::from_millis(settings.wait_ms),
    };
    let summary = browse(&dispatcher, &mut events, opts).await?;

    info!(
        "browse finished: {} container(s), {} item(s), {} unanswered request(s)",
        summary.containers, summary.items, summary.unanswered
    );
    if summary.containers == 0 && summary.items == 0 {
        println!("No media servers answered on the session bus.");
    }

    dispatcher.shutdown();
    Ok(())
}
