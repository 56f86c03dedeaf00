//! Console consumer of the retrieval engine
//!
//! Owns the slot table the engine's opaque handles point into, drives a
//! breadth-first auto-expansion of every discovered root down to the
//! configured depth, and prints the assembled tree.
//!
//! Batches may arrive for a parent the tree has not printed yet; the
//! accumulator therefore collects everything first and prints once the
//! engine has answered every outstanding request (or the idle window
//! lapses -- a failed listing never answers).

use std::collections::HashMap;
use std::time::Duration;

use tokio::sync::mpsc::UnboundedReceiver;
use tokio::time::timeout;

use mediatree_core::prelude::*;
use mediatree_core::{MediaNode, RetrievalEvent, SlotId};
use mediatree_engine::RetrievalDispatcher;

/// How the browse run is driven
#[derive(Debug, Clone, Copy)]
pub struct BrowseOptions {
    /// Container levels below the roots to expand (0 = roots only)
    pub depth: u32,
    /// Idle window before unanswered requests are abandoned
    pub wait: Duration,
}

/// Totals for the final summary line
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct BrowseSummary {
    pub containers: usize,
    pub items: usize,
    pub unanswered: usize,
}

/// One retrieved node plus the slot allocated for it (containers that
/// were scheduled for expansion only)
struct Entry {
    node: MediaNode,
    slot: Option<SlotId>,
}

/// Consumer-owned mapping from engine slots to tree positions.
///
/// The engine only ever echoes slot ids back; allocation, depth tracking
/// and child storage all live here.
#[derive(Default)]
struct SlotTable {
    next: u64,
    depths: HashMap<SlotId, u32>,
    roots: Vec<Entry>,
    children: HashMap<SlotId, Vec<Entry>>,
}

impl SlotTable {
    fn allocate(&mut self, depth: u32) -> SlotId {
        let slot = SlotId(self.next);
        self.next += 1;
        self.depths.insert(slot, depth);
        slot
    }

    /// Depth of the nodes that a batch tagged with `parent` belongs at
    fn batch_depth(&self, parent: Option<SlotId>) -> u32 {
        parent
            .and_then(|slot| self.depths.get(&slot).copied())
            .unwrap_or(0)
    }

    fn insert(&mut self, parent: Option<SlotId>, entry: Entry) {
        match parent {
            None => self.roots.push(entry),
            Some(slot) => self.children.entry(slot).or_default().push(entry),
        }
    }
}

/// Discover roots, expand breadth-first to `opts.depth`, print the tree.
pub async fn browse(
    dispatcher: &RetrievalDispatcher,
    events: &mut UnboundedReceiver<RetrievalEvent>,
    opts: BrowseOptions,
) -> Result<BrowseSummary> {
    let mut table = SlotTable::default();
    let mut summary = BrowseSummary::default();
    let mut outstanding: usize = 1;

    dispatcher.discover_roots()?;

    while outstanding > 0 {
        let event = match timeout(opts.wait, events.recv()).await {
            Ok(Some(event)) => event,
            Ok(None) => {
                // Engine gone; nothing more will arrive
                warn!("event channel closed with {outstanding} request(s) outstanding");
                break;
            }
            Err(_) => {
                // Failed listings are silent by design; the idle window
                // is the only way to notice them
                warn!("{outstanding} request(s) unanswered after idle window, giving up");
                break;
            }
        };
        outstanding -= 1;

        let RetrievalEvent::NodesRetrieved(batch) = event;
        let depth = table.batch_depth(batch.parent);
        for node in batch.nodes {
            let slot = if node.kind.is_container() {
                summary.containers += 1;
                if depth < opts.depth {
                    let slot = table.allocate(depth + 1);
                    dispatcher.expand(node.clone(), slot)?;
                    outstanding += 1;
                    Some(slot)
                } else {
                    None
                }
            } else {
                summary.items += 1;
                None
            };
            table.insert(batch.parent, Entry { node, slot });
        }
    }
    summary.unanswered = outstanding;

    for entry in &table.roots {
        print_entry(entry, 0, &table.children);
    }
    Ok(summary)
}

fn print_entry(entry: &Entry, indent: usize, children: &HashMap<SlotId, Vec<Entry>>) {
    let pad = "  ".repeat(indent);
    let node = &entry.node;
    if node.kind.is_container() {
        println!("{pad}{}/", node.display_name);
    } else {
        println!("{pad}{}{}", node.display_name, item_details(node));
    }
    if let Some(slot) = entry.slot {
        if let Some(nested) = children.get(&slot) {
            for child in nested {
                print_entry(child, indent + 1, children);
            }
        }
    }
}

/// `" (Artist, Album, 120s) <file:///a.mp3>"`, omitting absent fields
fn item_details(node: &MediaNode) -> String {
    let mut meta: Vec<String> = Vec::new();
    if let Some(artist) = node.artist() {
        meta.push(artist.to_string());
    }
    if let Some(album) = node.album() {
        meta.push(album.to_string());
    }
    if let Some(duration) = node.duration_secs() {
        meta.push(format!("{duration}s"));
    }

    let mut details = String::new();
    if !meta.is_empty() {
        details.push_str(&format!(" ({})", meta.join(", ")));
    }
    if let Some(url) = node.primary_url() {
        details.push_str(&format!(" <{url}>"));
    }
    details
}
