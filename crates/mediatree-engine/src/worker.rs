//! Background workers for remote tree retrieval
//!
//! Two persistent threads, each owning one FIFO request queue:
//!
//! - the retrieval worker services container expansions, one at a time,
//!   with deliberately blocking remote calls (bounding concurrent load on
//!   any single peer and on the bus);
//! - the discovery lane services root-discovery triggers, so repeated
//!   discovery never competes with expansions for queue position and
//!   resource usage stays bounded under repeated calls.
//!
//! Both observe the shared stop flag only at the idle-wait boundary: a
//! request being processed always runs to completion and emits before the
//! flag is checked again, while a request still queued when the flag is
//! raised is discarded without being serviced. A closed request channel
//! stops a worker the same way the flag does.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread::JoinHandle;

use serde_json::Value;
use tokio::sync::mpsc;

use mediatree_bus::{MediaBus, ServiceResolver};
use mediatree_core::prelude::*;
use mediatree_core::{MediaNode, NodeBatch, NodeKind, RetrievalEvent, SlotId, TRACKED_ITEM_PROPERTIES};

/// One container expansion to perform.
///
/// Enqueued by the dispatcher, consumed exactly once by the worker,
/// never re-enqueued.
#[derive(Debug, Clone)]
pub struct ExpandRequest {
    pub node: MediaNode,
    pub slot: SlotId,
}

/// The persistent expansion worker. Only this thread performs remote
/// calls for tree expansion; at most one expansion is in flight at a time.
pub(crate) struct RetrievalWorker {
    bus: Arc<dyn MediaBus>,
    events: mpsc::UnboundedSender<RetrievalEvent>,
    stop: Arc<AtomicBool>,
    max_children: u32,
}

impl RetrievalWorker {
    /// Spawn the worker thread; returns the request sender and the handle.
    pub(crate) fn spawn(
        bus: Arc<dyn MediaBus>,
        events: mpsc::UnboundedSender<RetrievalEvent>,
        stop: Arc<AtomicBool>,
        max_children: u32,
    ) -> Result<(mpsc::UnboundedSender<ExpandRequest>, JoinHandle<()>)> {
        let (request_tx, request_rx) = mpsc::unbounded_channel();
        let worker = Self {
            bus,
            events,
            stop,
            max_children,
        };
        let handle = std::thread::Builder::new()
            .name("retrieval-worker".to_string())
            .spawn(move || worker.run(request_rx))?;
        Ok((request_tx, handle))
    }

    fn run(self, mut requests: mpsc::UnboundedReceiver<ExpandRequest>) {
        loop {
            // Stop is observed only at the idle-wait boundary
            if self.stop.load(Ordering::SeqCst) {
                break;
            }
            let Some(request) = requests.blocking_recv() else {
                break;
            };
            // A request that was still buffered when the flag went up
            // must not start; only an expansion already under way emits
            if self.stop.load(Ordering::SeqCst) {
                debug!(
                    "discarding queued expansion of {} for {}",
                    request.node.display_name, request.slot
                );
                break;
            }
            self.expand(request);
        }
        info!("retrieval worker stopped");
    }

    /// Expand one container: list its children, fetch item metadata, and
    /// emit the result as a single ordered batch tagged with the slot.
    fn expand(&self, request: ExpandRequest) {
        let ExpandRequest { node, slot } = request;

        if !node.kind.is_container() {
            debug!(
                "ignoring expansion request for non-container {} ({})",
                node.display_name, node.kind
            );
            return;
        }

        let entries = match self.bus.list_children(&node, self.max_children) {
            Ok(entries) => entries,
            Err(err) => {
                // No emission: the consumer sees no children for this
                // container, the log carries the detail
                warn!(
                    "listing children of {} under {} failed: {err}",
                    node.service, node.object_path
                );
                return;
            }
        };

        let mut children = Vec::with_capacity(entries.len());
        for entry in entries {
            let Some(kind) = NodeKind::from_remote(&entry.type_name) else {
                debug!(
                    "skipping child {} with unsupported type {:?}",
                    entry.path, entry.type_name
                );
                continue;
            };

            let mut child =
                MediaNode::child(entry.display_name, &node.service, entry.path, kind, slot);

            if !kind.is_container() {
                match self.bus.item_properties(&child) {
                    Ok(fetched) => {
                        // All four tracked keys are always recorded; a key
                        // the peer did not report becomes null
                        for key in TRACKED_ITEM_PROPERTIES {
                            let value = fetched.get(*key).cloned().unwrap_or(Value::Null);
                            child.properties.insert((*key).to_string(), value);
                        }
                    }
                    Err(err) => {
                        // One broken item must not abort the whole
                        // listing; the child is dropped from the batch
                        warn!(
                            "property fetch for {} failed, dropping item: {err}",
                            child.object_path
                        );
                        continue;
                    }
                }
            }

            children.push(child);
        }

        debug!(
            "expanded {} into {} child node(s)",
            node.display_name,
            children.len()
        );
        emit(&self.events, NodeBatch::children(children, slot));
    }
}

/// The discovery lane: one thread servicing root-discovery triggers.
pub(crate) struct DiscoveryWorker {
    resolver: ServiceResolver,
    events: mpsc::UnboundedSender<RetrievalEvent>,
    stop: Arc<AtomicBool>,
}

impl DiscoveryWorker {
    pub(crate) fn spawn(
        resolver: ServiceResolver,
        events: mpsc::UnboundedSender<RetrievalEvent>,
        stop: Arc<AtomicBool>,
    ) -> Result<(mpsc::UnboundedSender<()>, JoinHandle<()>)> {
        let (trigger_tx, trigger_rx) = mpsc::unbounded_channel();
        let worker = Self {
            resolver,
            events,
            stop,
        };
        let handle = std::thread::Builder::new()
            .name("discovery-worker".to_string())
            .spawn(move || worker.run(trigger_rx))?;
        Ok((trigger_tx, handle))
    }

    fn run(self, mut triggers: mpsc::UnboundedReceiver<()>) {
        loop {
            if self.stop.load(Ordering::SeqCst) {
                break;
            }
            if triggers.blocking_recv().is_none() {
                break;
            }
            // Same rule as the expansion lane: a trigger buffered before
            // the flag went up is discarded
            if self.stop.load(Ordering::SeqCst) {
                break;
            }
            match self.resolver.discover_roots() {
                Ok(roots) => emit(&self.events, NodeBatch::roots(roots)),
                Err(err) => {
                    // No emission for a failed enumeration
                    warn!("service discovery failed: {err}");
                }
            }
        }
        info!("discovery worker stopped");
    }
}

fn emit(events: &mpsc::UnboundedSender<RetrievalEvent>, batch: NodeBatch) {
    if events.send(RetrievalEvent::NodesRetrieved(batch)).is_err() {
        warn!("event consumer is gone, dropping retrieved batch");
    }
}
