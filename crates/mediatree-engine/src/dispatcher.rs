//! Public façade of the retrieval engine

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread::JoinHandle;

use tokio::sync::mpsc;

use mediatree_bus::{MediaBus, ServiceResolver};
use mediatree_core::prelude::*;
use mediatree_core::{MediaNode, RetrievalEvent, SlotId, DEFAULT_MAX_CHILDREN};

use crate::worker::{DiscoveryWorker, ExpandRequest, RetrievalWorker};

/// Owns the engine's two worker lanes and forwards requests into them.
///
/// All methods return immediately; retrieved batches arrive on the event
/// receiver handed out by [`spawn`](Self::spawn), which the consumer's own
/// event loop drains. Dropping the dispatcher shuts the engine down.
pub struct RetrievalDispatcher {
    expand_tx: Option<mpsc::UnboundedSender<ExpandRequest>>,
    discover_tx: Option<mpsc::UnboundedSender<()>>,
    stop: Arc<AtomicBool>,
    worker_handle: Option<JoinHandle<()>>,
    discovery_handle: Option<JoinHandle<()>>,
}

impl RetrievalDispatcher {
    /// Start both worker lanes against the given bus.
    ///
    /// Returns the dispatcher and the receive side of the event channel.
    pub fn spawn(
        bus: Arc<dyn MediaBus>,
        max_children: u32,
    ) -> Result<(Self, mpsc::UnboundedReceiver<RetrievalEvent>)> {
        let (event_tx, event_rx) = mpsc::unbounded_channel();
        let stop = Arc::new(AtomicBool::new(false));

        let (expand_tx, worker_handle) =
            RetrievalWorker::spawn(bus.clone(), event_tx.clone(), stop.clone(), max_children)?;
        let (discover_tx, discovery_handle) =
            DiscoveryWorker::spawn(ServiceResolver::new(bus), event_tx, stop.clone())?;

        Ok((
            Self {
                expand_tx: Some(expand_tx),
                discover_tx: Some(discover_tx),
                stop,
                worker_handle: Some(worker_handle),
                discovery_handle: Some(discovery_handle),
            },
            event_rx,
        ))
    }

    /// Spawn with the default 50-children-per-listing cap
    pub fn spawn_default(
        bus: Arc<dyn MediaBus>,
    ) -> Result<(Self, mpsc::UnboundedReceiver<RetrievalEvent>)> {
        Self::spawn(bus, DEFAULT_MAX_CHILDREN)
    }

    /// Trigger a root-discovery run on the discovery lane.
    ///
    /// Emits one `NodesRetrieved` event with `parent = None` when the
    /// service enumeration succeeds (the batch may be empty); a failed
    /// enumeration is logged and emits nothing.
    pub fn discover_roots(&self) -> Result<()> {
        if self.is_stopped() {
            return Err(Error::EngineStopped);
        }
        self.discover_tx
            .as_ref()
            .ok_or(Error::EngineStopped)?
            .send(())
            .map_err(|_| Error::EngineStopped)
    }

    /// Enqueue a container expansion. Never blocks the caller.
    ///
    /// Requests are serviced strictly in enqueue order, one at a time.
    pub fn expand(&self, node: MediaNode, slot: SlotId) -> Result<()> {
        if self.is_stopped() {
            return Err(Error::EngineStopped);
        }
        trace!("enqueueing expansion of {} for {slot}", node.display_name);
        self.expand_tx
            .as_ref()
            .ok_or(Error::EngineStopped)?
            .send(ExpandRequest { node, slot })
            .map_err(|_| Error::EngineStopped)
    }

    /// Stop both lanes. Idempotent.
    ///
    /// Queued-but-unstarted requests are discarded; an expansion already
    /// in flight runs to completion and may still emit its batch. After
    /// this returns, [`expand`](Self::expand) and
    /// [`discover_roots`](Self::discover_roots) fail with
    /// [`Error::EngineStopped`].
    pub fn shutdown(&mut self) {
        if self.stop.swap(true, Ordering::SeqCst) {
            return;
        }
        info!("shutting down retrieval engine");
        // Closing the queues wakes the workers out of their idle wait
        self.expand_tx = None;
        self.discover_tx = None;
    }

    /// Whether shutdown has been requested
    pub fn is_stopped(&self) -> bool {
        self.stop.load(Ordering::SeqCst)
    }

    /// Block until both worker threads have exited.
    ///
    /// Only meaningful after [`shutdown`](Self::shutdown); used by tests
    /// and by consumers that want a quiescent engine before exiting.
    pub fn join(&mut self) {
        for handle in [self.worker_handle.take(), self.discovery_handle.take()]
            .into_iter()
            .flatten()
        {
            if handle.join().is_err() {
                error!("retrieval engine worker thread panicked");
            }
        }
    }
}

impl Drop for RetrievalDispatcher {
    fn drop(&mut self) {
        self.shutdown();
    }
}
