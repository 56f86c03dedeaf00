//! Engine-to-consumer event definitions

use serde::{Deserialize, Serialize};

use crate::node::{MediaNode, SlotId};

/// The ordered set of nodes produced by one discovery or expansion step.
///
/// `parent` is `None` for a batch of discovered roots and `Some` for the
/// children of an expanded container. A batch may be empty (a container
/// that listed successfully but yielded no usable children).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NodeBatch {
    pub nodes: Vec<MediaNode>,
    pub parent: Option<SlotId>,
}

impl NodeBatch {
    pub fn roots(nodes: Vec<MediaNode>) -> Self {
        Self {
            nodes,
            parent: None,
        }
    }

    pub fn children(nodes: Vec<MediaNode>, parent: SlotId) -> Self {
        Self {
            nodes,
            parent: Some(parent),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }
}

/// The sole event surface toward the consumer.
///
/// Exactly one event is emitted per discovery or expansion trigger that did
/// not hard-fail before its remote calls; a failed service enumeration or
/// child listing yields no event at all (the failure is only logged).
#[derive(Debug, Clone, PartialEq)]
pub enum RetrievalEvent {
    NodesRetrieved(NodeBatch),
}

impl RetrievalEvent {
    pub fn batch(&self) -> &NodeBatch {
        match self {
            RetrievalEvent::NodesRetrieved(batch) => batch,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::node::MediaNode;

    #[test]
    fn test_root_batch_has_no_parent() {
        let batch = NodeBatch::roots(vec![MediaNode::root("Foo", "svc", "/path")]);
        assert!(batch.parent.is_none());
        assert_eq!(batch.nodes.len(), 1);
    }

    #[test]
    fn test_child_batch_carries_parent() {
        let batch = NodeBatch::children(vec![], SlotId(3));
        assert_eq!(batch.parent, Some(SlotId(3)));
        assert!(batch.is_empty());
    }

    #[test]
    fn test_event_batch_accessor() {
        let event = RetrievalEvent::NodesRetrieved(NodeBatch::roots(vec![]));
        assert!(event.batch().is_empty());
    }
}
