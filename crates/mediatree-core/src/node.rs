//! In-memory representation of remote MediaServer2 objects

use std::collections::HashMap;
use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Remote `Type` property value for containers
pub const CONTAINER_TYPE: &str = "container";
/// Remote `Type` property value for audio items
pub const AUDIO_TYPE: &str = "audio";
/// Remote `Type` property value for video items
pub const VIDEO_TYPE: &str = "video";

/// `DisplayName` property key
pub const NAME_PROPERTY: &str = "DisplayName";
/// `Path` property key
pub const PATH_PROPERTY: &str = "Path";
/// `Type` property key
pub const TYPE_PROPERTY: &str = "Type";
/// `URLs` property key (sequence of strings; the first is the item location)
pub const URLS_PROPERTY: &str = "URLs";
/// `Artist` property key
pub const ARTIST_PROPERTY: &str = "Artist";
/// `Album` property key
pub const ALBUM_PROPERTY: &str = "Album";
/// `Duration` property key (seconds)
pub const DURATION_PROPERTY: &str = "Duration";

/// The item properties copied from a bulk fetch into a node's property map.
///
/// Everything else the peer reports is ignored.
pub const TRACKED_ITEM_PROPERTIES: &[&str] = &[
    URLS_PROPERTY,
    ARTIST_PROPERTY,
    ALBUM_PROPERTY,
    DURATION_PROPERTY,
];

/// Children fetched per `ListChildren` call. Only the first page is
/// requested; containers larger than this are silently capped.
pub const DEFAULT_MAX_CHILDREN: u32 = 50;

/// What kind of remote object a node denotes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum NodeKind {
    Container,
    Audio,
    Video,
}

impl NodeKind {
    /// Map a remote `Type` string to a kind.
    ///
    /// Returns `None` for type strings this engine does not model
    /// (e.g. `music`, `image`); callers skip such children.
    pub fn from_remote(type_name: &str) -> Option<Self> {
        match type_name {
            CONTAINER_TYPE => Some(NodeKind::Container),
            AUDIO_TYPE => Some(NodeKind::Audio),
            VIDEO_TYPE => Some(NodeKind::Video),
            _ => None,
        }
    }

    pub fn is_container(&self) -> bool {
        matches!(self, NodeKind::Container)
    }
}

impl fmt::Display for NodeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            NodeKind::Container => CONTAINER_TYPE,
            NodeKind::Audio => AUDIO_TYPE,
            NodeKind::Video => VIDEO_TYPE,
        };
        write!(f, "{name}")
    }
}

/// Opaque handle into the consumer's tree structure.
///
/// The engine threads slot ids through requests and results so a batch can
/// be attributed to the right insertion point; it never interprets them.
/// Allocation and the `SlotId -> position` table belong to the consumer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SlotId(pub u64);

impl fmt::Display for SlotId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "slot#{}", self.0)
    }
}

/// One remote object (container or leaf item) with its fetched properties.
///
/// Created exactly once, when a peer first reports the object. Immutable
/// after creation except for `properties`, which is populated at most once
/// before the node is published to the consumer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MediaNode {
    /// Human-readable name reported by the peer
    pub display_name: String,

    /// Well-known bus name of the peer that owns this object
    pub service: String,

    /// Object path within that peer
    pub object_path: String,

    pub kind: NodeKind,

    /// Slot of the consumer-side parent this node belongs under;
    /// `None` for roots. Back-reference only, never used for traversal.
    pub parent: Option<SlotId>,

    /// Tracked item properties; empty for containers
    pub properties: HashMap<String, Value>,
}

impl MediaNode {
    /// A root container node for one peer's exposed tree
    pub fn root(
        display_name: impl Into<String>,
        service: impl Into<String>,
        object_path: impl Into<String>,
    ) -> Self {
        Self {
            display_name: display_name.into(),
            service: service.into(),
            object_path: object_path.into(),
            kind: NodeKind::Container,
            parent: None,
            properties: HashMap::new(),
        }
    }

    /// A child node reported by a listing call
    pub fn child(
        display_name: impl Into<String>,
        service: impl Into<String>,
        object_path: impl Into<String>,
        kind: NodeKind,
        parent: SlotId,
    ) -> Self {
        Self {
            display_name: display_name.into(),
            service: service.into(),
            object_path: object_path.into(),
            kind,
            parent: Some(parent),
            properties: HashMap::new(),
        }
    }

    /// Two nodes denote the same remote object iff service and path match.
    /// Display name and properties are not part of identity.
    pub fn same_object(&self, other: &MediaNode) -> bool {
        self.service == other.service && self.object_path == other.object_path
    }

    /// First entry of the `URLs` property, if fetched.
    ///
    /// Downstream library import uses this as the unique entry location.
    pub fn primary_url(&self) -> Option<&str> {
        self.properties
            .get(URLS_PROPERTY)?
            .as_array()?
            .first()?
            .as_str()
    }

    /// `Artist` property, if fetched
    pub fn artist(&self) -> Option<&str> {
        self.properties.get(ARTIST_PROPERTY)?.as_str()
    }

    /// `Album` property, if fetched
    pub fn album(&self) -> Option<&str> {
        self.properties.get(ALBUM_PROPERTY)?.as_str()
    }

    /// `Duration` property in seconds, if fetched
    pub fn duration_secs(&self) -> Option<i64> {
        self.properties.get(DURATION_PROPERTY)?.as_i64()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_kind_from_remote() {
        assert_eq!(NodeKind::from_remote("container"), Some(NodeKind::Container));
        assert_eq!(NodeKind::from_remote("audio"), Some(NodeKind::Audio));
        assert_eq!(NodeKind::from_remote("video"), Some(NodeKind::Video));
        assert_eq!(NodeKind::from_remote("music"), None);
        assert_eq!(NodeKind::from_remote(""), None);
        assert_eq!(NodeKind::from_remote("Container"), None);
    }

    #[test]
    fn test_kind_display_round_trips() {
        for kind in [NodeKind::Container, NodeKind::Audio, NodeKind::Video] {
            assert_eq!(NodeKind::from_remote(&kind.to_string()), Some(kind));
        }
    }

    #[test]
    fn test_root_node() {
        let node = MediaNode::root(
            "Foo",
            "org.gnome.UPnP.MediaServer2.Foo",
            "/org/gnome/UPnP/MediaServer2/Foo",
        );
        assert_eq!(node.display_name, "Foo");
        assert!(node.kind.is_container());
        assert!(node.parent.is_none());
        assert!(node.properties.is_empty());
    }

    #[test]
    fn test_identity_ignores_name_and_properties() {
        let a = MediaNode::root("Old Name", "svc", "/path");
        let mut b = MediaNode::root("New Name", "svc", "/path");
        b.properties
            .insert(ARTIST_PROPERTY.to_string(), json!("Someone"));
        assert!(a.same_object(&b));

        let c = MediaNode::root("Old Name", "svc", "/other");
        assert!(!a.same_object(&c));
        let d = MediaNode::root("Old Name", "other-svc", "/path");
        assert!(!a.same_object(&d));
    }

    #[test]
    fn test_property_accessors() {
        let mut node = MediaNode::child("Song", "svc", "/1", NodeKind::Audio, SlotId(7));
        node.properties
            .insert(URLS_PROPERTY.to_string(), json!(["file:///a.mp3"]));
        node.properties
            .insert(ARTIST_PROPERTY.to_string(), json!("X"));
        node.properties
            .insert(ALBUM_PROPERTY.to_string(), json!("Y"));
        node.properties
            .insert(DURATION_PROPERTY.to_string(), json!(120));

        assert_eq!(node.primary_url(), Some("file:///a.mp3"));
        assert_eq!(node.artist(), Some("X"));
        assert_eq!(node.album(), Some("Y"));
        assert_eq!(node.duration_secs(), Some(120));
        assert_eq!(node.parent, Some(SlotId(7)));
    }

    #[test]
    fn test_property_accessors_absent() {
        let node = MediaNode::child("Song", "svc", "/1", NodeKind::Audio, SlotId(0));
        assert_eq!(node.primary_url(), None);
        assert_eq!(node.artist(), None);
        assert_eq!(node.duration_secs(), None);
    }

    #[test]
    fn test_primary_url_empty_list() {
        let mut node = MediaNode::child("Song", "svc", "/1", NodeKind::Audio, SlotId(0));
        node.properties.insert(URLS_PROPERTY.to_string(), json!([]));
        assert_eq!(node.primary_url(), None);
    }

    #[test]
    fn test_slot_id_display() {
        assert_eq!(SlotId(42).to_string(), "slot#42");
    }
}
