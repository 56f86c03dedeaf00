//! The MediaServer2 bus contract
//!
//! [`MediaBus`] is the seam between the retrieval engine and the message
//! bus: every remote call the engine makes goes through it. The production
//! implementation is [`crate::SessionBusClient`]; tests script one instead.

use std::collections::HashMap;

use serde_json::Value;

use mediatree_core::prelude::*;
use mediatree_core::MediaNode;

/// Well-known bus name prefix under which MediaServer2 peers register
pub const SERVICE_NAME_PREFIX: &str = "org.gnome.UPnP.MediaServer2.";
/// Object path prefix of each peer's root object
pub const OBJECT_PATH_PREFIX: &str = "/org/gnome/UPnP/MediaServer2/";

/// Interface carrying `DisplayName`, `Type`, `Path` on every object
pub const MEDIA_OBJECT_INTERFACE: &str = "org.gnome.UPnP.MediaObject2";
/// Interface carrying `ListChildren` on containers
pub const MEDIA_CONTAINER_INTERFACE: &str = "org.gnome.UPnP.MediaContainer2";
/// Interface carrying item metadata (`URLs`, `Artist`, `Album`, `Duration`)
pub const MEDIA_ITEM_INTERFACE: &str = "org.gnome.UPnP.MediaItem2";

/// One row of a `ListChildren` reply: the three fields needed to build a
/// node. The remote `Type` string is kept raw; kind mapping (and skipping
/// of unsupported types) happens in the worker.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChildEntry {
    pub display_name: String,
    pub path: String,
    pub type_name: String,
}

impl ChildEntry {
    pub fn new(
        display_name: impl Into<String>,
        path: impl Into<String>,
        type_name: impl Into<String>,
    ) -> Self {
        Self {
            display_name: display_name.into(),
            path: path.into(),
            type_name: type_name.into(),
        }
    }
}

/// Stateless façade over the bus RPC calls the engine needs.
///
/// Implementations hold no mutable state between calls and surface every
/// transport or protocol failure as [`Error::RemoteCall`], which callers
/// treat as recoverable. Calls block until the transport's default timeout;
/// no additional timeout or retry is layered on top.
pub trait MediaBus: Send + Sync {
    /// All currently-registered bus names under [`SERVICE_NAME_PREFIX`].
    /// No ordering guarantee; may be empty.
    fn list_services(&self) -> Result<Vec<String>>;

    /// `DisplayName` of the root object of one peer service
    fn root_display_name(&self, service: &str) -> Result<String>;

    /// Up to `max` direct children of a container, first page only,
    /// requesting only the three fields needed for node construction
    fn list_children(&self, node: &MediaNode, max: u32) -> Result<Vec<ChildEntry>>;

    /// Bulk-fetch all properties of a leaf item's interface in one call.
    /// The engine selects the tracked subset afterwards.
    fn item_properties(&self, node: &MediaNode) -> Result<HashMap<String, Value>>;
}

/// Derive the root object path of a service from its bus name.
///
/// `org.gnome.UPnP.MediaServer2.Foo` exposes its root at
/// `/org/gnome/UPnP/MediaServer2/Foo`.
pub fn root_object_path(service: &str) -> String {
    let suffix = service.rsplit('.').next().unwrap_or(service);
    format!("{OBJECT_PATH_PREFIX}{suffix}")
}
