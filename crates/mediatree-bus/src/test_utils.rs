//! Test utilities for bus-facing code
//!
//! Provides [`ScriptedBus`], an in-memory [`MediaBus`] whose replies are
//! scripted per service and per object, plus a call log for ordering
//! assertions in engine tests.

use std::collections::HashMap;
use std::sync::Mutex;

use serde_json::{json, Value};

use mediatree_core::error::{Error, Result};
use mediatree_core::MediaNode;

use crate::client::{root_object_path, ChildEntry, MediaBus};

/// In-memory scripted implementation of [`MediaBus`].
///
/// Services are registered with [`with_service`](Self::with_service) /
/// [`with_failing_service`](Self::with_failing_service); containers and
/// items are scripted by object path. Any listing or property fetch that
/// was not scripted fails with a remote-call error, which mirrors a peer
/// that errors on an unknown object.
pub struct ScriptedBus {
    reachable: bool,
    services: Vec<String>,
    roots: HashMap<String, Option<String>>,
    children: HashMap<(String, String), Option<Vec<ChildEntry>>>,
    properties: HashMap<(String, String), Option<HashMap<String, Value>>>,
    calls: Mutex<Vec<String>>,
}

impl ScriptedBus {
    /// An empty, reachable bus with no registered services
    pub fn new() -> Self {
        Self {
            reachable: true,
            services: Vec::new(),
            roots: HashMap::new(),
            children: HashMap::new(),
            properties: HashMap::new(),
            calls: Mutex::new(Vec::new()),
        }
    }

    /// A bus whose service enumeration itself fails
    pub fn unreachable() -> Self {
        let mut bus = Self::new();
        bus.reachable = false;
        bus
    }

    /// Register a service whose root answers with `root_name`
    pub fn with_service(mut self, service: &str, root_name: &str) -> Self {
        self.services.push(service.to_string());
        self.roots
            .insert(service.to_string(), Some(root_name.to_string()));
        self
    }

    /// Register a service whose root name fetch fails
    pub fn with_failing_service(mut self, service: &str) -> Self {
        self.services.push(service.to_string());
        self.roots.insert(service.to_string(), None);
        self
    }

    /// Script the child listing of one container
    pub fn with_children(mut self, service: &str, path: &str, entries: Vec<ChildEntry>) -> Self {
        self.children
            .insert((service.to_string(), path.to_string()), Some(entries));
        self
    }

    /// Script a failing child listing for one container
    pub fn with_failing_listing(mut self, service: &str, path: &str) -> Self {
        self.children
            .insert((service.to_string(), path.to_string()), None);
        self
    }

    /// Script the bulk property reply of one item
    pub fn with_item_properties(
        mut self,
        service: &str,
        path: &str,
        properties: HashMap<String, Value>,
    ) -> Self {
        self.properties
            .insert((service.to_string(), path.to_string()), Some(properties));
        self
    }

    /// Script a failing property fetch for one item
    pub fn with_failing_item(mut self, service: &str, path: &str) -> Self {
        self.properties
            .insert((service.to_string(), path.to_string()), None);
        self
    }

    /// Every call made so far, in order, as `"method service path"` strings
    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    fn record(&self, call: String) {
        self.calls.lock().unwrap().push(call);
    }
}

impl Default for ScriptedBus {
    fn default() -> Self {
        Self::new()
    }
}

impl MediaBus for ScriptedBus {
    fn list_services(&self) -> Result<Vec<String>> {
        self.record("ListNames".to_string());
        if !self.reachable {
            return Err(Error::remote_call("org.freedesktop.DBus", "scripted failure"));
        }
        Ok(self.services.clone())
    }

    fn root_display_name(&self, service: &str) -> Result<String> {
        self.record(format!("Get {service} {}", root_object_path(service)));
        match self.roots.get(service) {
            Some(Some(name)) => Ok(name.clone()),
            _ => Err(Error::remote_call(service, "scripted failure")),
        }
    }

    fn list_children(&self, node: &MediaNode, _max: u32) -> Result<Vec<ChildEntry>> {
        self.record(format!("ListChildren {} {}", node.service, node.object_path));
        let key = (node.service.clone(), node.object_path.clone());
        match self.children.get(&key) {
            Some(Some(entries)) => Ok(entries.clone()),
            _ => Err(Error::remote_call(&node.service, "scripted failure")),
        }
    }

    fn item_properties(&self, node: &MediaNode) -> Result<HashMap<String, Value>> {
        self.record(format!("GetAll {} {}", node.service, node.object_path));
        let key = (node.service.clone(), node.object_path.clone());
        match self.properties.get(&key) {
            Some(Some(properties)) => Ok(properties.clone()),
            _ => Err(Error::remote_call(&node.service, "scripted failure")),
        }
    }
}

/// Standard item property reply with all four tracked fields
pub fn audio_properties(url: &str, artist: &str, album: &str, duration: i64) -> HashMap<String, Value> {
    HashMap::from([
        ("URLs".to_string(), json!([url])),
        ("Artist".to_string(), json!(artist)),
        ("Album".to_string(), json!(album)),
        ("Duration".to_string(), json!(duration)),
    ])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scripted_bus_records_calls() {
        let bus = ScriptedBus::new().with_service("org.gnome.UPnP.MediaServer2.Foo", "Foo");
        bus.list_services().unwrap();
        bus.root_display_name("org.gnome.UPnP.MediaServer2.Foo")
            .unwrap();

        let calls = bus.calls();
        assert_eq!(calls.len(), 2);
        assert_eq!(calls[0], "ListNames");
        assert!(calls[1].starts_with("Get org.gnome.UPnP.MediaServer2.Foo"));
    }

    #[test]
    fn test_unscripted_listing_fails() {
        let bus = ScriptedBus::new();
        let node = MediaNode::root("Foo", "svc", "/path");
        assert!(bus.list_children(&node, 50).is_err());
        assert!(bus.item_properties(&node).is_err());
    }

    #[test]
    fn test_audio_properties_shape() {
        let props = audio_properties("file:///a.mp3", "X", "Y", 120);
        assert_eq!(props.len(), 4);
        assert_eq!(props["URLs"], json!(["file:///a.mp3"]));
        assert_eq!(props["Duration"], json!(120));
    }
}
