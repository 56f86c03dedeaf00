//! Discovery of advertised MediaServer2 peers

use std::sync::Arc;

use mediatree_core::prelude::*;
use mediatree_core::MediaNode;

use crate::client::{root_object_path, MediaBus};

/// Enumerates currently-advertised peer services and materializes each as
/// a root container node.
#[derive(Clone)]
pub struct ServiceResolver {
    bus: Arc<dyn MediaBus>,
}

impl ServiceResolver {
    pub fn new(bus: Arc<dyn MediaBus>) -> Self {
        Self { bus }
    }

    /// One root node per peer that answers its `DisplayName` fetch.
    ///
    /// An unreachable peer is logged and skipped; it never aborts discovery
    /// of the others. Result order follows enumeration order, which the bus
    /// does not guarantee to be stable across calls. A failing service
    /// enumeration propagates to the caller.
    pub fn discover_roots(&self) -> Result<Vec<MediaNode>> {
        let services = self.bus.list_services()?;
        debug!("found {} media server service(s) on the bus", services.len());

        let mut roots = Vec::with_capacity(services.len());
        for service in services {
            match self.bus.root_display_name(&service) {
                Ok(name) => {
                    let path = root_object_path(&service);
                    roots.push(MediaNode::root(name, service, path));
                }
                Err(err) => {
                    warn!("skipping unreachable media server {service}: {err}");
                }
            }
        }

        info!("discovered {} media server root(s)", roots.len());
        Ok(roots)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::ScriptedBus;
    use mediatree_core::NodeKind;

    #[test]
    fn test_discover_roots_one_per_healthy_peer() {
        let bus = ScriptedBus::new()
            .with_service("org.gnome.UPnP.MediaServer2.Foo", "Foo")
            .with_service("org.gnome.UPnP.MediaServer2.Bar", "Bar Media");
        let resolver = ServiceResolver::new(Arc::new(bus));

        let roots = resolver.discover_roots().unwrap();

        assert_eq!(roots.len(), 2);
        assert_eq!(roots[0].display_name, "Foo");
        assert_eq!(roots[0].service, "org.gnome.UPnP.MediaServer2.Foo");
        assert_eq!(roots[0].object_path, "/org/gnome/UPnP/MediaServer2/Foo");
        assert_eq!(roots[0].kind, NodeKind::Container);
        assert!(roots[0].parent.is_none());
        assert_eq!(roots[1].display_name, "Bar Media");
    }

    #[test]
    fn test_discover_roots_skips_failing_peer() {
        // One unreachable peer must never suppress another's root
        let bus = ScriptedBus::new()
            .with_failing_service("org.gnome.UPnP.MediaServer2.Dead")
            .with_service("org.gnome.UPnP.MediaServer2.Alive", "Alive");
        let resolver = ServiceResolver::new(Arc::new(bus));

        let roots = resolver.discover_roots().unwrap();

        assert_eq!(roots.len(), 1);
        assert_eq!(roots[0].display_name, "Alive");
    }

    #[test]
    fn test_discover_roots_empty_bus() {
        let resolver = ServiceResolver::new(Arc::new(ScriptedBus::new()));
        let roots = resolver.discover_roots().unwrap();
        assert!(roots.is_empty());
    }

    #[test]
    fn test_discover_roots_propagates_enumeration_failure() {
        let resolver = ServiceResolver::new(Arc::new(ScriptedBus::unreachable()));
        assert!(resolver.discover_roots().is_err());
    }

    #[test]
    fn test_discover_roots_preserves_enumeration_order() {
        let bus = ScriptedBus::new()
            .with_service("org.gnome.UPnP.MediaServer2.C", "C")
            .with_service("org.gnome.UPnP.MediaServer2.A", "A")
            .with_service("org.gnome.UPnP.MediaServer2.B", "B");
        let resolver = ServiceResolver::new(Arc::new(bus));

        let names: Vec<_> = resolver
            .discover_roots()
            .unwrap()
            .into_iter()
            .map(|n| n.display_name)
            .collect();

        // No stable sort is imposed; order follows enumeration
        assert_eq!(names, vec!["C", "A", "B"]);
    }
}
