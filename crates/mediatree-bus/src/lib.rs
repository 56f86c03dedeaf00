//! # mediatree-bus - Session-Bus Access
//!
//! Everything that talks to the message bus lives here: the [`MediaBus`]
//! contract the engine calls through, the zbus session-bus implementation,
//! and the [`ServiceResolver`] that turns advertised peers into root nodes.
//!
//! ## Public API
//!
//! - [`MediaBus`] - stateless façade over the MediaServer2 RPC calls
//! - [`SessionBusClient`] - blocking zbus implementation of [`MediaBus`]
//! - [`ServiceResolver`] - peer enumeration, one root node per healthy peer
//! - [`ChildEntry`] - one row of a `ListChildren` reply
//!
//! Enable the `test-helpers` feature for [`test_utils::ScriptedBus`], an
//! in-memory scripted bus for engine and consumer tests.

pub mod client;
pub mod dbus;
pub mod resolver;

#[cfg(any(test, feature = "test-helpers"))]
pub mod test_utils;

pub use client::{
    root_object_path, ChildEntry, MediaBus, MEDIA_CONTAINER_INTERFACE, MEDIA_ITEM_INTERFACE,
    MEDIA_OBJECT_INTERFACE, OBJECT_PATH_PREFIX, SERVICE_NAME_PREFIX,
};
pub use dbus::SessionBusClient;
pub use resolver::ServiceResolver;
