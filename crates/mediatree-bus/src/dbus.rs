//! Session-bus implementation of [`MediaBus`] using zbus
//!
//! All calls go through the blocking zbus API: the retrieval worker is a
//! plain thread that deliberately waits for each reply, one call in flight
//! at a time, so there is nothing to gain from async here.

use std::collections::HashMap;

use serde_json::{json, Value as JsonValue};
use zbus::blocking::{Connection, Proxy};
use zbus::zvariant::{OwnedValue, Value};

use mediatree_core::prelude::*;
use mediatree_core::{MediaNode, NAME_PROPERTY, PATH_PROPERTY, TYPE_PROPERTY};

use crate::client::{
    root_object_path, ChildEntry, MediaBus, MEDIA_CONTAINER_INTERFACE, MEDIA_ITEM_INTERFACE,
    MEDIA_OBJECT_INTERFACE, SERVICE_NAME_PREFIX,
};

const DBUS_SERVICE: &str = "org.freedesktop.DBus";
const DBUS_PATH: &str = "/org/freedesktop/DBus";
const PROPERTIES_INTERFACE: &str = "org.freedesktop.DBus.Properties";

/// [`MediaBus`] backed by the user's session bus.
///
/// Holds only the shared connection; every method builds an ad-hoc proxy
/// for the peer it addresses and keeps no state between calls.
#[derive(Debug, Clone)]
pub struct SessionBusClient {
    connection: Connection,
}

impl SessionBusClient {
    /// Connect to the session bus
    pub fn new() -> Result<Self> {
        let connection = Connection::session()
            .map_err(|e| Error::bus_connection(e.to_string()))?;
        Ok(Self { connection })
    }

    fn proxy<'a>(&'a self, service: &'a str, path: &'a str, interface: &'a str) -> Result<Proxy<'a>> {
        Proxy::new(&self.connection, service, path, interface)
            .map_err(|e| Error::remote_call(service, e.to_string()))
    }
}

impl MediaBus for SessionBusClient {
    fn list_services(&self) -> Result<Vec<String>> {
        let proxy = self.proxy(DBUS_SERVICE, DBUS_PATH, DBUS_SERVICE)?;
        let names: Vec<String> = proxy
            .call("ListNames", &())
            .map_err(|e: zbus::Error| Error::remote_call(DBUS_SERVICE, e.to_string()))?;

        Ok(names
            .into_iter()
            .filter(|name| name.starts_with(SERVICE_NAME_PREFIX))
            .collect())
    }

    fn root_display_name(&self, service: &str) -> Result<String> {
        let path = root_object_path(service);
        let proxy = self.proxy(service, &path, PROPERTIES_INTERFACE)?;
        let reply: OwnedValue = proxy
            .call("Get", &(MEDIA_OBJECT_INTERFACE, NAME_PROPERTY))
            .map_err(|e: zbus::Error| Error::remote_call(service, e.to_string()))?;

        value_to_json(&reply)
            .as_ref()
            .and_then(JsonValue::as_str)
            .map(str::to_owned)
            .ok_or_else(|| Error::remote_call(service, "DisplayName is not a string"))
    }

    fn list_children(&self, node: &MediaNode, max: u32) -> Result<Vec<ChildEntry>> {
        let proxy = self.proxy(&node.service, &node.object_path, MEDIA_CONTAINER_INTERFACE)?;
        let fields = vec![PATH_PROPERTY, TYPE_PROPERTY, NAME_PROPERTY];
        let rows: Vec<HashMap<String, OwnedValue>> = proxy
            .call("ListChildren", &(0u32, max, fields))
            .map_err(|e: zbus::Error| Error::remote_call(&node.service, e.to_string()))?;

        let mut entries = Vec::with_capacity(rows.len());
        for row in &rows {
            match parse_child_row(row) {
                Some(entry) => entries.push(entry),
                None => warn!(
                    "malformed ListChildren row from {} under {}, skipping",
                    node.service, node.object_path
                ),
            }
        }
        Ok(entries)
    }

    fn item_properties(&self, node: &MediaNode) -> Result<HashMap<String, JsonValue>> {
        let proxy = self.proxy(&node.service, &node.object_path, PROPERTIES_INTERFACE)?;
        let reply: HashMap<String, OwnedValue> = proxy
            .call("GetAll", &(MEDIA_ITEM_INTERFACE,))
            .map_err(|e: zbus::Error| Error::remote_call(&node.service, e.to_string()))?;

        Ok(reply
            .iter()
            .filter_map(|(key, value)| value_to_json(value).map(|v| (key.clone(), v)))
            .collect())
    }
}

/// Extract the three node-construction fields from one `ListChildren` row
fn parse_child_row(row: &HashMap<String, OwnedValue>) -> Option<ChildEntry> {
    let string_field = |key: &str| -> Option<String> {
        value_to_json(row.get(key)?)
            .as_ref()
            .and_then(JsonValue::as_str)
            .map(str::to_owned)
    };
    Some(ChildEntry {
        display_name: string_field(NAME_PROPERTY)?,
        path: string_field(PATH_PROPERTY)?,
        type_name: string_field(TYPE_PROPERTY)?,
    })
}

/// Convert a D-Bus value into JSON for the node property bag.
///
/// Strings, numbers, booleans, object paths and arrays thereof cover
/// everything MediaServer2 item properties carry; anything else
/// (dicts, structs, file descriptors) yields `None` and is dropped.
fn value_to_json(value: &Value<'_>) -> Option<JsonValue> {
    match value {
        Value::Bool(b) => Some(json!(b)),
        Value::U8(n) => Some(json!(n)),
        Value::I16(n) => Some(json!(n)),
        Value::U16(n) => Some(json!(n)),
        Value::I32(n) => Some(json!(n)),
        Value::U32(n) => Some(json!(n)),
        Value::I64(n) => Some(json!(n)),
        Value::U64(n) => Some(json!(n)),
        Value::F64(n) => Some(json!(n)),
        Value::Str(s) => Some(json!(s.as_str())),
        Value::ObjectPath(p) => Some(json!(p.as_str())),
        // A variant wraps one inner value
        Value::Value(inner) => value_to_json(inner),
        Value::Array(items) => {
            let converted: Vec<JsonValue> =
                items.iter().filter_map(value_to_json).collect();
            Some(JsonValue::Array(converted))
        }
        _ => None,
    }
}
