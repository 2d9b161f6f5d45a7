use naia_serde::SerdeInternal;

use crate::{types::NetworkingType, value::value::Value};

/// Addresses one component: the owning object's network id and the
/// component type name. An object holds at most one component per type.
#[derive(Clone, Debug, PartialEq, Eq, Hash, SerdeInternal)]
pub struct ReplicaPath {
    pub object: u64,
    pub component_type: String,
}

impl ReplicaPath {
    pub fn new(object: u64, component_type: &str) -> Self {
        Self {
            object,
            component_type: component_type.to_string(),
        }
    }
}

/// A mutation proposed by a client. Every variant is gated by the server
/// authority layer before it touches replicated state.
#[derive(Clone, Debug, PartialEq, SerdeInternal)]
pub enum ClientRequest {
    CreateObject {
        name: String,
        networking_type: NetworkingType,
    },
    DestroyObject {
        object: u64,
    },
    CreateComponent {
        object: u64,
        component_type: String,
        networking_type: NetworkingType,
        local_override: bool,
    },
    DestroyComponent {
        path: ReplicaPath,
    },
    SetProperty {
        path: ReplicaPath,
        property: String,
        value: Value,
    },
    InsertValue {
        path: ReplicaPath,
        property: String,
        value: Value,
    },
    /// `parent: None` detaches the object.
    SetParent {
        object: u64,
        parent: Option<u64>,
    },
    SetPluginProperty {
        plugin_type: String,
        property: String,
        value: Value,
    },
}
