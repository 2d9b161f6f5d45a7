use naia_serde::SerdeInternal;

use crate::{
    messages::client_request::ReplicaPath, permission::permission_set::PermissionSet,
    value::value::Value,
};

/// Messages the server sends to a single client.
#[derive(Clone, Debug, PartialEq, SerdeInternal)]
pub enum ServerMessage {
    /// The receiving connection's capability envelope, sent once as part of
    /// the construction handshake. Policies only, never counters.
    Permissions(PermissionSet),
    /// A client-created object was accepted under `object`.
    ObjectCreated { object: u64, name: String },
    /// A proposed value was clamped; `value` is what the server stored.
    PropertyCorrection {
        path: ReplicaPath,
        property: String,
        value: Value,
    },
    PluginPropertyCorrection {
        plugin_type: String,
        property: String,
        value: Value,
    },
}
