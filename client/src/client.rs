use std::mem;

use log::{debug, info};

use warrant_shared::{
    BitReader, BitWrite, ClientRequest, ReplicaPath, Serde, ServerMessage, Value,
};

use crate::{
    client_config::ClientConfig, error::ClientError, permission_manager::PermissionManager,
};

#[derive(Clone, Debug, PartialEq)]
pub enum ClientEvent {
    /// The server sent this client's permission table.
    Permissions,
    ObjectCreated {
        object: u64,
        name: String,
    },
    /// The server clamped a proposed property value and stored `value`.
    PropertyCorrected {
        path: ReplicaPath,
        property: String,
        value: Value,
    },
    PluginPropertyCorrected {
        plugin_type: String,
        property: String,
        value: Value,
    },
}

/// Decodes server messages into [`ClientEvent`]s and keeps the local
/// permission table current.
pub struct Client {
    permissions: PermissionManager,
    events: Vec<ClientEvent>,
}

impl Client {
    /// Create a new Client
    pub fn new(config: ClientConfig) -> Self {
        Self {
            permissions: PermissionManager::new(&config),
            events: Vec::new(),
        }
    }

    pub fn receive_message(&mut self, reader: &mut BitReader) -> Result<(), ClientError> {
        let message = ServerMessage::de(reader).map_err(|_| ClientError::MalformedMessage)?;
        self.handle_message(message);
        Ok(())
    }

    pub fn handle_message(&mut self, message: ServerMessage) {
        let event = match message {
            ServerMessage::Permissions(permissions) => {
                info!("Received {} permissions", permissions.len());
                self.permissions.set_permissions(permissions);
                ClientEvent::Permissions
            }
            ServerMessage::ObjectCreated { object, name } => {
                ClientEvent::ObjectCreated { object, name }
            }
            ServerMessage::PropertyCorrection {
                path,
                property,
                value,
            } => {
                debug!("Server corrected {} to {}", property, value);
                ClientEvent::PropertyCorrected {
                    path,
                    property,
                    value,
                }
            }
            ServerMessage::PluginPropertyCorrection {
                plugin_type,
                property,
                value,
            } => {
                debug!("Server corrected {} on {} to {}", property, plugin_type, value);
                ClientEvent::PluginPropertyCorrected {
                    plugin_type,
                    property,
                    value,
                }
            }
        };
        self.events.push(event);
    }

    /// Writes `request` for sending to the server.
    pub fn write_request(&self, request: &ClientRequest, writer: &mut dyn BitWrite) {
        request.ser(writer);
    }

    pub fn take_events(&mut self) -> Vec<ClientEvent> {
        mem::take(&mut self.events)
    }

    pub fn permissions(&self) -> &PermissionManager {
        &self.permissions
    }

    pub fn permissions_mut(&mut self) -> &mut PermissionManager {
        &mut self.permissions
    }
}
