use std::{
    collections::{BTreeMap, HashMap},
    mem,
};

use log::debug;

use warrant_shared::{names, ConnectionId, Origin, PermissionResult, ServerMessage, Value};

use crate::{error::ServerError, permission::PermissionManager};

/// A server-wide plugin (sky, terrain, game mode) whose properties clients
/// may propose changes to.
pub struct ServerPlugin {
    plugin_type: String,
    properties: BTreeMap<String, Value>,
}

impl ServerPlugin {
    fn new(plugin_type: &str) -> Self {
        Self {
            plugin_type: plugin_type.to_string(),
            properties: BTreeMap::new(),
        }
    }

    pub fn plugin_type(&self) -> &str {
        &self.plugin_type
    }

    pub fn property(&self, name: &str) -> Option<&Value> {
        self.properties.get(name)
    }

    pub fn set_property(&mut self, name: &str, value: Value) {
        self.properties.insert(name.to_string(), value);
    }
}

#[derive(Default)]
pub struct PluginManager {
    plugins: HashMap<String, ServerPlugin>,
    outgoing: Vec<(ConnectionId, ServerMessage)>,
}

impl PluginManager {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_plugin(&mut self, plugin_type: &str) -> Result<&mut ServerPlugin, ServerError> {
        if self.plugins.contains_key(plugin_type) {
            return Err(ServerError::duplicate("Plugin", plugin_type));
        }
        Ok(self
            .plugins
            .entry(plugin_type.to_string())
            .or_insert_with(|| ServerPlugin::new(plugin_type)))
    }

    pub fn get_plugin(&self, plugin_type: &str) -> Result<&ServerPlugin, ServerError> {
        self.plugins
            .get(plugin_type)
            .ok_or_else(|| ServerError::not_found("Plugin", plugin_type))
    }

    pub fn get_plugin_mut(&mut self, plugin_type: &str) -> Result<&mut ServerPlugin, ServerError> {
        self.plugins
            .get_mut(plugin_type)
            .ok_or_else(|| ServerError::not_found("Plugin", plugin_type))
    }

    /// Client-proposed property change, gated by
    /// `SetPropertyOn<Plugin>Plugin_<Property>`.
    pub fn set_property(
        &mut self,
        permissions: &mut PermissionManager,
        origin: Origin,
        plugin_type: &str,
        property: &str,
        mut value: Value,
    ) -> Result<PermissionResult, ServerError> {
        self.get_plugin(plugin_type)?;

        let mut result = PermissionResult::Allowed;
        if let Some(connection) = origin.connection() {
            let permission = names::plugin_property(plugin_type, property);
            result = permissions.check_permission_value_throws(
                &connection,
                &permission,
                &mut value,
                "ServerPlugin::set_property",
            )?;
            if result == PermissionResult::BoundsAdjusted {
                debug!(
                    "{} on {} corrected to {} for {}",
                    property, plugin_type, value, connection
                );
                self.outgoing.push((
                    connection,
                    ServerMessage::PluginPropertyCorrection {
                        plugin_type: plugin_type.to_string(),
                        property: property.to_string(),
                        value: value.clone(),
                    },
                ));
            }
        }

        self.get_plugin_mut(plugin_type)?
            .set_property(property, value);
        Ok(result)
    }

    pub fn take_outgoing(&mut self) -> Vec<(ConnectionId, ServerMessage)> {
        mem::take(&mut self.outgoing)
    }
}
