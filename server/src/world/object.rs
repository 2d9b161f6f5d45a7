use std::collections::BTreeMap;

use warrant_shared::{NetworkingType, Origin};

use crate::world::{component::ServerComponent, replica::ObjectKey};

pub struct ServerObject {
    key: ObjectKey,
    name: String,
    origin: Origin,
    networking_type: NetworkingType,
    parent: Option<ObjectKey>,
    components: BTreeMap<String, ServerComponent>,
    pub(crate) counted: Option<String>,
}

impl ServerObject {
    pub(crate) fn new(
        key: ObjectKey,
        name: &str,
        origin: Origin,
        networking_type: NetworkingType,
    ) -> Self {
        Self {
            key,
            name: name.to_string(),
            origin,
            networking_type,
            parent: None,
            components: BTreeMap::new(),
            counted: None,
        }
    }

    pub fn key(&self) -> ObjectKey {
        self.key
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Who created the object. Ownership checks compare against this.
    pub fn origin(&self) -> Origin {
        self.origin
    }

    pub fn networking_type(&self) -> NetworkingType {
        self.networking_type
    }

    pub(crate) fn set_networking_type(&mut self, networking_type: NetworkingType) {
        self.networking_type = networking_type;
    }

    pub fn parent(&self) -> Option<ObjectKey> {
        self.parent
    }

    pub(crate) fn set_parent(&mut self, parent: Option<ObjectKey>) {
        self.parent = parent;
    }

    pub fn component(&self, component_type: &str) -> Option<&ServerComponent> {
        self.components.get(component_type)
    }

    pub(crate) fn component_mut(&mut self, component_type: &str) -> Option<&mut ServerComponent> {
        self.components.get_mut(component_type)
    }

    pub fn has_component(&self, component_type: &str) -> bool {
        self.components.contains_key(component_type)
    }

    pub fn components(&self) -> impl Iterator<Item = &ServerComponent> {
        self.components.values()
    }

    pub(crate) fn insert_component(&mut self, component: ServerComponent) {
        self.components
            .insert(component.component_type().to_string(), component);
    }

    pub(crate) fn remove_component(&mut self, component_type: &str) -> Option<ServerComponent> {
        self.components.remove(component_type)
    }

    pub(crate) fn drain_components(&mut self) -> Vec<ServerComponent> {
        std::mem::take(&mut self.components).into_values().collect()
    }
}
