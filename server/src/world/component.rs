use std::collections::BTreeMap;

use warrant_shared::{NetworkingType, Origin, ReplicaPath, Value};

use crate::world::replica::ObjectKey;

/// A component attached to a [`ServerObject`](crate::world::object::ServerObject).
///
/// `counted` holds the permissions whose item counters were incremented when
/// the component was created; destroying it decrements exactly those.
pub struct ServerComponent {
    object: ObjectKey,
    component_type: String,
    origin: Origin,
    networking_type: NetworkingType,
    local_override: bool,
    properties: BTreeMap<String, Value>,
    pub(crate) counted: Vec<String>,
}

impl ServerComponent {
    pub(crate) fn new(
        object: ObjectKey,
        component_type: &str,
        origin: Origin,
        networking_type: NetworkingType,
        local_override: bool,
    ) -> Self {
        Self {
            object,
            component_type: component_type.to_string(),
            origin,
            networking_type,
            local_override,
            properties: BTreeMap::new(),
            counted: Vec::new(),
        }
    }

    pub fn object(&self) -> ObjectKey {
        self.object
    }

    pub fn component_type(&self) -> &str {
        &self.component_type
    }

    pub fn path(&self) -> ReplicaPath {
        ReplicaPath::new(self.object.to_u64(), &self.component_type)
    }

    pub fn origin(&self) -> Origin {
        self.origin
    }

    pub fn networking_type(&self) -> NetworkingType {
        self.networking_type
    }

    /// Local-override components bypass remote authority checks.
    pub fn local_override(&self) -> bool {
        self.local_override
    }

    /// True when authority checks apply to client actions on this component.
    pub fn is_gated(&self) -> bool {
        self.networking_type == NetworkingType::Remote && !self.local_override
    }

    pub fn property(&self, name: &str) -> Option<&Value> {
        self.properties.get(name)
    }

    pub fn properties(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.properties
            .iter()
            .map(|(name, value)| (name.as_str(), value))
    }

    pub(crate) fn set_property(&mut self, name: &str, value: Value) {
        self.properties.insert(name.to_string(), value);
    }
}
