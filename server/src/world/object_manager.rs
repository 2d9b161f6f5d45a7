use std::{collections::BTreeMap, mem};

use log::{debug, info, warn};

use warrant_shared::{
    names, ConnectionId, NetworkingType, Origin, Ownership, PermissionResult, ReplicaPath,
    ServerMessage, Value,
};

use crate::{
    error::ServerError,
    permission::PermissionManager,
    world::{
        component::ServerComponent,
        object::ServerObject,
        replica::{ObjectKey, ReplicaHost, ReplicaKey},
    },
};

#[derive(Clone, Copy)]
enum PropertyWrite {
    Set,
    Insert,
}

impl PropertyWrite {
    fn permission_name(&self, component: Ownership, component_type: &str, property: &str) -> String {
        match self {
            PropertyWrite::Set => names::set_property(component, component_type, property),
            PropertyWrite::Insert => names::insert_value(component, component_type, property),
        }
    }

    fn location(&self) -> &'static str {
        match self {
            PropertyWrite::Set => "ServerComponent::set_property",
            PropertyWrite::Insert => "ServerComponent::insert_value",
        }
    }
}

/// Owns every replicated object and runs the authority hooks for them.
///
/// Client actions (`Origin::Client`) are checked against the acting
/// connection's permissions before any state changes. Server actions are
/// never checked. Remote creations by clients count items on the creator's
/// permissions; destruction gives them back, no matter who destroys.
pub struct ObjectManager {
    objects: BTreeMap<ObjectKey, ServerObject>,
    next_key: u64,
    destroy_queue: Vec<ReplicaKey>,
    outgoing: Vec<(ConnectionId, ServerMessage)>,
}

impl ObjectManager {
    pub fn new() -> Self {
        Self {
            objects: BTreeMap::new(),
            next_key: 1,
            destroy_queue: Vec::new(),
            outgoing: Vec::new(),
        }
    }

    // Objects

    pub fn create_object(
        &mut self,
        permissions: &mut PermissionManager,
        origin: Origin,
        name: &str,
        networking_type: NetworkingType,
    ) -> Result<ObjectKey, ServerError> {
        let mut counted = None;
        if let Some(connection) = origin.connection() {
            let permission = match networking_type {
                NetworkingType::Remote => names::CREATE_REMOTE_OBJECT,
                NetworkingType::Local => names::CREATE_LOCAL_OBJECT,
            };
            permissions.check_permission_throws(
                &connection,
                permission,
                "ObjectManager::create_object",
            )?;
            permissions.add_item(&connection, permission)?;
            counted = Some(permission.to_string());
        }

        let key = ObjectKey::new(self.next_key);
        self.next_key += 1;
        let mut object = ServerObject::new(key, name, origin, networking_type);
        object.counted = counted;
        self.objects.insert(key, object);

        info!("Created {} '{}' for {:?}", key, name, origin);
        if let Some(connection) = origin.connection() {
            self.outgoing.push((
                connection,
                ServerMessage::ObjectCreated {
                    object: key.to_u64(),
                    name: name.to_string(),
                },
            ));
        }
        Ok(key)
    }

    pub fn destroy_object(
        &mut self,
        permissions: &mut PermissionManager,
        origin: Origin,
        key: &ObjectKey,
    ) -> Result<(), ServerError> {
        let object = self.get_object(key)?;
        if let Some(connection) = origin.connection() {
            let permission = match object.networking_type() {
                NetworkingType::Local => names::DESTROY_LOCAL_OBJECT,
                NetworkingType::Remote => {
                    names::destroy_object(Ownership::of(object.origin().is(&connection)))
                }
            };
            permissions.check_permission_throws(
                &connection,
                permission,
                "ObjectManager::destroy_object",
            )?;
        }

        self.finish_destroy_object(permissions, key);
        Ok(())
    }

    fn finish_destroy_object(&mut self, permissions: &mut PermissionManager, key: &ObjectKey) {
        let Some(mut object) = self.objects.remove(key) else {
            debug!("{} is already destroyed", key);
            return;
        };

        for component in object.drain_components() {
            release(permissions, component.origin(), &component.counted);
        }
        if let Some(counted) = object.counted.take() {
            release(permissions, object.origin(), &[counted]);
        }
        for child in self.objects.values_mut() {
            if child.parent() == Some(*key) {
                child.set_parent(None);
            }
        }
        info!("Destroyed {} '{}'", key, object.name());
    }

    pub fn get_object(&self, key: &ObjectKey) -> Result<&ServerObject, ServerError> {
        self.objects
            .get(key)
            .ok_or_else(|| ServerError::not_found("Object", key.to_string()))
    }

    fn get_object_mut(&mut self, key: &ObjectKey) -> Result<&mut ServerObject, ServerError> {
        self.objects
            .get_mut(key)
            .ok_or_else(|| ServerError::not_found("Object", key.to_string()))
    }

    pub fn has_object(&self, key: &ObjectKey) -> bool {
        self.objects.contains_key(key)
    }

    pub fn objects(&self) -> impl Iterator<Item = &ServerObject> {
        self.objects.values()
    }

    /// Moves `key` between Local and Remote. A counted object moves its item
    /// from one create permission to the other, on its creator.
    pub fn set_networking_type(
        &mut self,
        permissions: &mut PermissionManager,
        key: &ObjectKey,
        networking_type: NetworkingType,
    ) -> Result<(), ServerError> {
        let object = self.get_object(key)?;
        if object.networking_type() == networking_type {
            return Ok(());
        }

        let mut counted = None;
        if let (Some(creator), Some(previous)) = (object.origin().connection(), &object.counted) {
            let next = match networking_type {
                NetworkingType::Remote => names::CREATE_REMOTE_OBJECT,
                NetworkingType::Local => names::CREATE_LOCAL_OBJECT,
            };
            permissions.check_permission_throws(
                &creator,
                next,
                "ServerObject::set_networking_type",
            )?;
            permissions.add_item(&creator, next)?;
            if let Err(error) = permissions.remove_item(&creator, previous, false) {
                warn!("Could not release {} for {}: {}", previous, creator, error);
            }
            counted = Some(next.to_string());
        }

        let object = self.get_object_mut(key)?;
        object.set_networking_type(networking_type);
        if counted.is_some() {
            object.counted = counted;
        }
        debug!("{} is now {:?}", key, networking_type);
        Ok(())
    }

    /// Attaches `key` under `parent`, or detaches it when `parent` is `None`.
    pub fn set_parent(
        &mut self,
        permissions: &mut PermissionManager,
        origin: Origin,
        key: &ObjectKey,
        parent: Option<ObjectKey>,
    ) -> Result<(), ServerError> {
        let object_origin = self.get_object(key)?.origin();
        let parent_origin = match &parent {
            Some(parent) => {
                if self.is_ancestor(key, parent) {
                    return Err(ServerError::InvalidState {
                        context: format!("{} cannot be parented under {}", key, parent),
                    });
                }
                Some(self.get_object(parent)?.origin())
            }
            None => None,
        };

        if let Some(connection) = origin.connection() {
            let object_ownership = Ownership::of(object_origin.is(&connection));
            let permission = match parent_origin {
                Some(parent_origin) => {
                    names::set_parent(Ownership::of(parent_origin.is(&connection)), object_ownership)
                }
                None => names::unparent(object_ownership),
            };
            permissions.check_permission_throws(
                &connection,
                &permission,
                "ServerObject::set_parent",
            )?;
        }

        self.get_object_mut(key)?.set_parent(parent);
        Ok(())
    }

    /// True if `ancestor` is `object` or one of `object`'s parents.
    fn is_ancestor(&self, ancestor: &ObjectKey, object: &ObjectKey) -> bool {
        let mut current = Some(*object);
        while let Some(key) = current {
            if key == *ancestor {
                return true;
            }
            current = self.objects.get(&key).and_then(|object| object.parent());
        }
        false
    }

    // Components

    pub fn create_component(
        &mut self,
        permissions: &mut PermissionManager,
        origin: Origin,
        key: &ObjectKey,
        component_type: &str,
        networking_type: NetworkingType,
        local_override: bool,
    ) -> Result<ReplicaPath, ServerError> {
        let object = self.get_object(key)?;
        let path = ReplicaPath::new(key.to_u64(), component_type);
        if object.has_component(component_type) {
            return Err(ServerError::duplicate("Component", describe_path(&path)));
        }

        let mut counted = Vec::new();
        let gated = object.networking_type() == NetworkingType::Remote && !local_override;
        if let (Some(connection), true) = (origin.connection(), gated) {
            let location = "ObjectManager::create_component";
            match networking_type {
                NetworkingType::Local => {
                    permissions.check_permission_throws(
                        &connection,
                        names::CREATE_LOCAL_COMPONENT,
                        location,
                    )?;
                }
                NetworkingType::Remote => {
                    let layered = vec![
                        names::CREATE_REMOTE_COMPONENT.to_string(),
                        names::create_remote_component_on(Ownership::of(
                            object.origin().is(&connection),
                        )),
                        names::create_component(component_type),
                    ];
                    // All three must pass before any of them counts.
                    for permission in &layered {
                        permissions.check_permission_throws(&connection, permission, location)?;
                    }
                    add_items(permissions, &connection, &layered)?;
                    counted = layered;
                }
            }
        }

        let mut component =
            ServerComponent::new(*key, component_type, origin, networking_type, local_override);
        component.counted = counted;
        self.get_object_mut(key)?.insert_component(component);
        info!("Created {} for {:?}", describe_path(&path), origin);
        Ok(path)
    }

    pub fn destroy_component(
        &mut self,
        permissions: &mut PermissionManager,
        origin: Origin,
        path: &ReplicaPath,
    ) -> Result<(), ServerError> {
        let key = ObjectKey::new(path.object);
        let object = self.get_object(&key)?;
        let component = object
            .component(&path.component_type)
            .ok_or_else(|| ServerError::not_found("Component", describe_path(path)))?;

        if let Some(connection) = origin.connection() {
            if !component.local_override() {
                let permission = match component.networking_type() {
                    NetworkingType::Local => names::DESTROY_LOCAL_COMPONENT.to_string(),
                    NetworkingType::Remote => names::destroy_component(
                        Ownership::of(component.origin().is(&connection)),
                        Ownership::of(object.origin().is(&connection)),
                    ),
                };
                permissions.check_permission_throws(
                    &connection,
                    &permission,
                    "ServerComponent::destroy",
                )?;
            }
        }

        self.finish_destroy_component(permissions, path);
        Ok(())
    }

    fn finish_destroy_component(&mut self, permissions: &mut PermissionManager, path: &ReplicaPath) {
        let key = ObjectKey::new(path.object);
        let Some(component) = self
            .objects
            .get_mut(&key)
            .and_then(|object| object.remove_component(&path.component_type))
        else {
            debug!("{} is already destroyed", describe_path(path));
            return;
        };
        release(permissions, component.origin(), &component.counted);
        info!("Destroyed {}", describe_path(path));
    }

    pub fn get_component(&self, path: &ReplicaPath) -> Result<&ServerComponent, ServerError> {
        self.get_object(&ObjectKey::new(path.object))?
            .component(&path.component_type)
            .ok_or_else(|| ServerError::not_found("Component", describe_path(path)))
    }

    // Properties

    /// Writes `property` on the component at `path`. Ownership is resolved
    /// against the component's creator. A clamped value is stored and sent
    /// back to the acting connection as a correction.
    pub fn set_property(
        &mut self,
        permissions: &mut PermissionManager,
        origin: Origin,
        path: &ReplicaPath,
        property: &str,
        value: Value,
    ) -> Result<PermissionResult, ServerError> {
        self.write_property(permissions, origin, path, property, value, PropertyWrite::Set)
    }

    /// As [`set_property`](Self::set_property) for an insertion into a list
    /// property such as `ResourceList[3]`.
    pub fn insert_value(
        &mut self,
        permissions: &mut PermissionManager,
        origin: Origin,
        path: &ReplicaPath,
        property: &str,
        value: Value,
    ) -> Result<PermissionResult, ServerError> {
        self.write_property(permissions, origin, path, property, value, PropertyWrite::Insert)
    }

    fn write_property(
        &mut self,
        permissions: &mut PermissionManager,
        origin: Origin,
        path: &ReplicaPath,
        property: &str,
        mut value: Value,
        write: PropertyWrite,
    ) -> Result<PermissionResult, ServerError> {
        let component = self.get_component(path)?;
        let mut result = PermissionResult::Allowed;

        if let (Some(connection), true) = (origin.connection(), component.is_gated()) {
            let permission = write.permission_name(
                Ownership::of(component.origin().is(&connection)),
                component.component_type(),
                property,
            );
            result = permissions.check_permission_value_throws(
                &connection,
                &permission,
                &mut value,
                write.location(),
            )?;

            if result == PermissionResult::BoundsAdjusted {
                debug!(
                    "{} on {} corrected to {} for {}",
                    property,
                    describe_path(path),
                    value,
                    connection
                );
                self.outgoing.push((
                    connection,
                    ServerMessage::PropertyCorrection {
                        path: path.clone(),
                        property: property.to_string(),
                        value: value.clone(),
                    },
                ));
            }
        }

        self.get_object_mut(&ObjectKey::new(path.object))?
            .component_mut(&path.component_type)
            .ok_or_else(|| ServerError::not_found("Component", describe_path(path)))?
            .set_property(property, value);
        Ok(result)
    }

    // Tick

    /// Completes every destruction requested through [`ReplicaHost`].
    pub fn update(&mut self, permissions: &mut PermissionManager) {
        for replica in mem::take(&mut self.destroy_queue) {
            match replica {
                ReplicaKey::Object(key) => self.finish_destroy_object(permissions, &key),
                ReplicaKey::Component(key, component_type) => {
                    let path = ReplicaPath::new(key.to_u64(), &component_type);
                    self.finish_destroy_component(permissions, &path);
                }
            }
        }
    }

    pub fn take_outgoing(&mut self) -> Vec<(ConnectionId, ServerMessage)> {
        mem::take(&mut self.outgoing)
    }
}

impl Default for ObjectManager {
    fn default() -> Self {
        Self::new()
    }
}

impl ReplicaHost for ObjectManager {
    fn replicas_created_by(&self, connection: &ConnectionId) -> Vec<ReplicaKey> {
        let mut replicas = Vec::new();
        for object in self.objects.values() {
            if object.origin().is(connection) {
                replicas.push(ReplicaKey::Object(object.key()));
            }
            for component in object.components() {
                if component.origin().is(connection) {
                    replicas.push(ReplicaKey::Component(
                        object.key(),
                        component.component_type().to_string(),
                    ));
                }
            }
        }
        replicas
    }

    fn request_destroy(&mut self, replica: &ReplicaKey) {
        self.destroy_queue.push(replica.clone());
    }
}

fn describe_path(path: &ReplicaPath) -> String {
    format!("object#{}/{}", path.object, path.component_type)
}

/// Adds one item to each permission, or to none of them.
fn add_items(
    permissions: &mut PermissionManager,
    connection: &ConnectionId,
    names: &[String],
) -> Result<(), ServerError> {
    for (index, name) in names.iter().enumerate() {
        if let Err(error) = permissions.add_item(connection, name) {
            for added in &names[..index] {
                if let Err(rollback) = permissions.remove_item(connection, added, true) {
                    warn!("Could not roll back {} for {}: {}", added, connection, rollback);
                }
            }
            return Err(error);
        }
    }
    Ok(())
}

/// Gives counted items back to the creator.
fn release(permissions: &mut PermissionManager, origin: Origin, counted: &[String]) {
    let Some(creator) = origin.connection() else {
        return;
    };
    for name in counted {
        if let Err(error) = permissions.remove_item(&creator, name, false) {
            warn!("Could not release {} for {}: {}", name, creator, error);
        }
    }
}
