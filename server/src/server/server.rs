use std::mem;

use log::{info, warn};

use warrant_shared::{
    BitReader, ClientRequest, ConnectionId, FileBitWriter, NetworkingType, Origin, ReplicaPath,
    Serde, ServerMessage,
};

use crate::{
    error::ServerError,
    permission::PermissionManager,
    server::ServerConfig,
    session::{SessionEvent, SessionManager},
    user::UserManager,
    world::{
        object_manager::ObjectManager,
        plugin::PluginManager,
        replica::{ObjectKey, ReplicaHost},
    },
};

/// The application context: owns every manager and drives the tick.
///
/// A transport feeds it connects, disconnects and request payloads, calls
/// [`update`](Server::update) once per tick and sends whatever
/// [`take_outgoing_bytes`](Server::take_outgoing_bytes) returns.
pub struct Server {
    config: ServerConfig,
    permissions: PermissionManager,
    objects: ObjectManager,
    plugins: PluginManager,
    outgoing: Vec<(ConnectionId, ServerMessage)>,
}

impl Server {
    /// Create a new Server
    pub fn new(config: ServerConfig) -> Result<Self, ServerError> {
        let mut permissions = PermissionManager::new(&config);
        let users = UserManager::with_guest_template(&config.guest_template);
        permissions.set_session_manager(SessionManager::new(users))?;

        Ok(Self {
            config,
            permissions,
            objects: ObjectManager::new(),
            plugins: PluginManager::new(),
            outgoing: Vec::new(),
        })
    }

    pub fn config(&self) -> &ServerConfig {
        &self.config
    }

    // Connections

    /// Binds a new connection to a fresh guest and queues its permission
    /// table. Returns the guest's name.
    pub fn connect(&mut self, connection: ConnectionId) -> Result<String, ServerError> {
        let sessions = self.permissions.sessions_mut()?;
        if sessions.has_session(&connection) {
            return Err(ServerError::duplicate("Session", connection.to_string()));
        }
        let guest = sessions.users_mut().create_guest()?;
        sessions.add_session(connection, &guest)?;

        let message = self.permissions.construction_message(&connection)?;
        self.outgoing.push((connection, message));
        Ok(guest)
    }

    /// Ends the connection's session. A guest is torn down over the
    /// following ticks.
    pub fn disconnect(&mut self, connection: &ConnectionId) -> Result<(), ServerError> {
        self.permissions
            .sessions_mut()?
            .remove_session(connection, &mut self.objects)
    }

    /// Disconnects every connection.
    pub fn disconnect_all(&mut self) -> Result<(), ServerError> {
        self.permissions.sessions_mut()?.clear(&mut self.objects)
    }

    /// Upgrades a guest session to the registered user `user`. The
    /// connection must not own any replica, since those count against the
    /// guest. The abandoned guest is removed and the new table is queued.
    pub fn authenticate(
        &mut self,
        connection: &ConnectionId,
        user: &str,
        password: &str,
    ) -> Result<(), ServerError> {
        let sessions = self.permissions.sessions_mut()?;
        sessions.get_session(connection)?;
        match sessions.users().get_user(user) {
            Ok(registered) if !registered.is_guest() && registered.check_password(password) => {}
            _ => {
                return Err(ServerError::AuthenticationFailed {
                    user: user.to_string(),
                })
            }
        }

        let owned = self.objects.replicas_created_by(connection).len();
        if owned > 0 {
            return Err(ServerError::InvalidState {
                context: format!("{} still owns {} replicas", connection, owned),
            });
        }

        let previous = sessions.rebind(connection, user)?;
        if sessions.users().get_user(&previous)?.is_guest() {
            sessions.users_mut().remove_user(&previous)?;
        }
        info!("{} authenticated as {}", connection, user);

        let message = self.permissions.construction_message(connection)?;
        self.outgoing.push((*connection, message));
        Ok(())
    }

    // Requests

    /// Decodes and applies one client request. Only an undecodable payload
    /// is an error; a refused request is logged and dropped so it never
    /// reaches the tick or other connections.
    pub fn receive_request(
        &mut self,
        connection: &ConnectionId,
        reader: &mut BitReader,
    ) -> Result<(), ServerError> {
        let request = ClientRequest::de(reader).map_err(|_| ServerError::MalformedRequest {
            connection: *connection,
        })?;

        if let Err(error) = self.handle_request(connection, request) {
            warn!("Request from {} refused: {}", connection, error);
        }
        Ok(())
    }

    /// Runs one decoded request through the authority hooks.
    pub fn handle_request(
        &mut self,
        connection: &ConnectionId,
        request: ClientRequest,
    ) -> Result<(), ServerError> {
        if !self.permissions.sessions()?.get_session(connection)?.is_active() {
            return Err(ServerError::InvalidState {
                context: format!("{} is disconnecting", connection),
            });
        }

        let origin = Origin::Client(*connection);
        let permissions = &mut self.permissions;
        match request {
            ClientRequest::CreateObject {
                name,
                networking_type,
            } => {
                self.objects
                    .create_object(permissions, origin, &name, networking_type)?;
            }
            ClientRequest::DestroyObject { object } => {
                self.objects
                    .destroy_object(permissions, origin, &ObjectKey::new(object))?;
            }
            ClientRequest::CreateComponent {
                object,
                component_type,
                networking_type,
                local_override,
            } => {
                self.objects.create_component(
                    permissions,
                    origin,
                    &ObjectKey::new(object),
                    &component_type,
                    networking_type,
                    local_override,
                )?;
            }
            ClientRequest::DestroyComponent { path } => {
                self.objects.destroy_component(permissions, origin, &path)?;
            }
            ClientRequest::SetProperty {
                path,
                property,
                value,
            } => {
                self.objects
                    .set_property(permissions, origin, &path, &property, value)?;
            }
            ClientRequest::InsertValue {
                path,
                property,
                value,
            } => {
                self.objects
                    .insert_value(permissions, origin, &path, &property, value)?;
            }
            ClientRequest::SetParent { object, parent } => {
                self.objects.set_parent(
                    permissions,
                    origin,
                    &ObjectKey::new(object),
                    parent.map(ObjectKey::new),
                )?;
            }
            ClientRequest::SetPluginProperty {
                plugin_type,
                property,
                value,
            } => {
                self.plugins
                    .set_property(permissions, origin, &plugin_type, &property, value)?;
            }
        }
        Ok(())
    }

    // Server-authored state

    pub fn spawn_object(
        &mut self,
        name: &str,
        networking_type: NetworkingType,
    ) -> Result<ObjectKey, ServerError> {
        self.objects
            .create_object(&mut self.permissions, Origin::Server, name, networking_type)
    }

    pub fn spawn_component(
        &mut self,
        object: &ObjectKey,
        component_type: &str,
    ) -> Result<ReplicaPath, ServerError> {
        self.objects.create_component(
            &mut self.permissions,
            Origin::Server,
            object,
            component_type,
            NetworkingType::Remote,
            false,
        )
    }

    // Tick

    /// Finishes requested destructions, then finalizes every guest whose
    /// replicas are all gone.
    pub fn update(&mut self) {
        self.objects.update(&mut self.permissions);
        if let Ok(sessions) = self.permissions.sessions_mut() {
            sessions.update(&self.objects);
        }
    }

    /// Everything queued for sending since the last call.
    pub fn take_outgoing(&mut self) -> Vec<(ConnectionId, ServerMessage)> {
        let mut outgoing = mem::take(&mut self.outgoing);
        outgoing.append(&mut self.objects.take_outgoing());
        outgoing.append(&mut self.plugins.take_outgoing());
        outgoing
    }

    /// [`take_outgoing`](Server::take_outgoing), encoded. A construction
    /// payload is larger than one packet, so messages are written into a
    /// growable buffer and left to the transport to fragment.
    pub fn take_outgoing_bytes(&mut self) -> Vec<(ConnectionId, Vec<u8>)> {
        self.take_outgoing()
            .into_iter()
            .map(|(connection, message)| {
                let mut writer = FileBitWriter::new();
                message.ser(&mut writer);
                (connection, writer.to_vec())
            })
            .collect()
    }

    pub fn take_events(&mut self) -> Vec<SessionEvent> {
        match self.permissions.sessions_mut() {
            Ok(sessions) => sessions.take_events(),
            Err(_) => Vec::new(),
        }
    }

    // Managers

    pub fn permissions(&self) -> &PermissionManager {
        &self.permissions
    }

    pub fn permissions_mut(&mut self) -> &mut PermissionManager {
        &mut self.permissions
    }

    pub fn users(&self) -> Result<&UserManager, ServerError> {
        Ok(self.permissions.sessions()?.users())
    }

    pub fn users_mut(&mut self) -> Result<&mut UserManager, ServerError> {
        Ok(self.permissions.sessions_mut()?.users_mut())
    }

    pub fn objects(&self) -> &ObjectManager {
        &self.objects
    }

    pub fn plugins(&self) -> &PluginManager {
        &self.plugins
    }

    pub fn plugins_mut(&mut self) -> &mut PluginManager {
        &mut self.plugins
    }
}

#[cfg(test)]
mod tests {
    use warrant_shared::{names, ClientRequest, PermissionSet, Value, MTU_SIZE_BITS};

    use super::*;

    fn encode(request: &ClientRequest) -> Vec<u8> {
        let mut writer = FileBitWriter::new();
        request.ser(&mut writer);
        writer.to_vec()
    }

    #[test]
    fn connecting_sends_the_guest_table() {
        let mut server = Server::new(ServerConfig::default()).unwrap();
        let connection = ConnectionId::new(1);
        let guest = server.connect(connection).unwrap();
        assert_eq!(guest, "Guest0");

        let outgoing = server.take_outgoing();
        assert_eq!(outgoing.len(), 1);
        let (to, ServerMessage::Permissions(permissions)) = &outgoing[0] else {
            panic!("expected a permission table, got {:?}", outgoing[0]);
        };
        assert_eq!(*to, connection);
        assert!(permissions.has(names::CREATE_REMOTE_OBJECT));
        assert!(matches!(
            server.connect(connection),
            Err(ServerError::DuplicateItem { .. })
        ));
    }

    #[test]
    fn guest_table_is_encoded_past_one_packet() {
        let mut server = Server::new(ServerConfig::default()).unwrap();
        let connection = ConnectionId::new(1);
        let guest = server.connect(connection).unwrap();

        let outgoing = server.take_outgoing_bytes();
        assert_eq!(outgoing.len(), 1);
        let (to, bytes) = &outgoing[0];
        assert_eq!(*to, connection);
        assert!(bytes.len() * 8 > MTU_SIZE_BITS as usize);

        let mut reader = BitReader::new(bytes);
        let ServerMessage::Permissions(received) = ServerMessage::de(&mut reader).unwrap() else {
            panic!("expected a permission table");
        };
        let expected: &PermissionSet = server
            .users()
            .unwrap()
            .get_user(&guest)
            .unwrap()
            .permissions();
        assert_eq!(&received, expected);
        assert!(server.take_outgoing_bytes().is_empty());
    }

    #[test]
    fn refused_requests_are_swallowed() {
        let mut server = Server::new(ServerConfig::default()).unwrap();
        let connection = ConnectionId::new(1);
        server.connect(connection).unwrap();
        let stage = server.spawn_object("stage", NetworkingType::Remote).unwrap();

        let bytes = encode(&ClientRequest::DestroyObject {
            object: stage.to_u64(),
        });
        server
            .receive_request(&connection, &mut BitReader::new(&bytes))
            .unwrap();
        assert!(server.objects().has_object(&stage));

        assert!(matches!(
            server.receive_request(&connection, &mut BitReader::new(&[])),
            Err(ServerError::MalformedRequest { .. })
        ));
    }

    #[test]
    fn requests_after_disconnect_are_refused() {
        let mut server = Server::new(ServerConfig::default()).unwrap();
        let connection = ConnectionId::new(1);
        server.connect(connection).unwrap();
        let object = server
            .objects
            .create_object(
                &mut server.permissions,
                Origin::Client(connection),
                "crate",
                NetworkingType::Remote,
            )
            .unwrap();
        server.disconnect(&connection).unwrap();

        let result = server.handle_request(
            &connection,
            ClientRequest::SetPluginProperty {
                plugin_type: "Sky".to_string(),
                property: "Timescale".to_string(),
                value: Value::from(1.0),
            },
        );
        assert!(matches!(result, Err(ServerError::InvalidState { .. })));

        server.update();
        assert!(!server.objects().has_object(&object));
        assert!(!server.users().unwrap().has_user("Guest0"));
    }
}
