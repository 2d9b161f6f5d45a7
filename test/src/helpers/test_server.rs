use std::collections::HashMap;

use warrant_client::{Client, ClientConfig, ClientEvent};
use warrant_server::{Server, ServerConfig};
use warrant_shared::{BitReader, ClientRequest, ConnectionId, FileBitWriter};

/// A server plus one [`Client`] per connection, with every message passed
/// through the wire encoding in both directions.
pub struct TestServer {
    pub server: Server,
    clients: HashMap<ConnectionId, Client>,
    next_connection: u64,
}

impl TestServer {
    pub fn new() -> Self {
        Self::with_config(ServerConfig::default())
    }

    pub fn with_config(config: ServerConfig) -> Self {
        Self {
            server: Server::new(config).expect("server config is valid"),
            clients: HashMap::new(),
            next_connection: 1,
        }
    }

    /// Connects a new client and delivers its construction payload.
    pub fn connect(&mut self) -> ConnectionId {
        let connection = ConnectionId::new(self.next_connection);
        self.next_connection += 1;

        self.server.connect(connection).expect("connection is new");
        self.clients
            .insert(connection, Client::new(ClientConfig::default()));
        self.deliver();
        connection
    }

    pub fn disconnect(&mut self, connection: &ConnectionId) {
        self.server
            .disconnect(connection)
            .expect("connection has a session");
        self.clients.remove(connection);
    }

    /// Encodes `request` on the client side and feeds it to the server.
    pub fn send(&mut self, connection: &ConnectionId, request: ClientRequest) {
        let mut writer = FileBitWriter::new();
        self.client(connection).write_request(&request, &mut writer);
        let bytes = writer.to_vec();

        self.server
            .receive_request(connection, &mut BitReader::new(&bytes))
            .expect("request is well formed");
        self.deliver();
    }

    /// Hands every queued server message to its client.
    pub fn deliver(&mut self) {
        for (connection, bytes) in self.server.take_outgoing_bytes() {
            let Some(client) = self.clients.get_mut(&connection) else {
                continue;
            };
            client
                .receive_message(&mut BitReader::new(&bytes))
                .expect("server message is well formed");
        }
    }

    pub fn tick(&mut self) {
        self.server.update();
        self.deliver();
    }

    pub fn client(&mut self, connection: &ConnectionId) -> &mut Client {
        self.clients
            .get_mut(connection)
            .expect("client is connected")
    }

    pub fn events(&mut self, connection: &ConnectionId) -> Vec<ClientEvent> {
        self.client(connection).take_events()
    }
}

impl Default for TestServer {
    fn default() -> Self {
        Self::new()
    }
}
