/// Integration tests for the construction payload and authentication
/// A client learns its capability envelope from the server on connect, and
/// again whenever its session is rebound to another user.

use warrant_client::{Client, ClientConfig, ClientEvent};
use warrant_server::{Server, ServerConfig, ServerError};
use warrant_shared::{
    names, BitReader, ClientRequest, ConnectionId, NetworkingType, MTU_SIZE_BITS,
    UNLIMITED_ITEMS,
};
use warrant_test::TestServer;

#[test]
fn client_receives_the_guest_policy() {
    let mut test = TestServer::with_config(ServerConfig {
        max_remote_objects: 2,
        ..ServerConfig::default()
    });
    let connection = test.connect();

    assert_eq!(test.events(&connection), vec![ClientEvent::Permissions]);

    let client = test.client(&connection);
    let permissions = client.permissions().permissions().clone();
    assert_eq!(
        permissions.get(names::CREATE_REMOTE_OBJECT).unwrap().max_items(),
        2
    );
    assert!(client
        .permissions_mut()
        .check_permission_allowed(names::CREATE_LOCAL_OBJECT));
    assert!(!client
        .permissions_mut()
        .check_permission_allowed(names::DESTROY_OTHER_OBJECT));

    let template = test.server.users().unwrap().guest_template().unwrap();
    assert_eq!(&permissions, template.permissions());
}

#[test]
fn full_guest_table_reaches_the_client() {
    let mut server = Server::new(ServerConfig::default()).unwrap();
    let connection = ConnectionId::new(1);
    server.connect(connection).unwrap();

    let outgoing = server.take_outgoing_bytes();
    let [(to, bytes)] = outgoing.as_slice() else {
        panic!("expected one construction payload, got {}", outgoing.len());
    };
    assert_eq!(*to, connection);
    assert!(bytes.len() * 8 > MTU_SIZE_BITS as usize);

    let mut client = Client::new(ClientConfig::default());
    client.receive_message(&mut BitReader::new(bytes)).unwrap();
    assert_eq!(client.take_events(), vec![ClientEvent::Permissions]);

    let template = server.users().unwrap().guest_template().unwrap();
    assert_eq!(client.permissions().permissions(), template.permissions());
    assert!(client
        .permissions_mut()
        .check_permission_allowed("SetPropertyOnOtherAudioComponent_Volume"));
    assert!(!client
        .permissions_mut()
        .check_permission_allowed("SetPropertyOnServerNeighborsPlugin_ServerNeighbors"));
}

#[test]
fn counters_are_never_sent() {
    let mut test = TestServer::new();
    let first = test.connect();
    test.send(
        &first,
        ClientRequest::CreateObject {
            name: "crate".to_string(),
            networking_type: NetworkingType::Remote,
        },
    );
    let events = test.events(&first);
    assert!(matches!(
        events.last(),
        Some(ClientEvent::ObjectCreated { .. })
    ));

    // A re-sent table after the count went up still starts from zero.
    let message = test
        .server
        .permissions_mut()
        .construction_message(&first)
        .unwrap();
    test.client(&first).handle_message(message);
    assert_eq!(
        test.client(&first)
            .permissions()
            .permissions()
            .get(names::CREATE_REMOTE_OBJECT)
            .unwrap()
            .current_items(),
        0
    );
}

#[test]
fn authentication_swaps_the_table() {
    let mut test = TestServer::new();
    {
        let users = test.server.users_mut().unwrap();
        let alice = users.add_user("alice", "secret").unwrap();
        alice
            .add_permission(
                names::DESTROY_OTHER_OBJECT,
                true,
                UNLIMITED_ITEMS,
                UNLIMITED_ITEMS,
                1.0,
            )
            .unwrap();
    }
    let connection = test.connect();
    test.events(&connection);

    assert!(matches!(
        test.server.authenticate(&connection, "alice", "wrong"),
        Err(ServerError::AuthenticationFailed { .. })
    ));
    assert!(matches!(
        test.server.authenticate(&connection, "Guest", ""),
        Err(ServerError::AuthenticationFailed { .. })
    ));

    test.server
        .authenticate(&connection, "alice", "secret")
        .unwrap();
    test.deliver();

    assert_eq!(test.events(&connection), vec![ClientEvent::Permissions]);
    assert!(test
        .client(&connection)
        .permissions_mut()
        .check_permission_allowed(names::DESTROY_OTHER_OBJECT));
    assert!(!test.server.users().unwrap().has_user("Guest0"));

    // Registered users are kept when their session ends.
    test.disconnect(&connection);
    assert!(!test.server.permissions().sessions().unwrap().has_session(&connection));
    assert!(test.server.users().unwrap().has_user("alice"));
}

#[test]
fn guests_holding_replicas_cannot_authenticate() {
    let mut test = TestServer::new();
    test.server.users_mut().unwrap().add_user("alice", "secret").unwrap();
    let connection = test.connect();
    test.send(
        &connection,
        ClientRequest::CreateObject {
            name: "crate".to_string(),
            networking_type: NetworkingType::Remote,
        },
    );

    assert!(matches!(
        test.server.authenticate(&connection, "alice", "secret"),
        Err(ServerError::InvalidState { .. })
    ));
    assert!(test.server.users().unwrap().has_user("Guest0"));
}
