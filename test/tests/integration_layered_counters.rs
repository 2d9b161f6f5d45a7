/// Integration tests for component item counters
/// A remote component counts on three permissions at once. Either all three
/// count or none do, and destruction releases all three.

use warrant_server::{ObjectKey, ServerConfig};
use warrant_shared::{names, ClientRequest, ConnectionId, NetworkingType, ReplicaPath};
use warrant_test::{assert_denied, assert_items, TestServer};

const ON_OWN: &str = "ObjectManager_CreateRemoteComponentOnOwnObject";

fn create_object(test: &mut TestServer, connection: &ConnectionId) -> ObjectKey {
    test.send(
        connection,
        ClientRequest::CreateObject {
            name: "crate".to_string(),
            networking_type: NetworkingType::Remote,
        },
    );
    test.server.objects().objects().last().unwrap().key()
}

fn create_component(object: &ObjectKey, component_type: &str) -> ClientRequest {
    ClientRequest::CreateComponent {
        object: object.to_u64(),
        component_type: component_type.to_string(),
        networking_type: NetworkingType::Remote,
        local_override: false,
    }
}

#[test]
fn component_quota_blocks_every_counter() {
    let mut test = TestServer::with_config(ServerConfig {
        max_remote_components: 2,
        ..ServerConfig::default()
    });
    let connection = test.connect();
    let object = create_object(&mut test, &connection);

    test.send(&connection, create_component(&object, "Mesh"));
    test.send(&connection, create_component(&object, "Text"));
    assert_denied!(test
        .server
        .handle_request(&connection, create_component(&object, "Audio")));

    assert_items!(test.server, &connection, names::CREATE_REMOTE_COMPONENT, 2);
    assert_items!(test.server, &connection, ON_OWN, 2);
    assert_items!(test.server, &connection, "Audio_Create", 0);

    test.send(
        &connection,
        ClientRequest::DestroyComponent {
            path: ReplicaPath::new(object.to_u64(), "Mesh"),
        },
    );
    assert_items!(test.server, &connection, names::CREATE_REMOTE_COMPONENT, 1);
    assert_items!(test.server, &connection, "Mesh_Create", 0);

    test.send(&connection, create_component(&object, "Audio"));
    assert_items!(test.server, &connection, "Audio_Create", 1);
}

#[test]
fn destroying_an_object_releases_its_components() {
    let mut test = TestServer::new();
    let connection = test.connect();
    let object = create_object(&mut test, &connection);
    test.send(&connection, create_component(&object, "Mesh"));
    test.send(&connection, create_component(&object, "RigidBody"));
    assert_items!(test.server, &connection, names::CREATE_REMOTE_COMPONENT, 2);

    test.send(
        &connection,
        ClientRequest::DestroyObject {
            object: object.to_u64(),
        },
    );

    assert_items!(test.server, &connection, names::CREATE_REMOTE_OBJECT, 0);
    assert_items!(test.server, &connection, names::CREATE_REMOTE_COMPONENT, 0);
    assert_items!(test.server, &connection, ON_OWN, 0);
    assert_items!(test.server, &connection, "RigidBody_Create", 0);
}

#[test]
fn local_override_components_are_not_counted() {
    let mut test = TestServer::new();
    let connection = test.connect();
    let object = create_object(&mut test, &connection);

    test.send(
        &connection,
        ClientRequest::CreateComponent {
            object: object.to_u64(),
            component_type: "Teleporter".to_string(),
            networking_type: NetworkingType::Remote,
            local_override: true,
        },
    );

    assert!(test
        .server
        .objects()
        .get_component(&ReplicaPath::new(object.to_u64(), "Teleporter"))
        .is_ok());
    assert_items!(test.server, &connection, names::CREATE_REMOTE_COMPONENT, 0);
}
