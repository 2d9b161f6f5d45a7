/// Integration tests for bounded properties
/// A clamped value is stored on the server and sent back to the client that
/// proposed it, and to no one else. A rejected value changes nothing.

use warrant_client::ClientEvent;
use warrant_shared::{
    ClientRequest, ConnectionId, NetworkingType, ReplicaPath, Value, Vector3, UNLIMITED_ITEMS,
};
use warrant_test::TestServer;

const SHAPE: &str = "SetPropertyOnOwnMeshComponent_ShapeParameters";

fn setup(adjust_bounds: bool) -> (TestServer, ConnectionId, ReplicaPath) {
    let mut test = TestServer::new();
    let connection = test.connect();
    test.send(
        &connection,
        ClientRequest::CreateObject {
            name: "crate".to_string(),
            networking_type: NetworkingType::Remote,
        },
    );
    let object = test.server.objects().objects().next().unwrap().key();
    test.send(
        &connection,
        ClientRequest::CreateComponent {
            object: object.to_u64(),
            component_type: "Mesh".to_string(),
            networking_type: NetworkingType::Remote,
            local_override: false,
        },
    );

    let guest = test
        .server
        .permissions_mut()
        .resolve_user_name(&connection)
        .unwrap();
    test.server
        .permissions_mut()
        .set_bounded_permission(
            &guest,
            SHAPE,
            true,
            UNLIMITED_ITEMS,
            UNLIMITED_ITEMS,
            1.0,
            Some(Value::from(Vector3::new(0.0, 0.0, 0.0))),
            Some(Value::from(Vector3::new(10.0, 10.0, 10.0))),
            adjust_bounds,
        )
        .unwrap();
    test.events(&connection);

    (test, connection, ReplicaPath::new(object.to_u64(), "Mesh"))
}

fn propose(test: &mut TestServer, connection: &ConnectionId, path: &ReplicaPath, value: Value) {
    test.send(
        connection,
        ClientRequest::SetProperty {
            path: path.clone(),
            property: "ShapeParameters".to_string(),
            value,
        },
    );
}

#[test]
fn clamped_value_is_sent_back() {
    let (mut test, connection, path) = setup(true);
    let bystander = test.connect();
    test.events(&bystander);
    propose(
        &mut test,
        &connection,
        &path,
        Value::from(Vector3::new(-1.0, 5.0, 20.0)),
    );

    let clamped = Value::from(Vector3::new(0.0, 5.0, 10.0));
    assert_eq!(
        test.server
            .objects()
            .get_component(&path)
            .unwrap()
            .property("ShapeParameters"),
        Some(&clamped)
    );
    assert_eq!(
        test.events(&connection),
        vec![ClientEvent::PropertyCorrected {
            path,
            property: "ShapeParameters".to_string(),
            value: clamped,
        }]
    );
    assert!(test.events(&bystander).is_empty());
}

#[test]
fn in_bounds_value_is_not_corrected() {
    let (mut test, connection, path) = setup(true);
    let value = Value::from(Vector3::new(1.0, 2.0, 3.0));
    propose(&mut test, &connection, &path, value.clone());

    assert_eq!(
        test.server
            .objects()
            .get_component(&path)
            .unwrap()
            .property("ShapeParameters"),
        Some(&value)
    );
    assert!(test.events(&connection).is_empty());
}

#[test]
fn rejected_value_changes_nothing() {
    let (mut test, connection, path) = setup(false);
    propose(
        &mut test,
        &connection,
        &path,
        Value::from(Vector3::new(-1.0, 5.0, 20.0)),
    );

    assert_eq!(
        test.server
            .objects()
            .get_component(&path)
            .unwrap()
            .property("ShapeParameters"),
        None
    );
    assert!(test.events(&connection).is_empty());
}
