/// Integration tests for Own/Other resolution
/// Every client action is checked against the `Own` permission when the
/// acting connection created the entity, and the `Other` one otherwise.

use warrant_server::{ObjectKey, Server};
use warrant_shared::{
    names, ClientRequest, ConnectionId, NetworkingType, ReplicaPath, Value,
};
use warrant_test::{assert_denied, assert_items, TestServer};

fn create_object(test: &mut TestServer, connection: &ConnectionId) -> ObjectKey {
    test.send(
        connection,
        ClientRequest::CreateObject {
            name: "crate".to_string(),
            networking_type: NetworkingType::Remote,
        },
    );
    test.server
        .objects()
        .objects()
        .filter(|object| object.origin().is(connection))
        .map(|object| object.key())
        .last()
        .expect("object was created")
}

fn create_component(
    test: &mut TestServer,
    connection: &ConnectionId,
    object: &ObjectKey,
    component_type: &str,
) -> ReplicaPath {
    test.send(
        connection,
        ClientRequest::CreateComponent {
            object: object.to_u64(),
            component_type: component_type.to_string(),
            networking_type: NetworkingType::Remote,
            local_override: false,
        },
    );
    ReplicaPath::new(object.to_u64(), component_type)
}

fn caption(server: &Server, path: &ReplicaPath) -> Option<Value> {
    server
        .objects()
        .get_component(path)
        .ok()
        .and_then(|component| component.property("Caption").cloned())
}

#[test]
fn only_the_creator_may_edit_a_component() {
    let mut test = TestServer::new();
    let alice = test.connect();
    let bob = test.connect();
    let object = create_object(&mut test, &alice);
    let text = create_component(&mut test, &alice, &object, "Text");

    test.send(
        &bob,
        ClientRequest::SetProperty {
            path: text.clone(),
            property: "Caption".to_string(),
            value: Value::from("bob was here"),
        },
    );
    assert_eq!(caption(&test.server, &text), None);

    test.send(
        &alice,
        ClientRequest::SetProperty {
            path: text.clone(),
            property: "Caption".to_string(),
            value: Value::from("hello"),
        },
    );
    assert_eq!(caption(&test.server, &text), Some(Value::from("hello")));
}

#[test]
fn components_on_other_objects_are_refused() {
    let mut test = TestServer::new();
    let alice = test.connect();
    let bob = test.connect();
    let object = create_object(&mut test, &alice);

    let path = create_component(&mut test, &bob, &object, "Mesh");
    assert!(test.server.objects().get_component(&path).is_err());
    assert_items!(test.server, &bob, names::CREATE_REMOTE_COMPONENT, 0);
}

#[test]
fn destruction_uses_both_creators() {
    let mut test = TestServer::new();
    let alice = test.connect();
    let bob = test.connect();
    let object = create_object(&mut test, &alice);
    let server_mesh = test.server.spawn_component(&object, "Mesh").unwrap();

    // Alice owns the object but not the component.
    test.send(
        &alice,
        ClientRequest::DestroyComponent {
            path: server_mesh.clone(),
        },
    );
    assert!(test.server.objects().get_component(&server_mesh).is_ok());

    let text = create_component(&mut test, &alice, &object, "Text");
    test.send(&bob, ClientRequest::DestroyComponent { path: text.clone() });
    assert!(test.server.objects().get_component(&text).is_ok());
    test.send(&alice, ClientRequest::DestroyComponent { path: text.clone() });
    assert!(test.server.objects().get_component(&text).is_err());

    test.send(
        &bob,
        ClientRequest::DestroyObject {
            object: object.to_u64(),
        },
    );
    assert!(test.server.objects().has_object(&object));
}

#[test]
fn parenting_checks_each_side() {
    let mut test = TestServer::new();
    let alice = test.connect();
    let bob = test.connect();
    let parent = create_object(&mut test, &alice);
    let child = create_object(&mut test, &alice);
    let foreign = create_object(&mut test, &bob);

    test.send(
        &alice,
        ClientRequest::SetParent {
            object: child.to_u64(),
            parent: Some(parent.to_u64()),
        },
    );
    assert_eq!(
        test.server.objects().get_object(&child).unwrap().parent(),
        Some(parent)
    );

    assert_denied!(test.server.handle_request(
        &alice,
        ClientRequest::SetParent {
            object: child.to_u64(),
            parent: Some(foreign.to_u64()),
        },
    ));
    assert_denied!(test.server.handle_request(
        &bob,
        ClientRequest::SetParent {
            object: child.to_u64(),
            parent: None,
        },
    ));
    assert_eq!(
        test.server.objects().get_object(&child).unwrap().parent(),
        Some(parent)
    );
}
