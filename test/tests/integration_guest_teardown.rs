/// Integration tests for guest session teardown
/// A guest user must outlive every replica its connection created, and be
/// gone as soon as the last one is.

use warrant_server::{ObjectKey, ReplicaKey, ServerError, SessionEvent, SessionManager, UserManager};
use warrant_shared::{names, ClientRequest, ConnectionId, NetworkingType};
use warrant_test::{TestReplicaHost, TestServer};

fn init_logger() {
    let _ = env_logger::builder().is_test(true).try_init();
}

#[test]
fn guest_survives_until_every_replica_is_gone() {
    init_logger();
    let connection = ConnectionId::new(1);
    let mut sessions = SessionManager::new(UserManager::new());
    let guest = sessions.users_mut().create_guest().unwrap();
    sessions.add_session(connection, &guest).unwrap();

    let mut host = TestReplicaHost::new(1);
    host.spawn(connection, ReplicaKey::Object(ObjectKey::new(1)));
    host.spawn(connection, ReplicaKey::Object(ObjectKey::new(2)));
    host.spawn(
        connection,
        ReplicaKey::Component(ObjectKey::new(2), "Mesh".to_string()),
    );
    host.spawn(ConnectionId::new(2), ReplicaKey::Object(ObjectKey::new(3)));

    sessions.remove_session(&connection, &mut host).unwrap();

    for remaining in (1..=3).rev() {
        assert_eq!(host.live_count(&connection), remaining);
        sessions.update(&host);
        assert!(
            sessions.users().get_user(&guest).is_ok(),
            "guest removed with {} replicas alive",
            remaining
        );
        host.tick();
    }

    sessions.update(&host);
    assert!(matches!(
        sessions.users().get_user(&guest),
        Err(ServerError::ItemNotFound { .. })
    ));
    assert!(sessions.is_idle());
    assert_eq!(host.live_count(&ConnectionId::new(2)), 1);
    assert_eq!(
        sessions.take_events().last(),
        Some(&SessionEvent::Removed {
            connection,
            user: guest,
        })
    );
}

#[test]
fn disconnect_destroys_only_the_guests_replicas() {
    init_logger();
    let mut test = TestServer::new();
    let leaving = test.connect();
    let staying = test.connect();

    for connection in [&leaving, &staying] {
        test.send(
            connection,
            ClientRequest::CreateObject {
                name: "crate".to_string(),
                networking_type: NetworkingType::Remote,
            },
        );
    }
    assert_eq!(test.server.objects().objects().count(), 2);

    test.disconnect(&leaving);
    // Destruction is pending; lookups still resolve to the guest.
    assert_eq!(
        test.server
            .permissions_mut()
            .get_permission(&leaving, names::CREATE_REMOTE_OBJECT)
            .unwrap()
            .current_items(),
        1
    );
    assert!(test.server.users().unwrap().has_user("Guest0"));

    test.tick();
    assert_eq!(test.server.objects().objects().count(), 1);
    assert!(!test.server.users().unwrap().has_user("Guest0"));
    assert!(test.server.users().unwrap().has_user("Guest1"));
    assert!(test
        .server
        .permissions_mut()
        .get_permission(&leaving, names::CREATE_REMOTE_OBJECT)
        .is_err());
}

#[test]
fn disconnecting_twice_is_harmless() {
    let mut test = TestServer::new();
    let connection = test.connect();
    test.send(
        &connection,
        ClientRequest::CreateObject {
            name: "crate".to_string(),
            networking_type: NetworkingType::Remote,
        },
    );

    test.server.disconnect(&connection).unwrap();
    test.server.disconnect(&connection).unwrap();
    test.tick();

    assert!(matches!(
        test.server.disconnect(&connection),
        Err(ServerError::ItemNotFound { .. })
    ));
}
