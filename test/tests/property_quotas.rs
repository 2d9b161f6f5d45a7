/// PROPERTY-BASED TESTS: quotas seen through the request boundary
///
/// Key invariants:
/// 1. A quota of N lets exactly N remote objects exist per guest
/// 2. Refused requests never move a counter
/// 3. Destroying an object frees its slot

use proptest::prelude::*;
use warrant_server::ServerConfig;
use warrant_shared::{names, ClientRequest, NetworkingType};
use warrant_test::TestServer;

fn create() -> ClientRequest {
    ClientRequest::CreateObject {
        name: "crate".to_string(),
        networking_type: NetworkingType::Remote,
    }
}

proptest! {
    #[test]
    fn prop_object_quota_is_exact(quota in 1u32..24, extra in 1usize..8) {
        let mut test = TestServer::with_config(ServerConfig {
            max_remote_objects: quota,
            ..ServerConfig::default()
        });
        let connection = test.connect();

        for _ in 0..(quota as usize + extra) {
            test.send(&connection, create());
        }
        prop_assert_eq!(test.server.objects().objects().count(), quota as usize);
        prop_assert_eq!(
            test.server
                .permissions_mut()
                .get_permission(&connection, names::CREATE_REMOTE_OBJECT)
                .unwrap()
                .current_items(),
            quota
        );

        let first = test.server.objects().objects().next().unwrap().key();
        test.send(&connection, ClientRequest::DestroyObject { object: first.to_u64() });
        test.send(&connection, create());
        prop_assert_eq!(test.server.objects().objects().count(), quota as usize);
    }

    #[test]
    fn prop_quotas_are_per_guest(quota in 1u32..8, guests in 2usize..5) {
        let mut test = TestServer::with_config(ServerConfig {
            max_remote_objects: quota,
            ..ServerConfig::default()
        });
        let connections: Vec<_> = (0..guests).map(|_| test.connect()).collect();

        for connection in &connections {
            for _ in 0..=quota {
                test.send(connection, create());
            }
        }
        prop_assert_eq!(
            test.server.objects().objects().count(),
            quota as usize * guests
        );
    }
}
