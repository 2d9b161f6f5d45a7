pub mod assertions;
pub mod test_replica_host;
pub mod test_server;

pub use test_replica_host::TestReplicaHost;
pub use test_server::TestServer;
