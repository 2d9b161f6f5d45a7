use std::fmt;

use warrant_shared::ConnectionId;

/// Network id of a replicated object.
#[derive(PartialEq, Eq, Hash, Clone, Copy, Debug, PartialOrd, Ord)]
pub struct ObjectKey(u64);

impl ObjectKey {
    pub fn new(value: u64) -> Self {
        Self(value)
    }

    pub fn to_u64(&self) -> u64 {
        self.0
    }
}

impl fmt::Display for ObjectKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "object#{}", self.0)
    }
}

/// Any replicated entity. Components are addressed by their object and
/// type name.
#[derive(PartialEq, Eq, Hash, Clone, Debug)]
pub enum ReplicaKey {
    Object(ObjectKey),
    Component(ObjectKey, String),
}

/// The replication layer as seen by session teardown.
pub trait ReplicaHost {
    /// Every live object and component whose recorded creator is `connection`.
    fn replicas_created_by(&self, connection: &ConnectionId) -> Vec<ReplicaKey>;

    /// Starts destroying `replica`. Destruction may complete on a later tick.
    fn request_destroy(&mut self, replica: &ReplicaKey);
}
