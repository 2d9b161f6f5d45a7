use std::fmt;

use naia_serde::SerdeInternal;

/// Opaque identity of one live transport connection. Handed out by the
/// transport layer and only ever compared, hashed and printed here.
#[derive(PartialEq, Eq, Hash, Clone, Copy, Debug, PartialOrd, Ord)]
pub struct ConnectionId(u64);

impl ConnectionId {
    pub fn new(value: u64) -> Self {
        Self(value)
    }

    pub fn to_u64(&self) -> u64 {
        self.0
    }
}

impl fmt::Display for ConnectionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "conn#{}", self.0)
    }
}

/// Who authored a replicated entity.
#[derive(PartialEq, Eq, Hash, Clone, Copy, Debug)]
pub enum Origin {
    Server,
    Client(ConnectionId),
}

impl Origin {
    pub fn is_server(&self) -> bool {
        matches!(self, Origin::Server)
    }

    /// True when `connection` is the recorded creator.
    pub fn is(&self, connection: &ConnectionId) -> bool {
        match self {
            Origin::Server => false,
            Origin::Client(creator) => creator == connection,
        }
    }

    pub fn connection(&self) -> Option<ConnectionId> {
        match self {
            Origin::Server => None,
            Origin::Client(connection) => Some(*connection),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, SerdeInternal)]
pub enum NetworkingType {
    /// Lives only on the host that created it, never replicated.
    Local,
    /// Replicated to every peer under authority control.
    Remote,
}

impl NetworkingType {
    pub fn invert(self) -> Self {
        match self {
            NetworkingType::Local => NetworkingType::Remote,
            NetworkingType::Remote => NetworkingType::Local,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn origin_matches_only_its_creator() {
        let a = ConnectionId::new(1);
        let b = ConnectionId::new(2);

        assert!(Origin::Client(a).is(&a));
        assert!(!Origin::Client(a).is(&b));
        assert!(!Origin::Server.is(&a));
        assert_eq!(Origin::Client(b).connection(), Some(b));
        assert_eq!(Origin::Server.connection(), None);
    }

    #[test]
    fn networking_type_inverts() {
        assert_eq!(NetworkingType::Local.invert(), NetworkingType::Remote);
        assert_eq!(NetworkingType::Remote.invert(), NetworkingType::Local);
    }
}
