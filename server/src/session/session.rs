use warrant_shared::ConnectionId;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SessionState {
    Active,
    /// The connection is gone, but replicas it created are still being
    /// destroyed. The bound guest user is kept alive until they are.
    PendingTeardown,
}

/// Binds a live connection to a user for the connection's lifetime.
///
/// The user is referenced by name; the `UserManager` owns it.
#[derive(Clone, Debug)]
pub struct Session {
    connection: ConnectionId,
    user: String,
    state: SessionState,
}

impl Session {
    pub(crate) fn new(connection: ConnectionId, user: &str) -> Self {
        Self {
            connection,
            user: user.to_string(),
            state: SessionState::Active,
        }
    }

    pub fn connection(&self) -> ConnectionId {
        self.connection
    }

    pub fn user(&self) -> &str {
        &self.user
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    pub fn is_active(&self) -> bool {
        self.state == SessionState::Active
    }

    pub(crate) fn set_user(&mut self, user: &str) {
        self.user = user.to_string();
    }

    pub(crate) fn begin_teardown(&mut self) {
        self.state = SessionState::PendingTeardown;
    }
}
