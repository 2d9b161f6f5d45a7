use std::{
    collections::{BTreeSet, HashMap},
    mem,
};

use log::{debug, info, warn};

use warrant_shared::ConnectionId;

use crate::{
    error::ServerError,
    session::session::{Session, SessionState},
    user::{User, UserManager},
    world::replica::{ReplicaHost, ReplicaKey},
};

/// Emitted when a session is created or finally removed.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SessionEvent {
    Added {
        connection: ConnectionId,
        user: String,
    },
    Removed {
        connection: ConnectionId,
        user: String,
    },
}

/// Owns every session and the `UserManager` behind them.
///
/// Removing a registered user's session is immediate. Removing a guest's
/// session destroys the replicas the connection created and parks the
/// session in `PendingTeardown`; [`update`](SessionManager::update) finishes
/// the job once the replication layer reports none of them left. The guest
/// user is never dropped while one of its replicas is alive.
pub struct SessionManager {
    users: UserManager,
    sessions: HashMap<ConnectionId, Session>,
    pending_teardown: BTreeSet<ConnectionId>,
    events: Vec<SessionEvent>,
}

impl SessionManager {
    pub fn new(users: UserManager) -> Self {
        Self {
            users,
            sessions: HashMap::new(),
            pending_teardown: BTreeSet::new(),
            events: Vec::new(),
        }
    }

    pub fn users(&self) -> &UserManager {
        &self.users
    }

    pub fn users_mut(&mut self) -> &mut UserManager {
        &mut self.users
    }

    // Sessions

    /// Binds `connection` to the existing user `user`.
    pub fn add_session(
        &mut self,
        connection: ConnectionId,
        user: &str,
    ) -> Result<&Session, ServerError> {
        if self.sessions.contains_key(&connection) {
            return Err(ServerError::duplicate("Session", connection.to_string()));
        }
        if !self.users.has_user(user) {
            return Err(ServerError::not_found("User", user));
        }

        info!("Session added: {} as {}", connection, user);
        self.events.push(SessionEvent::Added {
            connection,
            user: user.to_string(),
        });
        Ok(self
            .sessions
            .entry(connection)
            .or_insert_with(|| Session::new(connection, user)))
    }

    pub fn get_session(&self, connection: &ConnectionId) -> Result<&Session, ServerError> {
        self.sessions
            .get(connection)
            .ok_or_else(|| ServerError::not_found("Session", connection.to_string()))
    }

    pub fn has_session(&self, connection: &ConnectionId) -> bool {
        self.sessions.contains_key(connection)
    }

    pub fn sessions(&self) -> impl Iterator<Item = &Session> {
        self.sessions.values()
    }

    /// The user bound to `connection`'s session.
    pub fn user_of(&self, connection: &ConnectionId) -> Result<&User, ServerError> {
        let session = self.get_session(connection)?;
        self.users.get_user(session.user())
    }

    pub fn user_of_mut(&mut self, connection: &ConnectionId) -> Result<&mut User, ServerError> {
        let name = self.get_session(connection)?.user().to_string();
        self.users.get_user_mut(&name)
    }

    /// Rebinds an active session to another existing user and returns the
    /// previous user's name.
    pub(crate) fn rebind(
        &mut self,
        connection: &ConnectionId,
        user: &str,
    ) -> Result<String, ServerError> {
        if !self.users.has_user(user) {
            return Err(ServerError::not_found("User", user));
        }
        let session = self
            .sessions
            .get_mut(connection)
            .ok_or_else(|| ServerError::not_found("Session", connection.to_string()))?;
        if !session.is_active() {
            return Err(ServerError::InvalidState {
                context: format!("{} is being torn down", connection),
            });
        }

        let previous = session.user().to_string();
        session.set_user(user);
        info!("Session {} rebound from {} to {}", connection, previous, user);
        Ok(previous)
    }

    /// Ends `connection`'s session. See the type docs for the guest path.
    /// Removing a session that is already being torn down does nothing.
    pub fn remove_session(
        &mut self,
        connection: &ConnectionId,
        host: &mut dyn ReplicaHost,
    ) -> Result<(), ServerError> {
        let session = self.get_session(connection)?;
        if session.state() == SessionState::PendingTeardown {
            return Ok(());
        }

        let user = self.users.get_user(session.user())?;
        if !user.is_guest() {
            if let Some(session) = self.sessions.remove(connection) {
                info!("Session removed: {} as {}", connection, session.user());
                self.events.push(SessionEvent::Removed {
                    connection: *connection,
                    user: session.user().to_string(),
                });
            }
            return Ok(());
        }

        // Objects first; destroying an object takes its components with it.
        let mut replicas = host.replicas_created_by(connection);
        replicas.sort_by_key(|replica| matches!(replica, ReplicaKey::Component(..)));
        info!(
            "Guest session {} disconnected, destroying {} replicas",
            connection,
            replicas.len()
        );
        for replica in &replicas {
            host.request_destroy(replica);
        }

        if let Some(session) = self.sessions.get_mut(connection) {
            session.begin_teardown();
        }
        self.pending_teardown.insert(*connection);
        Ok(())
    }

    /// Removes every session through [`remove_session`](Self::remove_session).
    pub fn clear(&mut self, host: &mut dyn ReplicaHost) -> Result<(), ServerError> {
        let connections: Vec<ConnectionId> = self.sessions.keys().copied().collect();
        for connection in connections {
            self.remove_session(&connection, host)?;
        }
        Ok(())
    }

    /// Per-tick teardown pass. Finalizes every pending guest whose
    /// connection no longer owns any replica.
    pub fn update(&mut self, host: &dyn ReplicaHost) {
        if self.is_idle() {
            return;
        }

        let pending = mem::take(&mut self.pending_teardown);
        for connection in pending {
            let remaining = host.replicas_created_by(&connection).len();
            if remaining > 0 {
                debug!(
                    "Guest session {} still owns {} replicas",
                    connection, remaining
                );
                self.pending_teardown.insert(connection);
                continue;
            }
            self.finish_teardown(&connection);
        }
    }

    fn finish_teardown(&mut self, connection: &ConnectionId) {
        let Some(session) = self.sessions.remove(connection) else {
            warn!("Pending teardown for unknown session {}", connection);
            return;
        };

        if let Err(error) = self.users.remove_user(session.user()) {
            warn!(
                "Could not remove guest {} of {}: {}",
                session.user(),
                connection,
                error
            );
        }
        info!(
            "Guest session {} torn down, user {} removed",
            connection,
            session.user()
        );
        self.events.push(SessionEvent::Removed {
            connection: *connection,
            user: session.user().to_string(),
        });
    }

    /// True when no guest teardown is pending and `update` has nothing to do.
    pub fn is_idle(&self) -> bool {
        self.pending_teardown.is_empty()
    }

    pub fn is_pending_teardown(&self, connection: &ConnectionId) -> bool {
        self.pending_teardown.contains(connection)
    }

    pub fn take_events(&mut self) -> Vec<SessionEvent> {
        mem::take(&mut self.events)
    }
}
