use thiserror::Error;

use warrant_shared::{ConnectionId, PermissionError};

/// Errors that can occur while the server manages users, sessions and
/// replicated state
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ServerError {
    /// A user, group, session, object or component does not exist
    #[error("{item} '{name}' does not exist")]
    ItemNotFound { item: &'static str, name: String },

    /// A user, group, session or component was added twice
    #[error("{item} '{name}' already exists")]
    DuplicateItem { item: &'static str, name: String },

    /// The server was used before it was wired up, or a caller broke an invariant
    #[error("Invalid state: {context}")]
    InvalidState { context: String },

    /// A login named an unknown user or gave the wrong password
    #[error("Authentication failed for user '{user}'")]
    AuthenticationFailed { user: String },

    /// A client payload could not be decoded
    #[error("Malformed request from {connection}")]
    MalformedRequest { connection: ConnectionId },

    /// A permission lookup failed or a check refused the action
    #[error(transparent)]
    Permission(#[from] PermissionError),
}

impl ServerError {
    pub fn not_found(item: &'static str, name: impl Into<String>) -> Self {
        ServerError::ItemNotFound {
            item,
            name: name.into(),
        }
    }

    pub fn duplicate(item: &'static str, name: impl Into<String>) -> Self {
        ServerError::DuplicateItem {
            item,
            name: name.into(),
        }
    }

    /// True if this error is a refused permission check.
    pub fn is_denial(&self) -> bool {
        matches!(
            self,
            ServerError::Permission(PermissionError::PermissionDenied { .. })
        )
    }
}
