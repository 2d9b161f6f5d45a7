use thiserror::Error;

use warrant_shared::PermissionError;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ClientError {
    #[error("Malformed message from the server")]
    MalformedMessage,

    #[error(transparent)]
    Permission(#[from] PermissionError),
}
