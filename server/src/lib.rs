//! # Warrant Server
//! The authoritative side of a permission-gated replication model: users,
//! guests and sessions, the per-connection permission lookup, and the
//! authority hooks that decide whether a client may create, change or
//! destroy replicated objects and components.

#![deny(
    trivial_casts,
    trivial_numeric_casts,
    unstable_features,
    unused_import_braces
)]

pub mod shared {
    pub use warrant_shared::{
        names, BitReader, BitWrite, BitWriter, ClientRequest, ConnectionId, FileBitWriter,
        NetworkingType, Origin, Ownership, Permission, PermissionError, PermissionResult,
        PermissionSet, ReplicaPath, Serde, SerdeErr, ServerMessage, Value,
    };
}

mod error;
mod permission;
mod server;
mod session;
mod user;
mod world;

pub use error::ServerError;
pub use permission::PermissionManager;
pub use server::{Server, ServerConfig};
pub use session::{Session, SessionEvent, SessionManager, SessionState};
pub use user::{Group, User, UserManager, DEFAULT_GUEST_TEMPLATE};
pub use world::{
    component::ServerComponent,
    object::ServerObject,
    object_manager::ObjectManager,
    plugin::{PluginManager, ServerPlugin},
    replica::{ObjectKey, ReplicaHost, ReplicaKey},
};
