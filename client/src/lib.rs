//! # Warrant Client
//! Receives the permission table the server grants this connection, checks
//! actions against it before proposing them, and turns server messages into
//! events.

#![deny(
    trivial_casts,
    trivial_numeric_casts,
    unstable_features,
    unused_import_braces
)]

#[macro_use]
extern crate cfg_if;

cfg_if! {
    if #[cfg(all(target_arch = "wasm32", not(feature = "wbindgen")))]
    {
        compile_error!("wasm target for 'warrant_client' crate requires the 'wbindgen' feature to be enabled.");
    }
}

pub mod shared {
    pub use warrant_shared::{
        names, BitReader, BitWrite, BitWriter, ClientRequest, FileBitWriter, NetworkingType,
        Permission, PermissionError, PermissionResult, PermissionSet, ReplicaPath, Serde,
        SerdeErr, ServerMessage, Value,
    };
}

mod client;
mod client_config;
mod error;
mod permission_manager;

pub use client::{Client, ClientEvent};
pub use client_config::ClientConfig;
pub use error::ClientError;
pub use permission_manager::PermissionManager;
