//! # Warrant Shared
//! Common functionality shared between warrant-server & warrant-client crates:
//! the permission engine, dynamically typed property values, and the wire
//! messages exchanged between the two.

#![deny(trivial_numeric_casts, unstable_features, unused_import_braces)]

#[macro_use]
extern crate cfg_if;

cfg_if! {
    if #[cfg(all(target_arch = "wasm32", not(feature = "wbindgen")))]
    {
        compile_error!("wasm target for 'warrant_shared' crate requires the 'wbindgen' feature to be enabled.");
    }
}

pub use naia_serde::{
    BitReader, BitWrite, BitWriter, ConstBitLength, FileBitWriter, Serde, SerdeErr,
    UnsignedInteger, UnsignedVariableInteger, MTU_SIZE_BITS,
};

mod backends;
mod messages;
mod permission;
mod types;
mod value;

pub use backends::Instant;
pub use messages::{
    client_request::{ClientRequest, ReplicaPath},
    server_message::ServerMessage,
};
pub use permission::{
    error::{DenialKind, PermissionError},
    names::{self, Ownership},
    permission::{Permission, DEFAULT_TIME_SECONDS, UNLIMITED_ITEMS},
    permission_result::PermissionResult,
    permission_set::PermissionSet,
};
pub use types::{ConnectionId, NetworkingType, Origin};
pub use value::{
    binding_type::BindingType,
    error::ValueError,
    value::Value,
    vector::{Colour, Vector2, Vector3, Vector4},
};
