pub mod error;
pub mod names;
pub mod permission;
pub mod permission_result;
pub mod permission_set;
