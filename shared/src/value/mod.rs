pub mod binding_type;
pub mod error;
pub mod value;
pub mod vector;
