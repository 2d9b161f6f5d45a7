pub mod component;
pub mod object;
pub mod object_manager;
pub mod plugin;
pub mod replica;
