mod default_permissions;
mod permission_manager;

pub use permission_manager::PermissionManager;
