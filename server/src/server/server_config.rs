use std::default::Default;

use crate::user::DEFAULT_GUEST_TEMPLATE;

/// Contains Config properties which will be used by the Server
#[derive(Clone)]
pub struct ServerConfig {
    /// Name of the template user every guest is copied from.
    pub guest_template: String,
    /// Determines whether the default guest permission table is installed
    /// when the permission manager is wired up.
    pub install_default_permissions: bool,
    /// Remote objects a single guest may own at once.
    pub max_remote_objects: u32,
    /// Remote components a single guest may own at once.
    pub max_remote_components: u32,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            guest_template: DEFAULT_GUEST_TEMPLATE.to_string(),
            install_default_permissions: true,
            max_remote_objects: 300,
            max_remote_components: 900,
        }
    }
}
