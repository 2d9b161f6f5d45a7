use warrant_shared::{Permission, PermissionError, PermissionSet, Value};

/// A named identity owning a table of permissions.
///
/// Guests are ephemeral copies of the guest template, created on connect and
/// discarded once the connection's replicated state is gone.
#[derive(Clone, Debug)]
pub struct User {
    name: String,
    password: String,
    guest: bool,
    permissions: PermissionSet,
}

impl User {
    pub fn new(name: &str, password: &str, guest: bool) -> Self {
        Self {
            name: name.to_string(),
            password: password.to_string(),
            guest,
            permissions: PermissionSet::new(),
        }
    }

    /// Deep-copies this user's policy table under a new name and password.
    /// The copy keeps the guest flag and starts with fresh counters.
    pub fn copy_as(&self, name: &str, password: &str) -> Self {
        Self {
            name: name.to_string(),
            password: password.to_string(),
            guest: self.guest,
            permissions: self.permissions.clone(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn is_guest(&self) -> bool {
        self.guest
    }

    pub fn check_password(&self, password: &str) -> bool {
        self.password == password
    }

    pub fn set_password(&mut self, password: &str) {
        self.password = password.to_string();
    }

    // Permissions

    pub fn add_permission(
        &mut self,
        name: &str,
        allowed: bool,
        max_items: u32,
        max_items_per_time: u32,
        time_seconds: f64,
    ) -> Result<&mut Permission, PermissionError> {
        self.permissions.add(
            Permission::new(name, allowed)
                .with_max_items(max_items)
                .with_rate(max_items_per_time, time_seconds),
        )
    }

    #[allow(clippy::too_many_arguments)]
    pub fn add_bounded_permission(
        &mut self,
        name: &str,
        allowed: bool,
        max_items: u32,
        max_items_per_time: u32,
        time_seconds: f64,
        lower_bounds: Option<Value>,
        upper_bounds: Option<Value>,
        adjust_bounds: bool,
    ) -> Result<&mut Permission, PermissionError> {
        self.permissions.add(
            Permission::new(name, allowed)
                .with_max_items(max_items)
                .with_rate(max_items_per_time, time_seconds)
                .with_bounds(lower_bounds, upper_bounds, adjust_bounds),
        )
    }

    /// Adds a copy of `permission` with fresh counters.
    pub fn add_permission_from(
        &mut self,
        permission: &Permission,
    ) -> Result<&mut Permission, PermissionError> {
        self.permissions.add(permission.clone())
    }

    pub fn get_permission(&self, name: &str) -> Result<&Permission, PermissionError> {
        self.permissions.get(name)
    }

    pub fn get_permission_mut(&mut self, name: &str) -> Result<&mut Permission, PermissionError> {
        self.permissions.get_mut(name)
    }

    pub fn has_permission(&self, name: &str) -> bool {
        self.permissions.has(name)
    }

    pub fn remove_permission(&mut self, name: &str) -> Result<(), PermissionError> {
        self.permissions.remove(name).map(|_| ())
    }

    pub fn permissions(&self) -> &PermissionSet {
        &self.permissions
    }

    pub(crate) fn permissions_mut(&mut self) -> &mut PermissionSet {
        &mut self.permissions
    }
}
