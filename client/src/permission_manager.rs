use log::debug;

use warrant_shared::{
    BitReader, Permission, PermissionError, PermissionResult, PermissionSet, Serde, SerdeErr,
    Value,
};

use crate::client_config::ClientConfig;

/// The client's copy of its own permission table, as sent by the server on
/// connect. Checks run locally so the client can refuse an action before
/// proposing it; the server still has the final word.
pub struct PermissionManager {
    offline_mode: bool,
    permissions: PermissionSet,
}

impl PermissionManager {
    pub fn new(config: &ClientConfig) -> Self {
        Self {
            offline_mode: config.offline_mode,
            permissions: PermissionSet::new(),
        }
    }

    pub fn is_offline_mode(&self) -> bool {
        self.offline_mode
    }

    /// Replaces the whole table.
    pub fn set_permissions(&mut self, permissions: PermissionSet) {
        self.permissions = permissions;
    }

    /// Reads the table written by the server's construction handshake.
    pub fn read_construction(&mut self, reader: &mut BitReader) -> Result<(), SerdeErr> {
        let permissions = PermissionSet::de(reader)?;
        debug!("Receiving {} permissions from server", permissions.len());
        for permission in permissions.iter() {
            debug!(
                "{} allowed: {} max items: {} time: {}",
                permission.name(),
                permission.is_allowed(),
                permission.max_items(),
                permission.time_seconds()
            );
        }
        self.set_permissions(permissions);
        Ok(())
    }

    pub fn permissions(&self) -> &PermissionSet {
        &self.permissions
    }

    pub fn add_permission(
        &mut self,
        permission: Permission,
    ) -> Result<&mut Permission, PermissionError> {
        self.permissions.add(permission)
    }

    /// In offline mode a missing permission is created as allowed.
    pub fn get_permission(&mut self, name: &str) -> Result<&mut Permission, PermissionError> {
        if self.offline_mode && !self.permissions.has(name) {
            return self.permissions.add(Permission::new(name, true));
        }
        self.permissions.get_mut(name)
    }

    pub fn has_permission(&self, name: &str) -> bool {
        self.permissions.has(name)
    }

    pub fn remove_permission(&mut self, name: &str) -> Result<Permission, PermissionError> {
        self.permissions.remove(name)
    }

    // Checks. Offline, every one of them passes.

    pub fn check_permission(&mut self, name: &str) -> Result<PermissionResult, PermissionError> {
        if self.offline_mode {
            return Ok(PermissionResult::Allowed);
        }
        Ok(self.get_permission(name)?.check_permission())
    }

    pub fn check_permission_value(
        &mut self,
        name: &str,
        value: &mut Value,
    ) -> Result<PermissionResult, PermissionError> {
        if self.offline_mode {
            return Ok(PermissionResult::Allowed);
        }
        Ok(self.get_permission(name)?.check_permission_value(value))
    }

    /// A missing permission counts as a refusal.
    pub fn check_permission_allowed(&mut self, name: &str) -> bool {
        if self.offline_mode {
            return true;
        }
        self.get_permission(name)
            .map(|permission| permission.check_permission_allowed())
            .unwrap_or(false)
    }

    pub fn check_permission_value_allowed(&mut self, name: &str, value: &mut Value) -> bool {
        if self.offline_mode {
            return true;
        }
        self.get_permission(name)
            .map(|permission| permission.check_permission_value_allowed(value))
            .unwrap_or(false)
    }

    pub fn check_permission_throws(
        &mut self,
        name: &str,
        location: &str,
    ) -> Result<(), PermissionError> {
        if self.offline_mode {
            return Ok(());
        }
        self.get_permission(name)?.check_permission_throws(location)
    }

    pub fn check_permission_value_throws(
        &mut self,
        name: &str,
        value: &mut Value,
        location: &str,
    ) -> Result<PermissionResult, PermissionError> {
        if self.offline_mode {
            return Ok(PermissionResult::Allowed);
        }
        self.get_permission(name)?
            .check_permission_value_throws(value, location)
    }
}
