use std::collections::HashMap;

use log::{debug, info};

use warrant_shared::{
    BitWrite, ConnectionId, Permission, PermissionResult, Serde, ServerMessage, Value,
};

use crate::{
    error::ServerError,
    permission::default_permissions,
    server::ServerConfig,
    session::SessionManager,
    user::User,
};

/// The single point of contact between the authority layer and the
/// permission data.
///
/// Lookups resolve a connection to its session's user. Every successful
/// resolution is remembered, so a connection whose session is already gone
/// (a guest being torn down) still resolves to its user for as long as that
/// user exists.
pub struct PermissionManager {
    config: ServerConfig,
    sessions: Option<SessionManager>,
    user_cache: HashMap<ConnectionId, String>,
}

impl PermissionManager {
    pub fn new(config: &ServerConfig) -> Self {
        Self {
            config: config.clone(),
            sessions: None,
            user_cache: HashMap::new(),
        }
    }

    /// Wires the session manager in. Only the first call is accepted. Unless
    /// disabled in the config, the default table is written into the guest
    /// template.
    pub fn set_session_manager(&mut self, mut sessions: SessionManager) -> Result<(), ServerError> {
        if self.sessions.is_some() {
            return Err(ServerError::InvalidState {
                context: "the session manager is already set".to_string(),
            });
        }

        if self.config.install_default_permissions {
            let template = sessions.users_mut().guest_template_mut()?;
            default_permissions::install(template.permissions_mut(), &self.config);
            info!(
                "Installed {} default permissions on {}",
                template.permissions().len(),
                template.name()
            );
        }

        self.sessions = Some(sessions);
        Ok(())
    }

    pub fn has_session_manager(&self) -> bool {
        self.sessions.is_some()
    }

    pub fn sessions(&self) -> Result<&SessionManager, ServerError> {
        self.sessions.as_ref().ok_or_else(Self::not_wired)
    }

    pub fn sessions_mut(&mut self) -> Result<&mut SessionManager, ServerError> {
        self.sessions.as_mut().ok_or_else(Self::not_wired)
    }

    fn not_wired() -> ServerError {
        ServerError::InvalidState {
            context: "the session manager is not set".to_string(),
        }
    }

    // Resolution

    /// Name of the user `connection` acts as: its session's user, or the
    /// last user it resolved to.
    pub fn resolve_user_name(&mut self, connection: &ConnectionId) -> Result<String, ServerError> {
        let sessions = self.sessions.as_ref().ok_or_else(Self::not_wired)?;
        if let Ok(session) = sessions.get_session(connection) {
            let name = session.user().to_string();
            self.user_cache.insert(*connection, name.clone());
            return Ok(name);
        }

        self.user_cache
            .get(connection)
            .cloned()
            .ok_or_else(|| ServerError::not_found("Session", connection.to_string()))
    }

    pub fn resolve_user(&mut self, connection: &ConnectionId) -> Result<&mut User, ServerError> {
        let name = self.resolve_user_name(connection)?;
        self.sessions_mut()?.users_mut().get_user_mut(&name)
    }

    pub fn get_permission(
        &mut self,
        connection: &ConnectionId,
        name: &str,
    ) -> Result<&mut Permission, ServerError> {
        Ok(self.resolve_user(connection)?.get_permission_mut(name)?)
    }

    // Checks

    pub fn check_permission(
        &mut self,
        connection: &ConnectionId,
        name: &str,
    ) -> Result<PermissionResult, ServerError> {
        Ok(self.get_permission(connection, name)?.check_permission())
    }

    /// On `BoundsAdjusted`, `value` has been clamped in place.
    pub fn check_permission_value(
        &mut self,
        connection: &ConnectionId,
        name: &str,
        value: &mut Value,
    ) -> Result<PermissionResult, ServerError> {
        Ok(self
            .get_permission(connection, name)?
            .check_permission_value(value))
    }

    /// A failed lookup counts as a refusal.
    pub fn check_permission_allowed(&mut self, connection: &ConnectionId, name: &str) -> bool {
        match self.get_permission(connection, name) {
            Ok(permission) => permission.check_permission_allowed(),
            Err(error) => {
                debug!("{} refused {}: {}", connection, name, error);
                false
            }
        }
    }

    pub fn check_permission_value_allowed(
        &mut self,
        connection: &ConnectionId,
        name: &str,
        value: &mut Value,
    ) -> bool {
        match self.get_permission(connection, name) {
            Ok(permission) => permission.check_permission_value_allowed(value),
            Err(error) => {
                debug!("{} refused {}: {}", connection, name, error);
                false
            }
        }
    }

    pub fn check_permission_throws(
        &mut self,
        connection: &ConnectionId,
        name: &str,
        location: &str,
    ) -> Result<(), ServerError> {
        self.get_permission(connection, name)?
            .check_permission_throws(location)?;
        Ok(())
    }

    pub fn check_permission_throws_with(
        &mut self,
        connection: &ConnectionId,
        name: &str,
        description: &str,
        location: &str,
    ) -> Result<(), ServerError> {
        self.get_permission(connection, name)?
            .check_permission_throws_with(description, location)?;
        Ok(())
    }

    pub fn check_permission_value_throws(
        &mut self,
        connection: &ConnectionId,
        name: &str,
        value: &mut Value,
        location: &str,
    ) -> Result<PermissionResult, ServerError> {
        Ok(self
            .get_permission(connection, name)?
            .check_permission_value_throws(value, location)?)
    }

    // Counters

    pub fn add_item(&mut self, connection: &ConnectionId, name: &str) -> Result<u32, ServerError> {
        Ok(self.get_permission(connection, name)?.add_item()?)
    }

    pub fn remove_item(
        &mut self,
        connection: &ConnectionId,
        name: &str,
        remove_from_items_per_time: bool,
    ) -> Result<u32, ServerError> {
        Ok(self
            .get_permission(connection, name)?
            .remove_item(remove_from_items_per_time)?)
    }

    // Policy

    /// Updates `name` on `user`, or adds it. Existing counters are kept.
    pub fn set_permission(
        &mut self,
        user: &str,
        name: &str,
        allowed: bool,
        max_items: u32,
        max_items_per_time: u32,
        time_seconds: f64,
    ) -> Result<&mut Permission, ServerError> {
        let permission = Permission::new(name, allowed)
            .with_max_items(max_items)
            .with_rate(max_items_per_time, time_seconds);
        self.upsert(user, permission)
    }

    #[allow(clippy::too_many_arguments)]
    pub fn set_bounded_permission(
        &mut self,
        user: &str,
        name: &str,
        allowed: bool,
        max_items: u32,
        max_items_per_time: u32,
        time_seconds: f64,
        lower_bounds: Option<Value>,
        upper_bounds: Option<Value>,
        adjust_bounds: bool,
    ) -> Result<&mut Permission, ServerError> {
        let permission = Permission::new(name, allowed)
            .with_max_items(max_items)
            .with_rate(max_items_per_time, time_seconds)
            .with_bounds(lower_bounds, upper_bounds, adjust_bounds);
        self.upsert(user, permission)
    }

    fn upsert(&mut self, user: &str, permission: Permission) -> Result<&mut Permission, ServerError> {
        let user = self.sessions_mut()?.users_mut().get_user_mut(user)?;
        Ok(user.permissions_mut().upsert(permission))
    }

    // Construction

    /// Writes the policy of every permission `connection`'s user holds. The
    /// default guest table runs past one packet, so `writer` should be a
    /// [`FileBitWriter`](warrant_shared::FileBitWriter).
    pub fn serialize_construction(
        &mut self,
        connection: &ConnectionId,
        writer: &mut dyn BitWrite,
    ) -> Result<(), ServerError> {
        let user = self.resolve_user(connection)?;
        debug!(
            "Serializing {} permissions of {} for {}",
            user.permissions().len(),
            user.name(),
            connection
        );
        user.permissions().ser(writer);
        Ok(())
    }

    /// The capability envelope sent to `connection` on connect.
    pub fn construction_message(
        &mut self,
        connection: &ConnectionId,
    ) -> Result<ServerMessage, ServerError> {
        let user = self.resolve_user(connection)?;
        debug!(
            "Sending {} permissions of {} to {}",
            user.permissions().len(),
            user.name(),
            connection
        );
        Ok(ServerMessage::Permissions(user.permissions().clone()))
    }
}
