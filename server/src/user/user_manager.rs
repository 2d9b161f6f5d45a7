use std::collections::HashMap;

use log::debug;

use crate::{
    error::ServerError,
    user::{group::Group, user::User},
};

pub const DEFAULT_GUEST_TEMPLATE: &str = "Guest";

/// Owns every registered user, every live guest and every group.
///
/// The guest template is an ordinary user flagged as guest. Each call to
/// [`create_guest`](UserManager::create_guest) deep-copies it under a fresh
/// name.
pub struct UserManager {
    users: HashMap<String, User>,
    groups: HashMap<String, Group>,
    guest_template: String,
    guest_counter: u64,
}

impl UserManager {
    pub fn new() -> Self {
        Self::with_guest_template(DEFAULT_GUEST_TEMPLATE)
    }

    pub fn with_guest_template(guest_template: &str) -> Self {
        let mut users = HashMap::new();
        users.insert(
            guest_template.to_string(),
            User::new(guest_template, "", true),
        );

        Self {
            users,
            groups: HashMap::new(),
            guest_template: guest_template.to_string(),
            guest_counter: 0,
        }
    }

    pub fn guest_template_name(&self) -> &str {
        &self.guest_template
    }

    pub fn guest_template(&self) -> Result<&User, ServerError> {
        self.get_user(&self.guest_template)
    }

    pub fn guest_template_mut(&mut self) -> Result<&mut User, ServerError> {
        let name = self.guest_template.clone();
        self.get_user_mut(&name)
    }

    // Users

    pub fn add_user(&mut self, name: &str, password: &str) -> Result<&mut User, ServerError> {
        if self.users.contains_key(name) {
            return Err(ServerError::duplicate("User", name));
        }
        debug!("Adding user {}", name);
        Ok(self
            .users
            .entry(name.to_string())
            .or_insert_with(|| User::new(name, password, false)))
    }

    pub fn get_user(&self, name: &str) -> Result<&User, ServerError> {
        self.users
            .get(name)
            .ok_or_else(|| ServerError::not_found("User", name))
    }

    pub fn get_user_mut(&mut self, name: &str) -> Result<&mut User, ServerError> {
        self.users
            .get_mut(name)
            .ok_or_else(|| ServerError::not_found("User", name))
    }

    pub fn has_user(&self, name: &str) -> bool {
        self.users.contains_key(name)
    }

    pub fn remove_user(&mut self, name: &str) -> Result<User, ServerError> {
        if name == self.guest_template {
            return Err(ServerError::InvalidState {
                context: format!("the guest template '{}' cannot be removed", name),
            });
        }
        let user = self
            .users
            .remove(name)
            .ok_or_else(|| ServerError::not_found("User", name))?;
        for group in self.groups.values_mut() {
            group.remove_member(name);
        }
        debug!("Removed user {}", name);
        Ok(user)
    }

    /// Copies the guest template under the next free `Guest<N>` name and
    /// returns that name.
    pub fn create_guest(&mut self) -> Result<String, ServerError> {
        let mut name = format!("{}{}", self.guest_template, self.guest_counter);
        while self.users.contains_key(&name) {
            self.guest_counter += 1;
            name = format!("{}{}", self.guest_template, self.guest_counter);
        }
        let guest = self.guest_template()?.copy_as(&name, "");
        self.guest_counter += 1;

        debug!("Created guest user {}", name);
        self.users.insert(name.clone(), guest);
        Ok(name)
    }

    pub fn users(&self) -> impl Iterator<Item = &User> {
        self.users.values()
    }

    // Groups

    pub fn add_group(&mut self, name: &str) -> Result<&mut Group, ServerError> {
        if self.groups.contains_key(name) {
            return Err(ServerError::duplicate("Group", name));
        }
        Ok(self
            .groups
            .entry(name.to_string())
            .or_insert_with(|| Group::new(name)))
    }

    pub fn get_group(&self, name: &str) -> Result<&Group, ServerError> {
        self.groups
            .get(name)
            .ok_or_else(|| ServerError::not_found("Group", name))
    }

    pub fn get_group_mut(&mut self, name: &str) -> Result<&mut Group, ServerError> {
        self.groups
            .get_mut(name)
            .ok_or_else(|| ServerError::not_found("Group", name))
    }

    pub fn has_group(&self, name: &str) -> bool {
        self.groups.contains_key(name)
    }

    pub fn remove_group(&mut self, name: &str) -> Result<Group, ServerError> {
        self.groups
            .remove(name)
            .ok_or_else(|| ServerError::not_found("Group", name))
    }
}

impl Default for UserManager {
    fn default() -> Self {
        Self::new()
    }
}
