use std::collections::{hash_map, HashMap};

use naia_serde::{BitReader, BitWrite, Serde, SerdeErr, UnsignedVariableInteger};

use crate::permission::{error::PermissionError, permission::Permission};

const ITEM: &str = "Permission";

/// A table of permissions keyed by their unique name.
///
/// On the wire this is the capability envelope a server sends to a newly
/// connected client: the entry count followed by every policy.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct PermissionSet {
    permissions: HashMap<String, Permission>,
}

impl PermissionSet {
    pub fn new() -> Self {
        Self {
            permissions: HashMap::new(),
        }
    }

    pub fn add(&mut self, permission: Permission) -> Result<&mut Permission, PermissionError> {
        match self.permissions.entry(permission.name().to_string()) {
            hash_map::Entry::Occupied(entry) => {
                Err(PermissionError::duplicate(ITEM, entry.key().clone()))
            }
            hash_map::Entry::Vacant(entry) => Ok(entry.insert(permission)),
        }
    }

    /// Adds `permission`, or replaces the policy of the existing entry with
    /// the same name while keeping its counters.
    pub fn upsert(&mut self, permission: Permission) -> &mut Permission {
        match self.permissions.entry(permission.name().to_string()) {
            hash_map::Entry::Occupied(entry) => {
                let existing = entry.into_mut();
                existing.set_policy_from(&permission);
                existing
            }
            hash_map::Entry::Vacant(entry) => entry.insert(permission),
        }
    }

    pub fn get(&self, name: &str) -> Result<&Permission, PermissionError> {
        self.permissions
            .get(name)
            .ok_or_else(|| PermissionError::not_found(ITEM, name))
    }

    pub fn get_mut(&mut self, name: &str) -> Result<&mut Permission, PermissionError> {
        self.permissions
            .get_mut(name)
            .ok_or_else(|| PermissionError::not_found(ITEM, name))
    }

    pub fn has(&self, name: &str) -> bool {
        self.permissions.contains_key(name)
    }

    pub fn remove(&mut self, name: &str) -> Result<Permission, PermissionError> {
        self.permissions
            .remove(name)
            .ok_or_else(|| PermissionError::not_found(ITEM, name))
    }

    pub fn len(&self) -> usize {
        self.permissions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.permissions.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Permission> {
        self.permissions.values()
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.permissions.keys().map(String::as_str)
    }
}

impl Serde for PermissionSet {
    fn ser(&self, writer: &mut dyn BitWrite) {
        UnsignedVariableInteger::<9>::new(self.permissions.len() as u64).ser(writer);
        for permission in self.permissions.values() {
            permission.ser(writer);
        }
    }

    fn de(reader: &mut BitReader) -> Result<Self, SerdeErr> {
        let count: u64 = UnsignedVariableInteger::<9>::de(reader)?.to();
        let mut set = PermissionSet::new();
        for _ in 0..count {
            let permission = Permission::de(reader)?;
            // Names are unique when written; a repeat means a corrupt payload.
            set.add(permission).map_err(|_| SerdeErr)?;
        }
        Ok(set)
    }

    fn bit_length(&self) -> u32 {
        let mut output =
            UnsignedVariableInteger::<9>::new(self.permissions.len() as u64).bit_length();
        for permission in self.permissions.values() {
            output += permission.bit_length();
        }
        output
    }
}
