use std::collections::HashSet;

/// A named collection of user names.
#[derive(Clone, Debug, Default)]
pub struct Group {
    name: String,
    members: HashSet<String>,
}

impl Group {
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            members: HashSet::new(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns false if `user` was already a member.
    pub fn add_member(&mut self, user: &str) -> bool {
        self.members.insert(user.to_string())
    }

    pub fn remove_member(&mut self, user: &str) -> bool {
        self.members.remove(user)
    }

    pub fn has_member(&self, user: &str) -> bool {
        self.members.contains(user)
    }

    pub fn members(&self) -> impl Iterator<Item = &str> {
        self.members.iter().map(String::as_str)
    }
}
