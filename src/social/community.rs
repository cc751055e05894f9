use chrono::{DateTime, Utc};
use indexmap::IndexSet;
use serde::{Deserialize, Serialize};

use super::errors::SocialError;

/// A named group with an owner, a description, and an insertion-ordered
/// member set.
///
/// The owner is the first member and remains one for the community's whole
/// lifetime; communities disappear only when their owner's account is
/// deleted.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Community {
    pub name: String,
    pub description: String,
    pub owner: String,
    pub members: IndexSet<String>,
    pub created_at: DateTime<Utc>,
}

impl Community {
    pub fn new(name: &str, description: &str, owner: &str) -> Self {
        let mut members = IndexSet::new();
        members.insert(owner.to_string());
        Community {
            name: name.to_string(),
            description: description.to_string(),
            owner: owner.to_string(),
            members,
            created_at: Utc::now(),
        }
    }

    /// Add a member, failing when the login already belongs.
    pub fn add_member(&mut self, login: &str) -> Result<(), SocialError> {
        if !self.members.insert(login.to_string()) {
            return Err(SocialError::AlreadyMember);
        }
        Ok(())
    }

    /// Remove a member if present, preserving the order of the rest.
    pub fn remove_member(&mut self, login: &str) -> bool {
        self.members.shift_remove(login)
    }

    pub fn is_member(&self, login: &str) -> bool {
        self.members.contains(login)
    }
}
