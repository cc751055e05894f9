use std::collections::{HashMap, VecDeque};

use chrono::{DateTime, Utc};
use indexmap::IndexSet;
use serde::{Deserialize, Serialize};

use super::errors::SocialError;
use super::relations::{RelationKind, RelationSet};

/// One registered account: identity fields, the free-form attribute map,
/// every relationship collection, pending friend invites, community
/// memberships, and the two independent message queues.
///
/// The identity key is `login`, immutable after creation. `password` is
/// compared by exact equality at session open. The attribute names `login`,
/// `password`, and `name` are reserved and resolve to the identity fields
/// rather than the map.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserProfile {
    pub login: String,
    pub password: String,
    pub display_name: String,
    pub attributes: HashMap<String, String>,
    pub friends: RelationSet,
    pub fans: RelationSet,
    pub enemies: RelationSet,
    /// Users this profile declared as idols (inverse of their fan sets).
    pub idols: IndexSet<String>,
    pub crushes: IndexSet<String>,
    /// Logins that sent this user a friend request still awaiting acceptance.
    pub pending_invites: IndexSet<String>,
    /// Names of communities this user belongs to, in join order.
    pub communities: IndexSet<String>,
    pub direct_messages: VecDeque<String>,
    pub broadcasts: VecDeque<String>,
    pub created_at: DateTime<Utc>,
}

impl UserProfile {
    pub fn new(login: &str, password: &str, display_name: &str) -> Self {
        UserProfile {
            login: login.to_string(),
            password: password.to_string(),
            display_name: display_name.to_string(),
            attributes: HashMap::new(),
            friends: RelationSet::new(RelationKind::Friend),
            fans: RelationSet::new(RelationKind::Fan),
            enemies: RelationSet::new(RelationKind::Enemy),
            idols: IndexSet::new(),
            crushes: IndexSet::new(),
            pending_invites: IndexSet::new(),
            communities: IndexSet::new(),
            direct_messages: VecDeque::new(),
            broadcasts: VecDeque::new(),
            created_at: Utc::now(),
        }
    }

    /// Kind-addressed access to the relation sets.
    pub fn relation(&self, kind: RelationKind) -> &RelationSet {
        match kind {
            RelationKind::Friend => &self.friends,
            RelationKind::Fan => &self.fans,
            RelationKind::Enemy => &self.enemies,
        }
    }

    pub fn relation_mut(&mut self, kind: RelationKind) -> &mut RelationSet {
        match kind {
            RelationKind::Friend => &mut self.friends,
            RelationKind::Fan => &mut self.fans,
            RelationKind::Enemy => &mut self.enemies,
        }
    }

    /// Read an attribute. Reserved names resolve to the identity fields;
    /// anything else comes from the attribute map.
    pub fn attribute(&self, name: &str) -> Result<String, SocialError> {
        match name {
            "login" => Ok(self.login.clone()),
            "password" => Ok(self.password.clone()),
            "name" => Ok(self.display_name.clone()),
            _ => self
                .attributes
                .get(name)
                .cloned()
                .ok_or(SocialError::AttributeNotSet),
        }
    }

    /// Write an attribute. `password` and `name` write through to the
    /// identity fields so later reads and session opens see the new value;
    /// `login` is the registry key and stays immutable. Custom names upsert
    /// the map.
    pub fn set_attribute(&mut self, name: &str, value: &str) -> Result<(), SocialError> {
        match name {
            "login" => Err(SocialError::InvalidArgument("login is immutable")),
            "password" => {
                self.password = value.to_string();
                Ok(())
            }
            "name" => {
                self.display_name = value.to_string();
                Ok(())
            }
            _ => {
                self.attributes.insert(name.to_string(), value.to_string());
                Ok(())
            }
        }
    }

    /// Drop every edge referencing `login`: all three relation sets plus the
    /// idol, crush, and pending-invite entries.
    pub fn forget(&mut self, login: &str) {
        for kind in RelationKind::ALL {
            self.relation_mut(kind).remove(login);
        }
        self.idols.shift_remove(login);
        self.crushes.shift_remove(login);
        self.pending_invites.shift_remove(login);
    }

    /// Empty both message queues.
    pub fn clear_queues(&mut self) {
        self.direct_messages.clear();
        self.broadcasts.clear();
    }
}
