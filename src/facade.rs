//! # Application Facade
//!
//! [`Facade`] is the single entry point callers use: it owns the
//! [`SocialGraph`] and its [`SnapshotStore`], applies every operation to the
//! in-memory graph first, and then persists a fresh snapshot. Persistence is
//! best-effort by design: a failed save is logged and the in-memory mutation
//! stands, so a full disk degrades durability but never correctness.
//!
//! The facade also owns presentation concerns: mapping [`SocialError`] values
//! to the fixed user-facing sentences and rendering ordered name sets in the
//! `{a,b,c}` wire shape.

use anyhow::Result;
use log::{debug, info, warn};

use crate::config::Config;
use crate::logutil::escape_log;
use crate::social::{SocialError, SocialGraph};
use crate::storage::SnapshotStore;

/// Point-in-time counts for the `status` command.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StatusSummary {
    pub users: usize,
    pub communities: usize,
    pub sessions: usize,
}

/// Owns the graph and its snapshot store; every mutation writes through.
pub struct Facade {
    graph: SocialGraph,
    store: SnapshotStore,
}

impl Facade {
    /// Open the facade against the configured snapshot file, restoring
    /// whatever state the last run left behind.
    pub async fn open(config: &Config) -> Result<Self> {
        let store = SnapshotStore::new(&config.storage.data_file);
        let graph = store.load().await?;
        info!(
            "facade open: {} users, {} communities, {} sessions",
            graph.user_count(),
            graph.community_count(),
            graph.session_count()
        );
        Ok(Facade { graph, store })
    }

    /// Assemble a facade from parts. Used by tests and the export path.
    pub fn with_store(graph: SocialGraph, store: SnapshotStore) -> Self {
        Facade { graph, store }
    }

    pub fn graph(&self) -> &SocialGraph {
        &self.graph
    }

    pub fn status(&self) -> StatusSummary {
        StatusSummary {
            users: self.graph.user_count(),
            communities: self.graph.community_count(),
            sessions: self.graph.session_count(),
        }
    }

    /// Write the current graph out. Failures are logged, not propagated; the
    /// in-memory state is already updated and stays authoritative.
    async fn persist(&self) {
        if let Err(e) = self.store.save(&self.graph).await {
            warn!("Failed to persist snapshot: {}", e);
        }
    }

    // ---- accounts and sessions ----

    pub async fn register(
        &mut self,
        login: &str,
        password: &str,
        name: &str,
    ) -> Result<(), SocialError> {
        self.graph.register(login, password, name)?;
        info!("registered user {}", escape_log(login));
        self.persist().await;
        Ok(())
    }

    pub async fn login(&mut self, login: &str, password: &str) -> Result<String, SocialError> {
        let token = self.graph.open_session(login, password)?;
        debug!("session opened for {}", escape_log(login));
        self.persist().await;
        Ok(token)
    }

    pub fn session_user(&self, token: &str) -> Result<String, SocialError> {
        Ok(self.graph.session_user(token)?.to_string())
    }

    pub async fn delete_account(&mut self, token: &str) -> Result<(), SocialError> {
        let login = self.session_user(token)?;
        self.graph.delete_account(token)?;
        info!("deleted account {}", escape_log(&login));
        self.persist().await;
        Ok(())
    }

    /// Drop every user, session, and community and remove the snapshot.
    pub async fn reset(&mut self) -> Result<()> {
        self.graph.reset();
        self.store.clear().await?;
        info!("state reset; snapshot removed");
        Ok(())
    }

    // ---- profile attributes ----

    pub fn attribute(&self, login: &str, name: &str) -> Result<String, SocialError> {
        self.graph.attribute(login, name)
    }

    pub async fn set_attribute(
        &mut self,
        token: &str,
        name: &str,
        value: &str,
    ) -> Result<(), SocialError> {
        self.graph.set_attribute(token, name, value)?;
        debug!("attribute {} updated to {}", escape_log(name), escape_log(value));
        self.persist().await;
        Ok(())
    }

    // ---- relationships ----

    pub async fn request_friend(&mut self, token: &str, target: &str) -> Result<(), SocialError> {
        self.graph.request_friend(token, target)?;
        debug!("friend request toward {}", escape_log(target));
        self.persist().await;
        Ok(())
    }

    pub fn is_friend(&self, login: &str, other: &str) -> Result<bool, SocialError> {
        self.graph.is_friend(login, other)
    }

    pub fn friends(&self, login: &str) -> Result<String, SocialError> {
        Ok(format_set(self.graph.friends(login)?))
    }

    pub async fn add_idol(&mut self, token: &str, idol: &str) -> Result<(), SocialError> {
        self.graph.add_idol(token, idol)?;
        self.persist().await;
        Ok(())
    }

    pub fn is_idol(&self, login: &str, idol: &str) -> Result<bool, SocialError> {
        self.graph.is_idol(login, idol)
    }

    pub fn fans(&self, login: &str) -> Result<String, SocialError> {
        Ok(format_set(self.graph.fans(login)?))
    }

    pub async fn add_crush(&mut self, token: &str, target: &str) -> Result<(), SocialError> {
        self.graph.add_crush(token, target)?;
        self.persist().await;
        Ok(())
    }

    pub fn is_crush(&self, token: &str, target: &str) -> Result<bool, SocialError> {
        self.graph.is_crush(token, target)
    }

    pub fn crushes(&self, token: &str) -> Result<String, SocialError> {
        Ok(format_set(self.graph.crushes(token)?))
    }

    pub async fn add_enemy(&mut self, token: &str, enemy: &str) -> Result<(), SocialError> {
        self.graph.add_enemy(token, enemy)?;
        self.persist().await;
        Ok(())
    }

    pub fn is_enemy(&self, token: &str, enemy: &str) -> Result<bool, SocialError> {
        self.graph.is_enemy(token, enemy)
    }

    // ---- messaging ----

    pub async fn send_message(
        &mut self,
        token: &str,
        recipient: &str,
        text: &str,
    ) -> Result<(), SocialError> {
        self.graph.send_message(token, recipient, text)?;
        debug!(
            "direct message to {}: {}",
            escape_log(recipient),
            escape_log(text)
        );
        self.persist().await;
        Ok(())
    }

    pub async fn read_message(&mut self, token: &str) -> Result<String, SocialError> {
        let text = self.graph.read_message(token)?;
        self.persist().await;
        Ok(text)
    }

    // ---- communities ----

    pub async fn create_community(
        &mut self,
        token: &str,
        name: &str,
        description: &str,
    ) -> Result<(), SocialError> {
        self.graph.create_community(token, name, description)?;
        info!("community {} created", escape_log(name));
        self.persist().await;
        Ok(())
    }

    pub async fn join_community(&mut self, token: &str, name: &str) -> Result<(), SocialError> {
        self.graph.join_community(token, name)?;
        self.persist().await;
        Ok(())
    }

    pub fn community_description(&self, name: &str) -> Result<String, SocialError> {
        Ok(self.graph.community_description(name)?.to_string())
    }

    pub fn community_owner(&self, name: &str) -> Result<String, SocialError> {
        Ok(self.graph.community_owner(name)?.to_string())
    }

    pub fn community_members(&self, name: &str) -> Result<String, SocialError> {
        Ok(format_set(self.graph.community_members(name)?))
    }

    pub fn communities_of(&self, login: &str) -> Result<String, SocialError> {
        Ok(format_set(self.graph.communities_of(login)?))
    }

    pub async fn broadcast(
        &mut self,
        token: &str,
        community: &str,
        text: &str,
    ) -> Result<(), SocialError> {
        self.graph.broadcast(token, community, text)?;
        debug!(
            "broadcast to {}: {}",
            escape_log(community),
            escape_log(text)
        );
        self.persist().await;
        Ok(())
    }

    pub async fn read_broadcast(&mut self, token: &str) -> Result<String, SocialError> {
        let text = self.graph.read_broadcast(token)?;
        self.persist().await;
        Ok(text)
    }
}

/// Render an ordered name collection as `{a,b,c}`; empty renders as `{}`.
pub fn format_set<I, S>(items: I) -> String
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut out = String::from("{");
    for (idx, item) in items.into_iter().enumerate() {
        if idx > 0 {
            out.push(',');
        }
        out.push_str(item.as_ref());
    }
    out.push('}');
    out
}

/// The fixed sentence shown to users for each failure.
pub fn user_message(err: &SocialError) -> String {
    match err {
        SocialError::InvalidLogin => "Invalid login.".to_string(),
        SocialError::InvalidPassword => "Invalid password.".to_string(),
        SocialError::AccountExists => "An account with this login already exists.".to_string(),
        SocialError::InvalidCredentials => "Invalid login or password.".to_string(),
        SocialError::UnknownUser => "User is not registered.".to_string(),
        SocialError::SelfReference => "A user cannot target themselves.".to_string(),
        SocialError::AlreadyFriends => "User is already listed as a friend.".to_string(),
        SocialError::InviteAlreadyPending => {
            "Friend request already sent and awaiting acceptance.".to_string()
        }
        SocialError::AlreadyIdol => "User is already listed as an idol.".to_string(),
        SocialError::AlreadyCrush => "User is already listed as a crush.".to_string(),
        SocialError::AlreadyEnemy => "User is already listed as an enemy.".to_string(),
        SocialError::AlreadyMember => "User is already a member of this community.".to_string(),
        SocialError::AttributeNotSet => "Attribute is not set.".to_string(),
        SocialError::InteractionBlocked { name } => {
            format!("Invalid action: {} is your enemy.", name)
        }
        SocialError::CommunityExists => {
            "A community with this name already exists.".to_string()
        }
        SocialError::CommunityNotFound => "Community does not exist.".to_string(),
        SocialError::NoMessages => "There are no messages.".to_string(),
        SocialError::InvalidArgument(what) => format!("Invalid argument: {}.", what),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn format_set_renders_order_and_empty() {
        assert_eq!(format_set(["a", "b", "c"]), "{a,b,c}");
        assert_eq!(format_set(Vec::<String>::new()), "{}");
        assert_eq!(format_set(["solo"]), "{solo}");
    }

    #[test]
    fn user_messages_are_distinct_sentences() {
        let errors = [
            SocialError::InvalidLogin,
            SocialError::InvalidPassword,
            SocialError::AccountExists,
            SocialError::InvalidCredentials,
            SocialError::UnknownUser,
            SocialError::SelfReference,
            SocialError::AlreadyFriends,
            SocialError::InviteAlreadyPending,
            SocialError::AlreadyIdol,
            SocialError::AlreadyCrush,
            SocialError::AlreadyEnemy,
            SocialError::AlreadyMember,
            SocialError::AttributeNotSet,
            SocialError::InteractionBlocked {
                name: "Maria".to_string(),
            },
            SocialError::CommunityExists,
            SocialError::CommunityNotFound,
            SocialError::NoMessages,
            SocialError::InvalidArgument("community name"),
        ];
        let texts: Vec<String> = errors.iter().map(user_message).collect();
        for (i, a) in texts.iter().enumerate() {
            assert!(a.ends_with('.'), "message should be a sentence: {a}");
            for (j, b) in texts.iter().enumerate() {
                if i != j {
                    assert_ne!(a, b, "messages for different errors must differ");
                }
            }
        }
    }

    #[test]
    fn enemy_block_names_the_counterpart() {
        let err = SocialError::InteractionBlocked {
            name: "Maria Silva".to_string(),
        };
        assert_eq!(user_message(&err), "Invalid action: Maria Silva is your enemy.");
    }
}
