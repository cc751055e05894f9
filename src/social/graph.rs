//! # Social graph orchestration
//!
//! [`SocialGraph`] owns the user registry, the session table, and the
//! community registry, and implements every cross-entity business rule:
//! the friend-request handshake, enemy-interaction blocking, self-reference
//! bans, message delivery, and the cascading account delete.
//!
//! The graph is a pure in-memory state machine. It performs no I/O, holds no
//! global state, and never logs; persistence and presentation live with the
//! caller, which holds the graph behind `&mut` so every operation runs to
//! completion before the next. All failures are typed [`SocialError`] values.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use super::community::Community;
use super::errors::SocialError;
use super::profile::UserProfile;
use super::sessions::SessionRegistry;

/// Appended to the counterpart's display name in the note both parties
/// receive when a crush is reciprocated.
const CRUSH_NOTE_SUFFIX: &str = " is your crush - Rede system note.";

/// The whole in-memory state: users, sessions, communities. Serializes as
/// one snapshot payload.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SocialGraph {
    users: IndexMap<String, UserProfile>,
    sessions: SessionRegistry,
    communities: IndexMap<String, Community>,
}

impl SocialGraph {
    pub fn new() -> Self {
        SocialGraph::default()
    }

    pub fn user_count(&self) -> usize {
        self.users.len()
    }

    pub fn community_count(&self) -> usize {
        self.communities.len()
    }

    pub fn session_count(&self) -> usize {
        self.sessions.len()
    }

    // ---- account and session lifecycle ----

    /// Register a new account with an empty profile. Blank means empty or
    /// whitespace-only for both credential fields.
    pub fn register(&mut self, login: &str, password: &str, name: &str) -> Result<(), SocialError> {
        if login.trim().is_empty() {
            return Err(SocialError::InvalidLogin);
        }
        if password.trim().is_empty() {
            return Err(SocialError::InvalidPassword);
        }
        if self.users.contains_key(login) {
            return Err(SocialError::AccountExists);
        }
        self.users
            .insert(login.to_string(), UserProfile::new(login, password, name));
        Ok(())
    }

    /// Open a session and return a fresh opaque token. Unknown logins and
    /// wrong passwords collapse to the same error.
    pub fn open_session(&mut self, login: &str, password: &str) -> Result<String, SocialError> {
        let profile = self
            .users
            .get(login)
            .ok_or(SocialError::InvalidCredentials)?;
        if profile.password != password {
            return Err(SocialError::InvalidCredentials);
        }
        Ok(self.sessions.open(login))
    }

    /// The login a live token is bound to. Tokens of deleted accounts may
    /// still resolve here; profile lookups catch those.
    pub fn session_user(&self, token: &str) -> Result<&str, SocialError> {
        self.sessions.resolve(token).ok_or(SocialError::UnknownUser)
    }

    /// Immutable profile access by login.
    pub fn user(&self, login: &str) -> Result<&UserProfile, SocialError> {
        self.users.get(login).ok_or(SocialError::UnknownUser)
    }

    fn user_mut(&mut self, login: &str) -> Result<&mut UserProfile, SocialError> {
        self.users.get_mut(login).ok_or(SocialError::UnknownUser)
    }

    /// Resolve a token all the way to a registered login.
    fn session_login(&self, token: &str) -> Result<String, SocialError> {
        let login = self.session_user(token)?.to_string();
        self.user(&login)?;
        Ok(login)
    }

    /// Delete the account behind `token`, cascading across the whole graph.
    pub fn delete_account(&mut self, token: &str) -> Result<(), SocialError> {
        let login = self.session_login(token)?;

        // Owned communities disappear everywhere; plain memberships shrink.
        let member_of: Vec<String> = self.user(&login)?.communities.iter().cloned().collect();
        for name in member_of {
            let owns = self
                .communities
                .get(&name)
                .map(|c| c.owner == login)
                .unwrap_or(false);
            if owns {
                self.communities.shift_remove(&name);
                for profile in self.users.values_mut() {
                    profile.communities.shift_remove(&name);
                }
            } else if let Some(community) = self.communities.get_mut(&name) {
                community.remove_member(&login);
            }
        }

        // Scrub the login from every relationship collection. Every queue is
        // drained as well, not just messages from the deleted login.
        for profile in self.users.values_mut() {
            profile.forget(&login);
            profile.clear_queues();
        }

        // Only the triggering token dies; other tokens of this login dangle
        // and surface UnknownUser at the profile lookup.
        self.sessions.remove(token);
        self.users.shift_remove(&login);
        Ok(())
    }

    /// Drop all users, sessions, and communities.
    pub fn reset(&mut self) {
        self.users.clear();
        self.sessions.clear();
        self.communities.clear();
    }

    // ---- profile attributes ----

    pub fn attribute(&self, login: &str, name: &str) -> Result<String, SocialError> {
        self.user(login)?.attribute(name)
    }

    pub fn set_attribute(
        &mut self,
        token: &str,
        name: &str,
        value: &str,
    ) -> Result<(), SocialError> {
        let login = self.session_login(token)?;
        self.user_mut(&login)?.set_attribute(name, value)
    }

    // ---- friends ----

    /// Request friendship with `target`, or accept an inverse pending
    /// request, completing the handshake in one call.
    pub fn request_friend(&mut self, token: &str, target: &str) -> Result<(), SocialError> {
        let login = self.session_login(token)?;
        self.user(target)?;
        if login == target {
            return Err(SocialError::SelfReference);
        }
        self.ensure_interaction(&login, target)?;
        if self.user(&login)?.friends.contains(target) {
            return Err(SocialError::AlreadyFriends);
        }
        if self.user(&login)?.pending_invites.contains(target) {
            // The target asked first; this call completes the handshake.
            let requester = self.user_mut(&login)?;
            requester.pending_invites.shift_remove(target);
            requester.friends.insert(target);
            self.user_mut(target)?.friends.insert(&login);
        } else if self.user(target)?.pending_invites.contains(&login) {
            return Err(SocialError::InviteAlreadyPending);
        } else {
            self.user_mut(target)?.pending_invites.insert(login.clone());
        }
        Ok(())
    }

    /// True only once the friendship is mutual; edges are always recorded on
    /// both profiles, so one side answers for both.
    pub fn is_friend(&self, login: &str, other: &str) -> Result<bool, SocialError> {
        Ok(self.user(login)?.friends.contains(other))
    }

    /// The login's friends in insertion order.
    pub fn friends(&self, login: &str) -> Result<Vec<String>, SocialError> {
        Ok(self.user(login)?.friends.iter().map(str::to_string).collect())
    }

    // ---- fans, crushes, enemies ----

    /// Declare an idol; the inverse fan edge lands on the idol's profile.
    pub fn add_idol(&mut self, token: &str, idol: &str) -> Result<(), SocialError> {
        let login = self.session_login(token)?;
        self.user(idol)?;
        if login == idol {
            return Err(SocialError::SelfReference);
        }
        self.ensure_interaction(&login, idol)?;
        if !self.user_mut(&login)?.idols.insert(idol.to_string()) {
            return Err(SocialError::AlreadyIdol);
        }
        self.user_mut(idol)?.fans.insert(&login);
        Ok(())
    }

    /// Whether `idol` is among `login`'s declared idols.
    pub fn is_idol(&self, login: &str, idol: &str) -> Result<bool, SocialError> {
        Ok(self.user(login)?.idols.contains(idol))
    }

    /// Who follows `login`, in insertion order.
    pub fn fans(&self, login: &str) -> Result<Vec<String>, SocialError> {
        Ok(self.user(login)?.fans.iter().map(str::to_string).collect())
    }

    /// Declare a crush. When the target already declared one back, both
    /// parties receive a direct message naming the counterpart.
    pub fn add_crush(&mut self, token: &str, target: &str) -> Result<(), SocialError> {
        let login = self.session_login(token)?;
        self.user(target)?;
        if login == target {
            return Err(SocialError::SelfReference);
        }
        self.ensure_interaction(&login, target)?;
        if !self.user_mut(&login)?.crushes.insert(target.to_string()) {
            return Err(SocialError::AlreadyCrush);
        }
        if self.user(target)?.crushes.contains(&login) {
            let target_name = self.user(target)?.display_name.clone();
            let own_name = self.user(&login)?.display_name.clone();
            self.user_mut(&login)?
                .direct_messages
                .push_back(format!("{target_name}{CRUSH_NOTE_SUFFIX}"));
            self.user_mut(target)?
                .direct_messages
                .push_back(format!("{own_name}{CRUSH_NOTE_SUFFIX}"));
        }
        Ok(())
    }

    /// Whether the session owner declared `target` a crush.
    pub fn is_crush(&self, token: &str, target: &str) -> Result<bool, SocialError> {
        let login = self.session_login(token)?;
        Ok(self.user(&login)?.crushes.contains(target))
    }

    /// The session owner's crushes, in insertion order.
    pub fn crushes(&self, token: &str) -> Result<Vec<String>, SocialError> {
        let login = self.session_login(token)?;
        Ok(self.user(&login)?.crushes.iter().cloned().collect())
    }

    /// Declare an enemy. Always allowed, even across an existing friendship;
    /// only later interactions are blocked.
    pub fn add_enemy(&mut self, token: &str, enemy: &str) -> Result<(), SocialError> {
        let login = self.session_login(token)?;
        self.user(enemy)?;
        if login == enemy {
            return Err(SocialError::SelfReference);
        }
        self.user_mut(&login)?.enemies.add(enemy)
    }

    /// Whether the session owner declared `enemy` an enemy.
    pub fn is_enemy(&self, token: &str, enemy: &str) -> Result<bool, SocialError> {
        let login = self.session_login(token)?;
        Ok(self.user(&login)?.enemies.contains(enemy))
    }

    /// Fail when either side lists the other as an enemy. The error carries
    /// the counterpart's display name. Applies to friend requests, idol and
    /// crush additions, and direct messages; broadcasts and enemy
    /// declarations bypass it.
    fn ensure_interaction(&self, login: &str, other: &str) -> Result<(), SocialError> {
        let blocked = self.user(login)?.enemies.contains(other)
            || self.user(other)?.enemies.contains(login);
        if blocked {
            return Err(SocialError::InteractionBlocked {
                name: self.user(other)?.display_name.clone(),
            });
        }
        Ok(())
    }

    // ---- direct messages ----

    /// Queue a direct message on the recipient's profile.
    pub fn send_message(
        &mut self,
        token: &str,
        recipient: &str,
        text: &str,
    ) -> Result<(), SocialError> {
        let login = self.session_login(token)?;
        self.user(recipient)?;
        if login == recipient {
            return Err(SocialError::SelfReference);
        }
        self.ensure_interaction(&login, recipient)?;
        self.user_mut(recipient)?
            .direct_messages
            .push_back(text.to_string());
        Ok(())
    }

    /// Pop the oldest direct message for the session owner.
    pub fn read_message(&mut self, token: &str) -> Result<String, SocialError> {
        let login = self.session_login(token)?;
        self.user_mut(&login)?
            .direct_messages
            .pop_front()
            .ok_or(SocialError::NoMessages)
    }

    // ---- communities ----

    /// Create a community owned by the session user, its sole initial
    /// member.
    pub fn create_community(
        &mut self,
        token: &str,
        name: &str,
        description: &str,
    ) -> Result<(), SocialError> {
        if name.trim().is_empty() {
            return Err(SocialError::InvalidArgument("community name"));
        }
        if description.trim().is_empty() {
            return Err(SocialError::InvalidArgument("community description"));
        }
        let login = self.session_login(token)?;
        if self.communities.contains_key(name) {
            return Err(SocialError::CommunityExists);
        }
        self.communities
            .insert(name.to_string(), Community::new(name, description, &login));
        self.user_mut(&login)?.communities.insert(name.to_string());
        Ok(())
    }

    /// Join an existing community.
    pub fn join_community(&mut self, token: &str, name: &str) -> Result<(), SocialError> {
        let login = self.session_login(token)?;
        let community = self
            .communities
            .get_mut(name)
            .ok_or(SocialError::CommunityNotFound)?;
        community.add_member(&login)?;
        self.user_mut(&login)?.communities.insert(name.to_string());
        Ok(())
    }

    pub fn community_description(&self, name: &str) -> Result<&str, SocialError> {
        Ok(self.community(name)?.description.as_str())
    }

    pub fn community_owner(&self, name: &str) -> Result<&str, SocialError> {
        Ok(self.community(name)?.owner.as_str())
    }

    /// A community's members in join order, the owner first.
    pub fn community_members(&self, name: &str) -> Result<Vec<String>, SocialError> {
        Ok(self.community(name)?.members.iter().cloned().collect())
    }

    /// The communities `login` belongs to, in join order.
    pub fn communities_of(&self, login: &str) -> Result<Vec<String>, SocialError> {
        Ok(self.user(login)?.communities.iter().cloned().collect())
    }

    /// Deliver a broadcast to every current member's broadcast queue. The
    /// sender needs a live session but not membership; member senders
    /// receive their own message like everyone else.
    pub fn broadcast(&mut self, token: &str, community: &str, text: &str) -> Result<(), SocialError> {
        self.session_login(token)?;
        let members: Vec<String> = self.community(community)?.members.iter().cloned().collect();
        for member in members {
            if let Some(profile) = self.users.get_mut(&member) {
                profile.broadcasts.push_back(text.to_string());
            }
        }
        Ok(())
    }

    /// Pop the oldest broadcast for the session owner.
    pub fn read_broadcast(&mut self, token: &str) -> Result<String, SocialError> {
        let login = self.session_login(token)?;
        self.user_mut(&login)?
            .broadcasts
            .pop_front()
            .ok_or(SocialError::NoMessages)
    }

    fn community(&self, name: &str) -> Result<&Community, SocialError> {
        self.communities.get(name).ok_or(SocialError::CommunityNotFound)
    }
}
