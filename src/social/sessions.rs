use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Live session tokens mapped to the logins that opened them.
///
/// Tokens are opaque UUID v4 strings. They never expire on their own; account
/// deletion removes only the token that triggered it, and the whole table
/// survives snapshot round-trips with the rest of the graph.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SessionRegistry {
    tokens: HashMap<String, String>,
}

impl SessionRegistry {
    pub fn new() -> Self {
        SessionRegistry::default()
    }

    /// Mint a fresh token bound to `login`.
    pub fn open(&mut self, login: &str) -> String {
        let token = Uuid::new_v4().to_string();
        self.tokens.insert(token.clone(), login.to_string());
        token
    }

    /// The login bound to `token`, if the token is live.
    pub fn resolve(&self, token: &str) -> Option<&str> {
        self.tokens.get(token).map(String::as_str)
    }

    /// Drop one token. Other tokens bound to the same login stay live.
    pub fn remove(&mut self, token: &str) -> Option<String> {
        self.tokens.remove(token)
    }

    pub fn clear(&mut self) {
        self.tokens.clear();
    }

    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tokens_are_fresh_and_resolve() {
        let mut sessions = SessionRegistry::new();
        let first = sessions.open("alice");
        let second = sessions.open("alice");
        assert_ne!(first, second, "every open mints a distinct token");
        assert_eq!(sessions.resolve(&first), Some("alice"));
        assert_eq!(sessions.resolve(&second), Some("alice"));
        assert_eq!(sessions.resolve("bogus"), None);
    }

    #[test]
    fn removal_leaves_other_tokens_live() {
        let mut sessions = SessionRegistry::new();
        let first = sessions.open("alice");
        let second = sessions.open("alice");
        assert_eq!(sessions.remove(&first), Some("alice".to_string()));
        assert_eq!(sessions.resolve(&first), None);
        assert_eq!(sessions.resolve(&second), Some("alice"));
        assert_eq!(sessions.len(), 1);
    }
}
