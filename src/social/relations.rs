use indexmap::IndexSet;
use serde::{Deserialize, Serialize};

use super::errors::SocialError;

/// The relationship categories tracked through [`RelationSet`].
///
/// Crush and idol-target bookkeeping live on the profile as plain sets; the
/// kinds here are the ones whose duplicate handling differs by category, so
/// the kind-to-error mapping stays a lookup instead of one type per kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RelationKind {
    /// Mutual friendship edges, always present on both profiles once formed.
    Friend,
    /// Followers of this user (the inverse side of an idol edge).
    Fan,
    /// Declared enemies; blocks most interactions in either direction.
    Enemy,
}

impl RelationKind {
    /// Every kind, in the order profiles materialize their sets.
    pub const ALL: [RelationKind; 3] =
        [RelationKind::Friend, RelationKind::Fan, RelationKind::Enemy];

    /// The error signalled when the same target is added twice.
    pub fn duplicate_error(self) -> SocialError {
        match self {
            RelationKind::Friend => SocialError::AlreadyFriends,
            // A duplicate on the fan side means the same idol edge was
            // declared twice.
            RelationKind::Fan => SocialError::AlreadyIdol,
            RelationKind::Enemy => SocialError::AlreadyEnemy,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            RelationKind::Friend => "friend",
            RelationKind::Fan => "fan",
            RelationKind::Enemy => "enemy",
        }
    }
}

/// An insertion-ordered set of edges from one user to others, all of one
/// [`RelationKind`].
///
/// Duplicate additions fail with the kind's error instead of silently
/// succeeding; removing an absent target is a no-op.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RelationSet {
    kind: RelationKind,
    targets: IndexSet<String>,
}

impl RelationSet {
    pub fn new(kind: RelationKind) -> Self {
        RelationSet {
            kind,
            targets: IndexSet::new(),
        }
    }

    pub fn kind(&self) -> RelationKind {
        self.kind
    }

    /// Add an edge, failing with the kind-specific duplicate error when the
    /// target is already present.
    pub fn add(&mut self, target: &str) -> Result<(), SocialError> {
        if !self.targets.insert(target.to_string()) {
            return Err(self.kind.duplicate_error());
        }
        Ok(())
    }

    /// Set-semantics insertion for acceptance paths where an existing edge is
    /// not an error. Returns whether the edge was new.
    pub fn insert(&mut self, target: &str) -> bool {
        self.targets.insert(target.to_string())
    }

    /// Remove an edge if present, preserving the order of the rest.
    pub fn remove(&mut self, target: &str) -> bool {
        self.targets.shift_remove(target)
    }

    pub fn contains(&self, target: &str) -> bool {
        self.targets.contains(target)
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.targets.iter().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.targets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.targets.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn duplicate_add_signals_kind_error() {
        for kind in RelationKind::ALL {
            let mut set = RelationSet::new(kind);
            set.add("alice").expect("first add succeeds");
            assert_eq!(set.add("alice"), Err(kind.duplicate_error()));
        }
    }

    #[test]
    fn remove_is_idempotent() {
        let mut set = RelationSet::new(RelationKind::Friend);
        set.add("alice").unwrap();
        assert!(set.remove("alice"));
        assert!(!set.remove("alice"), "second removal is a no-op");
        assert!(set.is_empty());
    }

    #[test]
    fn iteration_preserves_insertion_order() {
        let mut set = RelationSet::new(RelationKind::Fan);
        for name in ["carol", "alice", "bob"] {
            set.add(name).unwrap();
        }
        set.remove("alice");
        let order: Vec<&str> = set.iter().collect();
        assert_eq!(order, vec!["carol", "bob"]);
    }

    #[test]
    fn insert_ignores_existing_edges() {
        let mut set = RelationSet::new(RelationKind::Friend);
        assert!(set.insert("alice"));
        assert!(!set.insert("alice"));
        assert_eq!(set.len(), 1);
    }
}
