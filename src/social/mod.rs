//! # Social Network Core
//!
//! This module implements the domain layer of Rede: users, sessions,
//! relationships, messaging, and communities, all held in memory by a single
//! [`SocialGraph`].
//!
//! ## Components
//!
//! - [`graph`] - The orchestrating state machine and every business rule
//! - [`profile`] - Per-user record: credentials, attributes, edges, queues
//! - [`relations`] - Relationship kinds and insertion-ordered edge sets
//! - [`community`] - Named groups with an owner and ordered membership
//! - [`sessions`] - Opaque token to login bindings
//! - [`errors`] - The typed failure taxonomy shared by all operations
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────────────┐
//! │  SocialGraph     │ ← Orchestrates all cross-entity rules
//! └──────────────────┘
//!     │            │
//! ┌───────────┐ ┌───────────┐
//! │ UserProfile│ │ Community │ ← Records owned by the graph
//! └───────────┘ └───────────┘
//!     │
//! ┌───────────┐
//! │RelationSet│ ← Insertion-ordered edges per relationship kind
//! └───────────┘
//! ```
//!
//! The graph performs no I/O and holds no locks; callers own it exclusively
//! and layer persistence and presentation on top.

pub mod community;
pub mod errors;
pub mod graph;
pub mod profile;
pub mod relations;
pub mod sessions;

pub use community::Community;
pub use errors::SocialError;
pub use graph::SocialGraph;
pub use profile::UserProfile;
pub use relations::{RelationKind, RelationSet};
pub use sessions::SessionRegistry;
