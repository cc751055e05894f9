//! # Rede - In-Memory Social Network Simulator
//!
//! Rede is a small social network that lives entirely in memory and persists
//! itself as a single binary snapshot between runs. It models accounts,
//! sessions, profile attributes, four relationship kinds (friends, fans and
//! idols, crushes, enemies), direct messages, and communities with broadcasts.
//!
//! ## Features
//!
//! - **Accounts and Sessions**: Registration, token-based sessions, and a cascading account delete that scrubs every edge.
//! - **Relationship Kinds**: Symmetric friendships with a request handshake, directed fan/idol and crush edges, and enemies that block interaction both ways.
//! - **Direct Messages**: Per-user FIFO queues, including the automatic note both parties receive when a crush is reciprocated.
//! - **Communities**: Named groups with an owner, ordered membership, and broadcast queues.
//! - **Snapshot Persistence**: Every mutation writes through to a checksummed, atomically replaced snapshot file.
//! - **Async Design**: Built with Tokio; domain logic stays synchronous and pure.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use rede::config::Config;
//! use rede::facade::Facade;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     // Load configuration
//!     let config = Config::load("config.toml").await?;
//!
//!     // Open the facade, restoring the last snapshot
//!     let mut facade = Facade::open(&config).await?;
//!     facade.register("alice", "secret", "Alice").await?;
//!     let token = facade.login("alice", "secret").await?;
//!     facade.set_attribute(&token, "city", "Lisbon").await?;
//!
//!     Ok(())
//! }
//! ```
//!
//! ## Module Organization
//!
//! - [`social`] - The in-memory domain: graph, profiles, relations, communities
//! - [`facade`] - Entry point tying the graph to persistence and presentation
//! - [`storage`] - Snapshot encoding and the locked, atomic file store
//! - [`config`] - Configuration management
//! - [`shell`] - The interactive line-oriented front end
//! - [`logutil`] - Log sanitization helpers
//!
//! ## Architecture
//!
//! Rede uses a modular architecture with clear separation of concerns:
//!
//! ```text
//! ┌─────────────────┐
//! │   Shell / CLI   │ ← Line commands and output
//! └─────────────────┘
//!          │
//! ┌─────────────────┐
//! │   Facade        │ ← Orchestration and write-through
//! └─────────────────┘
//!          │
//! ┌─────────────────┐
//! │   SocialGraph   │ ← Pure in-memory domain rules
//! └─────────────────┘
//!          │
//! ┌─────────────────┐
//! │   SnapshotStore │ ← Checksummed snapshot persistence
//! └─────────────────┘
//! ```

pub mod config;
pub mod facade;
pub mod logutil;
pub mod shell;
pub mod social;
pub mod storage;
