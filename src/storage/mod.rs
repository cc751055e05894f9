//! # Storage Module - Snapshot Persistence Layer
//!
//! This module persists the whole [`SocialGraph`] as a single binary snapshot
//! file and restores it on startup. The graph is the source of truth while
//! the process runs; the snapshot is a crash-recovery artifact, rewritten
//! after every successful mutation.
//!
//! ## Features
//!
//! - **Single-File Snapshots**: The entire graph serializes into one file
//! - **Integrity Checking**: A CRC32 over the payload detects torn writes
//! - **Version Discipline**: A format version gate refuses foreign layouts
//! - **File Locking**: Exclusive locks keep concurrent processes out
//! - **Atomic Replace**: Writes stage through a temp file and rename
//!
//! ## Snapshot Layout
//!
//! ```text
//! ┌──────────┬─────────────┬──────────┬───────────────┬──────────────────┐
//! │ magic    │ version u16 │ reserved │ payload CRC32 │ bincode payload  │
//! │ "REDE"   │ little end. │ 2 zeroes │ little end.   │ (SocialGraph)    │
//! └──────────┴─────────────┴──────────┴───────────────┴──────────────────┘
//!   4 bytes     2 bytes      2 bytes       4 bytes         rest of file
//! ```
//!
//! ## Usage
//!
//! ```rust,no_run
//! use rede::storage::SnapshotStore;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let store = SnapshotStore::new("data/rede.snapshot");
//!     let mut graph = store.load().await?;
//!     graph.register("alice", "secret", "Alice")?;
//!     store.save(&graph).await?;
//!     Ok(())
//! }
//! ```
//!
//! ## Error Handling
//!
//! A missing snapshot and an unreadable one both yield an empty graph, so a
//! corrupt file never bricks the service; only genuine I/O failures
//! propagate. Decode failures are reported as typed [`SnapshotError`]
//! values before being logged and absorbed.

use anyhow::{anyhow, Result};
use crc::{Crc, CRC_32_ISO_HDLC};
use fs2::FileExt;
use log::{debug, warn};
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tokio::fs;

use crate::social::SocialGraph;

/// First four bytes of every snapshot file.
pub const MAGIC: [u8; 4] = *b"REDE";

/// Current snapshot layout version. Bump on any payload schema change.
pub const FORMAT_VERSION: u16 = 1;

/// Fixed header size: magic, version, reserved padding, payload checksum.
pub const HEADER_LEN: usize = 12;

const PAYLOAD_CRC: Crc<u32> = Crc::<u32>::new(&CRC_32_ISO_HDLC);

/// Why a snapshot file could not be decoded.
#[derive(Debug, Error)]
pub enum SnapshotError {
    /// The file ended before the fixed header was complete.
    #[error("snapshot shorter than the fixed header ({0} bytes)")]
    TruncatedHeader(usize),
    /// The file does not start with the snapshot magic.
    #[error("snapshot magic mismatch")]
    BadMagic,
    /// The file was written by an incompatible layout version.
    #[error("unsupported snapshot version {0}")]
    UnsupportedVersion(u16),
    /// The payload does not hash to the checksum recorded in the header.
    #[error("snapshot checksum mismatch (header {header:#010x}, payload {payload:#010x})")]
    ChecksumMismatch { header: u32, payload: u32 },
    /// The payload failed to (de)serialize.
    #[error("snapshot codec failure: {0}")]
    Codec(#[from] bincode::Error),
}

/// Serialize a graph into a framed snapshot: header first, payload after.
pub fn encode(graph: &SocialGraph) -> Result<Vec<u8>, SnapshotError> {
    let payload = bincode::serialize(graph)?;
    let crc = PAYLOAD_CRC.checksum(&payload);
    let mut bytes = Vec::with_capacity(HEADER_LEN + payload.len());
    bytes.extend_from_slice(&MAGIC);
    bytes.extend_from_slice(&FORMAT_VERSION.to_le_bytes());
    bytes.extend_from_slice(&[0u8; 2]);
    bytes.extend_from_slice(&crc.to_le_bytes());
    bytes.extend_from_slice(&payload);
    Ok(bytes)
}

/// Validate the header and deserialize the payload back into a graph.
pub fn decode(bytes: &[u8]) -> Result<SocialGraph, SnapshotError> {
    if bytes.len() < HEADER_LEN {
        return Err(SnapshotError::TruncatedHeader(bytes.len()));
    }
    if bytes[0..4] != MAGIC {
        return Err(SnapshotError::BadMagic);
    }
    let version = u16::from_le_bytes([bytes[4], bytes[5]]);
    if version != FORMAT_VERSION {
        return Err(SnapshotError::UnsupportedVersion(version));
    }
    let header = u32::from_le_bytes([bytes[8], bytes[9], bytes[10], bytes[11]]);
    let payload = &bytes[HEADER_LEN..];
    let actual = PAYLOAD_CRC.checksum(payload);
    if actual != header {
        return Err(SnapshotError::ChecksumMismatch {
            header,
            payload: actual,
        });
    }
    Ok(bincode::deserialize(payload)?)
}

/// Reads and writes graph snapshots at a fixed path.
pub struct SnapshotStore {
    path: PathBuf,
}

impl SnapshotStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        SnapshotStore { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Size of the snapshot on disk, when one has been written.
    pub fn file_size(&self) -> Option<u64> {
        std::fs::metadata(&self.path).ok().map(|m| m.len())
    }

    /// Load the snapshot, or start with an empty graph when the file is
    /// missing or unreadable. Only real I/O failures propagate.
    pub async fn load(&self) -> Result<SocialGraph> {
        match fs::read(&self.path).await {
            Ok(bytes) => match decode(&bytes) {
                Ok(graph) => {
                    debug!(
                        "loaded snapshot {} ({} users, {} communities)",
                        self.path.display(),
                        graph.user_count(),
                        graph.community_count()
                    );
                    Ok(graph)
                }
                Err(err) => {
                    warn!(
                        "unreadable snapshot {}: {}; starting empty",
                        self.path.display(),
                        err
                    );
                    Ok(SocialGraph::new())
                }
            },
            Err(e) if e.kind() == ErrorKind::NotFound => {
                debug!("no snapshot at {}; starting empty", self.path.display());
                Ok(SocialGraph::new())
            }
            Err(e) => Err(anyhow!(
                "Failed reading snapshot {}: {}",
                self.path.display(),
                e
            )),
        }
    }

    /// Encode the graph and replace the snapshot file atomically.
    pub async fn save(&self, graph: &SocialGraph) -> Result<()> {
        let bytes = encode(graph).map_err(|e| anyhow!("Failed to encode snapshot: {}", e))?;
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent).await?;
            }
        }
        Self::write_file_locked(&self.path, &bytes).await
    }

    /// Remove the snapshot file. A missing file counts as already cleared.
    pub async fn clear(&self) -> Result<()> {
        match fs::remove_file(&self.path).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(anyhow!(
                "Failed removing snapshot {}: {}",
                self.path.display(),
                e
            )),
        }
    }

    /// Write bytes to a file under an exclusive lock, staging through a temp
    /// file so readers never observe a half-written snapshot.
    async fn write_file_locked(path: &Path, content: &[u8]) -> Result<()> {
        use std::fs::{self, File, OpenOptions};
        use std::io::Write;

        // Use synchronous I/O for file locking since fs2 doesn't support async
        // Step 1: Open (or create) the destination file to acquire an exclusive lock
        let lock_file = OpenOptions::new()
            .create(true)
            .read(true)
            .write(true)
            .open(path)?;

        lock_file.lock_exclusive()?;

        // Step 2: Create a unique temp file in the same directory
        let dir = path.parent().unwrap_or_else(|| Path::new("."));
        let base = path
            .file_name()
            .and_then(|s| s.to_str())
            .unwrap_or("rede.snapshot");
        let mut counter = 0u32;
        let tmp_path = loop {
            let candidate = dir.join(format!(".{}.tmp-{}-{}", base, std::process::id(), counter));
            match OpenOptions::new().write(true).create_new(true).open(&candidate) {
                Ok(mut tmp) => {
                    // Write all content to temp file and fsync
                    tmp.write_all(content)?;
                    tmp.flush()?;
                    let _ = tmp.sync_all();
                    break candidate;
                }
                Err(e) if e.kind() == ErrorKind::AlreadyExists => {
                    counter = counter.saturating_add(1);
                    continue;
                }
                Err(e) => return Err(anyhow!("Failed to create temp file for atomic write: {}", e)),
            }
        };

        // Step 3: Atomically replace the destination with the temp file
        fs::rename(&tmp_path, path)?;

        // Step 4: Fsync the directory to persist the rename (best-effort)
        if let Ok(dir_file) = File::open(dir) {
            let _ = dir_file.sync_all();
        }

        // Step 5: Unlock by dropping the lock file
        drop(lock_file);

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn populated_graph() -> SocialGraph {
        let mut graph = SocialGraph::new();
        graph.register("alice", "secret", "Alice A").unwrap();
        graph.register("bob", "hunter2", "Bob B").unwrap();
        let token = graph.open_session("alice", "secret").unwrap();
        graph.add_idol(&token, "bob").unwrap();
        graph.create_community(&token, "rustaceans", "Rust talk").unwrap();
        graph
    }

    #[test]
    fn round_trip_preserves_counts() {
        let graph = populated_graph();
        let bytes = encode(&graph).unwrap();
        let restored = decode(&bytes).unwrap();
        assert_eq!(restored.user_count(), 2, "both users should survive");
        assert_eq!(restored.community_count(), 1, "community should survive");
        assert!(
            restored.is_idol("alice", "bob").unwrap(),
            "idol edge should survive the round trip"
        );
    }

    #[test]
    fn decode_rejects_truncated_header() {
        let bytes = encode(&SocialGraph::new()).unwrap();
        let err = decode(&bytes[..5]).unwrap_err();
        assert!(
            matches!(err, SnapshotError::TruncatedHeader(5)),
            "expected TruncatedHeader, got {err:?}"
        );
    }

    #[test]
    fn decode_rejects_foreign_magic() {
        let mut bytes = encode(&SocialGraph::new()).unwrap();
        bytes[0] = b'X';
        let err = decode(&bytes).unwrap_err();
        assert!(matches!(err, SnapshotError::BadMagic), "got {err:?}");
    }

    #[test]
    fn decode_rejects_future_version() {
        let mut bytes = encode(&SocialGraph::new()).unwrap();
        bytes[4] = 0xFF;
        let err = decode(&bytes).unwrap_err();
        assert!(
            matches!(err, SnapshotError::UnsupportedVersion(_)),
            "got {err:?}"
        );
    }

    #[test]
    fn decode_detects_flipped_payload_byte() {
        let mut bytes = encode(&populated_graph()).unwrap();
        let last = bytes.len() - 1;
        bytes[last] ^= 0x01;
        let err = decode(&bytes).unwrap_err();
        assert!(
            matches!(err, SnapshotError::ChecksumMismatch { .. }),
            "got {err:?}"
        );
    }

    #[tokio::test]
    async fn save_then_load_round_trips_on_disk() {
        let dir = tempfile::tempdir().unwrap();
        let store = SnapshotStore::new(dir.path().join("rede.snapshot"));
        store.save(&populated_graph()).await.unwrap();
        let restored = store.load().await.unwrap();
        assert_eq!(restored.user_count(), 2);
        assert!(store.file_size().is_some(), "snapshot file should exist");
    }

    #[tokio::test]
    async fn load_of_missing_file_starts_empty() {
        let dir = tempfile::tempdir().unwrap();
        let store = SnapshotStore::new(dir.path().join("absent.snapshot"));
        let graph = store.load().await.unwrap();
        assert_eq!(graph.user_count(), 0, "missing snapshot should start empty");
    }

    #[tokio::test]
    async fn load_of_garbage_starts_empty() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("rede.snapshot");
        tokio::fs::write(&path, b"not a snapshot at all").await.unwrap();
        let store = SnapshotStore::new(&path);
        let graph = store.load().await.unwrap();
        assert_eq!(graph.user_count(), 0, "garbage snapshot should start empty");
    }

    #[tokio::test]
    async fn clear_removes_file_and_tolerates_absence() {
        let dir = tempfile::tempdir().unwrap();
        let store = SnapshotStore::new(dir.path().join("rede.snapshot"));
        store.save(&SocialGraph::new()).await.unwrap();
        store.clear().await.unwrap();
        assert!(store.file_size().is_none(), "snapshot should be gone");
        store.clear().await.unwrap();
    }

    #[tokio::test]
    async fn save_creates_missing_parent_directories() {
        let dir = tempfile::tempdir().unwrap();
        let store = SnapshotStore::new(dir.path().join("nested/deeper/rede.snapshot"));
        store.save(&populated_graph()).await.unwrap();
        assert!(store.file_size().is_some(), "snapshot should land in nested dir");
    }
}
