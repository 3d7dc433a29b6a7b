//! Source backend traits

use async_trait::async_trait;
use std::path::Path;
use std::time::SystemTime;

use crate::{entry::EntryId, error::TetherResult};

/// Outcome of comparing a source-stored modification time against the local
/// file's modification time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MtimeOrder {
    SourceNewer,
    LocalNewer,
    Equal,
}

impl MtimeOrder {
    /// Strict three-way comparison. Equality is exact at `SystemTime`
    /// precision, no tolerance window.
    pub fn compare(source: SystemTime, local: SystemTime) -> Self {
        if source > local {
            MtimeOrder::SourceNewer
        } else if local > source {
            MtimeOrder::LocalNewer
        } else {
            MtimeOrder::Equal
        }
    }
}

/// Read contract every source backend satisfies.
#[async_trait]
pub trait Source: Send + Sync + std::fmt::Debug {
    /// Copy the stored entry's content into `to_path`, carrying the stored
    /// modification time onto the local file.
    async fn pull(&self, to_path: &Path, id: &EntryId) -> TetherResult<()>;

    /// Firm existence check. Must not fail for a merely-missing entry; may
    /// fail with `Unsupported` on backends that cannot answer.
    async fn has_entry(&self, id: &EntryId) -> TetherResult<bool>;

    /// Existence check that may report `None` where existence is expensive
    /// or meaningless to determine cheaply.
    async fn maybe_has_entry(&self, id: &EntryId) -> TetherResult<Option<bool>> {
        Ok(Some(self.has_entry(id).await?))
    }

    /// Compare the stored modification time for `id` against `local`.
    async fn compare_mtime(&self, id: &EntryId, local: SystemTime) -> TetherResult<MtimeOrder>;

    /// Write capability, advertised by type. Read-only backends return
    /// `None`; callers branch on this, never on the concrete backend.
    fn as_updatable(&self) -> Option<&dyn UpdatableSource> {
        None
    }
}

/// Write contract for backends that accept pushes.
#[async_trait]
pub trait UpdatableSource: Source {
    /// Copy `from_path`'s content into storage at `id`, creating any
    /// intermediate structure, and carry the local modification time onto
    /// the stored copy so an immediate compare reports `Equal`.
    async fn push(&self, from_path: &Path, id: &EntryId) -> TetherResult<()>;

    /// Delete the stored entry.
    async fn remove(&self, id: &EntryId) -> TetherResult<()>;
}
