//! Synchronization driver

use std::path::{Path, PathBuf};
use std::time::SystemTime;
use tether_core::{EntryId, MtimeOrder, TetherError, TetherResult};
use tether_sources::SourceRegistry;

use crate::config::Config;
use crate::ignore;
use crate::state::{TrackFile, TrackedEntry};

/// Caller-supplied guard around overwrites that would discard a newer copy.
/// Explicit pull/push consult it when `--force` is unset; `sync` never does.
pub trait ConfirmOverwrite {
    fn confirm(&self, prompt: &str) -> bool;
}

/// Per-entry outcome of a `sync` pass.
#[derive(Debug)]
pub enum SyncAction {
    Pulled(EntryId),
    Pushed(EntryId),
    Failed { uid: EntryId, error: TetherError },
}

/// What a `sync` pass did, in tracking order.
#[derive(Debug, Default)]
pub struct SyncReport {
    pub actions: Vec<SyncAction>,
}

impl SyncReport {
    pub fn failures(&self) -> usize {
        self.actions
            .iter()
            .filter(|a| matches!(a, SyncAction::Failed { .. }))
            .count()
    }

    pub fn is_clean(&self) -> bool {
        self.failures() == 0
    }
}

/// Drives per-entry sync decisions across the tracked set.
///
/// Owns the tracking state and the source registry; all mutations go
/// through explicit persist calls, there is no module-level state.
pub struct SyncEngine {
    root: PathBuf,
    registry: SourceRegistry,
    state: TrackFile,
}

impl SyncEngine {
    pub fn new(root: PathBuf, registry: SourceRegistry, state: TrackFile) -> Self {
        Self {
            root,
            registry,
            state,
        }
    }

    /// Load configuration and tracking state from a project root.
    pub fn open(root: PathBuf) -> TetherResult<Self> {
        let config = Config::load(&root)?;
        let state = TrackFile::load(&root)?;
        Ok(Self::new(root, config.into_registry(), state))
    }

    pub fn state(&self) -> &TrackFile {
        &self.state
    }

    pub fn registry(&self) -> &SourceRegistry {
        &self.registry
    }

    fn entry_id(&self, path: &Path) -> TetherResult<EntryId> {
        EntryId::from_path(path, &self.root)
    }

    fn local_path(&self, uid: &EntryId) -> PathBuf {
        self.root.join(uid.to_rel_path())
    }

    fn source_of(&self, uid: &EntryId) -> TetherResult<String> {
        self.state
            .source_of(uid)
            .map(str::to_string)
            .ok_or_else(|| TetherError::NotTracked(uid.to_string()))
    }

    async fn local_mtime(&self, uid: &EntryId) -> TetherResult<SystemTime> {
        Ok(tokio::fs::metadata(self.local_path(uid)).await?.modified()?)
    }

    fn persist(&self) -> TetherResult<()> {
        self.state.persist(&self.root)?;
        ignore::regenerate(&self.root, &self.state)
    }

    /// Bind `path` to the named source. Pushes the current content into the
    /// source when it accepts writes.
    pub async fn track(&mut self, path: &Path, source_name: &str) -> TetherResult<()> {
        let uid = self.entry_id(path)?;
        if let Some(existing) = self.state.source_of(&uid) {
            return Err(TetherError::AlreadyTracked {
                path: uid.to_string(),
                source_name: existing.to_string(),
            });
        }

        let source = self.registry.resolve(source_name)?;
        if let Some(updatable) = source.as_updatable() {
            updatable.push(&self.local_path(&uid), &uid).await?;
        }

        tracing::info!(uid = %uid, source = source_name, "tracking");
        self.state.insert(uid, source_name.to_string());
        self.persist()
    }

    /// Stop tracking `path`, removing the stored copy when the source
    /// accepts writes.
    pub async fn untrack(&mut self, path: &Path) -> TetherResult<()> {
        let uid = self.entry_id(path)?;
        let source_name = self.source_of(&uid)?;

        let source = self.registry.resolve(&source_name)?;
        if let Some(updatable) = source.as_updatable() {
            updatable.remove(&uid).await?;
        }

        tracing::info!(uid = %uid, source = %source_name, "untracking");
        self.state.remove(&uid);
        self.persist()
    }

    /// Re-fetch `path` from its source. Always pulls; the comparison only
    /// gates the overwrite prompt when the local copy is newer.
    pub async fn pull(
        &self,
        path: &Path,
        force: bool,
        confirm: &dyn ConfirmOverwrite,
    ) -> TetherResult<()> {
        let uid = self.entry_id(path)?;
        let source_name = self.source_of(&uid)?;
        let source = self.registry.resolve(&source_name)?;
        let local = self.local_path(&uid);

        if !force && tokio::fs::try_exists(&local).await? {
            let mtime = self.local_mtime(&uid).await?;
            if source.compare_mtime(&uid, mtime).await? == MtimeOrder::LocalNewer
                && !confirm.confirm(&format!(
                    "The local copy of \"{uid}\" is newer than the source copy. Overwrite it?"
                ))
            {
                return Err(TetherError::Aborted);
            }
        }

        source.pull(&local, &uid).await
    }

    /// Push `path` into its source. Always pushes; the comparison only
    /// gates the overwrite prompt when the source copy is newer.
    pub async fn push(
        &self,
        path: &Path,
        force: bool,
        confirm: &dyn ConfirmOverwrite,
    ) -> TetherResult<()> {
        let uid = self.entry_id(path)?;
        let source_name = self.source_of(&uid)?;
        let source = self.registry.resolve(&source_name)?;

        let Some(updatable) = source.as_updatable() else {
            return Err(TetherError::ReadOnlySource(source_name));
        };

        let local = self.local_path(&uid);
        if !force {
            let mtime = self.local_mtime(&uid).await?;
            if source.compare_mtime(&uid, mtime).await? == MtimeOrder::SourceNewer
                && !confirm.confirm(&format!(
                    "The source copy of \"{uid}\" is newer than the local file. Overwrite it?"
                ))
            {
                return Err(TetherError::Aborted);
            }
        }

        updatable.push(&local, &uid).await
    }

    /// Reconcile every tracked entry by timestamp, non-interactively.
    ///
    /// Entries are processed in tracking order and independently: one
    /// entry's failure is recorded in the report and iteration continues.
    /// Completed transfers are not rolled back.
    pub async fn sync(&self) -> SyncReport {
        let mut report = SyncReport::default();
        for entry in self.state.iter() {
            match self.sync_entry(entry).await {
                Ok(Some(action)) => report.actions.push(action),
                Ok(None) => {}
                Err(error) => {
                    tracing::warn!(uid = %entry.uid, %error, "sync entry failed");
                    report.actions.push(SyncAction::Failed {
                        uid: entry.uid.clone(),
                        error,
                    });
                }
            }
        }
        report
    }

    async fn sync_entry(&self, entry: &TrackedEntry) -> TetherResult<Option<SyncAction>> {
        let source = self.registry.resolve(&entry.source)?;
        let local = self.local_path(&entry.uid);
        let mtime = self.local_mtime(&entry.uid).await?;

        match source.compare_mtime(&entry.uid, mtime).await? {
            MtimeOrder::SourceNewer => {
                source.pull(&local, &entry.uid).await?;
                Ok(Some(SyncAction::Pulled(entry.uid.clone())))
            }
            MtimeOrder::LocalNewer => match source.as_updatable() {
                Some(updatable) => {
                    updatable.push(&local, &entry.uid).await?;
                    Ok(Some(SyncAction::Pushed(entry.uid.clone())))
                }
                // Read-only source cannot accept the local change.
                None => Ok(None),
            },
            MtimeOrder::Equal => Ok(None),
        }
    }
}
