//! Directory-mirror source backend

use async_trait::async_trait;
use std::path::{Path, PathBuf};
use std::time::SystemTime;
use tether_core::{EntryId, MtimeOrder, Source, TetherError, TetherResult, UpdatableSource};
use tokio::fs;

/// Source backed by a filesystem subtree.
///
/// Entries live under `<root>/data/` mirroring their identity path. The
/// stored file's native mtime is the source modification time; pull and
/// push carry it across the copy, so no sidecar metadata is needed.
#[derive(Debug)]
pub struct DirSource {
    root: PathBuf,
    data_root: PathBuf,
}

impl DirSource {
    pub fn new(root: impl AsRef<Path>) -> TetherResult<Self> {
        let root = root.as_ref().to_path_buf();
        let data_root = root.join("data");
        std::fs::create_dir_all(&data_root)?;
        Ok(Self { root, data_root })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn entry_path(&self, id: &EntryId) -> PathBuf {
        self.data_root.join(id.to_rel_path())
    }

    async fn stored_mtime(&self, id: &EntryId) -> TetherResult<SystemTime> {
        let stored = self.entry_path(id);
        let meta = fs::metadata(&stored)
            .await
            .map_err(|e| match e.kind() {
                std::io::ErrorKind::NotFound => TetherError::NotFound(id.to_string()),
                _ => TetherError::Io(e),
            })?;
        Ok(meta.modified()?)
    }
}

/// Carry `mtime` onto the file at `path`.
fn set_mtime(path: &Path, mtime: SystemTime) -> std::io::Result<()> {
    let file = std::fs::OpenOptions::new().write(true).open(path)?;
    file.set_modified(mtime)
}

#[async_trait]
impl Source for DirSource {
    async fn pull(&self, to_path: &Path, id: &EntryId) -> TetherResult<()> {
        let stored = self.entry_path(id);
        if !fs::try_exists(&stored).await? {
            return Err(TetherError::NotFound(id.to_string()));
        }

        let mtime = fs::metadata(&stored).await?.modified()?;
        fs::copy(&stored, to_path).await?;
        set_mtime(to_path, mtime)?;

        tracing::debug!(id = %id, from = %stored.display(), "pulled from dir source");
        Ok(())
    }

    async fn has_entry(&self, id: &EntryId) -> TetherResult<bool> {
        Ok(fs::try_exists(self.entry_path(id)).await?)
    }

    async fn compare_mtime(&self, id: &EntryId, local: SystemTime) -> TetherResult<MtimeOrder> {
        let stored = self.stored_mtime(id).await?;
        Ok(MtimeOrder::compare(stored, local))
    }

    fn as_updatable(&self) -> Option<&dyn UpdatableSource> {
        Some(self)
    }
}

#[async_trait]
impl UpdatableSource for DirSource {
    async fn push(&self, from_path: &Path, id: &EntryId) -> TetherResult<()> {
        let stored = self.entry_path(id);
        if let Some(parent) = stored.parent() {
            fs::create_dir_all(parent).await?;
        }

        let mtime = fs::metadata(from_path).await?.modified()?;
        fs::copy(from_path, &stored).await?;
        set_mtime(&stored, mtime)?;

        tracing::debug!(id = %id, to = %stored.display(), "pushed to dir source");
        Ok(())
    }

    async fn remove(&self, id: &EntryId) -> TetherResult<()> {
        let stored = self.entry_path(id);
        if !fs::try_exists(&stored).await? {
            return Err(TetherError::NotFound(id.to_string()));
        }
        fs::remove_file(&stored).await?;

        tracing::debug!(id = %id, "removed from dir source");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::{Duration, UNIX_EPOCH};

    fn id(s: &str) -> EntryId {
        EntryId::new(s).unwrap()
    }

    fn write_with_mtime(path: &Path, content: &str, mtime: SystemTime) {
        std::fs::write(path, content).unwrap();
        set_mtime(path, mtime).unwrap();
    }

    fn mtime_of(path: &Path) -> SystemTime {
        std::fs::metadata(path).unwrap().modified().unwrap()
    }

    #[tokio::test]
    async fn test_push_stores_under_data_root() {
        let store = tempfile::tempdir().unwrap();
        let work = tempfile::tempdir().unwrap();
        let source = DirSource::new(store.path()).unwrap();

        let local = work.path().join("a.txt");
        std::fs::write(&local, "hello").unwrap();
        source.push(&local, &id("a.txt")).await.unwrap();

        let stored = store.path().join("data").join("a.txt");
        assert_eq!(std::fs::read_to_string(&stored).unwrap(), "hello");
        assert_eq!(mtime_of(&stored), mtime_of(&local));
    }

    #[tokio::test]
    async fn test_push_creates_intermediate_directories() {
        let store = tempfile::tempdir().unwrap();
        let work = tempfile::tempdir().unwrap();
        let source = DirSource::new(store.path()).unwrap();

        let local = work.path().join("a.txt");
        std::fs::write(&local, "nested").unwrap();
        source.push(&local, &id("notes/deep/a.txt")).await.unwrap();

        let stored = store.path().join("data/notes/deep/a.txt");
        assert_eq!(std::fs::read_to_string(stored).unwrap(), "nested");
    }

    #[tokio::test]
    async fn test_push_then_compare_is_equal() {
        let store = tempfile::tempdir().unwrap();
        let work = tempfile::tempdir().unwrap();
        let source = DirSource::new(store.path()).unwrap();

        let local = work.path().join("a.txt");
        write_with_mtime(&local, "hello", UNIX_EPOCH + Duration::from_secs(1_700_000_000));
        source.push(&local, &id("a.txt")).await.unwrap();

        let order = source
            .compare_mtime(&id("a.txt"), mtime_of(&local))
            .await
            .unwrap();
        assert_eq!(order, MtimeOrder::Equal);
    }

    #[tokio::test]
    async fn test_pull_reproduces_content_and_mtime() {
        let store = tempfile::tempdir().unwrap();
        let work = tempfile::tempdir().unwrap();
        let source = DirSource::new(store.path()).unwrap();

        let original = work.path().join("a.txt");
        write_with_mtime(
            &original,
            "payload",
            UNIX_EPOCH + Duration::from_secs(1_600_000_000),
        );
        source.push(&original, &id("a.txt")).await.unwrap();

        let copy = work.path().join("b.txt");
        source.pull(&copy, &id("a.txt")).await.unwrap();

        assert_eq!(std::fs::read_to_string(&copy).unwrap(), "payload");
        assert_eq!(mtime_of(&copy), mtime_of(&original));

        let order = source
            .compare_mtime(&id("a.txt"), mtime_of(&copy))
            .await
            .unwrap();
        assert_eq!(order, MtimeOrder::Equal);
    }

    #[tokio::test]
    async fn test_pull_missing_entry_is_not_found() {
        let store = tempfile::tempdir().unwrap();
        let work = tempfile::tempdir().unwrap();
        let source = DirSource::new(store.path()).unwrap();

        let err = source
            .pull(&work.path().join("a.txt"), &id("a.txt"))
            .await
            .unwrap_err();
        assert!(matches!(err, TetherError::NotFound(_)));
    }

    #[tokio::test]
    async fn test_compare_orders() {
        let store = tempfile::tempdir().unwrap();
        let work = tempfile::tempdir().unwrap();
        let source = DirSource::new(store.path()).unwrap();

        let local = work.path().join("a.txt");
        write_with_mtime(&local, "v1", UNIX_EPOCH + Duration::from_secs(1000));
        source.push(&local, &id("a.txt")).await.unwrap();

        let older = UNIX_EPOCH + Duration::from_secs(500);
        let newer = UNIX_EPOCH + Duration::from_secs(1500);
        assert_eq!(
            source.compare_mtime(&id("a.txt"), older).await.unwrap(),
            MtimeOrder::SourceNewer
        );
        assert_eq!(
            source.compare_mtime(&id("a.txt"), newer).await.unwrap(),
            MtimeOrder::LocalNewer
        );
    }

    #[tokio::test]
    async fn test_has_entry() {
        let store = tempfile::tempdir().unwrap();
        let work = tempfile::tempdir().unwrap();
        let source = DirSource::new(store.path()).unwrap();

        assert!(!source.has_entry(&id("a.txt")).await.unwrap());

        let local = work.path().join("a.txt");
        std::fs::write(&local, "here").unwrap();
        source.push(&local, &id("a.txt")).await.unwrap();

        assert!(source.has_entry(&id("a.txt")).await.unwrap());
        // Existence is a cheap filesystem check, so the answer is firm.
        assert_eq!(source.maybe_has_entry(&id("a.txt")).await.unwrap(), Some(true));
    }

    #[tokio::test]
    async fn test_remove() {
        let store = tempfile::tempdir().unwrap();
        let work = tempfile::tempdir().unwrap();
        let source = DirSource::new(store.path()).unwrap();

        let local = work.path().join("a.txt");
        std::fs::write(&local, "bye").unwrap();
        source.push(&local, &id("a.txt")).await.unwrap();

        source.remove(&id("a.txt")).await.unwrap();
        assert!(!source.has_entry(&id("a.txt")).await.unwrap());

        let err = source.remove(&id("a.txt")).await.unwrap_err();
        assert!(matches!(err, TetherError::NotFound(_)));
    }
}
