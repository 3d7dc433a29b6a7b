//! Persisted tracking state

use serde::{Deserialize, Serialize};
use std::path::Path;
use tether_core::{EntryId, TetherError, TetherResult};

/// Tracking state file name, in the project root.
pub const TRACK_FILE: &str = "tetherfile.toml";

/// One tracked file: its identity and the source it is bound to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrackedEntry {
    pub uid: EntryId,
    pub source: String,
}

#[derive(Debug, Default, Serialize, Deserialize)]
struct TrackFileDoc {
    #[serde(default)]
    tracked: Vec<TrackedEntry>,
}

/// The uid → source mapping, insertion-ordered so `sync` reports are
/// deterministic. Loaded whole at process start, rewritten whole after any
/// mutation.
#[derive(Debug, Default)]
pub struct TrackFile {
    entries: Vec<TrackedEntry>,
}

impl TrackFile {
    pub fn new() -> Self {
        Self::default()
    }

    /// Load from the project root. A missing file is an empty set.
    pub fn load(root: &Path) -> TetherResult<Self> {
        let path = root.join(TRACK_FILE);
        let raw = match std::fs::read_to_string(&path) {
            Ok(raw) => raw,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Self::new()),
            Err(e) => return Err(TetherError::Io(e)),
        };

        let doc: TrackFileDoc =
            toml::from_str(&raw).map_err(|e| TetherError::Config(format!("{TRACK_FILE}: {e}")))?;

        let mut state = Self::new();
        for entry in doc.tracked {
            if state.source_of(&entry.uid).is_some() {
                return Err(TetherError::Config(format!(
                    "{TRACK_FILE}: duplicate entry {}",
                    entry.uid
                )));
            }
            state.entries.push(entry);
        }
        Ok(state)
    }

    /// Rewrite the state file in full.
    pub fn persist(&self, root: &Path) -> TetherResult<()> {
        let doc = TrackFileDoc {
            tracked: self.entries.clone(),
        };
        let raw = toml::to_string(&doc)
            .map_err(|e| TetherError::Config(format!("{TRACK_FILE}: {e}")))?;
        std::fs::write(root.join(TRACK_FILE), raw)?;
        Ok(())
    }

    pub fn source_of(&self, uid: &EntryId) -> Option<&str> {
        self.entries
            .iter()
            .find(|e| &e.uid == uid)
            .map(|e| e.source.as_str())
    }

    pub fn insert(&mut self, uid: EntryId, source: String) {
        self.entries.push(TrackedEntry { uid, source });
    }

    /// Remove the entry for `uid`. Returns whether it was present.
    pub fn remove(&mut self, uid: &EntryId) -> bool {
        let before = self.entries.len();
        self.entries.retain(|e| &e.uid != uid);
        self.entries.len() != before
    }

    pub fn iter(&self) -> impl Iterator<Item = &TrackedEntry> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
