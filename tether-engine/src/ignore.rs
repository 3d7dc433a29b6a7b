//! Generated ignore hints
//!
//! The tracked set is mirrored into an ignore file for git to consume. The
//! file is entirely derived from the tracking state, so it is rewritten
//! unconditionally after every mutation.

use std::path::Path;
use tether_core::TetherResult;

use crate::state::TrackFile;

/// Ignore-hint file name, in the project root.
pub const IGNORE_FILE: &str = "tether.gitignore";

const BANNER: &str = "\
# +------------------------------------------------------------------+
# | This file is AUTOGENERATED by tether. Edits will be overwritten. |
# +------------------------------------------------------------------+";

/// Regenerate the ignore-hint file from the tracked set. Only applies when
/// the project root is under git.
pub fn regenerate(root: &Path, state: &TrackFile) -> TetherResult<()> {
    if !root.join(".git").is_dir() {
        return Ok(());
    }

    let mut out = String::from(BANNER);
    out.push_str("\n\n");
    for entry in state.iter() {
        out.push_str(entry.uid.as_str());
        out.push('\n');
    }
    out.push('\n');
    out.push_str(BANNER);
    out.push('\n');

    std::fs::write(root.join(IGNORE_FILE), out)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tether_core::EntryId;

    #[test]
    fn test_skipped_outside_git() {
        let root = tempfile::tempdir().unwrap();
        let state = TrackFile::new();

        regenerate(root.path(), &state).unwrap();
        assert!(!root.path().join(IGNORE_FILE).exists());
    }

    #[test]
    fn test_regenerated_under_git() {
        let root = tempfile::tempdir().unwrap();
        std::fs::create_dir(root.path().join(".git")).unwrap();

        let mut state = TrackFile::new();
        state.insert(EntryId::new("a.txt").unwrap(), "local".into());
        state.insert(EntryId::new("notes/b.txt").unwrap(), "local".into());

        regenerate(root.path(), &state).unwrap();

        let out = std::fs::read_to_string(root.path().join(IGNORE_FILE)).unwrap();
        assert!(out.contains("a.txt\n"));
        assert!(out.contains("notes/b.txt\n"));
        assert!(out.starts_with("# +"));
        assert!(out.trim_end().ends_with("+"));
    }

    #[test]
    fn test_rewrite_drops_stale_entries() {
        let root = tempfile::tempdir().unwrap();
        std::fs::create_dir(root.path().join(".git")).unwrap();

        let mut state = TrackFile::new();
        state.insert(EntryId::new("a.txt").unwrap(), "local".into());
        regenerate(root.path(), &state).unwrap();

        state.remove(&EntryId::new("a.txt").unwrap());
        regenerate(root.path(), &state).unwrap();

        let out = std::fs::read_to_string(root.path().join(IGNORE_FILE)).unwrap();
        assert!(!out.contains("a.txt"));
    }
}
