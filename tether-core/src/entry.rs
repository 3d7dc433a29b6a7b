//! Tracked entry identity

use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Component, Path, PathBuf};

use crate::error::{TetherError, TetherResult};

/// Normalized relative path uniquely identifying a tracked file within the
/// project root.
///
/// The identity doubles as the storage-relative path on a source backend, so
/// normalization rejects anything that would climb out of the root.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EntryId(String);

impl EntryId {
    /// Normalize a raw relative path string into an identity.
    ///
    /// Empty and `.` segments are dropped; `..` pops the previous segment.
    /// Normalization is idempotent.
    pub fn new(raw: impl AsRef<str>) -> TetherResult<Self> {
        let raw = raw.as_ref();
        let mut segments: Vec<&str> = Vec::new();

        for part in raw.split('/') {
            match part {
                "" | "." => {}
                ".." => {
                    if segments.pop().is_none() {
                        return Err(TetherError::InvalidPath(raw.to_string()));
                    }
                }
                seg => segments.push(seg),
            }
        }

        if segments.is_empty() {
            return Err(TetherError::InvalidPath(raw.to_string()));
        }

        Ok(Self(segments.join("/")))
    }

    /// Identity of `path` relative to the project `root`.
    ///
    /// Absolute paths must live under `root`; relative paths are taken as
    /// already root-relative.
    pub fn from_path(path: &Path, root: &Path) -> TetherResult<Self> {
        let relative = if path.is_absolute() {
            path.strip_prefix(root)
                .map_err(|_| TetherError::InvalidPath(path.display().to_string()))?
        } else {
            path
        };

        let mut segments: Vec<String> = Vec::new();
        for component in relative.components() {
            match component {
                Component::CurDir => {}
                Component::ParentDir => {
                    if segments.pop().is_none() {
                        return Err(TetherError::InvalidPath(path.display().to_string()));
                    }
                }
                Component::Normal(seg) => segments.push(seg.to_string_lossy().into_owned()),
                Component::RootDir | Component::Prefix(_) => {
                    return Err(TetherError::InvalidPath(path.display().to_string()));
                }
            }
        }

        if segments.is_empty() {
            return Err(TetherError::InvalidPath(path.display().to_string()));
        }

        Ok(Self(segments.join("/")))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn segments(&self) -> impl Iterator<Item = &str> {
        self.0.split('/')
    }

    /// Relative filesystem path for this identity.
    pub fn to_rel_path(&self) -> PathBuf {
        self.segments().collect()
    }
}

impl fmt::Display for EntryId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new() {
        let id = EntryId::new("notes/a.txt").unwrap();
        assert_eq!(id.as_str(), "notes/a.txt");
    }

    #[test]
    fn test_new_drops_empty_and_dot_segments() {
        let id = EntryId::new("./notes//a.txt").unwrap();
        assert_eq!(id.as_str(), "notes/a.txt");
    }

    #[test]
    fn test_new_resolves_dotdot() {
        let id = EntryId::new("notes/old/../a.txt").unwrap();
        assert_eq!(id.as_str(), "notes/a.txt");
    }

    #[test]
    fn test_new_rejects_escape() {
        assert!(EntryId::new("../a.txt").is_err());
        assert!(EntryId::new("notes/../../a.txt").is_err());
    }

    #[test]
    fn test_new_rejects_empty() {
        assert!(EntryId::new("").is_err());
        assert!(EntryId::new("./.").is_err());
    }

    #[test]
    fn test_normalization_idempotent() {
        let once = EntryId::new("./notes/old/..//a.txt").unwrap();
        let twice = EntryId::new(once.as_str()).unwrap();
        assert_eq!(once, twice);
    }

    #[test]
    fn test_spellings_normalize_equal() {
        let a = EntryId::new("a.txt").unwrap();
        let b = EntryId::new("./a.txt").unwrap();
        let c = EntryId::new("notes/../a.txt").unwrap();
        assert_eq!(a, b);
        assert_eq!(a, c);
    }

    #[test]
    fn test_from_path_relative() {
        let id = EntryId::from_path(Path::new("notes/a.txt"), Path::new("/project")).unwrap();
        assert_eq!(id.as_str(), "notes/a.txt");
    }

    #[test]
    fn test_from_path_absolute_under_root() {
        let id =
            EntryId::from_path(Path::new("/project/notes/a.txt"), Path::new("/project")).unwrap();
        assert_eq!(id.as_str(), "notes/a.txt");
    }

    #[test]
    fn test_from_path_absolute_outside_root() {
        assert!(EntryId::from_path(Path::new("/elsewhere/a.txt"), Path::new("/project")).is_err());
    }

    #[test]
    fn test_to_rel_path() {
        let id = EntryId::new("notes/a.txt").unwrap();
        assert_eq!(id.to_rel_path(), PathBuf::from("notes").join("a.txt"));
    }

    #[test]
    fn test_display() {
        let id = EntryId::new("notes/a.txt").unwrap();
        assert_eq!(format!("{}", id), "notes/a.txt");
    }
}
