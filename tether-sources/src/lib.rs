//! Source backends for tether
//!
//! A source is a named external location a tracked file is bound to. Two
//! backends exist: a directory mirror (read-write) and a base-URL fetcher
//! (read-only). Declarations carry a type tag that selects the backend.

mod dir;
mod url;

pub use dir::DirSource;
pub use url::UrlSource;

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::PathBuf;
use std::sync::Arc;
use tether_core::{Source, TetherError, TetherResult};

/// A typed source declaration from configuration.
///
/// The tag is closed: an unrecognized `type` fails at deserialization time,
/// before any command logic runs.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum SourceDecl {
    /// Directory-mirror source rooted at `path`.
    Dir { path: PathBuf },
    /// Read-only source fetching from `base_url` + entry id.
    Url { base_url: String },
}

impl SourceDecl {
    pub fn type_tag(&self) -> &'static str {
        match self {
            SourceDecl::Dir { .. } => "dir",
            SourceDecl::Url { .. } => "url",
        }
    }

    /// Whether a backend built from this declaration accepts pushes.
    pub fn is_updatable(&self) -> bool {
        matches!(self, SourceDecl::Dir { .. })
    }

    /// Build a live backend for this declaration. Declarations are
    /// immutable for the process lifetime, so a fresh instance per lookup
    /// is equivalent to a cached one.
    pub fn connect(&self) -> TetherResult<Arc<dyn Source>> {
        match self {
            SourceDecl::Dir { path } => Ok(Arc::new(DirSource::new(path)?)),
            SourceDecl::Url { base_url } => Ok(Arc::new(UrlSource::new(base_url))),
        }
    }
}

/// Registry of declared sources, keyed by name.
pub struct SourceRegistry {
    decls: BTreeMap<String, SourceDecl>,
}

impl SourceRegistry {
    pub fn new() -> Self {
        Self {
            decls: BTreeMap::new(),
        }
    }

    pub fn from_decls(decls: BTreeMap<String, SourceDecl>) -> Self {
        Self { decls }
    }

    pub fn register(&mut self, name: impl Into<String>, decl: SourceDecl) {
        self.decls.insert(name.into(), decl);
    }

    pub fn decl(&self, name: &str) -> Option<&SourceDecl> {
        self.decls.get(name)
    }

    /// Resolve a source name to a live backend.
    pub fn resolve(&self, name: &str) -> TetherResult<Arc<dyn Source>> {
        self.decls
            .get(name)
            .ok_or_else(|| TetherError::Config(format!("no source named {name}")))?
            .connect()
    }

    pub fn list(&self) -> Vec<&str> {
        self.decls.keys().map(|s| s.as_str()).collect()
    }
}

impl Default for SourceRegistry {
    fn default() -> Self {
        Self::new()
    }
}
