//! Project configuration

use serde::Deserialize;
use std::collections::BTreeMap;
use std::path::Path;
use tether_core::{TetherError, TetherResult};
use tether_sources::{SourceDecl, SourceRegistry};

/// Configuration file name, looked up in the project root.
pub const CONFIG_FILE: &str = "tether.toml";

/// Declared sources for a project. Read-only, loaded once per process.
#[derive(Debug, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub sources: BTreeMap<String, SourceDecl>,
}

impl Config {
    pub fn load(root: &Path) -> TetherResult<Self> {
        let path = root.join(CONFIG_FILE);
        let raw = std::fs::read_to_string(&path).map_err(|e| match e.kind() {
            std::io::ErrorKind::NotFound => TetherError::Config(format!(
                "could not find {CONFIG_FILE} in {}",
                root.display()
            )),
            _ => TetherError::Io(e),
        })?;

        toml::from_str(&raw).map_err(|e| TetherError::Config(format!("{CONFIG_FILE}: {e}")))
    }

    pub fn into_registry(self) -> SourceRegistry {
        SourceRegistry::from_decls(self.sources)
    }
}
