//! Read-only URL source backend

use async_trait::async_trait;
use futures::StreamExt;
use reqwest::Client;
use std::path::Path;
use std::time::SystemTime;
use tether_core::{EntryId, MtimeOrder, Source, TetherError, TetherResult};
use tokio::io::AsyncWriteExt;

/// Fetch-only source over a base URL plus the entry identity.
///
/// The backend has no notion of local staleness: every comparison asserts
/// the remote is authoritative, which forces `sync` down the pull path.
#[derive(Debug)]
pub struct UrlSource {
    base: String,
    http: Client,
}

impl UrlSource {
    pub fn new(base: impl Into<String>) -> Self {
        Self {
            base: base.into(),
            http: Client::new(),
        }
    }

    fn entry_url(&self, id: &EntryId) -> String {
        format!("{}/{}", self.base.trim_end_matches('/'), id)
    }
}

#[async_trait]
impl Source for UrlSource {
    async fn pull(&self, to_path: &Path, id: &EntryId) -> TetherResult<()> {
        let url = self.entry_url(id);

        let response = self
            .http
            .get(&url)
            .send()
            .await
            .map_err(|e| TetherError::Network(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(TetherError::Network(format!("GET {url}: {status}")));
        }

        let mut file = tokio::fs::File::create(to_path).await?;
        let mut stream = response.bytes_stream();
        while let Some(chunk) = stream.next().await {
            let bytes = chunk.map_err(|e| TetherError::Network(e.to_string()))?;
            file.write_all(&bytes).await?;
        }
        file.flush().await?;

        tracing::debug!(id = %id, url = %url, "pulled from url source");
        Ok(())
    }

    async fn has_entry(&self, id: &EntryId) -> TetherResult<bool> {
        Err(TetherError::Unsupported(format!(
            "existence check for {id} on a url source"
        )))
    }

    // Existence is not determinable without a fetch attempt.
    async fn maybe_has_entry(&self, _id: &EntryId) -> TetherResult<Option<bool>> {
        Ok(None)
    }

    async fn compare_mtime(&self, _id: &EntryId, _local: SystemTime) -> TetherResult<MtimeOrder> {
        Ok(MtimeOrder::SourceNewer)
    }
}
