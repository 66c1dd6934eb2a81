use crate::common::error::Result;
use crate::domain::{ContentKey, ContentStatus, PageContent};
use crate::storage::traits::ContentStore;
use async_trait::async_trait;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tokio::fs;
use tracing::debug;

/// File-backed tiers: `<root>/<tier>/<service>/<town>.json`.
#[derive(Debug, Clone)]
pub struct FileContentStore {
    root: PathBuf,
}

impl FileContentStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn service_dir(&self, tier: ContentStatus, key: &ContentKey) -> PathBuf {
        self.root.join(tier.as_str()).join(key.service())
    }

    pub fn record_path(&self, tier: ContentStatus, key: &ContentKey) -> PathBuf {
        self.service_dir(tier, key).join(format!("{}.json", key.town()))
    }

    async fn remove_dir_if_empty(&self, dir: &Path) -> Result<()> {
        let mut entries = match fs::read_dir(dir).await {
            Ok(entries) => entries,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(()),
            Err(e) => return Err(e.into()),
        };
        if entries.next_entry().await?.is_none() {
            fs::remove_dir(dir).await?;
            debug!("Removed empty content directory {}", dir.display());
        }
        Ok(())
    }
}

#[async_trait]
impl ContentStore for FileContentStore {
    async fn get(&self, tier: ContentStatus, key: &ContentKey) -> Result<Option<PageContent>> {
        let path = self.record_path(tier, key);
        let raw = match fs::read_to_string(&path).await {
            Ok(raw) => raw,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(e.into()),
        };
        let mut content: PageContent = serde_json::from_str(&raw)?;
        content.status = tier;
        Ok(Some(content))
    }

    async fn put(&self, tier: ContentStatus, key: &ContentKey, content: &PageContent) -> Result<()> {
        let dir = self.service_dir(tier, key);
        fs::create_dir_all(&dir).await?;

        let mut record = content.clone();
        record.status = tier;
        let body = serde_json::to_string_pretty(&record)?;
        fs::write(self.record_path(tier, key), body).await?;
        debug!("Wrote {} content for {}", tier, key);
        Ok(())
    }

    async fn remove(&self, tier: ContentStatus, key: &ContentKey) -> Result<bool> {
        match fs::remove_file(self.record_path(tier, key)).await {
            Ok(()) => {}
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(false),
            Err(e) => return Err(e.into()),
        }
        if tier == ContentStatus::Pending {
            self.remove_dir_if_empty(&self.service_dir(tier, key)).await?;
        }
        Ok(true)
    }
}
