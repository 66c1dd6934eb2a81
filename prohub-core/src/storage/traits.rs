use crate::common::error::{ContentError, Result};
use crate::domain::{ContentKey, ContentStatus, PageContent};
use async_trait::async_trait;
use chrono::{DateTime, Utc};

/// Two-tier page content storage keyed by (service, town).
///
/// Each tier holds at most one record per key. Records returned by `get`
/// carry the status of the tier they were read from.
#[async_trait]
pub trait ContentStore: Send + Sync {
    async fn get(&self, tier: ContentStatus, key: &ContentKey) -> Result<Option<PageContent>>;

    /// Writes (or supersedes) the record in `tier`.
    async fn put(&self, tier: ContentStatus, key: &ContentKey, content: &PageContent) -> Result<()>;

    /// Returns `false` when there was nothing to remove.
    async fn remove(&self, tier: ContentStatus, key: &ContentKey) -> Result<bool>;

    /// Promotes the pending record to live.
    ///
    /// The default implementation writes live before deleting pending and is
    /// not atomic: a crash in between leaves both copies, and readers prefer
    /// live. Backends with transactions override this.
    async fn approve(&self, key: &ContentKey, approved_at: DateTime<Utc>) -> Result<PageContent> {
        let mut content = self
            .get(ContentStatus::Pending, key)
            .await?
            .ok_or_else(|| ContentError::NotPending {
                service: key.service().to_string(),
                town: key.town().to_string(),
            })?;

        content.status = ContentStatus::Live;
        content.approved_at = Some(approved_at);

        self.put(ContentStatus::Live, key, &content).await?;
        self.remove(ContentStatus::Pending, key).await?;
        Ok(content)
    }
}
