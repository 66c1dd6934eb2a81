use chrono::Utc;
use tracing::{debug, warn};

use crate::content::defaults::generate_default_content;
use crate::domain::{ContentKey, ContentStatus, PageContent, Service, Town};
use crate::storage::ContentStore;

/// Where a resolved record came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContentSource {
    Live,
    Pending,
    Default,
}

impl ContentSource {
    pub fn as_str(&self) -> &'static str {
        match self {
            ContentSource::Live => "live",
            ContentSource::Pending => "pending",
            ContentSource::Default => "default",
        }
    }
}

#[derive(Debug, Clone)]
pub struct ResolvedContent {
    pub content: PageContent,
    pub source: ContentSource,
}

pub struct ContentResolver<'a> {
    store: &'a dyn ContentStore,
}

impl<'a> ContentResolver<'a> {
    pub fn new(store: &'a dyn ContentStore) -> Self {
        Self { store }
    }

    /// Live, then pending, then the synthesized default. Never fails: a
    /// tier that cannot be read is logged and skipped.
    pub async fn resolve(&self, service: &Service, town: &Town) -> ResolvedContent {
        match ContentKey::new(service.slug.as_str(), town.slug.as_str()) {
            Ok(key) => {
                for (tier, source) in [
                    (ContentStatus::Live, ContentSource::Live),
                    (ContentStatus::Pending, ContentSource::Pending),
                ] {
                    match self.store.get(tier, &key).await {
                        Ok(Some(content)) => {
                            debug!("Resolved {} content for {}", tier, key);
                            return ResolvedContent { content, source };
                        }
                        Ok(None) => {}
                        Err(e) => warn!("Failed to read {} content for {}: {}", tier, key, e),
                    }
                }
            }
            Err(e) => warn!("Skipping content lookup: {}", e),
        }

        debug!("No stored content for {}/{}, using defaults", service.slug, town.slug);
        ResolvedContent {
            content: generate_default_content(service, town, Utc::now()),
            source: ContentSource::Default,
        }
    }

    pub async fn resolve_content(&self, service: &Service, town: &Town) -> PageContent {
        self.resolve(service, town).await.content
    }
}
