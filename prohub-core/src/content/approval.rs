//! Admin-side listing and promotion of generated page content.

use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::{info, warn};

use crate::catalog::Catalog;
use crate::common::error::Result;
use crate::domain::{ContentKey, ContentStatus, PageContent};
use crate::storage::ContentStore;

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ContentListItem {
    pub service: String,
    pub town: String,
    pub status: ContentStatus,
    pub last_updated: DateTime<Utc>,
    pub title: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ContentSummary {
    pub total: usize,
    pub pending: usize,
    pub live: usize,
}

impl ContentSummary {
    pub fn from_items(items: &[ContentListItem]) -> Self {
        let pending = items
            .iter()
            .filter(|i| i.status == ContentStatus::Pending)
            .count();
        Self {
            total: items.len(),
            pending,
            live: items.len() - pending,
        }
    }
}

/// Probes every catalog pair (live first, then pending) and returns the
/// stored records, pending first and most recently updated first within a
/// status. Pairs without any stored record are omitted.
pub async fn list_content(catalog: &Catalog, store: &dyn ContentStore) -> Result<Vec<ContentListItem>> {
    let mut items = Vec::new();

    for service in catalog.services() {
        for town in catalog.towns() {
            let key = ContentKey::new(service.slug.as_str(), town.slug.as_str())?;

            let mut found = None;
            for tier in [ContentStatus::Live, ContentStatus::Pending] {
                match store.get(tier, &key).await {
                    Ok(Some(content)) => {
                        found = Some(content);
                        break;
                    }
                    Ok(None) => {}
                    Err(e) => warn!("Unreadable {} content for {}: {}", tier, key, e),
                }
            }

            if let Some(content) = found {
                let title = if content.title.trim().is_empty() {
                    format!("{} in {}", service.name_plural, town.name)
                } else {
                    content.title
                };
                items.push(ContentListItem {
                    service: service.slug.clone(),
                    town: town.slug.clone(),
                    status: content.status,
                    last_updated: content.last_updated,
                    title,
                });
            }
        }
    }

    items.sort_by(|a, b| {
        a.status
            .cmp(&b.status)
            .then_with(|| b.last_updated.cmp(&a.last_updated))
    });
    Ok(items)
}

pub async fn approve_content(store: &dyn ContentStore, key: &ContentKey) -> Result<PageContent> {
    let content = store.approve(key, Utc::now()).await?;
    info!("Approved content for {}", key);
    Ok(content)
}

/// Drops a freshly generated record into the pending tier, superseding any
/// earlier pending copy.
pub async fn stage_content(store: &dyn ContentStore, key: &ContentKey, mut content: PageContent) -> Result<()> {
    content.status = ContentStatus::Pending;
    content.approved_at = None;
    content.last_updated = Utc::now();
    store.put(ContentStatus::Pending, key, &content).await?;
    info!("Staged pending content for {}", key);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::fixtures;
    use crate::content::defaults::generate_default_content;
    use crate::storage::FileContentStore;
    use chrono::Duration;
    use tempfile::tempdir;

    fn record(catalog: &Catalog, service: &str, town: &str, updated: DateTime<Utc>) -> PageContent {
        let mut content = generate_default_content(
            catalog.service(service).unwrap(),
            catalog.town(town).unwrap(),
            updated,
        );
        content.last_updated = updated;
        content
    }

    #[tokio::test]
    async fn listing_orders_pending_first_then_newest() {
        let dir = tempdir().unwrap();
        let store = FileContentStore::new(dir.path());
        let catalog = fixtures::catalog();
        let now = Utc::now();

        let put = |tier, service: &'static str, town: &'static str, age_hours: i64| {
            let store = store.clone();
            let content = record(&catalog, service, town, now - Duration::hours(age_hours));
            async move {
                let key = ContentKey::new(service, town).unwrap();
                store.put(tier, &key, &content).await.unwrap();
            }
        };

        put(ContentStatus::Live, "plumber", "george", 1).await;
        put(ContentStatus::Pending, "plumber", "mossel-bay", 5).await;
        put(ContentStatus::Pending, "electrician", "george", 2).await;
        put(ContentStatus::Live, "electrician", "oudtshoorn", 10).await;

        let items = list_content(&catalog, &store).await.unwrap();
        let order: Vec<_> = items
            .iter()
            .map(|i| format!("{}:{}/{}", i.status, i.service, i.town))
            .collect();
        assert_eq!(
            order,
            vec![
                "pending:electrician/george",
                "pending:plumber/mossel-bay",
                "live:plumber/george",
                "live:electrician/oudtshoorn",
            ]
        );

        let summary = ContentSummary::from_items(&items);
        assert_eq!(summary, ContentSummary { total: 4, pending: 2, live: 2 });
    }

    #[tokio::test]
    async fn live_shadows_pending_in_listing() {
        let dir = tempdir().unwrap();
        let store = FileContentStore::new(dir.path());
        let catalog = fixtures::catalog();
        let key = ContentKey::new("plumber", "george").unwrap();
        let content = record(&catalog, "plumber", "george", Utc::now());

        store.put(ContentStatus::Pending, &key, &content).await.unwrap();
        store.put(ContentStatus::Live, &key, &content).await.unwrap();

        let items = list_content(&catalog, &store).await.unwrap();
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].status, ContentStatus::Live);
    }

    #[tokio::test]
    async fn blank_title_falls_back_to_catalog_names() {
        let dir = tempdir().unwrap();
        let store = FileContentStore::new(dir.path());
        let catalog = fixtures::catalog();
        let key = ContentKey::new("plumber", "mossel-bay").unwrap();
        let mut content = record(&catalog, "plumber", "mossel-bay", Utc::now());
        content.title = String::new();

        stage_content(&store, &key, content).await.unwrap();

        let items = list_content(&catalog, &store).await.unwrap();
        assert_eq!(items[0].title, "Plumbers in Mossel Bay");
        assert_eq!(items[0].status, ContentStatus::Pending);
    }

    #[tokio::test]
    async fn approve_content_promotes_staged_record() {
        let dir = tempdir().unwrap();
        let store = FileContentStore::new(dir.path());
        let catalog = fixtures::catalog();
        let key = ContentKey::new("electrician", "george").unwrap();

        stage_content(&store, &key, record(&catalog, "electrician", "george", Utc::now()))
            .await
            .unwrap();
        let approved = approve_content(&store, &key).await.unwrap();
        assert_eq!(approved.status, ContentStatus::Live);
        assert!(approved.approved_at.is_some());

        let err = approve_content(&store, &key).await.unwrap_err();
        assert!(err.is_not_found());
    }
}
