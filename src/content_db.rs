//! SQLite content tiers. Both tiers live in one `page_content` table keyed by
//! (service, town, tier), so approval is a single transaction.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use prohub_core::{ContentError, ContentKey, ContentStatus, ContentStore, PageContent, Result};
use rusqlite::{params, Connection, OptionalExtension, Transaction};
use std::path::Path;
use std::sync::{Mutex, MutexGuard};
use tracing::{debug, info};

const SCHEMA: &str = include_str!("../migrations/001_page_content.sql");

pub struct SqliteContentStore {
    conn: Mutex<Connection>,
}

fn db_error(e: rusqlite::Error) -> ContentError {
    ContentError::Database {
        message: e.to_string(),
    }
}

impl SqliteContentStore {
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let conn = Connection::open(path).map_err(db_error)?;
        info!("Opened content database at {}", path.display());
        Self::with_connection(conn)
    }

    pub fn open_in_memory() -> Result<Self> {
        Self::with_connection(Connection::open_in_memory().map_err(db_error)?)
    }

    fn with_connection(conn: Connection) -> Result<Self> {
        conn.execute_batch(SCHEMA).map_err(db_error)?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    fn lock(&self) -> Result<MutexGuard<'_, Connection>> {
        self.conn.lock().map_err(|_| ContentError::Database {
            message: "content database lock poisoned".to_string(),
        })
    }
}

fn read_record(conn: &Connection, tier: ContentStatus, key: &ContentKey) -> Result<Option<PageContent>> {
    let body: Option<String> = conn
        .query_row(
            "SELECT body FROM page_content WHERE service = ?1 AND town = ?2 AND tier = ?3",
            params![key.service(), key.town(), tier.as_str()],
            |row| row.get(0),
        )
        .optional()
        .map_err(db_error)?;

    match body {
        Some(body) => {
            let mut content: PageContent = serde_json::from_str(&body)?;
            content.status = tier;
            Ok(Some(content))
        }
        None => Ok(None),
    }
}

fn write_record(conn: &Connection, tier: ContentStatus, key: &ContentKey, content: &PageContent) -> Result<()> {
    let mut record = content.clone();
    record.status = tier;
    let body = serde_json::to_string(&record)?;
    conn.execute(
        "INSERT INTO page_content (service, town, tier, body, last_updated, approved_at)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6)
         ON CONFLICT(service, town, tier) DO UPDATE SET
             body = excluded.body,
             last_updated = excluded.last_updated,
             approved_at = excluded.approved_at",
        params![
            key.service(),
            key.town(),
            tier.as_str(),
            body,
            record.last_updated.to_rfc3339(),
            record.approved_at.map(|t| t.to_rfc3339()),
        ],
    )
    .map_err(db_error)?;
    Ok(())
}

fn delete_record(conn: &Connection, tier: ContentStatus, key: &ContentKey) -> Result<bool> {
    let removed = conn
        .execute(
            "DELETE FROM page_content WHERE service = ?1 AND town = ?2 AND tier = ?3",
            params![key.service(), key.town(), tier.as_str()],
        )
        .map_err(db_error)?;
    Ok(removed > 0)
}

fn promote(tx: &Transaction<'_>, key: &ContentKey, approved_at: DateTime<Utc>) -> Result<PageContent> {
    let mut content = read_record(tx, ContentStatus::Pending, key)?.ok_or_else(|| ContentError::NotPending {
        service: key.service().to_string(),
        town: key.town().to_string(),
    })?;
    content.status = ContentStatus::Live;
    content.approved_at = Some(approved_at);

    write_record(tx, ContentStatus::Live, key, &content)?;
    delete_record(tx, ContentStatus::Pending, key)?;
    Ok(content)
}

#[async_trait]
impl ContentStore for SqliteContentStore {
    async fn get(&self, tier: ContentStatus, key: &ContentKey) -> Result<Option<PageContent>> {
        let conn = self.lock()?;
        read_record(&conn, tier, key)
    }

    async fn put(&self, tier: ContentStatus, key: &ContentKey, content: &PageContent) -> Result<()> {
        let conn = self.lock()?;
        write_record(&conn, tier, key, content)?;
        debug!("Wrote {} content for {}", tier, key);
        Ok(())
    }

    async fn remove(&self, tier: ContentStatus, key: &ContentKey) -> Result<bool> {
        let conn = self.lock()?;
        delete_record(&conn, tier, key)
    }

    /// Moves pending to live in one transaction; nothing changes on failure.
    async fn approve(&self, key: &ContentKey, approved_at: DateTime<Utc>) -> Result<PageContent> {
        let mut conn = self.lock()?;
        let tx = conn.transaction().map_err(db_error)?;
        let content = promote(&tx, key, approved_at)?;
        tx.commit().map_err(db_error)?;
        Ok(content)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use prohub_core::content::approve_content;

    fn record(title: &str) -> PageContent {
        serde_json::from_value(serde_json::json!({
            "title": title,
            "description": "d",
            "heroTitle": "h",
            "heroSubtitle": "s",
            "guideIntro": "i",
            "guideServiceTypes": "t",
            "guideDiyVsPro": "p",
            "guideWhatToExpect": "e",
            "guideChoosingProvider": "c",
            "faqs": [],
            "status": "pending",
            "lastUpdated": "2026-01-10T08:00:00Z"
        }))
        .unwrap()
    }

    #[tokio::test]
    async fn reads_report_the_tier_they_came_from() {
        let store = SqliteContentStore::open_in_memory().unwrap();
        let key = ContentKey::new("plumber", "george").unwrap();

        store.put(ContentStatus::Live, &key, &record("Plumbers")).await.unwrap();

        let live = store.get(ContentStatus::Live, &key).await.unwrap().unwrap();
        assert_eq!(live.status, ContentStatus::Live);
        assert!(store.get(ContentStatus::Pending, &key).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn put_supersedes_existing_record() {
        let store = SqliteContentStore::open_in_memory().unwrap();
        let key = ContentKey::new("plumber", "george").unwrap();

        store.put(ContentStatus::Pending, &key, &record("First")).await.unwrap();
        store.put(ContentStatus::Pending, &key, &record("Second")).await.unwrap();

        let pending = store.get(ContentStatus::Pending, &key).await.unwrap().unwrap();
        assert_eq!(pending.title, "Second");
    }

    #[tokio::test]
    async fn approve_moves_pending_to_live() {
        let store = SqliteContentStore::open_in_memory().unwrap();
        let key = ContentKey::new("electrician", "knysna").unwrap();
        store.put(ContentStatus::Pending, &key, &record("Electricians")).await.unwrap();

        let approved = approve_content(&store, &key).await.unwrap();

        assert_eq!(approved.status, ContentStatus::Live);
        assert!(approved.approved_at.is_some());
        assert!(store.get(ContentStatus::Pending, &key).await.unwrap().is_none());
        let live = store.get(ContentStatus::Live, &key).await.unwrap().unwrap();
        assert_eq!(live.approved_at, approved.approved_at);
        assert_eq!(live.title, "Electricians");
    }

    #[tokio::test]
    async fn approving_missing_record_changes_nothing() {
        let store = SqliteContentStore::open_in_memory().unwrap();
        let key = ContentKey::new("electrician", "knysna").unwrap();

        let err = store.approve(&key, Utc::now()).await.unwrap_err();

        assert!(err.is_not_found());
        assert!(store.get(ContentStatus::Live, &key).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn reopening_the_file_keeps_records() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested/content.db");
        let key = ContentKey::new("painter", "wilderness").unwrap();

        {
            let store = SqliteContentStore::open(&path).unwrap();
            store.put(ContentStatus::Pending, &key, &record("Painters")).await.unwrap();
        }

        let store = SqliteContentStore::open(&path).unwrap();
        assert!(store.get(ContentStatus::Pending, &key).await.unwrap().is_some());
    }
}
