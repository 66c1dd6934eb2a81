use crate::config::{Config, ContentBackend};
use crate::content_db::SqliteContentStore;
use crate::directory::{Directory, InMemoryDirectory, SupabaseClient};
use crate::error::Result;
use prohub_core::{Catalog, ContentStore, FileContentStore};
use std::sync::Arc;
use tracing::{info, warn};

/// Everything a command or request handler needs, built once from config.
#[derive(Clone)]
pub struct AppContext {
    pub config: Arc<Config>,
    pub catalog: Arc<Catalog>,
    pub store: Arc<dyn ContentStore>,
    pub directory: Arc<dyn Directory>,
}

impl AppContext {
    pub fn from_config(config: Config) -> Result<Self> {
        let catalog = Catalog::load(&config.catalog.dir)?;
        let store = open_content_store(&config)?;
        let directory = open_directory(&config)?;

        Ok(Self {
            config: Arc::new(config),
            catalog: Arc::new(catalog),
            store,
            directory,
        })
    }

    pub fn new(
        config: Config,
        catalog: Catalog,
        store: Arc<dyn ContentStore>,
        directory: Arc<dyn Directory>,
    ) -> Self {
        Self {
            config: Arc::new(config),
            catalog: Arc::new(catalog),
            store,
            directory,
        }
    }
}

pub fn open_content_store(config: &Config) -> Result<Arc<dyn ContentStore>> {
    Ok(match config.content.backend {
        ContentBackend::Files => {
            info!("Using file content tiers under {}", config.content.dir.display());
            Arc::new(FileContentStore::new(&config.content.dir))
        }
        ContentBackend::Sqlite => Arc::new(SqliteContentStore::open(&config.content.sqlite_path)?),
    })
}

pub fn open_directory(config: &Config) -> Result<Arc<dyn Directory>> {
    match SupabaseClient::from_config(&config.supabase)? {
        Some(client) => {
            info!("Provider directory: Supabase");
            Ok(Arc::new(client))
        }
        None => {
            warn!("SUPABASE_URL/SUPABASE_ANON_KEY not set; provider sections will be empty");
            Ok(Arc::new(InMemoryDirectory::empty()))
        }
    }
}
