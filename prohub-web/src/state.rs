use chrono::Duration;
use prohub_seo::AppContext;
use std::path::PathBuf;
use std::sync::Arc;

use crate::session::SessionStore;

#[derive(Clone)]
pub struct AppState {
    pub ctx: AppContext,
    pub sessions: Arc<SessionStore>,
    pub static_dir: PathBuf,
}

impl AppState {
    pub fn new(ctx: AppContext) -> Self {
        let ttl = Duration::seconds(ctx.config.admin.session_ttl_secs as i64);
        Self {
            ctx,
            sessions: Arc::new(SessionStore::new(ttl)),
            static_dir: PathBuf::from(concat!(env!("CARGO_MANIFEST_DIR"), "/static")),
        }
    }

    pub fn with_static_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.static_dir = dir.into();
        self
    }
}
