pub mod config;
pub mod constants;
pub mod content_db;
pub mod context;
pub mod directory;
pub mod error;
pub mod listings;
pub mod logging;
pub mod matcher;
pub mod metrics;

pub use context::AppContext;
pub use error::{Result, SeoError};
