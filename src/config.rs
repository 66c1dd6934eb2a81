use crate::error::{Result, SeoError};
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

pub const DEFAULT_CONFIG_PATH: &str = "config.toml";

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    pub site: SiteConfig,
    pub catalog: CatalogConfig,
    pub content: ContentConfig,
    pub supabase: SupabaseConfig,
    pub server: ServerConfig,
    pub admin: AdminConfig,
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct SiteConfig {
    pub name: String,
    pub base_url: String,
    /// The quote-request product pages link out to.
    pub app_url: String,
    pub locale: String,
    pub revalidate_secs: u64,
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            name: "ProHub".to_string(),
            base_url: "https://prohub.co.za".to_string(),
            app_url: "https://app.prohub.co.za".to_string(),
            locale: "en_ZA".to_string(),
            revalidate_secs: 86_400,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct CatalogConfig {
    pub dir: PathBuf,
}

impl Default for CatalogConfig {
    fn default() -> Self {
        Self { dir: PathBuf::from("data") }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ContentBackend {
    #[default]
    Files,
    Sqlite,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ContentConfig {
    pub backend: ContentBackend,
    /// Root of the `pending/` and `live/` trees for the files backend.
    pub dir: PathBuf,
    pub sqlite_path: PathBuf,
}

impl Default for ContentConfig {
    fn default() -> Self {
        Self {
            backend: ContentBackend::Files,
            dir: PathBuf::from("data/content"),
            sqlite_path: PathBuf::from("data/content.db"),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct SupabaseConfig {
    pub url: Option<String>,
    pub anon_key: Option<String>,
    pub timeout_secs: u64,
}

impl Default for SupabaseConfig {
    fn default() -> Self {
        Self {
            url: None,
            anon_key: None,
            timeout_secs: 10,
        }
    }
}

impl SupabaseConfig {
    pub fn is_configured(&self) -> bool {
        let present = |v: &Option<String>| v.as_deref().map_or(false, |s| !s.trim().is_empty());
        present(&self.url) && present(&self.anon_key)
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 3000,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct AdminConfig {
    /// No password means the admin API is disabled.
    pub password: Option<String>,
    pub session_ttl_secs: u64,
}

impl Default for AdminConfig {
    fn default() -> Self {
        Self {
            password: None,
            session_ttl_secs: 8 * 60 * 60,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub dir: PathBuf,
    pub file_name: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            dir: PathBuf::from("logs"),
            file_name: "prohub.log".to_string(),
        }
    }
}

impl Config {
    /// Reads `path` (or `config.toml` when `None`), then applies environment
    /// overrides. A missing default file is fine; a missing explicit one is not.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let (config_path, explicit) = match path {
            Some(p) => (p.to_path_buf(), true),
            None => (PathBuf::from(DEFAULT_CONFIG_PATH), false),
        };

        let mut config = if config_path.exists() {
            let config_content = fs::read_to_string(&config_path).map_err(|e| {
                SeoError::Config(format!(
                    "Failed to read config file '{}': {}",
                    config_path.display(),
                    e
                ))
            })?;
            info!("Loaded configuration from {}", config_path.display());
            Self::from_toml_str(&config_content)?
        } else if explicit {
            return Err(SeoError::Config(format!(
                "Config file '{}' does not exist",
                config_path.display()
            )));
        } else {
            Config::default()
        };

        config.apply_overrides(|name| std::env::var(name).ok());
        Ok(config)
    }

    pub fn from_toml_str(raw: &str) -> Result<Self> {
        Ok(toml::from_str(raw)?)
    }

    pub fn apply_overrides<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(url) = lookup("SUPABASE_URL") {
            self.supabase.url = Some(url);
        }
        if let Some(key) = lookup("SUPABASE_ANON_KEY") {
            self.supabase.anon_key = Some(key);
        }
        if let Some(password) = lookup("ADMIN_PASSWORD") {
            self.admin.password = Some(password);
        }
        if let Some(dir) = lookup("PROHUB_CONTENT_DIR") {
            self.content.dir = PathBuf::from(dir);
        }
        if let Some(dir) = lookup("PROHUB_CATALOG_DIR") {
            self.catalog.dir = PathBuf::from(dir);
        }
        if let Some(port) = lookup("PORT") {
            match port.parse() {
                Ok(port) => self.server.port = port,
                Err(_) => warn!("Ignoring invalid PORT value '{}'", port),
            }
        }
    }

    pub fn admin_password(&self) -> Option<&str> {
        self.admin
            .password
            .as_deref()
            .filter(|p| !p.trim().is_empty())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn empty_file_yields_defaults() {
        let config = Config::from_toml_str("").unwrap();
        assert_eq!(config.site.revalidate_secs, 86_400);
        assert_eq!(config.content.backend, ContentBackend::Files);
        assert_eq!(config.server.port, 3000);
        assert!(!config.supabase.is_configured());
        assert!(config.admin_password().is_none());
    }

    #[test]
    fn sections_override_defaults() {
        let config = Config::from_toml_str(
            r#"
            [site]
            base_url = "https://staging.prohub.co.za"

            [content]
            backend = "sqlite"
            sqlite_path = "/var/lib/prohub/content.db"

            [admin]
            session_ttl_secs = 600
            "#,
        )
        .unwrap();

        assert_eq!(config.site.base_url, "https://staging.prohub.co.za");
        assert_eq!(config.site.name, "ProHub");
        assert_eq!(config.content.backend, ContentBackend::Sqlite);
        assert_eq!(config.admin.session_ttl_secs, 600);
    }

    #[test]
    fn environment_wins_over_file() {
        let mut config = Config::default();
        let env: HashMap<&str, &str> = [
            ("SUPABASE_URL", "https://abc.supabase.co"),
            ("SUPABASE_ANON_KEY", "anon"),
            ("ADMIN_PASSWORD", "s3cret"),
            ("PORT", "not-a-port"),
        ]
        .into_iter()
        .collect();

        config.apply_overrides(|name| env.get(name).map(|v| v.to_string()));

        assert!(config.supabase.is_configured());
        assert_eq!(config.admin_password(), Some("s3cret"));
        assert_eq!(config.server.port, 3000);
    }

    #[test]
    fn blank_password_disables_admin() {
        let mut config = Config::default();
        config.admin.password = Some("  ".to_string());
        assert!(config.admin_password().is_none());
    }

    #[test]
    fn explicit_missing_file_is_an_error() {
        assert!(Config::load(Some(Path::new("/definitely/not/here.toml"))).is_err());
    }
}
