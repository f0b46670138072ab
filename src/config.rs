use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use directories::ProjectDirs;
use serde::Deserialize;
use tracing::debug;
use url::Url;

const DEFAULT_BASE_URL: &str = "http://localhost:8090/api/v1";
const DEFAULT_PAGE_SIZE: u32 = 50;
const DEFAULT_LIST_TTL_SECS: i64 = 60 * 60;

/// Crate configuration, read from `config.toml` in the platform config
/// directory when present. Individual knobs can be overridden with
/// `STREAMHUB_*` environment variables.
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(deny_unknown_fields)]
pub struct AppConfig {
    #[serde(default)]
    pub api: ApiConfig,
    #[serde(default)]
    pub browse: BrowseConfig,
    #[serde(default)]
    pub cache: CacheConfig,
    /// Full sqlx database URL; defaults to a SQLite file in the user data
    /// directory when unset.
    #[serde(default)]
    pub database_url: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ApiConfig {
    #[serde(default = "default_base_url")]
    pub base_url: String,
    #[serde(default)]
    pub user_agent: Option<String>,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            user_agent: None,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct BrowseConfig {
    /// Fixed page size for the load-more cursor.
    #[serde(default = "default_page_size")]
    pub page_size: u32,
}

impl Default for BrowseConfig {
    fn default() -> Self {
        Self {
            page_size: default_page_size(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CacheConfig {
    /// TTL for cached list pages, in seconds.
    #[serde(default = "default_list_ttl")]
    pub list_ttl_secs: i64,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            list_ttl_secs: default_list_ttl(),
        }
    }
}

fn default_base_url() -> String {
    DEFAULT_BASE_URL.to_string()
}
fn default_page_size() -> u32 {
    DEFAULT_PAGE_SIZE
}
fn default_list_ttl() -> i64 {
    DEFAULT_LIST_TTL_SECS
}

impl AppConfig {
    /// Load from the default location, falling back to defaults when no
    /// config file exists yet.
    pub fn load() -> Result<Self> {
        match default_config_path() {
            Some(path) if path.exists() => Self::load_from(&path),
            _ => Ok(Self::default().with_env_overrides()),
        }
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("reading config file: {}", path.display()))?;
        let config: AppConfig = toml::from_str(&raw)
            .with_context(|| format!("parsing config file: {}", path.display()))?;
        debug!(path = %path.display(), "loaded config file");
        Ok(config.with_env_overrides())
    }

    fn with_env_overrides(mut self) -> Self {
        if let Ok(v) = std::env::var("STREAMHUB_BASE_URL") {
            if !v.trim().is_empty() {
                self.api.base_url = v;
            }
        }
        if let Some(v) = env_parse::<u32>("STREAMHUB_PAGE_SIZE") {
            self.browse.page_size = v;
        }
        if let Some(v) = env_parse::<i64>("STREAMHUB_LIST_TTL_SECS") {
            self.cache.list_ttl_secs = v;
        }
        if let Ok(v) = std::env::var("STREAMHUB_DATABASE_URL") {
            if !v.trim().is_empty() {
                self.database_url = Some(v);
            }
        }
        self
    }

    pub fn base_url(&self) -> Result<Url> {
        Url::parse(&self.api.base_url)
            .with_context(|| format!("invalid api base url: {}", self.api.base_url))
    }
}

fn env_parse<T: std::str::FromStr>(name: &str) -> Option<T> {
    std::env::var(name).ok().and_then(|s| s.parse().ok())
}

fn default_config_path() -> Option<PathBuf> {
    let proj = ProjectDirs::from("dev", "streamhub", "streamhub")?;
    Some(proj.config_dir().join("config.toml"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_sane() {
        let config = AppConfig::default();
        assert_eq!(config.browse.page_size, 50);
        assert_eq!(config.cache.list_ttl_secs, 3600);
        assert!(config.database_url.is_none());
        assert!(config.base_url().is_ok());
    }

    #[test]
    fn parses_partial_toml_with_defaults_for_the_rest() {
        let config: AppConfig = toml::from_str(
            r#"
            [api]
            base_url = "https://cms.example.com/v2"

            [browse]
            page_size = 25
            "#,
        )
        .unwrap();
        assert_eq!(config.api.base_url, "https://cms.example.com/v2");
        assert_eq!(config.browse.page_size, 25);
        assert_eq!(config.cache.list_ttl_secs, 3600);
    }

    #[test]
    fn rejects_unknown_keys() {
        let parsed = toml::from_str::<AppConfig>("[api]\nbase = \"oops\"\n");
        assert!(parsed.is_err());
    }
}
