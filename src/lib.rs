pub mod cli;
pub mod client;
pub mod config;
pub mod db;
pub mod feed;
pub mod filter;
pub mod model;
pub mod storage;
pub mod subscriptions;

// --- Library API for embedding ---

/// Convenience re-exports for embedders.
pub mod prelude {
    pub use crate::client::{ClientConfig, CmsClient};
    pub use crate::config::AppConfig;
    pub use crate::feed::{ContentFeed, ContentSource};
    pub use crate::filter::{ContentFilter, FilterOptions, ALL};
    pub use crate::model::{ContentItem, Page, PlatformItem};
    pub use crate::subscriptions::{SubscriptionSet, SubscriptionStore};
    pub use crate::StreamHub;
}

use anyhow::Result;
use async_trait::async_trait;
use tracing::debug;

use crate::client::{ClientConfig, CmsClient};
use crate::config::AppConfig;
use crate::db::Database;
use crate::feed::{ContentFeed, ContentSource};
use crate::model::{ContentItem, Page, PlatformItem, CONTENT_COLLECTION, PLATFORM_COLLECTION};
use crate::storage::Storage;
use crate::subscriptions::SubscriptionStore;

// Page size used when walking the (unpaged in the UI) platform directory.
const PLATFORM_FETCH_LIMIT: u32 = 100;

/// Async library entry point. Owns the database and the CMS client.
pub struct StreamHub {
    db: Database,
    client: CmsClient,
    page_size: u32,
    // Caching TTL (seconds)
    list_ttl_secs: i64,
}

impl StreamHub {
    /// Open the database (running migrations) and build the remote client.
    pub async fn connect(config: &AppConfig) -> Result<Self> {
        let db = Database::connect(config.database_url.as_deref()).await?;
        db.run_migrations().await?;

        let mut client_config = ClientConfig::new(config.base_url()?);
        if let Some(ua) = &config.api.user_agent {
            client_config.user_agent = ua.clone();
        }
        let client = CmsClient::new(client_config)?;

        Ok(Self {
            db,
            client,
            page_size: config.browse.page_size.max(1),
            list_ttl_secs: config.cache.list_ttl_secs,
        })
    }

    pub fn page_size(&self) -> u32 {
        self.page_size
    }

    /// A fresh load-more cursor sized to the configured page size.
    pub fn new_feed(&self) -> ContentFeed {
        ContentFeed::new(self.page_size)
    }

    /// One page of catalog content, read through the list cache unless
    /// `refresh` is set.
    pub async fn content_page(
        &self,
        skip: u32,
        limit: u32,
        refresh: bool,
    ) -> Result<Page<ContentItem>> {
        let key = format!("content|page|{skip}|{limit}");
        let now = current_epoch();

        if !refresh {
            if let Some(payload) = self.db.get_cache(&key, now).await.ok().flatten() {
                if let Ok(page) = serde_json::from_str::<Page<ContentItem>>(&payload) {
                    debug!(skip, limit, "content page served from cache");
                    return Ok(page);
                }
            }
        }

        let page: Page<ContentItem> = self.client.list(CONTENT_COLLECTION, limit, skip).await?;
        if let Ok(payload) = serde_json::to_string(&page) {
            let _ = self
                .db
                .put_cache(&key, &payload, now + self.list_ttl_secs)
                .await;
        }
        Ok(page)
    }

    /// Detail lookup. `Ok(None)` when the id does not exist.
    pub async fn content_by_id(&self, id: &str) -> Result<Option<ContentItem>> {
        self.client.get_by_id(CONTENT_COLLECTION, id).await
    }

    /// The full platform directory in server order, read through the cache
    /// unless `refresh` is set.
    pub async fn platforms(&self, refresh: bool) -> Result<Vec<PlatformItem>> {
        let key = "platforms|all";
        let now = current_epoch();

        if !refresh {
            if let Some(payload) = self.db.get_cache(key, now).await.ok().flatten() {
                if let Ok(platforms) = serde_json::from_str::<Vec<PlatformItem>>(&payload) {
                    debug!(count = platforms.len(), "platforms served from cache");
                    return Ok(platforms);
                }
            }
        }

        let mut platforms: Vec<PlatformItem> = Vec::new();
        let mut skip = 0;
        loop {
            let page: Page<PlatformItem> = self
                .client
                .list(PLATFORM_COLLECTION, PLATFORM_FETCH_LIMIT, skip)
                .await?;
            platforms.extend(page.items);
            if !page.has_next {
                break;
            }
            skip += PLATFORM_FETCH_LIMIT;
        }

        if let Ok(payload) = serde_json::to_string(&platforms) {
            let _ = self
                .db
                .put_cache(key, &payload, now + self.list_ttl_secs)
                .await;
        }
        Ok(platforms)
    }

    /// The persisted subscription set, bound to this hub's database.
    pub async fn subscriptions(&self) -> SubscriptionStore<'_, Database> {
        SubscriptionStore::load(&self.db).await
    }

    /// Flip one subscription; returns whether the id is now subscribed.
    pub async fn toggle_subscription(&self, platform_id: &str) -> Result<bool> {
        let mut store = self.subscriptions().await;
        store.toggle(platform_id).await
    }

    /// Fetched platforms split into (subscribed, available).
    pub async fn subscription_overview(
        &self,
        refresh: bool,
    ) -> Result<(Vec<PlatformItem>, Vec<PlatformItem>)> {
        let platforms = self.platforms(refresh).await?;
        let store = self.subscriptions().await;
        Ok(store.set().partition(&platforms))
    }

    /// Clear cache entries by prefix. Returns number of rows removed.
    pub async fn clear_cache_prefix(&self, prefix: Option<&str>) -> Result<u64> {
        self.db.clear_cache_prefix(prefix).await
    }

    /// Vacuum/compact the database (SQLite only; no-op on others).
    pub async fn vacuum_db(&self) -> Result<()> {
        self.db.vacuum().await
    }
}

#[async_trait]
impl ContentSource for StreamHub {
    async fn fetch_page(&self, skip: u32, limit: u32) -> Result<Page<ContentItem>> {
        self.content_page(skip, limit, false).await
    }
}

fn current_epoch() -> i64 {
    std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .unwrap_or_default()
        .as_secs() as i64
}
