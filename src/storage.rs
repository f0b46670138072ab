use std::collections::HashMap;
use std::sync::Mutex;

use anyhow::Result;
use async_trait::async_trait;

/// String-keyed persistence the library needs from its backing store:
/// expiring cache entries for fetched pages, and durable preference
/// entries for client-owned state such as the subscription set. Cache and
/// prefs are separate namespaces; clearing the cache never touches prefs.
#[async_trait]
pub trait Storage: Send + Sync {
    async fn get_cache(&self, key: &str, now: i64) -> Result<Option<String>>;
    async fn put_cache(&self, key: &str, payload: &str, expires_at: i64) -> Result<()>;

    async fn get_pref(&self, key: &str) -> Result<Option<String>>;
    async fn put_pref(&self, key: &str, payload: &str) -> Result<()>;
}

/// Non-persistent [`Storage`] for embedders that do not want a database,
/// and for tests.
#[derive(Debug, Default)]
pub struct MemoryStore {
    cache: Mutex<HashMap<String, (String, i64)>>,
    prefs: Mutex<HashMap<String, String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl Storage for MemoryStore {
    async fn get_cache(&self, key: &str, now: i64) -> Result<Option<String>> {
        let cache = self.cache.lock().unwrap();
        Ok(cache
            .get(key)
            .filter(|(_, expires_at)| *expires_at > now)
            .map(|(payload, _)| payload.clone()))
    }

    async fn put_cache(&self, key: &str, payload: &str, expires_at: i64) -> Result<()> {
        self.cache
            .lock()
            .unwrap()
            .insert(key.to_string(), (payload.to_string(), expires_at));
        Ok(())
    }

    async fn get_pref(&self, key: &str) -> Result<Option<String>> {
        Ok(self.prefs.lock().unwrap().get(key).cloned())
    }

    async fn put_pref(&self, key: &str, payload: &str) -> Result<()> {
        self.prefs
            .lock()
            .unwrap()
            .insert(key.to_string(), payload.to_string());
        Ok(())
    }
}
