use anyhow::{bail, Context, Result};
use reqwest::StatusCode;
use serde::de::DeserializeOwned;
use tracing::debug;
use url::Url;

use crate::model::Page;

pub const DEFAULT_USER_AGENT: &str = concat!("streamhub/", env!("CARGO_PKG_VERSION"));

/// Connection settings for the CMS backend.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    pub base_url: Url,
    pub user_agent: String,
}

impl ClientConfig {
    pub fn new(base_url: Url) -> Self {
        Self {
            base_url,
            user_agent: DEFAULT_USER_AGENT.to_string(),
        }
    }
}

/// Typed client for the generic collection API: paged `list` plus
/// `get_by_id`, nothing else. Collection names are passed by the caller so
/// the client stays schema-agnostic; the response types carry the schema.
pub struct CmsClient {
    http: reqwest::Client,
    base_url: Url,
}

impl CmsClient {
    pub fn new(config: ClientConfig) -> Result<Self> {
        if config.user_agent.trim().is_empty() {
            bail!("cms client user agent required");
        }
        let http = reqwest::Client::builder()
            .user_agent(config.user_agent)
            .build()
            .context("building http client")?;
        Ok(Self {
            http,
            base_url: config.base_url,
        })
    }

    /// Fetch one page of a collection. `skip` is the item offset, `limit`
    /// the page size; the server reports whether more pages follow.
    pub async fn list<T: DeserializeOwned>(
        &self,
        collection: &str,
        limit: u32,
        skip: u32,
    ) -> Result<Page<T>> {
        let url = self.items_url(collection, None)?;
        debug!(collection, limit, skip, "listing collection page");
        let resp = self
            .http
            .get(url)
            .query(&[("limit", limit), ("skip", skip)])
            .send()
            .await
            .with_context(|| format!("requesting {collection} page at skip {skip}"))?;
        if !resp.status().is_success() {
            bail!(
                "cms returned {} listing collection {collection}",
                resp.status()
            );
        }
        let page: Page<T> = resp
            .json()
            .await
            .with_context(|| format!("decoding {collection} page at skip {skip}"))?;
        debug!(
            collection,
            count = page.items.len(),
            has_next = page.has_next,
            "collection page received"
        );
        Ok(page)
    }

    /// Fetch a single entity. A 404 means the record does not exist, which
    /// is a normal outcome here, not a failure.
    pub async fn get_by_id<T: DeserializeOwned>(
        &self,
        collection: &str,
        id: &str,
    ) -> Result<Option<T>> {
        let url = self.items_url(collection, Some(id))?;
        debug!(collection, id, "fetching entity");
        let resp = self
            .http
            .get(url)
            .send()
            .await
            .with_context(|| format!("requesting {collection}/{id}"))?;
        if resp.status() == StatusCode::NOT_FOUND {
            return Ok(None);
        }
        if !resp.status().is_success() {
            bail!("cms returned {} fetching {collection}/{id}", resp.status());
        }
        let entity = resp
            .json()
            .await
            .with_context(|| format!("decoding {collection}/{id}"))?;
        Ok(Some(entity))
    }

    fn items_url(&self, collection: &str, id: Option<&str>) -> Result<Url> {
        let mut url = self.base_url.clone();
        {
            let mut segments = url
                .path_segments_mut()
                .map_err(|_| anyhow::anyhow!("cms base url cannot be a base"))?;
            segments.pop_if_empty().push(collection).push("items");
            if let Some(id) = id {
                segments.push(id);
            }
        }
        Ok(url)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn client() -> CmsClient {
        let config = ClientConfig::new(Url::parse("https://cms.example.com/api/v1").unwrap());
        CmsClient::new(config).unwrap()
    }

    #[test]
    fn rejects_blank_user_agent() {
        let mut config = ClientConfig::new(Url::parse("https://cms.example.com").unwrap());
        config.user_agent = "  ".into();
        assert!(CmsClient::new(config).is_err());
    }

    #[test]
    fn builds_collection_urls() {
        let c = client();
        let url = c.items_url("ottcontent", None).unwrap();
        assert_eq!(url.as_str(), "https://cms.example.com/api/v1/ottcontent/items");
        let url = c.items_url("ottplatforms", Some("p1")).unwrap();
        assert_eq!(
            url.as_str(),
            "https://cms.example.com/api/v1/ottplatforms/items/p1"
        );
    }

    #[test]
    fn base_url_trailing_slash_does_not_double_up() {
        let config = ClientConfig::new(Url::parse("https://cms.example.com/api/").unwrap());
        let c = CmsClient::new(config).unwrap();
        let url = c.items_url("ottcontent", None).unwrap();
        assert_eq!(url.as_str(), "https://cms.example.com/api/ottcontent/items");
    }
}
