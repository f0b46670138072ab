use anyhow::Result;
use async_trait::async_trait;
use tracing::debug;

use crate::model::{ContentItem, Page};

pub const DEFAULT_PAGE_SIZE: u32 = 50;

/// Anything that can serve one page of catalog content at an offset.
/// [`crate::StreamHub`] implements this against the CMS; tests implement it
/// in memory.
#[async_trait]
pub trait ContentSource: Send + Sync {
    async fn fetch_page(&self, skip: u32, limit: u32) -> Result<Page<ContentItem>>;
}

/// Accumulating load-more cursor over a [`ContentSource`].
///
/// The offset only moves forward between resets, and a fetch failure leaves
/// the accumulated list exactly as it was. Because `load_more` borrows the
/// feed mutably, two fetches for the same cursor cannot be in flight at
/// once, so a page can never be appended twice.
#[derive(Debug)]
pub struct ContentFeed {
    items: Vec<ContentItem>,
    skip: u32,
    page_size: u32,
    has_next: bool,
}

impl Default for ContentFeed {
    fn default() -> Self {
        Self::new(DEFAULT_PAGE_SIZE)
    }
}

impl ContentFeed {
    pub fn new(page_size: u32) -> Self {
        Self {
            items: Vec::new(),
            skip: 0,
            page_size: page_size.max(1),
            has_next: false,
        }
    }

    /// Everything accumulated so far, in server order.
    pub fn items(&self) -> &[ContentItem] {
        &self.items
    }

    /// Whether the server reported more pages after the last loaded one.
    /// Also true before the first load so callers can drive a
    /// load-until-done loop without a special case.
    pub fn has_more(&self) -> bool {
        self.skip == 0 || self.has_next
    }

    pub fn page_size(&self) -> u32 {
        self.page_size
    }

    pub fn next_skip(&self) -> u32 {
        self.skip
    }

    /// Fetch the page at the current offset. Offset 0 replaces the
    /// accumulated list; later offsets append in server order. Returns the
    /// number of items added.
    pub async fn load_more<S: ContentSource + ?Sized>(&mut self, source: &S) -> Result<usize> {
        let page = source.fetch_page(self.skip, self.page_size).await?;
        let added = page.items.len();
        if self.skip == 0 {
            self.items = page.items;
        } else {
            self.items.extend(page.items);
        }
        self.has_next = page.has_next;
        self.skip += self.page_size;
        debug!(
            added,
            total = self.items.len(),
            has_next = self.has_next,
            "feed page loaded"
        );
        Ok(added)
    }

    /// Discard the accumulation and restart from the first page.
    pub fn reset(&mut self) {
        self.items.clear();
        self.skip = 0;
        self.has_next = false;
    }
}
