use anyhow::{Context, Result};
use tracing::warn;

use crate::model::PlatformItem;
use crate::storage::Storage;

/// Pref key holding the serialized subscription id array.
pub const SUBSCRIPTIONS_KEY: &str = "subscriptions";

/// The set of platform ids the user is subscribed to. Client-owned state
/// with no server counterpart; the persisted payload is a JSON id array
/// overwritten wholesale on every change. Toggle order is preserved so the
/// payload round-trips byte-stably.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SubscriptionSet {
    ids: Vec<String>,
}

impl SubscriptionSet {
    pub fn contains(&self, id: &str) -> bool {
        self.ids.iter().any(|s| s == id)
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    pub fn ids(&self) -> &[String] {
        &self.ids
    }

    /// Flip membership of `id`; returns whether it is now present.
    fn flip(&mut self, id: &str) -> bool {
        if let Some(pos) = self.ids.iter().position(|s| s == id) {
            self.ids.remove(pos);
            false
        } else {
            self.ids.push(id.to_string());
            true
        }
    }

    /// Split a fetched platform list into (subscribed, available),
    /// preserving input order. The two views always partition the input:
    /// no overlap, no omission.
    pub fn partition(&self, platforms: &[PlatformItem]) -> (Vec<PlatformItem>, Vec<PlatformItem>) {
        platforms
            .iter()
            .cloned()
            .partition(|p| self.contains(&p.id))
    }
}

/// Subscription state bound to a [`Storage`] backend. Every toggle writes
/// the full serialized set back before the in-memory set changes, so the
/// two can never drift within a session.
pub struct SubscriptionStore<'a, S: Storage + ?Sized> {
    storage: &'a S,
    set: SubscriptionSet,
}

impl<'a, S: Storage + ?Sized> SubscriptionStore<'a, S> {
    /// Read the persisted set. An absent or unparseable entry yields the
    /// empty set; bad persisted data is never fatal.
    pub async fn load(storage: &'a S) -> Self {
        let set = match storage.get_pref(SUBSCRIPTIONS_KEY).await {
            Ok(Some(payload)) => match serde_json::from_str::<Vec<String>>(&payload) {
                Ok(ids) => SubscriptionSet { ids },
                Err(err) => {
                    warn!(%err, "ignoring unparseable subscription payload");
                    SubscriptionSet::default()
                }
            },
            Ok(None) => SubscriptionSet::default(),
            Err(err) => {
                warn!(%err, "failed to read subscriptions, starting empty");
                SubscriptionSet::default()
            }
        };
        Self { storage, set }
    }

    pub fn set(&self) -> &SubscriptionSet {
        &self.set
    }

    /// Flip membership of `id` and persist the resulting set as a complete
    /// overwrite. Returns whether the id is now subscribed. On a persist
    /// failure the in-memory set is left unchanged.
    pub async fn toggle(&mut self, id: &str) -> Result<bool> {
        let mut next = self.set.clone();
        let subscribed = next.flip(id);
        let payload = serde_json::to_string(next.ids()).context("serializing subscriptions")?;
        self.storage
            .put_pref(SUBSCRIPTIONS_KEY, &payload)
            .await
            .context("persisting subscriptions")?;
        self.set = next;
        Ok(subscribed)
    }
}
