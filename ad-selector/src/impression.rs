use dashmap::DashMap;
use primitives::{CampaignId, PropertyId};
use serde::{Deserialize, Serialize};
use std::{
    net::IpAddr,
    sync::Arc,
    time::{Duration, Instant},
};
use uuid::Uuid;

/// How long a correlation token stays resolvable.
pub const VIRTUAL_IMPRESSION_TTL: Duration = Duration::from_secs(30);

/// Request-scoped correlation record tying one served ad to its later click
/// and impression confirmations. Never persisted durably.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VirtualImpression {
    pub campaign_id: CampaignId,
    pub property_id: PropertyId,
    pub ip_address: IpAddr,
}

/// Volatile, time-expiring store. Implementations must be safe under
/// concurrent readers and writers and must expire entries on their own;
/// the engine never runs a reaper.
pub trait KeyValueStore {
    fn set_with_ttl(&self, key: String, value: VirtualImpression, ttl: Duration);
    fn get(&self, key: &str) -> Option<VirtualImpression>;
}

/// In-process store backed by a concurrent map; expiry is enforced at read
/// time.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    entries: Arc<DashMap<String, (VirtualImpression, Instant)>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl KeyValueStore for MemoryStore {
    fn set_with_ttl(&self, key: String, value: VirtualImpression, ttl: Duration) {
        self.entries.insert(key, (value, Instant::now() + ttl));
    }

    fn get(&self, key: &str) -> Option<VirtualImpression> {
        let expired = match self.entries.get(key) {
            Some(entry) => {
                let (value, deadline) = entry.value();
                if Instant::now() < *deadline {
                    return Some(value.clone());
                }
                true
            }
            None => false,
        };
        // the map guard must be released before removing
        if expired {
            self.entries.remove(key);
        }

        None
    }
}

/// One token per request, reused for the lifetime of that request's
/// response.
pub fn mint_token() -> String {
    Uuid::new_v4().to_string()
}

/// Records served impressions into a TTL store for later click/impression
/// reconciliation. Recording the same token twice overwrites in place.
#[derive(Debug, Clone)]
pub struct ImpressionRecorder<S> {
    store: S,
    ttl: Duration,
}

impl<S: KeyValueStore> ImpressionRecorder<S> {
    pub fn new(store: S) -> Self {
        Self {
            store,
            ttl: VIRTUAL_IMPRESSION_TTL,
        }
    }

    /// Overrides the expiry window, primarily for tests.
    pub fn with_ttl(store: S, ttl: Duration) -> Self {
        Self { store, ttl }
    }

    /// Never blocks on durable storage; the write goes to the volatile
    /// store only.
    pub fn record(
        &self,
        token: &str,
        campaign_id: CampaignId,
        property_id: PropertyId,
        ip_address: IpAddr,
    ) {
        self.store.set_with_ttl(
            token.to_owned(),
            VirtualImpression {
                campaign_id,
                property_id,
                ip_address,
            },
            self.ttl,
        );
    }

    pub fn lookup(&self, token: &str) -> Option<VirtualImpression> {
        self.store.get(token)
    }
}
