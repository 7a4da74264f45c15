/// Keyed, TTL-based, fingerprint-invalidated cache around profile
/// resolution.
///
/// One slot per entity under the key `canonical_profile:<entityId>`. A
/// stored entry is served only while it is younger than the TTL (24h by
/// default, measured from creation, non-sliding) and its fingerprint still
/// matches the caller's bundle; either check failing is a miss and the next
/// `put` overwrites the slot. Unreadable or corrupt entries are also a
/// miss, never an error: recomputation is always correct and only costs
/// time.
///
/// The storage medium is an injectable backend so tests run against a
/// deterministic in-memory double while the service uses moka.
use crate::fingerprint::bundle_fingerprint;
use crate::models::{CacheEntry, CanonicalCompanyProfile, RawSourceBundle};
use chrono::{Duration, Utc};
use std::collections::HashMap;
use std::sync::{Arc, Mutex};

/// Default entry lifetime: 24 hours from creation.
pub const DEFAULT_TTL_HOURS: i64 = 24;

/// Best-effort key-value storage the cache sits on. Implementations are
/// free to evict at any time; the store revalidates everything it reads.
pub trait CacheBackend: Send + Sync {
    fn load(&self, key: &str) -> Option<String>;
    fn store(&self, key: &str, value: String);
}

/// Production backend over a moka sync cache.
pub struct MokaBackend {
    inner: moka::sync::Cache<String, String>,
}

impl MokaBackend {
    pub fn new(capacity: u64) -> Self {
        Self {
            inner: moka::sync::Cache::builder().max_capacity(capacity).build(),
        }
    }
}

impl CacheBackend for MokaBackend {
    fn load(&self, key: &str) -> Option<String> {
        self.inner.get(key)
    }

    fn store(&self, key: &str, value: String) {
        self.inner.insert(key.to_string(), value);
    }
}

/// Mutexed map backend for tests and single-shot tools.
#[derive(Default)]
pub struct MemoryBackend {
    inner: Mutex<HashMap<String, String>>,
}

impl MemoryBackend {
    pub fn new() -> Self {
        Self::default()
    }
}

impl CacheBackend for MemoryBackend {
    fn load(&self, key: &str) -> Option<String> {
        self.inner.lock().ok()?.get(key).cloned()
    }

    fn store(&self, key: &str, value: String) {
        if let Ok(mut map) = self.inner.lock() {
            map.insert(key.to_string(), value);
        }
    }
}

/// The profile cache.
#[derive(Clone)]
pub struct CacheStore {
    backend: Arc<dyn CacheBackend>,
    ttl: Duration,
}

impl CacheStore {
    pub fn new(backend: Arc<dyn CacheBackend>, ttl_hours: i64) -> Self {
        Self {
            backend,
            ttl: Duration::hours(ttl_hours),
        }
    }

    /// Slot key for an entity.
    pub fn cache_key(entity_id: &str) -> String {
        format!("canonical_profile:{}", entity_id)
    }

    /// Cached profile for this entity and bundle, or `None` on any of:
    /// empty slot, corrupt entry, expired TTL, fingerprint mismatch.
    pub fn get(&self, entity_id: &str, bundle: &RawSourceBundle) -> Option<CanonicalCompanyProfile> {
        let entry = self.read_slot(entity_id)?;

        if entry.fingerprint != bundle_fingerprint(bundle) {
            tracing::debug!("Cache stale for {}: fingerprint changed", entity_id);
            return None;
        }

        Some(entry.profile)
    }

    /// Cached profile checked against the TTL only, for read paths that do
    /// not hold the source bundle. The fingerprint cannot be verified
    /// without the bundle, so callers get whatever the last resolution
    /// produced, as long as it is fresh.
    pub fn peek(&self, entity_id: &str) -> Option<CanonicalCompanyProfile> {
        self.read_slot(entity_id).map(|entry| entry.profile)
    }

    /// Overwrite the entity's slot with a freshly computed profile.
    pub fn put(
        &self,
        entity_id: &str,
        bundle: &RawSourceBundle,
        profile: &CanonicalCompanyProfile,
    ) {
        let entry = CacheEntry {
            fingerprint: bundle_fingerprint(bundle),
            profile: profile.clone(),
            created_at: Utc::now(),
        };
        match serde_json::to_string(&entry) {
            Ok(serialized) => self.backend.store(&Self::cache_key(entity_id), serialized),
            Err(e) => {
                // Storing is best-effort; resolution already succeeded.
                tracing::warn!("Failed to serialize cache entry for {}: {}", entity_id, e);
            }
        }
    }

    /// Get-or-compute: returns the cached profile when the slot is valid,
    /// otherwise runs `build` and overwrites the slot with its result.
    pub fn resolve<F>(
        &self,
        entity_id: &str,
        bundle: &RawSourceBundle,
        build: F,
    ) -> CanonicalCompanyProfile
    where
        F: FnOnce(&RawSourceBundle) -> CanonicalCompanyProfile,
    {
        if let Some(cached) = self.get(entity_id, bundle) {
            tracing::debug!("Cache hit for {}", entity_id);
            return cached;
        }

        let profile = build(bundle);
        self.put(entity_id, bundle, &profile);
        profile
    }

    /// Load and validate a slot: parse failures and expired entries are
    /// both a miss.
    fn read_slot(&self, entity_id: &str) -> Option<CacheEntry> {
        let serialized = self.backend.load(&Self::cache_key(entity_id))?;

        let entry: CacheEntry = match serde_json::from_str(&serialized) {
            Ok(entry) => entry,
            Err(e) => {
                tracing::warn!("Corrupt cache entry for {}: {}", entity_id, e);
                return None;
            }
        };

        if Utc::now() - entry.created_at >= self.ttl {
            tracing::debug!("Cache stale for {}: TTL expired", entity_id);
            return None;
        }

        Some(entry)
    }
}
