//! Process-local token store.

use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use dashmap::DashMap;
use payments_types::{CachedAuthToken, Clock, TokenCacheKey, TokenCacheStore};

use crate::clock::SystemClock;

struct Stored {
    entry: CachedAuthToken,
    evict_at: DateTime<Utc>,
}

/// In-memory token store shared across tasks.
///
/// Entries are dropped lazily: a lookup strictly past an entry's TTL removes
/// it and misses. There is no background sweep.
pub struct InMemoryTokenCache {
    entries: DashMap<TokenCacheKey, Stored>,
    clock: Arc<dyn Clock>,
}

impl Default for InMemoryTokenCache {
    fn default() -> Self {
        Self::new()
    }
}

impl InMemoryTokenCache {
    pub fn new() -> Self {
        Self::with_clock(Arc::new(SystemClock))
    }

    pub fn with_clock(clock: Arc<dyn Clock>) -> Self {
        Self {
            entries: DashMap::new(),
            clock,
        }
    }

    /// Number of stored entries, expired ones included until next looked up.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[async_trait::async_trait]
impl TokenCacheStore for InMemoryTokenCache {
    async fn try_get(&self, key: &TokenCacheKey) -> Option<CachedAuthToken> {
        let now = self.clock.now();

        // The read guard must be gone before removing.
        match self.entries.get(key) {
            None => return None,
            Some(stored) if now <= stored.evict_at => return Some(stored.entry.clone()),
            Some(_) => {}
        }

        self.entries.remove_if(key, |_, stored| now > stored.evict_at);
        None
    }

    async fn set(&self, key: TokenCacheKey, entry: CachedAuthToken, ttl: Duration) {
        let now = self.clock.now();
        let evict_at = chrono::Duration::from_std(ttl)
            .ok()
            .and_then(|ttl| now.checked_add_signed(ttl))
            .unwrap_or(DateTime::<Utc>::MAX_UTC);

        self.entries.insert(key, Stored { entry, evict_at });
    }

    async fn clear(&self) {
        self.entries.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::ManualClock;
    use chrono::TimeZone;
    use payments_types::AccessToken;

    fn entry(now: DateTime<Utc>) -> CachedAuthToken {
        CachedAuthToken::new(
            AccessToken {
                access_token: "t1".into(),
                token_type: "Bearer".into(),
                expires_in: 3600,
                scope: None,
            },
            now + chrono::Duration::seconds(3540),
            "c1",
            "payments",
        )
    }

    #[tokio::test]
    async fn test_set_then_get() {
        let clock = Arc::new(ManualClock::new(Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap()));
        let cache = InMemoryTokenCache::with_clock(clock.clone());
        let key = TokenCacheKey::new("c1", "payments");

        assert!(cache.try_get(&key).await.is_none());

        let stored = entry(clock.now());
        cache.set(key.clone(), stored.clone(), Duration::from_secs(3540)).await;

        assert_eq!(cache.try_get(&key).await, Some(stored));
        assert!(cache.try_get(&TokenCacheKey::new("c1", "")).await.is_none());
    }

    #[tokio::test]
    async fn test_entry_evicted_strictly_after_ttl() {
        let clock = Arc::new(ManualClock::new(Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap()));
        let cache = InMemoryTokenCache::with_clock(clock.clone());
        let key = TokenCacheKey::new("c1", "payments");

        cache.set(key.clone(), entry(clock.now()), Duration::from_secs(30)).await;

        clock.advance(chrono::Duration::seconds(30));
        assert!(cache.try_get(&key).await.is_some());

        clock.advance(chrono::Duration::microseconds(1));
        assert!(cache.try_get(&key).await.is_none());
        assert!(cache.is_empty());
    }

    #[tokio::test]
    async fn test_clear_drops_everything() {
        let cache = InMemoryTokenCache::new();
        let now = Utc::now();
        cache
            .set(TokenCacheKey::new("c1", "a"), entry(now), Duration::from_secs(60))
            .await;
        cache
            .set(TokenCacheKey::new("c1", "b"), entry(now), Duration::from_secs(60))
            .await;
        assert_eq!(cache.len(), 2);

        cache.clear().await;
        assert!(cache.is_empty());
    }
}
