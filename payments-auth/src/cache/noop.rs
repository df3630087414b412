use std::time::Duration;

use payments_types::{CachedAuthToken, TokenCacheKey, TokenCacheStore};

/// A store that keeps nothing. Every lookup misses.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopTokenCache;

#[async_trait::async_trait]
impl TokenCacheStore for NoopTokenCache {
    async fn try_get(&self, _key: &TokenCacheKey) -> Option<CachedAuthToken> {
        None
    }

    async fn set(&self, _key: TokenCacheKey, _entry: CachedAuthToken, _ttl: Duration) {}

    async fn clear(&self) {}
}
