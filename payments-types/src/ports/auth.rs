//! Auth ports: where tokens come from, where they are kept, and what time it is.

use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};

use crate::domain::{AccessToken, CachedAuthToken, TokenCacheKey};
use crate::error::AuthError;

/// Port trait for anything that can issue client-credentials tokens.
#[async_trait::async_trait]
pub trait AuthTokenSource: Send + Sync {
    /// Client identity the tokens are issued to. Part of the cache key.
    fn client_id(&self) -> &str;

    /// Requests a token for `scope`. An empty scope requests the default one.
    async fn request_token(&self, scope: &str) -> Result<AccessToken, AuthError>;
}

#[async_trait::async_trait]
impl<T: AuthTokenSource + ?Sized> AuthTokenSource for Arc<T> {
    fn client_id(&self) -> &str {
        (**self).client_id()
    }

    async fn request_token(&self, scope: &str) -> Result<AccessToken, AuthError> {
        (**self).request_token(scope).await
    }
}

/// Port trait for token cache storage.
///
/// Calls are independent: there is no compare-and-swap between `try_get` and
/// `set`, and concurrent writers of the same key simply overwrite each other.
#[async_trait::async_trait]
pub trait TokenCacheStore: Send + Sync {
    /// Returns the entry for `key`, if one is stored.
    async fn try_get(&self, key: &TokenCacheKey) -> Option<CachedAuthToken>;

    /// Stores `entry` under `key`, replacing any previous entry. `ttl` is how
    /// long the store may keep it.
    async fn set(&self, key: TokenCacheKey, entry: CachedAuthToken, ttl: Duration);

    /// Drops every entry.
    async fn clear(&self);
}

#[async_trait::async_trait]
impl<T: TokenCacheStore + ?Sized> TokenCacheStore for Arc<T> {
    async fn try_get(&self, key: &TokenCacheKey) -> Option<CachedAuthToken> {
        (**self).try_get(key).await
    }

    async fn set(&self, key: TokenCacheKey, entry: CachedAuthToken, ttl: Duration) {
        (**self).set(key, entry, ttl).await
    }

    async fn clear(&self) {
        (**self).clear().await
    }
}

/// Source of the current time.
pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Utc>;
}

impl<T: Clock + ?Sized> Clock for Arc<T> {
    fn now(&self) -> DateTime<Utc> {
        (**self).now()
    }
}
