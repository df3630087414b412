//! Caching decorator around an auth token source.

use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use payments_types::{
    AccessToken, AuthError, AuthTokenSource, CachedAuthToken, Clock, TokenCacheKey,
    TokenCacheStore,
};
use tokio_util::sync::CancellationToken;

use crate::clock::SystemClock;

/// Time subtracted from a token's lifetime before it is cached.
pub const DEFAULT_RENEWAL_BUFFER: Duration = Duration::from_secs(60);

/// How long a token with lifetime `expires_in` may be served from the cache.
///
/// Tokens living no longer than `buffer` are kept for their whole lifetime.
pub fn store_ttl(expires_in: Duration, buffer: Duration) -> Duration {
    if expires_in <= buffer {
        expires_in
    } else {
        expires_in - buffer
    }
}

/// Serves tokens from a [`TokenCacheStore`] and only asks the wrapped source
/// on a miss.
///
/// Failed requests are never cached. Concurrent misses on the same key each
/// call the source; the last write wins.
pub struct CachingAuthTokenSource<S, C> {
    source: S,
    cache: C,
    clock: Arc<dyn Clock>,
    renewal_buffer: Duration,
}

impl<S: AuthTokenSource, C: TokenCacheStore> CachingAuthTokenSource<S, C> {
    pub fn new(source: S, cache: C) -> Self {
        Self {
            source,
            cache,
            clock: Arc::new(SystemClock),
            renewal_buffer: DEFAULT_RENEWAL_BUFFER,
        }
    }

    pub fn with_renewal_buffer(mut self, buffer: Duration) -> Self {
        self.renewal_buffer = buffer;
        self
    }

    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    pub fn renewal_buffer(&self) -> Duration {
        self.renewal_buffer
    }

    pub fn inner(&self) -> &S {
        &self.source
    }

    pub fn cache(&self) -> &C {
        &self.cache
    }

    fn key(&self, scope: &str) -> TokenCacheKey {
        TokenCacheKey::new(self.source.client_id(), scope)
    }

    /// Returns a token for `scope`, from the cache when a live entry exists.
    #[tracing::instrument(skip(self), fields(client_id = %self.source.client_id()))]
    pub async fn get_token(&self, scope: &str) -> Result<AccessToken, AuthError> {
        let key = self.key(scope);
        if let Some(token) = self.lookup(&key).await {
            return Ok(token);
        }
        self.refresh(key).await
    }

    /// Like [`get_token`](Self::get_token), but gives up when `cancel` fires
    /// while waiting on the source.
    ///
    /// An already cancelled token returns [`AuthError::Cancelled`] before the
    /// cache is consulted. Once a cache hit is found it is returned regardless.
    #[tracing::instrument(skip(self, cancel), fields(client_id = %self.source.client_id()))]
    pub async fn get_token_cancellable(
        &self,
        scope: &str,
        cancel: &CancellationToken,
    ) -> Result<AccessToken, AuthError> {
        if cancel.is_cancelled() {
            return Err(AuthError::Cancelled);
        }

        let key = self.key(scope);
        if let Some(token) = self.lookup(&key).await {
            return Ok(token);
        }

        tokio::select! {
            biased;
            _ = cancel.cancelled() => {
                tracing::debug!(%key, "token request cancelled");
                Err(AuthError::Cancelled)
            }
            result = self.refresh(key.clone()) => result,
        }
    }

    async fn lookup(&self, key: &TokenCacheKey) -> Option<AccessToken> {
        let entry = self.cache.try_get(key).await?;
        if entry.is_expired(self.clock.now()) {
            tracing::debug!(%key, expires_at = %entry.expires_at, "cached token expired");
            return None;
        }
        tracing::debug!(%key, "token cache hit");
        Some(entry.token)
    }

    async fn refresh(&self, key: TokenCacheKey) -> Result<AccessToken, AuthError> {
        tracing::debug!(%key, "token cache miss");

        let token = match self.source.request_token(key.scope()).await {
            Ok(token) => token,
            Err(err) => {
                match err.as_failure() {
                    Some(failure) => tracing::warn!(
                        %key,
                        status = failure.status,
                        trace_id = failure.trace_id.as_deref().unwrap_or("-"),
                        "token request rejected"
                    ),
                    None => tracing::warn!(%key, error = %err, "token request failed"),
                }
                return Err(err);
            }
        };

        let ttl = store_ttl(Duration::from_secs(token.expires_in), self.renewal_buffer);
        let expires_at = add(self.clock.now(), ttl);
        let entry = CachedAuthToken::new(
            token.clone(),
            expires_at,
            key.client_id(),
            key.scope(),
        );

        self.cache.set(key, entry, ttl).await;
        Ok(token)
    }
}

fn add(now: DateTime<Utc>, ttl: Duration) -> DateTime<Utc> {
    chrono::Duration::from_std(ttl)
        .ok()
        .and_then(|ttl| now.checked_add_signed(ttl))
        .unwrap_or(DateTime::<Utc>::MAX_UTC)
}

#[async_trait::async_trait]
impl<S: AuthTokenSource, C: TokenCacheStore> AuthTokenSource for CachingAuthTokenSource<S, C> {
    fn client_id(&self) -> &str {
        self.source.client_id()
    }

    async fn request_token(&self, scope: &str) -> Result<AccessToken, AuthError> {
        self.get_token(scope).await
    }
}
