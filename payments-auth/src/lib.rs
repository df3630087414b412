//! # Payments Auth
//!
//! Memoizes client-credentials tokens per (client id, scope).
//!
//! [`CachingAuthTokenSource`] wraps any [`AuthTokenSource`] and serves tokens
//! from a [`TokenCacheStore`] until they are close to expiry. Storage is
//! pluggable: [`InMemoryTokenCache`] by default, [`NoopTokenCache`] when
//! caching is disabled, or any caller-supplied store.
//!
//! [`AuthTokenSource`]: payments_types::AuthTokenSource
//! [`TokenCacheStore`]: payments_types::TokenCacheStore

pub mod cache;
pub mod clock;
pub mod decorator;


pub use cache::{InMemoryTokenCache, NoopTokenCache};
pub use clock::{ManualClock, SystemClock};
pub use decorator::{CachingAuthTokenSource, DEFAULT_RENEWAL_BUFFER, store_ttl};
